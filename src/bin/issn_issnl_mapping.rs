//! Turns an NDJSON dump of ISSN portal records into an ISSN to ISSN-L table.
//!
//!     $ issnlister -m > data.ndj
//!     $ issn-issnl-mapping data.ndj > issn_issnl_mapping.tsv
//!
//! To get the reverse mapping, swap the columns:
//!
//!     $ issn-issnl-mapping data.ndj | awk '{print $2"\t"$1}' > issnl_issn_mapping.tsv

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use issnlister::logging::init_tracing_with;
use issnlister::mapping::{MAPPING_DIAGNOSTICS, write_mappings};

#[derive(Parser, Debug)]
#[command(name = "issn-issnl-mapping")]
#[command(about = "Extract ISSN to ISSN-L mappings from an NDJSON metadata dump")]
#[command(version)]
struct Args {
    /// Newline delimited JSON file, as written by `issnlister -m`
    file: PathBuf,
}

fn main() -> Result<()> {
    init_tracing_with(
        "issnlister=info,issn_issnl_mapping=info",
        &[MAPPING_DIAGNOSTICS],
    );
    let args = Args::parse();

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    let mut read_error = None;
    let lines = BufReader::new(file)
        .lines()
        .map_while(|line| line.map_err(|e| read_error = Some(e)).ok());

    let stdout = std::io::stdout();
    let stats = write_mappings(lines, BufWriter::new(stdout.lock())).map_err(|e| anyhow!(e))?;

    if let Some(e) = read_error {
        return Err(e).with_context(|| format!("Failed to read {}", args.file.display()));
    }

    tracing::debug!(
        "{} rows written, {} lines skipped",
        stats.written,
        stats.skipped
    );
    Ok(())
}
