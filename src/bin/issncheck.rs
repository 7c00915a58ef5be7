//! Tells whether ISSN read from stdin are registered, using the list harvested
//! by `issnlister -l`.
//!
//!     $ printf "0003-200X\n12345678\nfoo\n" | issncheck
//!     1	0003-200X
//!     0	1234-5678
//!     X	foo

use std::io::{BufWriter, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use issnlister::config::default_cache_dir;
use issnlister::logging::init_tracing;
use issnlister::portal::cache::latest_serial_numbers_file;
use issnlister::registry::Registry;
use issnlister::utils::lines;

#[derive(Parser, Debug)]
#[command(name = "issncheck")]
#[command(about = "Check ISSN from stdin against the list of registered ISSN")]
#[command(version)]
struct Args {
    /// List of registered ISSN, one per line; the newest cached list by default
    #[arg(short, long, env = "ISSNCHECK_LIST")]
    list: Option<PathBuf>,

    /// Cache directory to look for lists in
    #[arg(short = 'd', long, env = "ISSNLISTER_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("issncheck=info");
    let args = Args::parse();

    let list = match args.list {
        Some(list) => list,
        None => {
            let cache_dir = args.cache_dir.unwrap_or_else(default_cache_dir);
            latest_serial_numbers_file(&cache_dir).ok_or_else(|| {
                anyhow!(
                    "no ISSN list cached in {}, run `issnlister -l` first",
                    cache_dir.display()
                )
            })?
        }
    };

    let registry = Registry::from_lines(
        lines::from_file(&list).with_context(|| format!("Failed to read {}", list.display()))?,
    );
    tracing::info!("{} registered ISSN loaded from {}", registry.len(), list.display());

    registry
        .check_all(stdin().lock(), BufWriter::new(stdout().lock()))
        .context("Failed to check input")
}
