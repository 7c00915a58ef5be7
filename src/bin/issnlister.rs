//! Lists all ISSN registered at the ISSN portal and downloads their public
//! metadata.
//!
//!     $ issnlister -l > issn.tsv
//!     $ issnlister -m > data.ndj
//!     $ issnlister -m -c data.ndj
//!
//! Sitemaps are cached per day under the cache directory.

use std::collections::HashSet;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use issnlister::config::HarvestConfig;
use issnlister::logging::init_tracing;
use issnlister::portal::harvest::filter_ignored;
use issnlister::portal::resume::{open_append, resume_dump};
use issnlister::portal::{Cacher, HarvestOptions, build_client, harvest};
use issnlister::utils::lines;

#[derive(Parser, Debug)]
#[command(name = "issnlister")]
#[command(about = "List registered ISSN and download public ISSN metadata")]
#[command(version)]
struct Args {
    /// The main sitemap
    #[arg(short, long)]
    sitemap: Option<String>,

    /// Path to cache dir
    #[arg(short = 'd', long)]
    cache_dir: Option<PathBuf>,

    /// Suppress any extra output
    #[arg(short, long)]
    quiet: bool,

    /// List all cached ISSN, one per line
    #[arg(short, long)]
    list: bool,

    /// Download public metadata in JSON format
    #[arg(short = 'm', long)]
    dump: bool,

    /// Number of workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Batch size per worker
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Skip undecodable records
    #[arg(short = 'u', long)]
    skip_undecodable: bool,

    /// File with ISSN to ignore, one per line
    #[arg(short, long)]
    ignore: Option<PathBuf>,

    /// Continue an interrupted dump, appending to FILE
    #[arg(short = 'c', long, value_name = "FILE", conflicts_with = "ignore", requires = "dump")]
    continue_harvest: Option<PathBuf>,

    /// User agent for all requests
    #[arg(long)]
    user_agent: Option<String>,

    /// Base URL of the ISSN portal
    #[arg(long)]
    portal_url: Option<String>,
}

impl Args {
    fn config(&self) -> HarvestConfig {
        let mut config = HarvestConfig::from_env();
        if let Some(s) = &self.sitemap {
            config.sitemap_index = s.clone();
        }
        if let Some(d) = &self.cache_dir {
            config.cache_dir = d.clone();
        }
        if let Some(w) = self.workers {
            config.workers = w.max(1);
        }
        if let Some(b) = self.batch_size {
            config.batch_size = b.max(1);
        }
        if let Some(ua) = &self.user_agent {
            config.user_agent = ua.clone();
        }
        if let Some(p) = &self.portal_url {
            config.portal_url = p.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(if args.quiet {
        "off"
    } else {
        "issnlister=info"
    });

    let config = args.config();
    let client = build_client(&config.user_agent).map_err(|e| anyhow!(e))?;
    let cacher = Cacher::new(
        &config.cache_dir,
        &config.sitemap_index,
        client.clone(),
        config.retries,
    );

    if args.list {
        let issns = cacher.list().await.map_err(|e| anyhow!(e))?;
        let mut out = BufWriter::new(std::io::stdout().lock());
        for issn in &issns {
            writeln!(out, "{}", issn)?;
        }
        out.flush()?;
    } else if args.dump {
        tracing::info!("downloading public metadata");
        let mut issns = cacher.list().await.map_err(|e| anyhow!(e))?;

        let ignore: Option<HashSet<String>> = match (&args.ignore, &args.continue_harvest) {
            (Some(path), _) => Some(
                lines::from_file(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
                    .into_iter()
                    .filter(|l| !l.is_empty())
                    .collect(),
            ),
            (None, Some(path)) => Some(resume_dump(path).map_err(|e| anyhow!(e))?),
            (None, None) => None,
        };
        if let Some(ignore) = &ignore {
            tracing::info!("{} to ignore", ignore.len());
            tracing::info!("started with {} issn", issns.len());
            issns = filter_ignored(issns, ignore);
        }

        let options = HarvestOptions::from_config(&config, args.skip_undecodable);
        let mut out: Box<dyn Write> = match &args.continue_harvest {
            Some(path) => Box::new(BufWriter::new(open_append(path).map_err(|e| anyhow!(e))?)),
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        };
        let stats = harvest(&client, &issns, &options, &mut out)
            .await
            .map_err(|e| anyhow!(e))?;
        tracing::info!(
            "{} records written, {} skipped",
            stats.written,
            stats.skipped
        );
    }

    Ok(())
}
