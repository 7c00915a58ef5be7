//! Bulk download of the public JSON-LD records of the ISSN portal.

use std::collections::HashSet;
use std::io::Write;

use futures::StreamExt;
use serde_json::{Map, Value};

use super::{backoff, get_once};
use crate::infrastructure::HarvestConfig;

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Base URL, records live at `<portal_url>/resource/ISSN/<issn>?format=json`
    pub portal_url: String,
    /// Number of batches in flight
    pub workers: usize,
    /// Records per batch
    pub batch_size: usize,
    /// Log and drop bodies that are not a JSON object instead of failing
    pub skip_undecodable: bool,
    /// Extra attempts per record, for any status of 400 and above and for
    /// undecodable bodies
    pub retries: u32,
}

impl HarvestOptions {
    pub fn from_config(config: &HarvestConfig, skip_undecodable: bool) -> Self {
        Self {
            portal_url: config.portal_url.clone(),
            workers: config.workers,
            batch_size: config.batch_size,
            skip_undecodable,
            retries: config.record_retries,
        }
    }

    pub fn record_url(&self, issn: &str) -> String {
        format!(
            "{}/resource/ISSN/{}?format=json",
            self.portal_url.trim_end_matches('/'),
            issn
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HarvestStats {
    pub requested: usize,
    pub written: usize,
    pub skipped: usize,
}

/// Drops every ISSN contained in `ignore`.
pub fn filter_ignored(issns: Vec<String>, ignore: &HashSet<String>) -> Vec<String> {
    issns
        .into_iter()
        .filter(|issn| !ignore.contains(issn))
        .collect()
}

struct Batch {
    records: Vec<String>,
    skipped: usize,
}

/// Last failure of a record after all attempts.
struct RecordFailure {
    undecodable: bool,
    message: String,
}

/// Fetches and decodes one record.
///
/// The portal occasionally answers with a 404 for records that exist, or with
/// XML although JSON was requested, so every failure is retried.
async fn fetch_record(
    client: &reqwest::Client,
    link: &str,
    retries: u32,
) -> Result<Map<String, Value>, RecordFailure> {
    let mut errors = Vec::new();
    let mut undecodable = false;

    for attempt in 0..=retries {
        if attempt > 0 {
            tokio::time::sleep(backoff(attempt)).await;
        }
        let body = match get_once(client, link).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("{}", e);
                errors.push(e.to_string());
                undecodable = false;
                continue;
            }
        };
        match serde_json::from_str::<Map<String, Value>>(&body) {
            Ok(doc) => return Ok(doc),
            Err(e) => {
                tracing::warn!("{} at {}", e, link);
                tracing::debug!("{}", body);
                errors.push(format!("{} failed with {}", link, e));
                undecodable = true;
            }
        }
    }

    Err(RecordFailure {
        undecodable,
        message: format!("giving up on {}, errors were: {:?}", link, errors),
    })
}

async fn fetch_batch(
    client: &reqwest::Client,
    links: Vec<String>,
    options: &HarvestOptions,
) -> Result<Batch, String> {
    let mut batch = Batch {
        records: Vec::with_capacity(links.len()),
        skipped: 0,
    };

    for link in links {
        match fetch_record(client, &link, options.retries).await {
            Ok(doc) => {
                let line = serde_json::to_string(&doc)
                    .map_err(|e| format!("Failed to encode record of {}: {}", link, e))?;
                batch.records.push(line);
            }
            Err(failure) if failure.undecodable && options.skip_undecodable => {
                tracing::warn!("skipping undecodable record: {}", failure.message);
                batch.skipped += 1;
            }
            Err(failure) => return Err(failure.message),
        }
    }

    Ok(batch)
}

/// Downloads the record of every ISSN and writes one compact JSON document
/// per line to `out`, in the order of `issns`.
///
/// Blank entries and entries starting with `#` are ignored.
pub async fn harvest<W: Write + ?Sized>(
    client: &reqwest::Client,
    issns: &[String],
    options: &HarvestOptions,
    out: &mut W,
) -> Result<HarvestStats, String> {
    let links: Vec<String> = issns
        .iter()
        .map(|issn| issn.trim())
        .filter(|issn| !issn.is_empty() && !issn.starts_with('#'))
        .map(|issn| options.record_url(issn))
        .collect();

    let mut stats = HarvestStats {
        requested: links.len(),
        ..Default::default()
    };
    tracing::info!("attempting to download {} links", links.len());

    let batches: Vec<Vec<String>> = links
        .chunks(options.batch_size.max(1))
        .map(<[String]>::to_vec)
        .collect();

    let mut results = futures::stream::iter(
        batches
            .into_iter()
            .map(|links| fetch_batch(client, links, options)),
    )
    .buffered(options.workers.max(1));

    while let Some(batch) = results.next().await {
        let batch = batch?;
        for record in &batch.records {
            writeln!(out, "{}", record).map_err(|e| format!("Failed to write record: {}", e))?;
        }
        stats.written += batch.records.len();
        stats.skipped += batch.skipped;
    }

    out.flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> HarvestOptions {
        HarvestOptions {
            portal_url: "https://portal.issn.org/".to_string(),
            workers: 2,
            batch_size: 10,
            skip_undecodable: false,
            retries: 0,
        }
    }

    #[test]
    fn test_record_url() {
        assert_eq!(
            options().record_url("1521-9615"),
            "https://portal.issn.org/resource/ISSN/1521-9615?format=json"
        );
    }

    #[test]
    fn test_filter_ignored() {
        let ignore: HashSet<String> = ["1234-5679".to_string()].into_iter().collect();
        let issns = vec!["0003-200X".to_string(), "1234-5679".to_string()];
        assert_eq!(filter_ignored(issns, &ignore), vec!["0003-200X"]);
    }

    #[tokio::test]
    async fn test_harvest_nothing_to_do() {
        let mut out = Vec::new();
        let issns = vec!["".to_string(), "# comment".to_string()];
        let stats = harvest(&reqwest::Client::new(), &issns, &options(), &mut out)
            .await
            .unwrap();
        assert_eq!(stats, HarvestStats::default());
        assert!(out.is_empty());
    }
}
