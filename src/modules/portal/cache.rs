//! Day-versioned sitemap cache.
//!
//! Layout: `<dir>/<YYYY-MM-DD>/sitemap.xml` for the index, one file per sub
//! sitemap named after the last segment of its location, and `issnlist.tsv`
//! with the sorted ISSN extracted from all of them.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::{fetch_text, sitemap};
use crate::utils::atomic;

pub const INDEX_FILENAME: &str = "sitemap.xml";
pub const LIST_FILENAME: &str = "issnlist.tsv";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct Cacher {
    pub directory: PathBuf,
    pub prefix: String,
    pub sitemap_index: String,
    client: reqwest::Client,
    retries: u32,
}

impl Cacher {
    /// A cache rooted at `directory`, versioned by today's local date.
    pub fn new(
        directory: impl Into<PathBuf>,
        sitemap_index: impl Into<String>,
        client: reqwest::Client,
        retries: u32,
    ) -> Self {
        Self {
            directory: directory.into(),
            prefix: chrono::Local::now().format(DATE_FORMAT).to_string(),
            sitemap_index: sitemap_index.into(),
            client,
            retries,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn sitemap_dir(&self) -> PathBuf {
        self.directory.join(&self.prefix)
    }

    pub fn sitemap_file(&self) -> PathBuf {
        self.sitemap_dir().join(INDEX_FILENAME)
    }

    pub fn serial_numbers_file(&self) -> PathBuf {
        self.sitemap_dir().join(LIST_FILENAME)
    }

    async fn fetch_to(&self, url: &str, path: &Path) -> Result<(), String> {
        let body = fetch_text(&self.client, url, self.retries)
            .await
            .map_err(|e| format!("failed to fetch sitemap: {}", e))?;
        atomic::write_file(path, body.as_bytes())
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }

    pub async fn fetch_sitemap_index(&self) -> Result<(), String> {
        ensure_dir(&self.sitemap_dir()).await?;
        let path = self.sitemap_file();
        if path.exists() {
            return Ok(());
        }
        self.fetch_to(&self.sitemap_index, &path).await
    }

    /// Sub sitemap locations listed in the (cached) index.
    pub async fn find_locations(&self) -> Result<Vec<String>, String> {
        self.fetch_sitemap_index().await?;
        let path = self.sitemap_file();
        let xml = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        sitemap::extract_locs(&xml)
    }

    /// Downloads every sub sitemap not cached yet and returns the cached paths.
    pub async fn fetch_sitemaps(&self) -> Result<Vec<PathBuf>, String> {
        let mut paths = Vec::new();
        for loc in self.find_locations().await? {
            let Some(name) = sitemap::last_segment(&loc) else {
                tracing::warn!("Skipping sitemap location without file name: {}", loc);
                continue;
            };
            if name == INDEX_FILENAME || name == LIST_FILENAME {
                tracing::warn!("Skipping sitemap location with reserved name: {}", loc);
                continue;
            }
            let path = self.sitemap_dir().join(&name);
            if path.exists() {
                tracing::info!("{} cached at {}", loc, path.display());
            } else {
                tracing::info!("{}", loc);
                self.fetch_to(&loc, &path).await?;
            }
            paths.push(path);
        }
        Ok(paths)
    }

    /// All ISSN found in the sitemaps, sorted and without duplicates.
    ///
    /// The list is computed once per day and then served from `issnlist.tsv`.
    pub async fn list(&self) -> Result<Vec<String>, String> {
        let list_file = self.serial_numbers_file();
        if list_file.exists() {
            let content = tokio::fs::read_to_string(&list_file)
                .await
                .map_err(|e| format!("Failed to read {}: {}", list_file.display(), e))?;
            return Ok(split_list(&content));
        }

        let paths = self.fetch_sitemaps().await?;
        let tasks = paths.into_iter().map(|path| {
            tokio::task::spawn_blocking(move || -> Result<Vec<String>, String> {
                let xml = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
                sitemap::issns_from_urlset(&xml).map_err(|e| format!("{}: {}", path.display(), e))
            })
        });

        let mut issns = Vec::new();
        for result in futures::future::join_all(tasks).await {
            let found = result.map_err(|e| format!("Sitemap task failed: {}", e))??;
            issns.extend(found);
        }
        issns.sort();
        issns.dedup();
        tracing::info!("{} ISSN found in sitemaps", issns.len());

        atomic::write_file(&list_file, issns.join("\n").as_bytes())
            .map_err(|e| format!("Failed to write {}: {}", list_file.display(), e))?;
        Ok(issns)
    }
}

fn split_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

async fn ensure_dir(dir: &Path) -> Result<(), String> {
    if tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
    tracing::info!("created directory at: {}", dir.display());
    Ok(())
}

/// The list file of the most recent day that has one.
pub fn latest_serial_numbers_file(directory: &Path) -> Option<PathBuf> {
    let mut days: Vec<(NaiveDate, PathBuf)> = std::fs::read_dir(directory)
        .ok()?
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name();
            let date = NaiveDate::parse_from_str(name.to_str()?, DATE_FORMAT).ok()?;
            Some((date, entry.path()))
        })
        .collect();
    days.sort_by(|a, b| b.0.cmp(&a.0));

    days.into_iter()
        .map(|(_, dir)| dir.join(LIST_FILENAME))
        .find(|file| file.is_file())
}
