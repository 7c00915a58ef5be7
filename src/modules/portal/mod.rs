//! ISSN portal (portal.issn.org) integration
//!
//! The portal publishes a sitemap index pointing at about forty sub sitemaps,
//! each listing up to 50000 ISSN resources. Sitemaps are cached per day on disk;
//! the public JSON-LD record of every ISSN can then be downloaded in bulk.

pub mod cache;
pub mod harvest;
pub mod resume;
pub mod sitemap;

use std::time::Duration;

pub use cache::Cacher;
pub use harvest::{HarvestOptions, HarvestStats, harvest};
pub use resume::resume_dump;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

pub fn build_client(user_agent: &str) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}

/// Why a single GET did not produce a body.
#[derive(Debug)]
pub enum GetError {
    /// Connection, timeout or body read failure
    Transport(String),
    /// Response with a status of 400 or above
    Status(reqwest::StatusCode, String),
}

impl GetError {
    /// Connection problems, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            GetError::Transport(_) => true,
            GetError::Status(status, _) => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
        }
    }
}

impl std::fmt::Display for GetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetError::Transport(msg) | GetError::Status(_, msg) => write!(f, "{}", msg),
        }
    }
}

/// One GET without any retry.
pub async fn get_once(client: &reqwest::Client, url: &str) -> Result<String, GetError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| GetError::Transport(format!("Request failed for {}: {}", url, e)))?;

    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(GetError::Status(status, format!("got {} on {}", status, url)));
    }

    resp.text()
        .await
        .map_err(|e| GetError::Transport(format!("Failed to read body of {}: {}", url, e)))
}

/// Delay before retry number `attempt` (starting at 1): doubling from
/// `INITIAL_BACKOFF`, capped at `MAX_BACKOFF`.
pub fn backoff(attempt: u32) -> Duration {
    INITIAL_BACKOFF
        .saturating_mul(1 << attempt.saturating_sub(1).min(16))
        .min(MAX_BACKOFF)
}

/// GETs `url` and returns the body.
///
/// Connection errors, 429 and 5xx responses are retried up to `retries` times
/// with doubling backoff; other statuses of 400 and above fail immediately.
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    retries: u32,
) -> Result<String, String> {
    let mut attempt = 0;

    loop {
        let failure = match get_once(client, url).await {
            Ok(body) => return Ok(body),
            Err(e) if !e.is_transient() => return Err(e.to_string()),
            Err(e) => e,
        };

        if attempt >= retries {
            return Err(failure.to_string());
        }
        attempt += 1;
        tracing::warn!("{} (retry {}/{})", failure, attempt, retries);
        tokio::time::sleep(backoff(attempt)).await;
    }
}
