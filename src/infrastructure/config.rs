use std::env;
use std::path::PathBuf;

pub const APP_NAME: &str = "issnlister";

pub const DEFAULT_SITEMAP: &str = "https://portal.issn.org/sitemap.xml";
pub const DEFAULT_PORTAL_URL: &str = "https://portal.issn.org";
pub const DEFAULT_USER_AGENT: &str = "issnlister/0.3 (https://github.com/miku/issnlister)";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_RETRIES: u32 = 3;
/// Records are tried ten times in total.
pub const DEFAULT_RECORD_RETRIES: u32 = 9;

/// Settings of the portal harvester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    pub sitemap_index: String,
    pub portal_url: String,
    pub cache_dir: PathBuf,
    pub user_agent: String,
    pub workers: usize,
    pub batch_size: usize,
    /// Retries of transient failures when fetching sitemaps
    pub retries: u32,
    /// Retries of any failure when fetching a single record
    pub record_retries: u32,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            sitemap_index: DEFAULT_SITEMAP.to_string(),
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            cache_dir: default_cache_dir(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            workers: default_workers(),
            batch_size: DEFAULT_BATCH_SIZE,
            retries: DEFAULT_RETRIES,
            record_retries: DEFAULT_RECORD_RETRIES,
        }
    }
}

impl HarvestConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            sitemap_index: env::var("ISSNLISTER_SITEMAP").unwrap_or(defaults.sitemap_index),
            portal_url: env::var("ISSNLISTER_PORTAL_URL").unwrap_or(defaults.portal_url),
            cache_dir: env::var("ISSNLISTER_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            user_agent: env::var("ISSNLISTER_USER_AGENT").unwrap_or(defaults.user_agent),
            workers: env::var("ISSNLISTER_WORKERS")
                .ok()
                .and_then(|w| w.parse().ok())
                .filter(|w| *w > 0)
                .unwrap_or(defaults.workers),
            batch_size: env::var("ISSNLISTER_BATCH_SIZE")
                .ok()
                .and_then(|b| b.parse().ok())
                .filter(|b| *b > 0)
                .unwrap_or(defaults.batch_size),
            retries: env::var("ISSNLISTER_RETRIES")
                .ok()
                .and_then(|r| r.parse().ok())
                .unwrap_or(defaults.retries),
            record_retries: env::var("ISSNLISTER_RECORD_RETRIES")
                .ok()
                .and_then(|r| r.parse().ok())
                .unwrap_or(defaults.record_retries),
        }
    }
}

/// `$XDG_CACHE_HOME/issnlister` on Linux, the platform cache directory elsewhere.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_NAME)
}

/// Twice the number of CPUs.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 8] = [
        "ISSNLISTER_SITEMAP",
        "ISSNLISTER_PORTAL_URL",
        "ISSNLISTER_CACHE_DIR",
        "ISSNLISTER_USER_AGENT",
        "ISSNLISTER_WORKERS",
        "ISSNLISTER_BATCH_SIZE",
        "ISSNLISTER_RETRIES",
        "ISSNLISTER_RECORD_RETRIES",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: tests touching the environment run serially
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = HarvestConfig::from_env();
        assert_eq!(config, HarvestConfig::default());
        assert!(config.cache_dir.ends_with(APP_NAME));
        assert!(config.workers >= 2);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("ISSNLISTER_CACHE_DIR", "/tmp/issn-cache");
            env::set_var("ISSNLISTER_WORKERS", "3");
            env::set_var("ISSNLISTER_BATCH_SIZE", "0");
            env::set_var("ISSNLISTER_RETRIES", "many");
            env::set_var("ISSNLISTER_RECORD_RETRIES", "4");
        }

        let config = HarvestConfig::from_env();
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/issn-cache"));
        assert_eq!(config.workers, 3);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.retries, DEFAULT_RETRIES);
        assert_eq!(config.record_retries, 4);

        clear_env();
    }
}
