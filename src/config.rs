use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::query::PageSizes;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api: ApiConfig,
    pub page_sizes: PageSizes,
    pub search_debounce: Duration,
    pub tick_rate: Duration,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("INCIDENTS_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = parse_positive(&lookup, "INCIDENTS_HTTP_TIMEOUT_SECS", 10)?;

        let page_sizes = match lookup("INCIDENTS_PAGE_SIZES") {
            Some(raw) => {
                let sizes = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<u32>()
                            .ok()
                            .filter(|n| *n > 0)
                            .with_context(|| format!("INCIDENTS_PAGE_SIZES: invalid size '{s}'"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                PageSizes::new(sizes).context("INCIDENTS_PAGE_SIZES")?
            }
            None => PageSizes::default(),
        };

        let debounce_ms = parse_positive(&lookup, "INCIDENTS_SEARCH_DEBOUNCE_MS", 500)?;
        let tick_ms = parse_positive(&lookup, "INCIDENTS_TICK_MS", 250)?;

        let log_file = lookup("INCIDENTS_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("incident_tui.log"));

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            page_sizes,
            search_debounce: Duration::from_millis(debounce_ms),
            tick_rate: Duration::from_millis(tick_ms),
            log_file,
        })
    }
}

fn parse_positive<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .with_context(|| format!("{key} must be a positive integer, got '{raw}'")),
    }
}
