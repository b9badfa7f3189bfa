//! Source locations and network settings.

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_CBA_URL: &str = "https://www.indec.gob.ar/ftp/cuadros/sociedad/serie_cba_cbt.xls";
pub const DEFAULT_CANASTA_URL: &str =
    "https://www.indec.gob.ar/ftp/cuadros/sociedad/serie_canasta_crianza.xlsx";
pub const DEFAULT_WAGE_URL: &str = "https://upacp.org.ar/?page_id=26745";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub cba_url: String,
    pub canasta_url: String,
    pub wage_url: String,
    pub timeout: Duration,
    /// `None` keeps fetched values for the lifetime of the store.
    pub cache_ttl: Option<Duration>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            cba_url: DEFAULT_CBA_URL.to_string(),
            canasta_url: DEFAULT_CANASTA_URL.to_string(),
            wage_url: DEFAULT_WAGE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: None,
        }
    }
}

impl SourceConfig {
    /// Defaults overridden by `CRIANZA_*` variables (an optional `.env` is loaded first).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_blank("CRIANZA_CBA_URL") {
            config.cba_url = url;
        }
        if let Some(url) = non_blank("CRIANZA_CANASTA_URL") {
            config.canasta_url = url;
        }
        if let Some(url) = non_blank("CRIANZA_WAGE_URL") {
            config.wage_url = url;
        }
        if let Some(raw) = non_blank("CRIANZA_HTTP_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_secs("CRIANZA_HTTP_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = non_blank("CRIANZA_CACHE_TTL_SECS") {
            config.cache_ttl = Some(Duration::from_secs(parse_secs("CRIANZA_CACHE_TTL_SECS", &raw)?));
        }

        Ok(config)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AppError::usage(format!("{key} must be a whole number of seconds, got '{raw}'.")))
}
