// src/config/news.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ingest::aggregate::DedupKey;
use crate::ingest::filter::Whitelist;

pub const ENV_CONFIG_PATH: &str = "NEWS_CONFIG_PATH";
pub const ENV_API_KEY: &str = "NEWSDATAIO_API_KEY";

pub const DEFAULT_PUBLISHERS: [&str; 8] = [
    "Reuters",
    "Bloomberg",
    "Financial Times",
    "Wall Street Journal",
    "CNBC",
    "BBC News",
    "The Guardian",
    "The Economist",
];

pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "Economic Events",
    "Monetary Policy",
    "Market Analysis",
    "Financial Markets",
    "Economic Indicators",
];

pub const DEFAULT_EVENTS: [&str; 5] = [
    "Interest Rate Decision",
    "Inflation Report",
    "GDP Release",
    "Employment Data",
    "Central Bank Meeting",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("NEWSDATAIO_API_KEY not found in environment variables. Please add it to your .env file.")]
    MissingApiKey,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Pipeline settings and allow-lists, injected wherever they are needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub publishers: Vec<String>,
    pub categories: Vec<String>,
    pub events: Vec<String>,
    pub language: String,
    /// Search window in days.
    pub period_days: u32,
    /// Per-query cap on search results.
    pub max_results: usize,
    /// Provider calls in flight at once.
    pub max_concurrency: usize,
    pub request_timeout_secs: u64,
    /// Off unless set: `"link"` or `"content_hash"`.
    pub dedup: Option<DedupKey>,
    /// Never read from the file; comes from `NEWSDATAIO_API_KEY`.
    #[serde(skip)]
    pub newsdata_api_key: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            publishers: DEFAULT_PUBLISHERS.iter().map(|s| s.to_string()).collect(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            events: DEFAULT_EVENTS.iter().map(|s| s.to_string()).collect(),
            language: "en".to_string(),
            period_days: 1,
            max_results: 10,
            max_concurrency: 4,
            request_timeout_secs: 20,
            dedup: None,
            newsdata_api_key: None,
        }
    }
}

impl PipelineConfig {
    /// Load from an explicit path. TOML or JSON, picked by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading news config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing news config {}", path.display()))?;
        cfg.sanitized()
    }

    /// Load using env var + fallbacks, then pick up the API key:
    /// 1) $NEWS_CONFIG_PATH
    /// 2) config/news.toml
    /// 3) config/news.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let toml_p = PathBuf::from("config/news.toml");
            let json_p = PathBuf::from("config/news.json");
            if toml_p.exists() {
                Self::load_from(&toml_p)?
            } else if json_p.exists() {
                Self::load_from(&json_p)?
            } else {
                Self::default()
            }
        };
        cfg.newsdata_api_key = api_key_from_env();
        Ok(cfg)
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.newsdata_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Publisher allow-list applied to every provider batch.
    pub fn whitelist(&self) -> Whitelist {
        Whitelist::publishers(self.publishers.iter().cloned())
    }

    fn sanitized(mut self) -> Result<Self> {
        self.publishers = clean_list(self.publishers);
        self.categories = clean_list(self.categories);
        self.events = clean_list(self.events);
        self.language = self.language.trim().to_ascii_lowercase();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language.is_empty() {
            return Err(ConfigError::Invalid("language must not be empty".into()));
        }
        if self.period_days == 0 {
            return Err(ConfigError::Invalid("period_days must be at least 1".into()));
        }
        if self.max_results == 0 {
            return Err(ConfigError::Invalid("max_results must be at least 1".into()));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid("max_concurrency must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn api_key_from_env() -> Option<String> {
    std::env::var(ENV_API_KEY)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<PipelineConfig> {
    if hint_ext == "json" {
        return Ok(serde_json::from_str(s)?);
    }
    if hint_ext == "toml" {
        return Ok(toml::from_str(s)?);
    }
    // Unknown extension: JSON first, then TOML.
    if let Ok(v) = serde_json::from_str(s) {
        return Ok(v);
    }
    toml::from_str(s).map_err(|e| anyhow!("unsupported news config format: {e}"))
}

/// Trim, drop empties and repeats; first occurrence wins so list order (and
/// the UI defaults derived from it) is preserved.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|o| o == t) {
            out.push(t.to_string());
        }
    }
    out
}
