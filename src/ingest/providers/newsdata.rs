// src/ingest/providers/newsdata.rs
//! NewsData.io API adapter.
//!
//! One GET per call, no retry. A non-2xx answer is not an `Err`: it comes back
//! as the `{error, message}` body so the caller can show it.

use async_trait::async_trait;
use metrics::counter;
use serde_json::Value;

use crate::config::{ConfigError, PipelineConfig};
use crate::ingest::error::ProviderError;
use crate::ingest::types::{NewsProvider, ProviderQuery, RawProviderResult};
use crate::record::Task;

pub const NEWSDATA_BASE_URL: &str = "https://newsdata.io/api/1/news";

pub struct NewsDataProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    domains: Vec<String>,
    language: String,
}

impl NewsDataProvider {
    /// Requires `newsdata_api_key`; without it the adapter does not exist.
    pub fn from_config(client: reqwest::Client, cfg: &PipelineConfig) -> Result<Self, ConfigError> {
        let api_key = cfg.api_key()?.to_string();
        Ok(Self {
            client,
            base_url: NEWSDATA_BASE_URL.to_string(),
            api_key,
            domains: cfg.publishers.clone(),
            language: cfg.language.clone(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn params(&self, q: &ProviderQuery) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", self.api_key.clone()),
            ("q", q.query.clone()),
            ("domain", self.domains.join(",")),
            ("language", self.language.clone()),
        ]
    }
}

#[async_trait]
impl NewsProvider for NewsDataProvider {
    async fn fetch(&self, q: &ProviderQuery) -> Result<RawProviderResult, ProviderError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&self.params(q))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            tracing::warn!(status = status.as_u16(), provider = self.name(), "api returned error status");
            return Ok(RawProviderResult::api_error(status.as_u16(), body));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("newsdata json: {e}")))?;
        let raw = RawProviderResult::Api(body);
        counter!("news_items_fetched_total").increment(raw.item_count() as u64);
        Ok(raw)
    }

    fn task(&self) -> Task {
        Task::NewsdataIo
    }

    fn name(&self) -> &'static str {
        "NewsData.io"
    }
}
