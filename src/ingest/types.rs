// src/ingest/types.rs
use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::ingest::error::ProviderError;
use crate::record::Task;

/// One provider-native item: field names are whatever the provider used.
pub type RawItem = Map<String, Value>;

/// Provider output before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawProviderResult {
    /// Search-engine items (`title`, `link`, `desc`, `datetime`, `media`, ...).
    Search(Vec<RawItem>),
    /// API body: `{"results": [...]}` or `{"error": .., "message": ..}`.
    Api(Value),
}

impl RawProviderResult {
    pub fn empty_search() -> Self {
        RawProviderResult::Search(Vec::new())
    }

    /// Error structure returned by the API adapter on a non-2xx answer.
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        RawProviderResult::Api(json!({
            "error": format!("Error: {status}"),
            "message": body.into(),
        }))
    }

    /// Number of article items carried (0 for error-shaped input).
    pub fn item_count(&self) -> usize {
        match self {
            RawProviderResult::Search(items) => items.len(),
            RawProviderResult::Api(v) => v
                .get("results")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        }
    }
}

/// What a single provider call asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    pub query: String,
    pub period_days: u32,
    pub max_results: usize,
}

impl ProviderQuery {
    pub fn new(query: impl Into<String>, period_days: u32, max_results: usize) -> Self {
        Self {
            query: query.into(),
            period_days,
            max_results,
        }
    }
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch(&self, query: &ProviderQuery) -> Result<RawProviderResult, ProviderError>;
    fn task(&self) -> Task;
    fn name(&self) -> &'static str;
}
