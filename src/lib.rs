// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod ingest;
pub mod telemetry;
pub mod record;
pub mod stats;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::PipelineConfig;
pub use crate::ingest::aggregate::{aggregate, dedup, DedupKey};
pub use crate::ingest::filter::{filter, Whitelist};
pub use crate::ingest::normalize::{normalize, normalize_outcome};
pub use crate::ingest::pipeline::{Pipeline, PipelineReport, QueryPair};
pub use crate::ingest::types::{NewsProvider, ProviderQuery, RawProviderResult};
pub use crate::record::{ErrorInfo, NewsRecord, RecordCollection, Task};
pub use crate::stats::{summarize, Summary};

use tracing::info;

/// Build the full application router (API + `/metrics`) from on-disk config
/// and the environment. Installs the Prometheus recorder, so call it once.
pub fn app() -> anyhow::Result<axum::Router> {
    let config = PipelineConfig::load_default()?;
    info!(
        publishers = config.publishers.len(),
        categories = config.categories.len(),
        events = config.events.len(),
        newsdata = config.newsdata_api_key.is_some(),
        "news config loaded"
    );
    let state = api::AppState::from_config(config)?;
    let metrics = telemetry::Metrics::init()?;
    Ok(router(state).merge(metrics.router()))
}
