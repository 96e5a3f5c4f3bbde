// src/ingest/pipeline.rs
//! Fan-out over (category, event) pairs and fan-in into one report.
//!
//! Each pair is one provider call. At most `max_concurrency` calls are in
//! flight, each bounded by `call_timeout`. A failing pair is recorded in
//! `failures` and the remaining pairs still make it into the report, in pair
//! order regardless of completion order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, gauge, histogram};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::PipelineConfig;
use crate::ingest::aggregate::{aggregate, dedup, DedupKey};
use crate::ingest::ensure_metrics_described;
use crate::ingest::error::ProviderError;
use crate::ingest::filter::Whitelist;
use crate::ingest::normalize::normalize_outcome;
use crate::ingest::types::{NewsProvider, ProviderQuery, RawProviderResult};
use crate::record::{ErrorInfo, RecordCollection, Task};
use crate::stats::{count_by_category, count_by_publisher, summarize, BreakdownEntry, Summary};

/// One unit of fan-out: the caller's labels plus the text sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPair {
    pub category: String,
    pub event: String,
    pub query: String,
}

impl QueryPair {
    /// Search flow: the provider is asked for `"<category> <event>"`.
    pub fn search(category: &str, event: &str) -> Self {
        Self {
            category: category.to_string(),
            event: event.to_string(),
            query: format!("{category} {event}"),
        }
    }

    /// API flow: the provider is asked for the event alone.
    pub fn event_only(category: &str, event: &str) -> Self {
        Self {
            category: category.to_string(),
            event: event.to_string(),
            query: event.to_string(),
        }
    }
}

/// Every category × event combination, categories outermost.
pub fn search_pairs<C, E>(categories: &[C], events: &[E]) -> Vec<QueryPair>
where
    C: AsRef<str>,
    E: AsRef<str>,
{
    categories
        .iter()
        .flat_map(|c| events.iter().map(move |e| QueryPair::search(c.as_ref(), e.as_ref())))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub period_days: u32,
    pub max_results: usize,
    pub max_concurrency: usize,
    pub call_timeout: Duration,
    pub dedup: Option<DedupKey>,
}

impl From<&PipelineConfig> for PipelineSettings {
    fn from(cfg: &PipelineConfig) -> Self {
        Self {
            period_days: cfg.period_days,
            max_results: cfg.max_results,
            max_concurrency: cfg.max_concurrency,
            call_timeout: Duration::from_secs(cfg.request_timeout_secs),
            dedup: cfg.dedup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFailure {
    pub category: String,
    pub event: String,
    pub task: Task,
    #[serde(flatten)]
    pub error: ErrorInfo,
}

/// Everything the presentation layer needs from one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub records: RecordCollection,
    pub summary: Summary,
    pub by_publisher: Vec<BreakdownEntry>,
    pub by_category: Vec<BreakdownEntry>,
    pub failures: Vec<PairFailure>,
    pub filtered: usize,
    pub deduplicated: usize,
}

impl PipelineReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct Pipeline {
    provider: Arc<dyn NewsProvider>,
    whitelist: Whitelist,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn NewsProvider>, whitelist: Whitelist, settings: PipelineSettings) -> Self {
        Self {
            provider,
            whitelist,
            settings,
        }
    }

    /// Run every pair, then apply `selection` to the aggregated set.
    ///
    /// Per pair: fetch → normalize → pipeline whitelist. After fan-in:
    /// aggregate → `selection` → optional dedup → stats.
    pub async fn run(&self, pairs: &[QueryPair], selection: &Whitelist) -> PipelineReport {
        ensure_metrics_described();
        counter!("news_pipeline_runs_total").increment(1);

        let outcomes = self.fetch_all(pairs).await;
        let task = self.provider.task();

        let mut collections = Vec::with_capacity(pairs.len());
        let mut failures = Vec::new();
        let mut filtered = 0usize;

        for (pair, outcome) in pairs.iter().zip(outcomes) {
            let normalized = outcome
                .map_err(|e| ErrorInfo::from(&e))
                .and_then(|raw| normalize_outcome(&raw, &pair.category, &pair.event, task));

            match normalized {
                Ok(records) => {
                    let (kept, removed) = self.whitelist.apply(records);
                    filtered += removed;
                    if kept.is_empty() {
                        tracing::warn!(
                            category = %pair.category,
                            event = %pair.event,
                            "no results after whitelist filtering"
                        );
                    }
                    collections.push(kept);
                }
                Err(error) => {
                    tracing::warn!(
                        provider = self.provider.name(),
                        category = %pair.category,
                        event = %pair.event,
                        error = %error,
                        "pair failed, continuing with the rest"
                    );
                    counter!("news_provider_errors_total", "provider" => task.as_str()).increment(1);
                    failures.push(PairFailure {
                        category: pair.category.clone(),
                        event: pair.event.clone(),
                        task,
                        error,
                    });
                }
            }
        }

        let records = aggregate(collections);
        let (records, removed) = selection.apply(records);
        filtered += removed;

        let (records, deduplicated) = match self.settings.dedup {
            Some(key) => dedup(records, key),
            None => (records, 0),
        };

        counter!("news_records_kept_total").increment(records.len() as u64);
        counter!("news_records_filtered_total").increment(filtered as u64);
        counter!("news_records_dedup_total").increment(deduplicated as u64);
        gauge!("news_pipeline_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        tracing::info!(
            target: "pipeline",
            provider = self.provider.name(),
            pairs = pairs.len(),
            kept = records.len(),
            filtered,
            deduplicated,
            failures = failures.len(),
            "pipeline run finished"
        );

        PipelineReport {
            summary: summarize(&records),
            by_publisher: count_by_publisher(&records),
            by_category: count_by_category(&records),
            records,
            failures,
            filtered,
            deduplicated,
        }
    }

    /// Bounded fan-out; results come back indexed like `pairs`.
    async fn fetch_all(&self, pairs: &[QueryPair]) -> Vec<Result<RawProviderResult, ProviderError>> {
        let sem = Arc::new(Semaphore::new(self.settings.max_concurrency.max(1)));
        let mut join_set = JoinSet::new();

        for (idx, pair) in pairs.iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let sem = Arc::clone(&sem);
            let budget = self.settings.call_timeout;
            let query = ProviderQuery::new(
                pair.query.clone(),
                self.settings.period_days,
                self.settings.max_results,
            );

            join_set.spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                let t0 = Instant::now();
                let res = match tokio::time::timeout(budget, provider.fetch(&query)).await {
                    Ok(res) => res,
                    Err(_) => Err(ProviderError::Timeout(budget)),
                };
                histogram!("news_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
                (idx, res)
            });
        }

        let mut slots: Vec<Option<Result<RawProviderResult, ProviderError>>> =
            std::iter::repeat_with(|| None).take(pairs.len()).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, res)) => slots[idx] = Some(res),
                Err(e) => tracing::warn!(error = %e, "fetch task join error"),
            }
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(ProviderError::Aborted(
                        "fetch task ended without a result".to_string(),
                    ))
                })
            })
            .collect()
    }
}
