// src/api.rs
//! HTTP surface for the dashboard front end.
//!
//! Routes:
//! - `GET  /health`
//! - `GET  /options`              selectable publishers/categories/events
//! - `POST /google-news/search`   category × event search via Google News
//! - `POST /newsdata/fetch`       single event query via NewsData.io

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::{ConfigError, PipelineConfig};
use crate::ingest::filter::Whitelist;
use crate::ingest::pipeline::{search_pairs, Pipeline, PipelineReport, PipelineSettings, QueryPair};
use crate::ingest::providers::{GoogleNewsProvider, NewsDataProvider};
use crate::ingest::types::NewsProvider;
use crate::record::ErrorInfo;

pub const NO_RESULTS_MESSAGE: &str = "No results found for the selected criteria.";

/// Slider bounds from the dashboard.
pub const DAYS_RANGE: (u32, u32) = (1, 7);
pub const MAX_RESULTS_RANGE: (usize, usize) = (5, 50);

#[derive(Clone)]
pub struct AppState {
    config: Arc<PipelineConfig>,
    google: Arc<dyn NewsProvider>,
    /// `Err` when the API key is missing: the route stays up and says why.
    newsdata: Result<Arc<dyn NewsProvider>, ConfigError>,
}

impl AppState {
    /// Wire the real providers behind one shared HTTP client.
    pub fn from_config(config: PipelineConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("Mozilla/5.0 (compatible; NewsDashboard/0.1)")
            .build()?;

        let google: Arc<dyn NewsProvider> =
            Arc::new(GoogleNewsProvider::new(client.clone(), config.language.clone()));
        let newsdata = NewsDataProvider::from_config(client, &config)
            .map(|p| Arc::new(p) as Arc<dyn NewsProvider>);
        if let Err(e) = &newsdata {
            tracing::warn!(error = %e, "NewsData.io adapter disabled");
        }

        Ok(Self::with_providers(config, google, newsdata))
    }

    pub fn with_providers(
        config: PipelineConfig,
        google: Arc<dyn NewsProvider>,
        newsdata: Result<Arc<dyn NewsProvider>, ConfigError>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            google,
            newsdata,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/options", get(options))
        .route("/google-news/search", post(google_news_search))
        .route("/newsdata/fetch", post(newsdata_fetch))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct OptionsResp {
    pub publishers: Vec<String>,
    pub categories: Vec<String>,
    pub events: Vec<String>,
    pub default_publishers: Vec<String>,
    pub default_categories: Vec<String>,
    pub default_events: Vec<String>,
    pub newsdata_enabled: bool,
}

async fn options(State(state): State<AppState>) -> Json<OptionsResp> {
    let cfg: &PipelineConfig = &state.config;
    Json(OptionsResp {
        publishers: cfg.publishers.clone(),
        categories: cfg.categories.clone(),
        events: cfg.events.clone(),
        default_publishers: first_n(&cfg.publishers, 3),
        default_categories: first_n(&cfg.categories, 2),
        default_events: first_n(&cfg.events, 2),
        newsdata_enabled: state.newsdata.is_ok(),
    })
}

fn first_n(v: &[String], n: usize) -> Vec<String> {
    v.iter().take(n).cloned().collect()
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SearchReq {
    pub categories: Option<Vec<String>>,
    pub events: Option<Vec<String>>,
    /// Post-filter. Missing: first three publishers; empty: no restriction.
    pub publishers: Option<Vec<String>>,
    pub days: Option<u32>,
    pub max_results: Option<usize>,
}

#[derive(Deserialize, Debug)]
pub struct FetchReq {
    pub event: String,
    pub category: String,
    #[serde(default)]
    pub publishers: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchResp {
    #[serde(flatten)]
    pub report: PipelineReport,
    /// Set when nothing survived the filters.
    pub message: Option<String>,
}

impl From<PipelineReport> for SearchResp {
    fn from(report: PipelineReport) -> Self {
        let message = report.is_empty().then(|| NO_RESULTS_MESSAGE.to_string());
        Self { report, message }
    }
}

/// Error payload: `{ "error": .., "message": .. }` with a matching status.
pub struct ApiError(StatusCode, ErrorInfo);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

fn bad_request(message: String) -> ApiError {
    ApiError(StatusCode::BAD_REQUEST, ErrorInfo::new("Bad request", message))
}

/// Every selected value must be one of the configured options.
fn check_selection(kind: &str, selected: &[String], allowed: &[String]) -> Result<(), ApiError> {
    match selected.iter().find(|s| !allowed.contains(s)) {
        Some(unknown) => Err(bad_request(format!("unknown {kind}: {unknown}"))),
        None => Ok(()),
    }
}

async fn google_news_search(
    State(state): State<AppState>,
    Json(req): Json<SearchReq>,
) -> Result<Json<SearchResp>, ApiError> {
    let cfg: &PipelineConfig = &state.config;
    let categories = req.categories.unwrap_or_else(|| first_n(&cfg.categories, 2));
    let events = req.events.unwrap_or_else(|| first_n(&cfg.events, 2));
    let publishers = req.publishers.unwrap_or_else(|| first_n(&cfg.publishers, 3));
    check_selection("category", &categories, &cfg.categories)?;
    check_selection("event", &events, &cfg.events)?;
    check_selection("publisher", &publishers, &cfg.publishers)?;

    let mut settings = PipelineSettings::from(cfg);
    settings.period_days = req
        .days
        .unwrap_or(cfg.period_days)
        .clamp(DAYS_RANGE.0, DAYS_RANGE.1);
    settings.max_results = req
        .max_results
        .unwrap_or(cfg.max_results)
        .clamp(MAX_RESULTS_RANGE.0, MAX_RESULTS_RANGE.1);

    let pipeline = Pipeline::new(state.google.clone(), cfg.whitelist(), settings);
    let pairs = search_pairs(&categories, &events);
    let report = pipeline.run(&pairs, &Whitelist::publishers(publishers)).await;
    Ok(Json(report.into()))
}

async fn newsdata_fetch(
    State(state): State<AppState>,
    Json(req): Json<FetchReq>,
) -> Result<Json<SearchResp>, ApiError> {
    let provider = match &state.newsdata {
        Ok(p) => p.clone(),
        Err(e) => {
            return Err(ApiError(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorInfo::new("NewsData.io disabled", e.to_string()),
            ))
        }
    };
    let cfg: &PipelineConfig = &state.config;
    check_selection("category", std::slice::from_ref(&req.category), &cfg.categories)?;
    check_selection("event", std::slice::from_ref(&req.event), &cfg.events)?;
    let publishers = req.publishers.unwrap_or_else(|| first_n(&cfg.publishers, 3));
    check_selection("publisher", &publishers, &cfg.publishers)?;

    // The API already restricts by domain; only the user's selection applies.
    let pipeline = Pipeline::new(provider, Whitelist::default(), PipelineSettings::from(cfg));
    let pairs = [QueryPair::event_only(&req.category, &req.event)];
    let mut report = pipeline.run(&pairs, &Whitelist::publishers(publishers)).await;

    if let Some(failure) = report.failures.pop() {
        return Err(ApiError(StatusCode::BAD_GATEWAY, failure.error));
    }
    Ok(Json(report.into()))
}
