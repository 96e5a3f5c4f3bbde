//! Error types for the provider adapters

use std::time::Duration;

use thiserror::Error;

use crate::record::ErrorInfo;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure (connect, TLS, body read)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx answer where the provider has no error body contract
    #[error("unexpected status {0}")]
    Status(u16),

    /// Body did not have the expected shape
    #[error("parse error: {0}")]
    Parse(String),

    /// Call exceeded the per-call budget
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Fan-out task died before reporting
    #[error("task aborted: {0}")]
    Aborted(String),
}

impl ProviderError {
    /// Short label used as the `error` half of [`ErrorInfo`].
    pub fn label(&self) -> &'static str {
        match self {
            ProviderError::Request(_) => "Request failed",
            ProviderError::Status(_) => "Bad status",
            ProviderError::Parse(_) => "Parse error",
            ProviderError::Timeout(_) => "Timeout",
            ProviderError::Aborted(_) => "Aborted",
        }
    }
}

impl From<&ProviderError> for ErrorInfo {
    fn from(e: &ProviderError) -> Self {
        ErrorInfo::new(e.label(), e.to_string())
    }
}
