// src/record.rs
//! Canonical news record shared by every provider.
//!
//! All providers are mapped into [`NewsRecord`]. Optional fields serialize as
//! `null` (never skipped), so every record in a collection exposes the same
//! key set to the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys every serialized record carries, in column order.
pub const RECORD_FIELDS: [&str; 10] = [
    "title",
    "link",
    "content",
    "published_date",
    "publisher",
    "category",
    "event",
    "status",
    "task",
    "error",
];

/// Originating provider of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    GoogleNews,
    NewsdataIo,
}

impl Task {
    pub fn as_str(self) -> &'static str {
        match self {
            Task::GoogleNews => "google_news",
            Task::NewsdataIo => "newsdata_io",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle stage. Records only ever exist in the raw stage here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Raw,
}

/// Provider failure in presentable form (`error` is a short label, `message`
/// the provider's own text, e.g. the HTTP body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub error: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Shape used for non-2xx HTTP answers: `"Error: 403"` + body text.
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::new(format!("Error: {status}"), body)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: Option<String>,
    pub link: Option<String>,
    pub content: Option<String>,
    pub published_date: Option<String>,
    pub publisher: Option<String>,
    pub category: String,
    pub event: String,
    pub status: Status,
    pub task: Task,
    /// Set only on synthetic error-records.
    pub error: Option<ErrorInfo>,
}

impl NewsRecord {
    /// Empty raw record for `(category, event, task)`; canonical fields are null.
    pub fn new(category: &str, event: &str, task: Task) -> Self {
        Self {
            title: None,
            link: None,
            content: None,
            published_date: None,
            publisher: None,
            category: category.to_string(),
            event: event.to_string(),
            status: Status::Raw,
            task,
            error: None,
        }
    }

    pub fn error_record(info: ErrorInfo, category: &str, event: &str, task: Task) -> Self {
        Self {
            error: Some(info),
            ..Self::new(category, event, task)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Ordered records; insertion order is arrival order.
pub type RecordCollection = Vec<NewsRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_record_keeps_null_fields() {
        let rec = NewsRecord::new("Market Analysis", "GDP Release", Task::GoogleNews);
        let v = serde_json::to_value(&rec).unwrap();
        let obj = v.as_object().unwrap();
        for key in RECORD_FIELDS {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), RECORD_FIELDS.len());
        assert_eq!(v["status"], "raw");
        assert_eq!(v["task"], "google_news");
        assert!(v["publisher"].is_null());
    }

    #[test]
    fn error_record_is_flagged() {
        let rec = NewsRecord::error_record(
            ErrorInfo::http_status(403, "forbidden"),
            "Monetary Policy",
            "Inflation Report",
            Task::NewsdataIo,
        );
        assert!(rec.is_error());
        assert_eq!(rec.error.as_ref().unwrap().error, "Error: 403");
        assert_eq!(rec.task.to_string(), "newsdata_io");
    }
}
