// src/ingest/normalize.rs
//! Maps provider-native fields onto the canonical [`NewsRecord`] schema.

use serde_json::{Map, Value};

use crate::ingest::{html_to_text, normalize_text};
use crate::ingest::types::RawProviderResult;
use crate::record::{ErrorInfo, NewsRecord, RecordCollection, Task};

/// Source field name for each canonical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTable {
    pub title: &'static str,
    pub link: &'static str,
    pub content: &'static str,
    pub published_date: &'static str,
    pub publisher: &'static str,
    /// The content field carries an HTML fragment rather than plain text.
    pub content_is_html: bool,
}

pub const SEARCH_FIELDS: FieldTable = FieldTable {
    title: "title",
    link: "link",
    content: "desc",
    published_date: "datetime",
    publisher: "media",
    content_is_html: true,
};

pub const API_FIELDS: FieldTable = FieldTable {
    title: "title",
    link: "link",
    content: "description",
    published_date: "pubDate",
    publisher: "source_id",
    content_is_html: false,
};

/// Normalize one raw batch. Error-shaped API input becomes a single
/// error-record instead of an empty collection.
pub fn normalize(
    raw: &RawProviderResult,
    category: &str,
    event: &str,
    task: Task,
) -> RecordCollection {
    match normalize_outcome(raw, category, event, task) {
        Ok(records) => records,
        Err(info) => vec![NewsRecord::error_record(info, category, event, task)],
    }
}

/// Same mapping as [`normalize`], but failures stay out of band.
pub fn normalize_outcome(
    raw: &RawProviderResult,
    category: &str,
    event: &str,
    task: Task,
) -> Result<RecordCollection, ErrorInfo> {
    match raw {
        RawProviderResult::Search(items) => Ok(items
            .iter()
            .map(|it| map_item(Some(it), &SEARCH_FIELDS, category, event, task))
            .collect()),
        RawProviderResult::Api(body) => {
            if let Some(info) = api_error(body) {
                return Err(info);
            }
            let items = body
                .get("results")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            Ok(items
                .iter()
                .map(|it| map_item(it.as_object(), &API_FIELDS, category, event, task))
                .collect())
        }
    }
}

/// Detects the `{error, message}` structure and NewsData's in-body
/// `{"status": "error", "results": {"message": ..}}` variant.
fn api_error(body: &Value) -> Option<ErrorInfo> {
    let Some(obj) = body.as_object() else {
        return Some(ErrorInfo::new("Unknown error", "No message"));
    };

    if obj.contains_key("error") {
        let error = obj
            .get("error")
            .and_then(value_text)
            .unwrap_or_else(|| "Unknown error".to_string());
        let message = obj
            .get("message")
            .and_then(value_text)
            .unwrap_or_else(|| "No message".to_string());
        return Some(ErrorInfo::new(error, message));
    }

    if obj.get("status").and_then(Value::as_str) == Some("error") {
        let message = obj
            .get("results")
            .and_then(|r| r.get("message"))
            .and_then(value_text)
            .unwrap_or_else(|| "No message".to_string());
        return Some(ErrorInfo::new("Unknown error", message));
    }

    None
}

fn map_item(
    item: Option<&Map<String, Value>>,
    table: &FieldTable,
    category: &str,
    event: &str,
    task: Task,
) -> NewsRecord {
    let mut rec = NewsRecord::new(category, event, task);
    let Some(item) = item else {
        return rec;
    };
    let field = |name: &str| item.get(name).and_then(value_text);

    rec.title = field(table.title).map(|s| normalize_text(&s)).filter(|s| !s.is_empty());
    rec.link = field(table.link);
    let clean_content: fn(&str) -> String = if table.content_is_html { html_to_text } else { normalize_text };
    rec.content = field(table.content)
        .map(|s| clean_content(&s))
        .filter(|s| !s.is_empty());
    rec.published_date = field(table.published_date);
    rec.publisher = field(table.publisher);
    rec
}

/// Text form of a JSON scalar; `null` stays absent.
fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(v.to_string()),
        Value::Array(_) | Value::Object(_) => Some(v.to_string()),
    }
}
