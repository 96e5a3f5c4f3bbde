// src/ingest/filter.rs
use std::collections::BTreeSet;

use crate::record::{NewsRecord, RecordCollection};

/// Exact membership. `None` is never a member; an empty set admits everything.
pub fn is_whitelisted(value: Option<&str>, allowed: &BTreeSet<String>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    value.is_some_and(|v| allowed.contains(v))
}

/// Keep records whose publisher is in `allowed_publishers`.
pub fn filter(records: RecordCollection, allowed_publishers: &BTreeSet<String>) -> RecordCollection {
    if allowed_publishers.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| is_whitelisted(r.publisher.as_deref(), allowed_publishers))
        .collect()
}

/// Allow-lists for publishers, categories and events. Each empty list means
/// "no restriction" on that column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    pub publishers: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub events: BTreeSet<String>,
}

impl Whitelist {
    pub fn publishers<I, S>(publishers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            publishers: publishers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.publishers.is_empty() && self.categories.is_empty() && self.events.is_empty()
    }

    pub fn admits(&self, rec: &NewsRecord) -> bool {
        is_whitelisted(rec.publisher.as_deref(), &self.publishers)
            && is_whitelisted(Some(rec.category.as_str()), &self.categories)
            && is_whitelisted(Some(rec.event.as_str()), &self.events)
    }

    /// Filter a collection; returns (kept, removed count). Error-records pass.
    pub fn apply(&self, records: RecordCollection) -> (RecordCollection, usize) {
        if self.is_unrestricted() {
            return (records, 0);
        }
        let before = records.len();
        let kept: RecordCollection = records
            .into_iter()
            .filter(|r| r.is_error() || self.admits(r))
            .collect();
        let removed = before - kept.len();
        (kept, removed)
    }
}
