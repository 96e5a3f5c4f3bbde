//! # Summary statistics
//! Pure functions over the final [`RecordCollection`]: headline counts and the
//! per-publisher / per-category breakdowns the dashboard charts.
//!
//! Distinct counts and breakdowns skip null values, so a missing publisher
//! never shows up as if it were one.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::record::RecordCollection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub distinct_publishers: usize,
    pub distinct_categories: usize,
    /// Error-records included in `total`.
    pub errors: usize,
}

pub fn summarize(records: &RecordCollection) -> Summary {
    let publishers: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.publisher.as_deref())
        .collect();
    let categories: BTreeSet<&str> = records.iter().map(|r| r.category.as_str()).collect();

    Summary {
        total: records.len(),
        distinct_publishers: publishers.len(),
        distinct_categories: categories.len(),
        errors: records.iter().filter(|r| r.is_error()).count(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub count: usize,
}

/// Counts per label, highest first; ties keep first-seen order.
pub fn value_counts<'a, I>(values: I) -> Vec<BreakdownEntry>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<BreakdownEntry> = Vec::new();
    for v in values.into_iter().flatten() {
        match index.get(v) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(v, out.len());
                out.push(BreakdownEntry {
                    label: v.to_string(),
                    count: 1,
                });
            }
        }
    }
    // stable sort keeps first-seen order among equal counts
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

pub fn count_by_publisher(records: &RecordCollection) -> Vec<BreakdownEntry> {
    value_counts(records.iter().filter(|r| !r.is_error()).map(|r| r.publisher.as_deref()))
}

pub fn count_by_category(records: &RecordCollection) -> Vec<BreakdownEntry> {
    value_counts(
        records
            .iter()
            .filter(|r| !r.is_error())
            .map(|r| Some(r.category.as_str())),
    )
}
