// src/ingest/aggregate.rs
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::record::{NewsRecord, RecordCollection};

/// Concatenate per-query collections in input order. No sort, no dedup.
pub fn aggregate<I>(collections: I) -> RecordCollection
where
    I: IntoIterator<Item = RecordCollection>,
{
    let mut out = RecordCollection::new();
    for mut c in collections {
        out.append(&mut c);
    }
    out
}

/// Identity used to spot the same article returned by two queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupKey {
    Link,
    ContentHash,
}

impl DedupKey {
    fn key_of(self, rec: &NewsRecord) -> Option<String> {
        match self {
            DedupKey::Link => rec.link.as_deref().map(|l| l.trim().to_string()),
            DedupKey::ContentHash => content_hash(rec),
        }
    }
}

/// SHA-256 over lowercased title and content; `None` when both are null.
pub fn content_hash(rec: &NewsRecord) -> Option<String> {
    if rec.title.is_none() && rec.content.is_none() {
        return None;
    }
    let mut h = Sha256::new();
    h.update(rec.title.as_deref().unwrap_or_default().to_lowercase());
    h.update([0x1f_u8]);
    h.update(rec.content.as_deref().unwrap_or_default().to_lowercase());
    Some(format!("{:x}", h.finalize()))
}

/// Drop later repeats of the same key; returns (kept, removed count).
/// Records without a key (and error-records) are always kept.
pub fn dedup(records: RecordCollection, key: DedupKey) -> (RecordCollection, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());
    let mut removed = 0usize;

    for rec in records {
        if !rec.is_error() {
            if let Some(k) = key.key_of(&rec) {
                if !seen.insert(k) {
                    removed += 1;
                    continue;
                }
            }
        }
        kept.push(rec);
    }

    (kept, removed)
}
