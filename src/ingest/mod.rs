// src/ingest/mod.rs
pub mod aggregate;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod providers;
pub mod types;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("news_pipeline_runs_total", "Pipeline runs started.");
        describe_counter!(
            "news_items_fetched_total",
            "Article items returned by providers."
        );
        describe_counter!(
            "news_records_kept_total",
            "Records kept after normalization + filtering."
        );
        describe_counter!(
            "news_records_filtered_total",
            "Records removed by the whitelist."
        );
        describe_counter!("news_records_dedup_total", "Records removed by dedup.");
        describe_counter!(
            "news_provider_errors_total",
            "Provider fetch/parse errors and error answers."
        );
        describe_histogram!("news_parse_ms", "Search feed parse time in milliseconds.");
        describe_histogram!("news_fetch_ms", "Provider call time in milliseconds.");
        describe_gauge!(
            "news_pipeline_last_run_ts",
            "Unix ts when the pipeline last ran."
        );
    });
}

/// Clean plain provider text: decode entities, collapse whitespace.
/// Everything else, `<` and `>` included, is kept as sent.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    // Also eats the \u{a0} left by &nbsp;
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

/// Text of an HTML fragment (RSS descriptions). Only `<` directly followed by
/// a letter or `/` opens a tag, so a bare comparison sign survives.
pub fn html_to_text(s: &str) -> String {
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?s)</?[A-Za-z][^<>]*>").unwrap());
    normalize_text(&re_tags.replace_all(s, " "))
}
