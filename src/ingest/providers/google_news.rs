// src/ingest/providers/google_news.rs
//! Google News search adapter.
//!
//! Queries the Google News RSS search endpoint and maps each feed item into
//! the scraper-style mapping the normalizer expects (`title`, `link`, `desc`,
//! `date`, `datetime`, `media`, `site`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ingest::error::ProviderError;
use crate::ingest::types::{NewsProvider, ProviderQuery, RawItem, RawProviderResult};
use crate::record::Task;

pub const GOOGLE_NEWS_SEARCH_URL: &str = "https://news.google.com/rss/search";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    source: Option<ItemSource>,
}

#[derive(Debug, Deserialize)]
struct ItemSource {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "$text")]
    name: Option<String>,
}

fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(ts.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub struct GoogleNewsProvider {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl GoogleNewsProvider {
    pub fn new(client: reqwest::Client, language: impl Into<String>) -> Self {
        Self::with_base_url(client, language, GOOGLE_NEWS_SEARCH_URL)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        language: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            language: language.into(),
        }
    }

    fn params(&self, q: &ProviderQuery) -> Vec<(&'static str, String)> {
        let lang = self.language.to_ascii_lowercase();
        vec![
            ("q", format!("{} when:{}d", q.query, q.period_days.max(1))),
            ("hl", lang.clone()),
            ("gl", "US".to_string()),
            ("ceid", format!("US:{lang}")),
        ]
    }

    /// Fail-soft variant: any failure is logged and yields an empty batch.
    pub async fn fetch_soft(&self, q: &ProviderQuery) -> RawProviderResult {
        match self.fetch(q).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, provider = self.name(), query = %q.query, "search failed, returning empty result");
                RawProviderResult::empty_search()
            }
        }
    }
}

#[async_trait]
impl NewsProvider for GoogleNewsProvider {
    async fn fetch(&self, q: &ProviderQuery) -> Result<RawProviderResult, ProviderError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&self.params(q))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        let body = resp.text().await?;

        let now = Utc::now();
        let items = parse_feed(&body, now, q.period_days, q.max_results)?;
        Ok(RawProviderResult::Search(items))
    }

    fn task(&self) -> Task {
        Task::GoogleNews
    }

    fn name(&self) -> &'static str {
        "Google News"
    }
}

/// Parse an RSS search feed: keep items from the last `period_days`, newest
/// first, at most `max_results`. Items without a parsable date are kept and
/// sorted last.
pub fn parse_feed(
    xml: &str,
    now: DateTime<Utc>,
    period_days: u32,
    max_results: usize,
) -> Result<Vec<RawItem>, ProviderError> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean)
        .map_err(|e| ProviderError::Parse(format!("google news rss: {e}")))?;

    let cutoff = now - chrono::Duration::days(i64::from(period_days.max(1)));

    let mut dated: Vec<(Option<DateTime<Utc>>, RawItem)> = rss
        .channel
        .item
        .into_iter()
        .map(|it| {
            let ts = it.pub_date.as_deref().and_then(parse_rfc2822);
            (ts, to_raw_item(it, ts))
        })
        .filter(|(ts, _)| ts.map_or(true, |t| t >= cutoff))
        .collect();

    // newest first, undated last
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.truncate(max_results);

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("news_parse_ms").record(ms);
    counter!("news_items_fetched_total").increment(dated.len() as u64);

    Ok(dated.into_iter().map(|(_, item)| item).collect())
}

fn to_raw_item(it: Item, ts: Option<DateTime<Utc>>) -> RawItem {
    let media = it
        .source
        .as_ref()
        .and_then(|s| s.name.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let site = it.source.and_then(|s| s.url);
    let title = it.title.map(|t| strip_publisher_suffix(t, media.as_deref()));

    let mut m = RawItem::new();
    m.insert("title".into(), opt(title));
    m.insert("link".into(), opt(it.link));
    m.insert("desc".into(), opt(it.description));
    m.insert("date".into(), opt(it.pub_date));
    m.insert("datetime".into(), opt(ts.map(|t| t.to_rfc3339())));
    m.insert("media".into(), opt(media));
    m.insert("site".into(), opt(site));
    m
}

fn opt(v: Option<String>) -> Value {
    v.map_or(Value::Null, |s| json!(s))
}

/// Google appends " - <Publisher>" to every headline.
fn strip_publisher_suffix(title: String, publisher: Option<&str>) -> String {
    if let Some(p) = publisher {
        if let Some(head) = title.strip_suffix(p).and_then(|t| t.strip_suffix(" - ")) {
            return head.trim_end().to_string();
        }
    }
    title
}

/// HTML named entities are undefined in XML; swap them for the numeric form
/// so the parser accepts them and the character itself survives.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", "&#160;")
        .replace("&ndash;", "&#8211;")
        .replace("&mdash;", "&#8212;")
        .replace("&ldquo;", "&#8220;")
        .replace("&rdquo;", "&#8221;")
        .replace("&lsquo;", "&#8216;")
        .replace("&rsquo;", "&#8217;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>search</title>
<item><title>Old story - Reuters</title><link>https://example.test/old</link>
<pubDate>Mon, 01 Sep 2025 08:00:00 GMT</pubDate><description>old</description>
<source url="https://www.reuters.com">Reuters</source></item>
<item><title>Fed holds - Reuters</title><link>https://example.test/1</link>
<pubDate>Wed, 15 Oct 2025 08:00:00 GMT</pubDate><description>&lt;a href="x"&gt;Fed holds&lt;/a&gt;</description>
<source url="https://www.reuters.com">Reuters</source></item>
<item><title>GDP beats - CNBC</title><link>https://example.test/2</link>
<pubDate>Wed, 15 Oct 2025 12:00:00 GMT</pubDate><description>gdp</description>
<source url="https://www.cnbc.com">CNBC</source></item>
</channel></rss>"#;

    fn now() -> DateTime<Utc> {
        parse_rfc2822("Thu, 16 Oct 2025 06:00:00 GMT").unwrap()
    }

    #[test]
    fn keeps_period_sorts_newest_first() {
        let items = parse_feed(FEED, now(), 1, 10).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "GDP beats");
        assert_eq!(items[0]["media"], "CNBC");
        assert_eq!(items[1]["title"], "Fed holds");
        assert_eq!(items[1]["datetime"], "2025-10-15T08:00:00+00:00");
    }

    #[test]
    fn truncates_to_max_results() {
        let items = parse_feed(FEED, now(), 7, 1).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["link"], "https://example.test/2");
    }

    #[test]
    fn broken_xml_is_parse_error() {
        let err = parse_feed("<rss><channel>", now(), 1, 10).unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn html_entities_in_titles_keep_their_characters() {
        let feed = FEED.replace("GDP beats - CNBC", "&ldquo;GDP&rdquo; beats&nbsp;&mdash; again - CNBC");
        let items = parse_feed(&feed, now(), 1, 10).unwrap();
        assert_eq!(items[0]["title"], "\u{201C}GDP\u{201D} beats\u{a0}\u{2014} again");
    }

    #[test]
    fn suffix_is_only_stripped_for_matching_publisher() {
        assert_eq!(strip_publisher_suffix("A - B".into(), Some("B")), "A");
        assert_eq!(strip_publisher_suffix("A - B".into(), Some("C")), "A - B");
        assert_eq!(strip_publisher_suffix("A - B".into(), None), "A - B");
    }
}
