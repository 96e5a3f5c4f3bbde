// tests/filter_aggregate_stats.rs
use std::collections::BTreeSet;

use news_dashboard::stats::{count_by_category, count_by_publisher};
use news_dashboard::{aggregate, dedup, filter, summarize, DedupKey, NewsRecord, Task, Whitelist};

fn rec(title: &str, publisher: Option<&str>, category: &str, link: &str) -> NewsRecord {
    let mut r = NewsRecord::new(category, "Employment Data", Task::GoogleNews);
    r.title = Some(title.to_string());
    r.publisher = publisher.map(str::to_string);
    r.link = Some(link.to_string());
    r
}

fn sample() -> Vec<NewsRecord> {
    vec![
        rec("a", Some("Reuters"), "Economic Events", "https://x/a"),
        rec("b", Some("CNBC"), "Financial Markets", "https://x/b"),
        rec("c", None, "Economic Events", "https://x/c"),
    ]
}

#[test]
fn empty_whitelist_is_identity() {
    let input = sample();
    assert_eq!(filter(input.clone(), &BTreeSet::new()), input);
}

#[test]
fn whitelist_without_present_publishers_empties_collection() {
    let wl: BTreeSet<String> = ["The Economist".to_string()].into();
    assert!(filter(sample(), &wl).is_empty());
}

#[test]
fn null_publisher_never_passes_a_whitelist() {
    let wl: BTreeSet<String> = ["Reuters".to_string(), "CNBC".to_string()].into();
    let out = filter(sample(), &wl);
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|r| r.publisher.is_some()));
}

#[test]
fn whitelist_struct_restricts_events_too() {
    let wl = Whitelist {
        events: ["GDP Release".to_string()].into(),
        ..Whitelist::default()
    };
    let (kept, removed) = wl.apply(sample());
    assert!(kept.is_empty());
    assert_eq!(removed, 3);
}

#[test]
fn aggregate_of_nothing_is_empty() {
    assert!(aggregate(Vec::<Vec<NewsRecord>>::new()).is_empty());
}

#[test]
fn aggregate_concatenates_in_order() {
    let a = sample();
    let b = vec![
        rec("d", Some("BBC News"), "Monetary Policy", "https://x/d"),
        rec("e", Some("Reuters"), "Monetary Policy", "https://x/e"),
    ];
    let out = aggregate(vec![a.clone(), b.clone()]);
    assert_eq!(out.len(), a.len() + b.len());
    let titles: Vec<_> = out.iter().map(|r| r.title.as_deref().unwrap()).collect();
    assert_eq!(titles, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn aggregate_keeps_duplicates_but_dedup_stage_removes_them() {
    let a = vec![rec("same", Some("Reuters"), "Economic Events", "https://x/same")];
    let b = vec![rec("same", Some("Reuters"), "Monetary Policy", "https://x/same")];
    let merged = aggregate(vec![a, b]);
    assert_eq!(merged.len(), 2);

    let (kept, removed) = dedup(merged, DedupKey::Link);
    assert_eq!(removed, 1);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].category, "Economic Events");
}

#[test]
fn distinct_counts_ignore_null() {
    let records = vec![
        rec("1", Some("Reuters"), "Market Analysis", "l1"),
        rec("2", None, "Market Analysis", "l2"),
        rec("3", Some("Reuters"), "Market Analysis", "l3"),
    ];
    let s = summarize(&records);
    assert_eq!(s.total, 3);
    assert_eq!(s.distinct_publishers, 1);
    assert_eq!(s.distinct_categories, 1);
    assert_eq!(s.errors, 0);
}

#[test]
fn breakdowns_skip_null_publishers() {
    let by_pub = count_by_publisher(&sample());
    assert_eq!(by_pub.len(), 2);
    assert_eq!(by_pub.iter().map(|e| e.count).sum::<usize>(), 2);

    let by_cat = count_by_category(&sample());
    assert_eq!(by_cat[0].label, "Economic Events");
    assert_eq!(by_cat[0].count, 2);
}
