// src/ingest/providers/mod.rs
pub mod google_news;
pub mod newsdata;

pub use google_news::GoogleNewsProvider;
pub use newsdata::NewsDataProvider;
