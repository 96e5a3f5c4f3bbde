// tests/common/mod.rs
//
// Shared helpers: a throwaway HTTP server standing in for the providers, and
// a scripted in-memory provider for pipeline tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use news_dashboard::ingest::error::ProviderError;
use news_dashboard::ingest::types::{NewsProvider, ProviderQuery, RawItem, RawProviderResult};
use news_dashboard::Task;
use serde_json::Value;

/// Serve `router` on an ephemeral local port; returns the base URL.
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

pub fn item(v: Value) -> RawItem {
    v.as_object().cloned().expect("json object")
}

pub type Script = dyn Fn(&ProviderQuery) -> (Duration, Result<RawProviderResult, ProviderError>)
    + Send
    + Sync;

/// Provider whose answer (and latency) is decided per query by a closure.
pub struct ScriptedProvider {
    task: Task,
    script: Box<Script>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new<F>(task: Task, script: F) -> Self
    where
        F: Fn(&ProviderQuery) -> (Duration, Result<RawProviderResult, ProviderError>)
            + Send
            + Sync
            + 'static,
    {
        Self {
            task,
            script: Box::new(script),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NewsProvider for ScriptedProvider {
    async fn fetch(&self, query: &ProviderQuery) -> Result<RawProviderResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (delay, res) = (self.script)(query);
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        res
    }

    fn task(&self) -> Task {
        self.task
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
