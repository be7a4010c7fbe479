#![allow(dead_code)]

use async_trait::async_trait;
use realtime_common::observability::{LogConfig, LogFormat};
use realtime_http::HttpError;
use realtime_twitter::{Backend, Endpoint, RealtimeClient, RealtimeError, Result};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, OnceLock};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "realtime-tests",
            log_dir: Some(std::env::temp_dir().join("realtime-tests")),
            emit_stderr: true,
            format: if std::env::var("REALTIME_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        realtime_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// Canned responses keyed by [`Endpoint::name`], served in push order.
/// Every request is recorded, answered or not.
#[derive(Default)]
pub struct FakeBackend {
    responses: Mutex<HashMap<&'static str, VecDeque<Result<Value>>>>,
    calls: Mutex<Vec<Endpoint>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, endpoint: &'static str, payload: Value) {
        self.push_result(endpoint, Ok(payload));
    }

    pub fn push_fetch_error(&self, endpoint: &'static str) {
        self.push_result(
            endpoint,
            Err(RealtimeError::Fetch(HttpError::Network("connection reset".into()))),
        );
    }

    fn push_result(&self, endpoint: &'static str, result: Result<Value>) {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(result);
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.name() == endpoint)
            .count()
    }

    pub fn last_call(&self) -> Option<Endpoint> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value> {
        self.calls.lock().unwrap().push(endpoint.clone());
        self.responses
            .lock()
            .unwrap()
            .get_mut(endpoint.name())
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(RealtimeError::Fetch(HttpError::Network(format!(
                    "no canned response for {}",
                    endpoint.name()
                ))))
            })
    }
}

pub fn client_with(fake: &Arc<FakeBackend>) -> RealtimeClient {
    RealtimeClient::with_backend(fake.clone())
}

pub fn record(id: &str, created_at: i64) -> Value {
    json!({
        "id": id,
        "displayText": format!("tweet {id}"),
        "createdAt": created_at,
        "userId": "1",
        "name": "user",
        "screenName": "user"
    })
}

/// `(id, created_at)` pairs as timeline records.
pub fn records(items: &[(&str, i64)]) -> Vec<Value> {
    items.iter().map(|(id, at)| record(id, *at)).collect()
}

/// A rendered page's `__NEXT_DATA__` payload around `page_data`.
pub fn next_data(page_data: Value) -> Value {
    json!({ "props": { "pageProps": { "pageData": page_data } } })
}

pub fn search_page(entries: Vec<Value>, crumb: Option<&str>) -> Value {
    let mut page = json!({ "timeline": { "entry": entries } });
    if let Some(crumb) = crumb {
        page["pagination"] = json!({ "params": { "crumb": crumb } });
    }
    next_data(page)
}

/// Body of the JSON pagination endpoints.
pub fn timeline(entries: Vec<Value>) -> Value {
    json!({ "timeline": { "entry": entries } })
}

pub fn ids(tweets: &[realtime_twitter::Tweet]) -> Vec<&str> {
    tweets.iter().map(|t| t.id.as_str()).collect()
}
