//! The single seam between the library and the search backend.
//!
//! Everything above this module (mapping, sessions, snapshots) only sees
//! [`Backend::fetch`], so tests can swap the HTTP implementation for a fake.
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::extract::extract_next_data;
use async_trait::async_trait;
use realtime_config::ClientConfig;
use realtime_http::{DEFAULT_USER_AGENT, HttpClient, RequestOpts};
use serde_json::Value;
use std::borrow::Cow;
use std::time::Instant;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Perform one request and return its JSON payload. For HTML pages this is
    /// the embedded `__NEXT_DATA__` document.
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value>;
}

/// [`Backend`] talking HTTP to the real service.
#[derive(Clone)]
pub struct HttpBackend {
    http: HttpClient,
}

impl HttpBackend {
    /// Backend with default settings against the public service.
    pub fn new() -> Result<Self> {
        Self::from_config(&ClientConfig::default())
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self> {
        let mut base = cfg.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let user_agent = cfg.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let http = HttpClient::new_with(&base, user_agent, cfg.connect_timeout())?
            .with_timeout(cfg.timeout());
        Ok(Self { http })
    }

    pub fn with_http(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value> {
        let path = endpoint.path();
        let params = endpoint.params();
        let opts = RequestOpts {
            query: Some(
                params
                    .iter()
                    .map(|(k, v)| (*k, Cow::Borrowed(v.as_str())))
                    .collect(),
            ),
            ..Default::default()
        };

        let started = Instant::now();
        let result = if endpoint.is_page() {
            match self.http.get_text(&path, opts).await {
                Ok(html) => extract_next_data(&html),
                Err(e) => Err(e.into()),
            }
        } else {
            self.http.get_json::<Value>(&path, opts).await.map_err(Into::into)
        };

        match &result {
            Ok(_) => tracing::debug!(
                target: "realtime.backend",
                endpoint = endpoint.name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "realtime.fetch.success"
            ),
            Err(e) => tracing::warn!(
                target: "realtime.backend",
                endpoint = endpoint.name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "realtime.fetch.error"
            ),
        }
        result
    }
}
