//! Synchronous wrappers over the async client.
//!
//! Each [`Client`] owns a small current-thread Tokio runtime and blocks the
//! calling thread until the request finishes. Do not call these from inside an
//! async runtime; use [`crate::RealtimeClient`] there instead.
//!
//! ```no_run
//! use realtime_twitter::blocking::Client;
//! use realtime_twitter::SearchOptions;
//!
//! let client = Client::new()?;
//! let mut session = client.search("ラーメン", SearchOptions::default())?;
//! let older = session.get_more_tweets()?;
//! println!("{} + {}", session.results().len() - older.len(), older.len());
//! # Ok::<(), realtime_twitter::RealtimeError>(())
//! ```
use crate::backend::Backend;
use crate::client::{RealtimeClient, SearchOptions, TransitionOptions};
use crate::endpoint::{Cursor, SortBy};
use crate::error::Result;
use crate::session;
use crate::transition::TransitionSnapshot;
use crate::trend::TrendSnapshot;
use crate::tweet::Tweet;
use realtime_config::ClientConfig;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

fn build_runtime() -> Result<Arc<Runtime>> {
    let runtime = Builder::new_current_thread().enable_all().build()?;
    Ok(Arc::new(runtime))
}

#[derive(Clone)]
pub struct Client {
    inner: RealtimeClient,
    runtime: Arc<Runtime>,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::wrap(RealtimeClient::new()?)
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self> {
        Self::wrap(RealtimeClient::from_config(cfg)?)
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Result<Self> {
        Self::wrap(RealtimeClient::with_backend(backend))
    }

    fn wrap(inner: RealtimeClient) -> Result<Self> {
        Ok(Self {
            inner,
            runtime: build_runtime()?,
        })
    }

    fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    /// The async client underneath.
    pub fn async_client(&self) -> &RealtimeClient {
        &self.inner
    }

    pub fn search(&self, query: &str, opts: SearchOptions) -> Result<SearchSession> {
        let inner = self.block_on(self.inner.search(query, opts))?;
        Ok(SearchSession {
            inner,
            runtime: self.runtime.clone(),
        })
    }

    pub fn get_trend(&self) -> Result<TrendSnapshot> {
        self.block_on(self.inner.get_trend())
    }

    pub fn get_transition(&self, query: &str, opts: TransitionOptions) -> Result<TransitionSnapshot> {
        self.block_on(self.inner.get_transition(query, opts))
    }

    pub fn get_replies(&self, tweet: &Tweet) -> Result<Vec<Tweet>> {
        self.block_on(self.inner.get_replies(tweet))
    }

    /// Up to `times` reply pages of `tweet`, concatenated.
    pub fn get_replies_times(&self, tweet: &Tweet, times: usize) -> Result<Vec<Tweet>> {
        let mut pager = self.inner.replies(tweet);
        self.block_on(pager.get_replies_times(times))
    }

    pub fn tweet_by_id(&self, id: &str) -> Result<Tweet> {
        self.block_on(self.inner.tweet_by_id(id))
    }
}

/// Blocking counterpart of [`crate::SearchSession`].
pub struct SearchSession {
    inner: session::SearchSession,
    runtime: Arc<Runtime>,
}

impl SearchSession {
    pub fn get_more_tweets(&mut self) -> Result<Vec<Tweet>> {
        self.runtime.block_on(self.inner.get_more_tweets())
    }

    pub fn get_latest_tweets(&mut self) -> Result<Vec<Tweet>> {
        self.runtime.block_on(self.inner.get_latest_tweets())
    }

    pub fn get_more_tweets_times(&mut self, times: usize) -> Result<Vec<Tweet>> {
        self.runtime.block_on(self.inner.get_more_tweets_times(times))
    }

    pub fn query(&self) -> &str {
        self.inner.query()
    }

    pub fn search_media(&self) -> bool {
        self.inner.search_media()
    }

    pub fn sort_by(&self) -> SortBy {
        self.inner.sort_by()
    }

    pub fn results(&self) -> &[Tweet] {
        self.inner.results()
    }

    pub fn cursor_more(&self) -> Option<&Cursor> {
        self.inner.cursor_more()
    }

    pub fn cursor_latest(&self) -> Option<&Cursor> {
        self.inner.cursor_latest()
    }

    pub fn crumb(&self) -> Option<&str> {
        self.inner.crumb()
    }

    pub fn trend(&self) -> &TrendSnapshot {
        self.inner.trend()
    }

    /// The async session underneath.
    pub fn into_inner(self) -> session::SearchSession {
        self.inner
    }
}

pub fn get_trend() -> Result<TrendSnapshot> {
    Client::new()?.get_trend()
}

pub fn get_transition(
    query: &str,
    search_media: bool,
    interval: u64,
    span: u64,
) -> Result<TransitionSnapshot> {
    Client::new()?.get_transition(
        query,
        TransitionOptions {
            search_media,
            interval,
            span,
        },
    )
}
