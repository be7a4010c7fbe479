//! Entry point tying a [`Backend`] to the public operations.
use crate::backend::{Backend, HttpBackend};
use crate::endpoint::{Endpoint, SortBy, validate_tweet_id};
use crate::error::{RealtimeError, Result};
use crate::extract::page_data;
use crate::replies::ReplyPager;
use crate::session::SearchSession;
use crate::transition::{TransitionSnapshot, validate_window};
use crate::trend::TrendSnapshot;
use crate::tweet::Tweet;
use realtime_config::ClientConfig;
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_INTERVAL: u64 = 900;
pub const DEFAULT_SPAN: u64 = 21600;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Only tweets with attached images.
    pub search_media: bool,
    pub sort_by: SortBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOptions {
    pub search_media: bool,
    /// Bucket width in seconds.
    pub interval: u64,
    /// Covered period in seconds.
    pub span: u64,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            search_media: false,
            interval: DEFAULT_INTERVAL,
            span: DEFAULT_SPAN,
        }
    }
}

/// Cheap to clone; every clone shares the same backend.
#[derive(Clone)]
pub struct RealtimeClient {
    backend: Arc<dyn Backend>,
}

impl RealtimeClient {
    /// Client for the public service with default settings.
    pub fn new() -> Result<Self> {
        Ok(Self::with_backend(Arc::new(HttpBackend::new()?)))
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self> {
        Ok(Self::with_backend(Arc::new(HttpBackend::from_config(cfg)?)))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub(crate) async fn fetch(&self, endpoint: &Endpoint) -> Result<Value> {
        self.backend.fetch(endpoint).await
    }

    /// Run a search and open a session over its results.
    pub async fn search(&self, query: &str, opts: SearchOptions) -> Result<SearchSession> {
        SearchSession::create(self, query, opts.search_media, opts.sort_by).await
    }

    pub async fn get_trend(&self) -> Result<TrendSnapshot> {
        let payload = self.fetch(&Endpoint::Trend).await?;
        let snapshot = TrendSnapshot::from_page(&page_data(&payload)?)?;
        tracing::info!(
            target: "realtime.trend",
            trend = snapshot.trend.len(),
            tweet = snapshot.tweet.len(),
            word = snapshot.word.len(),
            "realtime.trend.fetched"
        );
        Ok(snapshot)
    }

    /// Tweet volume over `span` seconds in `interval`-second buckets.
    ///
    /// The window is validated before anything is sent.
    pub async fn get_transition(
        &self,
        query: &str,
        opts: TransitionOptions,
    ) -> Result<TransitionSnapshot> {
        validate_window(opts.interval, opts.span)?;
        let payload = self
            .fetch(&Endpoint::Transition {
                query: query.to_string(),
                search_media: opts.search_media,
                interval: opts.interval,
                span: opts.span,
            })
            .await?;
        TransitionSnapshot::from_response(&payload)
    }

    pub async fn get_replies(&self, tweet: &Tweet) -> Result<Vec<Tweet>> {
        self.replies(tweet).next_page().await
    }

    pub fn replies(&self, tweet: &Tweet) -> ReplyPager {
        self.replies_to(tweet.id.clone())
    }

    /// Pager over the replies of a tweet known only by id.
    pub fn replies_to(&self, tweet_id: impl Into<String>) -> ReplyPager {
        ReplyPager::new(self.clone(), tweet_id.into())
    }

    /// Look a single tweet up by id.
    pub async fn tweet_by_id(&self, id: &str) -> Result<Tweet> {
        validate_tweet_id(id)?;
        let payload = self
            .fetch(&Endpoint::TweetPage { id: id.to_string() })
            .await?;
        let page = page_data(&payload)?;
        let raw = page
            .best_tweet
            .ok_or_else(|| RealtimeError::MalformedRecord(format!("tweet page {id} has no bestTweet")))?;
        Tweet::from_record(&raw)
    }
}

/// [`RealtimeClient::get_trend`] on a default client.
pub async fn get_trend() -> Result<TrendSnapshot> {
    RealtimeClient::new()?.get_trend().await
}

/// [`RealtimeClient::get_transition`] on a default client.
pub async fn get_transition(
    query: &str,
    search_media: bool,
    interval: u64,
    span: u64,
) -> Result<TransitionSnapshot> {
    RealtimeClient::new()?
        .get_transition(
            query,
            TransitionOptions {
                search_media,
                interval,
                span,
            },
        )
        .await
}
