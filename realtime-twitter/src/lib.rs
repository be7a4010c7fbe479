//! Client for Yahoo! JAPAN realtime search.
//!
//! Searches open a [`SearchSession`] whose result list can be extended with
//! older tweets ([`SearchSession::get_more_tweets`]) or with tweets posted
//! since the search ([`SearchSession::get_latest_tweets`]). Trends, tweet
//! volume over time, replies and single-tweet lookups are one-shot calls on
//! [`RealtimeClient`]. All network access goes through the [`Backend`] trait;
//! [`HttpBackend`] is the real one.
//!
//! The API is async. [`blocking`] wraps it for synchronous callers.
pub mod backend;
pub mod blocking;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod replies;
pub mod session;
pub mod transition;
pub mod trend;
pub mod tweet;
pub mod types;

pub use backend::{Backend, HttpBackend};
pub use client::{
    DEFAULT_INTERVAL, DEFAULT_SPAN, RealtimeClient, SearchOptions, TransitionOptions,
    get_transition, get_trend,
};
pub use endpoint::{Cursor, Endpoint, SortBy};
pub use error::{RealtimeError, Result};
pub use replies::ReplyPager;
pub use session::{MAX_INITIAL_RESULTS, SearchSession};
pub use transition::{TransitionPoint, TransitionSnapshot};
pub use trend::{TrendSnapshot, TrendWord};
pub use tweet::{Media, Tweet};
