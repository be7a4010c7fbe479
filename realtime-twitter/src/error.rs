use crate::endpoint::SortBy;
use realtime_http::HttpError;

/// Errors surfaced by every backend-facing operation.
///
/// Nothing is retried or suppressed internally: a failed fetch or a record
/// that cannot be mapped fails the whole operation, and session state is left
/// as it was before the call.
#[derive(thiserror::Error, Debug)]
pub enum RealtimeError {
    /// Backend unreachable, non-success status, or an undecodable body.
    #[error("fetch failed: {0}")]
    Fetch(#[from] HttpError),

    /// A required field was missing or had the wrong shape.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// `get_latest_tweets` only makes sense for sessions sorted by newest.
    #[error("latest tweets require sort order `newest`, session is sorted by `{0}`")]
    InvalidMode(SortBy),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The blocking facade could not start its runtime.
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Convenient alias for results that use [`RealtimeError`].
pub type Result<T> = std::result::Result<T, RealtimeError>;
