//! Every request the library sends, described independently of transport.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result ordering of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Newest,
    Hottest,
}

impl SortBy {
    /// Value of the backend's `md` parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            SortBy::Newest => "t",
            SortBy::Hottest => "h",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortBy::Newest => "newest",
            SortBy::Hottest => "hottest",
        })
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "t" => Ok(SortBy::Newest),
            "hottest" | "h" => Ok(SortBy::Hottest),
            other => Err(format!("unknown sort order `{other}` (expected newest or hottest)")),
        }
    }
}

/// Opaque pagination position handed back by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    /// Continue below the oldest tweet seen so far (newest-first searches).
    OldestTweetId(String),
    /// Continue after this many tweets (popularity-ordered searches).
    Offset(usize),
    /// Fetch tweets newer than this one.
    LatestTweetId(String),
    /// Fetch the newest tweets when none has been seen yet.
    Head,
}

impl Cursor {
    fn param(&self) -> (&'static str, String) {
        match self {
            Cursor::OldestTweetId(id) => ("oldestTweetId", id.clone()),
            Cursor::Offset(n) => ("start", n.to_string()),
            Cursor::LatestTweetId(id) => ("latestTweetId", id.clone()),
            Cursor::Head => ("latestTweetId", String::new()),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, value) = self.param();
        write!(f, "{name}={value}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// First page of a search (HTML).
    Search {
        query: String,
        sort_by: SortBy,
        search_media: bool,
    },
    /// Older (or lower ranked) tweets of a search.
    More {
        crumb: String,
        query: String,
        sort_by: SortBy,
        search_media: bool,
        cursor: Cursor,
    },
    /// Tweets posted since the cursor.
    Latest {
        crumb: String,
        query: String,
        search_media: bool,
        cursor: Cursor,
    },
    Replies {
        tweet_id: String,
        start: usize,
    },
    /// Single tweet page (HTML).
    TweetPage { id: String },
    /// Landing page carrying the trend sections (HTML).
    Trend,
    Transition {
        query: String,
        search_media: bool,
        interval: u64,
        span: u64,
    },
}

/// Tweet ids are decimal snowflakes and land verbatim in request paths.
pub(crate) fn validate_tweet_id(id: &str) -> crate::error::Result<()> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(crate::error::RealtimeError::InvalidArgument(format!(
            "tweet id must be decimal digits, got {id:?}"
        )));
    }
    Ok(())
}

impl Endpoint {
    /// Short stable name, used in logs and by test doubles.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Search { .. } => "search",
            Endpoint::More { .. } => "more",
            Endpoint::Latest { .. } => "latest",
            Endpoint::Replies { .. } => "replies",
            Endpoint::TweetPage { .. } => "tweet",
            Endpoint::Trend => "trend",
            Endpoint::Transition { .. } => "transition",
        }
    }

    /// Path relative to the backend base URL.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Search { .. } => "search".into(),
            Endpoint::More { .. } => "api/v1/pagination".into(),
            Endpoint::Latest { .. } => "api/v1/autoscroll".into(),
            Endpoint::Replies { tweet_id, .. } => format!("api/v1/pagination/tweet/{tweet_id}"),
            Endpoint::TweetPage { id } => format!("search/tweet/{id}"),
            Endpoint::Trend => String::new(),
            Endpoint::Transition { .. } => "api/v1/transition".into(),
        }
    }

    /// Whether the response is an HTML page whose data sits in `__NEXT_DATA__`.
    pub fn is_page(&self) -> bool {
        matches!(
            self,
            Endpoint::Search { .. } | Endpoint::TweetPage { .. } | Endpoint::Trend
        )
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let media = |params: &mut Vec<(&'static str, String)>, on: bool| {
            if on {
                params.push(("mtype", "image".to_string()));
            }
        };

        match self {
            Endpoint::Search {
                query,
                sort_by,
                search_media,
            } => {
                params.push(("p", query.clone()));
                params.push(("md", sort_by.as_param().to_string()));
                media(&mut params, *search_media);
            }
            Endpoint::More {
                crumb,
                query,
                sort_by,
                search_media,
                cursor,
            } => {
                params.push(("crumb", crumb.clone()));
                params.push(("p", query.clone()));
                params.push(("md", sort_by.as_param().to_string()));
                media(&mut params, *search_media);
                params.push(cursor.param());
            }
            Endpoint::Latest {
                crumb,
                query,
                search_media,
                cursor,
            } => {
                params.push(("crumb", crumb.clone()));
                params.push(("p", query.clone()));
                params.push(cursor.param());
                media(&mut params, *search_media);
            }
            Endpoint::Replies { start, .. } => {
                params.push(("start", start.to_string()));
            }
            Endpoint::TweetPage { .. } | Endpoint::Trend => {}
            Endpoint::Transition {
                query,
                search_media,
                interval,
                span,
            } => {
                params.push(("p", query.clone()));
                params.push(("interval", interval.to_string()));
                params.push(("span", span.to_string()));
                media(&mut params, *search_media);
            }
        }
        params
    }
}
