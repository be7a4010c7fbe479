//! The `Tweet` record and the mapping from raw backend records.
use crate::client::RealtimeClient;
use crate::error::{RealtimeError, Result};
use crate::replies::ReplyPager;
use crate::types::{RawPopularTweet, RawTweet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

/// Search-term highlight markers wrapped around matches in `displayText`.
static HIGHLIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\tSTART\t(.*?)\tEND\t").expect("valid highlight pattern"));

static TWEET_URL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/realtime/search/tweet/(\d+)").expect("valid tweet url pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// e.g. `image`, `video`.
    pub kind: String,
    pub url: String,
}

/// One tweet as reported by the backend. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub content: String,
    pub id: String,
    pub reply_count: u64,
    pub like_count: u64,
    pub rt_count: u64,
    /// Epoch seconds.
    pub created_at: i64,
    pub urls: Vec<String>,
    pub hashtags: Vec<String>,
    /// Ids of the mentioned users.
    pub mentions: Vec<String>,
    pub media: Vec<Media>,
    /// URL of the quoted tweet, without its query string.
    pub quoted_tweet: Option<String>,
    pub user_id: String,
    pub user_name: String,
    pub user_screen_name: String,
    pub verified: bool,
}

impl Tweet {
    /// Map one timeline record.
    ///
    /// `id` and `displayText` are required; everything else defaults when it is
    /// absent or has an unexpected shape, and unknown fields are ignored.
    ///
    /// ```
    /// use realtime_twitter::Tweet;
    /// use serde_json::json;
    ///
    /// let tweet = Tweet::from_record(&json!({
    ///     "id": "1",
    ///     "displayText": "hello \tSTART\trust\tEND\t",
    ///     "likesCount": 3
    /// }))
    /// .unwrap();
    /// assert_eq!(tweet.content, "hello rust");
    /// assert_eq!(tweet.like_count, 3);
    /// assert!(tweet.urls.is_empty());
    /// ```
    pub fn from_record(raw: &Value) -> Result<Self> {
        let raw = RawTweet::deserialize(raw)
            .map_err(|e| RealtimeError::MalformedRecord(format!("tweet record: {e}")))?;
        Ok(raw.into())
    }

    /// Map one entry of a page's popular-tweet block, which carries far fewer
    /// fields than a timeline record.
    pub fn from_popular(raw: &Value) -> Result<Self> {
        let raw = RawPopularTweet::deserialize(raw)
            .map_err(|e| RealtimeError::MalformedRecord(format!("popular tweet: {e}")))?;
        let id = TWEET_URL_ID
            .captures(&raw.url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                RealtimeError::MalformedRecord(format!("popular tweet url has no id: {}", raw.url))
            })?;

        Ok(Self {
            content: strip_highlights(&raw.body),
            id,
            reply_count: raw.reply,
            like_count: raw.like,
            rt_count: raw.rt,
            created_at: raw.time,
            urls: Vec::new(),
            hashtags: Vec::new(),
            mentions: Vec::new(),
            media: raw
                .image_url
                .into_iter()
                .filter(|u| !u.is_empty())
                .map(|url| Media {
                    kind: "image".into(),
                    url,
                })
                .collect(),
            quoted_tweet: None,
            user_id: String::new(),
            user_name: String::new(),
            user_screen_name: String::new(),
            verified: false,
        })
    }

    /// First page of replies to this tweet. Neither the tweet nor any session
    /// is touched; an empty vector means no replies.
    pub async fn get_replies(&self, client: &RealtimeClient) -> Result<Vec<Tweet>> {
        client.get_replies(self).await
    }

    /// Pager over every reply page of this tweet.
    pub fn replies(&self, client: &RealtimeClient) -> ReplyPager {
        client.replies(self)
    }
}

impl From<RawTweet> for Tweet {
    fn from(raw: RawTweet) -> Self {
        Self {
            content: strip_highlights(&raw.display_text),
            id: raw.id,
            reply_count: raw.reply_count,
            like_count: raw.likes_count,
            rt_count: raw.rt_count,
            created_at: raw.created_at,
            urls: raw.urls.into_iter().map(|u| u.expanded_url).collect(),
            hashtags: raw.hashtags.into_iter().map(|h| h.text).collect(),
            mentions: raw.mentions.into_iter().map(|m| m.id).collect(),
            media: raw
                .media
                .into_iter()
                .map(|m| Media {
                    kind: m.kind,
                    url: m.item.url,
                })
                .collect(),
            quoted_tweet: raw
                .quoted_tweet
                .and_then(|q| q.url)
                .map(|url| match url.split_once('?') {
                    Some((base, _)) => base.to_string(),
                    None => url,
                }),
            user_id: raw.user_id,
            user_name: raw.name,
            user_screen_name: raw.screen_name,
            verified: raw.verified,
        }
    }
}

fn strip_highlights(text: &str) -> String {
    HIGHLIGHT.replace_all(text, "$1").into_owned()
}

/// Map a batch of records. One bad record fails the whole batch.
pub fn map_records(records: &[Value]) -> Result<Vec<Tweet>> {
    records.iter().map(Tweet::from_record).collect()
}

/// Stable sort, most recent first.
pub(crate) fn sort_newest_first(tweets: &mut [Tweet]) {
    tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
