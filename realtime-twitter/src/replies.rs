use crate::client::RealtimeClient;
use crate::endpoint::{Endpoint, validate_tweet_id};
use crate::error::Result;
use crate::extract::timeline_entries;
use crate::tweet::{Tweet, map_records};

/// Walks the reply pages of one tweet.
///
/// The offset lives here rather than on the [`Tweet`], so the tweet stays an
/// immutable value and several pagers over the same tweet do not interfere.
pub struct ReplyPager {
    client: RealtimeClient,
    tweet_id: String,
    start: usize,
    exhausted: bool,
}

impl ReplyPager {
    pub(crate) fn new(client: RealtimeClient, tweet_id: String) -> Self {
        Self {
            client,
            tweet_id,
            start: 0,
            exhausted: false,
        }
    }

    pub fn tweet_id(&self) -> &str {
        &self.tweet_id
    }

    /// Number of replies received so far.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Next page of replies; empty once the backend has no more.
    pub async fn next_page(&mut self) -> Result<Vec<Tweet>> {
        if self.exhausted {
            return Ok(Vec::new());
        }
        validate_tweet_id(&self.tweet_id)?;

        let payload = self
            .client
            .fetch(&Endpoint::Replies {
                tweet_id: self.tweet_id.clone(),
                start: self.start,
            })
            .await?;
        let replies = map_records(&timeline_entries(&payload)?)?;

        if replies.is_empty() {
            self.exhausted = true;
        }
        self.start += replies.len();

        tracing::debug!(
            target: "realtime.replies",
            tweet_id = %self.tweet_id,
            fetched = replies.len(),
            start = self.start,
            "realtime.replies.page"
        );
        Ok(replies)
    }

    /// Up to `times` pages, concatenated; stops early once exhausted.
    pub async fn get_replies_times(&mut self, times: usize) -> Result<Vec<Tweet>> {
        let mut out = Vec::new();
        for _ in 0..times {
            let page = self.next_page().await?;
            if page.is_empty() {
                break;
            }
            out.extend(page);
        }
        Ok(out)
    }
}
