use crate::error::Result;
use crate::tweet::Tweet;
use crate::types::PageData;
use serde::{Deserialize, Serialize};

/// A trending search word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendWord {
    pub query: String,
    /// Whether the word climbed the ranking since the last update.
    pub rank_up: bool,
    pub tweet_count: u64,
    pub genre: Option<String>,
    /// Related words grouped under this one.
    pub child_buzz: Vec<String>,
}

/// What is trending right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub trend: Vec<TrendWord>,
    /// Popular tweets.
    pub tweet: Vec<Tweet>,
    /// Rising words.
    pub word: Vec<String>,
}

impl TrendSnapshot {
    /// Sections missing from the page yield empty sequences; a popular tweet
    /// that cannot be mapped fails the snapshot.
    pub fn from_page(page: &PageData) -> Result<Self> {
        let trend = page
            .buzz_trend
            .items
            .iter()
            .map(|item| TrendWord {
                query: item.query.clone(),
                rank_up: item.rank_up,
                tweet_count: item.tweet_count,
                genre: item.genre.clone(),
                child_buzz: item.child_buzz.clone(),
            })
            .collect();
        let tweet = page
            .poptw
            .items
            .iter()
            .map(Tweet::from_popular)
            .collect::<Result<Vec<_>>>()?;
        let word = page.hot_buzz.items.iter().map(|i| i.query.clone()).collect();

        Ok(Self { trend, tweet, word })
    }

    /// Just the trending words, in ranking order.
    pub fn trend_words(&self) -> Vec<&str> {
        self.trend.iter().map(|t| t.query.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.trend.is_empty() && self.tweet.is_empty() && self.word.is_empty()
    }
}
