//! A search whose result list grows as older and newer pages are pulled in.
use crate::client::RealtimeClient;
use crate::endpoint::{Cursor, Endpoint, SortBy};
use crate::error::{RealtimeError, Result};
use crate::extract::{page_data, timeline_entries};
use crate::trend::TrendSnapshot;
use crate::tweet::{Tweet, map_records, sort_newest_first};
use std::collections::HashSet;

/// Results kept from the first page of a search.
pub const MAX_INITIAL_RESULTS: usize = 40;

/// Live state of one search.
///
/// `results` only ever grows and never holds two tweets with the same id.
/// Every call either applies a whole page or leaves the session untouched.
pub struct SearchSession {
    client: RealtimeClient,
    query: String,
    search_media: bool,
    sort_by: SortBy,
    crumb: Option<String>,
    results: Vec<Tweet>,
    seen: HashSet<String>,
    cursor_more: Option<Cursor>,
    cursor_latest: Option<Cursor>,
    trend: TrendSnapshot,
}

impl SearchSession {
    pub async fn create(
        client: &RealtimeClient,
        query: &str,
        search_media: bool,
        sort_by: SortBy,
    ) -> Result<Self> {
        if query.trim().is_empty() {
            return Err(RealtimeError::InvalidArgument("search query is empty".into()));
        }

        let payload = client
            .fetch(&Endpoint::Search {
                query: query.to_string(),
                sort_by,
                search_media,
            })
            .await?;
        let page = page_data(&payload)?;
        let timeline = page
            .timeline
            .as_ref()
            .ok_or_else(|| RealtimeError::MalformedRecord("search page has no timeline".into()))?;
        let mut tweets = map_records(&timeline.entry)?;
        let trend = TrendSnapshot::from_page(&page)?;

        if sort_by == SortBy::Newest {
            sort_newest_first(&mut tweets);
        }
        let mut seen = HashSet::new();
        tweets.retain(|t| seen.insert(t.id.clone()));
        tweets.truncate(MAX_INITIAL_RESULTS);
        let seen: HashSet<String> = tweets.iter().map(|t| t.id.clone()).collect();

        let crumb = page.pagination.params.crumb.filter(|c| !c.is_empty());
        let (cursor_more, cursor_latest) = match &crumb {
            None => {
                tracing::warn!(
                    target: "realtime.search",
                    query,
                    "search page carried no crumb; pagination disabled"
                );
                (None, None)
            }
            Some(_) => match sort_by {
                SortBy::Newest => (
                    tweets.last().map(|t| Cursor::OldestTweetId(t.id.clone())),
                    Some(
                        tweets
                            .first()
                            .map_or(Cursor::Head, |t| Cursor::LatestTweetId(t.id.clone())),
                    ),
                ),
                SortBy::Hottest => (
                    (!tweets.is_empty()).then(|| Cursor::Offset(tweets.len())),
                    None,
                ),
            },
        };

        tracing::info!(
            target: "realtime.search",
            query,
            %sort_by,
            search_media,
            results = tweets.len(),
            "realtime.search.page"
        );

        Ok(Self {
            client: client.clone(),
            query: query.to_string(),
            search_media,
            sort_by,
            crumb,
            results: tweets,
            seen,
            cursor_more,
            cursor_latest,
            trend,
        })
    }

    /// Next older (or lower ranked) page. Returns only the tweets that were
    /// appended; empty once the search is exhausted.
    pub async fn get_more_tweets(&mut self) -> Result<Vec<Tweet>> {
        let (Some(cursor), Some(crumb)) = (self.cursor_more.clone(), self.crumb.clone()) else {
            return Ok(Vec::new());
        };

        let payload = self
            .client
            .fetch(&Endpoint::More {
                crumb,
                query: self.query.clone(),
                sort_by: self.sort_by,
                search_media: self.search_media,
                cursor: cursor.clone(),
            })
            .await?;
        let mut page = map_records(&timeline_entries(&payload)?)?;
        if self.sort_by == SortBy::Newest {
            sort_newest_first(&mut page);
        }

        self.cursor_more = match (self.sort_by, page.last(), &cursor) {
            (_, None, _) => None,
            (SortBy::Newest, Some(oldest), _) => Some(Cursor::OldestTweetId(oldest.id.clone())),
            (SortBy::Hottest, Some(_), Cursor::Offset(prev)) => Some(Cursor::Offset(prev + page.len())),
            (SortBy::Hottest, Some(_), _) => Some(Cursor::Offset(self.results.len() + page.len())),
        }
        .filter(|next| *next != cursor);

        let delta = self.append_unseen(page);
        tracing::debug!(
            target: "realtime.search",
            query = %self.query,
            appended = delta.len(),
            total = self.results.len(),
            exhausted = self.cursor_more.is_none(),
            "realtime.search.more"
        );
        Ok(delta)
    }

    /// Tweets posted since the last look, in backend order. Only meaningful
    /// for newest-first searches.
    pub async fn get_latest_tweets(&mut self) -> Result<Vec<Tweet>> {
        if self.sort_by != SortBy::Newest {
            return Err(RealtimeError::InvalidMode(self.sort_by));
        }
        let (Some(cursor), Some(crumb)) = (self.cursor_latest.clone(), self.crumb.clone()) else {
            return Ok(Vec::new());
        };

        let payload = self
            .client
            .fetch(&Endpoint::Latest {
                crumb,
                query: self.query.clone(),
                search_media: self.search_media,
                cursor,
            })
            .await?;
        let page = map_records(&timeline_entries(&payload)?)?;

        // Ties keep the first of the page, which the backend lists newest-first.
        if let Some(newest) = page
            .iter()
            .reduce(|best, t| if t.created_at > best.created_at { t } else { best })
        {
            self.cursor_latest = Some(Cursor::LatestTweetId(newest.id.clone()));
        }

        let delta = self.append_unseen(page);
        tracing::debug!(
            target: "realtime.search",
            query = %self.query,
            appended = delta.len(),
            total = self.results.len(),
            "realtime.search.latest"
        );
        Ok(delta)
    }

    /// Up to `times` further pages, concatenated. Stops as soon as the
    /// search is exhausted.
    pub async fn get_more_tweets_times(&mut self, times: usize) -> Result<Vec<Tweet>> {
        let mut out = Vec::new();
        for _ in 0..times {
            if self.cursor_more.is_none() {
                break;
            }
            out.extend(self.get_more_tweets().await?);
        }
        Ok(out)
    }

    fn append_unseen(&mut self, page: Vec<Tweet>) -> Vec<Tweet> {
        let delta: Vec<Tweet> = page
            .into_iter()
            .filter(|t| self.seen.insert(t.id.clone()))
            .collect();
        self.results.extend(delta.iter().cloned());
        delta
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_media(&self) -> bool {
        self.search_media
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn results(&self) -> &[Tweet] {
        &self.results
    }

    /// `None` once older pages are exhausted.
    pub fn cursor_more(&self) -> Option<&Cursor> {
        self.cursor_more.as_ref()
    }

    /// `None` for popularity-ordered searches.
    pub fn cursor_latest(&self) -> Option<&Cursor> {
        self.cursor_latest.as_ref()
    }

    pub fn crumb(&self) -> Option<&str> {
        self.crumb.as_deref()
    }

    /// Trend sections embedded in the search page.
    pub fn trend(&self) -> &TrendSnapshot {
        &self.trend
    }
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("query", &self.query)
            .field("search_media", &self.search_media)
            .field("sort_by", &self.sort_by)
            .field("results", &self.results.len())
            .field("cursor_more", &self.cursor_more)
            .field("cursor_latest", &self.cursor_latest)
            .finish_non_exhaustive()
    }
}
