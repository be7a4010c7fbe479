use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use realtime_twitter::{
    DEFAULT_INTERVAL, DEFAULT_SPAN, RealtimeClient, SearchOptions, SortBy, TransitionOptions,
};
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// First page of a search.
    Search(SearchArgs),
    /// Search, then pull older (or lower ranked) pages.
    More {
        #[command(flatten)]
        search: SearchArgs,
        /// Number of extra pages.
        #[arg(long, default_value_t = 1)]
        times: usize,
    },
    /// Search, then fetch tweets posted since the first page.
    Latest {
        query: String,
        #[arg(long)]
        media: bool,
    },
    /// Trending words and popular tweets.
    Trend,
    /// Tweet volume over time for a query.
    Transition {
        query: String,
        #[arg(long)]
        media: bool,
        /// Bucket width in seconds.
        #[arg(long, default_value_t = DEFAULT_INTERVAL)]
        interval: u64,
        /// Covered period in seconds.
        #[arg(long, default_value_t = DEFAULT_SPAN)]
        span: u64,
    },
    /// Replies to a tweet.
    Replies {
        tweet_id: String,
        /// Number of reply pages.
        #[arg(long, default_value_t = 1)]
        times: usize,
    },
    /// A single tweet by id.
    Tweet { id: String },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,
    /// Only tweets with images.
    #[arg(long)]
    pub media: bool,
    /// `newest` or `hottest`.
    #[arg(long, default_value_t = SortBy::Newest)]
    pub sort: SortBy,
}

impl SearchArgs {
    fn options(&self) -> SearchOptions {
        SearchOptions {
            search_media: self.media,
            sort_by: self.sort,
        }
    }
}

pub async fn run(client: &RealtimeClient, command: Command) -> Result<()> {
    match command {
        Command::Search(args) => {
            let session = client.search(&args.query, args.options()).await?;
            tracing::info!(
                query = %args.query,
                results = session.results().len(),
                more = ?session.cursor_more(),
                "app.search.done"
            );
            print_json(&session.results())
        }
        Command::More { search, times } => {
            let mut session = client.search(&search.query, search.options()).await?;
            let older = session.get_more_tweets_times(times).await?;
            tracing::info!(
                query = %search.query,
                first_page = session.results().len() - older.len(),
                appended = older.len(),
                exhausted = session.cursor_more().is_none(),
                "app.more.done"
            );
            print_json(&older)
        }
        Command::Latest { query, media } => {
            let mut session = client
                .search(
                    &query,
                    SearchOptions {
                        search_media: media,
                        sort_by: SortBy::Newest,
                    },
                )
                .await?;
            print_json(&session.get_latest_tweets().await?)
        }
        Command::Trend => print_json(&client.get_trend().await?),
        Command::Transition {
            query,
            media,
            interval,
            span,
        } => {
            let snapshot = client
                .get_transition(
                    &query,
                    TransitionOptions {
                        search_media: media,
                        interval,
                        span,
                    },
                )
                .await?;
            print_json(&snapshot)
        }
        Command::Replies { tweet_id, times } => {
            let mut pager = client.replies_to(tweet_id);
            print_json(&pager.get_replies_times(times).await?)
        }
        Command::Tweet { id } => print_json(&client.tweet_by_id(&id).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialising output")?;
    println!("{out}");
    Ok(())
}
