//! Wire schema of the backend's JSON, kept separate from the public records.
//!
//! Required fields fail deserialization when absent. Optional fields go through
//! the `lenient*` helpers so that a missing, `null` or re-shaped value falls back
//! to its default instead of rejecting the whole record.
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

pub(crate) fn lenient<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).unwrap_or_default())
}

/// Keep the well-formed items of an array, drop the rest.
pub(crate) fn lenient_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Ids show up both as JSON strings and as numbers.
pub(crate) fn string_or_number<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}

/// Integers sometimes arrive as decimal strings (`"1700000900"`).
fn number_or_numeric_string<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromStr,
    T::Err: std::fmt::Display,
{
    match Value::deserialize(d)? {
        Value::String(s) => s.trim().parse().map_err(D::Error::custom),
        v @ Value::Number(_) => serde_json::from_value(v).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected integer or numeric string, found {other}"
        ))),
    }
}

fn lenient_string<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_number(d).unwrap_or_default())
}

/// Word lists arrive either as plain strings or as `{ "query": ... }` objects.
fn lenient_words<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Object(mut obj) => match obj.remove("query") {
                    Some(Value::String(s)) => Some(s),
                    _ => None,
                },
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

// ==============================
// __NEXT_DATA__ envelope
// ==============================

#[derive(Debug, Clone, Deserialize)]
pub struct NextData {
    pub props: NextProps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextProps {
    pub page_props: PageProps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps {
    pub page_data: PageData,
}

/// Sections of a rendered page; which ones are present depends on the page.
///
/// `timeline` is strict when present: search pages must carry a well-formed
/// one, while the trend and tweet pages have none at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    #[serde(default)]
    pub timeline: Option<Timeline>,
    #[serde(default, deserialize_with = "lenient")]
    pub pagination: Pagination,
    #[serde(default, deserialize_with = "lenient")]
    pub buzz_trend: Items<RawTrendItem>,
    #[serde(default, deserialize_with = "lenient")]
    pub poptw: Items<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub hot_buzz: Items<RawHotBuzzItem>,
    #[serde(default)]
    pub best_tweet: Option<Value>,
}

/// Tweet records stay raw here; they are mapped one by one, all-or-nothing.
/// An explicit empty `entry` is an empty page; a missing one is an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timeline {
    pub entry: Vec<Value>,
}

/// Body of the JSON pagination endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineResponse {
    pub timeline: Timeline,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "lenient")]
    pub params: PaginationParams,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "lenient")]
    pub crumb: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Items<T> {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub items: Vec<T>,
}

impl<T> Default for Items<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

// ==============================
// Records
// ==============================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTweet {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub display_text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub verified: bool,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub urls: Vec<RawUrl>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub hashtags: Vec<RawHashtag>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub mentions: Vec<RawMention>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub reply_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub rt_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub likes_count: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub screen_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub quoted_tweet: Option<RawQuotedTweet>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub media: Vec<RawMedia>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUrl {
    pub expanded_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHashtag {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMention {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuotedTweet {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMedia {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub item: RawMediaItem,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMediaItem {
    pub url: String,
}

/// Reduced tweet shown in the "popular tweets" block of a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPopularTweet {
    pub url: String,
    pub body: String,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reply: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub rt: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub like: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrendItem {
    pub query: String,
    #[serde(default, deserialize_with = "lenient")]
    pub rank_up: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub tweet_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "lenient_words")]
    pub child_buzz: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHotBuzzItem {
    pub query: String,
}

// ==============================
// Transition
// ==============================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransitionResponse {
    pub tweet_transition: RawTweetTransition,
    #[serde(default, deserialize_with = "lenient")]
    pub sentiment_pie_chart: RawSentiment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTweetTransition {
    #[serde(default, deserialize_with = "lenient")]
    pub head: RawTransitionHead,
    #[serde(default)]
    pub entry: Vec<RawTransitionEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransitionHead {
    #[serde(default, deserialize_with = "lenient")]
    pub total_results_available: u64,
}

/// Buckets come either as `[timestamp, count]` pairs or as small objects.
/// A bucket matching neither shape fails the whole series.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTransitionEntry {
    Pair(
        #[serde(deserialize_with = "number_or_numeric_string")] i64,
        #[serde(deserialize_with = "number_or_numeric_string")] u64,
    ),
    Point {
        #[serde(alias = "time", alias = "date", deserialize_with = "number_or_numeric_string")]
        timestamp: i64,
        #[serde(alias = "value", alias = "total", deserialize_with = "number_or_numeric_string")]
        count: u64,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSentiment {
    #[serde(default, deserialize_with = "lenient")]
    pub positive: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub negative: f64,
}
