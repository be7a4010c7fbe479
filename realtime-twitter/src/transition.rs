use crate::error::{RealtimeError, Result};
use crate::types::{RawTransitionEntry, RawTransitionResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPoint {
    /// Bucket start, epoch seconds.
    pub timestamp: i64,
    pub count: u64,
}

/// Tweet volume over time plus the sentiment split of the same period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub total: u64,
    pub transitions: Vec<TransitionPoint>,
    /// Share of positive tweets, in `[0, 1]`.
    pub positive: f64,
    /// Share of negative tweets, in `[0, 1]`.
    pub negative: f64,
}

impl TransitionSnapshot {
    pub fn from_response(payload: &Value) -> Result<Self> {
        let raw = RawTransitionResponse::deserialize(payload)
            .map_err(|e| RealtimeError::MalformedRecord(format!("transition payload: {e}")))?;

        let transitions = raw
            .tweet_transition
            .entry
            .into_iter()
            .map(|e| match e {
                RawTransitionEntry::Pair(timestamp, count) => TransitionPoint { timestamp, count },
                RawTransitionEntry::Point { timestamp, count } => {
                    TransitionPoint { timestamp, count }
                }
            })
            .collect();
        let (positive, negative) = normalize_sentiment(
            raw.sentiment_pie_chart.positive,
            raw.sentiment_pie_chart.negative,
        );

        Ok(Self {
            total: raw.tweet_transition.head.total_results_available,
            transitions,
            positive,
            negative,
        })
    }
}

/// `interval` and `span` must be positive and `interval <= span`.
pub(crate) fn validate_window(interval: u64, span: u64) -> Result<()> {
    if interval == 0 {
        return Err(RealtimeError::InvalidArgument("interval must be > 0".into()));
    }
    if span == 0 {
        return Err(RealtimeError::InvalidArgument("span must be > 0".into()));
    }
    if interval > span {
        return Err(RealtimeError::InvalidArgument(format!(
            "interval ({interval}s) must not exceed span ({span}s)"
        )));
    }
    Ok(())
}

/// The backend reports either ratios or percentages for the pair; a value
/// above 1 on either side means both are percentages. Each share is then
/// clamped into `[0, 1]`, and a pair summing past 1 is scaled down together.
fn normalize_sentiment(positive: f64, negative: f64) -> (f64, f64) {
    let finite = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let (mut p, mut n) = (finite(positive), finite(negative));
    if p > 1.0 || n > 1.0 {
        p /= 100.0;
        n /= 100.0;
    }
    let (p, n) = (p.min(1.0), n.min(1.0));
    let sum = p + n;
    if sum > 1.0 { (p / sum, n / sum) } else { (p, n) }
}
