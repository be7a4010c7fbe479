//! Pull the embedded `__NEXT_DATA__` JSON out of rendered pages.
use crate::error::{RealtimeError, Result};
use crate::types::{NextData, PageData, TimelineResponse};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

static NEXT_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script[^>]*\bid="__NEXT_DATA__"[^>]*>(.+?)</script>"#)
        .expect("valid __NEXT_DATA__ pattern")
});

/// JSON payload of the page's `__NEXT_DATA__` script.
pub fn extract_next_data(html: &str) -> Result<Value> {
    let raw = NEXT_DATA
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or_else(|| RealtimeError::MalformedRecord("page has no __NEXT_DATA__ script".into()))?;

    serde_json::from_str(raw.as_str())
        .map_err(|e| RealtimeError::MalformedRecord(format!("__NEXT_DATA__ is not valid JSON: {e}")))
}

/// `props.pageProps.pageData` of a page payload.
pub fn page_data(next_data: &Value) -> Result<PageData> {
    let next = NextData::deserialize(next_data)
        .map_err(|e| RealtimeError::MalformedRecord(format!("page payload: {e}")))?;
    Ok(next.props.page_props.page_data)
}

/// Raw tweet records of a JSON pagination response.
pub fn timeline_entries(payload: &Value) -> Result<Vec<Value>> {
    let response = TimelineResponse::deserialize(payload)
        .map_err(|e| RealtimeError::MalformedRecord(format!("timeline payload: {e}")))?;
    Ok(response.timeline.entry)
}
