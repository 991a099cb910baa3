//! Small shared helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Parse a timestamp the way upstream services send them: epoch
/// milliseconds (number or numeric string), RFC 3339, or a couple of common
/// date layouts. Returns `None` for anything else.
pub(crate) fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => parse_datetime_str(s),
        _ => None,
    }
}

/// String flavor of [`parse_datetime`]
pub(crate) fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&ndt));
    }
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&nd.and_hms_opt(0, 0, 0)?));
    }
    if let Ok(millis) = s.parse::<i64>() {
        return Utc.timestamp_millis_opt(millis).single();
    }
    None
}
