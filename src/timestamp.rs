//! Timestamp normalization
//!
//! The API mixes epoch numbers and ISO-8601 strings. Numbers above 1e12 are
//! taken as milliseconds, anything smaller as seconds. That heuristic holds
//! for dates between 2001 and 33658 AD, which covers the service's lifetime.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::ParseError;

/// Epoch values above this are milliseconds
pub const MILLIS_THRESHOLD: f64 = 1e12;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Normalize a JSON number or string into a UTC instant
pub fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, ParseError> {
    match value {
        Value::Number(n) => {
            let raw = n
                .as_f64()
                .ok_or_else(|| ParseError::InvalidTimestamp(n.to_string()))?;
            from_epoch(raw)
        }
        Value::String(s) => parse_timestamp_str(s),
        other => Err(ParseError::InvalidTimestamp(format!(
            "expected number or string, got {}",
            other
        ))),
    }
}

/// Convert epoch seconds or milliseconds into a UTC instant
pub fn from_epoch(raw: f64) -> Result<DateTime<Utc>, ParseError> {
    if !raw.is_finite() || raw < 0.0 {
        return Err(ParseError::InvalidTimestamp(raw.to_string()));
    }

    let millis = if raw > MILLIS_THRESHOLD {
        raw
    } else {
        raw * 1000.0
    };

    if millis > i64::MAX as f64 {
        return Err(ParseError::InvalidTimestamp(raw.to_string()));
    }

    DateTime::from_timestamp_millis(millis.round() as i64)
        .ok_or_else(|| ParseError::InvalidTimestamp(raw.to_string()))
}

/// Parse an ISO-8601 string. Offset-less values and bare dates are UTC.
pub fn parse_timestamp_str(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    let s = raw.trim();

    // RFC 3339 accepts a trailing `Z` as +00:00
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(ParseError::InvalidTimestamp(raw.to_string()))
}
