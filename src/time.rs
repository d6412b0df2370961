//! Date/time values on a numeric axis.
//!
//! Time series are plotted against seconds since the Unix epoch (UTC).
//! Text cells and limit bounds are parsed into that scale, and tick
//! positions are formatted back with a strftime pattern.

use crate::error::{PlotError, Result};
use crate::option::OptionValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// Tick format of time subplots unless the style sets `xFmt`.
pub const DEFAULT_X_FORMAT: &str = "%m/%d";

const DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

/// Seconds since the epoch for a date or date-time string, or `None` when
/// no known layout matches. Offsets are honoured for RFC 3339 input; other
/// layouts are read as UTC.
pub fn parse_datetime(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis() as f64 / 1000.0);
    }
    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc().timestamp_millis() as f64 / 1000.0)
}

/// Format epoch seconds with a strftime pattern. Values outside chrono's
/// range and invalid patterns yield `None`.
pub fn format_timestamp(seconds: f64, pattern: &str) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    let dt = DateTime::from_timestamp(whole as i64, nanos)?;
    let mut out = String::new();
    write!(out, "{}", dt.format(pattern)).ok()?;
    Some(out)
}

/// One bound of an axis limit: `null` is open, a number is used as is and
/// a string is read as a date.
pub fn limit_bound(value: &OptionValue) -> Result<Option<f64>> {
    match value {
        OptionValue::Null => Ok(None),
        OptionValue::Number(v) => Ok(Some(*v)),
        OptionValue::Text(text) => parse_datetime(text)
            .map(Some)
            .ok_or_else(|| PlotError::config(format!("cannot read '{}' as a date", text))),
        other => Err(PlotError::config(format!(
            "a limit bound must be a number, a date or null, got {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layouts() {
        assert_eq!(parse_datetime("1970-01-02"), Some(86_400.0));
        assert_eq!(parse_datetime("1970/01/01 00:01:00"), Some(60.0));
        assert_eq!(parse_datetime("1970-01-01T00:00:01.5"), Some(1.5));
        assert_eq!(parse_datetime("1970-01-01T09:00:00+09:00"), Some(0.0));
        assert_eq!(parse_datetime(" 2018/08/10 12:30 "), parse_datetime("2018-08-10 12:30:00"));
        assert_eq!(parse_datetime("tuesday"), None);
        assert_eq!(parse_datetime("12.5"), None);
    }

    #[test]
    fn test_format_timestamp() {
        let t = parse_datetime("2018/08/10 06:00:00").unwrap();
        assert_eq!(format_timestamp(t, DEFAULT_X_FORMAT).as_deref(), Some("08/10"));
        assert_eq!(format_timestamp(t, "%H:%M").as_deref(), Some("06:00"));
        assert_eq!(format_timestamp(f64::NAN, "%H"), None);
        assert_eq!(format_timestamp(t, "%Q"), None);
    }

    #[test]
    fn test_limit_bound() {
        assert_eq!(limit_bound(&OptionValue::Null).unwrap(), None);
        assert_eq!(limit_bound(&3.0.into()).unwrap(), Some(3.0));
        assert_eq!(limit_bound(&"1970-01-01 00:00:10".into()).unwrap(), Some(10.0));
        assert!(matches!(limit_bound(&"soon".into()), Err(PlotError::Configuration(_))));
        assert!(limit_bound(&OptionValue::Bool(true)).is_err());
    }
}
