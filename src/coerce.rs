//! Coercions for use with `preprocess`
//!
//! # Example
//!
//! ```
//! use weir::prelude::*;
//!
//! let schema = weir::date().preprocess(weir::coerce::date);
//! assert!(schema.parse("2022-01-12T00:00:00.000Z").is_ok());
//! assert!(schema.parse("1/12/22").is_ok());
//!
//! let report = schema.safe_parse("not a date").into_result().unwrap_err();
//! assert_eq!(report.codes(), vec![IssueCode::InvalidDate]);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::issue::{IssueData, IssueKind};
use crate::refine::RefinementCtx;
use crate::value::Value;

/// Turn strings and epoch-millisecond numbers into dates.
///
/// Unparseable strings and numbers report `invalid_date`; other values pass
/// through unchanged for the schema to reject.
pub fn date(value: Value, ctx: &mut RefinementCtx) -> Value {
    match value {
        Value::String(_) | Value::Number(_) => match read_date(&value) {
            Some(date) => Value::Date(date),
            None => {
                ctx.add_issue(IssueData::new(IssueKind::InvalidDate));
                value
            }
        },
        other => other,
    }
}

/// Read a date from a string or a number of milliseconds since the epoch.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` without an
/// offset, and US style `M/D/YY` or `M/D/YYYY`. Dates without an offset are
/// read as UTC.
pub(crate) fn read_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Number(millis) if millis.is_finite() => {
            DateTime::from_timestamp_millis(*millis as i64)
        }
        Value::String(text) => parse_date(text.trim()),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    parse_us_date(text)
}

fn parse_us_date(text: &str) -> Option<DateTime<Utc>> {
    let mut parts = text.split('/');
    let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let mut full_year: i32 = year.parse().ok()?;
    if year.len() <= 2 {
        full_year += if full_year < 50 { 2000 } else { 1900 };
    }
    NaiveDate::from_ymd_opt(full_year, month.parse().ok()?, day.parse().ok()?)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_reads_supported_formats() {
        let expected = Some(utc(2022, 1, 12));
        assert_eq!(read_date(&Value::from("2022-01-12T00:00:00.000Z")), expected);
        assert_eq!(read_date(&Value::from("2022-01-12T09:00:00+09:00")), expected);
        assert_eq!(read_date(&Value::from("2022-01-12")), expected);
        assert_eq!(read_date(&Value::from("2022-01-12T00:00:00")), expected);
        assert_eq!(read_date(&Value::from("1/12/22")), expected);
        assert_eq!(read_date(&Value::from("01/12/2022")), expected);
        assert_eq!(read_date(&Value::from("1/12/99")), Some(utc(1999, 1, 12)));
    }

    #[test]
    fn test_reads_epoch_millis() {
        assert_eq!(read_date(&Value::from(0)), Some(utc(1970, 1, 1)));
        assert_eq!(read_date(&Value::Number(f64::NAN)), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(read_date(&Value::from("yesterday")), None);
        assert_eq!(read_date(&Value::from("13/45/2022")), None);
        assert_eq!(read_date(&Value::from("1/2/3/4")), None);
    }

    #[test]
    fn test_coerce_reports_invalid_date() {
        let mut ctx = RefinementCtx::new(Vec::new());
        let out = date(Value::from("soon"), &mut ctx);
        assert_eq!(out, Value::from("soon"));
        assert_eq!(ctx.issue_count(), 1);

        let mut ctx = RefinementCtx::new(Vec::new());
        assert_eq!(date(Value::Null, &mut ctx), Value::Null);
        assert_eq!(ctx.issue_count(), 0);
    }
}
