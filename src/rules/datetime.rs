//! Date and time rules.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::Value;

use super::Rule;
use crate::error::RuleError;

/// A timestamp parsed from an ISO-8601 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoDateTime {
    /// The wall-clock date and time as written.
    pub naive: NaiveDateTime,
    /// The UTC offset, if the string carried one. `Z` parses as `+00:00`.
    pub offset: Option<FixedOffset>,
}

impl IsoDateTime {
    /// Returns the timestamp as an offset-aware datetime, if it has an offset.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.naive.and_local_timezone(self.offset?).single()
    }

    /// Renders the canonical form `YYYY-MM-DDTHH:MM:SS[.ffffff][±HH:MM]`.
    pub fn to_iso_string(&self) -> String {
        let mut out = if self.naive.nanosecond() / 1_000 == 0 {
            self.naive.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            self.naive.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
        };
        if let Some(offset) = self.offset {
            let secs = offset.local_minus_utc();
            let sign = if secs < 0 { '-' } else { '+' };
            let secs = secs.abs();
            out.push_str(&format!("{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60));
        }
        out
    }
}

fn parse_offset(tail: &str) -> Option<FixedOffset> {
    let bytes = tail.as_bytes();
    if bytes.len() != 6 || bytes[3] != b':' {
        return None;
    }
    let digits = |range: std::ops::Range<usize>| -> Option<i32> {
        let part = tail.get(range)?;
        if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };
    let secs = digits(1..3)? * 3600 + digits(4..6)? * 60;
    match bytes[0] {
        b'+' => FixedOffset::east_opt(secs),
        b'-' => FixedOffset::west_opt(secs),
        _ => None,
    }
}

fn two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Parses `HH`, `HH:MM`, `HH:MM:SS` or `HH:MM:SS.f` with one to six fraction
/// digits.
fn parse_time(s: &str) -> Option<NaiveTime> {
    let (clock, fraction) = match s.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (s, None),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() > 3 || (fraction.is_some() && parts.len() != 3) {
        return None;
    }
    let hour = two_digits(parts[0])?;
    let minute = match parts.get(1) {
        Some(part) => two_digits(part)?,
        None => 0,
    };
    let second = match parts.get(2) {
        Some(part) => two_digits(part)?,
        None => 0,
    };
    let micro = match fraction {
        Some(f) if (1..=6).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit()) => {
            f.parse::<u32>().ok()? * 10u32.pow(6 - f.len() as u32)
        }
        Some(_) => return None,
        None => 0,
    };

    NaiveTime::from_hms_micro_opt(hour, minute, second, micro)
}

fn is_iso_date(s: &str) -> bool {
    s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn split_offset(s: &str) -> (&str, Option<FixedOffset>) {
    if let Some(body) = s.strip_suffix('Z') {
        return (body, FixedOffset::east_opt(0));
    }
    if s.len() > 6 && s.is_char_boundary(s.len() - 6) {
        let (body, tail) = s.split_at(s.len() - 6);
        if let Some(offset) = parse_offset(tail) {
            return (body, Some(offset));
        }
    }
    (s, None)
}

/// Accepts ISO-8601 dates and datetimes and normalizes them.
///
/// Accepted shapes are `YYYY-MM-DD`, `YYYY-MM-DDTHH`, `YYYY-MM-DDTHH:MM`,
/// `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DDTHH:MM:SS.ffffff`, each optionally
/// followed by `Z` or `±HH:MM`. A space may replace the `T`.
///
/// On success the value is replaced by its canonical form, so validating the
/// output again yields the same string.
///
/// # Example
///
/// ```rust
/// use reqguard::{IsDatetimeIsoFormat, Rule};
/// use serde_json::json;
///
/// let out = IsDatetimeIsoFormat.validate(&json!("2021-01-01T10Z")).unwrap();
/// assert_eq!(out, json!("2021-01-01T10:00:00+00:00"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IsDatetimeIsoFormat;

impl IsDatetimeIsoFormat {
    /// Parses an ISO-8601 string into a typed timestamp.
    pub fn parse(s: &str) -> Result<IsoDateTime, RuleError> {
        let (body, offset) = split_offset(s.trim());
        let date_part = body.get(..10).filter(|d| is_iso_date(d)).ok_or(RuleError::DtIsoFormat)?;
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| RuleError::DtIsoFormat)?;

        let rest = &body[10..];
        let time = if rest.is_empty() {
            NaiveTime::MIN
        } else {
            let time_part = rest
                .strip_prefix('T')
                .or_else(|| rest.strip_prefix(' '))
                .ok_or(RuleError::DtIsoFormat)?;
            parse_time(time_part).ok_or(RuleError::DtIsoFormat)?
        };

        Ok(IsoDateTime {
            naive: date.and_time(time),
            offset,
        })
    }
}

impl Rule for IsDatetimeIsoFormat {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let s = value.as_str().ok_or(RuleError::DtIsoFormat)?;
        Ok(Value::String(Self::parse(s)?.to_iso_string()))
    }

    fn name(&self) -> &'static str {
        "IsDatetimeIsoFormat"
    }
}

/// Accepts strings matching a strftime-style format.
///
/// Date-only and time-only formats are accepted. The string itself is kept as
/// the validated value; use [`Datetime::parse`] for a typed timestamp.
///
/// # Example
///
/// ```rust
/// use reqguard::{Datetime, Rule};
/// use serde_json::json;
///
/// let rule = Datetime::new("%d.%m.%Y");
/// assert!(rule.validate(&json!("24.12.2020")).is_ok());
/// assert!(rule.validate(&json!("2020-12-24")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datetime {
    format: String,
}

impl Datetime {
    pub fn new(format: impl Into<String>) -> Self {
        Self { format: format.into() }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parses a string with this rule's format.
    ///
    /// Formats without a date resolve to 1900-01-01; formats without a time
    /// resolve to midnight. An offset in the format is parsed and dropped.
    pub fn parse(&self, s: &str) -> Result<NaiveDateTime, RuleError> {
        let fmt = self.format.as_str();
        NaiveDateTime::parse_from_str(s, fmt)
            .ok()
            .or_else(|| NaiveDate::parse_from_str(s, fmt).ok().map(|d| d.and_time(NaiveTime::MIN)))
            .or_else(|| DateTime::parse_from_str(s, fmt).ok().map(|dt| dt.naive_local()))
            .or_else(|| {
                let time = NaiveTime::parse_from_str(s, fmt).ok()?;
                Some(NaiveDate::from_ymd_opt(1900, 1, 1)?.and_time(time))
            })
            .ok_or_else(|| RuleError::Datetime {
                format: self.format.clone(),
            })
    }
}

impl Rule for Datetime {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let s = value.as_str().ok_or_else(|| RuleError::Datetime {
            format: self.format.clone(),
        })?;
        self.parse(s)?;
        Ok(value.clone())
    }

    fn name(&self) -> &'static str {
        "Datetime"
    }
}
