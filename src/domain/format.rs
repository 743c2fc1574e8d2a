// Display formatting for phone numbers, durations and timestamps
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use thiserror::Error;

const UNKNOWN_DISPLAY: &str = "Unknown";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("phone number is missing")]
    Missing,
    #[error("cannot format a phone number with {0} digits")]
    UnsupportedLength(usize),
}

/// Strict phone formatting: 10 digits as a national number, 11 digits with a
/// leading `1` as a NANP international number.
pub fn try_format_phone_number(raw: &str) -> Result<String, FormatError> {
    if raw.is_empty() || raw == "unknown" {
        return Err(FormatError::Missing);
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 => Ok(format!(
            "({}) {}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..10]
        )),
        11 if digits.starts_with('1') => Ok(format!(
            "+1 ({}) {}-{}",
            &digits[1..4],
            &digits[4..7],
            &digits[7..11]
        )),
        n => Err(FormatError::UnsupportedLength(n)),
    }
}

/// Best-effort phone formatting. Numbers that cannot be formatted are echoed
/// back unchanged.
pub fn format_phone_number(raw: &str) -> String {
    match try_format_phone_number(raw) {
        Ok(formatted) => formatted,
        Err(FormatError::Missing) => UNKNOWN_DISPLAY.to_string(),
        Err(FormatError::UnsupportedLength(_)) => raw.to_string(),
    }
}

/// `MM:SS` for a non-negative number of seconds. Fractions are floored and
/// minutes keep growing past 99.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Duration column of a call row; absent or zero durations show `00:00`.
pub fn format_call_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s != 0.0 => format_duration(s),
        _ => format_duration(0.0),
    }
}

pub(crate) enum ParsedTimestamp {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<ParsedTimestamp> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(ParsedTimestamp::Zoned(dt));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(ParsedTimestamp::Naive)
}

/// `HH:MM:SS` in the viewer's local time. Zoned input is converted to the
/// local timezone; naive input is already local. Unparseable input is
/// returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ParsedTimestamp::Zoned(dt)) => dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
        Some(ParsedTimestamp::Naive(dt)) => dt.format("%H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// Trailing eight characters of a call SID.
pub fn short_sid(sid: &str) -> &str {
    match sid.char_indices().rev().nth(7) {
        Some((idx, _)) => &sid[idx..],
        None => sid,
    }
}
