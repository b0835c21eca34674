use chrono::NaiveDate;
use thiserror::Error;

/// Text rendered in place of a date when a timeline could not be parsed.
pub const INVALID_FORMAT: &str = "Invalid Format";

const RANGE_SEPARATOR: char = '~';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("timeline '{0}' contains more than one '~' separator")]
    MultipleSeparators(String),
    #[error("date '{0}' matches neither YYYY/M/D nor YYYY/M")]
    UnrecognizedDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Canonical dates derived from a `Timeline` cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Dated(DateSpan),
    InvalidFormat,
}

impl Schedule {
    /// Parses a timeline cell, collapsing any failure into [`Schedule::InvalidFormat`].
    pub fn resolve(timeline: Option<&str>, default_end: &str) -> (Self, Option<TimelineError>) {
        let text = timeline.unwrap_or_default();
        match parse_timeline(text, default_end) {
            Ok(span) => (Schedule::Dated(span), None),
            Err(err) => (Schedule::InvalidFormat, Some(err)),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Schedule::Dated(_))
    }

    pub fn start_text(&self) -> String {
        match self {
            Schedule::Dated(span) => format_date(span.start),
            Schedule::InvalidFormat => INVALID_FORMAT.to_string(),
        }
    }

    pub fn end_text(&self) -> String {
        match self {
            Schedule::Dated(span) => format_date(span.end),
            Schedule::InvalidFormat => INVALID_FORMAT.to_string(),
        }
    }
}

/// Converts `start~end`, `start~` or a lone `start` into a pair of dates.
///
/// An empty or missing end falls back to `default_end`, which is parsed with the same
/// rules as any other token.
pub fn parse_timeline(text: &str, default_end: &str) -> Result<DateSpan, TimelineError> {
    let (start_token, end_token) = match text.split_once(RANGE_SEPARATOR) {
        Some((start, end)) => {
            if end.contains(RANGE_SEPARATOR) {
                return Err(TimelineError::MultipleSeparators(text.to_string()));
            }
            let end = end.trim();
            (start, if end.is_empty() { default_end } else { end })
        }
        None => (text, default_end),
    };

    let start = parse_date_token(start_token)?;
    let end = parse_date_token(end_token)?;
    Ok(DateSpan { start, end })
}

/// Parses `YYYY/M/D`, falling back to `YYYY/M` pinned to the first of the month.
pub fn parse_date_token(token: &str) -> Result<NaiveDate, TimelineError> {
    let token = token.trim();
    if !has_four_digit_year(token) {
        return Err(TimelineError::UnrecognizedDate(token.to_string()));
    }

    NaiveDate::parse_from_str(token, "%Y/%m/%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{token}/1"), "%Y/%m/%d"))
        .map_err(|_| TimelineError::UnrecognizedDate(token.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn has_four_digit_year(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() > 5 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'/'
}
