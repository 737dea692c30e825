//! Last-resort free-form date reading, used when no explicit pattern matches.

use super::pattern::Strftime;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::sync::LazyLock;

const DATE_TIME_FORMS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// Slash-separated numeric dates are read month-first.
const TEXTUAL_FORMS: [&str; 10] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %Y",
    "%b %Y",
    "%Y-%m",
];

static TEXTUAL: LazyLock<Vec<Strftime>> = LazyLock::new(|| {
    TEXTUAL_FORMS
        .iter()
        .filter_map(|f| Strftime::new(f).ok())
        .collect()
});

pub(crate) fn parse_free_form(input: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATE_TIME_FORMS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
    {
        return Some(dt.date());
    }
    if let Some(date) = TEXTUAL.iter().find_map(|f| f.parse(input)) {
        return Some(date);
    }
    // A bare year only counts with all four digits; "45" is a number, not a date.
    if input.len() == 4 && input.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::from_ymd_opt(input.parse().ok()?, 1, 1);
    }
    None
}
