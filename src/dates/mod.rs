//! Date normalization: turn heterogeneous spreadsheet date cells into calendar dates.
//!
//! - Locale month tokens are rewritten first (`Ene-20` → `jan-20`), see [`MonthLocale`]
//! - Explicit patterns are tried in order; the **first** match wins
//! - A generic free-form parse is the last resort
//! - Nothing here fails: bad input yields [`ParsedDate::Unparseable`]

mod fallback;
pub mod locale;
pub mod pattern;

pub use locale::MonthLocale;
pub use pattern::{FormatPattern, TWO_DIGIT_YEAR_PIVOT, parse_patterns};

use crate::models::ParsedDate;
use log::trace;

/// Reads raw date cells against an ordered list of [`FormatPattern`]s.
#[derive(Debug, Clone, Default)]
pub struct DateNormalizer {
    locale: MonthLocale,
}

impl DateNormalizer {
    pub fn new(locale: MonthLocale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> &MonthLocale {
        &self.locale
    }

    /// Parse `raw`, trying `formats` in order before the free-form fallback.
    ///
    /// Deterministic and total: empty, whitespace-only or non-date text yields
    /// `ParsedDate::Unparseable`.
    ///
    /// ```
    /// use sheetchart::dates::{DateNormalizer, FormatPattern};
    /// use sheetchart::ParsedDate;
    /// use chrono::NaiveDate;
    ///
    /// let norm = DateNormalizer::default();
    /// let got = norm.parse("Ene-20", &[FormatPattern::MmmYy]);
    /// assert_eq!(got, ParsedDate::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()));
    /// ```
    pub fn parse(&self, raw: &str, formats: &[FormatPattern]) -> ParsedDate {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ParsedDate::Unparseable;
        }
        let text = self.locale.normalize(trimmed);

        for pattern in formats {
            if let Some(date) = pattern.parse(&text) {
                trace!("{raw:?} matched pattern `{pattern}` -> {date}");
                return ParsedDate::Date(date);
            }
        }

        let parsed = ParsedDate::from(fallback::parse_free_form(&text));
        trace!("{raw:?} fell back to free-form parse -> {parsed:?}");
        parsed
    }
}

/// Parse with the default (Spanish-aware) month table.
pub fn parse_date(raw: &str, formats: &[FormatPattern]) -> ParsedDate {
    DateNormalizer::default().parse(raw, formats)
}
