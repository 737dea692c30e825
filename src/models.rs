use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of normalizing one raw date cell.
///
/// `Unparseable` is an ordinary value, not an error: callers filter such rows
/// out before building a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParsedDate {
    Date(NaiveDate),
    Unparseable,
}

impl ParsedDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match *self {
            ParsedDate::Date(d) => Some(d),
            ParsedDate::Unparseable => None,
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, ParsedDate::Unparseable)
    }
}

impl From<Option<NaiveDate>> for ParsedDate {
    fn from(d: Option<NaiveDate>) -> Self {
        d.map_or(ParsedDate::Unparseable, ParsedDate::Date)
    }
}

/// One series' end-of-line label before layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTarget {
    /// Series identifier, unique within one layout pass.
    pub key: String,
    /// Unconstrained vertical pixel position.
    pub ideal_position: f64,
    /// Full label text before truncation.
    pub text: String,
}

impl LabelTarget {
    pub fn new(key: impl Into<String>, ideal_position: f64, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ideal_position,
            text: text.into(),
        }
    }
}

/// A label after collision resolution (and, optionally, truncation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLabel {
    pub key: String,
    pub ideal_position: f64,
    pub text: String,
    pub final_position: f64,
    pub display_text: String,
}

impl ResolvedLabel {
    /// Distance the label was pushed away from its ideal position.
    pub fn displacement(&self) -> f64 {
        self.final_position - self.ideal_position
    }
}

/// Tidy row used by this crate: one date, one optional value per series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataRow {
    pub date: NaiveDate,
    pub values: BTreeMap<String, Option<f64>>,
}

impl DataRow {
    pub fn value(&self, series: &str) -> Option<f64> {
        self.values.get(series).copied().flatten()
    }
}

/// Prepared dataset: rows sorted by date plus the series names in column order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub series: Vec<String>,
    pub rows: Vec<DataRow>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last row carrying a value for `series`, as `(date, value)`.
    pub fn last_defined(&self, series: &str) -> Option<(NaiveDate, f64)> {
        self.rows
            .iter()
            .rev()
            .find_map(|r| r.value(series).filter(|v| v.is_finite()).map(|v| (r.date, v)))
    }
}
