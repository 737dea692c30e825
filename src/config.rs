//! Explicit chart configuration, passed by value into each call.
//!
//! Every field has a default, so a JSON file only needs to mention what it
//! changes:
//!
//! ```
//! let cfg = sheetchart::ChartConfig::from_json_str(
//!     r#"{ "data": { "format": "long", "date_formats": ["mmmYY", "%Y-%m-%d"] } }"#,
//! )?;
//! assert_eq!(cfg.labels.min_distance, 16.0);
//! # Ok::<(), sheetchart::Error>(())
//! ```

use crate::dates::{DateNormalizer, FormatPattern, MonthLocale};
use crate::error::Result;
use crate::labels::RelaxationMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Table layout of the CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// One date column plus one column per series.
    #[default]
    Wide,
    /// `date, series, value` triples.
    Long,
}

/// How numeric cells are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberStyle {
    /// `1,234.5`, `$12`, `45%`
    #[default]
    Plain,
    /// `1.234,5`
    DecimalComma,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub format: DataFormat,
    /// Header of the date column; `None` auto-detects it.
    pub date_field: Option<String>,
    pub date_formats: Vec<FormatPattern>,
    /// Extra month aliases merged over the Spanish table.
    pub month_aliases: BTreeMap<String, String>,
    /// Wide format only: series columns to keep (all non-date columns when `None`).
    pub columns: Option<Vec<String>>,
    /// Long format only.
    pub category_field: String,
    /// Long format only.
    pub value_field: String,
    pub number_style: NumberStyle,
    /// Label text per series key.
    pub display_names: BTreeMap<String, String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            format: DataFormat::Wide,
            date_field: None,
            date_formats: Vec::new(),
            month_aliases: BTreeMap::new(),
            columns: None,
            category_field: "series".into(),
            value_field: "value".into(),
            number_style: NumberStyle::Plain,
            display_names: BTreeMap::new(),
        }
    }
}

impl DataConfig {
    /// Configured patterns, or `%Y-%m-%d` when none are set.
    pub fn effective_formats(&self) -> Vec<FormatPattern> {
        if self.date_formats.is_empty() {
            FormatPattern::strftime("%Y-%m-%d").into_iter().collect()
        } else {
            self.date_formats.clone()
        }
    }

    pub fn normalizer(&self) -> DateNormalizer {
        DateNormalizer::new(MonthLocale::spanish().extend(&self.month_aliases))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub font_px: f64,
    pub min_distance: f64,
    pub max_width: f64,
    pub relaxation: RelaxationMode,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_px: 12.0,
            min_distance: 16.0,
            max_width: 140.0,
            relaxation: RelaxationMode::Forward,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub data: DataConfig,
    pub labels: LabelConfig,
}

impl ChartConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = ChartConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, ChartConfig::default());
        assert_eq!(cfg.data.effective_formats().len(), 1);
        assert_eq!(cfg.labels.max_width, 140.0);
    }

    #[test]
    fn full_config_is_read() {
        let cfg = ChartConfig::from_json_str(
            r#"{
                "data": {
                    "format": "long",
                    "date_field": "Fecha",
                    "date_formats": ["%b-%y", "mmmYY"],
                    "month_aliases": { "mrt": "mar" },
                    "number_style": "decimal_comma"
                },
                "labels": { "min_distance": 20, "relaxation": "symmetric" }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.data.format, DataFormat::Long);
        assert_eq!(cfg.data.date_field.as_deref(), Some("Fecha"));
        assert_eq!(cfg.data.date_formats[1], FormatPattern::MmmYy);
        assert_eq!(cfg.data.number_style, NumberStyle::DecimalComma);
        assert_eq!(cfg.data.normalizer().locale().lookup("MRT"), Some("mar"));
        assert_eq!(cfg.labels.min_distance, 20.0);
        assert_eq!(cfg.labels.font_px, 12.0);
        assert_eq!(cfg.labels.relaxation, RelaxationMode::Symmetric);
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        let err = ChartConfig::from_json_str(r#"{ "data": { "date_formats": ["%Q"] } }"#);
        assert!(err.is_err());
    }
}
