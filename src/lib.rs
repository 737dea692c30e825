//! sheetchart
//!
//! A small Rust library for preparing spreadsheet time series for line charts.
//! Pairs with the `sheetchart` CLI.
//!
//! ### Features
//! - Normalize heterogeneous date cells (`Jan-20`, `Ene-20`, `2020-01-05`, `01/2020`…)
//!   against an ordered list of format patterns, never failing on bad input
//! - Prepare wide or long CSV exports into a tidy, date-sorted dataset
//! - Lay out right-edge series labels without overlap and truncate them to a width
//! - Quick per-series summaries (min, max, mean, median, last value)
//!
//! ### Example
//! ```
//! use sheetchart::dates::{parse_date, FormatPattern};
//! use sheetchart::labels::{resolve_collisions, truncate_to_width};
//! use sheetchart::{LabelTarget, ParsedDate};
//!
//! let d = parse_date("Jan-99", &[FormatPattern::MmmYy]);
//! assert_eq!(d.as_date().map(|d| d.to_string()), Some("1999-01-01".to_string()));
//! assert_eq!(parse_date("not a date", &["%Y-%m-%d".parse()?]), ParsedDate::Unparseable);
//!
//! let targets = vec![
//!     LabelTarget::new("a", 100.0, "Nivel general"),
//!     LabelTarget::new("b", 105.0, "Situación económica general"),
//! ];
//! let labels = resolve_collisions(&targets, 16.0);
//! assert_eq!(labels[1].final_position, 121.0);
//!
//! let short = truncate_to_width(&labels[1].text, 80.0, |s: &str| 6.0 * s.chars().count() as f64);
//! assert_eq!(short, "Situación ec…");
//! # Ok::<(), sheetchart::Error>(())
//! ```

pub mod config;
pub mod dataset;
pub mod dates;
pub mod error;
pub mod labels;
pub mod models;
pub mod stats;
pub mod storage;

pub use config::ChartConfig;
pub use dates::{DateNormalizer, FormatPattern};
pub use error::{Error, Result};
pub use labels::LabelLayoutEngine;
pub use models::{DataRow, Dataset, LabelTarget, ParsedDate, ResolvedLabel};
