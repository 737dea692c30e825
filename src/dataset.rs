//! Tabular preparation of spreadsheet CSV exports.
//!
//! Turns raw CSV text (wide or long layout) into a [`Dataset`]: one row per
//! parseable date, sorted ascending, with numeric values per series.
//! Fetching the CSV is the caller's business; anything implementing
//! `io::Read` works.

use crate::config::{DataConfig, DataFormat, NumberStyle};
use crate::dates::{DateNormalizer, FormatPattern};
use crate::error::{Error, Result};
use crate::models::{DataRow, Dataset, ParsedDate};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Rows inspected when auto-detecting the date column.
pub const DETECT_SAMPLE_ROWS: usize = 50;
/// Minimum share of parseable sample cells for a column to count as the date column.
pub const DETECT_MIN_SCORE: f64 = 0.5;

/// Coerce a spreadsheet cell into a number. Empty or non-numeric cells yield `None`.
pub fn parse_number(raw: &str, style: NumberStyle) -> Option<f64> {
    let cleaned: String = match style {
        NumberStyle::Plain => raw
            .chars()
            .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
            .collect(),
        NumberStyle::DecimalComma => raw
            .chars()
            .filter(|c| !matches!(c, '$' | '.' | '%') && !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect(),
    };
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Pick the column whose first [`DETECT_SAMPLE_ROWS`] cells parse as dates most often.
///
/// Ties go to the leftmost column. Returns the column index and its score.
pub fn detect_date_column(
    headers: &StringRecord,
    records: &[StringRecord],
    normalizer: &DateNormalizer,
    formats: &[FormatPattern],
) -> Result<(usize, f64)> {
    let sample = &records[..records.len().min(DETECT_SAMPLE_ROWS)];
    let mut best: Option<(usize, f64)> = None;
    if !sample.is_empty() {
        for col in 0..headers.len() {
            let ok = sample
                .iter()
                .filter(|r| !normalizer.parse(r.get(col).unwrap_or(""), formats).is_unparseable())
                .count();
            let score = ok as f64 / sample.len() as f64;
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((col, score));
            }
        }
    }
    match best {
        Some((col, score)) if score >= DETECT_MIN_SCORE => Ok((col, score)),
        other => Err(Error::DateColumnNotFound {
            best: other.and_then(|(col, _)| headers.get(col)).map(str::to_string),
            score: other.map_or(0.0, |(_, s)| s),
        }),
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingColumn(name.to_string()))
}

struct Table {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Table { headers, records })
}

/// Load and normalize a CSV export according to `cfg`.
pub fn load_reader<R: Read>(reader: R, cfg: &DataConfig) -> Result<Dataset> {
    let table = read_table(reader)?;
    let normalizer = cfg.normalizer();
    let formats = cfg.effective_formats();

    let date_col = match cfg.date_field.as_deref() {
        Some(name) => column_index(&table.headers, name)?,
        None => {
            let (col, score) =
                detect_date_column(&table.headers, &table.records, &normalizer, &formats)?;
            debug!(
                "using date column {:?} (score {score:.2})",
                table.headers.get(col).unwrap_or_default()
            );
            col
        }
    };

    let dataset = match cfg.format {
        DataFormat::Wide => prepare_wide(&table, date_col, cfg, &normalizer, &formats),
        DataFormat::Long => prepare_long(&table, date_col, cfg, &normalizer, &formats)?,
    };
    if dataset.is_empty() {
        warn!("no rows left after date parsing ({} raw rows)", table.records.len());
    }
    Ok(dataset)
}

pub fn load_str(csv_text: &str, cfg: &DataConfig) -> Result<Dataset> {
    load_reader(csv_text.as_bytes(), cfg)
}

pub fn load_path<P: AsRef<Path>>(path: P, cfg: &DataConfig) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    load_reader(file, cfg)
}

fn row_date(
    record: &StringRecord,
    line: usize,
    date_col: usize,
    normalizer: &DateNormalizer,
    formats: &[FormatPattern],
) -> Option<NaiveDate> {
    let raw = record.get(date_col).unwrap_or("");
    match normalizer.parse(raw, formats) {
        ParsedDate::Date(d) => Some(d),
        ParsedDate::Unparseable if raw.trim().is_empty() => None,
        ParsedDate::Unparseable => {
            warn!("row {line}: could not parse date {raw:?}, skipping");
            None
        }
    }
}

fn prepare_wide(
    table: &Table,
    date_col: usize,
    cfg: &DataConfig,
    normalizer: &DateNormalizer,
    formats: &[FormatPattern],
) -> Dataset {
    let columns: Vec<(usize, String)> = match &cfg.columns {
        Some(wanted) => wanted
            .iter()
            .filter_map(|name| match column_index(&table.headers, name) {
                Ok(i) => Some((i, name.clone())),
                Err(_) => {
                    warn!("configured column {name:?} not in CSV header, ignoring");
                    None
                }
            })
            .collect(),
        None => table
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_col)
            .map(|(i, h)| (i, h.to_string()))
            .collect(),
    };

    let mut rows: Vec<DataRow> = table
        .records
        .iter()
        .enumerate()
        .filter_map(|(i, rec)| {
            let date = row_date(rec, i + 2, date_col, normalizer, formats)?;
            let values = columns
                .iter()
                .map(|(col, name)| {
                    let v = rec.get(*col).and_then(|c| parse_number(c, cfg.number_style));
                    (name.clone(), v)
                })
                .collect();
            Some(DataRow { date, values })
        })
        .collect();
    rows.sort_by_key(|r| r.date);

    Dataset {
        series: columns.into_iter().map(|(_, name)| name).collect(),
        rows,
    }
}

fn prepare_long(
    table: &Table,
    date_col: usize,
    cfg: &DataConfig,
    normalizer: &DateNormalizer,
    formats: &[FormatPattern],
) -> Result<Dataset> {
    let cat_col = column_index(&table.headers, &cfg.category_field)?;
    let val_col = column_index(&table.headers, &cfg.value_field)?;

    let mut series: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<String, Option<f64>>> = BTreeMap::new();

    for (i, rec) in table.records.iter().enumerate() {
        let Some(date) = row_date(rec, i + 2, date_col, normalizer, formats) else {
            continue;
        };
        let name = rec.get(cat_col).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.to_string()) {
            series.push(name.to_string());
        }
        let value = rec.get(val_col).and_then(|c| parse_number(c, cfg.number_style));
        by_date.entry(date).or_default().insert(name.to_string(), value);
    }

    let rows = by_date
        .into_iter()
        .map(|(date, mut values)| {
            for s in &series {
                values.entry(s.clone()).or_insert(None);
            }
            DataRow { date, values }
        })
        .collect();
    Ok(Dataset { series, rows })
}
