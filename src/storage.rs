use crate::models::Dataset;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') if s.parse::<f64>().is_err() => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

/// Save prepared rows as CSV: `date` (ISO) followed by one column per series.
/// Missing values are written as empty cells.
pub fn save_csv<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["date".to_string()];
    header.extend(dataset.series.iter().map(|s| sanitize_cell(s).into_owned()));
    wtr.write_record(&header)?;

    for row in &dataset.rows {
        let mut record = vec![row.date.format("%Y-%m-%d").to_string()];
        record.extend(
            dataset
                .series
                .iter()
                .map(|s| row.value(s).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save prepared rows as a pretty JSON document.
pub fn save_json<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let s = serde_json::to_string_pretty(dataset)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
