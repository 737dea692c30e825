use crate::models::Dataset;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Summary statistics for one series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub series: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub last_value: Option<f64>,
}

/// Compute statistics per series, in the dataset's series order.
pub fn series_summary(dataset: &Dataset) -> Vec<Summary> {
    dataset
        .series
        .iter()
        .map(|name| {
            let mut observed: Vec<(NaiveDate, f64)> = Vec::new();
            let mut missing = 0;
            for row in &dataset.rows {
                match row.value(name) {
                    Some(v) => observed.push((row.date, v)),
                    None => missing += 1,
                }
            }

            let mut vals: Vec<f64> = observed.iter().map(|(_, v)| *v).collect();
            vals.sort_by(|a, b| a.total_cmp(b));
            let count = vals.len();
            let mean = (count > 0).then(|| vals.iter().sum::<f64>() / count as f64);
            let median = if count == 0 {
                None
            } else if count % 2 == 1 {
                Some(vals[count / 2])
            } else {
                Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
            };

            Summary {
                series: name.clone(),
                count,
                missing,
                min: vals.first().copied(),
                max: vals.last().copied(),
                mean,
                median,
                first_date: observed.first().map(|(d, _)| *d),
                last_date: observed.last().map(|(d, _)| *d),
                last_value: observed.last().map(|(_, v)| *v),
            }
        })
        .collect()
}
