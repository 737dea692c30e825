//! Ideal label positions derived from a prepared dataset.

use crate::models::{Dataset, LabelTarget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Linear value → pixel mapping. `range` may be inverted (SVG y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Vertical scale over every defined value in `dataset`, mapping the
    /// minimum to `height` and the maximum to `0`.
    pub fn vertical(dataset: &Dataset, height: f64) -> Option<Self> {
        let (min, max) = dataset
            .rows
            .iter()
            .flat_map(|r| r.values.values().filter_map(|v| *v))
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self::new((min, max), (height, 0.0)))
    }

    /// A degenerate domain maps everything to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// One target per series that has at least one value, positioned at the
/// series' last defined value and sorted by ideal position ascending.
///
/// `display_names` maps series keys to label text; missing keys use the key.
pub fn label_targets(
    dataset: &Dataset,
    scale: &LinearScale,
    display_names: &BTreeMap<String, String>,
) -> Vec<LabelTarget> {
    let mut targets: Vec<LabelTarget> = dataset
        .series
        .iter()
        .filter_map(|key| {
            let (_, last) = dataset.last_defined(key)?;
            let text = display_names.get(key).unwrap_or(key);
            Some(LabelTarget::new(key.clone(), scale.map(last), text.clone()))
        })
        .collect();
    targets.sort_by(|a, b| a.ideal_position.total_cmp(&b.ideal_position));
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataRow;
    use chrono::NaiveDate;

    fn row(day: u32, a: Option<f64>, b: Option<f64>) -> DataRow {
        DataRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            values: BTreeMap::from([("a".to_string(), a), ("b".to_string(), b)]),
        }
    }

    #[test]
    fn scale_maps_and_inverts() {
        let s = LinearScale::new((0.0, 100.0), (400.0, 0.0));
        assert_eq!(s.map(0.0), 400.0);
        assert_eq!(s.map(100.0), 0.0);
        assert_eq!(s.map(25.0), 300.0);
        assert_eq!(LinearScale::new((5.0, 5.0), (400.0, 0.0)).map(5.0), 200.0);
    }

    #[test]
    fn targets_use_last_defined_value() {
        let ds = Dataset {
            series: vec!["a".into(), "b".into(), "c".into()],
            rows: vec![row(1, Some(10.0), Some(0.0)), row(2, Some(20.0), None)],
        };
        let scale = LinearScale::vertical(&ds, 200.0).unwrap();
        assert_eq!(scale.domain, (0.0, 20.0));

        let names = BTreeMap::from([("a".to_string(), "Alpha".to_string())]);
        let got = label_targets(&ds, &scale, &names);
        // "c" has no values; "a" (20 → y=0) sorts above "b" (0 → y=200)
        assert_eq!(got.len(), 2);
        assert_eq!(got[0], LabelTarget::new("a", 0.0, "Alpha"));
        assert_eq!(got[1], LabelTarget::new("b", 200.0, "b"));
    }
}
