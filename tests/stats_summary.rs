use chrono::NaiveDate;
use sheetchart::stats::series_summary;
use sheetchart::{DataRow, Dataset};
use std::collections::BTreeMap;

fn row(month: u32, a: Option<f64>, b: Option<f64>) -> DataRow {
    DataRow {
        date: NaiveDate::from_ymd_opt(2021, month, 1).unwrap(),
        values: BTreeMap::from([("A".to_string(), a), ("B".to_string(), b)]),
    }
}

#[test]
fn summaries_handle_missing_and_median_even_odd() {
    // A: [1,2,3,4] -> median 2.5
    // B: [10, None, 30, None] -> missing 2, median 20, last defined in March
    let ds = Dataset {
        series: vec!["B".into(), "A".into()],
        rows: vec![
            row(1, Some(1.0), Some(10.0)),
            row(2, Some(2.0), None),
            row(3, Some(3.0), Some(30.0)),
            row(4, Some(4.0), None),
        ],
    };
    let got = series_summary(&ds);
    assert_eq!(got.len(), 2);

    let b = &got[0];
    assert_eq!(b.series, "B");
    assert_eq!(b.count, 2);
    assert_eq!(b.missing, 2);
    assert_eq!(b.min, Some(10.0));
    assert_eq!(b.max, Some(30.0));
    assert!((b.median.unwrap() - 20.0).abs() < 1e-9);
    assert_eq!(b.last_date, NaiveDate::from_ymd_opt(2021, 3, 1));
    assert_eq!(b.last_value, Some(30.0));

    let a = &got[1];
    assert_eq!(a.count, 4);
    assert_eq!(a.missing, 0);
    assert!((a.mean.unwrap() - 2.5).abs() < 1e-9);
    assert!((a.median.unwrap() - 2.5).abs() < 1e-9);
    assert_eq!(a.first_date, NaiveDate::from_ymd_opt(2021, 1, 1));
}

#[test]
fn series_without_values_have_no_statistics() {
    let ds = Dataset {
        series: vec!["A".into()],
        rows: vec![row(1, None, None)],
    };
    let s = &series_summary(&ds)[0];
    assert_eq!(s.count, 0);
    assert_eq!(s.missing, 1);
    assert_eq!((s.min, s.max, s.mean, s.median), (None, None, None, None));
    assert_eq!(s.last_value, None);
}
