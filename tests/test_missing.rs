//! Unit tests for missing value analysis

use lifeboat::pipeline::{analyze_missing_values, get_columns_above_threshold};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_analyze_missing_values_basic() {
    let df = df! {
        "col_complete" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "col_partial_missing" => [Some(1.0f64), Some(2.0), None, None, Some(5.0)],
        "col_all_missing" => [None::<f64>, None, None, None, None],
    }
    .unwrap();

    let ratios = analyze_missing_values(&df).unwrap();
    let ratio_map: std::collections::HashMap<_, _> = ratios.into_iter().collect();

    assert!((ratio_map["col_complete"] - 0.0).abs() < 0.001);
    assert!((ratio_map["col_partial_missing"] - 0.4).abs() < 0.001);
    assert!((ratio_map["col_all_missing"] - 1.0).abs() < 0.001);
}

#[test]
fn test_analyze_missing_values_sorted_descending() {
    let df = common::create_manifest_dataframe();

    let ratios = analyze_missing_values(&df).unwrap();

    assert_eq!(ratios[0].0, "Cabin", "Cabin is the sparsest column");
    for pair in ratios.windows(2) {
        assert!(
            pair[0].1 >= pair[1].1,
            "Ratios should be sorted descending: {:?}",
            ratios
        );
    }
}

#[test]
fn test_columns_above_threshold_is_strict() {
    let ratios = vec![
        ("Cabin".to_string(), 0.77),
        ("Age".to_string(), 0.5),
        ("Embarked".to_string(), 0.002),
    ];

    assert_eq!(get_columns_above_threshold(&ratios, 0.5), vec!["Cabin"]);
    assert_eq!(
        get_columns_above_threshold(&ratios, 0.0),
        vec!["Cabin", "Age", "Embarked"]
    );
    assert!(get_columns_above_threshold(&ratios, 0.9).is_empty());
}

#[test]
fn test_analyze_missing_values_empty_dataframe() {
    let df = DataFrame::empty();
    let ratios = analyze_missing_values(&df).unwrap();
    assert!(ratios.is_empty());
}
