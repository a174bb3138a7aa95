//! Shared test utilities and fixture generators
#![allow(dead_code)]

use lifeboat::pipeline::{
    clean_records, engineer_features, Passenger, PassengerRecord, Pclass, Port, Sex,
};
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// A small manifest with the characteristics the pipeline has to handle:
///
/// - 10 rows, one of them (row 10) an exact duplicate of row 1
/// - `Age` missing for rows 3 (1st class female) and 6 (3rd class male)
/// - `Embarked` missing for row 4
/// - `Cabin` missing for 7 of 10 rows
/// - one rare title (`Dr.`) and one `Mlle.`
pub fn create_manifest_dataframe() -> DataFrame {
    df! {
        "PassengerId" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 1],
        "Survived" => [0i64, 1, 1, 1, 0, 0, 0, 1, 1, 0],
        "Pclass" => [3i64, 1, 1, 1, 3, 3, 1, 3, 2, 3],
        "Name" => [
            "Braund, Mr. Owen Harris",
            "Cumings, Mrs. John Bradley (Florence Briggs Thayer)",
            "Heikkinen, Miss. Laina",
            "Futrelle, Mrs. Jacques Heath (Lily May Peel)",
            "Allen, Mr. William Henry",
            "Moran, Mr. James",
            "McCarthy, Dr. Timothy J",
            "Palsson, Master. Gosta Leonard",
            "Johnson, Mlle. Elisabeth",
            "Braund, Mr. Owen Harris",
        ],
        "Sex" => ["male", "female", "female", "female", "male", "male", "male", "male", "female", "male"],
        "Age" => [Some(22.0f64), Some(38.0), None, Some(35.0), Some(35.0), None, Some(54.0), Some(2.0), Some(27.0), Some(22.0)],
        "SibSp" => [1i64, 1, 0, 1, 0, 0, 0, 3, 0, 1],
        "Parch" => [0i64, 0, 0, 0, 0, 0, 0, 1, 2, 0],
        "Ticket" => ["A/5 21171", "PC 17599", "STON/O2. 3101282", "113803", "373450", "330877", "17463", "349909", "347742", "A/5 21171"],
        "Fare" => [7.25f64, 71.2833, 7.925, 53.1, 8.05, 8.4583, 51.8625, 21.075, 11.1333, 7.25],
        "Cabin" => [None, Some("C85"), None, Some("C123"), None, None, Some("E46"), None, None, None],
        "Embarked" => [Some("S"), Some("C"), Some("S"), None, Some("S"), Some("Q"), Some("S"), Some("S"), Some("S"), Some("S")],
    }
    .unwrap()
}

/// Build a raw record with sensible defaults; tests override what they need
pub fn record(passenger_id: u32, survived: bool, pclass: Pclass, sex: Sex) -> PassengerRecord {
    PassengerRecord {
        passenger_id: Some(passenger_id),
        survived,
        pclass,
        name: match sex {
            Sex::Female => format!("Passenger{}, Mrs. Anna", passenger_id),
            Sex::Male => format!("Passenger{}, Mr. John", passenger_id),
        },
        sex,
        age: Some(30.0),
        sibsp: 0,
        parch: 0,
        ticket: format!("T{}", passenger_id),
        fare: Some(10.0),
        cabin: None,
        embarked: Some(Port::Southampton),
    }
}

/// Clean and engineer features for a set of raw records
pub fn passengers_from(records: Vec<PassengerRecord>) -> Vec<Passenger> {
    let (cleaned, _) = clean_records(records);
    let (passengers, _) = engineer_features(cleaned);
    passengers
}

/// Create a larger random manifest for stress tests
pub fn create_large_manifest(rows: usize, seed: u64) -> DataFrame {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let titles = ["Mr.", "Mrs.", "Miss.", "Master.", "Dr.", "Rev."];
    let ports = ["C", "Q", "S"];

    let ids: Vec<i64> = (1..=rows as i64).collect();
    let survived: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    let pclass: Vec<i64> = (0..rows).map(|_| rng.gen_range(1..4)).collect();
    let sex: Vec<&str> = (0..rows)
        .map(|_| if rng.gen_bool(0.35) { "female" } else { "male" })
        .collect();
    let name: Vec<String> = (0..rows)
        .map(|i| format!("Surname{}, {} Given", i, titles[rng.gen_range(0..titles.len())]))
        .collect();
    let age: Vec<Option<f64>> = (0..rows)
        .map(|_| (!rng.gen_bool(0.2)).then(|| rng.gen_range(0.5..80.0)))
        .collect();
    let sibsp: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..5)).collect();
    let parch: Vec<i64> = (0..rows).map(|_| rng.gen_range(0..4)).collect();
    let ticket: Vec<String> = (0..rows).map(|i| format!("T{}", i)).collect();
    let fare: Vec<f64> = (0..rows).map(|_| rng.gen_range(0.0..300.0)).collect();
    let cabin: Vec<Option<String>> = (0..rows)
        .map(|i| rng.gen_bool(0.23).then(|| format!("C{}", i)))
        .collect();
    let embarked: Vec<Option<&str>> = (0..rows)
        .map(|_| (!rng.gen_bool(0.01)).then(|| ports[rng.gen_range(0..ports.len())]))
        .collect();

    df! {
        "PassengerId" => ids,
        "Survived" => survived,
        "Pclass" => pclass,
        "Name" => name,
        "Sex" => sex,
        "Age" => age,
        "SibSp" => sibsp,
        "Parch" => parch,
        "Ticket" => ticket,
        "Fare" => fare,
        "Cabin" => cabin,
        "Embarked" => embarked,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("train.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("train.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}
