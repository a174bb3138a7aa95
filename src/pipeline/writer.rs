//! Writing the cleaned, feature-engineered table back to disk

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::features::Passenger;

/// Column order of the cleaned table
pub const CLEANED_COLUMNS: [&str; 17] = [
    "PassengerId",
    "Survived",
    "Pclass",
    "Name",
    "Sex",
    "Age",
    "SibSp",
    "Parch",
    "Ticket",
    "Fare",
    "Embarked",
    "HasCabin",
    "FamilySize",
    "IsAlone",
    "Title",
    "AgeGroup",
    "FareGroup",
];

/// Build the cleaned table: the loaded schema minus `Cabin`, plus the
/// derived columns.
pub fn passengers_to_dataframe(passengers: &[Passenger]) -> PolarsResult<DataFrame> {
    let columns: Vec<Column> = vec![
        Column::new(
            "PassengerId".into(),
            passengers.iter().map(|p| p.record.passenger_id).collect::<Vec<u32>>(),
        ),
        Column::new(
            "Survived".into(),
            passengers.iter().map(|p| i32::from(p.record.survived)).collect::<Vec<i32>>(),
        ),
        Column::new(
            "Pclass".into(),
            passengers.iter().map(|p| p.record.pclass.code()).collect::<Vec<i32>>(),
        ),
        Column::new(
            "Name".into(),
            passengers.iter().map(|p| p.record.name.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "Sex".into(),
            passengers.iter().map(|p| p.record.sex.code()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "Age".into(),
            passengers.iter().map(|p| p.record.age).collect::<Vec<f64>>(),
        ),
        Column::new(
            "SibSp".into(),
            passengers.iter().map(|p| p.record.sibsp).collect::<Vec<u32>>(),
        ),
        Column::new(
            "Parch".into(),
            passengers.iter().map(|p| p.record.parch).collect::<Vec<u32>>(),
        ),
        Column::new(
            "Ticket".into(),
            passengers.iter().map(|p| p.record.ticket.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "Fare".into(),
            passengers.iter().map(|p| p.record.fare).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Embarked".into(),
            passengers.iter().map(|p| p.record.embarked.code()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "HasCabin".into(),
            passengers.iter().map(|p| i32::from(p.record.has_cabin)).collect::<Vec<i32>>(),
        ),
        Column::new(
            "FamilySize".into(),
            passengers.iter().map(|p| p.features.family_size).collect::<Vec<u32>>(),
        ),
        Column::new(
            "IsAlone".into(),
            passengers.iter().map(|p| i32::from(p.features.is_alone)).collect::<Vec<i32>>(),
        ),
        Column::new(
            "Title".into(),
            passengers.iter().map(|p| p.features.title.to_string()).collect::<Vec<String>>(),
        ),
        Column::new(
            "AgeGroup".into(),
            passengers.iter().map(|p| p.features.age_group.to_string()).collect::<Vec<String>>(),
        ),
        Column::new(
            "FareGroup".into(),
            passengers.iter().map(|p| p.features.fare_group.to_string()).collect::<Vec<String>>(),
        ),
    ];

    DataFrame::new(columns)
}

/// Save dataset to file (CSV or Parquet based on extension)
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
