//! Dataset loader for CSV and Parquet passenger manifests

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::missing::analyze_missing_values;
use super::record::{PassengerRecord, Pclass, Port, Sex};

/// Rows used for CSV schema inference. The manifest is small enough that
/// this covers every row.
pub const INFER_SCHEMA_LENGTH: usize = 10_000;

/// Optional identifier column. Row numbers are used when it is absent.
pub const ID_COLUMN: &str = "PassengerId";

/// Columns every manifest must carry.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "Survived", "Pclass", "Name", "Sex", "Age", "SibSp", "Parch", "Ticket", "Fare", "Cabin",
    "Embarked",
];

/// Format errors raised while turning a table into passenger records.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported file format: {0}. Supported formats: csv, parquet")]
    UnsupportedFormat(String),

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Column '{column}' has an invalid type: {reason}")]
    InvalidColumnType { column: String, reason: String },

    #[error("Invalid value in column '{column}' at row {row}: {value}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },
}

/// A loaded manifest plus the statistics shown after the load step.
#[derive(Debug)]
pub struct LoadedTable {
    pub records: Vec<PassengerRecord>,
    pub rows: usize,
    pub cols: usize,
    pub memory_mb: f64,
    /// Per-column missing ratio of the raw table, sorted descending
    pub missing_ratios: Vec<(String, f64)>,
}

/// Load a dataset from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    let lf = scan_dataset(path)?;
    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

fn scan_dataset(path: &Path) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(INFER_SCHEMA_LENGTH))
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => return Err(LoadError::UnsupportedFormat(extension).into()),
    };

    Ok(lf)
}

/// Read only the column names of a dataset
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let mut lf = scan_dataset(path)?;
    let schema = lf
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}

/// Load a passenger manifest and convert it into typed records
pub fn load_passengers(path: &Path) -> Result<LoadedTable> {
    let df = load_dataset(path)?;
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);

    let missing_ratios = analyze_missing_values(&df)?;
    let records = records_from_dataframe(&df)?;
    debug!(rows, cols, "loaded passenger manifest from {}", path.display());

    Ok(LoadedTable {
        records,
        rows,
        cols,
        memory_mb,
        missing_ratios,
    })
}

/// Convert a DataFrame with the manifest schema into passenger records.
///
/// Every column in [`REQUIRED_COLUMNS`] must be present; all missing ones are
/// reported together.
pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<PassengerRecord>, LoadError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let ids = if df.column(ID_COLUMN).is_ok() {
        Some(int_values(df, ID_COLUMN)?)
    } else {
        None
    };
    let survived = int_values(df, "Survived")?;
    let pclass = int_values(df, "Pclass")?;
    let name = str_values(df, "Name")?;
    let sex = str_values(df, "Sex")?;
    let age = float_values(df, "Age")?;
    let sibsp = int_values(df, "SibSp")?;
    let parch = int_values(df, "Parch")?;
    let ticket = str_values(df, "Ticket")?;
    let fare = float_values(df, "Fare")?;
    let cabin = str_values(df, "Cabin")?;
    let embarked = str_values(df, "Embarked")?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = i + 1;

        let passenger_id = match &ids {
            Some(ids) => Some(count_value(ids[i], ID_COLUMN, row)?),
            None => None,
        };

        let survived = match survived[i] {
            Some(0) => false,
            Some(1) => true,
            other => return Err(invalid_value("Survived", row, other)),
        };

        let pclass = pclass[i]
            .and_then(Pclass::from_code)
            .ok_or_else(|| invalid_value("Pclass", row, pclass[i]))?;

        let sex = sex[i]
            .as_deref()
            .and_then(Sex::parse)
            .ok_or_else(|| invalid_value("Sex", row, sex[i].as_deref()))?;

        let embarked = match non_empty(&embarked[i]) {
            None => None,
            Some(code) => Some(
                Port::parse(code).ok_or_else(|| invalid_value("Embarked", row, Some(code)))?,
            ),
        };

        records.push(PassengerRecord {
            passenger_id,
            survived,
            pclass,
            name: name[i].clone().unwrap_or_default(),
            sex,
            age: age[i].filter(|v| v.is_finite()),
            sibsp: count_value(sibsp[i], "SibSp", row)?,
            parch: count_value(parch[i], "Parch", row)?,
            ticket: ticket[i].clone().unwrap_or_default(),
            fare: fare[i].filter(|v| v.is_finite()),
            cabin: non_empty(&cabin[i]).map(str::to_string),
            embarked,
        });
    }

    Ok(records)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn count_value(value: Option<i64>, column: &str, row: usize) -> Result<u32, LoadError> {
    value
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| invalid_value(column, row, value))
}

fn invalid_value<T: std::fmt::Debug>(column: &str, row: usize, value: T) -> LoadError {
    LoadError::InvalidValue {
        column: column.to_string(),
        row,
        value: format!("{:?}", value),
    }
}

fn cast_column(df: &DataFrame, column: &str, dtype: &DataType) -> Result<Series, LoadError> {
    let col = df.column(column).map_err(|_| LoadError::MissingColumns(vec![column.to_string()]))?;
    col.as_materialized_series()
        .strict_cast(dtype)
        .map_err(|e| LoadError::InvalidColumnType {
            column: column.to_string(),
            reason: e.to_string(),
        })
}

fn int_values(df: &DataFrame, column: &str) -> Result<Vec<Option<i64>>, LoadError> {
    let series = cast_column(df, column, &DataType::Int64)?;
    let values = series.i64().map_err(|e| LoadError::InvalidColumnType {
        column: column.to_string(),
        reason: e.to_string(),
    })?;
    Ok(values.into_iter().collect())
}

fn float_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, LoadError> {
    let series = cast_column(df, column, &DataType::Float64)?;
    let values = series.f64().map_err(|e| LoadError::InvalidColumnType {
        column: column.to_string(),
        reason: e.to_string(),
    })?;
    Ok(values.into_iter().collect())
}

fn str_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>, LoadError> {
    let series = cast_column(df, column, &DataType::String)?;
    let values = series.str().map_err(|e| LoadError::InvalidColumnType {
        column: column.to_string(),
        reason: e.to_string(),
    })?;
    Ok(values.into_iter().map(|v| v.map(str::to_string)).collect())
}
