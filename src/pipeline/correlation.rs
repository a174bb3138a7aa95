//! Pearson correlation matrix over the numeric passenger columns

use serde::Serialize;

use super::features::Passenger;
use super::stats::pearson_correlation;

/// Numeric columns included in the matrix, in display order
pub const NUMERIC_COLUMNS: [&str; 8] = [
    "Survived",
    "Pclass",
    "Age",
    "SibSp",
    "Parch",
    "Fare",
    "FamilySize",
    "IsAlone",
];

/// Symmetric correlation matrix; `values[i][j]` pairs `columns[i]` with
/// `columns[j]`. Zero-variance columns correlate as NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Off-diagonal pairs sorted by absolute correlation descending
    pub fn strongest_pairs(&self, limit: usize) -> Vec<(String, String, f64)> {
        let n = self.columns.len();
        let mut pairs: Vec<(String, String, f64)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|&(i, j)| !self.values[i][j].is_nan())
            .map(|(i, j)| {
                (
                    self.columns[i].clone(),
                    self.columns[j].clone(),
                    self.values[i][j],
                )
            })
            .collect();
        pairs.sort_by(|a, b| {
            b.2.abs()
                .partial_cmp(&a.2.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        pairs.truncate(limit);
        pairs
    }
}

fn numeric_value(p: &Passenger, column: &str) -> f64 {
    match column {
        "Survived" => f64::from(u8::from(p.record.survived)),
        "Pclass" => f64::from(p.record.pclass.code()),
        "Age" => p.record.age,
        "SibSp" => f64::from(p.record.sibsp),
        "Parch" => f64::from(p.record.parch),
        "Fare" => p.record.fare,
        "FamilySize" => f64::from(p.features.family_size),
        "IsAlone" => f64::from(u8::from(p.features.is_alone)),
        _ => f64::NAN,
    }
}

/// Correlate every pair of [`NUMERIC_COLUMNS`]
pub fn correlation_matrix(passengers: &[Passenger]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = NUMERIC_COLUMNS
        .iter()
        .map(|name| passengers.iter().map(|p| numeric_value(p, name)).collect())
        .collect();

    let n = NUMERIC_COLUMNS.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let corr = pearson_correlation(&columns[i], &columns[j]);
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    CorrelationMatrix {
        columns: NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
        values,
    }
}
