//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Lifeboat - Clean the passenger manifest and analyze who survived
#[derive(Parser, Debug)]
#[command(name = "lifeboat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file path for the cleaned table (CSV or Parquet, determined by extension).
    /// Defaults to input directory with '_cleaned' suffix (e.g., titanic.csv -> titanic_cleaned.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for the SVG charts. Defaults to 'figures' next to the input.
    #[arg(long)]
    pub figures_dir: Option<PathBuf>,

    /// JSON report path. Defaults to '<stem>_survival_report.json' next to the input.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long, default_value = "false")]
    pub no_charts: bool,

    /// Package the cleaned table, reports and charts into a zip archive
    #[arg(long, default_value = "false")]
    pub bundle: bool,

    /// Missing value ratio above which a column is flagged in the missing profile
    #[arg(long, default_value = "0.5", value_parser = validate_ratio)]
    pub missing_threshold: f64,

    /// Number of bins for the age and fare histograms
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u16).range(1..))]
    pub histogram_bins: u16,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a quick overview of a dataset: shape, column types, null counts and sample rows
    Overview {
        /// Input file path (CSV or Parquet)
        input: PathBuf,

        /// Number of rows to print
        #[arg(long, default_value = "5")]
        sample_rows: usize,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Get the cleaned-table path, deriving from input if not explicitly provided.
    /// The derived path will be in the same directory as the input with a '_cleaned' suffix.
    pub fn output_path(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(self.output.clone().unwrap_or_else(|| {
            let extension = input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("csv");
            sibling(input, &format!("_cleaned.{}", extension))
        }))
    }

    /// Get the JSON report path
    pub fn report_path(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(
            self.report
                .clone()
                .unwrap_or_else(|| sibling(input, "_survival_report.json")),
        )
    }

    /// Get the survival tables CSV path, next to the JSON report
    pub fn tables_csv_path(&self) -> Option<PathBuf> {
        let report = self.report_path()?;
        let parent = report.parent().unwrap_or_else(|| Path::new("."));
        let stem = report
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("survival_report");
        Some(parent.join(format!("{}_tables.csv", stem)))
    }

    /// Get the chart directory
    pub fn figures_dir(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(self.figures_dir.clone().unwrap_or_else(|| {
            input
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("figures")
        }))
    }

    /// Get the zip bundle path
    pub fn bundle_path(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(sibling(input, "_analysis.zip"))
    }
}

/// `<input dir>/<input stem><suffix>`
fn sibling(input: &Path, suffix: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    parent.join(format!("{}{}", stem, suffix))
}

/// Validator for ratio parameters in [0, 1]
fn validate_ratio(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("ratio must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ratio() {
        assert_eq!(validate_ratio("0.5"), Ok(0.5));
        assert_eq!(validate_ratio("0"), Ok(0.0));
        assert_eq!(validate_ratio("1.0"), Ok(1.0));
        assert!(validate_ratio("1.5").is_err());
        assert!(validate_ratio("-0.1").is_err());
        assert!(validate_ratio("half").is_err());
    }

    #[test]
    fn test_sibling_keeps_directory() {
        let path = sibling(Path::new("data/train.csv"), "_analysis.zip");
        assert_eq!(path, PathBuf::from("data/train_analysis.zip"));
    }
}
