//! Survival report generation
//!
//! Generates a JSON report with the run metadata, what the cleaning pass did,
//! the feature summary and every survival statistic, plus a flat CSV of the
//! survival tables and an optional zip bundle of all artifacts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CleaningReport, FeatureSummary, SurvivalAnalysis};

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub lifeboat_version: String,
    pub input_file: String,
    pub output_file: String,
    pub missing_threshold: f64,
}

/// Timing information in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimingInfo {
    pub load_ms: u64,
    pub clean_ms: u64,
    pub features_ms: u64,
    pub analysis_ms: u64,
    pub save_ms: u64,
    pub total_ms: u64,
}

/// Missing ratio of one raw column
#[derive(Debug, Clone, Serialize)]
pub struct MissingEntry {
    pub column: String,
    pub ratio: f64,
    pub above_threshold: bool,
}

/// Complete survival report
#[derive(Debug, Clone, Serialize)]
pub struct SurvivalReport {
    pub metadata: ReportMetadata,
    pub timing: TimingInfo,
    pub missing_values: Vec<MissingEntry>,
    pub cleaning: CleaningReport,
    pub features: FeatureSummary,
    pub analysis: SurvivalAnalysis,
}

/// Parameters for creating a report
pub struct ReportParams<'a> {
    pub input_file: &'a Path,
    pub output_file: &'a Path,
    pub missing_threshold: f64,
    pub missing_ratios: &'a [(String, f64)],
    pub timing: TimingInfo,
}

impl SurvivalReport {
    pub fn new(
        params: ReportParams<'_>,
        cleaning: &CleaningReport,
        features: &FeatureSummary,
        analysis: &SurvivalAnalysis,
    ) -> Self {
        let missing_values = params
            .missing_ratios
            .iter()
            .map(|(column, ratio)| MissingEntry {
                column: column.clone(),
                ratio: *ratio,
                above_threshold: *ratio > params.missing_threshold,
            })
            .collect();

        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                lifeboat_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: params.input_file.display().to_string(),
                output_file: params.output_file.display().to_string(),
                missing_threshold: params.missing_threshold,
            },
            timing: params.timing,
            missing_values,
            cleaning: cleaning.clone(),
            features: features.clone(),
            analysis: analysis.clone(),
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Export the survival report to a JSON file
pub fn export_survival_report(report: &SurvivalReport, output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize survival report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write survival report to {}", output_path.display()))?;

    Ok(())
}

/// Export every survival table as one long CSV
///
/// One row per group: key, group label, count, survivors, rate. Empty groups
/// leave the rate empty.
pub fn export_survival_tables_csv(analysis: &SurvivalAnalysis, output_path: &Path) -> Result<()> {
    use std::io::Write;

    ensure_parent_dir(output_path)?;
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create CSV file: {}", output_path.display()))?;

    writeln!(file, "key,group,count,survived,survival_rate")?;

    for table in &analysis.tables {
        for group in &table.groups {
            let rate = if group.rate.is_nan() {
                String::new()
            } else {
                format!("{:.4}", group.rate)
            };
            writeln!(
                file,
                "{},{},{},{},{}",
                table.key.slug(),
                escape_csv_field(&group.label),
                group.count,
                group.survived,
                rate
            )?;
        }
    }

    Ok(())
}

/// Escape a field for CSV (handle commas and quotes)
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Package report files and charts into a zip archive.
///
/// Charts are stored under `figures/`; other files at the archive root.
pub fn package_artifacts(files: &[PathBuf], charts: &[PathBuf], zip_path: &Path) -> Result<()> {
    use std::io::{Read, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut add_file_to_zip = |path: &Path, prefix: &str| -> Result<()> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?;
        let entry = format!("{}{}", prefix, filename);
        zip.start_file(entry.as_str(), options)
            .with_context(|| format!("Failed to add {} to zip", entry))?;
        let mut content = Vec::new();
        std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .read_to_end(&mut content)?;
        zip.write_all(&content)?;
        Ok(())
    };

    for file in files {
        add_file_to_zip(file, "")?;
    }
    for chart in charts {
        add_file_to_zip(chart, "figures/")?;
    }

    zip.finish().context("Failed to finalize zip file")?;

    Ok(())
}
