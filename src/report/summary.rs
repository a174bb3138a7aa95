//! End-of-run summary table

use std::path::PathBuf;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CleaningReport, SurvivalAnalysis};

/// Summary of one analysis run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub rows_cleaned: usize,
    pub duplicates_removed: usize,
    pub values_imputed: usize,
    pub cabin_missing_ratio: f64,
    pub tables: usize,
    pub groups: usize,
    pub overall_rate: f64,
    pub artifacts: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(rows_loaded: usize) -> Self {
        Self {
            rows_loaded,
            rows_cleaned: rows_loaded,
            ..Default::default()
        }
    }

    pub fn add_cleaning(&mut self, report: &CleaningReport) {
        self.rows_cleaned = report.rows_after;
        self.duplicates_removed = report.duplicates_removed;
        self.values_imputed = report.total_imputed();
        self.cabin_missing_ratio = report.cabin_missing_ratio;
    }

    pub fn add_analysis(&mut self, analysis: &SurvivalAnalysis) {
        self.tables = analysis.tables.len();
        self.groups = analysis.group_count();
        self.overall_rate = analysis.overall.rate;
    }

    pub fn add_artifact(&mut self, path: PathBuf) {
        self.artifacts.push(path);
    }

    pub fn add_artifacts(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.artifacts.extend(paths);
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("ANALYSIS SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Rows Loaded"),
            Cell::new(self.rows_loaded),
        ]);

        table.add_row(vec![
            Cell::new("🗑️  Duplicates Removed"),
            Cell::new(self.duplicates_removed).fg(if self.duplicates_removed == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);

        table.add_row(vec![
            Cell::new("🩹 Values Imputed"),
            Cell::new(self.values_imputed).fg(if self.values_imputed == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);

        table.add_row(vec![
            Cell::new("🚪 Cabin Dropped"),
            Cell::new(format!("{:.1}% missing", self.cabin_missing_ratio * 100.0)),
        ]);

        table.add_row(vec![
            Cell::new("✅ Rows Analyzed"),
            Cell::new(self.rows_cleaned)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📊 Survival Tables"),
            Cell::new(format!("{} ({} groups)", self.tables, self.groups)),
        ]);

        let rate = if self.overall_rate.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.1}%", self.overall_rate * 100.0)
        };
        table.add_row(vec![
            Cell::new("🛟 Overall Survival"),
            Cell::new(rate).fg(Color::Cyan).add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.artifacts.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("ARTIFACTS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            println!();
            for path in &self.artifacts {
                println!("        {} {}", style("•").dim(), path.display());
            }
        }
    }
}
