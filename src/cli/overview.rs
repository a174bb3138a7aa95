//! Dataset overview: shape, column types, null counts and a sample of rows

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use polars::prelude::*;

use crate::pipeline::load_dataset;
use crate::utils::create_spinner;

/// Per-column profile shown by the overview command
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
    pub nulls: usize,
    pub null_pct: f64,
    /// Distinct non-null values
    pub unique: usize,
}

/// Profile every column of a DataFrame, in schema order
pub fn profile_columns(df: &DataFrame) -> Result<Vec<ColumnProfile>> {
    let height = df.height();
    df.get_columns()
        .iter()
        .map(|col| {
            let nulls = col.null_count();
            let distinct = col
                .as_materialized_series()
                .n_unique()
                .with_context(|| format!("Failed to count unique values in {}", col.name()))?;
            let unique = if nulls > 0 { distinct - 1 } else { distinct };
            let null_pct = if height == 0 {
                0.0
            } else {
                nulls as f64 / height as f64 * 100.0
            };
            Ok(ColumnProfile {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                non_null: height - nulls,
                nulls,
                null_pct,
                unique,
            })
        })
        .collect()
}

/// Run the overview subcommand
pub fn run_overview(input: &Path, sample_rows: usize) -> Result<()> {
    println!("\n {} Dataset Overview", style("◆").cyan().bold());
    println!("   Input: {}", style(input.display()).dim());
    println!();

    let spinner = create_spinner("Loading dataset...");
    let df = load_dataset(input)?;
    spinner.finish_with_message(format!("{} Dataset loaded", style("✓").green()));

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    println!();
    println!(
        "   {} rows × {} columns",
        style(rows).yellow(),
        style(cols).yellow()
    );
    println!("   {} Memory: {:.2} MB", style("✧").cyan(), memory_mb);
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Non-Null").add_attribute(Attribute::Bold),
        Cell::new("Null").add_attribute(Attribute::Bold),
        Cell::new("Null %").add_attribute(Attribute::Bold),
        Cell::new("Unique").add_attribute(Attribute::Bold),
    ]);
    for profile in profile_columns(&df)? {
        let null_color = if profile.nulls == 0 {
            Color::White
        } else {
            Color::Yellow
        };
        table.add_row(vec![
            Cell::new(&profile.name),
            Cell::new(&profile.dtype).fg(Color::Cyan),
            Cell::new(profile.non_null).set_alignment(CellAlignment::Right),
            Cell::new(profile.nulls)
                .fg(null_color)
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", profile.null_pct))
                .fg(null_color)
                .set_alignment(CellAlignment::Right),
            Cell::new(profile.unique).set_alignment(CellAlignment::Right),
        ]);
    }
    for line in table.to_string().lines() {
        println!("   {}", line);
    }

    if sample_rows > 0 && rows > 0 {
        println!();
        println!(
            "   {} First {} rows:",
            style("✧").cyan(),
            sample_rows.min(rows)
        );
        println!("{}", df.head(Some(sample_rows)));
    }

    println!();
    println!(" {} Overview complete!", style("✓").green().bold());

    Ok(())
}
