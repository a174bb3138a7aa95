//! Console tables for the analysis results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{
    ClassSexCell, CleaningReport, CorrelationMatrix, FeatureSummary, GroupStats, Insights,
    SurvivalTable,
};

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn format_rate(rate: f64) -> String {
    if rate.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.1}%", rate * 100.0)
    }
}

fn rate_color(rate: f64) -> Color {
    if rate.is_nan() {
        Color::DarkGrey
    } else if rate >= 0.5 {
        Color::Green
    } else if rate >= 0.3 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn stats_row(stats: &GroupStats) -> Vec<Cell> {
    vec![
        Cell::new(&stats.label),
        Cell::new(stats.count).set_alignment(CellAlignment::Right),
        Cell::new(stats.survived).set_alignment(CellAlignment::Right),
        Cell::new(format_rate(stats.rate))
            .fg(rate_color(stats.rate))
            .set_alignment(CellAlignment::Right),
    ]
}

fn section_header(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print the per-column missing ratios of the raw table
pub fn print_missing_profile(missing_ratios: &[(String, f64)], threshold: f64) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Missing").add_attribute(Attribute::Bold),
    ]);

    for (column, ratio) in missing_ratios.iter().filter(|(_, r)| *r > 0.0) {
        let color = if *ratio > threshold {
            Color::Red
        } else {
            Color::Yellow
        };
        table.add_row(vec![
            Cell::new(column),
            Cell::new(format!("{:.1}%", ratio * 100.0))
                .fg(color)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    if table.row_count() == 0 {
        println!("      No missing values");
    } else {
        print_indented(&table);
    }
}

/// Print what the cleaning pass changed
pub fn print_cleaning_report(report: &CleaningReport) {
    println!(
        "      Duplicates removed: {}",
        style(report.duplicates_removed).yellow().bold()
    );
    println!(
        "      Age: {} missing value(s) filled with (class, sex) group median",
        style(report.ages_imputed).yellow().bold()
    );
    println!(
        "      Embarked: {} missing value(s) filled with mode ({})",
        style(report.embarked_imputed).yellow().bold(),
        report.embarked_fill
    );
    if report.fares_imputed > 0 {
        println!(
            "      Fare: {} missing value(s) filled with class median",
            style(report.fares_imputed).yellow().bold()
        );
    }
    println!(
        "      Cabin: column dropped ({:.1}% missing)",
        report.cabin_missing_ratio * 100.0
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Class").add_attribute(Attribute::Bold),
        Cell::new("Sex").add_attribute(Attribute::Bold),
        Cell::new("Median Age").add_attribute(Attribute::Bold),
        Cell::new("Filled").add_attribute(Attribute::Bold),
    ]);
    for fill in &report.age_fills {
        let median = match fill.group_median {
            Some(m) => Cell::new(format!("{:.1}", m)),
            None => Cell::new(format!("{:.1} (global)", fill.fill_value)).fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&fill.pclass),
            Cell::new(&fill.sex),
            median.set_alignment(CellAlignment::Right),
            Cell::new(fill.imputed).set_alignment(CellAlignment::Right),
        ]);
    }
    println!();
    print_indented(&table);
}

/// Print the derived feature summary
pub fn print_feature_summary(summary: &FeatureSummary) {
    if let Some(q) = &summary.fare_quartiles {
        println!(
            "      Fare quartiles: Q1 {:.2}  Q2 {:.2}  Q3 {:.2}",
            q.q1, q.q2, q.q3
        );
    }
    let titles: Vec<String> = summary
        .title_counts
        .iter()
        .map(|(title, count)| format!("{} {}", title, count))
        .collect();
    println!("      Titles: {}", titles.join(", "));
    println!("      Travelling alone: {}", summary.alone_count);
}

/// Print one survival table
pub fn print_survival_table(table: &SurvivalTable) {
    section_header("📊", &format!("Survival by {}", table.key.label()));

    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);
    out.set_header(vec![
        Cell::new(table.key.label()).add_attribute(Attribute::Bold),
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new("Survived").add_attribute(Attribute::Bold),
        Cell::new("Survival Rate").add_attribute(Attribute::Bold),
    ]);
    for group in &table.groups {
        out.add_row(stats_row(group));
    }
    print_indented(&out);
}

/// Print the class x sex interaction as a class-by-sex grid
pub fn print_class_sex_table(cells: &[ClassSexCell]) {
    section_header("📊", "Survival by Class and Sex");

    let mut sexes: Vec<&str> = Vec::new();
    let mut classes: Vec<&str> = Vec::new();
    for cell in cells {
        if !sexes.contains(&cell.sex.as_str()) {
            sexes.push(&cell.sex);
        }
        if !classes.contains(&cell.pclass.as_str()) {
            classes.push(&cell.pclass);
        }
    }

    let mut header = vec![Cell::new("Class").add_attribute(Attribute::Bold)];
    header.extend(
        sexes
            .iter()
            .map(|s| Cell::new(s).add_attribute(Attribute::Bold)),
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header);
    for pclass in &classes {
        let mut row = vec![Cell::new(pclass)];
        for sex in &sexes {
            let cell = cells
                .iter()
                .find(|c| c.pclass == *pclass && c.sex == *sex)
                .map(|c| {
                    Cell::new(format!(
                        "{} ({}/{})",
                        format_rate(c.stats.rate),
                        c.stats.survived,
                        c.stats.count
                    ))
                    .fg(rate_color(c.stats.rate))
                })
                .unwrap_or_else(|| Cell::new("-"));
            row.push(cell.set_alignment(CellAlignment::Right));
        }
        table.add_row(row);
    }
    print_indented(&table);
}

/// Print the correlation matrix
pub fn print_correlation_matrix(matrix: &CorrelationMatrix) {
    section_header("🔗", "Feature Correlation Matrix");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    let mut header = vec![Cell::new("")];
    header.extend(
        matrix
            .columns
            .iter()
            .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
    );
    table.set_header(header);

    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        for &value in row {
            let cell = if value.is_nan() {
                Cell::new("n/a").fg(Color::DarkGrey)
            } else {
                let color = if value.abs() >= 0.5 {
                    Color::Magenta
                } else if value.abs() >= 0.2 {
                    Color::Cyan
                } else {
                    Color::White
                };
                Cell::new(format!("{:.2}", value)).fg(color)
            };
            cells.push(cell.set_alignment(CellAlignment::Right));
        }
        table.add_row(cells);
    }
    print_indented(&table);

    let pairs = matrix.strongest_pairs(3);
    if !pairs.is_empty() {
        println!();
        println!("      {}", style("Strongest relationships:").yellow());
        for (a, b, value) in pairs {
            println!("        {} {} ~ {}: {:+.2}", style("•").dim(), a, b, value);
        }
    }
}

/// Print key findings and descriptive observations
pub fn print_insights(overall: &GroupStats, insights: &Insights) {
    section_header("💡", "KEY INSIGHTS AND FINDINGS");

    println!(
        "      Overall survival rate: {}",
        style(format_rate(overall.rate)).green().bold()
    );
    println!();
    for (i, finding) in insights.findings().iter().enumerate() {
        println!("      {}. {}", i + 1, finding);
    }

    println!();
    println!("      {}", style("Statistical Observations:").yellow());
    println!("        {} Total passengers analyzed: {}", style("•").dim(), insights.total_passengers);
    println!("        {} Survivors: {}", style("•").dim(), insights.survivors);
    println!("        {} Average age: {:.1} years", style("•").dim(), insights.mean_age);
    println!(
        "        {} Age range: {:.0} - {:.0} years",
        style("•").dim(),
        insights.min_age,
        insights.max_age
    );
    println!("        {} Average fare: ${:.2}", style("•").dim(), insights.mean_fare);
    println!(
        "        {} Fare range: ${:.2} - ${:.2}",
        style("•").dim(),
        insights.min_fare,
        insights.max_fare
    );
}
