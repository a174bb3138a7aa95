//! SVG chart rendering with plotters
//!
//! Charts only read aggregates and cleaned values; nothing here feeds back
//! into the analysis.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::pipeline::{
    ClassSexCell, CorrelationMatrix, GroupStats, Passenger, SurvivalAnalysis, SurvivalTable,
};

const CHART_SIZE: (u32, u32) = (900, 560);
const DIED: RGBColor = RGBColor(255, 107, 107);
const SURVIVED: RGBColor = RGBColor(78, 205, 196);
const FEMALE: RGBColor = RGBColor(255, 153, 153);
const MALE: RGBColor = RGBColor(102, 179, 255);
const FONT: &str = "sans-serif";

/// Upper end of the fare histogram's x axis; a handful of very high fares
/// would otherwise squash the bulk of the distribution into one bin.
pub const FARE_AXIS_MAX: f64 = 200.0;

/// Render every chart into `dir`, returning the written paths in render order
pub fn render_all_charts(
    passengers: &[Passenger],
    analysis: &SurvivalAnalysis,
    dir: &Path,
    histogram_bins: usize,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create figures directory: {}", dir.display()))?;

    let mut written = Vec::new();

    if analysis.overall.count > 0 {
        let path = dir.join("survival_overview.svg");
        render_overall_chart(&analysis.overall, &path)?;
        written.push(path);
    }

    for table in &analysis.tables {
        if table.groups.is_empty() {
            continue;
        }
        let path = dir.join(format!("survival_by_{}.svg", table.key.slug()));
        render_rate_chart(table, &path)?;
        written.push(path);
    }

    if !analysis.class_sex.is_empty() {
        let path = dir.join("survival_by_class_and_sex.svg");
        render_class_sex_chart(&analysis.class_sex, &path)?;
        written.push(path);
    }

    if !passengers.is_empty() {
        let path = dir.join("age_distribution.svg");
        render_survival_histogram(
            passengers,
            |p| p.record.age,
            "Age",
            histogram_bins,
            None,
            &path,
        )?;
        written.push(path);

        let path = dir.join("fare_distribution.svg");
        render_survival_histogram(
            passengers,
            |p| p.record.fare,
            "Fare",
            histogram_bins,
            Some(FARE_AXIS_MAX),
            &path,
        )?;
        written.push(path);

        let path = dir.join("correlation_heatmap.svg");
        render_correlation_heatmap(&analysis.correlations, &path)?;
        written.push(path);
    }

    debug!(charts = written.len(), "rendered charts into {}", dir.display());
    Ok(written)
}

/// Two bars: passengers who did not survive and those who did
pub fn render_overall_chart(overall: &GroupStats, path: &Path) -> Result<()> {
    let died = overall.count - overall.survived;
    let bars = [
        ("Did not survive", died, DIED),
        ("Survived", overall.survived, SURVIVED),
    ];
    let y_max = died.max(overall.survived).max(1) as u32;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let format_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => bars
            .get(*i)
            .map(|(name, n, _)| format!("{} ({})", name, n))
            .unwrap_or_default(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Overall Survival", (FONT, 26))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d((0..bars.len()).into_segmented(), 0u32..(y_max + y_max / 10 + 1))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Passengers")
        .x_labels(bars.len())
        .x_label_formatter(&format_label)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, n, color))| {
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(i), 0),
                (SegmentValue::Exact(i + 1), *n as u32),
            ],
            color.filled(),
        );
        bar.set_margin(0, 0, 40, 40);
        bar
    }))?;

    root.present()
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    Ok(())
}

/// Map a correlation in [-1, 1] onto a blue-white-red scale
fn heat_color(value: f64) -> RGBColor {
    const NEGATIVE: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const POSITIVE: (f64, f64, f64) = (180.0, 4.0, 38.0);

    if value.is_nan() {
        return RGBColor(220, 220, 220);
    }
    let t = value.clamp(-1.0, 1.0);
    let (r, g, b) = if t < 0.0 { NEGATIVE } else { POSITIVE };
    let w = t.abs();
    let mix = |c: f64| (255.0 + (c - 255.0) * w).round() as u8;
    RGBColor(mix(r), mix(g), mix(b))
}

/// Square grid of the correlation matrix with the value printed in each cell.
/// The first column is drawn in the top row.
pub fn render_correlation_heatmap(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    let n = matrix.columns.len();
    let root = SVGBackend::new(path, (820, 760)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => matrix.columns.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let y_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) if *i < n => matrix.columns[n - 1 - i].clone(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Feature Correlation Heatmap", (FONT, 26))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(90)
        .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .draw()?;

    let cells: Vec<(usize, usize, f64)> = matrix
        .values
        .iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, &v)| (i, j, v)))
        .collect();

    chart.draw_series(cells.iter().map(|&(i, j, v)| {
        let y = n - 1 - i;
        Rectangle::new(
            [
                (SegmentValue::Exact(j), SegmentValue::Exact(y)),
                (SegmentValue::Exact(j + 1), SegmentValue::Exact(y + 1)),
            ],
            heat_color(v).filled(),
        )
    }))?;

    let label_style = TextStyle::from((FONT, 14).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(cells.iter().map(|&(i, j, v)| {
        let text = if v.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.2}", v)
        };
        Text::new(
            text,
            (SegmentValue::CenterOf(j), SegmentValue::CenterOf(n - 1 - i)),
            label_style.clone(),
        )
    }))?;

    root.present()
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    Ok(())
}

/// Bar chart of survival rate (%) per group. Empty groups get no bar.
pub fn render_rate_chart(table: &SurvivalTable, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = table.groups.iter().map(|g| g.label.clone()).collect();
    let format_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Survival Rate by {}", table.key.label()), (FONT, 26))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d((0..labels.len()).into_segmented(), 0.0..100.0)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(table.key.label())
        .y_desc("Survival Rate (%)")
        .x_labels(labels.len())
        .x_label_formatter(&format_label)
        .draw()?;

    chart.draw_series(
        table
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.rate.is_nan())
            .map(|(i, g)| {
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), g.rate * 100.0),
                    ],
                    SURVIVED.filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            }),
    )?;

    root.present()
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    Ok(())
}

/// Side-by-side bars per class, one for each sex
pub fn render_class_sex_chart(cells: &[ClassSexCell], path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut classes: Vec<&str> = Vec::new();
    for cell in cells {
        if !classes.contains(&cell.pclass.as_str()) {
            classes.push(&cell.pclass);
        }
    }
    let format_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => classes.get(*i).map(|c| c.to_string()).unwrap_or_default(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Survival Rate by Class and Sex", (FONT, 26))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d((0..classes.len()).into_segmented(), 0.0..100.0)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Passenger Class")
        .y_desc("Survival Rate (%)")
        .x_labels(classes.len())
        .x_label_formatter(&format_label)
        .draw()?;

    // Each class segment is split in two: female on the left, male on the right
    let sexes = [("female", FEMALE, (10, 45)), ("male", MALE, (45, 10))];
    for (sex, color, (left, right)) in sexes {
        chart
            .draw_series(
                cells
                    .iter()
                    .filter(|c| c.sex == sex && !c.stats.rate.is_nan())
                    .filter_map(|c| {
                        let i = classes.iter().position(|p| *p == c.pclass)?;
                        let mut bar = Rectangle::new(
                            [
                                (SegmentValue::Exact(i), 0.0),
                                (SegmentValue::Exact(i + 1), c.stats.rate * 100.0),
                            ],
                            color.filled(),
                        );
                        bar.set_margin(0, 0, left, right);
                        Some(bar)
                    }),
            )?
            .label(sex)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    Ok(())
}

/// Histogram counts of `values` over `bins` equal-width bins spanning
/// `[min, max]`. The last bin is closed on the right.
pub fn histogram(values: &[f64], min: f64, max: f64, bins: usize) -> Vec<u32> {
    let bins = bins.max(1);
    let mut counts = vec![0u32; bins];
    let width = (max - min) / bins as f64;
    for &v in values.iter().filter(|v| v.is_finite()) {
        let idx = if width > 0.0 {
            (((v - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }
    counts
}

/// Value range shown on a histogram's x axis. With `axis_max` the upper end
/// is capped there; values above the cap fall off the chart.
pub fn histogram_range(values: &[f64], axis_max: Option<f64>) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let max = match axis_max {
        Some(cap) if cap > min => max.min(cap),
        _ => max,
    };
    if max > min {
        (min, max)
    } else {
        (min, min + 1.0)
    }
}

/// Overlaid histograms of a numeric column for survivors and non-survivors
pub fn render_survival_histogram<F>(
    passengers: &[Passenger],
    value_of: F,
    label: &str,
    bins: usize,
    axis_max: Option<f64>,
    path: &Path,
) -> Result<()>
where
    F: Fn(&Passenger) -> f64,
{
    let all: Vec<f64> = passengers.iter().map(&value_of).collect();
    let (min, max) = histogram_range(&all, axis_max);

    let died: Vec<f64> = passengers
        .iter()
        .filter(|p| !p.record.survived)
        .map(&value_of)
        .filter(|&v| v <= max)
        .collect();
    let survived: Vec<f64> = passengers
        .iter()
        .filter(|p| p.record.survived)
        .map(&value_of)
        .filter(|&v| v <= max)
        .collect();
    let bins = bins.max(1);
    let width = (max - min) / bins as f64;

    let died_counts = histogram(&died, min, max, bins);
    let survived_counts = histogram(&survived, min, max, bins);
    let y_max = died_counts
        .iter()
        .chain(&survived_counts)
        .copied()
        .max()
        .unwrap_or(0)
        .max(1);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} Distribution by Survival", label), (FONT, 26))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(min..max, 0u32..(y_max + y_max / 10 + 1))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(label)
        .y_desc("Frequency")
        .draw()?;

    let series = [
        ("Did not survive", DIED, &died_counts),
        ("Survived", SURVIVED, &survived_counts),
    ];
    for (name, color, counts) in series {
        chart
            .draw_series(counts.iter().enumerate().map(|(i, &count)| {
                let x0 = min + width * i as f64;
                Rectangle::new([(x0, 0), (x0 + width, count)], color.mix(0.6).filled())
            }))?
            .label(name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    Ok(())
}
