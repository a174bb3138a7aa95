//! Lifeboat: Passenger Survival Analysis CLI Tool
//!
//! Loads a passenger manifest, cleans it, derives features and reports
//! survival rates across passenger groups.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::{info, warn};

use lifeboat::cli::{run_overview, Cli, Commands};
use lifeboat::pipeline::{
    clean_records, engineer_features, get_columns_above_threshold, load_passengers,
    passengers_to_dataframe, save_dataset, GroupKey, SurvivalAnalysis, CABIN_MISSING_THRESHOLD,
};
use lifeboat::report::{
    export_survival_report, export_survival_tables_csv, package_artifacts, print_class_sex_table,
    print_cleaning_report, print_correlation_matrix, print_feature_summary, print_insights,
    print_missing_profile, print_survival_table, render_all_charts, ReportParams, RunSummary,
    SurvivalReport, TimingInfo,
};
use lifeboat::utils::{
    create_spinner, finish_with_success, finish_with_warning, init_tracing, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning, RunConfig,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Overview { input, sample_rows } => run_overview(input, *sample_rows),
        };
    }

    // Main analysis pipeline - require input
    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let output_path = cli
        .output_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive output path"))?;
    let report_path = cli
        .report_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive report path"))?;
    let tables_csv_path = cli
        .tables_csv_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive survival tables path"))?;
    let figures_dir = if cli.no_charts {
        None
    } else {
        cli.figures_dir()
    };

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&RunConfig {
        input,
        output: &output_path,
        report: &report_path,
        figures: figures_dir.as_deref(),
        missing_threshold: cli.missing_threshold,
        bundle: cli.bundle,
    });

    let run_start = Instant::now();
    let mut timing = TimingInfo::default();

    // Step 1: Load dataset
    print_step_header(1, "Load Passenger Manifest");

    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let loaded = load_passengers(input)?;
    finish_with_success(&spinner, "Dataset loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", loaded.rows);
    println!("      Columns: {}", loaded.cols);
    println!("      Estimated memory: {:.2} MB", loaded.memory_mb);

    let mut summary = RunSummary::new(loaded.rows);
    let load_elapsed = step_start.elapsed();
    timing.load_ms = load_elapsed.as_millis() as u64;
    print_step_time(load_elapsed);

    // Step 2: Missing values and cleaning
    print_step_header(2, "Missing Values and Cleaning");

    let step_start = Instant::now();
    print_missing_profile(&loaded.missing_ratios, cli.missing_threshold);
    let sparse = get_columns_above_threshold(&loaded.missing_ratios, cli.missing_threshold);
    if sparse.is_empty() {
        print_info("No columns exceed the missing value threshold");
    } else {
        print_count(
            "column(s) with high missing values",
            sparse.len(),
            Some(&format!("(>{:.1}%)", cli.missing_threshold * 100.0)),
        );
    }

    let spinner = create_spinner("Cleaning records...");
    let (cleaned, cleaning) = clean_records(loaded.records);
    if cleaning.total_imputed() > 0 {
        finish_with_warning(
            &spinner,
            &format!("Cleaning complete, {} value(s) imputed", cleaning.total_imputed()),
        );
    } else {
        finish_with_success(&spinner, "Cleaning complete");
    }
    print_cleaning_report(&cleaning);
    if cleaning.cabin_missing_ratio > CABIN_MISSING_THRESHOLD {
        print_warning(&format!(
            "Cabin is {:.1}% missing; only cabin presence is kept",
            cleaning.cabin_missing_ratio * 100.0
        ));
    }
    summary.add_cleaning(&cleaning);

    let clean_elapsed = step_start.elapsed();
    timing.clean_ms = clean_elapsed.as_millis() as u64;
    print_step_time(clean_elapsed);

    // Step 3: Feature engineering
    print_step_header(3, "Feature Engineering");

    let step_start = Instant::now();
    let (passengers, features) = engineer_features(cleaned);
    print_success("Derived family size, travelling alone, title, age group and fare group");
    print_feature_summary(&features);
    let features_elapsed = step_start.elapsed();
    timing.features_ms = features_elapsed.as_millis() as u64;
    print_step_time(features_elapsed);

    // Step 4: Survival analysis
    print_step_header(4, "Survival Analysis");

    let step_start = Instant::now();
    let spinner = create_spinner("Aggregating survival rates...");
    let analysis = SurvivalAnalysis::compute(&passengers, &GroupKey::ALL);
    finish_with_success(&spinner, "Survival analysis complete");
    if passengers.is_empty() {
        warn!("no passengers left after cleaning; every survival rate is undefined");
    }

    for table in &analysis.tables {
        print_survival_table(table);
    }
    print_class_sex_table(&analysis.class_sex);
    print_correlation_matrix(&analysis.correlations);
    print_insights(&analysis.overall, &analysis.insights);
    summary.add_analysis(&analysis);

    let analysis_elapsed = step_start.elapsed();
    timing.analysis_ms = analysis_elapsed.as_millis() as u64;
    print_step_time(analysis_elapsed);

    // Step 5: Save results
    print_step_header(5, "Save Results");

    let step_start = Instant::now();
    let spinner = create_spinner("Writing cleaned dataset...");
    let mut df = passengers_to_dataframe(&passengers)?;
    save_dataset(&mut df, &output_path)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
    summary.add_artifact(output_path.clone());

    let charts = match &figures_dir {
        Some(dir) => {
            let spinner = create_spinner("Rendering charts...");
            let bins = usize::from(cli.histogram_bins);
            let charts = render_all_charts(&passengers, &analysis, dir, bins)?;
            finish_with_success(
                &spinner,
                &format!("{} chart(s) saved to {}", charts.len(), dir.display()),
            );
            charts
        }
        None => {
            print_info("Chart rendering disabled");
            Vec::new()
        }
    };

    export_survival_tables_csv(&analysis, &tables_csv_path)?;
    print_success(&format!("Survival tables saved to {}", tables_csv_path.display()));

    timing.save_ms = step_start.elapsed().as_millis() as u64;
    timing.total_ms = run_start.elapsed().as_millis() as u64;
    let report = SurvivalReport::new(
        ReportParams {
            input_file: input,
            output_file: &output_path,
            missing_threshold: cli.missing_threshold,
            missing_ratios: &loaded.missing_ratios,
            timing,
        },
        &cleaning,
        &features,
        &analysis,
    );
    export_survival_report(&report, &report_path)?;
    print_success(&format!("Survival report saved to {}", report_path.display()));
    summary.add_artifact(report_path.clone());
    summary.add_artifact(tables_csv_path.clone());

    if cli.bundle {
        if let Some(bundle_path) = cli.bundle_path() {
            let files = [output_path.clone(), report_path.clone(), tables_csv_path.clone()];
            package_artifacts(&files, &charts, &bundle_path)?;
            print_success(&format!("Bundle saved to {}", bundle_path.display()));
            summary.add_artifact(bundle_path);
        }
    }
    summary.add_artifacts(charts);

    let save_elapsed = step_start.elapsed();
    print_step_time(save_elapsed);
    info!(
        total_ms = run_start.elapsed().as_millis() as u64,
        "analysis finished"
    );

    summary.display();
    print_completion();

    Ok(())
}
