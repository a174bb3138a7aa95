//! Integration tests for the full analysis pipeline

use lifeboat::pipeline::*;
use lifeboat::report::{
    export_survival_report, export_survival_tables_csv, package_artifacts, render_all_charts,
    ReportParams, SurvivalReport, TimingInfo,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

/// Run load -> clean -> features and return the passengers plus the reports
fn run_pipeline(path: &std::path::Path) -> (Vec<Passenger>, CleaningReport, FeatureSummary) {
    let loaded = load_passengers(path).unwrap();
    let (cleaned, cleaning) = clean_records(loaded.records);
    let (passengers, features) = engineer_features(cleaned);
    (passengers, cleaning, features)
}

#[test]
fn test_full_pipeline_writes_cleaned_table() {
    let mut df = create_manifest_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);

    let (passengers, cleaning, _) = run_pipeline(&csv_path);
    assert_eq!(cleaning.duplicates_removed, 1);

    let output_path = temp_dir.path().join("out").join("train_cleaned.csv");
    let mut cleaned_df = passengers_to_dataframe(&passengers).unwrap();
    save_dataset(&mut cleaned_df, &output_path).unwrap();

    let reloaded = load_dataset(&output_path).unwrap();
    assert_eq!(reloaded.height(), 9);
    assert_eq!(reloaded.get_column_names(), &CLEANED_COLUMNS);
    assert!(
        reloaded.column("Cabin").is_err(),
        "Cabin must not appear in the cleaned table"
    );

    for column in ["Age", "Embarked", "Fare", "Title", "AgeGroup", "FareGroup"] {
        assert_eq!(
            reloaded.column(column).unwrap().null_count(),
            0,
            "{column} should have no nulls after cleaning"
        );
    }
}

#[test]
fn test_cleaned_table_reloads_to_same_analysis() {
    let mut df = create_manifest_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);

    let (passengers, _, _) = run_pipeline(&csv_path);
    let first = SurvivalAnalysis::compute(&passengers, &GroupKey::ALL);

    // The cleaned table keeps every column the loader needs except Cabin;
    // add it back from HasCabin so the second run sees the same presence.
    let mut cleaned_df = passengers_to_dataframe(&passengers).unwrap();
    let cabins: Vec<Option<&str>> = passengers
        .iter()
        .map(|p| p.record.has_cabin.then_some("X1"))
        .collect();
    cleaned_df
        .with_column(Column::new("Cabin".into(), cabins))
        .unwrap();
    let second_path = temp_dir.path().join("second.csv");
    save_dataset(&mut cleaned_df, &second_path).unwrap();

    let (second_passengers, second_cleaning, _) = run_pipeline(&second_path);
    assert_eq!(second_cleaning.total_imputed(), 0, "Nothing is left to impute");
    assert_eq!(second_cleaning.duplicates_removed, 0);

    let second = SurvivalAnalysis::compute(&second_passengers, &GroupKey::ALL);
    assert_eq!(
        serde_json::to_string(&first.tables).unwrap(),
        serde_json::to_string(&second.tables).unwrap(),
        "Re-running on cleaned data must give the same survival tables"
    );
}

#[test]
fn test_analysis_is_deterministic() {
    let mut df = create_large_manifest(500, 7);
    let (_temp_dir, csv_path) = create_temp_csv(&mut df);

    let (a, _, _) = run_pipeline(&csv_path);
    let (b, _, _) = run_pipeline(&csv_path);

    let first = serde_json::to_string(&SurvivalAnalysis::compute(&a, &GroupKey::ALL)).unwrap();
    let second = serde_json::to_string(&SurvivalAnalysis::compute(&b, &GroupKey::ALL)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_large_manifest_invariants() {
    let mut df = create_large_manifest(2_000, 42);
    let (_temp_dir, parquet_path) = create_temp_parquet(&mut df);

    let (passengers, cleaning, features) = run_pipeline(&parquet_path);
    assert_eq!(cleaning.rows_after, passengers.len());
    assert!(cleaning.ages_imputed > 0);

    let analysis = SurvivalAnalysis::compute(&passengers, &GroupKey::ALL);
    for table in &analysis.tables {
        let total: usize = table.groups.iter().map(|g| g.count).sum();
        assert_eq!(total, passengers.len());
    }

    let alone = analysis.table(GroupKey::IsAlone).unwrap();
    assert_eq!(alone.group("Alone").unwrap().count, features.alone_count);
}

#[test]
fn test_report_and_bundle_outputs() {
    let mut df = create_manifest_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let loaded = load_passengers(&csv_path).unwrap();
    let missing_ratios = loaded.missing_ratios.clone();
    let (cleaned, cleaning) = clean_records(loaded.records);
    let (passengers, features) = engineer_features(cleaned);
    let analysis = SurvivalAnalysis::compute(&passengers, &GroupKey::ALL);

    let output_path = temp_dir.path().join("train_cleaned.csv");
    let mut cleaned_df = passengers_to_dataframe(&passengers).unwrap();
    save_dataset(&mut cleaned_df, &output_path).unwrap();

    let report_path = temp_dir.path().join("train_survival_report.json");
    let report = SurvivalReport::new(
        ReportParams {
            input_file: &csv_path,
            output_file: &output_path,
            missing_threshold: 0.5,
            missing_ratios: &missing_ratios,
            timing: TimingInfo::default(),
        },
        &cleaning,
        &features,
        &analysis,
    );
    export_survival_report(&report, &report_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["cleaning"]["duplicates_removed"], 1);
    assert_eq!(json["analysis"]["overall"]["survived"], 5);
    assert_eq!(json["analysis"]["tables"].as_array().unwrap().len(), 9);
    let cabin = json["missing_values"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["column"] == "Cabin")
        .unwrap();
    assert_eq!(cabin["above_threshold"], true);

    let tables_path = temp_dir.path().join("train_survival_tables.csv");
    export_survival_tables_csv(&analysis, &tables_path).unwrap();
    let tables_csv = std::fs::read_to_string(&tables_path).unwrap();
    let mut lines = tables_csv.lines();
    assert_eq!(lines.next(), Some("key,group,count,survived,survival_rate"));
    assert!(tables_csv.contains("sex,female,4,4,1.0000"));
    assert!(tables_csv.contains("age_group,Teen,0,0,\n"));
    assert_eq!(lines.count(), analysis.group_count());

    let figures_dir = temp_dir.path().join("figures");
    let charts = render_all_charts(&passengers, &analysis, &figures_dir, 10).unwrap();
    // overview, 9 keys, class x sex, two histograms, heatmap
    assert_eq!(charts.len(), 1 + 9 + 1 + 2 + 1);
    assert!(figures_dir.join("survival_overview.svg").exists());
    assert!(figures_dir.join("survival_by_sex.svg").exists());
    assert!(figures_dir.join("age_distribution.svg").exists());
    let heatmap = std::fs::read_to_string(figures_dir.join("correlation_heatmap.svg")).unwrap();
    assert!(heatmap.contains("Feature Correlation Heatmap"));
    assert!(heatmap.contains("FamilySize"));
    assert!(heatmap.contains("1.00"), "Diagonal cells are labelled with their value");
    let overview = std::fs::read_to_string(figures_dir.join("survival_overview.svg")).unwrap();
    assert!(overview.contains("Survived (5)"));
    assert!(overview.contains("Did not survive (4)"));

    let zip_path = temp_dir.path().join("train_analysis.zip");
    package_artifacts(
        &[output_path.clone(), report_path.clone(), tables_path.clone()],
        &charts,
        &zip_path,
    )
    .unwrap();

    let archive = ::zip::ZipArchive::new(std::fs::File::open(&zip_path).unwrap()).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"train_cleaned.csv"));
    assert!(names.contains(&"train_survival_report.json"));
    assert!(names.contains(&"figures/survival_by_class_and_sex.svg"));
    assert_eq!(archive.len(), 3 + charts.len());
    assert!(output_path.exists(), "Bundled files stay on disk");
}
