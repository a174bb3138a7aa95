//! Tests for survival aggregation

use lifeboat::pipeline::{
    class_sex_survival, correlation_matrix, overall_survival, records_from_dataframe, survival_by,
    GroupKey, Insights, Pclass, Sex, SurvivalAnalysis,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn manifest_analysis() -> SurvivalAnalysis {
    let records = records_from_dataframe(&create_manifest_dataframe()).unwrap();
    let passengers = passengers_from(records);
    SurvivalAnalysis::compute(&passengers, &GroupKey::ALL)
}

#[test]
fn test_survival_by_sex_four_passengers() {
    let passengers = passengers_from(vec![
        record(1, true, Pclass::First, Sex::Female),
        record(2, true, Pclass::Second, Sex::Female),
        record(3, false, Pclass::Third, Sex::Male),
        record(4, false, Pclass::First, Sex::Male),
    ]);

    let table = survival_by(&passengers, GroupKey::Sex);

    let female = table.group("female").unwrap();
    assert_eq!(female.count, 2);
    assert_eq!(female.rate, 1.0);
    let male = table.group("male").unwrap();
    assert_eq!(male.count, 2);
    assert_eq!(male.rate, 0.0);
}

#[test]
fn test_manifest_survival_rates() {
    let analysis = manifest_analysis();

    assert_eq!(analysis.overall.count, 9);
    assert_eq!(analysis.overall.survived, 5);

    let sex = analysis.table(GroupKey::Sex).unwrap();
    assert_eq!(sex.group("female").unwrap().rate, 1.0);
    assert!((sex.group("male").unwrap().rate - 0.2).abs() < 1e-9);

    let class = analysis.table(GroupKey::Pclass).unwrap();
    assert_eq!(class.group("1st").unwrap().rate, 0.75);
    assert_eq!(class.group("2nd").unwrap().rate, 1.0);
    assert_eq!(class.group("3rd").unwrap().rate, 0.25);
}

#[test]
fn test_group_counts_sum_to_total() {
    let analysis = manifest_analysis();

    for table in &analysis.tables {
        let total: usize = table.groups.iter().map(|g| g.count).sum();
        assert_eq!(
            total, analysis.overall.count,
            "{} groups should cover every passenger",
            table.key.label()
        );
        for group in &table.groups {
            assert!(group.survived <= group.count);
            if group.count > 0 {
                assert!((0.0..=1.0).contains(&group.rate));
            }
        }
    }
}

#[test]
fn test_empty_levels_are_reported_with_undefined_rate() {
    let analysis = manifest_analysis();

    let age = analysis.table(GroupKey::AgeGroup).unwrap();
    let labels: Vec<&str> = age.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Child", "Teen", "Adult", "Middle-aged", "Senior"]);

    let teen = age.group("Teen").unwrap();
    assert_eq!(teen.count, 0);
    assert!(teen.rate.is_nan());
}

#[test]
fn test_family_size_lists_observed_sizes_only() {
    let analysis = manifest_analysis();

    let family = analysis.table(GroupKey::FamilySize).unwrap();
    let labels: Vec<&str> = family.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["1", "2", "3", "5"]);
    assert_eq!(family.group("1").unwrap().count, 4);
}

#[test]
fn test_class_sex_cells_cover_every_combination() {
    let passengers = passengers_from(vec![
        record(1, true, Pclass::First, Sex::Female),
        record(2, false, Pclass::Third, Sex::Male),
        record(3, true, Pclass::Third, Sex::Male),
    ]);

    let cells = class_sex_survival(&passengers);
    assert_eq!(cells.len(), 6);

    let third_male = cells
        .iter()
        .find(|c| c.pclass == "3rd" && c.sex == "male")
        .unwrap();
    assert_eq!(third_male.stats.count, 2);
    assert_eq!(third_male.stats.rate, 0.5);

    let second_female = cells
        .iter()
        .find(|c| c.pclass == "2nd" && c.sex == "female")
        .unwrap();
    assert!(second_female.stats.rate.is_nan());
}

#[test]
fn test_overall_survival_of_empty_table() {
    let overall = overall_survival(&[]);
    assert_eq!(overall.count, 0);
    assert!(overall.rate.is_nan());
}

#[test]
fn test_insights_on_manifest() {
    let records = records_from_dataframe(&create_manifest_dataframe()).unwrap();
    let passengers = passengers_from(records);
    let insights = Insights::compute(&passengers);

    assert_eq!(insights.total_passengers, 9);
    assert_eq!(insights.survivors, 5);
    assert_eq!(insights.female_rate, 1.0);
    assert_eq!(insights.child_rate, 1.0);
    assert_eq!(insights.min_age, 2.0);
    assert_eq!(insights.max_age, 54.0);
    assert!((insights.median_fare - 11.1333).abs() < 1e-9);

    let findings = insights.findings();
    assert!(findings[0].starts_with("Women had a 100.0% survival rate"));
}

#[test]
fn test_correlation_matrix_is_symmetric() {
    let records = records_from_dataframe(&create_manifest_dataframe()).unwrap();
    let passengers = passengers_from(records);
    let matrix = correlation_matrix(&passengers);

    assert_eq!(matrix.columns.len(), 8);
    for i in 0..matrix.columns.len() {
        for j in 0..matrix.columns.len() {
            let (a, b) = (matrix.values[i][j], matrix.values[j][i]);
            assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }
    let diag = matrix.get("Fare", "Fare").unwrap();
    assert!((diag - 1.0).abs() < 1e-9);

    // IsAlone is a function of FamilySize, so they move in opposite directions
    assert!(matrix.get("FamilySize", "IsAlone").unwrap() < 0.0);

    let pairs = matrix.strongest_pairs(3);
    assert_eq!(pairs.len(), 3);
    assert!(pairs[0].2.abs() >= pairs[1].2.abs());
}

#[test]
fn test_analysis_serializes_undefined_rates_as_null() {
    let passengers = passengers_from(vec![record(1, true, Pclass::First, Sex::Female)]);
    let analysis = SurvivalAnalysis::compute(&passengers, &[GroupKey::Sex]);

    let json = serde_json::to_value(&analysis).unwrap();
    let groups = json["tables"][0]["groups"].as_array().unwrap();
    let male = groups.iter().find(|g| g["label"] == "male").unwrap();
    assert!(male["rate"].is_null());
    assert_eq!(json["tables"][0]["key"], "sex");
}
