//! Cleaning pass: duplicate removal, imputation and the cabin drop
//!
//! Consumes raw [`PassengerRecord`]s and produces [`CleanRecord`]s whose age,
//! fare and port are always present and which no longer carry the cabin
//! string. Cabin presence is kept as a flag before the column goes away.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use super::record::{Category, PassengerRecord, Pclass, Port, Sex};
use super::stats::median;

/// Share of missing cabins above which the cabin column counts as sparse.
///
/// The column is dropped regardless; the threshold only drives reporting.
pub const CABIN_MISSING_THRESHOLD: f64 = 0.5;

/// Age used when the table has no known ages at all
pub const DEFAULT_AGE: f64 = 28.0;

/// Port used when no embarkation port is known at all
pub const DEFAULT_PORT: Port = Port::Southampton;

/// A passenger after the cleaning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub passenger_id: u32,
    pub survived: bool,
    pub pclass: Pclass,
    pub name: String,
    pub sex: Sex,
    pub age: f64,
    pub sibsp: u32,
    pub parch: u32,
    pub ticket: String,
    pub fare: f64,
    pub embarked: Port,
    pub has_cabin: bool,
}

/// Median age used to fill one (class, sex) group
#[derive(Debug, Clone, Serialize)]
pub struct AgeFill {
    pub pclass: String,
    pub sex: String,
    /// Median of the known ages in the group, if it has any
    pub group_median: Option<f64>,
    /// Value actually assigned to the group's missing ages
    pub fill_value: f64,
    pub imputed: usize,
}

/// What the cleaning pass changed
#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicates_removed: usize,
    pub ages_imputed: usize,
    pub fares_imputed: usize,
    pub embarked_imputed: usize,
    pub global_age_median: f64,
    pub age_fills: Vec<AgeFill>,
    pub embarked_fill: String,
    pub cabin_missing_ratio: f64,
    pub cabin_threshold: f64,
}

impl CleaningReport {
    pub fn total_imputed(&self) -> usize {
        self.ages_imputed + self.fares_imputed + self.embarked_imputed
    }
}

/// Drop rows identical to an earlier row, keeping the first occurrence.
///
/// Returns the remaining rows and the number removed.
pub fn remove_duplicates(records: Vec<PassengerRecord>) -> (Vec<PassengerRecord>, usize) {
    let before = records.len();
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(before);
        records.iter().map(|r| seen.insert(r.key())).collect()
    };
    let kept: Vec<PassengerRecord> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Median of known ages for every (class, sex) group that has any
pub fn group_age_medians(records: &[PassengerRecord]) -> BTreeMap<(Pclass, Sex), f64> {
    let mut ages: BTreeMap<(Pclass, Sex), Vec<f64>> = BTreeMap::new();
    for record in records {
        if let Some(age) = record.age {
            ages.entry((record.pclass, record.sex)).or_default().push(age);
        }
    }
    ages.into_iter()
        .filter_map(|(group, values)| median(&values).map(|m| (group, m)))
        .collect()
}

/// Most frequent known port. Ties go to the earliest port in declaration
/// order.
pub fn embarked_mode(records: &[PassengerRecord]) -> Option<Port> {
    let mut counts: BTreeMap<Port, usize> = BTreeMap::new();
    for port in records.iter().filter_map(|r| r.embarked) {
        *counts.entry(port).or_default() += 1;
    }
    // BTreeMap iterates in port order; keep the first maximum
    let mut best: Option<(Port, usize)> = None;
    for (port, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((port, count));
        }
    }
    best.map(|(port, _)| port)
}

/// Share of records without a cabin
pub fn cabin_missing_ratio(records: &[PassengerRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().filter(|r| r.cabin.is_none()).count() as f64 / records.len() as f64
}

/// Run the whole cleaning pass.
pub fn clean_records(records: Vec<PassengerRecord>) -> (Vec<CleanRecord>, CleaningReport) {
    let rows_before = records.len();
    let (records, duplicates_removed) = remove_duplicates(records);
    if duplicates_removed > 0 {
        debug!(duplicates_removed, "removed duplicate rows");
    }

    let known_ages: Vec<f64> = records.iter().filter_map(|r| r.age).collect();
    let global_age_median = median(&known_ages).unwrap_or_else(|| {
        if !records.is_empty() {
            warn!("no known ages, falling back to default age {DEFAULT_AGE}");
        }
        DEFAULT_AGE
    });
    let group_medians = group_age_medians(&records);

    let mut fare_by_class: BTreeMap<Pclass, Vec<f64>> = BTreeMap::new();
    for record in &records {
        if let Some(fare) = record.fare {
            fare_by_class.entry(record.pclass).or_default().push(fare);
        }
    }
    let known_fares: Vec<f64> = records.iter().filter_map(|r| r.fare).collect();
    let global_fare_median = median(&known_fares).unwrap_or(0.0);

    let embarked_fill = embarked_mode(&records).unwrap_or_else(|| {
        if !records.is_empty() {
            warn!("no known embarkation ports, falling back to {DEFAULT_PORT}");
        }
        DEFAULT_PORT
    });

    let cabin_ratio = cabin_missing_ratio(&records);
    if !records.is_empty() && cabin_ratio <= CABIN_MISSING_THRESHOLD {
        warn!(
            "cabin column is only {:.1}% missing but is dropped anyway",
            cabin_ratio * 100.0
        );
    }

    let mut imputed_per_group: BTreeMap<(Pclass, Sex), usize> = BTreeMap::new();
    let mut ages_imputed = 0;
    let mut fares_imputed = 0;
    let mut embarked_imputed = 0;

    let cleaned: Vec<CleanRecord> = records
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let age = match r.age {
                Some(age) => age,
                None => {
                    ages_imputed += 1;
                    *imputed_per_group.entry((r.pclass, r.sex)).or_default() += 1;
                    group_medians
                        .get(&(r.pclass, r.sex))
                        .copied()
                        .unwrap_or(global_age_median)
                }
            };
            let fare = match r.fare {
                Some(fare) => fare,
                None => {
                    fares_imputed += 1;
                    fare_by_class
                        .get(&r.pclass)
                        .and_then(|fares| median(fares))
                        .unwrap_or(global_fare_median)
                }
            };
            let embarked = match r.embarked {
                Some(port) => port,
                None => {
                    embarked_imputed += 1;
                    embarked_fill
                }
            };

            CleanRecord {
                // 1-based row number after dedup when the input had no ids
                passenger_id: r.passenger_id.unwrap_or(i as u32 + 1),
                survived: r.survived,
                pclass: r.pclass,
                name: r.name,
                sex: r.sex,
                age,
                sibsp: r.sibsp,
                parch: r.parch,
                ticket: r.ticket,
                fare,
                embarked,
                has_cabin: r.cabin.is_some(),
            }
        })
        .collect();

    let mut age_fills = Vec::new();
    for &pclass in Pclass::ALL {
        for &sex in Sex::ALL {
            let group_median = group_medians.get(&(pclass, sex)).copied();
            let imputed = imputed_per_group.get(&(pclass, sex)).copied().unwrap_or(0);
            if group_median.is_none() && imputed > 0 {
                warn!("no known ages for {pclass} class {sex}, using global median");
            }
            age_fills.push(AgeFill {
                pclass: pclass.to_string(),
                sex: sex.to_string(),
                group_median,
                fill_value: group_median.unwrap_or(global_age_median),
                imputed,
            });
        }
    }

    debug!(
        ages_imputed,
        fares_imputed, embarked_imputed, "imputed missing values"
    );

    let report = CleaningReport {
        rows_before,
        rows_after: cleaned.len(),
        duplicates_removed,
        ages_imputed,
        fares_imputed,
        embarked_imputed,
        global_age_median,
        age_fills,
        embarked_fill: embarked_fill.code().to_string(),
        cabin_missing_ratio: cabin_ratio,
        cabin_threshold: CABIN_MISSING_THRESHOLD,
    };

    (cleaned, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, pclass: Pclass, sex: Sex, age: Option<f64>) -> PassengerRecord {
        PassengerRecord {
            passenger_id: Some(id),
            survived: false,
            pclass,
            name: format!("Passenger, Mr. Number{id}"),
            sex,
            age,
            sibsp: 0,
            parch: 0,
            ticket: format!("T{id}"),
            fare: Some(10.0),
            cabin: None,
            embarked: Some(Port::Southampton),
        }
    }

    #[test]
    fn test_group_median_fills_missing_age() {
        let records = vec![
            record(1, Pclass::First, Sex::Female, Some(30.0)),
            record(2, Pclass::First, Sex::Female, Some(40.0)),
            record(3, Pclass::First, Sex::Female, None),
            record(4, Pclass::Third, Sex::Male, Some(20.0)),
            record(5, Pclass::Third, Sex::Male, None),
        ];
        let (cleaned, report) = clean_records(records);

        assert_eq!(cleaned[2].age, 35.0);
        assert_eq!(cleaned[4].age, 20.0);
        assert_eq!(report.ages_imputed, 2);
    }

    #[test]
    fn test_empty_group_falls_back_to_global_median() {
        let records = vec![
            record(1, Pclass::First, Sex::Female, Some(30.0)),
            record(2, Pclass::First, Sex::Female, Some(50.0)),
            record(3, Pclass::Second, Sex::Male, None),
        ];
        let (cleaned, report) = clean_records(records);

        assert_eq!(cleaned[2].age, 40.0);
        assert_eq!(report.global_age_median, 40.0);
    }

    #[test]
    fn test_no_known_ages_uses_default() {
        let records = vec![record(1, Pclass::First, Sex::Male, None)];
        let (cleaned, _) = clean_records(records);
        assert_eq!(cleaned[0].age, DEFAULT_AGE);
    }

    #[test]
    fn test_embarked_mode_tie_breaks_on_port_order() {
        let mut records = vec![
            record(1, Pclass::First, Sex::Male, Some(1.0)),
            record(2, Pclass::First, Sex::Male, Some(1.0)),
            record(3, Pclass::First, Sex::Male, Some(1.0)),
            record(4, Pclass::First, Sex::Male, Some(1.0)),
        ];
        records[0].embarked = Some(Port::Southampton);
        records[1].embarked = Some(Port::Queenstown);
        records[2].embarked = Some(Port::Queenstown);
        records[3].embarked = Some(Port::Southampton);

        assert_eq!(embarked_mode(&records), Some(Port::Queenstown));
    }

    #[test]
    fn test_duplicates_keep_first() {
        let a = record(1, Pclass::First, Sex::Male, Some(30.0));
        let b = record(2, Pclass::Second, Sex::Female, None);
        let (kept, removed) = remove_duplicates(vec![a.clone(), b.clone(), a.clone()]);

        assert_eq!(removed, 1);
        assert_eq!(kept, vec![a, b]);
    }

    #[test]
    fn test_missing_fare_uses_class_median() {
        let mut records = vec![
            record(1, Pclass::First, Sex::Male, Some(30.0)),
            record(2, Pclass::First, Sex::Male, Some(30.0)),
            record(3, Pclass::Third, Sex::Male, Some(30.0)),
        ];
        records[0].fare = Some(80.0);
        records[1].fare = None;
        records[2].fare = Some(7.0);

        let (cleaned, report) = clean_records(records);
        assert_eq!(cleaned[1].fare, 80.0);
        assert_eq!(report.fares_imputed, 1);
    }

    #[test]
    fn test_cabin_becomes_presence_flag() {
        let mut records = vec![
            record(1, Pclass::First, Sex::Male, Some(30.0)),
            record(2, Pclass::Third, Sex::Male, Some(30.0)),
        ];
        records[0].cabin = Some("C85".to_string());

        let (cleaned, report) = clean_records(records);
        assert!(cleaned[0].has_cabin);
        assert!(!cleaned[1].has_cabin);
        assert_eq!(report.cabin_missing_ratio, 0.5);
    }
}
