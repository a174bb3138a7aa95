//! Groupwise survival statistics
//!
//! Purely descriptive ratios: group size, survivors and survival rate per
//! level of a categorical key. Empty groups report a NaN rate.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::correlation::{correlation_matrix, CorrelationMatrix};
use super::features::{AgeGroup, FareGroup, Passenger, Title};
use super::record::{Category, Pclass, Port, Sex};
use super::stats::{mean, median, survival_rate};

/// Whether a cabin was recorded for the passenger before the cabin column
/// was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CabinPresence {
    NoCabin,
    HasCabin,
}

impl Category for CabinPresence {
    const ALL: &'static [Self] = &[CabinPresence::NoCabin, CabinPresence::HasCabin];
}

impl fmt::Display for CabinPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CabinPresence::NoCabin => "No cabin",
            CabinPresence::HasCabin => "Has cabin",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Travelling {
    WithFamily,
    Alone,
}

impl Category for Travelling {
    const ALL: &'static [Self] = &[Travelling::WithFamily, Travelling::Alone];
}

impl fmt::Display for Travelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Travelling::WithFamily => "With family",
            Travelling::Alone => "Alone",
        })
    }
}

/// Categorical keys a survival table can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Sex,
    Pclass,
    AgeGroup,
    FamilySize,
    FareGroup,
    Embarked,
    CabinPresence,
    Title,
    IsAlone,
}

impl GroupKey {
    pub const ALL: [GroupKey; 9] = [
        GroupKey::Sex,
        GroupKey::Pclass,
        GroupKey::AgeGroup,
        GroupKey::FamilySize,
        GroupKey::FareGroup,
        GroupKey::Embarked,
        GroupKey::CabinPresence,
        GroupKey::Title,
        GroupKey::IsAlone,
    ];

    /// Human readable name of the key
    pub fn label(self) -> &'static str {
        match self {
            GroupKey::Sex => "Sex",
            GroupKey::Pclass => "Passenger Class",
            GroupKey::AgeGroup => "Age Group",
            GroupKey::FamilySize => "Family Size",
            GroupKey::FareGroup => "Fare Group",
            GroupKey::Embarked => "Embarked Port",
            GroupKey::CabinPresence => "Cabin Presence",
            GroupKey::Title => "Title",
            GroupKey::IsAlone => "Travelling Alone",
        }
    }

    /// File-name friendly identifier
    pub fn slug(self) -> &'static str {
        match self {
            GroupKey::Sex => "sex",
            GroupKey::Pclass => "pclass",
            GroupKey::AgeGroup => "age_group",
            GroupKey::FamilySize => "family_size",
            GroupKey::FareGroup => "fare_group",
            GroupKey::Embarked => "embarked",
            GroupKey::CabinPresence => "cabin_presence",
            GroupKey::Title => "title",
            GroupKey::IsAlone => "is_alone",
        }
    }
}

/// Survival counts for one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub label: String,
    pub count: usize,
    pub survived: usize,
    /// `survived / count`, NaN (serialized as null) for an empty group
    pub rate: f64,
}

impl GroupStats {
    pub fn new(label: impl Into<String>, count: usize, survived: usize) -> Self {
        Self {
            label: label.into(),
            count,
            survived,
            rate: survival_rate(survived, count),
        }
    }

    fn from_passengers<'a>(label: impl Into<String>, passengers: impl Iterator<Item = &'a Passenger>) -> Self {
        let (count, survived) = passengers.fold((0, 0), |(n, s), p| {
            (n + 1, s + usize::from(p.record.survived))
        });
        Self::new(label, count, survived)
    }
}

/// Survival statistics for every level of one key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalTable {
    pub key: GroupKey,
    pub groups: Vec<GroupStats>,
}

impl SurvivalTable {
    /// Look up a group by its label
    pub fn group(&self, label: &str) -> Option<&GroupStats> {
        self.groups.iter().find(|g| g.label == label)
    }
}

/// One cell of the class x sex interaction table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSexCell {
    pub pclass: String,
    pub sex: String,
    pub stats: GroupStats,
}

/// Count passengers and survivors per level. Every level in `levels` shows
/// up in the output even when empty; further observed levels are added in
/// key order.
fn tally<K, F>(passengers: &[Passenger], levels: &[K], level_of: F) -> Vec<GroupStats>
where
    K: Ord + Copy + fmt::Display,
    F: Fn(&Passenger) -> K,
{
    let mut counts: BTreeMap<K, (usize, usize)> = levels.iter().map(|&k| (k, (0, 0))).collect();
    for p in passengers {
        let entry = counts.entry(level_of(p)).or_default();
        entry.0 += 1;
        entry.1 += usize::from(p.record.survived);
    }
    counts
        .into_iter()
        .map(|(level, (count, survived))| GroupStats::new(level.to_string(), count, survived))
        .collect()
}

/// Survival statistics grouped by one key
pub fn survival_by(passengers: &[Passenger], key: GroupKey) -> SurvivalTable {
    let groups = match key {
        GroupKey::Sex => tally(passengers, Sex::ALL, |p| p.record.sex),
        GroupKey::Pclass => tally(passengers, Pclass::ALL, |p| p.record.pclass),
        GroupKey::AgeGroup => tally(passengers, AgeGroup::ALL, |p| p.features.age_group),
        GroupKey::FamilySize => tally(passengers, &[], |p| p.features.family_size),
        GroupKey::FareGroup => tally(passengers, FareGroup::ALL, |p| p.features.fare_group),
        GroupKey::Embarked => tally(passengers, Port::ALL, |p| p.record.embarked),
        GroupKey::CabinPresence => tally(passengers, CabinPresence::ALL, |p| {
            if p.record.has_cabin {
                CabinPresence::HasCabin
            } else {
                CabinPresence::NoCabin
            }
        }),
        GroupKey::Title => tally(passengers, Title::ALL, |p| p.features.title),
        GroupKey::IsAlone => tally(passengers, Travelling::ALL, |p| {
            if p.features.is_alone {
                Travelling::Alone
            } else {
                Travelling::WithFamily
            }
        }),
    };
    SurvivalTable { key, groups }
}

/// One survival table per requested key, in the requested order
pub fn survival_tables(passengers: &[Passenger], keys: &[GroupKey]) -> Vec<SurvivalTable> {
    keys.iter().map(|&key| survival_by(passengers, key)).collect()
}

pub fn overall_survival(passengers: &[Passenger]) -> GroupStats {
    GroupStats::from_passengers("All passengers", passengers.iter())
}

/// Survival for every (class, sex) combination
pub fn class_sex_survival(passengers: &[Passenger]) -> Vec<ClassSexCell> {
    let mut cells = Vec::with_capacity(Pclass::ALL.len() * Sex::ALL.len());
    for &pclass in Pclass::ALL {
        for &sex in Sex::ALL {
            let stats = GroupStats::from_passengers(
                format!("{pclass} {sex}"),
                passengers
                    .iter()
                    .filter(|p| p.record.pclass == pclass && p.record.sex == sex),
            );
            cells.push(ClassSexCell {
                pclass: pclass.to_string(),
                sex: sex.to_string(),
                stats,
            });
        }
    }
    cells
}

/// Headline comparisons and descriptive observations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub total_passengers: usize,
    pub survivors: usize,
    pub overall_rate: f64,
    pub female_rate: f64,
    pub male_rate: f64,
    pub first_class_rate: f64,
    pub third_class_rate: f64,
    pub child_rate: f64,
    pub alone_rate: f64,
    pub with_family_rate: f64,
    pub median_fare: f64,
    pub above_median_fare_rate: f64,
    pub at_or_below_median_fare_rate: f64,
    pub mean_age: f64,
    pub min_age: f64,
    pub max_age: f64,
    pub mean_fare: f64,
    pub min_fare: f64,
    pub max_fare: f64,
}

fn rate_where<F: Fn(&Passenger) -> bool>(passengers: &[Passenger], predicate: F) -> f64 {
    GroupStats::from_passengers("", passengers.iter().filter(|p| predicate(p))).rate
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::NAN, f64::NAN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

impl Insights {
    pub fn compute(passengers: &[Passenger]) -> Self {
        let overall = overall_survival(passengers);
        let ages: Vec<f64> = passengers.iter().map(|p| p.record.age).collect();
        let fares: Vec<f64> = passengers.iter().map(|p| p.record.fare).collect();
        let median_fare = median(&fares).unwrap_or(f64::NAN);
        let (min_age, max_age) = min_max(&ages);
        let (min_fare, max_fare) = min_max(&fares);

        Self {
            total_passengers: overall.count,
            survivors: overall.survived,
            overall_rate: overall.rate,
            female_rate: rate_where(passengers, |p| p.record.sex == Sex::Female),
            male_rate: rate_where(passengers, |p| p.record.sex == Sex::Male),
            first_class_rate: rate_where(passengers, |p| p.record.pclass == Pclass::First),
            third_class_rate: rate_where(passengers, |p| p.record.pclass == Pclass::Third),
            child_rate: rate_where(passengers, |p| p.features.age_group == AgeGroup::Child),
            alone_rate: rate_where(passengers, |p| p.features.is_alone),
            with_family_rate: rate_where(passengers, |p| !p.features.is_alone),
            median_fare,
            above_median_fare_rate: rate_where(passengers, |p| p.record.fare > median_fare),
            at_or_below_median_fare_rate: rate_where(passengers, |p| p.record.fare <= median_fare),
            mean_age: mean(&ages).unwrap_or(f64::NAN),
            min_age,
            max_age,
            mean_fare: mean(&fares).unwrap_or(f64::NAN),
            min_fare,
            max_fare,
        }
    }

    /// Comparisons phrased for the console, skipping ones without data
    pub fn findings(&self) -> Vec<String> {
        let mut findings = Vec::new();
        if !self.female_rate.is_nan() && !self.male_rate.is_nan() {
            findings.push(format!(
                "Women had a {:.1}% survival rate vs {:.1}% for men",
                self.female_rate * 100.0,
                self.male_rate * 100.0
            ));
        }
        if !self.first_class_rate.is_nan() && !self.third_class_rate.is_nan() {
            findings.push(format!(
                "1st class passengers had a {:.1}% survival rate vs {:.1}% for 3rd class",
                self.first_class_rate * 100.0,
                self.third_class_rate * 100.0
            ));
        }
        if self.child_rate > 0.0 {
            findings.push(format!(
                "Children had a {:.1}% survival rate",
                self.child_rate * 100.0
            ));
        }
        if !self.alone_rate.is_nan() && !self.with_family_rate.is_nan() {
            findings.push(format!(
                "Passengers with family had a {:.1}% survival rate vs {:.1}% for solo travelers",
                self.with_family_rate * 100.0,
                self.alone_rate * 100.0
            ));
        }
        if !self.above_median_fare_rate.is_nan() && !self.at_or_below_median_fare_rate.is_nan() {
            findings.push(format!(
                "Higher fare passengers had a {:.1}% survival rate vs {:.1}% for lower fare",
                self.above_median_fare_rate * 100.0,
                self.at_or_below_median_fare_rate * 100.0
            ));
        }
        findings
    }
}

/// Everything the reporter consumes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalAnalysis {
    pub overall: GroupStats,
    pub tables: Vec<SurvivalTable>,
    pub class_sex: Vec<ClassSexCell>,
    pub correlations: CorrelationMatrix,
    pub insights: Insights,
}

impl SurvivalAnalysis {
    pub fn compute(passengers: &[Passenger], keys: &[GroupKey]) -> Self {
        Self {
            overall: overall_survival(passengers),
            tables: survival_tables(passengers, keys),
            class_sex: class_sex_survival(passengers),
            correlations: correlation_matrix(passengers),
            insights: Insights::compute(passengers),
        }
    }

    pub fn table(&self, key: GroupKey) -> Option<&SurvivalTable> {
        self.tables.iter().find(|t| t.key == key)
    }

    pub fn group_count(&self) -> usize {
        self.tables.iter().map(|t| t.groups.len()).sum()
    }
}
