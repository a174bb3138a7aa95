//! Feature engineering: per-passenger derived columns
//!
//! Everything here is a pure function of a single cleaned record, except the
//! fare quartile boundaries which are computed once over the whole table and
//! then applied row by row.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::clean::CleanRecord;
use super::record::Category;
use super::stats::quantile_sorted;

/// Honorific extracted from the passenger name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Title {
    Mr,
    Mrs,
    Miss,
    Master,
    Rare,
}

impl Title {
    /// Map a raw honorific (without the trailing dot) onto a title.
    ///
    /// French and abbreviated variants fold into their English forms;
    /// anything else outside the common set is `Rare`.
    pub fn from_honorific(raw: &str) -> Self {
        match raw {
            "Mr" => Title::Mr,
            "Mrs" | "Mme" => Title::Mrs,
            "Miss" | "Mlle" | "Ms" => Title::Miss,
            "Master" => Title::Master,
            _ => Title::Rare,
        }
    }
}

impl Category for Title {
    const ALL: &'static [Self] = &[Title::Mr, Title::Mrs, Title::Miss, Title::Master, Title::Rare];
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Title::Mr => "Mr",
            Title::Mrs => "Mrs",
            Title::Miss => "Miss",
            Title::Master => "Master",
            Title::Rare => "Rare",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeGroup {
    Child,
    Teen,
    Adult,
    MiddleAged,
    Senior,
}

impl AgeGroup {
    /// Child < 12, Teen 12-17, Adult 18-39, Middle-aged 40-59, Senior 60+
    pub fn from_age(age: f64) -> Self {
        if age < 12.0 {
            AgeGroup::Child
        } else if age < 18.0 {
            AgeGroup::Teen
        } else if age < 40.0 {
            AgeGroup::Adult
        } else if age < 60.0 {
            AgeGroup::MiddleAged
        } else {
            AgeGroup::Senior
        }
    }
}

impl Category for AgeGroup {
    const ALL: &'static [Self] = &[
        AgeGroup::Child,
        AgeGroup::Teen,
        AgeGroup::Adult,
        AgeGroup::MiddleAged,
        AgeGroup::Senior,
    ];
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgeGroup::Child => "Child",
            AgeGroup::Teen => "Teen",
            AgeGroup::Adult => "Adult",
            AgeGroup::MiddleAged => "Middle-aged",
            AgeGroup::Senior => "Senior",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FareGroup {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Category for FareGroup {
    const ALL: &'static [Self] = &[
        FareGroup::Low,
        FareGroup::Medium,
        FareGroup::High,
        FareGroup::VeryHigh,
    ];
}

impl fmt::Display for FareGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FareGroup::Low => "Low",
            FareGroup::Medium => "Medium",
            FareGroup::High => "High",
            FareGroup::VeryHigh => "Very High",
        };
        f.write_str(label)
    }
}

/// Quartile boundaries of the fare distribution.
///
/// Buckets are right-inclusive: a fare equal to `q1` is `Low`, equal to `q2`
/// is `Medium`, equal to `q3` is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareQuartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl FareQuartiles {
    /// Compute quartiles from the fares; `None` when there are no finite fares.
    pub fn from_fares(fares: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = fares.iter().copied().filter(|f| f.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            q1: quantile_sorted(&sorted, 0.25),
            q2: quantile_sorted(&sorted, 0.50),
            q3: quantile_sorted(&sorted, 0.75),
        })
    }

    pub fn bucket(&self, fare: f64) -> FareGroup {
        if fare <= self.q1 {
            FareGroup::Low
        } else if fare <= self.q2 {
            FareGroup::Medium
        } else if fare <= self.q3 {
            FareGroup::High
        } else {
            FareGroup::VeryHigh
        }
    }
}

/// Columns derived from a cleaned record. Computed once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub family_size: u32,
    pub is_alone: bool,
    pub title: Title,
    pub age_group: AgeGroup,
    pub fare_group: FareGroup,
}

/// A cleaned passenger together with its derived features
#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    pub record: CleanRecord,
    pub features: DerivedFeatures,
}

/// Table-level facts gathered by the feature pass
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub fare_quartiles: Option<FareQuartiles>,
    pub title_counts: BTreeMap<String, usize>,
    pub alone_count: usize,
}

/// SibSp + Parch + 1, saturating at `u32::MAX` for absurd counts
pub fn family_size(sibsp: u32, parch: u32) -> u32 {
    sibsp.saturating_add(parch).saturating_add(1)
}

/// Find the first whitespace-separated token that looks like `Word.` and
/// map it onto a [`Title`].
///
/// Works for both "Mr. John Smith" and "Braund, Mr. Owen Harris". Names with
/// no honorific are `Rare`.
pub fn extract_title(name: &str) -> Title {
    name.split_whitespace()
        .find_map(|token| {
            let word = token.strip_suffix('.')?;
            (!word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())).then_some(word)
        })
        .map(Title::from_honorific)
        .unwrap_or(Title::Rare)
}

pub fn derive_features(record: &CleanRecord, quartiles: &FareQuartiles) -> DerivedFeatures {
    let family_size = family_size(record.sibsp, record.parch);
    DerivedFeatures {
        family_size,
        is_alone: family_size == 1,
        title: extract_title(&record.name),
        age_group: AgeGroup::from_age(record.age),
        fare_group: quartiles.bucket(record.fare),
    }
}

/// Run the feature pass over the cleaned table.
pub fn engineer_features(records: Vec<CleanRecord>) -> (Vec<Passenger>, FeatureSummary) {
    let fares: Vec<f64> = records.iter().map(|r| r.fare).collect();
    let fare_quartiles = FareQuartiles::from_fares(&fares);

    let passengers: Vec<Passenger> = match &fare_quartiles {
        Some(quartiles) => records
            .into_iter()
            .map(|record| {
                let features = derive_features(&record, quartiles);
                Passenger { record, features }
            })
            .collect(),
        None => Vec::new(),
    };

    if let Some(q) = &fare_quartiles {
        debug!(q1 = q.q1, q2 = q.q2, q3 = q.q3, "fare quartiles");
    }

    let mut title_counts: BTreeMap<String, usize> = Title::ALL
        .iter()
        .map(|t| (t.to_string(), 0))
        .collect();
    for p in &passengers {
        *title_counts.entry(p.features.title.to_string()).or_default() += 1;
    }
    let alone_count = passengers.iter().filter(|p| p.features.is_alone).count();

    let summary = FeatureSummary {
        fare_quartiles,
        title_counts,
        alone_count,
    };

    (passengers, summary)
}
