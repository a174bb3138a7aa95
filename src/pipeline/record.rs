//! Typed passenger records and the categorical levels used for grouping

use std::fmt;

/// A categorical column with a fixed, ordered set of levels.
///
/// `ALL` lists every level in declaration order. Survival tables use it so
/// that empty groups still show up in the output.
pub trait Category: Copy + Ord + fmt::Display + 'static {
    const ALL: &'static [Self];
}

/// Ticket class (1st, 2nd, 3rd)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pclass {
    First,
    Second,
    Third,
}

impl Pclass {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Pclass::First),
            2 => Some(Pclass::Second),
            3 => Some(Pclass::Third),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Pclass::First => 1,
            Pclass::Second => 2,
            Pclass::Third => 3,
        }
    }
}

impl Category for Pclass {
    const ALL: &'static [Self] = &[Pclass::First, Pclass::Second, Pclass::Third];
}

impl fmt::Display for Pclass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Pclass::First => "1st",
            Pclass::Second => "2nd",
            Pclass::Third => "3rd",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "female" => Some(Sex::Female),
            "male" => Some(Sex::Male),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

impl Category for Sex {
    const ALL: &'static [Self] = &[Sex::Female, Sex::Male];
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Port of embarkation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Port {
    Cherbourg,
    Queenstown,
    Southampton,
}

impl Port {
    /// Parse a one-letter port code. Empty strings are not a port.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "C" | "c" => Some(Port::Cherbourg),
            "Q" | "q" => Some(Port::Queenstown),
            "S" | "s" => Some(Port::Southampton),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Port::Cherbourg => "C",
            Port::Queenstown => "Q",
            Port::Southampton => "S",
        }
    }
}

impl Category for Port {
    const ALL: &'static [Self] = &[Port::Cherbourg, Port::Queenstown, Port::Southampton];
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Port::Cherbourg => "Cherbourg",
            Port::Queenstown => "Queenstown",
            Port::Southampton => "Southampton",
        };
        f.write_str(label)
    }
}

/// One row of the passenger manifest, exactly as loaded.
///
/// `passenger_id` is `None` when the input has no id column; row numbers
/// are assigned after duplicate removal.
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerRecord {
    pub passenger_id: Option<u32>,
    pub survived: bool,
    pub pclass: Pclass,
    pub name: String,
    pub sex: Sex,
    pub age: Option<f64>,
    pub sibsp: u32,
    pub parch: u32,
    pub ticket: String,
    pub fare: Option<f64>,
    pub cabin: Option<String>,
    pub embarked: Option<Port>,
}

/// Hashable view of every field of a record, used to detect duplicate rows.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct RecordKey<'a> {
    passenger_id: Option<u32>,
    survived: bool,
    pclass: Pclass,
    name: &'a str,
    sex: Sex,
    age: Option<u64>,
    sibsp: u32,
    parch: u32,
    ticket: &'a str,
    fare: Option<u64>,
    cabin: Option<&'a str>,
    embarked: Option<Port>,
}

impl PassengerRecord {
    pub(crate) fn key(&self) -> RecordKey<'_> {
        RecordKey {
            passenger_id: self.passenger_id,
            survived: self.survived,
            pclass: self.pclass,
            name: &self.name,
            sex: self.sex,
            age: self.age.map(f64::to_bits),
            sibsp: self.sibsp,
            parch: self.parch,
            ticket: &self.ticket,
            fare: self.fare.map(f64::to_bits),
            cabin: self.cabin.as_deref(),
            embarked: self.embarked,
        }
    }
}
