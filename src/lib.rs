//! Lifeboat: Passenger Survival Analysis Library
//!
//! Loads a passenger manifest, cleans it, engineers features and aggregates
//! survival rates across passenger groups, then renders tables, charts and
//! a JSON report.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
