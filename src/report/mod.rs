//! Report module - console tables, charts and exported reports

pub mod charts;
pub mod summary;
pub mod survival_report;
pub mod tables;

pub use charts::*;
pub use summary::*;
pub use survival_report::*;
pub use tables::*;
