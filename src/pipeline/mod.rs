//! Pipeline module - load, clean, engineer features, aggregate

pub mod aggregate;
pub mod clean;
pub mod correlation;
pub mod features;
pub mod loader;
pub mod missing;
pub mod record;
pub mod stats;
pub mod writer;

pub use aggregate::*;
pub use clean::*;
pub use correlation::*;
pub use features::*;
pub use loader::*;
pub use missing::*;
pub use record::*;
pub use writer::*;
