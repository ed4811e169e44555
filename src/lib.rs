//! escala - Shift headcount records and staffing recommendations
//!
//! This library records how many people were in a store during each shift of
//! each day, derives a recommended staff count per weekday and shift from the
//! historical averages, and summarizes the last completed week, with CSV,
//! SVG and HTML artifacts for external readers.

pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod html_report;
pub mod observation;
pub mod output;
pub mod planner;
pub mod report;
pub mod staffing;
pub mod store;

pub use error::{Outcome, PersistenceWarning, SaveError};
pub use observation::{Observation, Shift, Weekday};
pub use store::RecordStore;
