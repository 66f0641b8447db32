//! Rental delay analysis: checkout-delay categorization, per-checkin-type
//! aggregates, and the impact of a minimum gap between connect rentals.

pub mod aggregate;
pub mod categorize;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod report;
pub mod threshold;

pub use categorize::{categorize, DelayCategory};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use model::{CheckinType, RentalRecord, RentalState};
pub use report::DelayReport;
pub use threshold::{analyze_threshold, analyze_thresholds, ThresholdImpactResult, CANDIDATE_THRESHOLDS};
