//! Delay Report
//!
//! Runs every analysis over one table and collects the results for a
//! rendering layer (CLI printer, JSON consumer). Nothing here formats output.

use crate::aggregate::{
    aggregate_mean_delay, checkin_type_shares, fraction_late, late_by_checkin, overall_mean_delay,
    state_shares, Share,
};
use crate::categorize::{category_by_checkin, category_counts, CategoryCount, CheckinCategoryCount};
use crate::config::AnalysisConfig;
use crate::model::RentalRecord;
use crate::normalize::normalize_delays;
use crate::threshold::{
    analyze_threshold, analyze_thresholds, describe_remaining_gaps, GapSummary,
    ThresholdImpactResult,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayReport {
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,

    pub category_counts: Vec<CategoryCount>,
    pub category_by_checkin: Vec<CheckinCategoryCount>,

    pub mean_delay_by_checkin: BTreeMap<String, f64>,
    pub overall_mean_delay: Option<f64>,
    /// Overall mean rounded to the nearest minute
    pub overall_mean_delay_rounded: Option<i64>,
    /// Percentage of ended rentals returned late
    pub late_percentage: Option<u32>,
    pub late_by_checkin: BTreeMap<String, usize>,

    pub checkin_type_shares: Vec<Share>,
    pub state_shares: Vec<Share>,

    pub selected_threshold: ThresholdImpactResult,
    pub remaining_gaps: Vec<GapSummary>,
    pub threshold_sweep: Vec<ThresholdImpactResult>,
}

impl DelayReport {
    /// Build the report from raw (not yet normalized) records
    pub fn build(records: &[RentalRecord], config: &AnalysisConfig) -> Self {
        let mut records = records.to_vec();
        normalize_delays(&mut records);

        let overall = overall_mean_delay(&records);
        let report = Self {
            generated_at: Utc::now(),
            total_records: records.len(),
            category_counts: category_counts(&records),
            category_by_checkin: category_by_checkin(&records),
            mean_delay_by_checkin: aggregate_mean_delay(&records),
            overall_mean_delay: overall,
            overall_mean_delay_rounded: overall.map(|m| m.round() as i64),
            late_percentage: fraction_late(&records),
            late_by_checkin: late_by_checkin(&records),
            checkin_type_shares: checkin_type_shares(&records),
            state_shares: state_shares(&records),
            selected_threshold: analyze_threshold(&records, config.selected_threshold),
            remaining_gaps: describe_remaining_gaps(&records, config.selected_threshold),
            threshold_sweep: analyze_thresholds(&records, &config.thresholds),
        };

        info!(
            "Built delay report over {} records ({} thresholds)",
            report.total_records,
            report.threshold_sweep.len()
        );
        report
    }
}
