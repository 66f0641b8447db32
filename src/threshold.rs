//! Threshold Impact Analysis
//!
//! Estimates what enforcing a minimum gap between consecutive rentals of a
//! connect car would cost (connect rentals that could no longer be booked) and
//! what it would fix (cancellations that happened inside the gap).
//!
//! Only records with a known gap to the previous rental take part (the set `D`).
//! For a threshold `t`, the removed region `R(t)` holds the connect records of
//! `D` whose gap is at most `t`, and the remaining set is `D \ R(t)`.

use crate::aggregate::{round_to, MeanAccumulator};
use crate::model::RentalRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum-gap thresholds (minutes) evaluated by default
pub const CANDIDATE_THRESHOLDS: [u32; 5] = [60, 120, 240, 570, 720];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdImpactResult {
    pub threshold: u32,

    /// Connect rentals that ended normally but fall inside the gap
    pub records_removed_connect_ended: usize,

    /// `records_removed_connect_ended` over the whole table, in percent with
    /// two decimals. `None` when the table is empty.
    pub percentage_of_total_affected: Option<f64>,

    /// Canceled rentals that fall inside the gap
    pub canceled_cases_resolved: usize,
}

fn has_gap(record: &RentalRecord) -> bool {
    record.time_delta_with_previous_rental_in_minutes.is_some()
}

fn in_removed_region(record: &RentalRecord, threshold: u32) -> bool {
    record.is_connect()
        && record
            .time_delta_with_previous_rental_in_minutes
            .map_or(false, |gap| gap <= i64::from(threshold))
}

/// How many records matching `predicate` disappear from `D` when the
/// threshold is enforced, i.e. `count(D, p) - count(D \ R(t), p)`.
fn removed_count<F>(records: &[RentalRecord], threshold: u32, predicate: F) -> usize
where
    F: Fn(&RentalRecord) -> bool,
{
    records
        .iter()
        .filter(|&r| has_gap(r) && in_removed_region(r, threshold) && predicate(r))
        .count()
}

pub fn analyze_threshold(records: &[RentalRecord], threshold: u32) -> ThresholdImpactResult {
    let removed = removed_count(records, threshold, |r| r.is_connect() && r.is_ended());
    let canceled = removed_count(records, threshold, RentalRecord::is_canceled);

    let percentage = if records.is_empty() {
        None
    } else {
        Some(round_to(removed as f64 / records.len() as f64 * 100.0, 2))
    };

    ThresholdImpactResult {
        threshold,
        records_removed_connect_ended: removed,
        percentage_of_total_affected: percentage,
        canceled_cases_resolved: canceled,
    }
}

/// One independent result per threshold, in the given order
pub fn analyze_thresholds(records: &[RentalRecord], thresholds: &[u32]) -> Vec<ThresholdImpactResult> {
    thresholds
        .iter()
        .map(|&threshold| analyze_threshold(records, threshold))
        .collect()
}

/// Descriptive statistics of the gap column for one (checkin type, state) group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapSummary {
    pub checkin_type: String,
    pub state: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; needs at least two values
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl GapSummary {
    fn from_values(checkin_type: String, state: String, mut values: Vec<f64>) -> Self {
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut acc = MeanAccumulator::default();
        for v in &values {
            acc.push(*v);
        }
        let mean = acc.mean();
        let std = match mean {
            Some(m) if values.len() > 1 => {
                let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
                Some((ss / (values.len() - 1) as f64).sqrt())
            }
            _ => None,
        };

        Self {
            checkin_type,
            state,
            count: values.len(),
            mean,
            std,
            min: values.first().copied(),
            p25: quantile(&values, 0.25),
            p50: quantile(&values, 0.50),
            p75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }
}

/// Linear-interpolation quantile of sorted values
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Gap statistics of the records that remain after enforcing `threshold`,
/// grouped by observed checkin type and state.
pub fn describe_remaining_gaps(records: &[RentalRecord], threshold: u32) -> Vec<GapSummary> {
    let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|&r| has_gap(r) && !in_removed_region(r, threshold))
    {
        if let Some(gap) = record.time_delta_with_previous_rental_in_minutes {
            groups
                .entry((
                    record.checkin_type.as_str().to_string(),
                    record.state.as_str().to_string(),
                ))
                .or_default()
                .push(gap as f64);
        }
    }

    groups
        .into_iter()
        .map(|((checkin_type, state), values)| GapSummary::from_values(checkin_type, state, values))
        .collect()
}
