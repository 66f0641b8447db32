//! Delay Aggregation
//!
//! Mean delays and late-return frequencies. Groups are keyed by the observed
//! checkin type or state string; an aggregate over zero eligible records is
//! `None` rather than a division by zero.

use crate::model::RentalRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running sum/count for an arithmetic mean
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Mean checkout delay per checkin type, over ended records that have a delay.
/// A checkin type appears only if at least one of its records has one.
pub fn aggregate_mean_delay(records: &[RentalRecord]) -> BTreeMap<String, f64> {
    let mut groups: BTreeMap<String, MeanAccumulator> = BTreeMap::new();
    for record in records {
        if let Some(delay) = record.ended_delay() {
            groups
                .entry(record.checkin_type.as_str().to_string())
                .or_default()
                .push(delay as f64);
        }
    }

    groups
        .into_iter()
        .filter_map(|(checkin_type, acc)| acc.mean().map(|mean| (checkin_type, mean)))
        .collect()
}

/// Mean checkout delay over ended rentals
pub fn overall_mean_delay(records: &[RentalRecord]) -> Option<f64> {
    let mut acc = MeanAccumulator::default();
    for delay in records.iter().filter_map(RentalRecord::ended_delay) {
        acc.push(delay as f64);
    }
    acc.mean()
}

/// Share of ended rentals returned late, as a whole percentage.
pub fn fraction_late(records: &[RentalRecord]) -> Option<u32> {
    let ended = records.iter().filter(|r| r.is_ended()).count();
    if ended == 0 {
        return None;
    }
    let late = records.iter().filter(|r| r.is_late()).count();
    Some((late as f64 / ended as f64 * 100.0).round() as u32)
}

/// Number of late returns per checkin type, ended rentals only
pub fn late_by_checkin(records: &[RentalRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_late()) {
        *counts
            .entry(record.checkin_type.as_str().to_string())
            .or_insert(0) += 1;
    }
    counts
}

/// Frequency of one observed value in a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub value: String,
    pub count: usize,
    pub fraction: f64,
}

fn shares<'a>(values: impl Iterator<Item = &'a str>, decimals: Option<i32>) -> Vec<Share> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total = 0usize;
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
        total += 1;
    }

    let mut out: Vec<Share> = counts
        .into_iter()
        .map(|(value, count)| {
            let fraction = count as f64 / total as f64;
            Share {
                value: value.to_string(),
                count,
                fraction: match decimals {
                    Some(d) => round_to(fraction, d),
                    None => fraction,
                },
            }
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    out
}

/// Distribution of checkin types, most frequent first
pub fn checkin_type_shares(records: &[RentalRecord]) -> Vec<Share> {
    shares(records.iter().map(|r| r.checkin_type.as_str()), None)
}

/// Distribution of rental states, most frequent first, fractions rounded to 3 decimals
pub fn state_shares(records: &[RentalRecord]) -> Vec<Share> {
    shares(records.iter().map(|r| r.state.as_str()), Some(3))
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_per_checkin_type() {
        let records = vec![
            RentalRecord::new("ended", "connect", Some(10), Some(50)),
            RentalRecord::new("ended", "mobile", Some(20), None),
            RentalRecord::new("canceled", "connect", None, Some(30)),
            RentalRecord::new("ended", "mobile", Some(-40), None),
        ];
        let means = aggregate_mean_delay(&records);

        assert_eq!(means.len(), 2);
        assert_eq!(means["connect"], 10.0);
        assert_eq!(means["mobile"], -10.0);
    }

    #[test]
    fn test_group_without_delays_is_absent() {
        let records = vec![
            RentalRecord::new("canceled", "connect", None, None),
            RentalRecord::new("ended", "mobile", Some(5), None),
        ];
        let means = aggregate_mean_delay(&records);
        assert!(!means.contains_key("connect"));
        assert_eq!(means["mobile"], 5.0);
    }

    #[test]
    fn test_no_data_markers() {
        assert!(aggregate_mean_delay(&[]).is_empty());
        assert_eq!(overall_mean_delay(&[]), None);
        assert_eq!(fraction_late(&[]), None);

        let only_canceled = vec![RentalRecord::new("canceled", "mobile", None, None)];
        assert_eq!(overall_mean_delay(&only_canceled), None);
        assert_eq!(fraction_late(&only_canceled), None);
    }

    #[test]
    fn test_fraction_late_rounds_to_whole_percent() {
        let records = vec![
            RentalRecord::new("ended", "mobile", Some(5), None),
            RentalRecord::new("ended", "mobile", Some(0), None),
            RentalRecord::new("ended", "connect", Some(-5), None),
            RentalRecord::new("canceled", "connect", None, None),
        ];
        // 1 late out of 3 ended
        assert_eq!(fraction_late(&records), Some(33));
        assert_eq!(overall_mean_delay(&records), Some(0.0));
    }

    #[test]
    fn test_shares_sorted_by_frequency() {
        let records = vec![
            RentalRecord::new("ended", "mobile", Some(5), None),
            RentalRecord::new("ended", "mobile", Some(1), None),
            RentalRecord::new("canceled", "connect", None, None),
        ];
        let checkins = checkin_type_shares(&records);
        assert_eq!(checkins[0].value, "mobile");
        assert_eq!(checkins[0].count, 2);
        assert!((checkins[0].fraction - 2.0 / 3.0).abs() < 1e-12);

        let states = state_shares(&records);
        assert_eq!(states[0].value, "ended");
        assert_eq!(states[0].fraction, 0.667);
        assert_eq!(states[1].fraction, 0.333);

        assert!(checkin_type_shares(&[]).is_empty());
    }

    #[test]
    fn test_non_ended_delays_are_excluded() {
        let mut records = vec![
            RentalRecord::new("ended", "mobile", Some(10), None),
            RentalRecord::new("ongoing", "mobile", Some(1000), None),
        ];
        crate::normalize::normalize_delays(&mut records);

        assert_eq!(aggregate_mean_delay(&records)["mobile"], 10.0);
        assert_eq!(late_by_checkin(&records)["mobile"], 1);
        assert_eq!(overall_mean_delay(&records), Some(10.0));
        assert_eq!(fraction_late(&records), Some(100));
    }

    #[test]
    fn test_late_by_checkin() {
        let records = vec![
            RentalRecord::new("ended", "mobile", Some(5), None),
            RentalRecord::new("ended", "connect", Some(0), None),
            RentalRecord::new("ended", "connect", Some(90), None),
            RentalRecord::new("ended", "mobile", Some(12), None),
        ];
        let late = late_by_checkin(&records);
        assert_eq!(late["mobile"], 2);
        assert_eq!(late["connect"], 1);
    }
}
