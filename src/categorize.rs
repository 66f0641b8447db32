//! Delay Categorization
//!
//! Buckets checkout delays into seven ordered categories. Each bucket is open on
//! the left and closed on the right, so a delay sitting exactly on an edge falls
//! into the lower bucket.

use crate::model::RentalRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DelayCategory {
    EarlyReturns,
    VeryMinor,
    Minor,
    Moderate,
    Serious,
    VerySerious,
    Extreme,
}

/// Inclusive upper edge (minutes) of every category except `Extreme`
const UPPER_EDGES: [(i64, DelayCategory); 6] = [
    (0, DelayCategory::EarlyReturns),
    (15, DelayCategory::VeryMinor),
    (60, DelayCategory::Minor),
    (180, DelayCategory::Moderate),
    (600, DelayCategory::Serious),
    (1440, DelayCategory::VerySerious),
];

impl DelayCategory {
    pub const ALL: [DelayCategory; 7] = [
        DelayCategory::EarlyReturns,
        DelayCategory::VeryMinor,
        DelayCategory::Minor,
        DelayCategory::Moderate,
        DelayCategory::Serious,
        DelayCategory::VerySerious,
        DelayCategory::Extreme,
    ];

    pub fn for_delay(minutes: i64) -> Self {
        UPPER_EDGES
            .iter()
            .find(|(edge, _)| minutes <= *edge)
            .map(|(_, category)| *category)
            .unwrap_or(DelayCategory::Extreme)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DelayCategory::EarlyReturns => "Early Returns",
            DelayCategory::VeryMinor => "Very Minor",
            DelayCategory::Minor => "Minor",
            DelayCategory::Moderate => "Moderate",
            DelayCategory::Serious => "Serious",
            DelayCategory::VerySerious => "Very Serious",
            DelayCategory::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for DelayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category of every record, in input order.
///
/// Non-ended rentals and records without a delay are unclassified and
/// yield `None`.
pub fn categorize(records: &[RentalRecord]) -> Vec<Option<DelayCategory>> {
    records
        .iter()
        .map(|r| r.ended_delay().map(DelayCategory::for_delay))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: DelayCategory,
    pub count: usize,
}

/// Number of classified records per category, in category order.
/// Empty categories are reported with a zero count.
pub fn category_counts(records: &[RentalRecord]) -> Vec<CategoryCount> {
    let mut counts = [0usize; 7];
    for category in categorize(records).into_iter().flatten() {
        counts[category as usize] += 1;
    }

    DelayCategory::ALL
        .iter()
        .zip(counts)
        .map(|(category, count)| CategoryCount {
            category: *category,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinCategoryCount {
    pub checkin_type: String,
    pub category: DelayCategory,
    pub count: usize,
}

/// Delay distribution per observed checkin type. Only non-empty groups are
/// returned, sorted by checkin type and then category.
pub fn category_by_checkin(records: &[RentalRecord]) -> Vec<CheckinCategoryCount> {
    let mut groups: BTreeMap<(String, DelayCategory), usize> = BTreeMap::new();
    for (record, category) in records.iter().zip(categorize(records)) {
        if let Some(category) = category {
            *groups
                .entry((record.checkin_type.as_str().to_string(), category))
                .or_insert(0) += 1;
        }
    }

    groups
        .into_iter()
        .map(|((checkin_type, category), count)| CheckinCategoryCount {
            checkin_type,
            category,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_fall_into_lower_category() {
        assert_eq!(DelayCategory::for_delay(-500), DelayCategory::EarlyReturns);
        assert_eq!(DelayCategory::for_delay(0), DelayCategory::EarlyReturns);
        assert_eq!(DelayCategory::for_delay(1), DelayCategory::VeryMinor);
        assert_eq!(DelayCategory::for_delay(15), DelayCategory::VeryMinor);
        assert_eq!(DelayCategory::for_delay(16), DelayCategory::Minor);
        assert_eq!(DelayCategory::for_delay(60), DelayCategory::Minor);
        assert_eq!(DelayCategory::for_delay(180), DelayCategory::Moderate);
        assert_eq!(DelayCategory::for_delay(600), DelayCategory::Serious);
        assert_eq!(DelayCategory::for_delay(1440), DelayCategory::VerySerious);
        assert_eq!(DelayCategory::for_delay(1441), DelayCategory::Extreme);
        assert_eq!(DelayCategory::for_delay(i64::MAX), DelayCategory::Extreme);
        assert_eq!(DelayCategory::for_delay(i64::MIN), DelayCategory::EarlyReturns);
    }

    #[test]
    fn test_categories_are_ordered() {
        let mut sorted = DelayCategory::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, DelayCategory::ALL.to_vec());

        // Monotone: a larger delay never lands in an earlier category
        let mut previous = DelayCategory::for_delay(-2000);
        for minutes in -2000..3000 {
            let current = DelayCategory::for_delay(minutes);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_categorize_keeps_length_and_marks_unclassified() {
        assert!(categorize(&[]).is_empty());

        let records = vec![
            RentalRecord::new("ended", "connect", Some(10), None),
            RentalRecord::new("canceled", "mobile", None, None),
        ];
        assert_eq!(
            categorize(&records),
            vec![Some(DelayCategory::VeryMinor), None]
        );
    }

    #[test]
    fn test_non_ended_delays_are_unclassified() {
        let records = vec![
            RentalRecord::new("ended", "mobile", Some(10), None),
            RentalRecord::new("ongoing", "mobile", Some(1000), None),
        ];
        assert_eq!(categorize(&records), vec![Some(DelayCategory::VeryMinor), None]);
        assert_eq!(category_counts(&records).iter().map(|c| c.count).sum::<usize>(), 1);

        let groups = category_by_checkin(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, DelayCategory::VeryMinor);
    }

    #[test]
    fn test_category_counts_include_empty_buckets() {
        let records = vec![
            RentalRecord::new("ended", "connect", Some(-3), None),
            RentalRecord::new("ended", "mobile", Some(-1), None),
            RentalRecord::new("ended", "mobile", Some(2000), None),
            RentalRecord::new("canceled", "mobile", None, None),
        ];
        let counts = category_counts(&records);

        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0].category, DelayCategory::EarlyReturns);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[6].count, 1);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_category_by_checkin_groups_observed_values() {
        let records = vec![
            RentalRecord::new("ended", "mobile", Some(30), None),
            RentalRecord::new("ended", "connect", Some(30), None),
            RentalRecord::new("ended", "mobile", Some(45), None),
            RentalRecord::new("ended", "kiosk", Some(-5), None),
        ];
        let groups = category_by_checkin(&records);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].checkin_type, "connect");
        assert_eq!(groups[1].checkin_type, "kiosk");
        assert_eq!(groups[1].category, DelayCategory::EarlyReturns);
        assert_eq!(groups[2].checkin_type, "mobile");
        assert_eq!(groups[2].category, DelayCategory::Minor);
        assert_eq!(groups[2].count, 2);
    }
}
