use crate::model::RentalRecord;
use tracing::debug;

/// Fill a missing checkout delay with 0 for ended rentals.
///
/// Other states are returned unchanged, so their missing delays stay
/// excluded from every aggregate.
pub fn normalize_delay(record: &RentalRecord) -> RentalRecord {
    let mut normalized = record.clone();
    if normalized.is_ended() && normalized.delay_at_checkout_in_minutes.is_none() {
        normalized.delay_at_checkout_in_minutes = Some(0);
    }
    normalized
}

/// Normalize in place, returning how many delays were filled.
pub fn normalize_delays(records: &mut [RentalRecord]) -> usize {
    let mut filled = 0;
    for record in records.iter_mut() {
        if record.is_ended() && record.delay_at_checkout_in_minutes.is_none() {
            record.delay_at_checkout_in_minutes = Some(0);
            filled += 1;
        }
    }
    debug!("Filled {} missing checkout delays on ended rentals", filled);
    filled
}
