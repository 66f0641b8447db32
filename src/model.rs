//! Rental Records
//!
//! One row of the rental-delay table. `state` and `checkin_type` are open-world:
//! values outside the known set are kept verbatim and grouped on their own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome of a rental
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RentalState {
    Ended,
    Canceled,
    Ongoing,
    Other(String),
}

impl RentalState {
    pub fn as_str(&self) -> &str {
        match self {
            RentalState::Ended => "ended",
            RentalState::Canceled => "canceled",
            RentalState::Ongoing => "ongoing",
            RentalState::Other(value) => value,
        }
    }
}

impl From<&str> for RentalState {
    fn from(value: &str) -> Self {
        match value {
            "ended" => RentalState::Ended,
            "canceled" => RentalState::Canceled,
            "ongoing" => RentalState::Ongoing,
            other => RentalState::Other(other.to_string()),
        }
    }
}

impl From<String> for RentalState {
    fn from(value: String) -> Self {
        RentalState::from(value.as_str())
    }
}

impl From<RentalState> for String {
    fn from(state: RentalState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for RentalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the rental was checked in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckinType {
    /// Keyless check-in through the connected car
    Connect,
    /// In-person check-in via the mobile app
    Mobile,
    Other(String),
}

impl CheckinType {
    pub fn as_str(&self) -> &str {
        match self {
            CheckinType::Connect => "connect",
            CheckinType::Mobile => "mobile",
            CheckinType::Other(value) => value,
        }
    }
}

impl From<&str> for CheckinType {
    fn from(value: &str) -> Self {
        match value {
            "connect" => CheckinType::Connect,
            "mobile" => CheckinType::Mobile,
            other => CheckinType::Other(other.to_string()),
        }
    }
}

impl From<String> for CheckinType {
    fn from(value: String) -> Self {
        CheckinType::from(value.as_str())
    }
}

impl From<CheckinType> for String {
    fn from(checkin: CheckinType) -> Self {
        checkin.as_str().to_string()
    }
}

impl fmt::Display for CheckinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rental row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRecord {
    /// Source identifier, carried through but never analyzed
    pub rental_id: Option<i64>,

    pub car_id: Option<i64>,

    pub state: RentalState,

    pub checkin_type: CheckinType,

    /// Minutes between scheduled and actual return; positive means late.
    /// Only present for ended rentals in the source data.
    pub delay_at_checkout_in_minutes: Option<i64>,

    /// Minutes since the previous rental of the same car, if there was one
    pub time_delta_with_previous_rental_in_minutes: Option<i64>,
}

impl RentalRecord {
    pub fn new(
        state: impl Into<RentalState>,
        checkin_type: impl Into<CheckinType>,
        delay_at_checkout_in_minutes: Option<i64>,
        time_delta_with_previous_rental_in_minutes: Option<i64>,
    ) -> Self {
        Self {
            rental_id: None,
            car_id: None,
            state: state.into(),
            checkin_type: checkin_type.into(),
            delay_at_checkout_in_minutes,
            time_delta_with_previous_rental_in_minutes,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.state == RentalState::Ended
    }

    pub fn is_canceled(&self) -> bool {
        self.state == RentalState::Canceled
    }

    pub fn is_connect(&self) -> bool {
        self.checkin_type == CheckinType::Connect
    }

    /// Checkout delay counted by aggregates: only ended rentals contribute,
    /// whatever the source holds for other states.
    pub fn ended_delay(&self) -> Option<i64> {
        if self.is_ended() {
            self.delay_at_checkout_in_minutes
        } else {
            None
        }
    }

    pub fn is_late(&self) -> bool {
        self.ended_delay().map_or(false, |d| d > 0)
    }
}
