use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FareClass {
    Economy,
    Business,
    First,
}

impl FareClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FareClass::Economy => "economy",
            FareClass::Business => "business",
            FareClass::First => "first",
        }
    }
}

impl std::str::FromStr for FareClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economy" => Ok(FareClass::Economy),
            "business" => Ok(FareClass::Business),
            "first" => Ok(FareClass::First),
            other => Err(CoreError::validation(format!(
                "Unknown fare class: {}",
                other
            ))),
        }
    }
}

/// A locally stored flight. `available_seats` never goes below zero: it is
/// decremented when a booking is created and restored on cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub flight_id: String,
    pub airline: String,
    pub flight_number: String,
    pub origin_airport_code: String,
    pub destination_airport_code: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub available_seats: i64,
    pub price: f64,
    pub flight_class: FareClass,
}
