use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    CONFIRMED,
    CANCELLED,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::CONFIRMED => "CONFIRMED",
            BookingStatus::CANCELLED => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerInfo {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
}

/// Passenger row as stored, for the unfiltered listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: i64,
    pub booking_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub flight_id: String,
    pub booking_status: BookingStatus,
    pub passengers: Vec<PassengerInfo>,
    pub total_price: f64,
    pub booking_date: DateTime<Utc>,
    pub contact_email: String,
    pub contact_phone: String,
}

/// One request shape for both backends. The local store books against
/// `flight_id` + `passengers` + contact info; the remote provider forwards
/// `flight_offer` + `travelers` untouched. Each backend validates the subset
/// it needs and rejects the rest as malformed input.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateBookingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_offer: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passengers: Vec<PassengerInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub travelers: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl CreateBookingRequest {
    /// Number of seats the request asks for, regardless of backend shape.
    pub fn party_size(&self) -> usize {
        if !self.passengers.is_empty() {
            self.passengers.len()
        } else {
            self.travelers.len()
        }
    }
}
