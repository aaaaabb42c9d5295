use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::booking::{Booking, CreateBookingRequest, Passenger};
use crate::flight::Flight;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationType {
    Airport,
    City,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Airport => "AIRPORT",
            LocationType::City => "CITY",
        }
    }
}

impl std::str::FromStr for LocationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AIRPORT" => Ok(LocationType::Airport),
            "CITY" => Ok(LocationType::City),
            other => Err(CoreError::validation(format!(
                "Location type must be AIRPORT or CITY, got {}",
                other
            ))),
        }
    }
}

/// Backend contract shared by the local store and the remote provider.
/// Search results and booking payloads are passed through as JSON values:
/// the remote provider's offer documents are opaque beyond their identifier,
/// and the local store serializes its typed rows into the same shape.
#[async_trait]
pub trait FlightBackend: Send + Sync {
    async fn search_locations(
        &self,
        keyword: &str,
        location_type: Option<LocationType>,
    ) -> CoreResult<Vec<Value>>;

    async fn direct_destinations(&self, origin: &str) -> CoreResult<Vec<Value>>;

    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        adults: u32,
    ) -> CoreResult<Vec<Value>>;

    async fn price_offer(&self, offer: &Value) -> CoreResult<Value>;

    async fn create_booking(&self, request: &CreateBookingRequest) -> CoreResult<Value>;

    async fn get_booking(&self, booking_id: &str) -> CoreResult<Value>;

    /// Idempotent: cancelling an already-cancelled booking succeeds without
    /// touching seat counts. Unknown ids report `CoreError::NotFound`.
    async fn cancel_booking(&self, booking_id: &str) -> CoreResult<()>;

    async fn list_flights(&self) -> CoreResult<Vec<Flight>>;

    async fn list_bookings(&self) -> CoreResult<Vec<Booking>>;

    async fn list_passengers(&self) -> CoreResult<Vec<Passenger>>;
}
