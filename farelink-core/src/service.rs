use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::backend::{FlightBackend, LocationType};
use crate::booking::{Booking, CreateBookingRequest, Passenger};
use crate::flight::Flight;
use crate::{CoreError, CoreResult};

pub const MIN_ADULTS: u32 = 1;
pub const MAX_ADULTS: u32 = 9;

/// Mediates between the API surfaces and the configured backend. All input
/// validation happens here, before any backend round trip.
pub struct FlightService {
    backend: Arc<dyn FlightBackend>,
}

impl FlightService {
    pub fn new(backend: Arc<dyn FlightBackend>) -> Self {
        Self { backend }
    }

    pub async fn search_locations(
        &self,
        keyword: &str,
        location_type: Option<LocationType>,
    ) -> CoreResult<Vec<Value>> {
        if keyword.trim().is_empty() {
            return Err(CoreError::validation("Search keyword must not be empty"));
        }
        self.backend.search_locations(keyword, location_type).await
    }

    pub async fn get_destinations(&self, origin: &str) -> CoreResult<Vec<Value>> {
        validate_iata(origin, "origin")?;
        self.backend.direct_destinations(origin).await
    }

    pub async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        adults: u32,
    ) -> CoreResult<Vec<Value>> {
        if !(MIN_ADULTS..=MAX_ADULTS).contains(&adults) {
            return Err(CoreError::validation(format!(
                "Number of adults must be between {} and {}",
                MIN_ADULTS, MAX_ADULTS
            )));
        }
        validate_iata(origin, "origin")?;
        validate_iata(destination, "destination")?;

        info!(
            "Searching flights from {} to {} on {} for {} adult(s)",
            origin, destination, departure_date, adults
        );
        let offers = self
            .backend
            .search_flights(origin, destination, departure_date, adults)
            .await?;
        info!(
            "Found {} flights for {} to {} on {}",
            offers.len(),
            origin,
            destination,
            departure_date
        );
        Ok(offers)
    }

    pub async fn price_offer(&self, offer: &Value) -> CoreResult<Value> {
        if !offer.is_object() {
            return Err(CoreError::validation("Flight offer must be a JSON object"));
        }
        self.backend.price_offer(offer).await
    }

    pub async fn create_booking(&self, request: &CreateBookingRequest) -> CoreResult<Value> {
        if request.party_size() == 0 {
            return Err(CoreError::validation(
                "A booking requires at least one passenger",
            ));
        }
        info!("Creating booking for {} passenger(s)", request.party_size());
        self.backend.create_booking(request).await
    }

    pub async fn get_booking(&self, booking_id: &str) -> CoreResult<Value> {
        validate_booking_id(booking_id)?;
        self.backend.get_booking(booking_id).await
    }

    pub async fn cancel_booking(&self, booking_id: &str) -> CoreResult<()> {
        validate_booking_id(booking_id)?;
        self.backend.cancel_booking(booking_id).await?;
        info!("Booking cancelled: {}", booking_id);
        Ok(())
    }

    pub async fn list_flights(&self) -> CoreResult<Vec<Flight>> {
        self.backend.list_flights().await
    }

    pub async fn list_bookings(&self) -> CoreResult<Vec<Booking>> {
        self.backend.list_bookings().await
    }

    pub async fn list_passengers(&self) -> CoreResult<Vec<Passenger>> {
        self.backend.list_passengers().await
    }
}

fn validate_iata(code: &str, field: &str) -> CoreResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::validation(format!(
            "{} must be a 3-letter IATA code, got {:?}",
            field, code
        )));
    }
    Ok(())
}

fn validate_booking_id(booking_id: &str) -> CoreResult<()> {
    if booking_id.trim().is_empty() {
        return Err(CoreError::validation("Booking id must not be empty"));
    }
    Ok(())
}
