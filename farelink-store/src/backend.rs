use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::SqlitePool;

use farelink_core::booking::{Booking, CreateBookingRequest, Passenger};
use farelink_core::flight::Flight;
use farelink_core::{CoreError, CoreResult, FlightBackend, LocationType};

use crate::booking_repo::StoreBookingRepository;
use crate::flight_repo::StoreFlightRepository;

/// Local-store backend: flights, bookings and passengers live in the SQLite
/// file; the provider is never contacted.
pub struct StoreBackend {
    flights: StoreFlightRepository,
    bookings: StoreBookingRepository,
}

impl StoreBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            flights: StoreFlightRepository::new(pool.clone()),
            bookings: StoreBookingRepository::new(pool),
        }
    }
}

#[async_trait]
impl FlightBackend for StoreBackend {
    async fn search_locations(
        &self,
        keyword: &str,
        location_type: Option<LocationType>,
    ) -> CoreResult<Vec<Value>> {
        self.flights.search_locations(keyword, location_type).await
    }

    async fn direct_destinations(&self, origin: &str) -> CoreResult<Vec<Value>> {
        self.flights.direct_destinations(origin).await
    }

    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        adults: u32,
    ) -> CoreResult<Vec<Value>> {
        let flights = self
            .flights
            .search_flights(origin, destination, departure_date, adults)
            .await?;
        flights
            .into_iter()
            .map(|f| serde_json::to_value(f).map_err(CoreError::store))
            .collect()
    }

    async fn price_offer(&self, _offer: &Value) -> CoreResult<Value> {
        Err(CoreError::Unsupported(
            "Offer pricing requires the remote provider backend",
        ))
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> CoreResult<Value> {
        let flight_id = request
            .flight_id
            .as_deref()
            .ok_or_else(|| CoreError::validation("flight_id is required"))?;
        if request.passengers.is_empty() {
            return Err(CoreError::validation(
                "At least one passenger with name details is required",
            ));
        }
        let contact_email = request
            .contact_email
            .as_deref()
            .ok_or_else(|| CoreError::validation("contact_email is required"))?;
        let contact_phone = request
            .contact_phone
            .as_deref()
            .ok_or_else(|| CoreError::validation("contact_phone is required"))?;

        let booking = self
            .bookings
            .create_booking(flight_id, &request.passengers, contact_email, contact_phone)
            .await?;
        serde_json::to_value(booking).map_err(CoreError::store)
    }

    async fn get_booking(&self, booking_id: &str) -> CoreResult<Value> {
        let booking = self
            .bookings
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("Booking {}", booking_id)))?;
        serde_json::to_value(booking).map_err(CoreError::store)
    }

    async fn cancel_booking(&self, booking_id: &str) -> CoreResult<()> {
        self.bookings.cancel_booking(booking_id).await
    }

    async fn list_flights(&self) -> CoreResult<Vec<Flight>> {
        self.flights.list_flights().await
    }

    async fn list_bookings(&self) -> CoreResult<Vec<Booking>> {
        self.bookings.list_bookings().await
    }

    async fn list_passengers(&self) -> CoreResult<Vec<Passenger>> {
        self.bookings.list_passengers().await
    }
}
