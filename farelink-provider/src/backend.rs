use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use farelink_core::booking::{Booking, CreateBookingRequest, Passenger};
use farelink_core::flight::Flight;
use farelink_core::{CoreError, CoreResult, FlightBackend, LocationType};

use crate::client::ProviderClient;

/// Stateless pass-through backend: no local persistence of flight inventory,
/// booking records live only in the remote system.
pub struct RemoteProviderBackend {
    client: ProviderClient,
}

impl RemoteProviderBackend {
    pub fn new(client: ProviderClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FlightBackend for RemoteProviderBackend {
    async fn search_locations(
        &self,
        keyword: &str,
        location_type: Option<LocationType>,
    ) -> CoreResult<Vec<Value>> {
        let payload = self
            .client
            .search_locations(keyword, location_type.map(|t| t.as_str()))
            .await?;
        Ok(into_list(payload))
    }

    async fn direct_destinations(&self, origin: &str) -> CoreResult<Vec<Value>> {
        let payload = self.client.direct_destinations(origin).await?;
        Ok(into_list(payload))
    }

    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        adults: u32,
    ) -> CoreResult<Vec<Value>> {
        let payload = self
            .client
            .search_flight_offers(origin, destination, departure_date, adults)
            .await?;
        Ok(into_list(payload))
    }

    async fn price_offer(&self, offer: &Value) -> CoreResult<Value> {
        self.client.price_offer(offer).await
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> CoreResult<Value> {
        let offer = request.flight_offer.as_ref().ok_or_else(|| {
            CoreError::validation("A flight offer from a prior search is required")
        })?;
        if request.travelers.is_empty() {
            return Err(CoreError::validation(
                "Traveler details are required to create an order",
            ));
        }
        self.client.create_order(offer, &request.travelers).await
    }

    async fn get_booking(&self, booking_id: &str) -> CoreResult<Value> {
        self.client.get_order(booking_id).await
    }

    async fn cancel_booking(&self, booking_id: &str) -> CoreResult<()> {
        self.client.cancel_order(booking_id).await
    }

    async fn list_flights(&self) -> CoreResult<Vec<Flight>> {
        Err(CoreError::Unsupported(
            "Flight listing requires the local store backend",
        ))
    }

    async fn list_bookings(&self) -> CoreResult<Vec<Booking>> {
        Err(CoreError::Unsupported(
            "Booking listing requires the local store backend",
        ))
    }

    async fn list_passengers(&self) -> CoreResult<Vec<Passenger>> {
        Err(CoreError::Unsupported(
            "Passenger listing requires the local store backend",
        ))
    }
}

/// Provider list payloads arrive as a JSON array under the `data` envelope;
/// anything else is a single document.
fn into_list(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}
