use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use farelink_core::booking::{Booking, CreateBookingRequest, Passenger};
use farelink_core::flight::Flight;
use farelink_core::LocationType;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationSearchParams {
    pub keyword: String,
    #[serde(rename = "type")]
    pub location_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DestinationsParams {
    pub origin: String,
}

#[derive(Debug, Deserialize)]
pub struct FlightSearchParams {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(default = "default_adults")]
    pub adults: u32,
}

fn default_adults() -> u32 {
    1
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights))
        .route("/flights/locations/search", get(search_locations))
        .route("/flights/destinations", get(get_destinations))
        .route("/flights/search", get(search_flights))
        .route("/flights/offer-price", post(price_offer))
        .route("/flights/bookings", post(create_booking).get(list_bookings))
        .route(
            "/flights/bookings/{id}",
            get(get_booking).delete(cancel_booking),
        )
        .route("/flights/passengers", get(list_passengers))
}

async fn search_locations(
    State(state): State<AppState>,
    Query(params): Query<LocationSearchParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let location_type = params
        .location_type
        .as_deref()
        .map(str::parse::<LocationType>)
        .transpose()?;
    let locations = state
        .service
        .search_locations(&params.keyword, location_type)
        .await?;
    Ok(Json(locations))
}

async fn get_destinations(
    State(state): State<AppState>,
    Query(params): Query<DestinationsParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let destinations = state.service.get_destinations(&params.origin).await?;
    Ok(Json(destinations))
}

async fn search_flights(
    State(state): State<AppState>,
    Query(params): Query<FlightSearchParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let offers = state
        .service
        .search_flights(
            &params.origin,
            &params.destination,
            params.departure_date,
            params.adults,
        )
        .await?;
    Ok(Json(offers))
}

async fn price_offer(
    State(state): State<AppState>,
    Json(offer): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let priced = state.service.price_offer(&offer).await?;
    Ok(Json(priced))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let booking = state.service.create_booking(&request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let booking = state.service.get_booking(&booking_id).await?;
    Ok(Json(booking))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.service.cancel_booking(&booking_id).await?;
    Ok(Json(json!({
        "status": "cancelled",
        "booking_id": booking_id,
    })))
}

async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<Flight>>, ApiError> {
    Ok(Json(state.service.list_flights().await?))
}

async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.service.list_bookings().await?))
}

async fn list_passengers(State(state): State<AppState>) -> Result<Json<Vec<Passenger>>, ApiError> {
    Ok(Json(state.service.list_passengers().await?))
}
