use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use farelink_core::flight::Flight;
use farelink_core::{CoreError, CoreResult, LocationType};

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
pub(crate) struct FlightRow {
    pub flight_id: String,
    pub airline: String,
    pub flight_number: String,
    pub origin_airport_code: String,
    pub destination_airport_code: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub available_seats: i64,
    pub price: f64,
    pub flight_class: String,
}

impl FlightRow {
    pub(crate) fn into_flight(self) -> CoreResult<Flight> {
        Ok(Flight {
            flight_class: self.flight_class.parse()?,
            flight_id: self.flight_id,
            airline: self.airline,
            flight_number: self.flight_number,
            origin_airport_code: self.origin_airport_code,
            destination_airport_code: self.destination_airport_code,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            available_seats: self.available_seats,
            price: self.price,
        })
    }
}

const FLIGHT_COLUMNS: &str = "flight_id, airline, flight_number, origin_airport_code, \
     destination_airport_code, departure_time, arrival_time, available_seats, price, flight_class";

pub struct StoreFlightRepository {
    pool: SqlitePool,
}

impl StoreFlightRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Flights matching the route on the given calendar day with enough seats
    /// for the whole party. Day matching is `[date 00:00, date+1 00:00)`.
    pub async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        min_seats: u32,
    ) -> CoreResult<Vec<Flight>> {
        let rows: Vec<FlightRow> = sqlx::query_as(&format!(
            "SELECT {} FROM flights \
             WHERE origin_airport_code = ?1 \
               AND destination_airport_code = ?2 \
               AND date(departure_time) = ?3 \
               AND available_seats >= ?4 \
             ORDER BY departure_time",
            FLIGHT_COLUMNS
        ))
        .bind(origin)
        .bind(destination)
        .bind(departure_date.format("%Y-%m-%d").to_string())
        .bind(min_seats as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::store)?;

        rows.into_iter().map(FlightRow::into_flight).collect()
    }

    pub async fn get_flight(&self, flight_id: &str) -> CoreResult<Option<Flight>> {
        let row: Option<FlightRow> = sqlx::query_as(&format!(
            "SELECT {} FROM flights WHERE flight_id = ?1",
            FLIGHT_COLUMNS
        ))
        .bind(flight_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::store)?;

        row.map(FlightRow::into_flight).transpose()
    }

    pub async fn list_flights(&self) -> CoreResult<Vec<Flight>> {
        let rows: Vec<FlightRow> = sqlx::query_as(&format!(
            "SELECT {} FROM flights ORDER BY departure_time",
            FLIGHT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::store)?;

        rows.into_iter().map(FlightRow::into_flight).collect()
    }

    /// The local store only knows airport codes, so a CITY-typed search has
    /// nothing to answer from; AIRPORT (or untyped) searches match against the
    /// codes appearing on either end of a stored route.
    pub async fn search_locations(
        &self,
        keyword: &str,
        location_type: Option<LocationType>,
    ) -> CoreResult<Vec<Value>> {
        if location_type == Some(LocationType::City) {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", keyword.to_uppercase());
        let codes: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT code FROM ( \
               SELECT origin_airport_code AS code FROM flights \
               UNION \
               SELECT destination_airport_code AS code FROM flights \
             ) WHERE code LIKE ?1 ORDER BY code",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::store)?;

        Ok(codes
            .into_iter()
            .map(|(code,)| json!({ "iataCode": code, "subType": "AIRPORT" }))
            .collect())
    }

    pub async fn direct_destinations(&self, origin: &str) -> CoreResult<Vec<Value>> {
        let codes: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT destination_airport_code FROM flights \
             WHERE origin_airport_code = ?1 \
             ORDER BY destination_airport_code",
        )
        .bind(origin)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::store)?;

        Ok(codes
            .into_iter()
            .map(|(code,)| json!({ "iataCode": code, "subType": "AIRPORT" }))
            .collect())
    }
}
