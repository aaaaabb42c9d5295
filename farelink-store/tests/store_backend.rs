use std::str::FromStr;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use farelink_core::booking::{CreateBookingRequest, PassengerInfo};
use farelink_core::{CoreError, FlightBackend};
use farelink_store::database::SCHEMA;
use farelink_store::StoreBackend;

async fn memory_pool() -> SqlitePool {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    sqlx::query(SCHEMA).execute(&pool).await.unwrap();
    pool
}

async fn insert_flight(
    pool: &SqlitePool,
    flight_id: &str,
    origin: &str,
    destination: &str,
    departure: chrono::DateTime<Utc>,
    seats: i64,
    price: f64,
) {
    sqlx::query(
        "INSERT INTO flights \
         (flight_id, airline, flight_number, origin_airport_code, destination_airport_code, \
          departure_time, arrival_time, available_seats, price, flight_class) \
         VALUES (?1, 'Air India', 'AI101', ?2, ?3, ?4, ?5, ?6, ?7, 'economy')",
    )
    .bind(flight_id)
    .bind(origin)
    .bind(destination)
    .bind(departure)
    .bind(departure + Duration::hours(2))
    .bind(seats)
    .bind(price)
    .execute(pool)
    .await
    .unwrap();
}

async fn available_seats(pool: &SqlitePool, flight_id: &str) -> i64 {
    let (seats,): (i64,) =
        sqlx::query_as("SELECT available_seats FROM flights WHERE flight_id = ?1")
            .bind(flight_id)
            .fetch_one(pool)
            .await
            .unwrap();
    seats
}

fn booking_request(flight_id: &str, party: usize) -> CreateBookingRequest {
    let passengers = (0..party)
        .map(|i| PassengerInfo {
            first_name: format!("Passenger{}", i),
            last_name: "Rao".to_string(),
            passport_number: (i == 0).then(|| "P1234567".to_string()),
        })
        .collect();
    CreateBookingRequest {
        flight_id: Some(flight_id.to_string()),
        passengers,
        contact_email: Some("asha.rao@example.com".to_string()),
        contact_phone: Some("+91-9800000000".to_string()),
        ..Default::default()
    }
}

fn departure(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

#[tokio::test]
async fn test_booking_decrements_and_cancel_restores_seats() {
    let pool = memory_pool().await;
    insert_flight(&pool, "F1", "DEL", "BOM", departure(2025, 10, 1, 6, 0), 180, 5500.0).await;
    let backend = StoreBackend::new(pool.clone());

    let booking = backend.create_booking(&booking_request("F1", 3)).await.unwrap();
    assert_eq!(booking["booking_status"], "CONFIRMED");
    assert_eq!(booking["total_price"], 16500.0);
    assert_eq!(available_seats(&pool, "F1").await, 177);

    let booking_id = booking["booking_id"].as_str().unwrap();
    backend.cancel_booking(booking_id).await.unwrap();
    assert_eq!(available_seats(&pool, "F1").await, 180);

    let fetched = backend.get_booking(booking_id).await.unwrap();
    assert_eq!(fetched["booking_status"], "CANCELLED");
}

#[tokio::test]
async fn test_overbooked_party_leaves_store_untouched() {
    let pool = memory_pool().await;
    insert_flight(&pool, "F1", "DEL", "BOM", departure(2025, 10, 1, 6, 0), 2, 5500.0).await;
    let backend = StoreBackend::new(pool.clone());

    let result = backend.create_booking(&booking_request("F1", 3)).await;
    assert!(matches!(result, Err(CoreError::Validation(_))));

    // No partial writes: seats unchanged, no booking or passenger rows.
    assert_eq!(available_seats(&pool, "F1").await, 2);
    let (bookings,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
        .fetch_one(&pool)
        .await
        .unwrap();
    let (passengers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM passengers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(bookings, 0);
    assert_eq!(passengers, 0);
}

#[tokio::test]
async fn test_booking_against_unknown_flight_is_not_found() {
    let pool = memory_pool().await;
    let backend = StoreBackend::new(pool.clone());

    let result = backend.create_booking(&booking_request("NOPE", 1)).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_search_matches_calendar_day_window() {
    let pool = memory_pool().await;
    // In the window: first and last instant of the day.
    insert_flight(&pool, "DAY-EARLY", "DEL", "BOM", departure(2025, 10, 1, 0, 0), 180, 5500.0).await;
    insert_flight(&pool, "DAY-LATE", "DEL", "BOM", departure(2025, 10, 1, 23, 30), 180, 5500.0).await;
    // Out of the window: day before, day after, wrong route.
    insert_flight(&pool, "PREV-DAY", "DEL", "BOM", departure(2025, 9, 30, 23, 59), 180, 5500.0).await;
    insert_flight(&pool, "NEXT-DAY", "DEL", "BOM", departure(2025, 10, 2, 0, 0), 180, 5500.0).await;
    insert_flight(&pool, "WRONG-ROUTE", "DEL", "BLR", departure(2025, 10, 1, 6, 0), 180, 6500.0).await;
    // Matching day but not enough seats for the party.
    insert_flight(&pool, "TOO-SMALL", "DEL", "BOM", departure(2025, 10, 1, 12, 0), 1, 5500.0).await;

    let backend = StoreBackend::new(pool);
    let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
    let results = backend.search_flights("DEL", "BOM", date, 2).await.unwrap();

    let ids: Vec<&str> = results
        .iter()
        .map(|f| f["flight_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["DAY-EARLY", "DAY-LATE"]);
}

#[tokio::test]
async fn test_cancel_unknown_booking_is_not_found() {
    let pool = memory_pool().await;
    let backend = StoreBackend::new(pool);

    let result = backend.cancel_booking("does-not-exist").await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_recancel_is_noop() {
    let pool = memory_pool().await;
    insert_flight(&pool, "F1", "DEL", "BOM", departure(2025, 10, 1, 6, 0), 10, 5500.0).await;
    let backend = StoreBackend::new(pool.clone());

    let booking = backend.create_booking(&booking_request("F1", 4)).await.unwrap();
    let booking_id = booking["booking_id"].as_str().unwrap();
    assert_eq!(available_seats(&pool, "F1").await, 6);

    backend.cancel_booking(booking_id).await.unwrap();
    assert_eq!(available_seats(&pool, "F1").await, 10);

    // Second cancel succeeds but must not restore seats again.
    backend.cancel_booking(booking_id).await.unwrap();
    assert_eq!(available_seats(&pool, "F1").await, 10);
}

#[tokio::test]
async fn test_unfiltered_listings_return_all_rows() {
    let pool = memory_pool().await;
    insert_flight(&pool, "F1", "DEL", "BOM", departure(2025, 10, 1, 6, 0), 180, 5500.0).await;
    insert_flight(&pool, "F2", "BOM", "DEL", departure(2025, 10, 1, 18, 0), 180, 5800.0).await;
    let backend = StoreBackend::new(pool.clone());

    backend.create_booking(&booking_request("F1", 2)).await.unwrap();
    backend.create_booking(&booking_request("F2", 1)).await.unwrap();

    assert_eq!(backend.list_flights().await.unwrap().len(), 2);
    assert_eq!(backend.list_bookings().await.unwrap().len(), 2);
    assert_eq!(backend.list_passengers().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_locations_and_destinations_derived_from_routes() {
    let pool = memory_pool().await;
    insert_flight(&pool, "F1", "DEL", "BOM", departure(2025, 10, 1, 6, 0), 180, 5500.0).await;
    insert_flight(&pool, "F2", "DEL", "BLR", departure(2025, 10, 1, 8, 0), 180, 6500.0).await;
    let backend = StoreBackend::new(pool);

    let locations = backend.search_locations("B", None).await.unwrap();
    let codes: Vec<&str> = locations
        .iter()
        .map(|l| l["iataCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["BLR", "BOM"]);

    let destinations = backend.direct_destinations("DEL").await.unwrap();
    let codes: Vec<&str> = destinations
        .iter()
        .map(|l| l["iataCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["BLR", "BOM"]);

    // The store only knows airports, so city searches come back empty.
    let cities = backend
        .search_locations("B", Some(farelink_core::LocationType::City))
        .await
        .unwrap();
    assert!(cities.is_empty());
}

#[tokio::test]
async fn test_price_offer_unsupported_locally() {
    let pool = memory_pool().await;
    let backend = StoreBackend::new(pool);

    let result = backend.price_offer(&serde_json::json!({"id": "1"})).await;
    assert!(matches!(result, Err(CoreError::Unsupported(_))));
}
