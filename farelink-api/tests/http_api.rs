use std::str::FromStr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower::ServiceExt;

use farelink_api::{app, AppState};
use farelink_core::FlightService;
use farelink_store::database::SCHEMA;
use farelink_store::StoreBackend;

async fn test_app() -> (Router, SqlitePool) {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    sqlx::query(SCHEMA).execute(&pool).await.unwrap();

    insert_flight(&pool, "F1", 180).await;
    insert_flight(&pool, "TINY", 1).await;

    let state = AppState {
        service: Arc::new(FlightService::new(Arc::new(StoreBackend::new(pool.clone())))),
    };
    (app(state), pool)
}

async fn insert_flight(pool: &SqlitePool, flight_id: &str, seats: i64) {
    let departure = Utc.with_ymd_and_hms(2025, 10, 1, 6, 0, 0).unwrap();
    sqlx::query(
        "INSERT INTO flights \
         (flight_id, airline, flight_number, origin_airport_code, destination_airport_code, \
          departure_time, arrival_time, available_seats, price, flight_class) \
         VALUES (?1, 'Air India', 'AI101', 'DEL', 'BOM', ?2, ?3, ?4, 5500.0, 'economy')",
    )
    .bind(flight_id)
    .bind(departure)
    .bind(departure + Duration::hours(2))
    .bind(seats)
    .execute(pool)
    .await
    .unwrap();
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn booking_body(flight_id: &str, party: usize) -> Value {
    let passengers: Vec<Value> = (0..party)
        .map(|i| json!({"first_name": format!("Passenger{}", i), "last_name": "Rao"}))
        .collect();
    json!({
        "flight_id": flight_id,
        "passengers": passengers,
        "contact_email": "asha.rao@example.com",
        "contact_phone": "+91-9800000000",
    })
}

#[tokio::test]
async fn test_search_rejects_adults_out_of_bounds() {
    let (app, _pool) = test_app().await;

    for adults in ["0", "10"] {
        let uri = format!(
            "/flights/search?origin=DEL&destination=BOM&departure_date=2025-10-01&adults={}",
            adults
        );
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_search_returns_matching_offers() {
    let (app, _pool) = test_app().await;

    let response = app
        .oneshot(get(
            "/flights/search?origin=DEL&destination=BOM&departure_date=2025-10-01&adults=2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // TINY only has one seat left, so a party of two filters it out.
    let offers = body_json(response).await;
    let ids: Vec<&str> = offers
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["flight_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["F1"]);
}

#[tokio::test]
async fn test_booking_lifecycle_over_http() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/flights/bookings", booking_body("F1", 2)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let booking = body_json(response).await;
    assert_eq!(booking["booking_status"], "CONFIRMED");
    assert_eq!(booking["total_price"], 11000.0);
    let booking_id = booking["booking_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get(&format!("/flights/bookings/{}", booking_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(delete(&format!("/flights/bookings/{}", booking_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = body_json(response).await;
    assert_eq!(receipt["status"], "cancelled");
    assert_eq!(receipt["booking_id"], booking_id.as_str());

    let response = app
        .oneshot(get(&format!("/flights/bookings/{}", booking_id)))
        .await
        .unwrap();
    let booking = body_json(response).await;
    assert_eq!(booking["booking_status"], "CANCELLED");
}

#[tokio::test]
async fn test_unknown_booking_is_404() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/flights/bookings/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(delete("/flights/bookings/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_overbooked_request_is_400() {
    let (app, _pool) = test_app().await;

    let response = app
        .oneshot(post_json("/flights/bookings", booking_body("TINY", 2)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_endpoints_return_all_rows() {
    let (app, _pool) = test_app().await;

    let response = app.clone().oneshot(get("/flights")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = app.oneshot(get("/flights/bookings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_tool_surface_lists_and_dispatches() {
    let (app, _pool) = test_app().await;

    let response = app.clone().oneshot(get("/tools")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["tools"].as_array().unwrap().len(), 7);

    // Tool failures come back as structured payloads, not HTTP errors.
    let response = app
        .clone()
        .oneshot(post_json(
            "/tools/search_flights",
            json!({"origin": "DEL", "destination": "BOM", "departure_date": "2025-10-01", "adults": 12}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "failed");

    let response = app
        .clone()
        .oneshot(post_json("/tools/get_booking", json!({"booking_id": "nope"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    assert_eq!(payload["status"], "not_found");
    assert_eq!(payload["booking_id"], "nope");

    let response = app
        .oneshot(post_json("/tools/cancel_booking", json!({"booking_id": "nope"})))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["status"], "not_found");
}

#[tokio::test]
async fn test_tool_booking_round_trip() {
    let (app, _pool) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/tools/create_booking", booking_body("F1", 1)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let booking = body_json(response).await;
    assert_eq!(booking["booking_status"], "CONFIRMED");
    let booking_id = booking["booking_id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(post_json(
            "/tools/cancel_booking",
            json!({"booking_id": booking_id}),
        ))
        .await
        .unwrap();
    let receipt = body_json(response).await;
    assert_eq!(receipt["status"], "cancelled");
    assert_eq!(receipt["booking_id"], booking_id.as_str());
}
