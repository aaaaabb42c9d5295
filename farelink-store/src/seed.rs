use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use farelink_core::booking::PassengerInfo;
use farelink_core::flight::FareClass;
use farelink_core::{CoreError, CoreResult};

use crate::booking_repo::StoreBookingRepository;

// (origin, destination, airline, carrier code, duration hours, economy price)
const DOMESTIC_ROUTES: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("DEL", "BOM", "Air India", "AI", 2.5, 5500.0),
    ("BOM", "DEL", "Air India", "AI", 2.5, 5800.0),
    ("DEL", "BLR", "IndiGo", "6E", 3.0, 6500.0),
    ("BLR", "DEL", "IndiGo", "6E", 3.0, 6800.0),
    ("BOM", "CCU", "Vistara", "UK", 3.0, 7000.0),
    ("BLR", "HYD", "SpiceJet", "SG", 1.5, 3500.0),
    ("DEL", "MAA", "Air India", "AI", 3.0, 6000.0),
    ("CCU", "BLR", "IndiGo", "6E", 3.0, 6200.0),
];

const INTERNATIONAL_ROUTES: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("DEL", "DXB", "Emirates", "EK", 4.0, 25000.0),
    ("BOM", "SIN", "Singapore Airlines", "SQ", 6.0, 35000.0),
    ("DEL", "LHR", "British Airways", "BA", 9.0, 55000.0),
    ("BLR", "SFO", "United", "UA", 17.0, 85000.0),
    ("DEL", "JFK", "Air India", "AI", 16.0, 75000.0),
    ("BOM", "HKG", "Cathay Pacific", "CX", 6.0, 40000.0),
];

const SEED_DAYS: i64 = 30;
const SEATS_PER_FLIGHT: i64 = 180;

struct SeedFlight {
    flight_id: String,
    airline: String,
    flight_number: String,
    origin: String,
    destination: String,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    price: f64,
    flight_class: FareClass,
}

/// Wipes the store and repopulates it with a month of demo flights plus one
/// sample booking, mirroring what a fresh local deployment expects.
pub async fn seed_demo_data(pool: &SqlitePool) -> CoreResult<()> {
    info!("Seeding demo flight data...");

    let mut tx = pool.begin().await.map_err(CoreError::store)?;
    for table in ["passengers", "bookings", "flights"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await
            .map_err(CoreError::store)?;
    }

    let base_date = Utc::now().date_naive() + Duration::days(7);
    let mut first_flight_id = None;
    let mut flight_count = 0usize;

    for day in 0..SEED_DAYS {
        let date = base_date + Duration::days(day);

        for route in DOMESTIC_ROUTES {
            // Morning and evening departures on every domestic route
            for (tag, hour) in [("M", 6u32), ("E", 18u32)] {
                let flight = build_flight(route, date.and_time(at(hour)).and_utc(), day, tag);
                first_flight_id.get_or_insert_with(|| flight.flight_id.clone());
                insert_flight(&mut tx, &flight).await?;
                flight_count += 1;
            }
        }

        for route in INTERNATIONAL_ROUTES {
            let flight = build_flight(route, date.and_time(at(22)).and_utc(), day, "N");
            insert_flight(&mut tx, &flight).await?;
            flight_count += 1;
        }
    }

    tx.commit().await.map_err(CoreError::store)?;
    info!("Seeded {} flights over {} days", flight_count, SEED_DAYS);

    // One demo booking so the listing endpoints have something to show.
    if let Some(flight_id) = first_flight_id {
        let bookings = StoreBookingRepository::new(pool.clone());
        let passengers = vec![
            PassengerInfo {
                first_name: "Asha".to_string(),
                last_name: "Rao".to_string(),
                passport_number: Some("P1234567".to_string()),
            },
            PassengerInfo {
                first_name: "Ravi".to_string(),
                last_name: "Rao".to_string(),
                passport_number: None,
            },
        ];
        let booking = bookings
            .create_booking(
                &flight_id,
                &passengers,
                "asha.rao@example.com",
                "+91-9800000000",
            )
            .await?;
        info!("Seeded demo booking {}", booking.booking_id);
    }

    Ok(())
}

fn at(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).expect("valid seed departure hour")
}

fn build_flight(
    route: &(&str, &str, &str, &str, f64, f64),
    departure_time: DateTime<Utc>,
    day: i64,
    tag: &str,
) -> SeedFlight {
    let (origin, destination, airline, code, duration_hours, price) = *route;
    let flight_number = format!("{}{}{}", code, 100 + day, tag);
    let suffix = Uuid::new_v4().to_string();
    SeedFlight {
        flight_id: format!("{}-{}", flight_number, &suffix[..6]),
        airline: airline.to_string(),
        flight_number,
        origin: origin.to_string(),
        destination: destination.to_string(),
        departure_time,
        arrival_time: departure_time + Duration::minutes((duration_hours * 60.0) as i64),
        price,
        flight_class: FareClass::Economy,
    }
}

async fn insert_flight(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    flight: &SeedFlight,
) -> CoreResult<()> {
    sqlx::query(
        "INSERT INTO flights \
         (flight_id, airline, flight_number, origin_airport_code, destination_airport_code, \
          departure_time, arrival_time, available_seats, price, flight_class) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(&flight.flight_id)
    .bind(&flight.airline)
    .bind(&flight.flight_number)
    .bind(&flight.origin)
    .bind(&flight.destination)
    .bind(flight.departure_time)
    .bind(flight.arrival_time)
    .bind(SEATS_PER_FLIGHT)
    .bind(flight.price)
    .bind(flight.flight_class.as_str())
    .execute(&mut **tx)
    .await
    .map_err(CoreError::store)?;
    Ok(())
}
