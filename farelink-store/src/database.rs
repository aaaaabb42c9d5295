use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Relational schema for the local-store backend: flights, bookings and the
/// passengers each booking owns. Executed at startup, idempotent.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS flights (
  flight_id TEXT PRIMARY KEY,
  airline TEXT NOT NULL,
  flight_number TEXT NOT NULL,
  origin_airport_code TEXT NOT NULL,
  destination_airport_code TEXT NOT NULL,
  departure_time TEXT NOT NULL,
  arrival_time TEXT NOT NULL,
  available_seats INTEGER NOT NULL CHECK (available_seats >= 0),
  price REAL NOT NULL CHECK (price >= 0),
  flight_class TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS flights_route_idx
  ON flights(origin_airport_code, destination_airport_code);

CREATE TABLE IF NOT EXISTS bookings (
  booking_id TEXT PRIMARY KEY,
  flight_id TEXT NOT NULL REFERENCES flights(flight_id),
  booking_status TEXT NOT NULL,
  total_price REAL NOT NULL,
  booking_date TEXT NOT NULL,
  contact_email TEXT NOT NULL,
  contact_phone TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS passengers (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  booking_id TEXT NOT NULL REFERENCES bookings(booking_id) ON DELETE CASCADE,
  first_name TEXT NOT NULL,
  last_name TEXT NOT NULL,
  passport_number TEXT
);
CREATE INDEX IF NOT EXISTS passengers_booking_idx ON passengers(booking_id);
"#;

#[derive(Clone)]
pub struct DbClient {
    pub pool: SqlitePool,
}

impl DbClient {
    pub async fn new(url: &str) -> Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::from_str(url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(opts)
            .await?;

        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        info!("Ensuring database schema...");
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}
