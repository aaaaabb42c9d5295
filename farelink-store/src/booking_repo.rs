use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use farelink_core::booking::{Booking, BookingStatus, Passenger, PassengerInfo};
use farelink_core::{CoreError, CoreResult};

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    booking_id: String,
    flight_id: String,
    booking_status: String,
    total_price: f64,
    booking_date: DateTime<Utc>,
    contact_email: String,
    contact_phone: String,
}

#[derive(sqlx::FromRow)]
struct PassengerRow {
    id: i64,
    booking_id: String,
    first_name: String,
    last_name: String,
    passport_number: Option<String>,
}

impl BookingRow {
    fn into_booking(self, passengers: Vec<PassengerInfo>) -> CoreResult<Booking> {
        let booking_status = match self.booking_status.as_str() {
            "CONFIRMED" => BookingStatus::CONFIRMED,
            "CANCELLED" => BookingStatus::CANCELLED,
            other => {
                return Err(CoreError::store(format!(
                    "Unknown booking status in store: {}",
                    other
                )))
            }
        };
        Ok(Booking {
            booking_id: self.booking_id,
            flight_id: self.flight_id,
            booking_status,
            passengers,
            total_price: self.total_price,
            booking_date: self.booking_date,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
        })
    }
}

pub struct StoreBookingRepository {
    pool: SqlitePool,
}

impl StoreBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the booking, its passengers, and the seat decrement in one
    /// transaction. Total price is the flight price at booking time times the
    /// party size. Fails without writing anything when the flight is missing
    /// or the party exceeds the remaining seats.
    pub async fn create_booking(
        &self,
        flight_id: &str,
        passengers: &[PassengerInfo],
        contact_email: &str,
        contact_phone: &str,
    ) -> CoreResult<Booking> {
        let party = passengers.len() as i64;
        let mut tx = self.pool.begin().await.map_err(CoreError::store)?;

        let price: Option<(f64,)> = sqlx::query_as("SELECT price FROM flights WHERE flight_id = ?1")
            .bind(flight_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(CoreError::store)?;
        let (price,) = price.ok_or_else(|| CoreError::not_found(format!("Flight {}", flight_id)))?;

        // Guarded decrement: zero rows touched means the seats just ran out.
        let updated = sqlx::query(
            "UPDATE flights SET available_seats = available_seats - ?1 \
             WHERE flight_id = ?2 AND available_seats >= ?1",
        )
        .bind(party)
        .bind(flight_id)
        .execute(&mut *tx)
        .await
        .map_err(CoreError::store)?;
        if updated.rows_affected() == 0 {
            return Err(CoreError::validation(format!(
                "Not enough seats on flight {} for {} passenger(s)",
                flight_id, party
            )));
        }

        let booking_id = Uuid::new_v4().to_string();
        let booking_date = Utc::now();
        let total_price = price * party as f64;

        sqlx::query(
            "INSERT INTO bookings \
             (booking_id, flight_id, booking_status, total_price, booking_date, contact_email, contact_phone) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&booking_id)
        .bind(flight_id)
        .bind(BookingStatus::CONFIRMED.as_str())
        .bind(total_price)
        .bind(booking_date)
        .bind(contact_email)
        .bind(contact_phone)
        .execute(&mut *tx)
        .await
        .map_err(CoreError::store)?;

        for p in passengers {
            sqlx::query(
                "INSERT INTO passengers (booking_id, first_name, last_name, passport_number) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&booking_id)
            .bind(&p.first_name)
            .bind(&p.last_name)
            .bind(&p.passport_number)
            .execute(&mut *tx)
            .await
            .map_err(CoreError::store)?;
        }

        tx.commit().await.map_err(CoreError::store)?;

        Ok(Booking {
            booking_id,
            flight_id: flight_id.to_string(),
            booking_status: BookingStatus::CONFIRMED,
            passengers: passengers.to_vec(),
            total_price,
            booking_date,
            contact_email: contact_email.to_string(),
            contact_phone: contact_phone.to_string(),
        })
    }

    pub async fn get_booking(&self, booking_id: &str) -> CoreResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(
            "SELECT booking_id, flight_id, booking_status, total_price, booking_date, \
                    contact_email, contact_phone \
             FROM bookings WHERE booking_id = ?1",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CoreError::store)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let passengers = self.passengers_for(booking_id).await?;
        Ok(Some(row.into_booking(passengers)?))
    }

    /// Flips the status and restores seats in one transaction. Only the
    /// CONFIRMED -> CANCELLED edge touches the seat count, so re-cancelling an
    /// already-cancelled booking is a harmless no-op.
    pub async fn cancel_booking(&self, booking_id: &str) -> CoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(CoreError::store)?;

        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT booking_status, flight_id FROM bookings WHERE booking_id = ?1",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(CoreError::store)?;

        let (status, flight_id) =
            row.ok_or_else(|| CoreError::not_found(format!("Booking {}", booking_id)))?;
        if status == BookingStatus::CANCELLED.as_str() {
            return Ok(());
        }

        let (party,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM passengers WHERE booking_id = ?1")
                .bind(booking_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(CoreError::store)?;

        sqlx::query("UPDATE bookings SET booking_status = ?1 WHERE booking_id = ?2")
            .bind(BookingStatus::CANCELLED.as_str())
            .bind(booking_id)
            .execute(&mut *tx)
            .await
            .map_err(CoreError::store)?;

        sqlx::query("UPDATE flights SET available_seats = available_seats + ?1 WHERE flight_id = ?2")
            .bind(party)
            .bind(&flight_id)
            .execute(&mut *tx)
            .await
            .map_err(CoreError::store)?;

        tx.commit().await.map_err(CoreError::store)?;
        Ok(())
    }

    pub async fn list_bookings(&self) -> CoreResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            "SELECT booking_id, flight_id, booking_status, total_price, booking_date, \
                    contact_email, contact_phone \
             FROM bookings ORDER BY booking_date",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::store)?;

        let mut bookings = Vec::with_capacity(rows.len());
        for row in rows {
            let passengers = self.passengers_for(&row.booking_id).await?;
            bookings.push(row.into_booking(passengers)?);
        }
        Ok(bookings)
    }

    pub async fn list_passengers(&self) -> CoreResult<Vec<Passenger>> {
        let rows: Vec<PassengerRow> = sqlx::query_as(
            "SELECT id, booking_id, first_name, last_name, passport_number \
             FROM passengers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::store)?;

        Ok(rows
            .into_iter()
            .map(|row| Passenger {
                id: row.id,
                booking_id: row.booking_id,
                first_name: row.first_name,
                last_name: row.last_name,
                passport_number: row.passport_number,
            })
            .collect())
    }

    async fn passengers_for(&self, booking_id: &str) -> CoreResult<Vec<PassengerInfo>> {
        let rows: Vec<PassengerRow> = sqlx::query_as(
            "SELECT id, booking_id, first_name, last_name, passport_number \
             FROM passengers WHERE booking_id = ?1 ORDER BY id",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
        .map_err(CoreError::store)?;

        Ok(rows
            .into_iter()
            .map(|row| PassengerInfo {
                first_name: row.first_name,
                last_name: row.last_name,
                passport_number: row.passport_number,
            })
            .collect())
    }
}
