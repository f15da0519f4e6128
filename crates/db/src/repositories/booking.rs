use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;

use qcars_core::domain::booking::{Booking, BookingId, BookingStatus};
use qcars_core::domain::extra::ExtraId;
use qcars_core::domain::user::UserId;
use qcars_core::domain::vehicle::VehicleId;

use super::{decode_err, parse_decimal, BookingRepository, RepositoryError};
use crate::DbPool;

const BOOKING_COLUMNS: &str = "id, user_id, vehicle_id, vehicle_name, vehicle_image, start_date,
     end_date, total_price, status, extras, customer_name, customer_email, booked_at";

pub struct SqlBookingRepository {
    pool: DbPool,
}

impl SqlBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|error| RepositoryError::Decode(format!("invalid date in `{field}`: {error}")))
}

fn row_to_booking(row: &sqlx::sqlite::SqliteRow) -> Result<Booking, RepositoryError> {
    let start_date: String = row.try_get("start_date").map_err(decode_err)?;
    let end_date: String = row.try_get("end_date").map_err(decode_err)?;
    let total_price: String = row.try_get("total_price").map_err(decode_err)?;
    let status: String = row.try_get("status").map_err(decode_err)?;
    let extras: String = row.try_get("extras").map_err(decode_err)?;
    let booked_at: String = row.try_get("booked_at").map_err(decode_err)?;
    let user_id: Option<String> = row.try_get("user_id").map_err(decode_err)?;

    let extras: Vec<String> = serde_json::from_str(&extras).map_err(decode_err)?;
    let booked_at = DateTime::parse_from_rfc3339(&booked_at)
        .map(|value| value.with_timezone(&Utc))
        .map_err(decode_err)?;

    Ok(Booking {
        id: BookingId(row.try_get("id").map_err(decode_err)?),
        vehicle_id: VehicleId(row.try_get("vehicle_id").map_err(decode_err)?),
        vehicle_name: row.try_get("vehicle_name").map_err(decode_err)?,
        vehicle_image: row.try_get("vehicle_image").map_err(decode_err)?,
        start_date: parse_date("bookings.start_date", &start_date)?,
        end_date: parse_date("bookings.end_date", &end_date)?,
        total_price: parse_decimal("bookings.total_price", &total_price)?,
        status: status.parse::<BookingStatus>().map_err(RepositoryError::Decode)?,
        extras: extras.into_iter().map(ExtraId).collect(),
        booked_at,
        user_id: user_id.map(UserId),
        customer_name: row.try_get("customer_name").map_err(decode_err)?,
        customer_email: row.try_get("customer_email").map_err(decode_err)?,
    })
}

#[async_trait::async_trait]
impl BookingRepository for SqlBookingRepository {
    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY booked_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_booking).collect()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?
             ORDER BY booked_at DESC, id DESC"
        ))
        .bind(&user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_booking).collect()
    }

    async fn save(&self, booking: Booking) -> Result<(), RepositoryError> {
        let extras: Vec<&str> = booking.extras.iter().map(|id| id.0.as_str()).collect();
        let extras = serde_json::to_string(&extras).map_err(decode_err)?;

        sqlx::query(
            "INSERT INTO bookings (id, user_id, vehicle_id, vehicle_name, vehicle_image, start_date,
                                   end_date, total_price, status, extras, customer_name,
                                   customer_email, booked_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 status = excluded.status,
                 total_price = excluded.total_price,
                 start_date = excluded.start_date,
                 end_date = excluded.end_date,
                 extras = excluded.extras",
        )
        .bind(&booking.id.0)
        .bind(booking.user_id.as_ref().map(|id| id.0.as_str()))
        .bind(&booking.vehicle_id.0)
        .bind(&booking.vehicle_name)
        .bind(&booking.vehicle_image)
        .bind(booking.start_date.format("%Y-%m-%d").to_string())
        .bind(booking.end_date.format("%Y-%m-%d").to_string())
        .bind(booking.total_price.to_string())
        .bind(booking.status.as_str())
        .bind(&extras)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(booking.booked_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
