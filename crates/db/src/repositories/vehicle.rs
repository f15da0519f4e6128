use chrono::Utc;
use sqlx::Row;

use qcars_core::domain::vehicle::{Vehicle, VehicleId};

use super::{decode_err, parse_decimal, RepositoryError, VehicleRepository};
use crate::DbPool;

pub struct SqlVehicleRepository {
    pool: DbPool,
}

impl SqlVehicleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// `price_per_day` and `is_available` columns win over the JSON document so
/// that availability can be flipped without rewriting `data`.
fn row_to_vehicle(row: &sqlx::sqlite::SqliteRow) -> Result<Vehicle, RepositoryError> {
    let data: String = row.try_get("data").map_err(decode_err)?;
    let price_raw: String = row.try_get("price_per_day").map_err(decode_err)?;
    let is_available: bool = row.try_get("is_available").map_err(decode_err)?;

    let mut vehicle: Vehicle = serde_json::from_str(&data).map_err(decode_err)?;
    vehicle.price_per_day = parse_decimal("vehicles.price_per_day", &price_raw)?;
    vehicle.is_available = is_available;
    Ok(vehicle)
}

#[async_trait::async_trait]
impl VehicleRepository for SqlVehicleRepository {
    async fn list(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT data, price_per_day, is_available FROM vehicles ORDER BY position ASC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_vehicle).collect()
    }

    async fn find_by_id(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        let row =
            sqlx::query("SELECT data, price_per_day, is_available FROM vehicles WHERE id = ?")
                .bind(&id.0)
                .fetch_optional(&self.pool)
                .await?;

        row.as_ref().map(row_to_vehicle).transpose()
    }

    async fn upsert(&self, vehicle: Vehicle) -> Result<(), RepositoryError> {
        let data = serde_json::to_string(&vehicle).map_err(decode_err)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO vehicles (id, name, brand, year, vehicle_type, price_per_day, image,
                                   is_available, position, data, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?,
                     (SELECT COALESCE(MIN(position), 1) - 1 FROM vehicles), ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 brand = excluded.brand,
                 year = excluded.year,
                 vehicle_type = excluded.vehicle_type,
                 price_per_day = excluded.price_per_day,
                 image = excluded.image,
                 is_available = excluded.is_available,
                 data = excluded.data,
                 updated_at = excluded.updated_at",
        )
        .bind(&vehicle.id.0)
        .bind(&vehicle.name)
        .bind(&vehicle.brand)
        .bind(i64::from(vehicle.year))
        .bind(vehicle.vehicle_type.as_str())
        .bind(vehicle.price_per_day.to_string())
        .bind(&vehicle.image)
        .bind(vehicle.is_available)
        .bind(&data)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_availability(
        &self,
        id: &VehicleId,
        is_available: bool,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE vehicles SET is_available = ?, updated_at = ? WHERE id = ?")
                .bind(is_available)
                .bind(Utc::now().to_rfc3339())
                .bind(&id.0)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &VehicleId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM vehicles WHERE id = ?").bind(&id.0).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
