use sqlx::Row;

use qcars_core::domain::extra::{BookingExtra, ExtraId};

use super::{decode_err, parse_decimal, ExtraRepository, RepositoryError};
use crate::DbPool;

pub struct SqlExtraRepository {
    pool: DbPool,
}

impl SqlExtraRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_extra(row: &sqlx::sqlite::SqliteRow) -> Result<BookingExtra, RepositoryError> {
    let price: String = row.try_get("price").map_err(decode_err)?;
    Ok(BookingExtra {
        id: ExtraId(row.try_get("id").map_err(decode_err)?),
        name: row.try_get("name").map_err(decode_err)?,
        name_ar: row.try_get("name_ar").map_err(decode_err)?,
        price: parse_decimal("booking_extras.price", &price)?,
        description: row.try_get("description").map_err(decode_err)?,
        description_ar: row.try_get("description_ar").map_err(decode_err)?,
    })
}

#[async_trait::async_trait]
impl ExtraRepository for SqlExtraRepository {
    async fn list(&self) -> Result<Vec<BookingExtra>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, name_ar, price, description, description_ar
             FROM booking_extras ORDER BY position ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_extra).collect()
    }

    /// Appends to the end of the list, or replaces an extra with the same id.
    async fn add(&self, extra: BookingExtra) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO booking_extras (id, name, name_ar, price, description, description_ar, position)
             VALUES (?, ?, ?, ?, ?, ?, (SELECT COALESCE(MAX(position), 0) + 1 FROM booking_extras))
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 name_ar = excluded.name_ar,
                 price = excluded.price,
                 description = excluded.description,
                 description_ar = excluded.description_ar",
        )
        .bind(&extra.id.0)
        .bind(&extra.name)
        .bind(&extra.name_ar)
        .bind(extra.price.to_string())
        .bind(&extra.description)
        .bind(&extra.description_ar)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &ExtraId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM booking_extras WHERE id = ?")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
