use chrono::Utc;
use sqlx::Row;

use qcars_core::domain::settings::{merge, Settings, SettingsPatch};

use super::{decode_err, RepositoryError, SettingsRepository};
use crate::DbPool;

const SETTINGS_ROW_ID: i64 = 1;

pub struct SqlSettingsRepository {
    pool: DbPool,
}

impl SqlSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SettingsRepository for SqlSettingsRepository {
    async fn get(&self) -> Result<Settings, RepositoryError> {
        let row = sqlx::query("SELECT company_name, config FROM settings WHERE id = ?")
            .bind(SETTINGS_ROW_ID)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(Settings::default());
        };

        let company_name: String = row.try_get("company_name").map_err(decode_err)?;
        let config: String = row.try_get("config").map_err(decode_err)?;
        let mut stored: SettingsPatch = serde_json::from_str(&config).map_err(decode_err)?;
        stored.company_name = Some(company_name);

        Ok(merge(stored, Settings::default()))
    }

    async fn put(&self, settings: &Settings) -> Result<(), RepositoryError> {
        let mut config = SettingsPatch::from(settings);
        config.company_name = None;
        let config = serde_json::to_string(&config).map_err(decode_err)?;

        sqlx::query(
            "INSERT INTO settings (id, company_name, config, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 company_name = excluded.company_name,
                 config = excluded.config,
                 updated_at = excluded.updated_at",
        )
        .bind(SETTINGS_ROW_ID)
        .bind(&settings.company_name)
        .bind(&config)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
