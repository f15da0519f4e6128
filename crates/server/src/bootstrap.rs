use std::sync::Arc;
use std::time::Duration;

use qcars_agent::{build_client, RecommendationService};
use qcars_core::config::{AppConfig, ConfigError, LoadOptions};
use qcars_db::{connect_with_settings, migrations, DbPool};
use thiserror::Error;
use tracing::info;

use crate::state::AppState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("assistant client could not be built: {0}")]
    LlmClient(String),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        llm_provider = config.llm.provider.as_str(),
        "starting application bootstrap"
    );
    config.validate()?;

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let client =
        build_client(&config.llm).map_err(|error| BootstrapError::LlmClient(error.to_string()))?;
    let recommendations = Arc::new(RecommendationService::new(
        client,
        Duration::from_secs(config.llm.timeout_secs),
    ));
    info!(
        event_name = "system.bootstrap.assistant_ready",
        correlation_id = "bootstrap",
        model = config.llm.effective_model(),
        "recommendation client configured"
    );

    let state = AppState::sqlite(db_pool.clone(), recommendations, config.admin.clone());
    Ok(Application { config, db_pool, state })
}
