use std::sync::Arc;

use qcars_agent::RecommendationService;
use qcars_core::config::AdminConfig;
use qcars_core::domain::vehicle::{Vehicle, VehicleId};
use qcars_core::pricing::{DeterministicPricingEngine, PricingEngine};
use qcars_db::fixtures::demo_fleet;
use qcars_db::repositories::{
    BookingRepository, DiscountRuleRepository, ExtraRepository, RepositoryError,
    SettingsRepository, SqlBookingRepository, SqlDiscountRuleRepository, SqlExtraRepository,
    SqlSettingsRepository, SqlUserRepository, SqlVehicleRepository, VehicleRepository,
};
use qcars_db::DbPool;

use crate::accounts::AccountService;

/// Everything the handlers need, passed explicitly to each router.
#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<dyn VehicleRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub extras: Arc<dyn ExtraRepository>,
    pub discount_rules: Arc<dyn DiscountRuleRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub accounts: Arc<AccountService>,
    pub pricing: Arc<dyn PricingEngine>,
    pub recommendations: Arc<RecommendationService>,
    pub admin: AdminConfig,
}

impl AppState {
    pub fn sqlite(
        pool: DbPool,
        recommendations: Arc<RecommendationService>,
        admin: AdminConfig,
    ) -> Self {
        let bookings: Arc<dyn BookingRepository> = Arc::new(SqlBookingRepository::new(pool.clone()));
        Self {
            vehicles: Arc::new(SqlVehicleRepository::new(pool.clone())),
            settings: Arc::new(SqlSettingsRepository::new(pool.clone())),
            extras: Arc::new(SqlExtraRepository::new(pool.clone())),
            discount_rules: Arc::new(SqlDiscountRuleRepository::new(pool.clone())),
            accounts: Arc::new(AccountService::new(
                Arc::new(SqlUserRepository::new(pool)),
                bookings.clone(),
            )),
            bookings,
            pricing: Arc::new(DeterministicPricingEngine),
            recommendations,
            admin,
        }
    }

    /// Stored vehicles, or the built-in demo fleet while the store is empty.
    pub async fn catalog(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let stored = self.vehicles.list().await?;
        if stored.is_empty() {
            return Ok(demo_fleet());
        }
        Ok(stored)
    }

    /// Copies the demo fleet into an empty store so admin edits start from
    /// what customers see.
    pub async fn materialize_catalog(&self) -> Result<(), RepositoryError> {
        if !self.vehicles.list().await?.is_empty() {
            return Ok(());
        }
        for vehicle in demo_fleet().into_iter().rev() {
            self.vehicles.upsert(vehicle).await?;
        }
        Ok(())
    }

    pub async fn find_vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        Ok(self.catalog().await?.into_iter().find(|vehicle| &vehicle.id == id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use qcars_agent::llm::{CompletionRequest, LlmClient};
    use qcars_agent::RecommendationService;
    use qcars_core::config::AppConfig;
    use qcars_core::domain::vehicle::VehicleId;
    use qcars_core::pricing::DeterministicPricingEngine;
    use qcars_db::fixtures::{default_extras, demo_vehicle};
    use qcars_db::repositories::{
        BookingRepository, InMemoryBookingRepository, InMemoryDiscountRuleRepository,
        InMemoryExtraRepository, InMemorySettingsRepository, InMemoryUserRepository,
        InMemoryVehicleRepository,
    };

    use super::AppState;
    use crate::accounts::AccountService;

    pub(crate) struct FixedReply(pub &'static str);

    #[async_trait]
    impl LlmClient for FixedReply {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// Process-local stores seeded with the default extras, nothing else.
    pub(crate) fn state_with_reply(reply: &'static str) -> AppState {
        let service = RecommendationService::new(Arc::new(FixedReply(reply)), Duration::from_secs(2));
        let bookings: Arc<dyn BookingRepository> = Arc::new(InMemoryBookingRepository::default());
        AppState {
            vehicles: Arc::new(InMemoryVehicleRepository::default()),
            settings: Arc::new(InMemorySettingsRepository::default()),
            extras: Arc::new(InMemoryExtraRepository::with_extras(default_extras())),
            discount_rules: Arc::new(InMemoryDiscountRuleRepository::default()),
            accounts: Arc::new(AccountService::new(
                Arc::new(InMemoryUserRepository::default()),
                bookings.clone(),
            )),
            bookings,
            pricing: Arc::new(DeterministicPricingEngine),
            recommendations: Arc::new(service),
            admin: AppConfig::default().admin,
        }
    }

    pub(crate) fn test_state() -> AppState {
        state_with_reply(r#"{"recommendedCarIds":["car-g63"],"message":"Go big."}"#)
    }

    #[tokio::test]
    async fn empty_store_serves_the_demo_fleet() {
        let state = test_state();

        let catalog = state.catalog().await.expect("catalog");

        assert!(!catalog.is_empty());
        assert!(state
            .find_vehicle(&VehicleId("car-g63".to_string()))
            .await
            .expect("lookup")
            .is_some());
    }

    #[tokio::test]
    async fn stored_vehicles_replace_the_demo_fleet() {
        let state = test_state();
        state.vehicles.upsert(demo_vehicle("car-own", "Kia", "Sportage", 70)).await.expect("upsert");

        let catalog = state.catalog().await.expect("catalog");

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id.0, "car-own");
    }
}
