use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use qcars_core::domain::booking::Booking;
use qcars_core::domain::discount::{DiscountRule, DiscountRuleId};
use qcars_core::domain::extra::{BookingExtra, ExtraId};
use qcars_core::domain::settings::Settings;
use qcars_core::domain::user::{User, UserId};
use qcars_core::domain::vehicle::{Vehicle, VehicleId};

pub mod booking;
pub mod discount_rule;
pub mod extra;
pub mod memory;
pub mod settings;
pub mod user;
pub mod vehicle;

pub use booking::SqlBookingRepository;
pub use discount_rule::SqlDiscountRuleRepository;
pub use extra::SqlExtraRepository;
pub use memory::{
    InMemoryBookingRepository, InMemoryDiscountRuleRepository, InMemoryExtraRepository,
    InMemorySettingsRepository, InMemoryUserRepository, InMemoryVehicleRepository,
};
pub use settings::SqlSettingsRepository;
pub use user::SqlUserRepository;
pub use vehicle::SqlVehicleRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Vehicles in catalog order. New vehicles are listed first.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Vehicle>, RepositoryError>;
    async fn find_by_id(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError>;
    async fn upsert(&self, vehicle: Vehicle) -> Result<(), RepositoryError>;
    async fn set_availability(
        &self,
        id: &VehicleId,
        is_available: bool,
    ) -> Result<bool, RepositoryError>;
    async fn delete(&self, id: &VehicleId) -> Result<bool, RepositoryError>;
}

/// `get` always yields complete settings: stored values merged over defaults.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<Settings, RepositoryError>;
    async fn put(&self, settings: &Settings) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ExtraRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<BookingExtra>, RepositoryError>;
    async fn add(&self, extra: BookingExtra) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &ExtraId) -> Result<bool, RepositoryError>;
}

/// Rules are listed ascending by `min_days`.
#[async_trait]
pub trait DiscountRuleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<DiscountRule>, RepositoryError>;
    async fn add(&self, rule: DiscountRule) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &DiscountRuleId) -> Result<bool, RepositoryError>;
}

/// Users are returned without bookings; those live in [`BookingRepository`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns `false` when the email is already registered.
    async fn create(&self, user: User) -> Result<bool, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
}

/// Bookings newest first.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Booking>, RepositoryError>;
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, RepositoryError>;
    async fn save(&self, booking: Booking) -> Result<(), RepositoryError>;
}

pub(crate) fn decode_err(error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}

pub(crate) fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(raw)
        .map_err(|error| RepositoryError::Decode(format!("invalid decimal in `{field}`: {error}")))
}
