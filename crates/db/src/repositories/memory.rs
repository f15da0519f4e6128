use std::collections::HashMap;

use tokio::sync::RwLock;

use qcars_core::domain::booking::Booking;
use qcars_core::domain::discount::{sort_rules, DiscountRule, DiscountRuleId};
use qcars_core::domain::extra::{BookingExtra, ExtraId};
use qcars_core::domain::settings::{merge, Settings, SettingsPatch};
use qcars_core::domain::user::{User, UserId};
use qcars_core::domain::vehicle::{Vehicle, VehicleId};

use super::{
    BookingRepository, DiscountRuleRepository, ExtraRepository, RepositoryError,
    SettingsRepository, UserRepository, VehicleRepository,
};

/// Ordered fleet; new vehicles go to the front.
#[derive(Default)]
pub struct InMemoryVehicleRepository {
    vehicles: RwLock<Vec<Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub fn with_vehicles(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles: RwLock::new(vehicles) }
    }
}

#[async_trait::async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn list(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        Ok(self.vehicles.read().await.clone())
    }

    async fn find_by_id(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.iter().find(|vehicle| &vehicle.id == id).cloned())
    }

    async fn upsert(&self, vehicle: Vehicle) -> Result<(), RepositoryError> {
        let mut vehicles = self.vehicles.write().await;
        match vehicles.iter_mut().find(|existing| existing.id == vehicle.id) {
            Some(existing) => *existing = vehicle,
            None => vehicles.insert(0, vehicle),
        }
        Ok(())
    }

    async fn set_availability(
        &self,
        id: &VehicleId,
        is_available: bool,
    ) -> Result<bool, RepositoryError> {
        let mut vehicles = self.vehicles.write().await;
        let Some(vehicle) = vehicles.iter_mut().find(|vehicle| &vehicle.id == id) else {
            return Ok(false);
        };
        vehicle.is_available = is_available;
        Ok(true)
    }

    async fn delete(&self, id: &VehicleId) -> Result<bool, RepositoryError> {
        let mut vehicles = self.vehicles.write().await;
        let before = vehicles.len();
        vehicles.retain(|vehicle| &vehicle.id != id);
        Ok(vehicles.len() != before)
    }
}

/// Holds the stored patch, so `get` behaves like the SQL store.
#[derive(Default)]
pub struct InMemorySettingsRepository {
    stored: RwLock<Option<SettingsPatch>>,
}

#[async_trait::async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get(&self) -> Result<Settings, RepositoryError> {
        let stored = self.stored.read().await.clone().unwrap_or_default();
        Ok(merge(stored, Settings::default()))
    }

    async fn put(&self, settings: &Settings) -> Result<(), RepositoryError> {
        *self.stored.write().await = Some(SettingsPatch::from(settings));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryExtraRepository {
    extras: RwLock<Vec<BookingExtra>>,
}

impl InMemoryExtraRepository {
    pub fn with_extras(extras: Vec<BookingExtra>) -> Self {
        Self { extras: RwLock::new(extras) }
    }
}

#[async_trait::async_trait]
impl ExtraRepository for InMemoryExtraRepository {
    async fn list(&self) -> Result<Vec<BookingExtra>, RepositoryError> {
        Ok(self.extras.read().await.clone())
    }

    async fn add(&self, extra: BookingExtra) -> Result<(), RepositoryError> {
        let mut extras = self.extras.write().await;
        match extras.iter_mut().find(|existing| existing.id == extra.id) {
            Some(existing) => *existing = extra,
            None => extras.push(extra),
        }
        Ok(())
    }

    async fn delete(&self, id: &ExtraId) -> Result<bool, RepositoryError> {
        let mut extras = self.extras.write().await;
        let before = extras.len();
        extras.retain(|extra| &extra.id != id);
        Ok(extras.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryDiscountRuleRepository {
    rules: RwLock<Vec<DiscountRule>>,
}

#[async_trait::async_trait]
impl DiscountRuleRepository for InMemoryDiscountRuleRepository {
    async fn list(&self) -> Result<Vec<DiscountRule>, RepositoryError> {
        Ok(self.rules.read().await.clone())
    }

    async fn add(&self, rule: DiscountRule) -> Result<(), RepositoryError> {
        let mut rules = self.rules.write().await;
        rules.retain(|existing| existing.id != rule.id);
        rules.push(rule);
        sort_rules(&mut rules);
        Ok(())
    }

    async fn delete(&self, id: &DiscountRuleId) -> Result<bool, RepositoryError> {
        let mut rules = self.rules.write().await;
        let before = rules.len();
        rules.retain(|rule| &rule.id != id);
        Ok(rules.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, mut user: User) -> Result<bool, RepositoryError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Ok(false);
        }
        user.bookings.clear();
        users.insert(user.id.0.clone(), user);
        Ok(true)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.get(&id.0).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

#[async_trait::async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        let mut bookings = self.bookings.read().await.clone();
        bookings.sort_by(|left, right| right.booked_at.cmp(&left.booked_at));
        Ok(bookings)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, RepositoryError> {
        let mut bookings = self.list().await?;
        bookings.retain(|booking| booking.user_id.as_ref() == Some(user_id));
        Ok(bookings)
    }

    async fn save(&self, booking: Booking) -> Result<(), RepositoryError> {
        let mut bookings = self.bookings.write().await;
        match bookings.iter_mut().find(|existing| existing.id == booking.id) {
            Some(existing) => *existing = booking,
            None => bookings.push(booking),
        }
        Ok(())
    }
}
