use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingStatus};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn generate() -> Self {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        Self(raw[..9].to_string())
    }
}

/// Site visitor account. The user exclusively owns its booking list, newest
/// first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub total_bookings: usize,
    pub active_rentals: usize,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: UserId::generate(), name: name.into(), email: email.into(), bookings: Vec::new() }
    }

    pub fn record_booking(&mut self, booking: Booking) {
        self.bookings.insert(0, booking);
    }

    pub fn stats(&self) -> ProfileStats {
        ProfileStats {
            total_bookings: self.bookings.len(),
            active_rentals: self
                .bookings
                .iter()
                .filter(|booking| booking.status == BookingStatus::Confirmed)
                .count(),
        }
    }
}
