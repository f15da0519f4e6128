use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::extra::ExtraId;
use crate::domain::user::UserId;
use crate::domain::vehicle::VehicleId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

impl BookingId {
    pub fn generate() -> Self {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("BK-{}", raw[..10].to_ascii_uppercase()))
    }
}

/// Informational only: the site never moves a booking between states, staff
/// do it after confirming over the messaging channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Active,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(Self::Confirmed),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown booking status `{other}`")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub vehicle_id: VehicleId,
    pub vehicle_name: String,
    #[serde(default)]
    pub vehicle_image: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    #[serde(default)]
    pub extras: Vec<ExtraId>,
    pub booked_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// Figures for the admin overview tab.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingOverview {
    pub total_revenue: Decimal,
    pub confirmed_bookings: usize,
    pub fleet_size: usize,
}

impl BookingOverview {
    pub fn from_bookings(bookings: &[Booking], fleet_size: usize) -> Self {
        Self {
            total_revenue: bookings
                .iter()
                .fold(Decimal::ZERO, |sum, booking| sum.saturating_add(booking.total_price)),
            confirmed_bookings: bookings
                .iter()
                .filter(|booking| booking.status == BookingStatus::Confirmed)
                .count(),
            fleet_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::{Booking, BookingId, BookingOverview, BookingStatus};
    use crate::domain::vehicle::VehicleId;

    fn booking(total: i64, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::generate(),
            vehicle_id: VehicleId("car-1".to_string()),
            vehicle_name: "Tesla Model 3".to_string(),
            vehicle_image: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 5, 1).expect("date"),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 3).expect("date"),
            total_price: Decimal::from(total),
            status,
            extras: Vec::new(),
            booked_at: Utc::now(),
            user_id: None,
            customer_name: None,
            customer_email: None,
        }
    }

    #[test]
    fn overview_sums_revenue_and_counts_confirmed() {
        let bookings = vec![
            booking(300, BookingStatus::Confirmed),
            booking(450, BookingStatus::Completed),
            booking(120, BookingStatus::Confirmed),
        ];

        let overview = BookingOverview::from_bookings(&bookings, 6);

        assert_eq!(overview.total_revenue, Decimal::from(870));
        assert_eq!(overview.confirmed_bookings, 2);
        assert_eq!(overview.fleet_size, 6);
    }

    #[test]
    fn generated_ids_carry_the_booking_prefix() {
        let id = BookingId::generate();

        assert!(id.0.starts_with("BK-"));
        assert_eq!(id.0.len(), 13);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Confirmed".parse::<BookingStatus>(), Ok(BookingStatus::Confirmed));
        assert!("cancelled".parse::<BookingStatus>().is_err());
    }
}
