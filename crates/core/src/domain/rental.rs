use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::locale::Locale;

/// Number of rental days, between one day and [`RentalDuration::MAX_DAYS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct RentalDuration(u32);

impl RentalDuration {
    pub const WEEK: u32 = 7;
    pub const MONTH: u32 = 30;
    pub const MAX_DAYS: u32 = 365 * 12;

    pub fn new(days: u32) -> Result<Self, DomainError> {
        Self::try_from(i64::from(days))
    }

    /// For free-form slider or typed input: out-of-range values snap to the
    /// nearest bound.
    pub fn clamped(days: i64) -> Self {
        Self(days.clamp(1, i64::from(Self::MAX_DAYS)) as u32)
    }

    pub fn days(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for RentalDuration {
    type Error = DomainError;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        if days < 1 || days > i64::from(Self::MAX_DAYS) {
            return Err(DomainError::InvalidDuration { days, max: Self::MAX_DAYS });
        }
        Ok(Self(days as u32))
    }
}

impl From<RentalDuration> for u32 {
    fn from(duration: RentalDuration) -> Self {
        duration.0
    }
}

impl std::fmt::Display for RentalDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} days", self.0)
    }
}

/// Unit picked on the vehicle details configurator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl DurationMode {
    pub fn days_per_unit(&self) -> u32 {
        match self {
            Self::Daily => 1,
            Self::Weekly => RentalDuration::WEEK,
            Self::Monthly => RentalDuration::MONTH,
        }
    }

    pub fn max_quantity(&self) -> u32 {
        match self {
            Self::Daily => 30,
            Self::Weekly | Self::Monthly => 12,
        }
    }

    pub fn unit_label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Daily, Locale::En) => "Days",
            (Self::Weekly, Locale::En) => "Weeks",
            (Self::Monthly, Locale::En) => "Months",
            (Self::Daily, Locale::Ar) => "أيام",
            (Self::Weekly, Locale::Ar) => "أسابيع",
            (Self::Monthly, Locale::Ar) => "شهور",
        }
    }

    pub fn duration(&self, quantity: u32) -> Result<RentalDuration, DomainError> {
        let days = quantity.checked_mul(self.days_per_unit()).ok_or_else(|| {
            DomainError::InvariantViolation(format!("duration quantity {quantity} overflows"))
        })?;
        RentalDuration::new(days)
    }

    /// Human text for the handoff message, e.g. `2 Weeks`.
    pub fn describe(&self, quantity: u32, locale: Locale) -> String {
        format!("{quantity} {}", self.unit_label(locale))
    }
}

impl std::str::FromStr for DurationMode {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "days" => Ok(Self::Daily),
            "weekly" | "week" | "weeks" => Ok(Self::Weekly),
            "monthly" | "month" | "months" => Ok(Self::Monthly),
            other => Err(DomainError::InvariantViolation(format!(
                "unsupported duration mode `{other}` (expected daily|weekly|monthly)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RentalWindow {
    /// Drop-off is `start + duration` days.
    pub fn starting(start: NaiveDate, duration: RentalDuration) -> Result<Self, DomainError> {
        let end = start.checked_add_days(Days::new(u64::from(duration.days()))).ok_or_else(|| {
            DomainError::InvariantViolation(format!("rental end date overflows from {start}"))
        })?;
        Ok(Self { start, end })
    }
}
