use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::locale::{localize, Locale};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn generate() -> Self {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("car-{}", &raw[..12]))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "SUV")]
    Suv,
    Sedan,
    Luxury,
    Sport,
    Electric,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suv => "SUV",
            Self::Sedan => "Sedan",
            Self::Luxury => "Luxury",
            Self::Sport => "Sport",
            Self::Electric => "Electric",
        }
    }
}

impl std::str::FromStr for VehicleType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "suv" => Ok(Self::Suv),
            "sedan" => Ok(Self::Sedan),
            "luxury" => Ok(Self::Luxury),
            "sport" => Ok(Self::Sport),
            "electric" => Ok(Self::Electric),
            other => Err(DomainError::InvariantViolation(format!("unknown vehicle type `{other}`"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Automatic,
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSpecs {
    pub engine: String,
    pub horsepower: u32,
    pub acceleration: String,
    pub top_speed: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalTerms {
    pub mileage_limit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage_limit_ar: Option<String>,
    pub deposit: Decimal,
    pub insurance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_ar: Option<String>,
}

/// A rentable car as shown in the catalog. `*_ar` fields are optional Arabic
/// overrides read through [`localize`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_ar: Option<String>,
    pub year: u16,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ar: Option<String>,
    pub price_per_day: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub seats: u8,
    pub transmission: Transmission,
    pub fuel: FuelType,
    pub is_available: bool,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features_ar: Option<Vec<String>>,
    #[serde(default)]
    pub extra_conditions: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    pub rating: Decimal,
    #[serde(default)]
    pub highlight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_ar: Option<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
    /// Whole-number percentage applied from 7 days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_discount: Option<Decimal>,
    /// Whole-number percentage applied from 30 days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_discount: Option<Decimal>,
    #[serde(default)]
    pub specs: VehicleSpecs,
    #[serde(default)]
    pub rental_terms: RentalTerms,
}

impl Vehicle {
    /// Highest accepted daily rate, in USD.
    pub const MAX_PRICE_PER_DAY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

    pub fn display_name(&self, locale: Locale) -> &str {
        localize(&self.name, self.name_ar.as_deref(), locale)
    }

    pub fn display_brand(&self, locale: Locale) -> &str {
        localize(&self.brand, self.brand_ar.as_deref(), locale)
    }

    pub fn display_type(&self, locale: Locale) -> &str {
        localize(self.vehicle_type.as_str(), self.type_ar.as_deref(), locale)
    }

    pub fn display_description(&self, locale: Locale) -> &str {
        localize(&self.description, self.description_ar.as_deref(), locale)
    }

    pub fn display_features(&self, locale: Locale) -> &[String] {
        match (&self.features_ar, locale) {
            (Some(features), Locale::Ar) if !features.is_empty() => features,
            _ => &self.features,
        }
    }

    /// Cover image first, then gallery images, with duplicates removed.
    pub fn gallery_images(&self) -> Vec<&str> {
        let mut images: Vec<&str> = Vec::with_capacity(self.gallery.len() + 1);
        for image in std::iter::once(&self.image).chain(self.gallery.iter()) {
            if !image.is_empty() && !images.contains(&image.as_str()) {
                images.push(image);
            }
        }
        images
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.0.trim().is_empty() {
            return Err(DomainError::InvariantViolation("vehicle id must not be empty".into()));
        }
        if self.price_per_day < Decimal::ZERO || self.price_per_day > Self::MAX_PRICE_PER_DAY {
            return Err(DomainError::InvariantViolation(format!(
                "vehicle `{}` price_per_day must be in range 0..={}",
                self.id.0,
                Self::MAX_PRICE_PER_DAY
            )));
        }
        for (field, value) in
            [("weekly_discount", self.weekly_discount), ("monthly_discount", self.monthly_discount)]
        {
            if let Some(percent) = value {
                if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                    return Err(DomainError::InvariantViolation(format!(
                        "vehicle `{}` {field} must be in range 0..=100",
                        self.id.0
                    )));
                }
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::fixtures::vehicle;
    use super::Vehicle;
    use crate::errors::DomainError;
    use crate::locale::Locale;

    #[test]
    fn rejects_negative_day_rate() {
        let mut car = vehicle("car-1", "BMW", "X5", 100);
        car.price_per_day = Decimal::from(-1);

        assert!(matches!(car.validate(), Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn rejects_day_rate_above_ceiling() {
        let mut car = vehicle("car-1", "BMW", "X5", 100);
        car.price_per_day = Vehicle::MAX_PRICE_PER_DAY;
        assert_eq!(car.validate(), Ok(()));

        car.price_per_day = Decimal::from(1_000_001);
        let error = car.validate().expect_err("rate above the ceiling");
        assert!(error.to_string().contains("price_per_day"));

        car.price_per_day = Decimal::MAX;
        assert!(car.validate().is_err());
    }

    #[test]
    fn rejects_discount_outside_percentage_range() {
        let mut car = vehicle("car-1", "BMW", "X5", 100);
        car.monthly_discount = Some(Decimal::from(120));

        let error = car.validate().expect_err("120% should be rejected");
        assert!(error.to_string().contains("monthly_discount"));
    }

    #[test]
    fn localized_accessors_fall_back_to_default_fields() {
        let mut car = vehicle("car-1", "Mercedes", "G-Class", 400);
        car.brand_ar = Some("مرسيدس".to_string());

        assert_eq!(car.display_brand(Locale::Ar), "مرسيدس");
        assert_eq!(car.display_name(Locale::Ar), "G-Class");
        assert_eq!(car.display_type(Locale::Ar), "Sedan");
    }

    #[test]
    fn gallery_starts_with_cover_and_drops_duplicates() {
        let mut car = vehicle("car-1", "Audi", "RS6", 300);
        car.gallery = vec![car.image.clone(), "https://cdn.example.com/side.jpg".to_string()];

        assert_eq!(
            car.gallery_images(),
            vec!["https://cdn.example.com/car-1.jpg", "https://cdn.example.com/side.jpg"]
        );
    }
}
