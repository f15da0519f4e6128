use rust_decimal::Decimal;
use serde::Serialize;

use qcars_core::domain::discount::{DiscountRule, DiscountRuleId};
use qcars_core::domain::extra::{BookingExtra, ExtraId};
use qcars_core::domain::vehicle::{
    FuelType, RentalTerms, Transmission, Vehicle, VehicleId, VehicleSpecs, VehicleType,
};

use crate::connection::DbPool;
use crate::repositories::{
    DiscountRuleRepository, ExtraRepository, RepositoryError, SqlDiscountRuleRepository,
    SqlExtraRepository, SqlVehicleRepository, VehicleRepository,
};

/// A plain available vehicle with sensible defaults, for tests and demos.
pub fn demo_vehicle(id: &str, brand: &str, name: &str, price_per_day: i64) -> Vehicle {
    Vehicle {
        id: VehicleId(id.to_string()),
        name: name.to_string(),
        name_ar: None,
        brand: brand.to_string(),
        brand_ar: None,
        year: 2024,
        vehicle_type: VehicleType::Sedan,
        type_ar: None,
        price_per_day: Decimal::from(price_per_day),
        image: format!("https://images.qcars.example/{id}.jpg"),
        gallery: Vec::new(),
        seats: 5,
        transmission: Transmission::Automatic,
        fuel: FuelType::Petrol,
        is_available: true,
        features: Vec::new(),
        features_ar: None,
        extra_conditions: Vec::new(),
        description: String::new(),
        description_ar: None,
        rating: Decimal::new(48, 1),
        highlight: String::new(),
        highlight_ar: None,
        color: String::new(),
        color_hex: None,
        weekly_discount: None,
        monthly_discount: None,
        specs: VehicleSpecs::default(),
        rental_terms: RentalTerms {
            mileage_limit: "250 km/day".to_string(),
            mileage_limit_ar: Some("٢٥٠ كم/يوم".to_string()),
            deposit: Decimal::from(1500),
            insurance: "Comprehensive".to_string(),
            insurance_ar: Some("شامل".to_string()),
        },
    }
}

struct FleetEntry {
    id: &'static str,
    brand: &'static str,
    brand_ar: &'static str,
    name: &'static str,
    name_ar: &'static str,
    year: u16,
    vehicle_type: VehicleType,
    type_ar: &'static str,
    rate: i64,
    seats: u8,
    fuel: FuelType,
    horsepower: u32,
    engine: &'static str,
    acceleration: &'static str,
    top_speed: &'static str,
    highlight: &'static str,
    highlight_ar: &'static str,
    weekly_discount: Option<i64>,
    monthly_discount: Option<i64>,
    is_available: bool,
}

const FLEET: &[FleetEntry] = &[
    FleetEntry {
        id: "car-rr-sport",
        brand: "Land Rover",
        brand_ar: "لاند روفر",
        name: "Range Rover Sport",
        name_ar: "رينج روفر سبورت",
        year: 2024,
        vehicle_type: VehicleType::Suv,
        type_ar: "دفع رباعي",
        rate: 450,
        seats: 5,
        fuel: FuelType::Petrol,
        horsepower: 395,
        engine: "3.0L Inline-6 Turbo",
        acceleration: "5.7s",
        top_speed: "242 km/h",
        highlight: "Desert ready",
        highlight_ar: "جاهزة للصحراء",
        weekly_discount: Some(10),
        monthly_discount: Some(25),
        is_available: true,
    },
    FleetEntry {
        id: "car-g63",
        brand: "Mercedes-Benz",
        brand_ar: "مرسيدس بنز",
        name: "G 63 AMG",
        name_ar: "جي ٦٣ إي إم جي",
        year: 2024,
        vehicle_type: VehicleType::Luxury,
        type_ar: "فاخرة",
        rate: 900,
        seats: 5,
        fuel: FuelType::Petrol,
        horsepower: 577,
        engine: "4.0L V8 Biturbo",
        acceleration: "4.5s",
        top_speed: "220 km/h",
        highlight: "Icon of the city",
        highlight_ar: "أيقونة المدينة",
        weekly_discount: None,
        monthly_discount: Some(20),
        is_available: true,
    },
    FleetEntry {
        id: "car-911",
        brand: "Porsche",
        brand_ar: "بورش",
        name: "911 Carrera S",
        name_ar: "٩١١ كاريرا إس",
        year: 2023,
        vehicle_type: VehicleType::Sport,
        type_ar: "رياضية",
        rate: 800,
        seats: 4,
        fuel: FuelType::Petrol,
        horsepower: 443,
        engine: "3.0L Flat-6 Twin Turbo",
        acceleration: "3.5s",
        top_speed: "308 km/h",
        highlight: "Track-bred",
        highlight_ar: "روح الحلبة",
        weekly_discount: Some(5),
        monthly_discount: None,
        is_available: true,
    },
    FleetEntry {
        id: "car-model-3",
        brand: "Tesla",
        brand_ar: "تسلا",
        name: "Model 3",
        name_ar: "موديل ٣",
        year: 2024,
        vehicle_type: VehicleType::Electric,
        type_ar: "كهربائية",
        rate: 180,
        seats: 5,
        fuel: FuelType::Electric,
        horsepower: 283,
        engine: "Dual Motor",
        acceleration: "4.2s",
        top_speed: "225 km/h",
        highlight: "Zero emissions",
        highlight_ar: "انبعاثات صفرية",
        weekly_discount: None,
        monthly_discount: None,
        is_available: true,
    },
    FleetEntry {
        id: "car-camry",
        brand: "Toyota",
        brand_ar: "تويوتا",
        name: "Camry Hybrid",
        name_ar: "كامري هايبرد",
        year: 2023,
        vehicle_type: VehicleType::Sedan,
        type_ar: "سيدان",
        rate: 120,
        seats: 5,
        fuel: FuelType::Hybrid,
        horsepower: 208,
        engine: "2.5L Hybrid",
        acceleration: "7.8s",
        top_speed: "180 km/h",
        highlight: "Best value",
        highlight_ar: "أفضل قيمة",
        weekly_discount: None,
        monthly_discount: None,
        is_available: true,
    },
    FleetEntry {
        id: "car-huracan",
        brand: "Lamborghini",
        brand_ar: "لامبورغيني",
        name: "Huracán EVO",
        name_ar: "هوراكان إيفو",
        year: 2022,
        vehicle_type: VehicleType::Sport,
        type_ar: "رياضية",
        rate: 1500,
        seats: 2,
        fuel: FuelType::Petrol,
        horsepower: 631,
        engine: "5.2L V10",
        acceleration: "2.9s",
        top_speed: "325 km/h",
        highlight: "Head turner",
        highlight_ar: "تلفت الأنظار",
        weekly_discount: None,
        monthly_discount: None,
        is_available: false,
    },
];

/// Built-in catalog served when the vehicle store is empty.
pub fn demo_fleet() -> Vec<Vehicle> {
    FLEET
        .iter()
        .map(|entry| {
            let mut vehicle = demo_vehicle(entry.id, entry.brand, entry.name, entry.rate);
            vehicle.brand_ar = Some(entry.brand_ar.to_string());
            vehicle.name_ar = Some(entry.name_ar.to_string());
            vehicle.year = entry.year;
            vehicle.vehicle_type = entry.vehicle_type;
            vehicle.type_ar = Some(entry.type_ar.to_string());
            vehicle.seats = entry.seats;
            vehicle.fuel = entry.fuel;
            vehicle.is_available = entry.is_available;
            vehicle.highlight = entry.highlight.to_string();
            vehicle.highlight_ar = Some(entry.highlight_ar.to_string());
            vehicle.weekly_discount = entry.weekly_discount.map(Decimal::from);
            vehicle.monthly_discount = entry.monthly_discount.map(Decimal::from);
            vehicle.description = format!(
                "The {} {} {} with {} hp, ready for Dubai roads.",
                entry.year, entry.brand, entry.name, entry.horsepower
            );
            vehicle.features = vec![
                "Bluetooth".to_string(),
                "Apple CarPlay".to_string(),
                "Leather Seats".to_string(),
            ];
            vehicle.features_ar =
                Some(vec!["بلوتوث".to_string(), "آبل كاربلاي".to_string(), "مقاعد جلدية".to_string()]);
            vehicle.specs = VehicleSpecs {
                engine: entry.engine.to_string(),
                horsepower: entry.horsepower,
                acceleration: entry.acceleration.to_string(),
                top_speed: entry.top_speed.to_string(),
            };
            vehicle
        })
        .collect()
}

pub fn default_extras() -> Vec<BookingExtra> {
    [
        ("extra-insurance", "Full Insurance", "تأمين شامل", 50, "Zero excess cover"),
        ("extra-child-seat", "Child Seat", "مقعد أطفال", 15, "For ages 1 to 4"),
        ("extra-driver", "Additional Driver", "سائق إضافي", 30, "One extra licensed driver"),
        ("extra-delivery", "Home Delivery", "توصيل للمنزل", 40, "Delivered to your door"),
    ]
    .into_iter()
    .map(|(id, name, name_ar, price, description)| BookingExtra {
        id: ExtraId(id.to_string()),
        name: name.to_string(),
        name_ar: Some(name_ar.to_string()),
        price: Decimal::from(price),
        description: description.to_string(),
        description_ar: None,
    })
    .collect()
}

/// Tiered rules loaded by `qcars seed`. A fresh store has no rules.
pub fn sample_discount_rules() -> Vec<DiscountRule> {
    [
        ("rule-3d", 3, 5, "3+ Days Saver", "توفير ٣ أيام"),
        ("rule-7d", 7, 10, "Weekly Deal", "عرض أسبوعي"),
        ("rule-30d", 30, 20, "Monthly Deal", "عرض شهري"),
    ]
    .into_iter()
    .map(|(id, min_days, pct, label, label_ar)| DiscountRule {
        id: DiscountRuleId(id.to_string()),
        min_days,
        percentage_off: Decimal::new(pct, 2),
        label: label.to_string(),
        label_ar: Some(label_ar.to_string()),
    })
    .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeedResult {
    pub vehicles: usize,
    pub extras: usize,
    pub discount_rules: usize,
}

/// Demo dataset for a fresh database.
pub struct DemoSeedDataset;

impl DemoSeedDataset {
    /// Idempotent: rows are upserted by id.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let vehicles = SqlVehicleRepository::new(pool.clone());
        let fleet = demo_fleet();
        // Upserts prepend, so insert back to front to keep the fleet order.
        for vehicle in fleet.iter().rev() {
            vehicles.upsert(vehicle.clone()).await?;
        }

        let extras = SqlExtraRepository::new(pool.clone());
        let extra_catalog = default_extras();
        for extra in &extra_catalog {
            extras.add(extra.clone()).await?;
        }

        let rules = SqlDiscountRuleRepository::new(pool.clone());
        let rule_set = sample_discount_rules();
        for rule in &rule_set {
            rules.add(rule.clone()).await?;
        }

        Ok(SeedResult {
            vehicles: fleet.len(),
            extras: extra_catalog.len(),
            discount_rules: rule_set.len(),
        })
    }

    pub async fn verify(pool: &DbPool) -> Result<bool, RepositoryError> {
        let listed = SqlVehicleRepository::new(pool.clone()).list().await?;
        let expected: Vec<VehicleId> = demo_fleet().into_iter().map(|vehicle| vehicle.id).collect();
        let seeded = expected.iter().all(|id| listed.iter().any(|vehicle| &vehicle.id == id));
        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::{default_extras, demo_fleet, sample_discount_rules, DemoSeedDataset};
    use crate::repositories::{SqlVehicleRepository, VehicleRepository};
    use crate::{connect_with_settings, migrations};

    #[test]
    fn demo_fleet_is_valid() {
        let fleet = demo_fleet();

        assert!(!fleet.is_empty());
        for vehicle in &fleet {
            vehicle.validate().expect("demo vehicle should validate");
        }
        for rule in sample_discount_rules() {
            rule.validate().expect("sample rule should validate");
        }
        assert!(fleet.iter().any(|vehicle| !vehicle.is_available));
        assert_eq!(default_extras().len(), 4);
    }

    #[tokio::test]
    async fn seeding_twice_keeps_fleet_order_and_count() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let first = DemoSeedDataset::load(&pool).await.expect("seed");
        DemoSeedDataset::load(&pool).await.expect("reseed");

        let listed = SqlVehicleRepository::new(pool.clone()).list().await.expect("list");
        let listed_ids: Vec<_> = listed.iter().map(|vehicle| vehicle.id.clone()).collect();
        let expected_ids: Vec<_> = demo_fleet().into_iter().map(|vehicle| vehicle.id).collect();

        assert_eq!(first.vehicles, expected_ids.len());
        assert_eq!(listed_ids, expected_ids);
        assert!(DemoSeedDataset::verify(&pool).await.expect("verify"));
    }
}
