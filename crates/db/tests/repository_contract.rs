//! The SQLite and in-memory stores must behave the same from the caller's side.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use qcars_core::domain::booking::{Booking, BookingId, BookingStatus};
use qcars_core::domain::settings::Settings;
use qcars_core::domain::user::User;
use qcars_db::fixtures::{demo_vehicle, sample_discount_rules};
use qcars_db::repositories::{
    BookingRepository, DiscountRuleRepository, InMemoryBookingRepository,
    InMemoryDiscountRuleRepository, InMemorySettingsRepository, InMemoryUserRepository,
    InMemoryVehicleRepository, SettingsRepository, SqlBookingRepository,
    SqlDiscountRuleRepository, SqlSettingsRepository, SqlUserRepository, SqlVehicleRepository,
    UserRepository, VehicleRepository,
};
use qcars_db::{connect_with_settings, migrations, DbPool};

type ContractResult = Result<(), String>;

async fn pool() -> Result<DbPool, String> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30)
        .await
        .map_err(|error| format!("connect: {error}"))?;
    migrations::run_pending(&pool).await.map_err(|error| format!("migrate: {error}"))?;
    Ok(pool)
}

async fn vehicle_contract(repo: &dyn VehicleRepository) -> ContractResult {
    repo.upsert(demo_vehicle("car-a", "BMW", "X5", 150)).await.map_err(|e| e.to_string())?;
    repo.upsert(demo_vehicle("car-b", "Tesla", "Model 3", 120)).await.map_err(|e| e.to_string())?;
    repo.upsert(demo_vehicle("car-a", "BMW", "X5 M", 200)).await.map_err(|e| e.to_string())?;

    let listed = repo.list().await.map_err(|e| e.to_string())?;
    let ids: Vec<&str> = listed.iter().map(|vehicle| vehicle.id.0.as_str()).collect();
    if ids != vec!["car-b", "car-a"] {
        return Err(format!("unexpected vehicle order {ids:?}"));
    }
    if listed[1].price_per_day != Decimal::from(200) {
        return Err("upsert should replace the stored vehicle".to_string());
    }

    let toggled =
        repo.set_availability(&listed[0].id, false).await.map_err(|e| e.to_string())?;
    let found = repo.find_by_id(&listed[0].id).await.map_err(|e| e.to_string())?;
    if !toggled || found.map(|vehicle| vehicle.is_available) != Some(false) {
        return Err("availability toggle should persist".to_string());
    }
    Ok(())
}

async fn settings_contract(repo: &dyn SettingsRepository) -> ContractResult {
    if repo.get().await.map_err(|e| e.to_string())? != Settings::default() {
        return Err("fresh store should return defaults".to_string());
    }
    let mut settings = Settings::default();
    settings.company_name = "Marina Motors".to_string();
    settings.card_config.show_rating = false;
    repo.put(&settings).await.map_err(|e| e.to_string())?;

    if repo.get().await.map_err(|e| e.to_string())? != settings {
        return Err("settings should round trip".to_string());
    }
    Ok(())
}

async fn rule_contract(repo: &dyn DiscountRuleRepository) -> ContractResult {
    for rule in sample_discount_rules().into_iter().rev() {
        repo.add(rule).await.map_err(|e| e.to_string())?;
    }
    let listed = repo.list().await.map_err(|e| e.to_string())?;
    if listed != sample_discount_rules() {
        return Err("rules should be listed ascending by min_days".to_string());
    }
    Ok(())
}

async fn account_contract(
    users: &dyn UserRepository,
    bookings: &dyn BookingRepository,
) -> ContractResult {
    let user = User::new("Layla", "layla@example.com");
    if !users.create(user.clone()).await.map_err(|e| e.to_string())? {
        return Err("first signup should succeed".to_string());
    }
    if users.create(User::new("Other", "layla@example.com")).await.map_err(|e| e.to_string())? {
        return Err("duplicate email should be rejected".to_string());
    }

    let booking = Booking {
        id: BookingId::generate(),
        vehicle_id: demo_vehicle("car-a", "BMW", "X5", 150).id,
        vehicle_name: "BMW X5".to_string(),
        vehicle_image: String::new(),
        start_date: NaiveDate::from_ymd_opt(2026, 2, 1).ok_or("date")?,
        end_date: NaiveDate::from_ymd_opt(2026, 2, 8).ok_or("date")?,
        total_price: Decimal::from(945),
        status: BookingStatus::Confirmed,
        extras: Vec::new(),
        booked_at: Utc::now(),
        user_id: Some(user.id.clone()),
        customer_name: Some(user.name.clone()),
        customer_email: Some(user.email.clone()),
    };
    bookings.save(booking.clone()).await.map_err(|e| e.to_string())?;

    let mine = bookings.list_for_user(&user.id).await.map_err(|e| e.to_string())?;
    if mine.len() != 1 || mine[0].id != booking.id {
        return Err("booking should be listed for its user".to_string());
    }
    Ok(())
}

#[tokio::test]
async fn sqlite_store_honours_the_contract() -> ContractResult {
    let pool = pool().await?;

    vehicle_contract(&SqlVehicleRepository::new(pool.clone())).await?;
    settings_contract(&SqlSettingsRepository::new(pool.clone())).await?;
    rule_contract(&SqlDiscountRuleRepository::new(pool.clone())).await?;
    account_contract(&SqlUserRepository::new(pool.clone()), &SqlBookingRepository::new(pool))
        .await
}

#[tokio::test]
async fn in_memory_store_honours_the_contract() -> ContractResult {
    vehicle_contract(&InMemoryVehicleRepository::default()).await?;
    settings_contract(&InMemorySettingsRepository::default()).await?;
    rule_contract(&InMemoryDiscountRuleRepository::default()).await?;
    account_contract(&InMemoryUserRepository::default(), &InMemoryBookingRepository::default())
        .await
}
