use qcars_core::domain::extra::ExtraId;
use qcars_core::domain::rental::RentalDuration;
use qcars_core::domain::vehicle::{Vehicle, VehicleId};
use qcars_core::pricing::quote::{DeterministicPricingEngine, QuoteRequest};
use qcars_core::pricing::{DisplayCurrency, PricingEngine, Quote};
use qcars_db::demo_fleet;
use qcars_db::repositories::{
    DiscountRuleRepository, ExtraRepository, SqlDiscountRuleRepository, SqlExtraRepository,
    SqlVehicleRepository, VehicleRepository,
};
use serde_json::json;

use crate::commands::{load_config, with_migrated_store, CommandResult};

#[derive(Clone, Debug)]
pub struct QuoteArgs {
    pub vehicle: String,
    pub days: i64,
    pub extras: Vec<String>,
    pub currency: Option<String>,
}

pub fn run(args: QuoteArgs) -> CommandResult {
    let duration = match RentalDuration::try_from(args.days) {
        Ok(duration) => duration,
        Err(error) => return CommandResult::failure("quote", "invalid_input", error.to_string(), 2),
    };
    let currency = match args.currency.as_deref().map(str::parse::<DisplayCurrency>) {
        None => DisplayCurrency::Usd,
        Some(Ok(currency)) => currency,
        Some(Err(error)) => return CommandResult::failure("quote", "invalid_input", error, 2),
    };
    let config = match load_config("quote") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let vehicle_id = VehicleId(args.vehicle);
    let extra_ids: Vec<ExtraId> = args.extras.into_iter().map(ExtraId).collect();
    let priced = with_migrated_store("quote", &config, |pool| async move {
        let stored = SqlVehicleRepository::new(pool.clone())
            .list()
            .await
            .map_err(|error| ("store_read", error.to_string(), 6u8))?;
        let vehicle = find_vehicle(stored, &vehicle_id)
            .ok_or_else(|| ("not_found", format!("vehicle `{}` not found", vehicle_id.0), 7u8))?;
        let extra_catalog = SqlExtraRepository::new(pool.clone())
            .list()
            .await
            .map_err(|error| ("store_read", error.to_string(), 6u8))?;
        let rules = SqlDiscountRuleRepository::new(pool)
            .list()
            .await
            .map_err(|error| ("store_read", error.to_string(), 6u8))?;

        Ok(DeterministicPricingEngine.price(&QuoteRequest {
            vehicle: &vehicle,
            duration,
            extra_ids: &extra_ids,
            extra_catalog: &extra_catalog,
            rules: &rules,
        }))
    });

    match priced {
        Ok(quote) => CommandResult::success_with_data(
            "quote",
            summary(&quote, currency),
            Some(json!({ "currency": currency.code(), "quote": quote })),
        ),
        Err(failure) => failure,
    }
}

/// Same lookup the web catalog does: stored vehicles, or the demo fleet
/// while the store is empty.
fn find_vehicle(stored: Vec<Vehicle>, id: &VehicleId) -> Option<Vehicle> {
    let catalog = if stored.is_empty() { demo_fleet() } else { stored };
    catalog.into_iter().find(|vehicle| &vehicle.id == id)
}

fn summary(quote: &Quote, currency: DisplayCurrency) -> String {
    let mut line = format!(
        "{} for {} days: {}",
        quote.vehicle_id.0,
        quote.duration_days,
        currency.format(quote.total)
    );
    if !quote.discount.label.is_empty() {
        line.push_str(&format!(
            " ({} saves {})",
            quote.discount.label,
            currency.format(quote.discount_amount)
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use qcars_core::domain::vehicle::VehicleId;
    use qcars_db::fixtures::demo_vehicle;

    use super::find_vehicle;

    #[test]
    fn empty_store_falls_back_to_demo_fleet() {
        let found = find_vehicle(Vec::new(), &VehicleId("car-camry".to_string()));

        assert!(found.is_some());
    }

    #[test]
    fn stored_vehicles_hide_demo_fleet() {
        let stored = vec![demo_vehicle("car-own", "Kia", "Sportage", 70)];

        assert!(find_vehicle(stored.clone(), &VehicleId("car-camry".to_string())).is_none());
        assert!(find_vehicle(stored, &VehicleId("car-own".to_string())).is_some());
    }
}
