use qcars_db::{DemoSeedDataset, SeedResult};

use crate::commands::{load_config, with_migrated_store, CommandResult};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let seeded = with_migrated_store("seed", &config, |pool| async move {
        let result = DemoSeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;
        let verified = DemoSeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;
        if !verified {
            return Err(("seed_verification", "demo fleet is missing after seeding".to_string(), 6u8));
        }
        Ok(result)
    });

    match seeded {
        Ok(result) => CommandResult::success_with_data(
            "seed",
            summary(&result),
            serde_json::to_value(&result).ok(),
        ),
        Err(failure) => failure,
    }
}

fn summary(result: &SeedResult) -> String {
    format!(
        "demo dataset loaded: {} vehicles, {} extras, {} discount rules",
        result.vehicles, result.extras, result.discount_rules
    )
}
