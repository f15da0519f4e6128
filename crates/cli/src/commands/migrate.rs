use crate::commands::{load_config, with_migrated_store, CommandResult};

pub fn run() -> CommandResult {
    let config = match load_config("migrate") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    match with_migrated_store("migrate", &config, |_pool| async { Ok(()) }) {
        Ok(()) => CommandResult::success(
            "migrate",
            format!("applied pending migrations to `{}`", config.database.url),
        ),
        Err(failure) => failure,
    }
}
