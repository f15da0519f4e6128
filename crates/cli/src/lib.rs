pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::quote::QuoteArgs;

#[derive(Debug, Parser)]
#[command(
    name = "qcars",
    about = "Q Cars operator CLI",
    long_about = "Inspect configuration, prepare the rental store and price rentals from the terminal.",
    after_help = "Examples:\n  qcars doctor --json\n  qcars seed\n  qcars quote --vehicle car-rr-sport --days 7 --extra extra-insurance --currency aed"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the demo fleet, extras and discount rules (idempotent)")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, assistant provider settings and database schema")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Price a rental with the same engine the site uses")]
    Quote {
        #[arg(long, help = "Vehicle id, e.g. car-rr-sport")]
        vehicle: String,
        #[arg(long, help = "Rental length in days")]
        days: i64,
        #[arg(long = "extra", help = "Extra id; repeat for more than one")]
        extras: Vec<String>,
        #[arg(long, help = "Display currency: usd or aed")]
        currency: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Quote { vehicle, days, extras, currency } => {
            commands::quote::run(QuoteArgs { vehicle, days, extras, currency })
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
