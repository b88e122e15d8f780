//! services/seeder/src/bin/seed.rs

use std::process::ExitCode;

use seeder_lib::{
    config::Config,
    error::SeederError,
    run::{execute, exit_status, summary_lines},
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            let err = SeederError::from(err);
            eprintln!("seed: {err}");
            return ExitCode::from(err.exit_code());
        }
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting seeding run...");

    // --- 2. Seed ---
    let report = match execute(&config).await {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "Seeding run could not start");
            eprintln!("seed: {err}");
            return ExitCode::from(err.exit_code());
        }
    };

    // --- 3. Report ---
    for line in summary_lines(&report) {
        println!("{line}");
    }
    match report.worst_error() {
        None => {
            info!("Seeding complete.");
            ExitCode::SUCCESS
        }
        Some(err) => {
            error!(
                failed = report.errors().count(),
                error = %err,
                "Seeding run finished with failures"
            );
            eprintln!("seed: {err}");
            ExitCode::from(exit_status(&report))
        }
    }
}
