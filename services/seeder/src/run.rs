//! services/seeder/src/run.rs
//!
//! Wires configuration, catalog and store together for one seeding run.

use std::sync::Arc;

use prep_content_core::{
    ContentStore, InMemoryContentStore, KindOutcome, SeedCatalog, SeedError, SeedReport, Seeder,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::adapters::PgContentStore;
use crate::config::{Config, ConfigError};
use crate::error::SeederError;

/// Loads the operator catalog if one is configured, otherwise the built-in one.
pub fn load_catalog(config: &Config) -> Result<SeedCatalog, SeederError> {
    let catalog = match &config.catalog_path {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog file");
            SeedCatalog::from_json_file(path, config.jitter_seed)?
        }
        None => SeedCatalog::builtin(config.jitter_seed),
    };
    info!(
        questions = catalog.questions.len(),
        trends = catalog.trends.len(),
        tips = catalog.tips.len(),
        rejected = catalog.rejected.len(),
        "Catalog ready"
    );
    Ok(catalog)
}

/// Connects to PostgreSQL and applies the embedded migrations.
pub async fn connect(config: &Config) -> Result<PgContentStore, SeederError> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_connect_timeout)
        .connect(database_url)
        .await?;
    let store = PgContentStore::new(pool);

    if config.skip_migrations {
        info!("Skipping database migrations.");
    } else {
        info!("Running database migrations...");
        store.run_migrations().await?;
        info!("Database migrations complete.");
    }
    Ok(store)
}

/// Performs one complete run: load the catalog, pick the store, seed.
///
/// Failures of individual kinds are part of the returned report; only
/// failures that stop the run from starting are errors.
pub async fn execute(config: &Config) -> Result<SeedReport, SeederError> {
    let catalog = load_catalog(config)?;

    let store: Arc<dyn ContentStore> = if config.dry_run {
        info!("Dry run: seeding an in-memory store, the database is not touched.");
        Arc::new(InMemoryContentStore::new())
    } else {
        Arc::new(connect(config).await?)
    };

    let seeder = Seeder::new(store, catalog, config.seed_options());
    Ok(seeder.run_detailed().await)
}

/// Process exit status of a finished run, decided by its most severe failure.
pub fn exit_status(report: &SeedReport) -> u8 {
    report.worst_error().map_or(0, SeedError::exit_code)
}

/// One human-readable line per content kind.
pub fn summary_lines(report: &SeedReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .kinds
        .iter()
        .map(|kind_report| match &kind_report.outcome {
            KindOutcome::Seeded(summary) => format!(
                "{}: {} records written ({} previous removed)",
                kind_report.kind, summary.inserted, summary.removed
            ),
            KindOutcome::Failed(err) => format!("{}: FAILED: {}", kind_report.kind, err),
            KindOutcome::Skipped => format!("{}: skipped", kind_report.kind),
        })
        .collect();
    lines.push(format!(
        "daily_tips: {} available (not persisted)",
        report.tips_available
    ));
    lines
}
