//! services/seeder/src/config.rs
//!
//! Defines the seeder's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use prep_content_core::seeder::{FailurePolicy, DEFAULT_BATCH_SIZE};
use prep_content_core::{SeedOptions, DEFAULT_JITTER_SEED};
use tracing::Level;

use crate::adapters::db::MAX_BATCH_ROWS;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Absent only in dry-run mode.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,
    pub catalog_path: Option<PathBuf>,
    pub jitter_seed: u64,
    pub batch_size: usize,
    pub failure_policy: FailurePolicy,
    pub dry_run: bool,
    pub skip_migrations: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Run Mode ---
        let dry_run = parse_var(&lookup, "SEED_DRY_RUN", false, parse_bool)?;
        let skip_migrations = parse_var(&lookup, "SEED_SKIP_MIGRATIONS", false, parse_bool)?;

        // --- Database Settings ---
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if database_url.is_none() && !dry_run {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }
        let db_max_connections = parse_var(&lookup, "DB_MAX_CONNECTIONS", 2, parse_from_str)?;
        if db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let connect_timeout_secs =
            parse_var(&lookup, "DB_CONNECT_TIMEOUT_SECS", 10u64, parse_from_str)?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Catalog and Seeding Settings ---
        let catalog_path = lookup("SEED_CATALOG_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let jitter_seed = parse_var(&lookup, "SEED_JITTER_SEED", DEFAULT_JITTER_SEED, parse_from_str)?;
        let batch_size = parse_var(&lookup, "SEED_BATCH_SIZE", DEFAULT_BATCH_SIZE, parse_from_str)?;
        if !(1..=MAX_BATCH_ROWS).contains(&batch_size) {
            return Err(ConfigError::InvalidValue(
                "SEED_BATCH_SIZE".to_string(),
                format!("must be between 1 and {MAX_BATCH_ROWS}"),
            ));
        }
        let failure_policy = parse_var(
            &lookup,
            "SEED_FAILURE_POLICY",
            FailurePolicy::Independent,
            parse_from_str,
        )?;

        Ok(Self {
            database_url,
            log_level,
            db_max_connections,
            db_connect_timeout: Duration::from_secs(connect_timeout_secs),
            catalog_path,
            jitter_seed,
            batch_size,
            failure_policy,
            dry_run,
            skip_migrations,
        })
    }

    pub fn seed_options(&self) -> SeedOptions {
        SeedOptions {
            policy: self.failure_policy,
            batch_size: self.batch_size,
        }
    }
}

fn parse_var<F, T, P>(lookup: &F, name: &str, default: T, parse: P) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => {
            parse(raw.trim()).map_err(|reason| ConfigError::InvalidValue(name.to_string(), reason))
        }
    }
}

fn parse_from_str<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| e.to_string())
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(format!("'{other}' is not a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/prep")]).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/prep"));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.db_max_connections, 2);
        assert_eq!(config.db_connect_timeout, Duration::from_secs(10));
        assert_eq!(config.jitter_seed, DEFAULT_JITTER_SEED);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.failure_policy, FailurePolicy::Independent);
        assert!(config.catalog_path.is_none());
        assert!(!config.dry_run);
        assert!(!config.skip_migrations);
    }

    #[test]
    fn database_url_is_required_outside_dry_run() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref name) if name == "DATABASE_URL"));
    }

    #[test]
    fn dry_run_needs_no_database() {
        let config = load(&[("SEED_DRY_RUN", "true")]).unwrap();
        assert!(config.dry_run);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn reads_seeding_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/prep"),
            ("SEED_CATALOG_PATH", "/etc/prep/catalog.json"),
            ("SEED_JITTER_SEED", "7"),
            ("SEED_BATCH_SIZE", "25"),
            ("SEED_FAILURE_POLICY", "all-or-nothing"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.catalog_path, Some(PathBuf::from("/etc/prep/catalog.json")));
        assert_eq!(config.jitter_seed, 7);
        assert_eq!(config.log_level, Level::DEBUG);
        let options = config.seed_options();
        assert_eq!(options.batch_size, 25);
        assert_eq!(options.policy, FailurePolicy::AllOrNothing);
    }

    #[test]
    fn rejects_invalid_values() {
        for (name, value) in [
            ("SEED_BATCH_SIZE", "0"),
            ("SEED_BATCH_SIZE", "many"),
            ("SEED_BATCH_SIZE", "100000"),
            ("SEED_FAILURE_POLICY", "sometimes"),
            ("SEED_DRY_RUN", "maybe"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("RUST_LOG", "loud"),
        ] {
            let err = load(&[("DATABASE_URL", "postgres://db/prep"), (name, value)]).unwrap_err();
            match err {
                ConfigError::InvalidValue(var, _) => assert_eq!(var, name),
                other => panic!("{name}={value}: unexpected error {other:?}"),
            }
        }
    }
}
