//! services/seeder/src/error.rs
//!
//! Defines the primary error type for the seeder service.

use crate::config::ConfigError;
use prep_content_core::ports::PortError;
use prep_content_core::{CatalogError, SeedError};

/// The primary error type for the `seeder` service.
#[derive(Debug, thiserror::Error)]
pub enum SeederError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operator-supplied catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// One or more content kinds failed to seed.
    #[error("Seeding failed: {0}")]
    Seed(#[from] SeedError),

    /// Represents an error that propagated up from the storage port.
    #[error("Store error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the embedded schema migrations failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl SeederError {
    /// Process exit status for this failure (sysexits.h values).
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 78,
            Self::Catalog(_) => 66,
            Self::Seed(err) => err.exit_code(),
            Self::Port(PortError::Unavailable(_)) | Self::Database(_) | Self::Migration(_) => 69,
            Self::Port(_) => 1,
        }
    }
}
