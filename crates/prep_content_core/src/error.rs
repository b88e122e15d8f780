//! crates/prep_content_core/src/error.rs
//!
//! Error types raised while loading a catalog and while seeding it into a store.

use std::path::PathBuf;

use crate::domain::ContentKind;
use crate::ports::PortError;

/// Failure of a single content kind during a seeding run.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The store failed before anything was deleted; the kind is unchanged.
    #[error("{kind}: store unavailable, nothing was changed: {source}")]
    StoreUnavailable {
        kind: ContentKind,
        #[source]
        source: PortError,
    },

    /// A catalog record is malformed; detected before any deletion.
    #[error("{kind}: catalog record #{index} is invalid: {message}")]
    Validation {
        kind: ContentKind,
        index: usize,
        message: String,
    },

    /// Previous records were deleted but the insert failed part-way.
    #[error(
        "{kind}: partial write, {inserted} of {expected} records inserted after removing {removed}: {source}"
    )]
    PartialWrite {
        kind: ContentKind,
        removed: u64,
        inserted: u64,
        expected: usize,
        #[source]
        source: PortError,
    },
}

impl SeedError {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::StoreUnavailable { kind, .. }
            | Self::Validation { kind, .. }
            | Self::PartialWrite { kind, .. } => *kind,
        }
    }

    /// Higher is worse. A partial write leaves the store degraded.
    pub fn severity(&self) -> u8 {
        match self {
            Self::Validation { .. } => 1,
            Self::StoreUnavailable { .. } => 2,
            Self::PartialWrite { .. } => 3,
        }
    }

    /// Process exit status for this failure (sysexits.h values).
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation { .. } => 65,
            Self::StoreUnavailable { .. } => 69,
            Self::PartialWrite { .. } => 74,
        }
    }
}

/// Failure to load an operator-supplied catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Could not read catalog file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog file {} is not valid: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
