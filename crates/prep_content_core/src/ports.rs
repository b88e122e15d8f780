//! crates/prep_content_core/src/ports.rs
//!
//! Defines the storage contract the seeder writes through.
//! The trait forms the boundary of the hexagonal architecture, keeping the core
//! independent of a concrete database.

use async_trait::async_trait;

use crate::domain::{ContentKind, InterviewQuestion, TechTrend};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the underlying store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The store could not be reached, or the connection dropped.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// The store was reachable but refused the statement or the data.
    #[error("Store rejected the request: {0}")]
    Rejected(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Record Batches
//=========================================================================================

/// A borrowed slice of records of a single kind, handed to the store in one insert.
#[derive(Debug, Clone, Copy)]
pub enum RecordBatch<'a> {
    Questions(&'a [InterviewQuestion]),
    Trends(&'a [TechTrend]),
}

impl RecordBatch<'_> {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Questions(_) => ContentKind::InterviewQuestions,
            Self::Trends(_) => ContentKind::TechTrends,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Questions(records) => records.len(),
            Self::Trends(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Removes every record of `kind`, returning how many were removed.
    async fn delete_all(&self, kind: ContentKind) -> PortResult<u64>;

    /// Inserts every record of the batch as a new record, returning how many were written.
    async fn insert_batch(&self, batch: RecordBatch<'_>) -> PortResult<u64>;
}
