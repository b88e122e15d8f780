//! crates/prep_content_core/src/memory.rs
//!
//! An in-process implementation of the `ContentStore` port, used for dry runs
//! and tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{ContentKind, InterviewQuestion, TechTrend};
use crate::ports::{ContentStore, PortError, PortResult, RecordBatch};

#[derive(Debug, Default)]
struct Collections {
    questions: Vec<InterviewQuestion>,
    trends: Vec<TechTrend>,
}

/// A `ContentStore` holding both collections in memory.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    inner: Mutex<Collections>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already contains the given records.
    pub fn with_records(questions: Vec<InterviewQuestion>, trends: Vec<TechTrend>) -> Self {
        Self {
            inner: Mutex::new(Collections { questions, trends }),
        }
    }

    fn lock(&self) -> PortResult<MutexGuard<'_, Collections>> {
        self.inner
            .lock()
            .map_err(|_| PortError::Unexpected("in-memory store lock poisoned".to_string()))
    }

    pub fn questions(&self) -> Vec<InterviewQuestion> {
        self.lock().map(|c| c.questions.clone()).unwrap_or_default()
    }

    pub fn trends(&self) -> Vec<TechTrend> {
        self.lock().map(|c| c.trends.clone()).unwrap_or_default()
    }

    pub fn count(&self, kind: ContentKind) -> usize {
        match kind {
            ContentKind::InterviewQuestions => self.questions().len(),
            ContentKind::TechTrends => self.trends().len(),
        }
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn delete_all(&self, kind: ContentKind) -> PortResult<u64> {
        let mut collections = self.lock()?;
        let removed = match kind {
            ContentKind::InterviewQuestions => collections.questions.drain(..).count(),
            ContentKind::TechTrends => collections.trends.drain(..).count(),
        };
        Ok(removed as u64)
    }

    async fn insert_batch(&self, batch: RecordBatch<'_>) -> PortResult<u64> {
        let mut collections = self.lock()?;
        match batch {
            RecordBatch::Questions(records) => collections.questions.extend_from_slice(records),
            RecordBatch::Trends(records) => collections.trends.extend_from_slice(records),
        }
        Ok(batch.len() as u64)
    }
}
