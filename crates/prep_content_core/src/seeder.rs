//! crates/prep_content_core/src/seeder.rs
//!
//! Brings the persisted content collections into agreement with a catalog.
//!
//! Each kind is replaced in full: validate every record, delete every stored
//! record, then insert the catalog in batches. There is no diffing and no
//! transaction spanning the delete and the inserts, so a failure after the
//! delete leaves the kind degraded until the next successful run.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::catalog::SeedCatalog;
use crate::domain::{ContentKind, InterviewQuestion, TechTrend};
use crate::error::SeedError;
use crate::ports::{ContentStore, PortError, RecordBatch};

pub const DEFAULT_BATCH_SIZE: usize = 500;

//=========================================================================================
// Options
//=========================================================================================

/// What happens to the remaining kinds once one kind fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Every kind is attempted regardless of failures in the others.
    #[default]
    Independent,
    /// The whole catalog is validated before anything is deleted, and the run
    /// stops at the first store failure.
    AllOrNothing,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(Self::Independent),
            "all-or-nothing" | "all_or_nothing" => Ok(Self::AllOrNothing),
            other => Err(format!(
                "'{other}' is not a failure policy (expected 'independent' or 'all-or-nothing')"
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Independent => f.write_str("independent"),
            Self::AllOrNothing => f.write_str("all-or-nothing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    pub policy: FailurePolicy,
    /// Maximum records per insert call. Zero is treated as one.
    pub batch_size: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

//=========================================================================================
// Report
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSummary {
    pub removed: u64,
    pub inserted: u64,
}

#[derive(Debug)]
pub enum KindOutcome {
    Seeded(KindSummary),
    Failed(SeedError),
    /// Not attempted because an earlier kind failed under `AllOrNothing`.
    Skipped,
}

#[derive(Debug)]
pub struct KindReport {
    pub kind: ContentKind,
    pub outcome: KindOutcome,
}

/// Per-kind results of one seeding run.
#[derive(Debug)]
pub struct SeedReport {
    pub kinds: Vec<KindReport>,
    /// Size of the (non-persisted) daily tip list offered to consumers.
    pub tips_available: usize,
}

impl SeedReport {
    pub fn is_success(&self) -> bool {
        self.kinds
            .iter()
            .all(|report| matches!(report.outcome, KindOutcome::Seeded(_)))
    }

    pub fn outcome(&self, kind: ContentKind) -> Option<&KindOutcome> {
        self.kinds
            .iter()
            .find(|report| report.kind == kind)
            .map(|report| &report.outcome)
    }

    /// Records written for `kind`, if it was seeded successfully.
    pub fn inserted(&self, kind: ContentKind) -> Option<u64> {
        match self.outcome(kind) {
            Some(KindOutcome::Seeded(summary)) => Some(summary.inserted),
            _ => None,
        }
    }

    pub fn errors(&self) -> impl DoubleEndedIterator<Item = &SeedError> {
        self.kinds.iter().filter_map(|report| match &report.outcome {
            KindOutcome::Failed(err) => Some(err),
            _ => None,
        })
    }

    /// The most severe error in the report; the first one wins a tie.
    pub fn worst_error(&self) -> Option<&SeedError> {
        self.errors().rev().max_by_key(|err| err.severity())
    }

    /// Collapses the report to its most severe error, if any.
    pub fn into_result(mut self) -> Result<Self, SeedError> {
        let worst = self.worst_error().map(SeedError::severity);
        let Some(position) = self.kinds.iter().position(|report| match &report.outcome {
            KindOutcome::Failed(err) => Some(err.severity()) == worst,
            _ => false,
        }) else {
            return Ok(self);
        };
        let KindOutcome::Failed(err) = self.kinds.swap_remove(position).outcome else {
            return Ok(self);
        };
        Err(err)
    }
}

//=========================================================================================
// Datasets
//=========================================================================================

/// Glue between a record type and the kind-agnostic replace procedure.
trait Dataset: Sized + Sync {
    const KIND: ContentKind;

    fn problems(&self) -> Vec<String>;

    fn batch(records: &[Self]) -> RecordBatch<'_>;
}

impl Dataset for InterviewQuestion {
    const KIND: ContentKind = ContentKind::InterviewQuestions;

    fn problems(&self) -> Vec<String> {
        InterviewQuestion::problems(self)
    }

    fn batch(records: &[Self]) -> RecordBatch<'_> {
        RecordBatch::Questions(records)
    }
}

impl Dataset for TechTrend {
    const KIND: ContentKind = ContentKind::TechTrends;

    fn problems(&self) -> Vec<String> {
        TechTrend::problems(self)
    }

    fn batch(records: &[Self]) -> RecordBatch<'_> {
        RecordBatch::Trends(records)
    }
}

fn validate_records<T: Dataset>(records: &[T]) -> Result<(), SeedError> {
    for (index, record) in records.iter().enumerate() {
        let problems = record.problems();
        if !problems.is_empty() {
            return Err(SeedError::Validation {
                kind: T::KIND,
                index,
                message: problems.join("; "),
            });
        }
    }
    Ok(())
}

//=========================================================================================
// The Seeder
//=========================================================================================

pub struct Seeder {
    store: Arc<dyn ContentStore>,
    catalog: SeedCatalog,
    options: SeedOptions,
}

impl Seeder {
    pub fn new(store: Arc<dyn ContentStore>, catalog: SeedCatalog, options: SeedOptions) -> Self {
        Self {
            store,
            catalog,
            options,
        }
    }

    pub fn catalog(&self) -> &SeedCatalog {
        &self.catalog
    }

    /// Validates every kind without touching the store.
    pub fn validate_catalog(&self) -> Result<(), SeedError> {
        self.validate(&self.catalog.questions)?;
        self.validate(&self.catalog.trends)?;
        Ok(())
    }

    /// Checks one kind: entries the catalog file could not read fail it before
    /// any field-level check runs.
    fn validate<T: Dataset>(&self, records: &[T]) -> Result<(), SeedError> {
        if let Some(rejected) = self.catalog.first_rejected(T::KIND) {
            return Err(SeedError::Validation {
                kind: T::KIND,
                index: rejected.index,
                message: rejected.message.clone(),
            });
        }
        validate_records(records)
    }

    /// Runs the seeding pass and fails with the most severe per-kind error.
    pub async fn run(&self) -> Result<SeedReport, SeedError> {
        self.run_detailed().await.into_result()
    }

    /// Runs the seeding pass, reporting the outcome of every kind.
    pub async fn run_detailed(&self) -> SeedReport {
        info!(
            policy = %self.options.policy,
            batch_size = self.options.batch_size,
            "Starting seeding run"
        );

        let mut kinds = Vec::with_capacity(ContentKind::ALL.len());

        if self.options.policy == FailurePolicy::AllOrNothing {
            if let Err(err) = self.validate_catalog() {
                warn!(error = %err, "Catalog rejected; no collection was touched");
                let failed_kind = err.kind();
                let mut err = Some(err);
                for kind in ContentKind::ALL {
                    let outcome = match err.take() {
                        Some(e) if kind == failed_kind => KindOutcome::Failed(e),
                        taken => {
                            err = taken;
                            KindOutcome::Skipped
                        }
                    };
                    kinds.push(KindReport { kind, outcome });
                }
                return self.finish(kinds);
            }
        }

        let mut halted = false;
        for kind in ContentKind::ALL {
            if halted {
                kinds.push(KindReport {
                    kind,
                    outcome: KindOutcome::Skipped,
                });
                continue;
            }

            let result = match kind {
                ContentKind::InterviewQuestions => self.replace(&self.catalog.questions).await,
                ContentKind::TechTrends => self.replace(&self.catalog.trends).await,
            };

            let outcome = match result {
                Ok(summary) => KindOutcome::Seeded(summary),
                Err(err) => {
                    log_failure(&err);
                    halted = self.options.policy == FailurePolicy::AllOrNothing;
                    KindOutcome::Failed(err)
                }
            };
            kinds.push(KindReport { kind, outcome });
        }

        self.finish(kinds)
    }

    fn finish(&self, kinds: Vec<KindReport>) -> SeedReport {
        let tips_available = self.catalog.tips.len();
        info!(count = tips_available, "Daily tips available (not persisted)");
        SeedReport {
            kinds,
            tips_available,
        }
    }

    /// Full replace of one kind: validate, delete, insert in batches.
    async fn replace<T: Dataset>(&self, records: &[T]) -> Result<KindSummary, SeedError> {
        let kind = T::KIND;
        self.validate(records)?;

        let removed = self
            .store
            .delete_all(kind)
            .await
            .map_err(|source| SeedError::StoreUnavailable { kind, source })?;
        info!(%kind, removed, "Removed previous records");

        let expected = records.len();
        let mut inserted = 0u64;
        for chunk in records.chunks(self.options.batch_size.max(1)) {
            let partial = |inserted: u64, source: PortError| SeedError::PartialWrite {
                kind,
                removed,
                inserted,
                expected,
                source,
            };

            let written = self
                .store
                .insert_batch(T::batch(chunk))
                .await
                .map_err(|source| partial(inserted, source))?;
            inserted += written;

            if written != chunk.len() as u64 {
                return Err(partial(
                    inserted,
                    PortError::Unexpected(format!(
                        "store acknowledged {written} of {} records",
                        chunk.len()
                    )),
                ));
            }
            debug!(%kind, inserted, expected, "Inserted batch");
        }

        info!(%kind, count = inserted, "Seeded collection");
        Ok(KindSummary { removed, inserted })
    }
}

fn log_failure(err: &SeedError) {
    match err {
        SeedError::PartialWrite {
            kind,
            removed,
            inserted,
            expected,
            ..
        } => error!(
            %kind,
            removed,
            inserted,
            expected,
            error = %err,
            "Collection is DEGRADED: previous records were removed but the catalog was not fully written; re-run the seeder"
        ),
        SeedError::StoreUnavailable { kind, .. } => {
            error!(%kind, error = %err, "Store unavailable; collection left unchanged")
        }
        SeedError::Validation { kind, .. } => {
            warn!(%kind, error = %err, "Catalog rejected; collection left unchanged")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RejectedRecord;
    use crate::domain::{DataPoint, Difficulty, QuestionCategory, TrendCategory, CURATED_SOURCE};
    use crate::memory::InMemoryContentStore;
    use crate::tips::DailyTips;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn question(n: usize) -> InterviewQuestion {
        InterviewQuestion {
            question: format!("Question {n}?"),
            answer: format!("Answer {n}."),
            category: QuestionCategory::Technical,
            difficulty: Difficulty::Easy,
            tags: ["basics".to_string()].into_iter().collect(),
            source: CURATED_SOURCE.to_string(),
        }
    }

    fn trend(n: usize) -> TechTrend {
        TechTrend {
            title: format!("Trend {n}"),
            category: TrendCategory::Tool,
            trend_score: 50,
            description: "A tool".to_string(),
            data_points: vec![
                DataPoint { label: "Jan".to_string(), value: 45 },
                DataPoint { label: "Feb".to_string(), value: 50 },
            ],
            source: CURATED_SOURCE.to_string(),
        }
    }

    fn catalog(questions: usize, trends: usize) -> SeedCatalog {
        SeedCatalog {
            questions: (0..questions).map(question).collect(),
            trends: (0..trends).map(trend).collect(),
            tips: DailyTips::builtin(),
            rejected: Vec::new(),
        }
    }

    fn stale_store() -> Arc<InMemoryContentStore> {
        let mut q = question(100);
        q.question = "Manually inserted".to_string();
        let mut t = trend(100);
        t.title = "Manual trend".to_string();
        Arc::new(InMemoryContentStore::with_records(
            vec![q.clone(), q],
            vec![t.clone(), t.clone(), t],
        ))
    }

    fn seeder(store: Arc<dyn ContentStore>, catalog: SeedCatalog, options: SeedOptions) -> Seeder {
        Seeder::new(store, catalog, options)
    }

    /// Wraps the in-memory store and fails on command.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryContentStore,
        fail_delete: Option<ContentKind>,
        /// Fail every insert of the given kind once this many insert calls,
        /// counted across both kinds, have been made.
        fail_insert: Option<(ContentKind, usize)>,
        insert_calls: AtomicUsize,
        delete_calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentStore for FlakyStore {
        async fn delete_all(&self, kind: ContentKind) -> crate::ports::PortResult<u64> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete == Some(kind) {
                return Err(PortError::Unavailable("connection refused".to_string()));
            }
            self.inner.delete_all(kind).await
        }

        async fn insert_batch(&self, batch: RecordBatch<'_>) -> crate::ports::PortResult<u64> {
            let call = self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if let Some((kind, at)) = self.fail_insert {
                if kind == batch.kind() && call >= at {
                    return Err(PortError::Unavailable("connection reset".to_string()));
                }
            }
            self.inner.insert_batch(batch).await
        }
    }

    #[tokio::test]
    async fn reports_counts_and_stores_exactly_the_catalog() {
        let store = Arc::new(InMemoryContentStore::new());
        let report = seeder(store.clone(), catalog(7, 3), SeedOptions::default())
            .run()
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.inserted(ContentKind::InterviewQuestions), Some(7));
        assert_eq!(report.inserted(ContentKind::TechTrends), Some(3));
        assert_eq!(store.count(ContentKind::InterviewQuestions), 7);
        assert_eq!(store.count(ContentKind::TechTrends), 3);
        assert_eq!(store.questions(), catalog(7, 3).questions);
        assert_eq!(store.trends(), catalog(7, 3).trends);
    }

    #[tokio::test]
    async fn running_twice_is_idempotent() {
        let store = Arc::new(InMemoryContentStore::new());
        let s = seeder(store.clone(), catalog(4, 2), SeedOptions::default());

        s.run().await.unwrap();
        let first = (store.questions(), store.trends());
        let report = s.run().await.unwrap();
        let second = (store.questions(), store.trends());

        assert_eq!(first, second);
        match report.outcome(ContentKind::InterviewQuestions) {
            Some(KindOutcome::Seeded(summary)) => assert_eq!(summary.removed, 4),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn pre_existing_records_are_replaced() {
        let store = stale_store();
        let report = seeder(store.clone(), catalog(2, 1), SeedOptions::default())
            .run()
            .await
            .unwrap();

        match report.outcome(ContentKind::TechTrends) {
            Some(KindOutcome::Seeded(summary)) => {
                assert_eq!(summary.removed, 3);
                assert_eq!(summary.inserted, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(store.questions().iter().all(|q| q.question != "Manually inserted"));
        assert_eq!(store.trends(), vec![trend(0)]);
    }

    #[tokio::test]
    async fn invalid_question_leaves_questions_untouched_but_seeds_trends() {
        let store = stale_store();
        let before = store.questions();
        let mut bad = catalog(3, 2);
        bad.questions[1].question = String::new();

        let report = seeder(store.clone(), bad, SeedOptions::default())
            .run_detailed()
            .await;

        assert!(!report.is_success());
        match report.outcome(ContentKind::InterviewQuestions) {
            Some(KindOutcome::Failed(SeedError::Validation { index, .. })) => assert_eq!(*index, 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(report.inserted(ContentKind::TechTrends), Some(2));
        assert_eq!(store.questions(), before);
        assert_eq!(store.count(ContentKind::TechTrends), 2);

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, SeedError::Validation { .. }));
        assert_eq!(err.exit_code(), 65);
    }

    #[tokio::test]
    async fn unreadable_question_entry_fails_questions_but_seeds_trends() {
        let store = stale_store();
        let before = store.questions();
        let raw = r#"{
            "questions": [{ "question": "No answer?", "category": "technical", "difficulty": "easy" }],
            "trends": [{
                "title": "Deno",
                "category": "tool",
                "trend_score": 40,
                "description": "JavaScript runtime.",
                "monthly_change": 2
            }]
        }"#;
        let catalog = SeedCatalog::from_json_str(raw, 7).unwrap();

        let report = seeder(store.clone(), catalog, SeedOptions::default())
            .run_detailed()
            .await;

        match report.outcome(ContentKind::InterviewQuestions) {
            Some(KindOutcome::Failed(SeedError::Validation { index, message, .. })) => {
                assert_eq!(*index, 0);
                assert!(message.contains("answer"), "{message}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(store.questions(), before);
        assert_eq!(report.inserted(ContentKind::TechTrends), Some(1));
        assert_eq!(store.trends()[0].title, "Deno");
    }

    #[tokio::test]
    async fn all_or_nothing_rejects_unreadable_entries_before_deleting() {
        let store = stale_store();
        let before = (store.questions(), store.trends());
        let mut bad = catalog(1, 1);
        bad.rejected.push(RejectedRecord {
            kind: ContentKind::TechTrends,
            index: 3,
            message: "missing field `title`".to_string(),
        });
        let options = SeedOptions {
            policy: FailurePolicy::AllOrNothing,
            ..SeedOptions::default()
        };

        let err = seeder(store.clone(), bad, options).run().await.unwrap_err();

        assert!(matches!(
            err,
            SeedError::Validation { kind: ContentKind::TechTrends, index: 3, .. }
        ));
        assert_eq!((store.questions(), store.trends()), before);
    }

    #[tokio::test]
    async fn all_or_nothing_touches_nothing_when_any_kind_is_invalid() {
        let store = stale_store();
        let before = (store.questions(), store.trends());
        let mut bad = catalog(3, 2);
        bad.trends[0].data_points[0].value = 101;

        let options = SeedOptions {
            policy: FailurePolicy::AllOrNothing,
            ..SeedOptions::default()
        };
        let report = seeder(store.clone(), bad, options).run_detailed().await;

        assert!(matches!(
            report.outcome(ContentKind::InterviewQuestions),
            Some(KindOutcome::Skipped)
        ));
        assert!(matches!(
            report.outcome(ContentKind::TechTrends),
            Some(KindOutcome::Failed(SeedError::Validation { .. }))
        ));
        assert_eq!((store.questions(), store.trends()), before);
    }

    #[tokio::test]
    async fn delete_failure_is_store_unavailable_and_keeps_records() {
        let store = Arc::new(FlakyStore {
            inner: InMemoryContentStore::with_records(vec![question(9)], vec![]),
            fail_delete: Some(ContentKind::InterviewQuestions),
            ..FlakyStore::default()
        });

        let report = seeder(store.clone(), catalog(2, 2), SeedOptions::default())
            .run_detailed()
            .await;

        assert!(matches!(
            report.outcome(ContentKind::InterviewQuestions),
            Some(KindOutcome::Failed(SeedError::StoreUnavailable { .. }))
        ));
        assert_eq!(store.inner.questions(), vec![question(9)]);
        assert_eq!(report.inserted(ContentKind::TechTrends), Some(2));
        assert_eq!(report.into_result().unwrap_err().exit_code(), 69);
    }

    #[tokio::test]
    async fn insert_failure_after_delete_is_a_partial_write() {
        let store = Arc::new(FlakyStore {
            inner: InMemoryContentStore::with_records(vec![question(9)], vec![]),
            fail_insert: Some((ContentKind::InterviewQuestions, 2)),
            ..FlakyStore::default()
        });
        let options = SeedOptions {
            batch_size: 2,
            ..SeedOptions::default()
        };

        let err = seeder(store.clone(), catalog(5, 1), options)
            .run()
            .await
            .unwrap_err();

        match err {
            SeedError::PartialWrite {
                kind,
                removed,
                inserted,
                expected,
                ..
            } => {
                assert_eq!(kind, ContentKind::InterviewQuestions);
                assert_eq!(removed, 1);
                assert_eq!(inserted, 4);
                assert_eq!(expected, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.inner.count(ContentKind::InterviewQuestions), 4);
    }

    #[tokio::test]
    async fn all_or_nothing_stops_after_a_store_failure() {
        let store = Arc::new(FlakyStore {
            fail_delete: Some(ContentKind::InterviewQuestions),
            ..FlakyStore::default()
        });
        let options = SeedOptions {
            policy: FailurePolicy::AllOrNothing,
            ..SeedOptions::default()
        };

        let report = seeder(store.clone(), catalog(1, 1), options).run_detailed().await;

        assert!(matches!(
            report.outcome(ContentKind::TechTrends),
            Some(KindOutcome::Skipped)
        ));
        assert_eq!(store.delete_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.inner.count(ContentKind::TechTrends), 0);
    }

    #[tokio::test]
    async fn partial_write_outranks_other_failures() {
        let store = Arc::new(FlakyStore {
            fail_insert: Some((ContentKind::TechTrends, 0)),
            ..FlakyStore::default()
        });
        let mut bad = catalog(1, 1);
        bad.questions[0].answer = " ".to_string();

        let report = seeder(store, bad, SeedOptions::default()).run_detailed().await;
        assert!(matches!(
            report.worst_error(),
            Some(SeedError::PartialWrite { .. })
        ));

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, SeedError::PartialWrite { .. }));
        assert_eq!(err.exit_code(), 74);
    }

    #[tokio::test]
    async fn inserts_in_batches_of_the_configured_size() {
        let store = Arc::new(FlakyStore::default());
        let options = SeedOptions {
            batch_size: 3,
            ..SeedOptions::default()
        };

        seeder(store.clone(), catalog(7, 0), options).run().await.unwrap();

        // 7 questions in batches of 3, and no call for the empty trend catalog.
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.inner.count(ContentKind::InterviewQuestions), 7);
    }

    #[tokio::test]
    async fn zero_batch_size_still_inserts_everything() {
        let store = Arc::new(InMemoryContentStore::new());
        let options = SeedOptions {
            batch_size: 0,
            ..SeedOptions::default()
        };
        seeder(store.clone(), catalog(2, 2), options).run().await.unwrap();
        assert_eq!(store.count(ContentKind::InterviewQuestions), 2);
    }

    #[tokio::test]
    async fn tip_list_is_unaffected_by_seeding() {
        let store = Arc::new(InMemoryContentStore::new());
        let s = seeder(store, catalog(1, 1), SeedOptions::default());
        let before = s.catalog().tips.clone();

        let report = s.run().await.unwrap();

        assert_eq!(s.catalog().tips, before);
        assert_eq!(s.catalog().tips, DailyTips::builtin());
        assert_eq!(report.tips_available, before.len());
    }

    #[test]
    fn parses_failure_policies() {
        assert_eq!("independent".parse::<FailurePolicy>(), Ok(FailurePolicy::Independent));
        assert_eq!("All-Or-Nothing".parse::<FailurePolicy>(), Ok(FailurePolicy::AllOrNothing));
        assert!("sometimes".parse::<FailurePolicy>().is_err());
    }
}
