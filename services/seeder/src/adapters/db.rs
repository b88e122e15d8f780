//! services/seeder/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ContentStore` port from the core crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prep_content_core::domain::{ContentKind, DataPoint, InterviewQuestion, TechTrend};
use prep_content_core::ports::{ContentStore, PortError, PortResult, RecordBatch};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Columns bound per `interview_questions` row; the wider of the two tables.
const QUESTION_COLUMNS: usize = 8;

/// Largest batch that stays under PostgreSQL's 65535 bind-parameter limit.
pub const MAX_BATCH_ROWS: usize = u16::MAX as usize / QUESTION_COLUMNS;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ContentStore` port.
#[derive(Clone, Debug)]
pub struct PgContentStore {
    pool: PgPool,
    /// Stamped on every row written through this adapter instance.
    seeded_at: DateTime<Utc>,
}

impl PgContentStore {
    /// Creates a new `PgContentStore`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            seeded_at: Utc::now(),
        }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn count(&self, kind: ContentKind) -> PortResult<u64> {
        let query = format!("SELECT COUNT(*) FROM {}", kind.collection());
        let (count,): (i64,) = sqlx::query_as(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count as u64)
    }

    /// Reads back every stored question, ordered by question text.
    pub async fn fetch_questions(&self) -> PortResult<Vec<InterviewQuestion>> {
        sqlx::query_as::<_, QuestionRecord>(
            "SELECT question, answer, category, difficulty, tags, source \
             FROM interview_questions ORDER BY question",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .into_iter()
        .map(QuestionRecord::to_domain)
        .collect()
    }

    /// Reads back every stored trend, ordered by title.
    pub async fn fetch_trends(&self) -> PortResult<Vec<TechTrend>> {
        sqlx::query_as::<_, TrendRecord>(
            "SELECT title, category, trend_score, description, data_points, source \
             FROM tech_trends ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .into_iter()
        .map(TrendRecord::to_domain)
        .collect()
    }

    async fn insert_questions(&self, records: &[InterviewQuestion]) -> Result<u64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO interview_questions \
             (id, question, answer, category, difficulty, tags, source, seeded_at) ",
        );
        builder.push_values(records, |mut row, q| {
            row.push_bind(Uuid::new_v4())
                .push_bind(&q.question)
                .push_bind(&q.answer)
                .push_bind(q.category.as_str())
                .push_bind(q.difficulty.as_str())
                .push_bind(q.tags.iter().cloned().collect::<Vec<String>>())
                .push_bind(&q.source)
                .push_bind(self.seeded_at);
        });
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn insert_trends(&self, records: &[TechTrend]) -> Result<u64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO tech_trends \
             (id, title, category, trend_score, description, data_points, source, seeded_at) ",
        );
        builder.push_values(records, |mut row, t| {
            row.push_bind(Uuid::new_v4())
                .push_bind(&t.title)
                .push_bind(t.category.as_str())
                .push_bind(i16::from(t.trend_score))
                .push_bind(&t.description)
                .push_bind(Json(&t.data_points))
                .push_bind(&t.source)
                .push_bind(self.seeded_at);
        });
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Sorts a driver error into the port's failure classes.
fn map_sqlx_error(e: sqlx::Error) -> PortError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => PortError::Unavailable(e.to_string()),
        sqlx::Error::Database(_) => PortError::Rejected(e.to_string()),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct QuestionRecord {
    question: String,
    answer: String,
    category: String,
    difficulty: String,
    tags: Vec<String>,
    source: String,
}
impl QuestionRecord {
    fn to_domain(self) -> PortResult<InterviewQuestion> {
        Ok(InterviewQuestion {
            question: self.question,
            answer: self.answer,
            category: self.category.parse().map_err(PortError::Unexpected)?,
            difficulty: self.difficulty.parse().map_err(PortError::Unexpected)?,
            tags: self.tags.into_iter().collect(),
            source: self.source,
        })
    }
}

#[derive(FromRow)]
struct TrendRecord {
    title: String,
    category: String,
    trend_score: i16,
    description: String,
    data_points: Json<Vec<DataPoint>>,
    source: String,
}
impl TrendRecord {
    fn to_domain(self) -> PortResult<TechTrend> {
        let trend_score = u8::try_from(self.trend_score).map_err(|_| {
            PortError::Unexpected(format!("trend score {} out of range", self.trend_score))
        })?;
        Ok(TechTrend {
            title: self.title,
            category: self.category.parse().map_err(PortError::Unexpected)?,
            trend_score,
            description: self.description,
            data_points: self.data_points.0,
            source: self.source,
        })
    }
}

//=========================================================================================
// `ContentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentStore for PgContentStore {
    async fn delete_all(&self, kind: ContentKind) -> PortResult<u64> {
        let query = format!("DELETE FROM {}", kind.collection());
        let result = sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn insert_batch(&self, batch: RecordBatch<'_>) -> PortResult<u64> {
        if batch.is_empty() {
            return Ok(0);
        }
        let written = match batch {
            RecordBatch::Questions(records) => self.insert_questions(records).await,
            RecordBatch::Trends(records) => self.insert_trends(records).await,
        };
        written.map_err(map_sqlx_error)
    }
}
