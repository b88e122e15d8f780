pub mod catalog;
pub mod domain;
pub mod error;
pub mod memory;
pub mod ports;
pub mod seeder;
pub mod tips;
pub mod validation;

pub use catalog::{RejectedRecord, SeedCatalog, DEFAULT_JITTER_SEED};
pub use domain::{
    ContentKind, DataPoint, Difficulty, InterviewQuestion, QuestionCategory, TechTrend,
    TrendCategory,
};
pub use error::{CatalogError, SeedError};
pub use memory::InMemoryContentStore;
pub use ports::{ContentStore, PortError, PortResult, RecordBatch};
pub use seeder::{FailurePolicy, KindOutcome, SeedOptions, SeedReport, Seeder};
pub use tips::DailyTips;
