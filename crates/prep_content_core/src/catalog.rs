//! crates/prep_content_core/src/catalog.rs
//!
//! The embedded content catalog and the loader for operator-supplied catalogs.
//!
//! Trend series are generated from a declared score and monthly change plus a
//! small random jitter. The jitter comes from a seeded PRNG so that the same
//! seed always produces the same catalog.

use std::collections::BTreeSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::{
    curated_source, ContentKind, DataPoint, Difficulty, InterviewQuestion, QuestionCategory,
    TechTrend, TrendCategory, CURATED_SOURCE,
};
use crate::error::CatalogError;
use crate::tips::DailyTips;
use crate::validation::{MAX_POINT_VALUE, MIN_POINT_VALUE};

/// Chronological labels of every generated series.
pub const SERIES_LABELS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

/// Maximum absolute jitter applied to a generated sample.
pub const SERIES_JITTER: i32 = 5;

/// Seed used when none is configured.
pub const DEFAULT_JITTER_SEED: u64 = 20_240_601;

//=========================================================================================
// The Catalog
//=========================================================================================

/// Everything one seeding run writes (and the tips it only reports).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCatalog {
    pub questions: Vec<InterviewQuestion>,
    pub trends: Vec<TechTrend>,
    pub tips: DailyTips,
    /// Catalog-file entries that could not be read as a record of their kind.
    /// Each one fails its kind when seeded; the other kind is unaffected.
    pub rejected: Vec<RejectedRecord>,
}

/// A catalog-file entry with a missing or mistyped attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub kind: ContentKind,
    /// Position of the entry in the file's array for `kind`.
    pub index: usize,
    pub message: String,
}

impl SeedCatalog {
    /// The embedded catalog, with trend series jittered from `jitter_seed`.
    pub fn builtin(jitter_seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(jitter_seed);
        Self {
            questions: builtin_questions(),
            trends: BUILTIN_TRENDS
                .iter()
                .map(|seed| seed.to_trend(&mut rng))
                .collect(),
            tips: DailyTips::builtin(),
            rejected: Vec::new(),
        }
    }

    /// The lowest-indexed rejected entry of `kind`, if any.
    pub fn first_rejected(&self, kind: ContentKind) -> Option<&RejectedRecord> {
        self.rejected.iter().find(|record| record.kind == kind)
    }

    /// Loads a catalog from a JSON file.
    ///
    /// Trends without explicit `data_points` get a generated series; a missing
    /// `tips` array falls back to the built-in tips. Only a file that is not
    /// JSON, or whose top level has the wrong shape, is an error here; single
    /// entries that do not fit their kind end up in `rejected`.
    pub fn from_json_file(path: &Path, jitter_seed: u64) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, jitter_seed).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(raw: &str, jitter_seed: u64) -> Result<Self, serde_json::Error> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        let mut rng = StdRng::seed_from_u64(jitter_seed);
        let mut rejected = Vec::new();

        let questions = read_records(
            file.questions,
            ContentKind::InterviewQuestions,
            &mut rejected,
        );
        let trends = read_records::<TrendEntry>(file.trends, ContentKind::TechTrends, &mut rejected)
            .into_iter()
            .map(|entry| entry.into_trend(&mut rng))
            .collect();

        Ok(Self {
            questions,
            trends,
            tips: file.tips.unwrap_or_default(),
            rejected,
        })
    }
}

/// Converts each raw entry on its own so one bad entry cannot sink the file.
fn read_records<T: DeserializeOwned>(
    entries: Vec<serde_json::Value>,
    kind: ContentKind,
    rejected: &mut Vec<RejectedRecord>,
) -> Vec<T> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(err) => {
                rejected.push(RejectedRecord {
                    kind,
                    index,
                    message: err.to_string(),
                });
                None
            }
        })
        .collect()
}

//=========================================================================================
// Trend Series Generation
//=========================================================================================

/// Generates one sample per label in [`SERIES_LABELS`], ending near `trend_score`.
///
/// Every value is clamped to `[MIN_POINT_VALUE, MAX_POINT_VALUE]` after jitter.
pub fn generate_series<R: Rng + ?Sized>(
    trend_score: u8,
    monthly_change: i16,
    rng: &mut R,
) -> Vec<DataPoint> {
    let last = SERIES_LABELS.len() as i32 - 1;
    SERIES_LABELS
        .iter()
        .enumerate()
        .map(|(month, label)| {
            let months_back = last - month as i32;
            let base = i32::from(trend_score) - months_back * i32::from(monthly_change);
            let jitter = rng.random_range(-SERIES_JITTER..=SERIES_JITTER);
            let value = (base + jitter).clamp(i32::from(MIN_POINT_VALUE), i32::from(MAX_POINT_VALUE));
            DataPoint {
                label: (*label).to_string(),
                value: value as u8,
            }
        })
        .collect()
}

/// A built-in trend before its series is generated.
#[derive(Debug, Clone, Copy)]
pub struct TrendSeed {
    pub title: &'static str,
    pub category: TrendCategory,
    pub trend_score: u8,
    pub description: &'static str,
    pub monthly_change: i16,
}

impl TrendSeed {
    pub fn to_trend<R: Rng + ?Sized>(&self, rng: &mut R) -> TechTrend {
        TechTrend {
            title: self.title.to_string(),
            category: self.category,
            trend_score: self.trend_score,
            description: self.description.to_string(),
            data_points: generate_series(self.trend_score, self.monthly_change, rng),
            source: CURATED_SOURCE.to_string(),
        }
    }
}

//=========================================================================================
// JSON Catalog File Shape
//=========================================================================================

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    questions: Vec<serde_json::Value>,
    #[serde(default)]
    trends: Vec<serde_json::Value>,
    tips: Option<DailyTips>,
}

#[derive(Deserialize)]
struct TrendEntry {
    title: String,
    category: TrendCategory,
    trend_score: u8,
    description: String,
    data_points: Option<Vec<DataPoint>>,
    monthly_change: Option<i16>,
    #[serde(default = "curated_source")]
    source: String,
}

impl TrendEntry {
    fn into_trend<R: Rng + ?Sized>(self, rng: &mut R) -> TechTrend {
        let data_points = match self.data_points {
            Some(points) => points,
            None => generate_series(self.trend_score, self.monthly_change.unwrap_or(0), rng),
        };
        TechTrend {
            title: self.title,
            category: self.category,
            trend_score: self.trend_score,
            description: self.description,
            data_points,
            source: self.source,
        }
    }
}

//=========================================================================================
// Built-in Datasets
//=========================================================================================

const BUILTIN_TRENDS: &[TrendSeed] = &[
    TrendSeed {
        title: "Rust",
        category: TrendCategory::Language,
        trend_score: 88,
        description: "Memory-safe systems programming is moving into infrastructure, browsers and kernels.",
        monthly_change: 3,
    },
    TrendSeed {
        title: "TypeScript",
        category: TrendCategory::Language,
        trend_score: 92,
        description: "Typed JavaScript has become the default for large front-end and Node.js codebases.",
        monthly_change: 1,
    },
    TrendSeed {
        title: "React",
        category: TrendCategory::Framework,
        trend_score: 85,
        description: "Still the most requested front-end library, with server components gaining ground.",
        monthly_change: 0,
    },
    TrendSeed {
        title: "Kubernetes",
        category: TrendCategory::Tool,
        trend_score: 79,
        description: "Container orchestration skills remain a staple of platform and DevOps roles.",
        monthly_change: 1,
    },
    TrendSeed {
        title: "Generative AI",
        category: TrendCategory::Domain,
        trend_score: 96,
        description: "LLM integration, retrieval and evaluation are the fastest growing skill set in job posts.",
        monthly_change: 6,
    },
    TrendSeed {
        title: "jQuery",
        category: TrendCategory::Framework,
        trend_score: 22,
        description: "Mostly encountered in legacy maintenance; new projects rarely adopt it.",
        monthly_change: -2,
    },
];

fn tags(labels: &[&str]) -> BTreeSet<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

fn question(
    question: &str,
    answer: &str,
    category: QuestionCategory,
    difficulty: Difficulty,
    labels: &[&str],
) -> InterviewQuestion {
    InterviewQuestion {
        question: question.to_string(),
        answer: answer.to_string(),
        category,
        difficulty,
        tags: tags(labels),
        source: CURATED_SOURCE.to_string(),
    }
}

fn builtin_questions() -> Vec<InterviewQuestion> {
    use Difficulty::*;
    use QuestionCategory::*;

    vec![
        question(
            "What is the difference between a process and a thread?",
            "A process owns its own address space and resources; threads run inside a process and share its memory, so they are cheaper to create but need synchronisation.",
            Technical,
            Easy,
            &["operating-systems", "concurrency"],
        ),
        question(
            "Explain how a hash map handles collisions.",
            "Colliding keys are stored either in per-bucket chains or by probing for the next free slot; the table is resized when the load factor grows too high.",
            Technical,
            Medium,
            &["data-structures", "hashing"],
        ),
        question(
            "How would you design a URL shortener?",
            "Generate a short unique key per URL, store the mapping in a key-value store, put a cache in front of reads, and redirect with HTTP 301/302.",
            Technical,
            Hard,
            &["system-design", "scalability"],
        ),
        question(
            "What does idempotent mean for an HTTP API?",
            "Repeating the same request has the same effect on the server as sending it once; GET, PUT and DELETE are expected to be idempotent.",
            Technical,
            Medium,
            &["http", "api-design"],
        ),
        question(
            "Tell me about a time you disagreed with a teammate.",
            "Describe the situation, how you listened to their view, the data you used to reach agreement, and what the outcome taught you.",
            Behavioral,
            Medium,
            &["teamwork", "conflict"],
        ),
        question(
            "Describe a project that failed and what you learned.",
            "Own your part of the failure, explain the root cause, and focus on the concrete changes you made afterwards.",
            Behavioral,
            Hard,
            &["self-awareness", "growth"],
        ),
        question(
            "Why do you want to work here?",
            "Connect the company's mission and products to your own experience and goals; show you researched the role.",
            Hr,
            Easy,
            &["motivation"],
        ),
        question(
            "What are your salary expectations?",
            "Give a researched range based on the market and the role, and stay open to discussing the full compensation package.",
            Hr,
            Medium,
            &["negotiation"],
        ),
        question(
            "A train travels 120 km in 1.5 hours. What is its average speed?",
            "Average speed is distance over time: 120 / 1.5 = 80 km/h.",
            Aptitude,
            Easy,
            &["arithmetic"],
        ),
        question(
            "If 5 machines make 5 widgets in 5 minutes, how long do 100 machines take to make 100 widgets?",
            "Five minutes: each machine makes one widget in five minutes, so 100 machines make 100 widgets in the same time.",
            Aptitude,
            Medium,
            &["logic", "ratios"],
        ),
    ]
}
