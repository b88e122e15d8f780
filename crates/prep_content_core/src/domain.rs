//! crates/prep_content_core/src/domain.rs
//!
//! Defines the pure data structures of the interview-preparation content.
//! These structs carry no storage identifiers; the store assigns its own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Provenance label stamped on every record of the built-in load.
pub const CURATED_SOURCE: &str = "curated";

pub(crate) fn curated_source() -> String {
    CURATED_SOURCE.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Technical,
    Behavioral,
    Hr,
    Aptitude,
}

impl QuestionCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Behavioral => "behavioral",
            Self::Hr => "hr",
            Self::Aptitude => "aptitude",
        }
    }
}

impl FromStr for QuestionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(Self::Technical),
            "behavioral" => Ok(Self::Behavioral),
            "hr" => Ok(Self::Hr),
            "aptitude" => Ok(Self::Aptitude),
            other => Err(format!("unknown question category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    Language,
    Framework,
    Tool,
    Domain,
}

impl TrendCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Framework => "framework",
            Self::Tool => "tool",
            Self::Domain => "domain",
        }
    }
}

impl FromStr for TrendCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "language" => Ok(Self::Language),
            "framework" => Ok(Self::Framework),
            "tool" => Ok(Self::Tool),
            "domain" => Ok(Self::Domain),
            other => Err(format!("unknown trend category '{other}'")),
        }
    }
}

/// A curated interview question with its model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub answer: String,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
    /// Short labels; a set, so ordering never matters.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default = "curated_source")]
    pub source: String,
}

/// One sample of a trend's time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: u8,
}

/// A technology trend with a chronologically ordered popularity series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTrend {
    pub title: String,
    pub category: TrendCategory,
    pub trend_score: u8,
    pub description: String,
    pub data_points: Vec<DataPoint>,
    #[serde(default = "curated_source")]
    pub source: String,
}

/// The persisted content kinds, in the order the seeder processes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    InterviewQuestions,
    TechTrends,
}

impl ContentKind {
    pub const ALL: [ContentKind; 2] = [ContentKind::InterviewQuestions, ContentKind::TechTrends];

    /// Name of the collection (table) holding this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::InterviewQuestions => "interview_questions",
            Self::TechTrends => "tech_trends",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}
