//! crates/prep_content_core/src/validation.rs
//!
//! Per-record catalog checks.
//!
//! Each check returns an empty `Vec` if the record is valid; otherwise a list of
//! human-readable problems.

use crate::domain::{InterviewQuestion, TechTrend};

/// Inclusive bounds every trend sample must fall within.
pub const MIN_POINT_VALUE: u8 = 10;
pub const MAX_POINT_VALUE: u8 = 100;

/// Upper bound of a trend's overall score.
pub const MAX_TREND_SCORE: u8 = 100;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl InterviewQuestion {
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if is_blank(&self.question) {
            problems.push("question text must not be empty".to_string());
        }
        if is_blank(&self.answer) {
            problems.push("answer must not be empty".to_string());
        }
        if is_blank(&self.source) {
            problems.push("source must not be empty".to_string());
        }
        if self.tags.iter().any(|tag| is_blank(tag)) {
            problems.push("tags must not contain empty labels".to_string());
        }

        problems
    }
}

impl TechTrend {
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if is_blank(&self.title) {
            problems.push("title must not be empty".to_string());
        }
        if is_blank(&self.description) {
            problems.push("description must not be empty".to_string());
        }
        if is_blank(&self.source) {
            problems.push("source must not be empty".to_string());
        }
        if self.trend_score > MAX_TREND_SCORE {
            problems.push(format!(
                "trend score must be between 0 and {MAX_TREND_SCORE}, got {}",
                self.trend_score
            ));
        }

        for point in &self.data_points {
            if is_blank(&point.label) {
                problems.push("data point label must not be empty".to_string());
            }
            if !(MIN_POINT_VALUE..=MAX_POINT_VALUE).contains(&point.value) {
                problems.push(format!(
                    "data point '{}' must be between {MIN_POINT_VALUE} and {MAX_POINT_VALUE}, got {}",
                    point.label, point.value
                ));
            }
        }

        problems
    }
}
