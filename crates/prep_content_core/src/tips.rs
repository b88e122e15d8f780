//! crates/prep_content_core/src/tips.rs
//!
//! The daily tip list. Tips are never persisted; consumers read them straight
//! from the catalog.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const BUILTIN_TIPS: &[&str] = &[
    "Research the company's products and recent news before every interview.",
    "Use the STAR method (Situation, Task, Action, Result) for behavioral answers.",
    "Think out loud while solving coding problems so the interviewer can follow you.",
    "Prepare two or three thoughtful questions to ask at the end of the interview.",
    "Practice explaining your past projects in under two minutes.",
    "Clarify requirements and edge cases before you start writing code.",
    "Test your camera, microphone and connection before a remote interview.",
    "Send a short thank-you note within a day of the interview.",
    "Review the job description and map each requirement to an example from your experience.",
    "Get a good night's sleep; fatigue costs more than one extra hour of revision.",
];

/// A fixed, ordered list of daily preparation tips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyTips(Vec<String>);

impl DailyTips {
    pub fn new(tips: Vec<String>) -> Self {
        Self(tips)
    }

    pub fn builtin() -> Self {
        Self(BUILTIN_TIPS.iter().map(|tip| tip.to_string()).collect())
    }

    pub fn all(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The tip for a given day number; the list wraps around.
    pub fn tip_for_day(&self, day: u64) -> Option<&str> {
        if self.0.is_empty() {
            return None;
        }
        let index = (day % self.0.len() as u64) as usize;
        Some(self.0[index].as_str())
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.0.choose(rng).map(String::as_str)
    }
}

impl Default for DailyTips {
    fn default() -> Self {
        Self::builtin()
    }
}
