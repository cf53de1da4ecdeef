//! Keyword classifier for free-text task descriptions.
//!
//! Maps a description onto a [`SignalVector`] using case-insensitive
//! substring matches against fixed keyword groups. There is no word-boundary
//! handling: "rebuild" counts as "build" and "modelling" as "model".

use serde::{Deserialize, Serialize};

use crate::scoring;

const STIMULATING: &[&str] = &["build", "design", "architect", "engine", "model", "algorithm"];
const NOVEL: &[&str] = &["research", "experiment", "novel"];
const SYSTEMIC: &[&str] = &["optimize", "refactor", "system", "pipeline", "automation", "framework"];
const AUTOMATABLE: &[&str] = &["automate", "automation", "script", "template", "bot"];
const ROUTINE: &[&str] = &["repeat", "daily", "weekly", "boring", "manual"];
const SOCIAL: &[&str] = &["email", "call", "meeting", "customer", "client", "interview", "conference"];
const SEMI_SOCIAL: &[&str] = &["review", "feedback", "sync"];
const REPETITIVE: &[&str] = &["again", "follow up", "respond", "update", "report"];
const UPKEEP: &[&str] = &["debug", "fix", "maintain"];

/// The five signals derived from a description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalVector {
    pub intellectual_stimulation: i64,
    pub system_building: i64,
    pub automation_potential: i64,
    pub human_interaction: i64,
    pub repetition: i64,
}

impl SignalVector {
    /// Priority score for these signals (repetition does not contribute).
    pub fn priority(&self) -> i64 {
        scoring::priority(
            self.intellectual_stimulation,
            self.system_building,
            self.automation_potential,
            self.human_interaction,
        )
    }
}

/// Returns true if `haystack` contains any of `keywords`.
///
/// `haystack` must already be lowercased.
pub(crate) fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

/// Classify a description.
///
/// Rules run in a fixed order; the last three only fill signals that are
/// still zero after the keyword groups.
pub fn classify(description: &str) -> SignalVector {
    let text = description.to_lowercase();
    let mut signals = SignalVector::default();

    if contains_any(&text, STIMULATING) {
        signals.intellectual_stimulation = 2;
    }
    if contains_any(&text, NOVEL) {
        signals.intellectual_stimulation = signals.intellectual_stimulation.max(3);
    }
    if contains_any(&text, SYSTEMIC) {
        signals.system_building = 2;
    }
    if contains_any(&text, AUTOMATABLE) {
        signals.automation_potential = 3;
    } else if contains_any(&text, ROUTINE) {
        signals.automation_potential = 2;
    }
    if contains_any(&text, SOCIAL) {
        signals.human_interaction = 3;
    } else if contains_any(&text, SEMI_SOCIAL) {
        signals.human_interaction = 2;
    }
    if contains_any(&text, REPETITIVE) {
        signals.repetition = 1;
    }

    if signals.intellectual_stimulation == 0 && contains_any(&text, UPKEEP) {
        signals.intellectual_stimulation = 1;
    }
    if signals.system_building == 0 && text.contains("build") {
        signals.system_building = 1;
    }
    if signals.automation_potential == 0 && signals.repetition == 1 {
        signals.automation_potential = 2;
    }

    signals
}
