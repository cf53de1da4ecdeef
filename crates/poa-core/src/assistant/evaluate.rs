//! Ad hoc task evaluation.

use serde::{Deserialize, Serialize};

use super::Assistant;
use crate::classifier::{classify, contains_any, SignalVector};

/// Verdict on a free-text task description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEvaluation {
    pub score: i64,
    pub reason: String,
    pub alternative: String,
}

/// Score a description and explain the score.
pub fn evaluate_description(description: &str) -> TaskEvaluation {
    let signals = classify(description);

    let mut reasons = Vec::new();
    if signals.human_interaction != 0 {
        reasons.push("High human interaction");
    }
    if signals.intellectual_stimulation == 0 {
        reasons.push("Zero intellectual stimulation");
    }
    if signals.repetition != 0 {
        reasons.push("Repetitive nonsense");
    }
    if reasons.is_empty() {
        reasons.push("Finally something worthy");
    }

    TaskEvaluation {
        score: signals.priority(),
        reason: reasons.join(", "),
        alternative: suggest_alternative(description, &signals).to_string(),
    }
}

fn suggest_alternative(description: &str, signals: &SignalVector) -> &'static str {
    let text = description.to_lowercase();
    if signals.human_interaction >= 2 {
        "Automate the interaction – design a template or a bot and stop talking to humans"
    } else if contains_any(&text, &["document", "doc"]) {
        "Record a loom, auto-transcribe, and ship docs without typing"
    } else if signals.repetition != 0 {
        "Spend 90 minutes scripting it once, save yourself forever"
    } else {
        "Enhance the system – add a feedback loop or monitoring"
    }
}

impl Assistant {
    /// Evaluate an ad hoc description. Nothing is persisted.
    pub fn evaluate_task(&self, description: &str) -> TaskEvaluation {
        evaluate_description(description)
    }
}
