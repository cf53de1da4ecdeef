//! Low-stakes decision maker.
//!
//! The knowledge-gain override is checked before the purchase override, so
//! a question mentioning both "learn" and "buy" gets the attendance verdict.

use serde::{Deserialize, Serialize};

use super::Assistant;
use crate::classifier::contains_any;

const NETWORKING: &[&str] = &["conference", "meet", "network", "event", "call"];
const KNOWLEDGE: &[&str] = &["learn", "workshop", "course", "deep dive", "technical"];
const LOGISTICS: &[&str] = &["travel", "flight", "hotel", "schedule"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalLevel {
    High,
    Medium,
    Low,
}

impl SignalLevel {
    fn high_or_low(flag: bool) -> Self {
        if flag {
            SignalLevel::High
        } else {
            SignalLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionAnalysis {
    pub networking_required: SignalLevel,
    pub new_knowledge: SignalLevel,
    pub logistical_drag: SignalLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub analysis: DecisionAnalysis,
    pub verdict: String,
}

/// Decide on a free-text question.
pub fn decide(question: &str) -> Decision {
    let text = question.to_lowercase();
    let networking = contains_any(&text, NETWORKING);
    let knowledge_gain = contains_any(&text, KNOWLEDGE);
    let logistics = contains_any(&text, LOGISTICS);

    let verdict = if knowledge_gain && !networking {
        "Attend only if recordings aren't available. Otherwise stream at 2x."
    } else if !networking && text.contains("buy") {
        "Purchase if it accelerates automation. Otherwise pass."
    } else {
        "Skip. Watch recordings at 2x speed instead."
    };

    let logistical_drag = if networking {
        SignalLevel::High
    } else if logistics {
        SignalLevel::Medium
    } else {
        SignalLevel::Low
    };

    Decision {
        analysis: DecisionAnalysis {
            networking_required: SignalLevel::high_or_low(networking),
            new_knowledge: SignalLevel::high_or_low(knowledge_gain),
            logistical_drag,
        },
        verdict: verdict.to_string(),
    }
}

impl Assistant {
    /// Decide on a question. Nothing is persisted.
    pub fn decide(&self, question: &str) -> Decision {
        decide(question)
    }
}
