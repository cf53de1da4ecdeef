//! Cognitive load manager: rule-based triage of open loops.
//!
//! Rules, first match wins:
//! 1. "follow up" → delete
//! 2. "maybe" / "should" / "consider" → close, "Moved to /dev/null"
//! 3. "network" → close, "Number blocked"
//! 4. anything else stays open
//!
//! The decisions for one run are applied in a single transaction.

use serde::{Deserialize, Serialize};

use super::Assistant;
use crate::classifier::contains_any;
use crate::error::Result;
use crate::storage::TriageDecision;
use crate::task::OpenLoop;

const HEDGES: &[&str] = &["maybe", "should", "consider"];
const BASE_LOAD: i64 = 20;
const LOAD_PER_LOOP: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub load: i64,
    pub open_loops: usize,
    pub auto_closed: Vec<String>,
    pub remaining_focus: String,
    pub mode: String,
}

/// Outcome of triaging a set of loops, before anything is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriagePlan {
    pub decisions: Vec<TriageDecision>,
    /// Human-readable line per resolved loop.
    pub closed: Vec<String>,
    /// Descriptions left open, in input order.
    pub remaining: Vec<String>,
}

/// Decide what happens to each loop.
pub fn plan_triage(loops: &[OpenLoop]) -> TriagePlan {
    let mut plan = TriagePlan::default();
    for open_loop in loops {
        let text = open_loop.description.to_lowercase();
        let id = open_loop.id;
        if text.contains("follow up") {
            plan.decisions.push(TriageDecision::Delete { id });
            plan.closed.push(format!(
                "{} → Deleted (they'll chase you if it's real)",
                open_loop.description
            ));
        } else if contains_any(&text, HEDGES) {
            plan.decisions.push(TriageDecision::Close {
                id,
                reason: "Moved to /dev/null".into(),
            });
            plan.closed
                .push(format!("{} → Moved to /dev/null", open_loop.description));
        } else if text.contains("network") {
            plan.decisions.push(TriageDecision::Close {
                id,
                reason: "Number blocked".into(),
            });
            plan.closed
                .push(format!("{} → Blocked number", open_loop.description));
        } else {
            plan.remaining.push(open_loop.description.clone());
        }
    }
    plan
}

/// Load score for a number of open loops, capped at 100.
fn cognitive_load(open_loops: usize) -> i64 {
    let open_loops = i64::try_from(open_loops).unwrap_or(i64::MAX);
    BASE_LOAD
        .saturating_add(LOAD_PER_LOOP.saturating_mul(open_loops))
        .min(100)
}

impl Assistant {
    /// Triage every open loop and report what is left.
    ///
    /// # Errors
    /// Returns an error if loops cannot be read or the triage cannot be
    /// applied; in the latter case no loop is modified.
    pub fn cognitive_load_manager(&self) -> Result<LoadReport> {
        let loops = self.db.open_loops()?;
        let plan = plan_triage(&loops);
        if !plan.decisions.is_empty() {
            self.db.apply_triage(&plan.decisions)?;
        }

        let TriagePlan {
            closed, remaining, ..
        } = plan;

        Ok(LoadReport {
            load: cognitive_load(loops.len()),
            open_loops: loops.len(),
            auto_closed: if closed.is_empty() {
                vec!["Nothing disposable left".to_string()]
            } else {
                closed
            },
            remaining_focus: remaining
                .into_iter()
                .next()
                .unwrap_or_else(|| "OB1 prediction engine".to_string()),
            mode: "Cave dwelling (no inputs, pure building)".into(),
        })
    }
}
