//! Persisted record types.
//!
//! Tasks carry their four stored signals; priority is always derived from
//! them and never written to the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring;

/// Default status for freshly seeded tasks.
pub const DEFAULT_TASK_STATUS: &str = "pending";

/// A stored candidate task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub category: String,
    pub stimulation: i64,
    pub system_building: i64,
    pub automation_potential: i64,
    pub human_interaction: i64,
    pub repetitive: bool,
    pub planned_for_week: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Derived priority score.
    pub fn priority(&self) -> i64 {
        scoring::priority(
            self.stimulation,
            self.system_building,
            self.automation_potential,
            self.human_interaction,
        )
    }

    /// True for categories the morning brief treats as chores.
    pub fn is_chore(&self) -> bool {
        matches!(self.category.as_str(), "boring" | "maintenance")
    }
}

/// Open-loop status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopStatus {
    Open,
    Closed,
}

impl LoopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopStatus::Open => "open",
            LoopStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoopStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(LoopStatus::Open),
            "closed" => Ok(LoopStatus::Closed),
            other => Err(format!("unknown loop status: {other}")),
        }
    }
}

/// An unresolved commitment waiting for triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLoop {
    pub id: i64,
    pub description: String,
    pub status: LoopStatus,
    pub created_at: DateTime<Utc>,
}

/// A recorded energy reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyEvent {
    pub id: i64,
    pub level: i64,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// A deep-work block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub summary: String,
}

/// An activity log row. `details` holds serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: i64,
    pub event: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(category: &str, signals: [i64; 4]) -> Task {
        let now = Utc::now();
        Task {
            id: 1,
            description: "t".into(),
            category: category.into(),
            stimulation: signals[0],
            system_building: signals[1],
            automation_potential: signals[2],
            human_interaction: signals[3],
            repetitive: false,
            planned_for_week: false,
            status: DEFAULT_TASK_STATUS.into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn priority_is_derived_from_signals() {
        assert_eq!(task("build", [3, 3, 2, 0]).priority(), 15);
        assert_eq!(task("boring", [0, 0, 1, 3]).priority(), -13);
    }

    #[test]
    fn chore_categories() {
        assert!(task("boring", [0; 4]).is_chore());
        assert!(task("maintenance", [0; 4]).is_chore());
        assert!(!task("build", [0; 4]).is_chore());
        assert!(!task("Boring", [0; 4]).is_chore());
    }

    #[test]
    fn loop_status_parses() {
        assert_eq!("open".parse::<LoopStatus>().unwrap(), LoopStatus::Open);
        assert_eq!(LoopStatus::Closed.to_string(), "closed");
        assert!("pending".parse::<LoopStatus>().is_err());
    }
}
