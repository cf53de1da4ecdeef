//! Weekly plan-vs-actual check.

use serde::{Deserialize, Serialize};

use super::Assistant;
use crate::error::Result;

const NOTHING_PLANNED: &str = "You planned nothing, congrats";
const NO_HISTORY: &str = "No git history accessible";
const NO_COMMITS: &str = "No commits in the last 7 days";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub planned: Vec<String>,
    pub actual: Vec<String>,
    pub accuracy: i64,
    pub recommendation: String,
}

/// Percentage of planned entries found (case-insensitively) inside at least
/// one actual entry, rounded to the nearest integer.
pub fn plan_accuracy(planned: &[String], actual: &[String]) -> i64 {
    if planned.is_empty() {
        return 0;
    }
    let actual: Vec<String> = actual.iter().map(|entry| entry.to_lowercase()).collect();
    let matches = planned
        .iter()
        .map(|task| task.to_lowercase())
        .filter(|task| actual.iter().any(|entry| entry.contains(task.as_str())))
        .count();
    (100.0 * matches as f64 / planned.len() as f64).round() as i64
}

impl Assistant {
    /// Compare this week's plan with recent commits.
    ///
    /// Version-control failures degrade to a placeholder and never surface
    /// as an error.
    ///
    /// # Errors
    /// Returns an error only if planned tasks cannot be read.
    pub fn weekly_reality_check(&self) -> Result<WeeklyReport> {
        let mut planned: Vec<String> = self
            .db
            .planned_tasks()?
            .into_iter()
            .map(|task| task.description)
            .collect();
        if planned.is_empty() {
            planned.push(NOTHING_PLANNED.to_string());
        }

        let actual = match self.commits.recent_subjects(self.settings.weekly_window_days) {
            Ok(commits) if commits.is_empty() => vec![NO_COMMITS.to_string()],
            Ok(commits) => commits,
            Err(e) => {
                tracing::warn!("commit history unavailable: {e}");
                vec![NO_HISTORY.to_string()]
            }
        };

        let accuracy = plan_accuracy(&planned, &actual);
        let recommendation = if accuracy < 50 {
            "Stop planning, start building"
        } else {
            "Planning aligned with execution. Keep momentum"
        };

        Ok(WeeklyReport {
            planned,
            actual,
            accuracy,
            recommendation: recommendation.to_string(),
        })
    }
}
