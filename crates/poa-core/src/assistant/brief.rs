//! Morning brief and focus protector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Assistant;
use crate::error::Result;
use crate::task::Task;

/// Minimum priority for a task to count as the day's focus.
const FOCUS_THRESHOLD: i64 = 10;
const MAX_IGNORED: usize = 3;

const FOCUS_SUMMARY: &str = "Deep work initiated by focus protector";
const FOCUS_EVENT: &str = "focus_mode";

/// What to build, what to grind, what to drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorningBrief {
    pub energy_focus: String,
    pub boring: String,
    pub ignore: Vec<String>,
}

impl MorningBrief {
    /// Build the brief from tasks already sorted by descending priority.
    pub fn from_ranked(tasks: &[Task]) -> Self {
        let energy_focus = tasks
            .iter()
            .find(|task| task.priority() >= FOCUS_THRESHOLD)
            .or_else(|| tasks.first())
            .map(|task| task.description.clone())
            .unwrap_or_else(|| "Build anything worthwhile".to_string());

        let boring = tasks
            .iter()
            .find(|task| task.is_chore())
            .map(|task| task.description.clone())
            .unwrap_or_else(|| "None worth your time".to_string());

        let mut ignore: Vec<String> = tasks
            .iter()
            .filter(|task| task.human_interaction >= 2 || task.priority() <= 0)
            .take(MAX_IGNORED)
            .map(|task| task.description.clone())
            .collect();
        if ignore.is_empty() {
            ignore.push("Everything screaming for attention".to_string());
        }

        Self {
            energy_focus,
            boring,
            ignore,
        }
    }
}

/// Confirmation of the focus rituals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusReport {
    pub notifications: String,
    pub status: String,
    pub timer: String,
    pub log: String,
}

impl Assistant {
    /// Pick focus, chore and ignore items from the stored tasks.
    ///
    /// # Errors
    /// Returns an error if tasks cannot be read.
    pub fn morning_brief(&self) -> Result<MorningBrief> {
        let tasks = self.db.list_tasks(true)?;
        let brief = MorningBrief::from_ranked(&tasks);
        tracing::debug!(tasks = tasks.len(), focus = %brief.energy_focus, "morning brief");
        Ok(brief)
    }

    /// Log a deep-work block and report the rituals.
    ///
    /// # Errors
    /// Returns an error if the session cannot be recorded.
    pub fn focus_protector(&self) -> Result<FocusReport> {
        self.focus_protector_at(Utc::now())
    }

    /// [`Assistant::focus_protector`] with an explicit start time.
    ///
    /// # Errors
    /// Returns an error if the session cannot be recorded.
    pub fn focus_protector_at(&self, now: DateTime<Utc>) -> Result<FocusReport> {
        let minutes = self.settings.focus_minutes;
        self.db
            .start_focus_block(now, minutes, FOCUS_SUMMARY, FOCUS_EVENT)?;

        Ok(FocusReport {
            notifications: "All notifications muted (pretend they never existed)".into(),
            status: "Slack/Discord set to 'Building. Response time: 48h'".into(),
            timer: format!("{minutes}-minute deep work timer started"),
            log: "Focus session logged for future bragging rights".into(),
        })
    }
}
