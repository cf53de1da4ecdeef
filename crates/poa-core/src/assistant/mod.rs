//! Recommendation engine.
//!
//! [`Assistant`] owns the repository handle, the seed dataset, the tuning
//! settings and a [`CommitSource`]. Each operation lives in its own
//! submodule and returns a serializable report whose field order is the
//! order the CLI prints.
//!
//! Time-dependent operations have an `_at` variant taking an explicit clock
//! reading; the plain variants use the current time.

mod brief;
mod decide;
mod energy;
mod evaluate;
mod load;
mod ob1;
mod weekly;

pub use brief::{FocusReport, MorningBrief};
pub use decide::{decide, Decision, DecisionAnalysis, SignalLevel};
pub use energy::{base_energy, energy_suggestion, EnergyReading};
pub use evaluate::{evaluate_description, TaskEvaluation};
pub use load::{plan_triage, LoadReport, TriagePlan};
pub use ob1::Ob1Briefing;
pub use weekly::{plan_accuracy, WeeklyReport};

use chrono::{DateTime, Utc};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::storage::{AssistantSettings, Config, Database};
use crate::vcs::{CommitSource, GitLog};

/// The personal operations assistant.
pub struct Assistant {
    db: Database,
    dataset: Dataset,
    settings: AssistantSettings,
    commits: Box<dyn CommitSource>,
}

impl Assistant {
    /// Build an assistant over `db`, seeding it from the configured dataset.
    ///
    /// History for the weekly check comes from `git log` in the process
    /// working directory unless replaced with [`Assistant::with_commit_source`].
    ///
    /// # Errors
    /// Returns an error if seeding fails.
    pub fn new(db: Database, config: &Config) -> Result<Self> {
        Self::new_at(db, config, Utc::now())
    }

    /// Like [`Assistant::new`], stamping seeded rows with `now`.
    ///
    /// # Errors
    /// Returns an error if seeding fails or the working directory is unreadable.
    pub fn new_at(db: Database, config: &Config, now: DateTime<Utc>) -> Result<Self> {
        db.seed_defaults(&config.dataset, now)?;
        Ok(Self {
            db,
            dataset: config.dataset.clone(),
            settings: config.assistant.clone(),
            commits: Box::new(GitLog::current_dir()?),
        })
    }

    /// Replace the version-control collaborator.
    pub fn with_commit_source(mut self, source: impl CommitSource + 'static) -> Self {
        self.commits = Box::new(source);
        self
    }

    /// The underlying repository.
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::vcs::StaticCommits;

    /// Assistant over an in-memory database with the default dataset.
    pub fn assistant() -> Assistant {
        assistant_with(Config::default())
    }

    pub fn assistant_with(config: Config) -> Assistant {
        let db = Database::open_memory().unwrap();
        Assistant::new(db, &config)
            .unwrap()
            .with_commit_source(StaticCommits::default())
    }

    /// Config whose dataset has no tasks and no loops.
    pub fn empty_config() -> Config {
        let mut config = Config::default();
        config.dataset.tasks.clear();
        config.dataset.open_loops.clear();
        config
    }
}
