//! OB1 project briefing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Assistant;
use crate::dataset::PriorityMode;
use crate::error::{Result, ValidationError};

const PROJECT: &str = "ob1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ob1Briefing {
    pub mode: PriorityMode,
    pub build: String,
    pub automate: String,
    pub ignore: String,
    pub reminder: String,
}

impl Assistant {
    /// Brief on the OB1 project using thread-local randomness.
    ///
    /// # Errors
    /// Returns an error if the project is missing or misconfigured.
    pub fn ob1_focus(&self) -> Result<Ob1Briefing> {
        self.ob1_focus_with(&mut rand::thread_rng())
    }

    /// Brief on the OB1 project with an injected random source.
    ///
    /// # Errors
    /// Returns an error if the project is missing or misconfigured.
    pub fn ob1_focus_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Ob1Briefing> {
        let project = self.dataset.project(PROJECT)?;
        let mode = project.priority_mode(rng)?;
        let pick = project
            .shuffled_stimulating(rng)
            .into_iter()
            .next()
            .ok_or_else(|| ValidationError::EmptyCollection("ob1 stimulating_tasks".into()))?;

        Ok(Ob1Briefing {
            mode,
            build: format!("Automated {pick} tracker (3h)"),
            automate: "User onboarding so you never touch it again".into(),
            ignore: "Feature requests from users with <€1000 MRR".into(),
            reminder: "You're building a truth machine, not a friend maker.".into(),
        })
    }
}
