//! Static data the assistant is constructed with.
//!
//! A [`Dataset`] bundles the seed tasks, seed open loops and project
//! configurations. The built-in defaults live in [`Dataset::default`];
//! config.toml may replace any part of it.

use rand::distributions::{Bernoulli, Distribution};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ConfigError, Result};

/// Task template used to seed an empty task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub description: String,
    pub category: String,
    pub stimulation: i64,
    pub system_building: i64,
    pub automation_potential: i64,
    pub human_interaction: i64,
    #[serde(default)]
    pub repetitive: bool,
    #[serde(default)]
    pub planned_for_week: bool,
}

impl TaskTemplate {
    fn new(
        description: &str,
        category: &str,
        signals: [i64; 4],
        repetitive: bool,
        planned_for_week: bool,
    ) -> Self {
        Self {
            description: description.into(),
            category: category.into(),
            stimulation: signals[0],
            system_building: signals[1],
            automation_potential: signals[2],
            human_interaction: signals[3],
            repetitive,
            planned_for_week,
        }
    }
}

/// Which way a project should be pushed today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityMode {
    Breakthrough,
    Maintain,
}

impl fmt::Display for PriorityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityMode::Breakthrough => f.write_str("breakthrough"),
            PriorityMode::Maintain => f.write_str("maintain"),
        }
    }
}

/// Per-project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub repo: String,
    /// Probability of picking [`PriorityMode::Breakthrough`].
    #[serde(default = "default_breakthrough_probability")]
    pub breakthrough_probability: f64,
    #[serde(default)]
    pub boring_tasks: Vec<String>,
    #[serde(default)]
    pub stimulating_tasks: Vec<String>,
}

fn default_breakthrough_probability() -> f64 {
    0.3
}

impl ProjectConfig {
    /// Biased coin flip between breakthrough and maintain.
    ///
    /// # Errors
    /// Returns an error if the configured probability is outside `[0, 1]`.
    pub fn priority_mode<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PriorityMode> {
        let coin = Bernoulli::new(self.breakthrough_probability).map_err(|e| {
            ConfigError::InvalidValue {
                key: "breakthrough_probability".into(),
                message: e.to_string(),
            }
        })?;
        Ok(if coin.sample(rng) {
            PriorityMode::Breakthrough
        } else {
            PriorityMode::Maintain
        })
    }

    /// Stimulating tasks in a random order.
    pub fn shuffled_stimulating<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut tasks = self.stimulating_tasks.clone();
        tasks.shuffle(rng);
        tasks
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.breakthrough_probability) {
            return Err(ConfigError::InvalidValue {
                key: format!("dataset.projects.{name}.breakthrough_probability"),
                message: format!("{} is not within [0, 1]", self.breakthrough_probability),
            });
        }
        if self.stimulating_tasks.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: format!("dataset.projects.{name}.stimulating_tasks"),
                message: "at least one stimulating task is required".into(),
            });
        }
        Ok(())
    }
}

/// Seed data and project table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub open_loops: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<TaskTemplate>,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

impl Dataset {
    /// Look up a project by name.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingKey`] if the project is not configured.
    pub fn project(&self, name: &str) -> Result<&ProjectConfig> {
        self.projects
            .get(name)
            .ok_or_else(|| ConfigError::MissingKey(format!("dataset.projects.{name}")).into())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (name, project) in &self.projects {
            project.validate(name)?;
        }
        Ok(())
    }
}

impl Default for Dataset {
    fn default() -> Self {
        let tasks = vec![
            TaskTemplate::new("Architect autonomous prediction engine", "build", [3, 3, 2, 0], false, true),
            TaskTemplate::new("Design experiment for controversy generator", "build", [3, 2, 2, 0], false, true),
            TaskTemplate::new("Implement durable deployment pipeline", "build", [2, 3, 3, 0], false, false),
            TaskTemplate::new("Answer legacy support tickets", "boring", [0, 0, 1, 3], true, false),
            TaskTemplate::new("Refactor knowledge base automation", "automation", [2, 2, 3, 0], false, true),
            TaskTemplate::new("Document internal API", "maintenance", [1, 1, 1, 1], true, false),
            TaskTemplate::new("Prototype load shedding daemon", "build", [3, 3, 2, 0], false, false),
            TaskTemplate::new("Evaluate user feature requests", "boring", [0, 0, 1, 2], true, false),
        ];

        let open_loops = [
            "Follow up with X about partnership",
            "Maybe implement Y experimental widget",
            "Should network with Z next month",
            "Ping investor about vague idea",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let mut projects = BTreeMap::new();
        projects.insert(
            "ob1".to_string(),
            ProjectConfig {
                repo: "github.com/tuouser/ob1".into(),
                breakthrough_probability: default_breakthrough_probability(),
                boring_tasks: vec!["update docs".into(), "respond to users".into(), "fix UI".into()],
                stimulating_tasks: vec![
                    "new algorithm".into(),
                    "prediction engine".into(),
                    "controversy generator".into(),
                ],
            },
        );

        Self {
            open_loops,
            tasks,
            projects,
        }
    }
}
