//! # Personal Operations Assistant Core Library
//!
//! This library provides the business logic for `poa`, a blunt single-user
//! productivity assistant. Every operation is available through the `poa` CLI,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Classifier**: keyword-based mapping from a task description to five signals
//! - **Scoring**: the fixed weighted priority formula
//! - **Assistant**: morning brief, task evaluation, decisions, energy tracking,
//!   weekly reality check, project briefing and open-loop triage
//! - **Storage**: SQLite repository and TOML configuration
//! - **VCS**: commit history provider for the weekly check
//!
//! ## Key Components
//!
//! - [`Assistant`]: the recommendation engine
//! - [`Database`]: task, loop and log persistence
//! - [`Config`]: configuration and seed dataset
//! - [`CommitSource`]: trait for version-control history

pub mod assistant;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod scoring;
pub mod storage;
pub mod task;
pub mod vcs;

pub use assistant::{
    Assistant, Decision, EnergyReading, FocusReport, LoadReport, MorningBrief, Ob1Briefing,
    TaskEvaluation, WeeklyReport,
};
pub use classifier::{classify, SignalVector};
pub use dataset::{Dataset, PriorityMode, ProjectConfig, TaskTemplate};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use storage::{AssistantSettings, Config, Database, TriageDecision};
pub use task::{ActivityLogEntry, EnergyEvent, FocusSession, LoopStatus, OpenLoop, Task};
pub use vcs::{CommitSource, GitLog, StaticCommits};
