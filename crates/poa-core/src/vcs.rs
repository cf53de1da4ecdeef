//! Version-control history provider.
//!
//! The weekly reality check only needs commit subjects from the last few
//! days. [`CommitSource`] keeps that behind a trait so tests (and non-git
//! setups) can supply their own history.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{CoreError, Result};

/// Anything that can list recent commit subjects.
pub trait CommitSource {
    /// Commit subject lines from the last `days` days, newest first.
    ///
    /// # Errors
    /// Returns [`CoreError::VersionControl`] when history is unavailable.
    fn recent_subjects(&self, days: u32) -> Result<Vec<String>>;
}

/// Reads history by running `git log` in a directory.
#[derive(Debug, Clone)]
pub struct GitLog {
    repo_dir: PathBuf,
}

impl GitLog {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Use the process working directory.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be determined.
    pub fn current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }
}

impl CommitSource for GitLog {
    fn recent_subjects(&self, days: u32) -> Result<Vec<String>> {
        let output = Command::new("git")
            .args(["log", &format!("--since={days}.days"), "--pretty=format:%s"])
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| CoreError::VersionControl(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::VersionControl(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Fixed history, for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticCommits(pub Vec<String>);

impl CommitSource for StaticCommits {
    fn recent_subjects(&self, _days: u32) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_log_outside_a_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = GitLog::new(dir.path()).recent_subjects(7);
        assert!(matches!(result, Err(CoreError::VersionControl(_))));
    }

    #[test]
    fn current_dir_targets_process_working_directory() {
        let git = GitLog::current_dir().unwrap();
        assert_eq!(git.repo_dir, std::env::current_dir().unwrap());
    }

    #[test]
    fn static_commits_echo_their_input() {
        let source = StaticCommits(vec!["Fix parser".into()]);
        assert_eq!(source.recent_subjects(7).unwrap(), vec!["Fix parser".to_string()]);
    }
}
