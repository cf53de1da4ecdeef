mod config;
pub mod database;
pub mod migrations;

pub use config::{AssistantSettings, Config};
pub use database::{Database, TriageDecision};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `POA_DATA_DIR` wins when set. Otherwise `~/.config/poa[-dev]/`, where
/// `POA_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("POA_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("POA_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("poa-dev")
            } else {
                base_dir.join("poa")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
