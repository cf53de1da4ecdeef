pub mod config;
pub mod loops;
pub mod ops;
pub mod task;

use poa_core::{Assistant, Config, Database};
use serde::Serialize;

/// Load config, open the database and build a seeded assistant.
pub fn open_assistant() -> Result<Assistant, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db_path = config.database_path()?;
    tracing::debug!(path = %db_path.display(), "opening database");
    let db = Database::open_at(&db_path)?;
    Ok(Assistant::new(db, &config)?)
}

/// Print a report as indented JSON in field order.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
