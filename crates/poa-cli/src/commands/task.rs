//! Task inspection commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;

use super::{open_assistant, print_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks with their derived priority
    List {
        /// Keep insertion order instead of sorting by priority
        #[arg(long)]
        unsorted: bool,
    },
    /// Set a task's status
    Status {
        /// Task ID
        id: i64,
        /// New status (e.g. pending, done, dropped)
        status: String,
    },
}

#[derive(Serialize)]
struct TaskRow {
    id: i64,
    priority: i64,
    description: String,
    category: String,
    status: String,
    planned_for_week: bool,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = open_assistant()?;
    let db = assistant.database();
    match action {
        TaskAction::List { unsorted } => {
            let rows: Vec<TaskRow> = db
                .list_tasks(!unsorted)?
                .into_iter()
                .map(|task| TaskRow {
                    id: task.id,
                    priority: task.priority(),
                    description: task.description,
                    category: task.category,
                    status: task.status,
                    planned_for_week: task.planned_for_week,
                })
                .collect();
            print_json(&rows)?;
        }
        TaskAction::Status { id, status } => {
            if status.trim().is_empty() {
                return Err("status must not be empty".into());
            }
            db.update_task_status(id, &status, Utc::now())?;
            println!("task {id} -> {status}");
        }
    }
    Ok(())
}
