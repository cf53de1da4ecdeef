//! Open-loop commands for CLI.

use clap::Subcommand;

use super::{open_assistant, print_json};

#[derive(Subcommand)]
pub enum LoopsAction {
    /// List open loops, newest first
    List {
        /// Include closed loops
        #[arg(long)]
        all: bool,
    },
    /// Reopen a closed loop
    Reopen {
        /// Loop ID
        id: i64,
    },
}

pub fn run(action: LoopsAction) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = open_assistant()?;
    let db = assistant.database();
    match action {
        LoopsAction::List { all } => {
            let loops = if all { db.all_loops()? } else { db.open_loops()? };
            print_json(&loops)?;
        }
        LoopsAction::Reopen { id } => {
            db.reopen_open_loop(id)?;
            println!("loop {id} reopened");
        }
    }
    Ok(())
}
