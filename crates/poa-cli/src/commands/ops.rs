//! The eight assistant operations, one function each.

use super::{open_assistant, print_json};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn morning() -> CmdResult {
    print_json(&open_assistant()?.morning_brief()?)
}

pub fn evaluate(description: &str) -> CmdResult {
    print_json(&open_assistant()?.evaluate_task(description))
}

pub fn focus() -> CmdResult {
    print_json(&open_assistant()?.focus_protector()?)
}

pub fn decide(question: &str) -> CmdResult {
    print_json(&open_assistant()?.decide(question))
}

pub fn energy() -> CmdResult {
    print_json(&open_assistant()?.energy_tracker()?)
}

pub fn weekly() -> CmdResult {
    print_json(&open_assistant()?.weekly_reality_check()?)
}

pub fn ob1() -> CmdResult {
    print_json(&open_assistant()?.ob1_focus()?)
}

pub fn load() -> CmdResult {
    print_json(&open_assistant()?.cognitive_load_manager()?)
}
