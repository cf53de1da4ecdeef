//! Priority formula.
//!
//! ```text
//! priority = stimulation*3 + system_building*2 + automation_potential*2 - human_interaction*5
//! ```
//!
//! The same weights apply to stored tasks and to freshly classified
//! descriptions. Scores are never clamped and may be negative.

/// Weight applied to intellectual stimulation.
pub const STIMULATION_WEIGHT: i64 = 3;
/// Weight applied to system-building value.
pub const SYSTEM_BUILDING_WEIGHT: i64 = 2;
/// Weight applied to automation potential.
pub const AUTOMATION_WEIGHT: i64 = 2;
/// Penalty applied per point of human interaction.
pub const HUMAN_INTERACTION_PENALTY: i64 = 5;

/// Compute the priority score for a set of signals.
pub fn priority(
    stimulation: i64,
    system_building: i64,
    automation_potential: i64,
    human_interaction: i64,
) -> i64 {
    stimulation * STIMULATION_WEIGHT
        + system_building * SYSTEM_BUILDING_WEIGHT
        + automation_potential * AUTOMATION_WEIGHT
        - human_interaction * HUMAN_INTERACTION_PENALTY
}

/// SQL expression computing the same score over the `tasks` table.
///
/// Kept next to [`priority`] so the two cannot drift apart.
pub(crate) const PRIORITY_SQL: &str = "(stimulation * 3 + system_building * 2 + automation_potential * 2 - human_interaction * 5)";
