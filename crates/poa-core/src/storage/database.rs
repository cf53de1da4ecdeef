//! SQLite-backed repository.
//!
//! Provides persistent storage for:
//! - Candidate tasks (priority is computed in SQL, never stored)
//! - Open loops and their triage
//! - Append-only energy events, focus sessions and activity log
//!
//! Timestamps are stored as RFC 3339 UTC strings with a `Z` suffix, so plain
//! string comparison orders them.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::migrations;
use crate::dataset::Dataset;
use crate::error::{DatabaseError, Result, ValidationError};
use crate::scoring::PRIORITY_SQL;
use crate::task::{
    ActivityLogEntry, EnergyEvent, FocusSession, LoopStatus, OpenLoop, Task, DEFAULT_TASK_STATUS,
};

/// A mutation decided by open-loop triage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageDecision {
    /// Remove the loop entirely.
    Delete { id: i64 },
    /// Close the loop, appending the reason to its description.
    Close { id: i64, reason: String },
}

/// Counts of rows inserted by [`Database::seed_defaults`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub tasks: usize,
    pub open_loops: usize,
}

const TASK_COLUMNS: &str = "id, description, category, stimulation, system_building,
    automation_potential, human_interaction, repetitive, planned_for_week, status,
    created_at, updated_at";

fn format_ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `now - hours` as a stored timestamp, or an error if the window is out of range.
fn window_start(now: DateTime<Utc>, hours: i64) -> Result<String> {
    Duration::try_hours(hours)
        .and_then(|window| now.checked_sub_signed(window))
        .map(format_ts)
        .ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "lookback_hours".into(),
                message: format!("{hours} hours is out of range"),
            }
            .into()
        })
}

fn parse_ts(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get(0)?,
        description: row.get(1)?,
        category: row.get(2)?,
        stimulation: row.get(3)?,
        system_building: row.get(4)?,
        automation_potential: row.get(5)?,
        human_interaction: row.get(6)?,
        repetitive: row.get(7)?,
        planned_for_week: row.get(8)?,
        status: row.get(9)?,
        created_at: parse_ts(10, &row.get::<_, String>(10)?)?,
        updated_at: parse_ts(11, &row.get::<_, String>(11)?)?,
    })
}

fn row_to_loop(row: &rusqlite::Row) -> Result<OpenLoop, rusqlite::Error> {
    let status: String = row.get(2)?;
    let status = status.parse::<LoopStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(OpenLoop {
        id: row.get(0)?,
        description: row.get(1)?,
        status,
        created_at: parse_ts(3, &row.get::<_, String>(3)?)?,
    })
}

/// SQLite database for the assistant.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` and apply migrations.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "database ready");
        Ok(db)
    }

    /// Open an in-memory database (for tests and dry runs).
    ///
    /// # Errors
    /// Returns an error if migrations fail.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Seed tasks and open loops, each only if its table is empty.
    ///
    /// # Errors
    /// Returns an error if any insert fails; nothing is written in that case.
    pub fn seed_defaults(&self, dataset: &Dataset, now: DateTime<Utc>) -> Result<SeedSummary> {
        let tx = self.conn.unchecked_transaction()?;
        let stamp = format_ts(now);
        let mut summary = SeedSummary::default();

        let task_count: i64 = tx.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        if task_count == 0 {
            let mut stmt = tx.prepare(
                "INSERT INTO tasks (description, category, stimulation, system_building,
                    automation_potential, human_interaction, repetitive, planned_for_week,
                    status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            )?;
            for task in &dataset.tasks {
                stmt.execute(params![
                    task.description,
                    task.category,
                    task.stimulation,
                    task.system_building,
                    task.automation_potential,
                    task.human_interaction,
                    task.repetitive,
                    task.planned_for_week,
                    DEFAULT_TASK_STATUS,
                    stamp,
                ])?;
                summary.tasks += 1;
            }
        }

        let loop_count: i64 =
            tx.query_row("SELECT COUNT(*) FROM open_loops", [], |row| row.get(0))?;
        if loop_count == 0 {
            let mut stmt = tx.prepare(
                "INSERT INTO open_loops (description, status, created_at) VALUES (?1, 'open', ?2)",
            )?;
            for description in &dataset.open_loops {
                stmt.execute(params![description, stamp])?;
                summary.open_loops += 1;
            }
        }

        tx.commit()?;
        if summary != SeedSummary::default() {
            tracing::debug!(tasks = summary.tasks, open_loops = summary.open_loops, "seeded defaults");
        }
        Ok(summary)
    }

    // === Tasks ===

    /// Fetch all tasks, optionally ordered by descending priority.
    ///
    /// Ties (and the unordered listing) fall back to ascending id.
    pub fn list_tasks(&self, order_by_priority: bool) -> Result<Vec<Task>> {
        let sql = if order_by_priority {
            format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY {PRIORITY_SQL} DESC, id ASC")
        } else {
            format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC")
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Tasks flagged as planned for the current week.
    pub fn planned_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE planned_for_week = 1 ORDER BY id ASC"
        ))?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Update a task's status.
    ///
    /// # Errors
    /// Returns [`DatabaseError::NotFound`] if no task has this id.
    pub fn update_task_status(&self, id: i64, status: &str, now: DateTime<Utc>) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status, format_ts(now), id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound { entity: "task", id }.into());
        }
        Ok(())
    }

    // === Open loops ===

    /// Open loops, newest first.
    pub fn open_loops(&self) -> Result<Vec<OpenLoop>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, status, created_at FROM open_loops
             WHERE status = 'open'
             ORDER BY created_at DESC, id DESC",
        )?;
        let loops = stmt
            .query_map([], row_to_loop)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(loops)
    }

    /// Every loop regardless of status, newest first.
    pub fn all_loops(&self) -> Result<Vec<OpenLoop>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, status, created_at FROM open_loops
             ORDER BY created_at DESC, id DESC",
        )?;
        let loops = stmt
            .query_map([], row_to_loop)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(loops)
    }

    pub fn add_open_loop(&self, description: &str, now: DateTime<Utc>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO open_loops (description, status, created_at) VALUES (?1, 'open', ?2)",
            params![description, format_ts(now)],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Close a loop, appending `" → <reason>"` to its description.
    pub fn close_open_loop(&self, id: i64, reason: &str) -> Result<()> {
        close_loop(&self.conn, id, reason)
    }

    pub fn delete_open_loop(&self, id: i64) -> Result<()> {
        delete_loop(&self.conn, id)
    }

    /// Mark a loop open again. The appended reason stays in the description.
    pub fn reopen_open_loop(&self, id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE open_loops SET status = 'open' WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "open loop",
                id,
            }
            .into());
        }
        Ok(())
    }

    /// Apply a batch of triage decisions atomically.
    ///
    /// # Errors
    /// Returns an error and rolls back every decision if any one fails.
    pub fn apply_triage(&self, decisions: &[TriageDecision]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for decision in decisions {
            match decision {
                TriageDecision::Delete { id } => delete_loop(&tx, *id)?,
                TriageDecision::Close { id, reason } => close_loop(&tx, *id, reason)?,
            }
        }
        tx.commit()?;
        tracing::info!(mutations = decisions.len(), "open loops triaged");
        Ok(())
    }

    // === Append-only logs ===

    /// Append an activity-log entry with JSON details.
    pub fn record_activity(
        &self,
        event: &str,
        details: &serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        insert_activity(&self.conn, event, details, now)
    }

    /// Append a focus session.
    pub fn add_focus_session(
        &self,
        started_at: DateTime<Utc>,
        duration_minutes: i64,
        summary: &str,
    ) -> Result<i64> {
        insert_focus_session(&self.conn, started_at, duration_minutes, summary)
    }

    /// Append a focus session and its activity entry in one transaction.
    pub fn start_focus_block(
        &self,
        started_at: DateTime<Utc>,
        duration_minutes: i64,
        summary: &str,
        event: &str,
    ) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        let id = insert_focus_session(&tx, started_at, duration_minutes, summary)?;
        insert_activity(
            &tx,
            event,
            &serde_json::json!({ "duration": duration_minutes }),
            started_at,
        )?;
        tx.commit()?;
        tracing::info!(session = id, minutes = duration_minutes, "focus block started");
        Ok(id)
    }

    /// Most recent focus session started within the last `within_hours`.
    pub fn last_focus_session(
        &self,
        within_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<FocusSession>> {
        let cutoff = window_start(now, within_hours)?;
        let session = self
            .conn
            .query_row(
                "SELECT id, started_at, duration_minutes, COALESCE(summary, '')
                 FROM focus_sessions
                 WHERE started_at >= ?1
                 ORDER BY started_at DESC, id DESC
                 LIMIT 1",
                params![cutoff],
                |row| {
                    Ok(FocusSession {
                        id: row.get(0)?,
                        started_at: parse_ts(1, &row.get::<_, String>(1)?)?,
                        duration_minutes: row.get(2)?,
                        summary: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    /// Append an energy reading.
    pub fn log_energy(&self, level: i64, note: &str, now: DateTime<Utc>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO energy_events (level, note, created_at) VALUES (?1, ?2, ?3)",
            params![level, note, format_ts(now)],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Energy readings from the last `hours`, newest first.
    pub fn recent_energy(&self, hours: i64, now: DateTime<Utc>) -> Result<Vec<EnergyEvent>> {
        let cutoff = window_start(now, hours)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, level, COALESCE(note, ''), created_at
             FROM energy_events
             WHERE created_at >= ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let events = stmt
            .query_map(params![cutoff], |row| {
                Ok(EnergyEvent {
                    id: row.get(0)?,
                    level: row.get(1)?,
                    note: row.get(2)?,
                    created_at: parse_ts(3, &row.get::<_, String>(3)?)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Latest activity-log entries, newest first.
    pub fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event, COALESCE(details, '{}'), created_at
             FROM activity_log
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let entries = stmt
            .query_map(params![limit], |row| {
                Ok(ActivityLogEntry {
                    id: row.get(0)?,
                    event: row.get(1)?,
                    details: row.get(2)?,
                    created_at: parse_ts(3, &row.get::<_, String>(3)?)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn close_loop(conn: &Connection, id: i64, reason: &str) -> Result<()> {
    let changed = conn.execute(
        "UPDATE open_loops
         SET status = 'closed', description = description || ' → ' || ?1
         WHERE id = ?2",
        params![reason, id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity: "open loop",
            id,
        }
        .into());
    }
    Ok(())
}

fn delete_loop(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM open_loops WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity: "open loop",
            id,
        }
        .into());
    }
    Ok(())
}

fn insert_activity(
    conn: &Connection,
    event: &str,
    details: &serde_json::Value,
    now: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO activity_log (event, details, created_at) VALUES (?1, ?2, ?3)",
        params![event, details.to_string(), format_ts(now)],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_focus_session(
    conn: &Connection,
    started_at: DateTime<Utc>,
    duration_minutes: i64,
    summary: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO focus_sessions (started_at, duration_minutes, summary) VALUES (?1, ?2, ?3)",
        params![format_ts(started_at), duration_minutes, summary],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::SubsecRound;

    fn seeded() -> Database {
        let db = Database::open_memory().unwrap();
        db.seed_defaults(&Dataset::default(), Utc::now()).unwrap();
        db
    }

    #[test]
    fn seeding_happens_once() {
        let db = Database::open_memory().unwrap();
        let first = db.seed_defaults(&Dataset::default(), Utc::now()).unwrap();
        assert_eq!(first, SeedSummary { tasks: 8, open_loops: 4 });
        let second = db.seed_defaults(&Dataset::default(), Utc::now()).unwrap();
        assert_eq!(second, SeedSummary::default());
        assert_eq!(db.list_tasks(false).unwrap().len(), 8);
    }

    #[test]
    fn loops_seed_independently_of_tasks() {
        let db = Database::open_memory().unwrap();
        let only_tasks = Dataset {
            open_loops: vec![],
            ..Dataset::default()
        };
        db.seed_defaults(&only_tasks, Utc::now()).unwrap();
        assert!(db.open_loops().unwrap().is_empty());

        let summary = db.seed_defaults(&Dataset::default(), Utc::now()).unwrap();
        assert_eq!(summary, SeedSummary { tasks: 0, open_loops: 4 });
    }

    #[test]
    fn tasks_ordered_by_priority() {
        let db = seeded();
        let tasks = db.list_tasks(true).unwrap();
        let priorities: Vec<i64> = tasks.iter().map(Task::priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(priorities, sorted);
        assert_eq!(tasks[0].description, "Architect autonomous prediction engine");
        assert_eq!(tasks.last().unwrap().description, "Answer legacy support tickets");
    }

    #[test]
    fn planned_tasks_filter() {
        let db = seeded();
        let planned = db.planned_tasks().unwrap();
        assert_eq!(planned.len(), 3);
        assert!(planned.iter().all(|t| t.planned_for_week));
    }

    #[test]
    fn update_task_status_touches_updated_at() {
        let db = seeded();
        let later = Utc::now() + Duration::hours(1);
        db.update_task_status(1, "done", later).unwrap();
        let task = db.get_task(1).unwrap().unwrap();
        assert_eq!(task.status, "done");
        assert_eq!(task.updated_at, later.trunc_subsecs(6));
        assert!(db.update_task_status(999, "done", later).is_err());
    }

    #[test]
    fn close_reopen_and_delete_loops() {
        let db = seeded();
        let loops = db.open_loops().unwrap();
        let target = loops[0].id;

        db.close_open_loop(target, "Moved to /dev/null").unwrap();
        assert_eq!(db.open_loops().unwrap().len(), 3);
        let closed = db
            .all_loops()
            .unwrap()
            .into_iter()
            .find(|l| l.id == target)
            .unwrap();
        assert_eq!(closed.status, LoopStatus::Closed);
        assert!(closed.description.ends_with(" → Moved to /dev/null"));

        db.reopen_open_loop(target).unwrap();
        assert_eq!(db.open_loops().unwrap().len(), 4);

        db.delete_open_loop(target).unwrap();
        assert_eq!(db.all_loops().unwrap().len(), 3);
        assert!(db.delete_open_loop(target).is_err());
    }

    #[test]
    fn open_loops_newest_first() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.add_open_loop("older", now - Duration::hours(1)).unwrap();
        db.add_open_loop("newer", now).unwrap();
        let loops = db.open_loops().unwrap();
        assert_eq!(loops[0].description, "newer");
        assert_eq!(loops[1].description, "older");
    }

    #[test]
    fn triage_is_atomic() {
        let db = seeded();
        let loops = db.open_loops().unwrap();
        let decisions = vec![
            TriageDecision::Close {
                id: loops[0].id,
                reason: "Number blocked".into(),
            },
            TriageDecision::Delete { id: 9_999 },
        ];
        assert!(db.apply_triage(&decisions).is_err());
        // the close before the failing delete was rolled back
        assert_eq!(db.open_loops().unwrap().len(), 4);
    }

    #[test]
    fn energy_window() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.log_energy(20, "old", now - Duration::hours(7)).unwrap();
        db.log_energy(50, "recent", now - Duration::hours(2)).unwrap();
        db.log_energy(70, "latest", now).unwrap();
        let events = db.recent_energy(6, now).unwrap();
        let levels: Vec<i64> = events.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![70, 50]);
    }

    #[test]
    fn focus_window() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.add_focus_session(now - Duration::hours(9), 90, "stale")
            .unwrap();
        assert!(db.last_focus_session(8, now).unwrap().is_none());
        db.add_focus_session(now - Duration::hours(1), 45, "fresh")
            .unwrap();
        let session = db.last_focus_session(8, now).unwrap().unwrap();
        assert_eq!(session.summary, "fresh");
        assert_eq!(session.duration_minutes, 45);
    }

    #[test]
    fn oversized_window_is_an_error() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        let err = db.recent_energy(1_000_000_000_000_000, now).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(db.last_focus_session(i64::MAX, now).is_err());
        assert!(db.recent_activity(usize::MAX).unwrap().is_empty());
    }

    #[test]
    fn focus_block_writes_session_and_activity() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.start_focus_block(now, 90, "deep work", "focus_mode")
            .unwrap();
        assert!(db.last_focus_session(1, now).unwrap().is_some());
        let activity = db.recent_activity(10).unwrap();
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].event, "focus_mode");
        let details: serde_json::Value = serde_json::from_str(&activity[0].details).unwrap();
        assert_eq!(details["duration"], 90);
    }

    #[test]
    fn file_database_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poa.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.seed_defaults(&Dataset::default(), Utc::now()).unwrap();
            db.log_energy(55, "persisted", Utc::now()).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.list_tasks(false).unwrap().len(), 8);
        assert_eq!(db.recent_energy(1, Utc::now()).unwrap().len(), 1);
    }
}
