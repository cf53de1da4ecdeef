//! Energy model.
//!
//! Base level by hour of day, minus a penalty after a recent focus block,
//! averaged with recent readings. Every estimate is logged back as a new
//! reading, so repeated calls pull the estimate toward its own history.

use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::Assistant;
use crate::error::Result;

const PEAK_LEVEL: i64 = 80;
const NORMAL_LEVEL: i64 = 60;
const NIGHT_LEVEL: i64 = 35;
const FOCUS_PENALTY: i64 = 10;

const LOW_THRESHOLD: i64 = 30;
const HIGH_THRESHOLD: i64 = 70;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyReading {
    pub level: i64,
    pub suggestion: String,
}

/// Base energy for an hour of the day (0-23).
pub fn base_energy(hour: u32) -> i64 {
    match hour {
        8..=12 => PEAK_LEVEL,
        h if h >= 20 || h <= 6 => NIGHT_LEVEL,
        _ => NORMAL_LEVEL,
    }
}

/// What a given level is good for.
pub fn energy_suggestion(level: i64) -> &'static str {
    if level < LOW_THRESHOLD {
        "Stop pretending to work. Go walk."
    } else if level > HIGH_THRESHOLD {
        "Perfect time for a complex system build"
    } else {
        "Handle medium-intensity automation tasks"
    }
}

impl Assistant {
    /// Estimate current energy from the local clock and recent history.
    ///
    /// # Errors
    /// Returns an error if history cannot be read or the reading cannot be logged.
    pub fn energy_tracker(&self) -> Result<EnergyReading> {
        self.energy_tracker_at(Local::now())
    }

    /// [`Assistant::energy_tracker`] at an explicit time.
    ///
    /// The hour is taken in `now`'s own time zone.
    ///
    /// # Errors
    /// Returns an error if history cannot be read or the reading cannot be logged.
    pub fn energy_tracker_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Result<EnergyReading> {
        let utc_now = now.with_timezone(&Utc);
        let mut level = base_energy(now.hour());

        if self
            .db
            .last_focus_session(self.settings.focus_lookback_hours, utc_now)?
            .is_some()
        {
            level -= FOCUS_PENALTY;
        }

        let recent = self
            .db
            .recent_energy(self.settings.energy_lookback_hours, utc_now)?;
        if !recent.is_empty() {
            let mean = recent.iter().map(|e| e.level).sum::<i64>() as f64 / recent.len() as f64;
            level = ((level as f64 + mean) / 2.0).floor() as i64;
        }

        let level = level.clamp(0, 100);
        let suggestion = energy_suggestion(level);
        self.db.log_energy(level, suggestion, utc_now)?;
        tracing::debug!(level, samples = recent.len(), "energy estimated");

        Ok(EnergyReading {
            level,
            suggestion: suggestion.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::test_support::*;
    use chrono::Duration;

    fn at_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap()
    }

    #[test]
    fn base_levels_by_hour() {
        assert_eq!(base_energy(8), 80);
        assert_eq!(base_energy(12), 80);
        assert_eq!(base_energy(13), 60);
        assert_eq!(base_energy(19), 60);
        assert_eq!(base_energy(20), 35);
        assert_eq!(base_energy(0), 35);
        assert_eq!(base_energy(6), 35);
        assert_eq!(base_energy(7), 60);
    }

    #[test]
    fn suggestion_thresholds() {
        assert_eq!(energy_suggestion(29), "Stop pretending to work. Go walk.");
        assert_eq!(energy_suggestion(30), "Handle medium-intensity automation tasks");
        assert_eq!(energy_suggestion(70), "Handle medium-intensity automation tasks");
        assert_eq!(energy_suggestion(71), "Perfect time for a complex system build");
    }

    #[test]
    fn fresh_morning() {
        let assistant = assistant();
        let reading = assistant.energy_tracker_at(at_hour(9)).unwrap();
        assert_eq!(reading.level, 80);
        assert_eq!(reading.suggestion, "Perfect time for a complex system build");
    }

    #[test]
    fn reading_is_logged() {
        let assistant = assistant();
        let now = at_hour(9);
        assistant.energy_tracker_at(now).unwrap();
        let events = assistant.database().recent_energy(1, now).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, 80);
    }

    #[test]
    fn recent_focus_costs_ten() {
        let assistant = assistant();
        let now = at_hour(14);
        assistant
            .focus_protector_at(now - Duration::hours(2))
            .unwrap();
        assert_eq!(assistant.energy_tracker_at(now).unwrap().level, 50);
    }

    #[test]
    fn readings_are_blended_with_floor() {
        let assistant = assistant();
        let now = at_hour(9);
        assistant
            .database()
            .log_energy(25, "tired", now - Duration::hours(1))
            .unwrap();
        // (80 + 25) / 2 = 52.5
        let reading = assistant.energy_tracker_at(now).unwrap();
        assert_eq!(reading.level, 52);
        assert_eq!(reading.suggestion, "Handle medium-intensity automation tasks");
    }

    #[test]
    fn old_readings_are_ignored() {
        let assistant = assistant();
        let now = at_hour(9);
        assistant
            .database()
            .log_energy(0, "ancient", now - Duration::hours(7))
            .unwrap();
        assert_eq!(assistant.energy_tracker_at(now).unwrap().level, 80);
    }

    #[test]
    fn repeated_calls_smooth_toward_history() {
        let assistant = assistant();
        let now = at_hour(22);
        assistant
            .database()
            .log_energy(100, "caffeine", now - Duration::minutes(30))
            .unwrap();
        let first = assistant.energy_tracker_at(now).unwrap().level;
        let second = assistant.energy_tracker_at(now).unwrap().level;
        // first: floor((35 + 100) / 2) = 67; second: floor((35 + (100 + 67) / 2) / 2) = 59
        assert_eq!(first, 67);
        assert_eq!(second, 59);
    }

    #[test]
    fn level_is_clamped() {
        let assistant = assistant();
        let now = at_hour(3);
        assistant
            .database()
            .log_energy(-500, "broken sensor", now)
            .unwrap();
        let reading = assistant.energy_tracker_at(now).unwrap();
        assert_eq!(reading.level, 0);
        assert_eq!(reading.suggestion, "Stop pretending to work. Go walk.");
    }
}
