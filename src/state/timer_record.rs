//! Timer record structure and its serialized forms

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::{
    format_hms,
    lenient::{deserialize_seconds, deserialize_text},
};

/// Stable identity of a timer, never reused within a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// One countdown timer.
///
/// The running anchor is deliberately absent: scheduling state lives in
/// [`crate::engine::CountdownEngine`] so a record is always plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRecord {
    pub id: TimerId,
    name: String,
    pub initial_time: u64,
    pub remaining_time: u64,
    pub run_state: RunState,
}

impl TimerRecord {
    /// Create an idle timer with a full budget
    pub fn new(id: TimerId, name: Option<&str>, initial_time: u64) -> Self {
        let mut record = Self {
            id,
            name: String::new(),
            initial_time,
            remaining_time: initial_time,
            run_state: RunState::Idle,
        };
        record.set_name(name.unwrap_or_default());
        record
    }

    /// Rebuild a record from its persisted form.
    ///
    /// No run state is stored, so it is derived from the times. A timer that
    /// was running when saved comes back paused.
    pub fn restore(id: TimerId, stored: StoredTimer) -> Self {
        let run_state = if stored.remaining_time == stored.initial_time {
            RunState::Idle
        } else if stored.remaining_time == 0 {
            RunState::Completed
        } else {
            RunState::Paused
        };

        let mut record = Self {
            id,
            name: String::new(),
            initial_time: stored.initial_time,
            remaining_time: stored.remaining_time,
            run_state,
        };
        record.set_name(&stored.name);
        record
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the timer; blank input falls back to `Timer #<id>`
    pub fn set_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            default_name(self.id)
        } else {
            trimmed.to_string()
        };
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn to_stored(&self) -> StoredTimer {
        StoredTimer {
            name: self.name.clone(),
            initial_time: self.initial_time,
            remaining_time: self.remaining_time,
        }
    }

    pub fn view(&self) -> TimerView {
        TimerView {
            id: self.id,
            name: self.name.clone(),
            initial_time: self.initial_time,
            remaining_time: self.remaining_time,
            display: format_hms(self.remaining_time),
            run_state: self.run_state,
        }
    }
}

/// Generated label for a timer without a usable name
pub fn default_name(id: TimerId) -> String {
    format!("Timer #{}", id.0)
}

/// Persisted form of a timer
///
/// Fields are read leniently: negative or non-numeric times count as 0 and a
/// non-text name is replaced by the default on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTimer {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub initial_time: u64,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub remaining_time: u64,
}

/// Render form of a timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub id: TimerId,
    pub name: String,
    pub initial_time: u64,
    pub remaining_time: u64,
    pub display: String,
    pub run_state: RunState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(name: &str, initial_time: u64, remaining_time: u64) -> StoredTimer {
        StoredTimer { name: name.to_string(), initial_time, remaining_time }
    }

    #[test]
    fn new_record_defaults() {
        let record = TimerRecord::new(TimerId(4), None, 0);
        assert_eq!(record.name(), "Timer #4");
        assert_eq!(record.initial_time, 0);
        assert_eq!(record.remaining_time, 0);
        assert_eq!(record.run_state, RunState::Idle);
    }

    #[test]
    fn blank_names_fall_back_to_default() {
        let mut record = TimerRecord::new(TimerId(2), Some("Tea"), 180);
        assert_eq!(record.name(), "Tea");

        record.set_name("   \t");
        assert_eq!(record.name(), "Timer #2");

        record.set_name("  Eggs ");
        assert_eq!(record.name(), "Eggs");
    }

    #[test]
    fn restore_derives_run_state() {
        assert_eq!(TimerRecord::restore(TimerId(1), stored("a", 60, 60)).run_state, RunState::Idle);
        assert_eq!(TimerRecord::restore(TimerId(1), stored("a", 60, 20)).run_state, RunState::Paused);
        assert_eq!(TimerRecord::restore(TimerId(1), stored("a", 60, 0)).run_state, RunState::Completed);
        assert_eq!(TimerRecord::restore(TimerId(1), stored("a", 0, 0)).run_state, RunState::Idle);
    }

    #[test]
    fn restore_repairs_empty_name() {
        let record = TimerRecord::restore(TimerId(9), stored("", 10, 10));
        assert_eq!(record.name(), "Timer #9");
    }

    #[test]
    fn stored_form_uses_camel_case() {
        let record = TimerRecord::new(TimerId(1), Some("Pasta"), 540);
        let json = serde_json::to_value(record.to_stored()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "Pasta", "initialTime": 540, "remainingTime": 540 })
        );
    }

    #[test]
    fn stored_form_clamps_bad_fields() {
        let stored: StoredTimer = serde_json::from_value(serde_json::json!({
            "name": 7,
            "initialTime": "90",
            "remainingTime": -1
        }))
        .unwrap();
        assert_eq!(stored, StoredTimer { name: "7".to_string(), initial_time: 90, remaining_time: 0 });

        let stored: StoredTimer =
            serde_json::from_value(serde_json::json!({ "name": null, "initialTime": "soon" })).unwrap();
        assert_eq!(stored, StoredTimer { name: String::new(), initial_time: 0, remaining_time: 0 });
    }

    #[test]
    fn view_carries_display_text() {
        let mut record = TimerRecord::new(TimerId(1), Some("Pasta"), 540);
        record.remaining_time = 75;
        let view = record.view();
        assert_eq!(view.display, "00:01:15");
        assert_eq!(view.run_state, RunState::Idle);
    }
}
