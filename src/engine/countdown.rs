//! Drift-corrected countdown engine
//!
//! Each running timer has one schedule entry holding the instant it started
//! running and the remaining time at that instant. Every recomputation
//! derives the remaining time from those two values, so late or dropped
//! ticks never accumulate error. Cancelling a countdown means removing its
//! entry; there is nothing else that could keep mutating the record.

use std::{collections::HashMap, sync::Arc, time::Instant};

use tracing::debug;

use super::clock::Clock;
use crate::state::{RunState, TimerId, TimerRecord};

/// Active countdown for one timer
#[derive(Debug, Clone, Copy)]
struct Schedule {
    anchor: Instant,
    baseline: u64,
}

/// Result of recomputing one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or the displayed second did not change
    Unchanged,
    /// Remaining time moved to the given value
    Updated(u64),
    /// Reached zero on this recomputation
    Completed,
}

pub struct CountdownEngine {
    clock: Arc<dyn Clock>,
    schedules: HashMap<TimerId, Schedule>,
}

impl CountdownEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            schedules: HashMap::new(),
        }
    }

    /// Begin counting down from the record's remaining time.
    ///
    /// Returns `false` without touching anything when the timer is already
    /// counting or has nothing left to count.
    pub fn start(&mut self, record: &mut TimerRecord) -> bool {
        if record.is_running() || self.schedules.contains_key(&record.id) {
            debug!("Timer {} already running, ignoring start", record.id);
            return false;
        }
        if record.remaining_time == 0 {
            debug!("Timer {} has no time left, ignoring start", record.id);
            return false;
        }

        self.schedules.insert(
            record.id,
            Schedule {
                anchor: self.clock.now(),
                baseline: record.remaining_time,
            },
        );
        record.run_state = RunState::Running;
        debug!("Timer {} started with {}s", record.id, record.remaining_time);
        true
    }

    /// Recompute the remaining time from the anchor
    pub fn tick(&mut self, record: &mut TimerRecord) -> TickOutcome {
        // Terminal guard: once a timer leaves Running, late ticks are inert
        if !record.is_running() {
            return TickOutcome::Unchanged;
        }
        let Some(schedule) = self.schedules.get(&record.id).copied() else {
            return TickOutcome::Unchanged;
        };

        let elapsed = self
            .clock
            .now()
            .saturating_duration_since(schedule.anchor)
            .as_secs();
        let remaining = schedule.baseline.saturating_sub(elapsed);

        if remaining == 0 {
            self.schedules.remove(&record.id);
            record.remaining_time = 0;
            record.run_state = RunState::Completed;
            debug!("Timer {} completed", record.id);
            return TickOutcome::Completed;
        }

        if remaining == record.remaining_time {
            TickOutcome::Unchanged
        } else {
            record.remaining_time = remaining;
            TickOutcome::Updated(remaining)
        }
    }

    /// Stop counting and keep the last computed remaining time
    pub fn pause(&mut self, record: &mut TimerRecord) {
        if !record.is_running() {
            return;
        }
        self.cancel(record.id);
        record.run_state = RunState::Paused;
        debug!("Timer {} paused at {}s", record.id, record.remaining_time);
    }

    /// Restore the full budget and start counting again
    pub fn reset(&mut self, record: &mut TimerRecord) {
        self.cancel(record.id);
        record.remaining_time = record.initial_time;
        record.run_state = RunState::Idle;
        self.start(record);
    }

    /// Drop the schedule for a timer. Returns whether one existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.schedules.remove(&id).is_some()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.schedules.contains_key(&id)
    }

    /// Instant the timer last started running
    pub fn anchor(&self, id: TimerId) -> Option<Instant> {
        self.schedules.get(&id).map(|s| s.anchor)
    }

    pub fn scheduled_ids(&self) -> Vec<TimerId> {
        let mut ids: Vec<TimerId> = self.schedules.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn active_count(&self) -> usize {
        self.schedules.len()
    }
}
