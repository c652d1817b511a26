//! Timer orchestration: store mutations, countdown control and side effects

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::{
    engine::{Clock, CountdownEngine, TickOutcome},
    events::{TimerEvent, EVENT_CHANNEL_CAPACITY},
    services::Storage,
    state::{RunState, TimerId, TimerRecord, TimerStore, TimerView},
    utils::{format_hms, normalize},
};

/// Drives every timer operation.
///
/// Each mutation persists the whole collection and publishes a
/// [`TimerEvent::Collection`]. Operations on unknown ids do nothing and
/// return `false`.
pub struct TimerController {
    store: TimerStore,
    engine: CountdownEngine,
    events_tx: broadcast::Sender<TimerEvent>,
}

impl TimerController {
    pub fn new(store: TimerStore, engine: CountdownEngine) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { store, engine, events_tx }
    }

    /// Load the stored collection and wire up an engine on the given clock
    pub fn open(storage: Box<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self::new(TimerStore::open(storage), CountdownEngine::new(clock))
    }

    pub fn event_sender(&self) -> broadcast::Sender<TimerEvent> {
        self.events_tx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    /// Create a timer and append it to the collection
    pub fn add(&mut self, name: Option<&str>, initial_time: Option<u64>) -> TimerId {
        let id = self.store.allocate_id();
        let record = TimerRecord::new(id, name, initial_time.unwrap_or(0));
        info!("Adding timer {} '{}' ({}s)", id, record.name(), record.initial_time);
        self.store.add(record);
        self.commit();
        id
    }

    /// Rename a timer; blank names become the generated default
    pub fn edit_name(&mut self, id: TimerId, name: &str) -> bool {
        let Some(record) = self.store.get_mut(id) else {
            return false;
        };
        record.set_name(name);
        debug!("Renamed timer {} to '{}'", id, record.name());
        self.commit();
        true
    }

    /// Replace the timer's budget. Progress is discarded; a running timer
    /// keeps running on the new budget.
    pub fn edit_duration(&mut self, id: TimerId, hours: u64, minutes: u64, seconds: u64) -> bool {
        let total = normalize(hours, minutes, seconds).total_seconds();
        let Some(record) = self.store.get_mut(id) else {
            return false;
        };

        let was_running = self.engine.cancel(id);
        record.initial_time = total;
        record.remaining_time = total;
        record.run_state = RunState::Idle;
        if was_running {
            self.engine.start(record);
        }

        info!("Timer {} duration set to {}", id, format_hms(total));
        self.commit();
        true
    }

    pub fn start(&mut self, id: TimerId) -> bool {
        let Some(record) = self.store.get_mut(id) else {
            return false;
        };
        if self.engine.start(record) {
            info!("Started timer {} '{}'", id, record.name());
        }
        self.commit();
        true
    }

    pub fn pause(&mut self, id: TimerId) -> bool {
        let Some(record) = self.store.get_mut(id) else {
            return false;
        };
        self.engine.pause(record);
        self.commit();
        true
    }

    /// Restore the full budget and resume counting
    pub fn reset(&mut self, id: TimerId) -> bool {
        let Some(record) = self.store.get_mut(id) else {
            return false;
        };
        self.engine.reset(record);
        info!("Reset timer {} '{}'", id, record.name());
        self.commit();
        true
    }

    /// Stop any countdown, then remove the timer
    pub fn delete(&mut self, id: TimerId) -> bool {
        if self.engine.cancel(id) {
            debug!("Cancelled countdown for timer {} before delete", id);
        }
        let Some(record) = self.store.remove(id) else {
            return false;
        };
        info!("Deleted timer {} '{}'", id, record.name());
        self.commit();
        true
    }

    /// Recompute every scheduled timer and publish what changed
    pub fn tick(&mut self) {
        let mut completed = false;

        for id in self.engine.scheduled_ids() {
            let Some(record) = self.store.get_mut(id) else {
                error!("Countdown for timer {} outlived its record, cancelling", id);
                self.engine.cancel(id);
                continue;
            };

            match self.engine.tick(record) {
                TickOutcome::Unchanged => {}
                TickOutcome::Updated(remaining) => {
                    let event = tick_event(id, remaining);
                    self.publish(event);
                }
                TickOutcome::Completed => {
                    info!("Timer {} '{}' finished", id, record.name());
                    let name = record.name().to_string();
                    self.publish(tick_event(id, 0));
                    self.publish(TimerEvent::Completed { id, name });
                    completed = true;
                }
            }
        }

        if completed {
            self.commit();
        }
    }

    /// Bring running timers up to date and persist, e.g. before shutdown
    pub fn flush(&mut self) {
        self.tick();
        self.store.save();
    }

    pub fn timers(&self) -> Vec<TimerView> {
        self.store.records().iter().map(TimerRecord::view).collect()
    }

    pub fn timer(&self, id: TimerId) -> Option<TimerView> {
        self.store.get(id).map(TimerRecord::view)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of timers currently counting down
    pub fn active_countdowns(&self) -> usize {
        self.engine.active_count()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.engine.is_scheduled(id)
    }

    /// Persist and ask renderers to redraw
    fn commit(&mut self) {
        self.store.save();
        let timers = self.timers();
        self.publish(TimerEvent::Collection { timers });
    }

    fn publish(&self, event: TimerEvent) {
        // No subscribers is normal when nobody is watching
        if self.events_tx.send(event).is_err() {
            debug!("No event subscribers");
        }
    }
}

fn tick_event(id: TimerId, remaining: u64) -> TimerEvent {
    TimerEvent::Tick {
        id,
        remaining_time: remaining,
        display: format_hms(remaining),
    }
}
