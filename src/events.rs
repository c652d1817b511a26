//! Events published to render and notify subscribers

use serde::{Deserialize, Serialize};

use crate::state::{TimerId, TimerView};

/// Capacity of the timer event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimerEvent {
    /// Full ordered collection after a mutation; redraw everything
    Collection { timers: Vec<TimerView> },
    /// Remaining time of one timer changed
    #[serde(rename_all = "camelCase")]
    Tick {
        id: TimerId,
        remaining_time: u64,
        display: String,
    },
    /// A timer reached zero
    Completed { id: TimerId, name: String },
}

impl TimerEvent {
    /// Event name used on the server-sent event stream
    pub fn kind(&self) -> &'static str {
        match self {
            TimerEvent::Collection { .. } => "collection",
            TimerEvent::Tick { .. } => "tick",
            TimerEvent::Completed { .. } => "completed",
        }
    }
}
