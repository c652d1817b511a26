//! Countdown engine module
//!
//! The run-state machine and the clocks it reads time from.

pub mod clock;
pub mod countdown;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{CountdownEngine, TickOutcome};
