//! State management module
//!
//! Timer records, the ordered store that persists them, and the shared
//! application state handed to the HTTP layer and background tasks.

pub mod app_state;
pub mod timer_record;
pub mod timer_store;

// Re-export main types
pub use app_state::AppState;
pub use timer_record::{default_name, RunState, StoredTimer, TimerId, TimerRecord, TimerView};
pub use timer_store::TimerStore;
