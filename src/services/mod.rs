//! External collaborator module
//!
//! Persistence backends for the timer collection and completion alerts.

pub mod alert;
pub mod storage;

// Re-export main types
pub use alert::{AlertConfig, AlertNotifier, Volume};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
