//! Countdown Deck - A persistent collection of countdown timers
//!
//! This library keeps a set of independent, editable countdown timers,
//! computes their remaining time from elapsed wall-clock time, saves the
//! collection after every change and serves it over HTTP.

pub mod api;
pub mod config;
pub mod controller;
pub mod engine;
pub mod events;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use controller::TimerController;
pub use events::TimerEvent;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
