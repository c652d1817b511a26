//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod completion_alert;
pub mod countdown_ticker;

// Re-export main functions
pub use completion_alert::completion_alert_task;
pub use countdown_ticker::countdown_ticker_task;
