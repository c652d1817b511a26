//! Utility functions module
//!
//! Shutdown signal handling, `HH:MM:SS` time formatting and lenient
//! number parsing.

pub mod lenient;
pub mod signals;
pub mod time_format;

// Re-export main functions
pub use lenient::lenient_seconds;
pub use signals::shutdown_signal;
pub use time_format::{format_hms, normalize, parse_hms, Hms};
