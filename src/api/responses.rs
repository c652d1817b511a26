//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::{lenient_seconds, parse_hms};

/// Body of `POST /timers`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimerRequest {
    pub name: Option<String>,
    /// Seconds, as a number or a numeric string
    pub initial_time: Option<Value>,
    /// `HH:MM:SS`, used when `initialTime` is absent
    pub duration: Option<String>,
}

impl CreateTimerRequest {
    pub fn initial_seconds(&self) -> Option<u64> {
        match (&self.initial_time, &self.duration) {
            (Some(value), _) => Some(lenient_seconds(value)),
            (None, Some(text)) => Some(parse_hms(text)),
            (None, None) => None,
        }
    }
}

/// Body of `PUT /timers/:id/name`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenameRequest {
    #[serde(default)]
    pub name: String,
}

/// Body of `PUT /timers/:id/duration`.
///
/// Either separate fields or a single `text` in `HH:MM:SS` form; `text` wins
/// when both are given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DurationRequest {
    pub hours: Option<Value>,
    pub minutes: Option<Value>,
    pub seconds: Option<Value>,
    pub text: Option<String>,
}

impl DurationRequest {
    /// Raw (un-normalized) hours, minutes and seconds
    pub fn fields(&self) -> (u64, u64, u64) {
        if let Some(text) = &self.text {
            return (0, 0, parse_hms(text));
        }
        let field = |value: &Option<Value>| value.as_ref().map(lenient_seconds).unwrap_or(0);
        (field(&self.hours), field(&self.minutes), field(&self.seconds))
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub host: String,
    pub port: u16,
    pub timers: usize,
    pub active_countdowns: usize,
}

impl HealthResponse {
    pub fn ok(uptime: String, host: String, port: u16, timers: usize, active_countdowns: usize) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
            host,
            port,
            timers,
            active_countdowns,
        }
    }
}
