//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use tokio::sync::broadcast;

use crate::{controller::TimerController, events::TimerEvent};

/// Shared state handed to the HTTP layer and background tasks
pub struct AppState {
    /// Every timer operation goes through this lock, so a pause or delete
    /// always lands before the next tick
    pub controller: Arc<Mutex<TimerController>>,
    /// Render and notify subscribers attach here
    pub events_tx: broadcast::Sender<TimerEvent>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    pub fn new(controller: TimerController, port: u16, host: String) -> Self {
        let events_tx = controller.event_sender();
        Self {
            controller: Arc::new(Mutex::new(controller)),
            events_tx,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Run a closure with exclusive access to the controller
    pub fn with_controller<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&mut TimerController) -> T,
    {
        let mut controller = self
            .controller
            .lock()
            .map_err(|e| format!("Failed to lock timer controller: {}", e))?;
        Ok(f(&mut controller))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
