//! Completion alerts

use tokio::process::Command;
use tracing::{debug, info};

/// Playback volume, always within `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Clamp into range; NaN means full volume
    pub fn new(level: f32) -> Self {
        if level.is_nan() {
            Self(1.0)
        } else {
            Self(level.clamp(0.0, 1.0))
        }
    }

    pub fn level(&self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(1.0)
    }
}

/// External command to run when a timer finishes
#[derive(Debug, Clone, Default)]
pub struct AlertConfig {
    pub command: Option<String>,
    /// `{name}` and `{volume}` are substituted in each argument
    pub args: Vec<String>,
    pub volume: Volume,
}

/// Signals that a timer finished
#[derive(Debug, Clone, Default)]
pub struct AlertNotifier {
    config: AlertConfig,
}

impl AlertNotifier {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    /// Announce a finished timer and run the alert command, if any
    pub async fn on_complete(&self, timer_name: &str) -> Result<(), String> {
        info!("Timer '{}' finished", timer_name);

        let Some(program) = &self.config.command else {
            return Ok(());
        };

        let args = self.render_args(timer_name);
        debug!("Running alert command: {} {:?}", program, args);

        let output = Command::new(program)
            .args(&args)
            .output()
            .await
            .map_err(|e| format!("Failed to execute alert command {}: {}", program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("Alert command {} failed: {}", program, stderr.trim()));
        }

        Ok(())
    }

    fn render_args(&self, timer_name: &str) -> Vec<String> {
        let volume = format!("{:.2}", self.config.volume.level());
        self.config
            .args
            .iter()
            .map(|arg| arg.replace("{name}", timer_name).replace("{volume}", &volume))
            .collect()
    }
}
