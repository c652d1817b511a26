//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::services::{AlertConfig, Volume};

/// Shortest accepted tick period
const MIN_TICK_MS: u64 = 50;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown-deck")]
#[command(about = "A persistent collection of drift-corrected countdown timers served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File holding the saved timer collection
    #[arg(short, long, default_value = "timers.json")]
    pub data_file: PathBuf,

    /// How often running timers are recomputed, in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Program to run when a timer finishes
    #[arg(long)]
    pub alert_command: Option<String>,

    /// Argument for the alert program; `{name}` and `{volume}` are substituted
    #[arg(long = "alert-arg", allow_hyphen_values = true)]
    pub alert_args: Vec<String>,

    /// Alert volume between 0.0 and 1.0
    #[arg(long, default_value = "1.0")]
    pub volume: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(MIN_TICK_MS))
    }

    pub fn alert_config(&self) -> AlertConfig {
        AlertConfig {
            command: self.alert_command.clone(),
            args: self.alert_args.clone(),
            volume: Volume::new(self.volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["countdown-deck"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.data_file, PathBuf::from("timers.json"));
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert_eq!(config.log_level(), "info");
        assert!(config.alert_config().command.is_none());
    }

    #[test]
    fn tick_period_has_a_floor() {
        let config = Config::try_parse_from(["countdown-deck", "--tick-ms", "1"]).unwrap();
        assert_eq!(config.tick_period(), Duration::from_millis(MIN_TICK_MS));
    }

    #[test]
    fn alert_settings() {
        let config = Config::try_parse_from([
            "countdown-deck",
            "--alert-command",
            "paplay",
            "--alert-arg",
            "--volume={volume}",
            "--alert-arg",
            "bell.oga",
            "--volume",
            "3",
            "-v",
        ])
        .unwrap();

        let alert = config.alert_config();
        assert_eq!(alert.command.as_deref(), Some("paplay"));
        assert_eq!(alert.args, ["--volume={volume}", "bell.oga"]);
        assert_eq!(alert.volume.level(), 1.0);
        assert_eq!(config.log_level(), "debug");
    }
}
