//! `HH:MM:SS` formatting and lenient parsing

use std::fmt;

/// A duration split into hours, minutes and seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    /// Total number of seconds, saturating at `u64::MAX`
    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

impl From<u64> for Hms {
    fn from(seconds: u64) -> Self {
        Self {
            hours: seconds / 3600,
            minutes: (seconds % 3600) / 60,
            seconds: seconds % 60,
        }
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { hours, minutes, seconds } = self;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Carry seconds >= 60 into minutes, then minutes >= 60 into hours
pub fn normalize(hours: u64, minutes: u64, seconds: u64) -> Hms {
    let minutes = minutes.saturating_add(seconds / 60);
    Hms {
        hours: hours.saturating_add(minutes / 60),
        minutes: minutes % 60,
        seconds: seconds % 60,
    }
}

/// Format seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(seconds: u64) -> String {
    Hms::from(seconds).to_string()
}

/// Parse `HH:MM:SS` into seconds.
///
/// Fields are positional from the left. A missing or unparseable field
/// counts as zero and anything with more than three fields is treated as
/// zero altogether. This never fails; bad input degrades to a best-effort
/// value instead.
pub fn parse_hms(text: &str) -> u64 {
    let fields: Vec<&str> = text.trim().split(':').collect();
    if fields.len() > 3 {
        return 0;
    }

    let field = |index: usize| -> u64 {
        fields
            .get(index)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0)
    };

    normalize(field(0), field(1), field(2)).total_seconds()
}
