//! Countdown ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::state::AppState;

/// The single scheduler for all timers: periodically asks the controller to
/// recompute every running countdown.
///
/// The period only controls how often the display refreshes. Remaining time
/// is always derived from elapsed time, so a late tick just catches up.
pub async fn countdown_ticker_task(state: Arc<AppState>, period: Duration) {
    info!("Starting countdown ticker with a {}ms period", period.as_millis());

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        if let Err(e) = state.with_controller(|controller| controller.tick()) {
            error!("Failed to recompute timers: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controller::TimerController,
        engine::ManualClock,
        services::MemoryStorage,
        state::RunState,
    };

    #[tokio::test(start_paused = true)]
    async fn ticker_drives_running_timers() {
        let clock = ManualClock::new();
        let controller = TimerController::open(Box::new(MemoryStorage::new()), Arc::new(clock.clone()));
        let state = Arc::new(AppState::new(controller, 0, "127.0.0.1".to_string()));

        let id = state
            .with_controller(|c| {
                let id = c.add(Some("Tea"), Some(10));
                c.start(id);
                id
            })
            .unwrap();

        let handle = tokio::spawn(countdown_ticker_task(Arc::clone(&state), Duration::from_secs(1)));

        clock.advance_secs(4);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let view = state.with_controller(|c| c.timer(id)).unwrap().unwrap();
        assert_eq!(view.remaining_time, 6);

        clock.advance_secs(6);
        tokio::time::sleep(Duration::from_secs(1)).await;
        let view = state.with_controller(|c| c.timer(id)).unwrap().unwrap();
        assert_eq!(view.remaining_time, 0);
        assert_eq!(view.run_state, RunState::Completed);

        handle.abort();
    }
}
