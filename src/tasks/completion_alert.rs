//! Completion alert background task

use tokio::{
    sync::broadcast::{error::RecvError, Receiver},
    task::JoinSet,
};
use tracing::{debug, info, warn};

use crate::{events::TimerEvent, services::AlertNotifier};

/// Forward every completion event to the notifier until the channel closes.
///
/// Alerts run in their own tasks so a slow alert command never stalls the
/// receive loop; the channel also carries every tick and would otherwise
/// overflow and drop pending completions.
pub async fn completion_alert_task(mut events: Receiver<TimerEvent>, notifier: AlertNotifier) {
    info!("Starting completion alert task");

    let mut alerts = JoinSet::new();

    loop {
        // Reap alerts that already finished
        while alerts.try_join_next().is_some() {}

        match events.recv().await {
            Ok(TimerEvent::Completed { id, name }) => {
                debug!("Alerting for timer {}", id);
                let notifier = notifier.clone();
                alerts.spawn(async move {
                    if let Err(e) = notifier.on_complete(&name).await {
                        warn!("Alert for timer '{}' failed: {}", name, e);
                    }
                });
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Alert task fell behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping alert task");
                break;
            }
        }
    }

    // Let alerts that are still playing finish
    while alerts.join_next().await.is_some() {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{AlertConfig, Volume},
        state::TimerId,
    };
    use std::time::Duration;
    use tokio::sync::broadcast;

    #[tokio::test]
    async fn stops_when_channel_closes() {
        let (tx, rx) = broadcast::channel(8);
        let handle = tokio::spawn(completion_alert_task(rx, AlertNotifier::default()));

        tx.send(TimerEvent::Completed { id: TimerId(1), name: "Tea".to_string() }).unwrap();
        tx.send(TimerEvent::Collection { timers: Vec::new() }).unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("alert task should stop")
            .unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_alerts_do_not_lose_later_completions() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = dir.path().join("alerts.log");
        let notifier = AlertNotifier::new(AlertConfig {
            command: Some("sh".to_string()),
            args: vec![
                "-c".to_string(),
                format!("echo {{name}} >> '{}'; sleep 1", log.display()),
            ],
            volume: Volume::default(),
        });

        let (tx, rx) = broadcast::channel(8);
        let handle = tokio::spawn(completion_alert_task(rx, notifier));

        for name in ["first", "second"] {
            tx.send(TimerEvent::Completed { id: TimerId(1), name: name.to_string() }).unwrap();
            tokio::task::yield_now().await;
        }

        // Far more ticks than the channel holds, delivered while the first
        // alert command is still sleeping
        for remaining in 0..300u64 {
            tx.send(TimerEvent::Tick {
                id: TimerId(2),
                remaining_time: remaining,
                display: String::new(),
            })
            .unwrap();
            if remaining % 4 == 0 {
                tokio::task::yield_now().await;
            }
        }
        drop(tx);

        tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .expect("alert task should stop")
            .unwrap();

        let contents = std::fs::read_to_string(&log).unwrap();
        let mut alerted: Vec<&str> = contents.lines().collect();
        alerted.sort();
        assert_eq!(alerted, ["first", "second"]);
    }
}
