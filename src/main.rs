//! Countdown Deck - A persistent collection of countdown timers
//!
//! This is the main entry point for the countdown-deck application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use countdown_deck::{
    api::create_router,
    config::Config,
    controller::TimerController,
    engine::SystemClock,
    services::{AlertNotifier, JsonFileStorage},
    state::AppState,
    tasks::{completion_alert_task, countdown_ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_deck={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-deck v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data_file={}, tick={}ms",
        config.host,
        config.port,
        config.data_file.display(),
        config.tick_period().as_millis()
    );

    let storage = JsonFileStorage::new(&config.data_file);
    let controller = TimerController::open(Box::new(storage), Arc::new(SystemClock));
    let state = Arc::new(AppState::new(controller, config.port, config.host.clone()));

    // Subscribe before any tick can complete a timer
    let alert_events = state.subscribe();
    tokio::spawn(completion_alert_task(alert_events, AlertNotifier::new(config.alert_config())));
    tokio::spawn(countdown_ticker_task(Arc::clone(&state), config.tick_period()));

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers              - List timers");
    info!("  POST   /timers              - Add a timer");
    info!("  GET    /timers/:id          - Show one timer");
    info!("  PUT    /timers/:id/name     - Rename a timer");
    info!("  PUT    /timers/:id/duration - Set a timer's duration");
    info!("  POST   /timers/:id/start    - Start counting down");
    info!("  POST   /timers/:id/pause    - Pause");
    info!("  POST   /timers/:id/reset    - Restore the budget and restart");
    info!("  DELETE /timers/:id          - Delete a timer");
    info!("  GET    /events              - Server-sent timer updates");
    info!("  GET    /health              - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Capture the latest remaining times before exiting
    if let Err(e) = state.with_controller(|controller| controller.flush()) {
        error!("Failed to save timers on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
