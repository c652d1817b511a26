//! HTTP endpoint handlers
//!
//! Mutating endpoints always answer with the full ordered collection so a
//! client can redraw from the response. Operations on unknown timers are
//! ignored rather than reported.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, warn};

use super::responses::{CreateTimerRequest, DurationRequest, HealthResponse, RenameRequest};
use crate::{
    controller::TimerController,
    events::TimerEvent,
    state::{AppState, TimerId, TimerView},
};

type CollectionResult = Result<Json<Vec<TimerView>>, StatusCode>;

/// Apply an operation and return the resulting collection
fn apply<F>(state: &AppState, action: &str, operation: F) -> CollectionResult
where
    F: FnOnce(&mut TimerController) -> bool,
{
    state
        .with_controller(|controller| {
            if !operation(controller) {
                debug!("{} ignored for unknown timer", action);
            }
            controller.timers()
        })
        .map(Json)
        .map_err(|e| {
            error!("Failed to {}: {}", action, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Handle GET /timers
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> CollectionResult {
    apply(&state, "list timers", |_| true)
}

/// Handle POST /timers - A missing or unreadable body creates a default timer
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateTimerRequest>>,
) -> CollectionResult {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let initial_time = request.initial_seconds();
    apply(&state, "add timer", |controller| {
        controller.add(request.name.as_deref(), initial_time);
        true
    })
}

/// Handle GET /timers/:id
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<TimerView>, StatusCode> {
    match state.with_controller(|controller| controller.timer(TimerId(id))) {
        Ok(Some(view)) => Ok(Json(view)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to read timer {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /timers/:id/name
pub async fn rename_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    body: Option<Json<RenameRequest>>,
) -> CollectionResult {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    apply(&state, "rename timer", |controller| {
        controller.edit_name(TimerId(id), &request.name)
    })
}

/// Handle PUT /timers/:id/duration
pub async fn set_duration_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    body: Option<Json<DurationRequest>>,
) -> CollectionResult {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let (hours, minutes, seconds) = request.fields();
    apply(&state, "set timer duration", |controller| {
        controller.edit_duration(TimerId(id), hours, minutes, seconds)
    })
}

/// Handle POST /timers/:id/start
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> CollectionResult {
    apply(&state, "start timer", |controller| controller.start(TimerId(id)))
}

/// Handle POST /timers/:id/pause
pub async fn pause_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> CollectionResult {
    apply(&state, "pause timer", |controller| controller.pause(TimerId(id)))
}

/// Handle POST /timers/:id/reset
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> CollectionResult {
    apply(&state, "reset timer", |controller| controller.reset(TimerId(id)))
}

/// Handle DELETE /timers/:id
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> CollectionResult {
    apply(&state, "delete timer", |controller| controller.delete(TimerId(id)))
}

fn to_sse(event: &TimerEvent) -> Result<Event, axum::Error> {
    Event::default().event(event.kind()).json_data(event)
}

/// Handle GET /events - Current collection first, then live updates
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, StatusCode> {
    // Subscribe before taking the snapshot so nothing falls in between
    let rx = state.subscribe();
    let timers = state.with_controller(|controller| controller.timers()).map_err(|e| {
        error!("Failed to snapshot timers: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let snapshot = TimerEvent::Collection { timers };

    let updates = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((to_sse(&event), rx)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream client lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let events = stream::once(async move { to_sse(&snapshot) }).chain(updates);
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, StatusCode> {
    state
        .with_controller(|controller| (controller.len(), controller.active_countdowns()))
        .map(|(timers, active)| {
            Json(HealthResponse::ok(
                state.get_uptime(),
                state.host.clone(),
                state.port,
                timers,
                active,
            ))
        })
        .map_err(|e| {
            error!("Failed to read timer counts: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
