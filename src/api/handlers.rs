//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::warn;

use crate::state::{AppState, PreferencesUpdate, TimerKind, TimerPreferences};
use super::responses::{
    ErrorResponse, FormatQuery, FormatResponse, HealthResponse, StartRequest, StatusResponse,
    TimerView,
};

type Rejection = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: String) -> Rejection {
    warn!("Rejected request: {}", message);
    (status, Json(ErrorResponse::new(message)))
}

fn views(state: &AppState) -> Vec<TimerView> {
    TimerKind::ALL
        .into_iter()
        .map(|kind| TimerView::new(kind, &state.timer(kind).state()))
        .collect()
}

/// Handle GET /timers - Both timers
pub async fn timers_handler(State(state): State<Arc<AppState>>) -> Json<Vec<TimerView>> {
    Json(views(&state))
}

/// Handle GET /timers/:kind - One timer
pub async fn timer_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<TimerKind>,
) -> Json<TimerView> {
    Json(TimerView::new(kind, &state.timer(kind).state()))
}

/// Handle POST /timers/:kind/start - Start a session
///
/// Focus sessions belong to a task; a break may or may not.
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<TimerKind>,
    Json(request): Json<StartRequest>,
) -> Result<Json<TimerView>, Rejection> {
    let task_id = request.task_id.filter(|id| !id.trim().is_empty());

    if kind == TimerKind::Focus && task_id.is_none() {
        return Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "A focus session needs a taskId".to_string(),
        ));
    }

    let timer_state = state.start_timer(kind, task_id);
    Ok(Json(TimerView::new(kind, &timer_state)))
}

/// Handle POST /timers/:kind/stop - Cancel a session
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<TimerKind>,
) -> Json<TimerView> {
    let timer_state = state.stop_timer(kind);
    Json(TimerView::new(kind, &timer_state))
}

/// Handle GET /preferences - Current durations
pub async fn get_preferences_handler(State(state): State<Arc<AppState>>) -> Json<TimerPreferences> {
    Json(state.preferences.get())
}

/// Handle PUT /preferences - Change durations for future sessions
pub async fn put_preferences_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<TimerPreferences>, Rejection> {
    state
        .update_preferences(update)
        .map(Json)
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e))
}

/// Handle GET /format?seconds=N - Render a duration as MM:SS
pub async fn format_handler(Query(query): Query<FormatQuery>) -> Json<FormatResponse> {
    Json(FormatResponse::new(query.seconds))
}

/// Handle GET /status - Return current status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timers: views(&state),
        preferences: state.preferences.get(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
