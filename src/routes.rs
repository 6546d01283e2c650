use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json, Router,
};

use crate::state::AppState;
use crate::ws::handler as ws_handler;
use crate::ws::protocol::RoomSummary;

/// GET /api/rooms — Snapshot of all rooms in creation order.
async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    Json(state.rooms.list_rooms(None))
}

/// GET /api/rooms/{id} — Room-existence probe: 200 with the summary, or 404.
async fn room_info(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummary>, StatusCode> {
    state
        .rooms
        .list_rooms(None)
        .into_iter()
        .find(|room| room.room_id == room_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Build the full axum Router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/rooms", axum::routing::get(list_rooms))
        .route("/api/rooms/{id}", axum::routing::get(room_info))
        .route("/ws", axum::routing::get(ws_handler::ws_upgrade))
        .route("/health", axum::routing::get(health_check))
        .with_state(state)
}

/// Basic health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
