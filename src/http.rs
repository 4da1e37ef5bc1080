use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::shared::{AppError, AppState};
use crate::websockets::websocket_handler;

/// Build the application router.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Bingo server" }))
        .route("/ws/:room_id", get(websocket_handler))
        .route("/rooms/:room_id", get(room_status))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomStatusResponse {
    pub room_id: String,
    pub status: String,
    pub called_count: usize,
    pub participants: Vec<ParticipantSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant_id: String,
    pub name: String,
    pub line_count: u8,
}

/// Read-only snapshot of a room's game for dashboards and debugging.
///
/// GET /rooms/{room_id}
#[instrument(name = "room_status", skip(state))]
pub async fn room_status(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomStatusResponse>, AppError> {
    let game = state
        .game_service
        .get_game(&room_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("no active game in room {}", room_id)))?;

    let participants = game
        .participants()
        .iter()
        .map(|p| ParticipantSummary {
            participant_id: p.id.clone(),
            name: p.name.clone(),
            line_count: p.line_count,
        })
        .collect();

    Ok(Json(RoomStatusResponse {
        room_id,
        status: format!("{:?}", game.status()),
        called_count: game.called_numbers().len(),
        participants,
    }))
}
