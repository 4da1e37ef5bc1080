use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::event::{EventBus, RoomSubscription};
use crate::game::GameService;
use crate::websockets::{
    ConnectionManager, InMemoryConnectionManager, PetNameUsernameGenerator, UsernameGenerator,
    WebSocketRoomSubscriber,
};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService>,
    pub event_bus: EventBus,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub username_generator: Arc<dyn UsernameGenerator>,
    /// Rooms that already have an event-to-websocket pump running
    subscribed_rooms: Arc<RwLock<HashSet<String>>>,
}

impl AppState {
    pub fn new() -> Self {
        let event_bus = EventBus::new();
        Self {
            game_service: Arc::new(GameService::new(event_bus.clone())),
            event_bus,
            connection_manager: Arc::new(InMemoryConnectionManager::new()),
            username_generator: Arc::new(PetNameUsernameGenerator::new()),
            subscribed_rooms: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Make sure exactly one subscription pumps this room's game events into
    /// the connection manager. Called on every connect; only the first call
    /// per room does anything.
    pub async fn ensure_room_subscription(&self, room_id: &str) {
        {
            let subscribed = self.subscribed_rooms.read().await;
            if subscribed.contains(room_id) {
                return;
            }
        }

        let mut subscribed = self.subscribed_rooms.write().await;
        // A concurrent connect may have won the race for the write lock
        if !subscribed.insert(room_id.to_string()) {
            return;
        }

        let handler = Arc::new(WebSocketRoomSubscriber::new(Arc::clone(
            &self.connection_manager,
        )));
        RoomSubscription::new(room_id.to_string(), handler, self.event_bus.clone())
            .start()
            .await;

        info!(room_id = %room_id, "Room event subscription started");
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
