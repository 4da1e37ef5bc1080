use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::game::GameService;
use crate::render;
use crate::shared::AppState;
use crate::websockets::commands::{parse_command, ChatCommand};
use crate::websockets::identity;
use crate::websockets::messages::WebSocketMessage;

use super::socket::{Connection, MessageHandler};

/// Turns inbound chat lines into game operations.
///
/// Outcomes are not reported here: every accepted or rejected operation
/// surfaces as an event on the bus, and the room subscriber takes it from
/// there. Lines that parse as nothing are plain table talk and get dropped.
pub struct ChatCommandHandler {
    game_service: Arc<GameService>,
}

impl ChatCommandHandler {
    pub fn new(game_service: Arc<GameService>) -> Self {
        Self { game_service }
    }
}

#[async_trait]
impl MessageHandler for ChatCommandHandler {
    async fn handle_message(&self, participant_id: &str, name: &str, room_id: &str, text: String) {
        let command = match parse_command(&text) {
            Some(command) => command,
            None => {
                debug!(
                    participant_id = %participant_id,
                    room_id = %room_id,
                    text = %text,
                    "Ignoring non-command chat line"
                );
                return;
            }
        };

        info!(
            participant_id = %participant_id,
            room_id = %room_id,
            command = ?command,
            "Handling chat command"
        );

        match command {
            ChatCommand::StartGame => self.game_service.start_game(room_id).await,
            ChatCommand::Join => {
                let _ = self
                    .game_service
                    .join(room_id, participant_id, name)
                    .await;
            }
            ChatCommand::Lock => {
                let _ = self.game_service.lock(room_id, participant_id).await;
            }
            ChatCommand::Reset => {
                let _ = self.game_service.reset_game(room_id, participant_id).await;
            }
            ChatCommand::Call(number) => {
                let _ = self
                    .game_service
                    .call_number(room_id, participant_id, number)
                    .await;
            }
        }
    }
}

/// Connection identity supplied by the client. Both parts are optional;
/// missing ones are generated server side.
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub uid: Option<String>,
    pub name: Option<String>,
}

/// WebSocket endpoint for a bingo room
/// GET /ws/{room_id}?uid={participant_id}&name={display_name}
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    Query(params): Query<ConnectParams>,
    State(app_state): State<AppState>,
) -> Response {
    let participant_id = params
        .uid
        .filter(|uid| !uid.trim().is_empty())
        .unwrap_or_else(identity::generate_participant_id);
    let name = match params.name.filter(|name| !name.trim().is_empty()) {
        Some(name) => name,
        None => app_state.username_generator.generate().await,
    };

    info!(
        room_id = %room_id,
        participant_id = %participant_id,
        name = %name,
        "WebSocket connection requested"
    );

    ws.on_upgrade(move |socket| {
        handle_websocket_connection(socket, room_id, participant_id, name, app_state)
    })
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    room_id: String,
    participant_id: String,
    name: String,
    app_state: AppState,
) {
    info!(
        room_id = %room_id,
        participant_id = %participant_id,
        name = %name,
        "WebSocket connection established"
    );

    // Announcements for this room flow only once a subscription pumps the
    // event bus into the connection manager
    app_state.ensure_room_subscription(&room_id).await;

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(&room_id, &participant_id, outbound_sender.clone())
        .await;

    // A reconnecting participant gets their current board straight away
    if let Some(view) = app_state
        .game_service
        .card_view(&room_id, &participant_id)
        .await
    {
        let message = WebSocketMessage::card_update(render::render_view(&view));
        if let Ok(message_json) = serde_json::to_string(&message) {
            let _ = outbound_sender.send(message_json);
            debug!(
                room_id = %room_id,
                participant_id = %participant_id,
                "Sent current board to reconnected participant"
            );
        }
    }

    let socket_wrapper = Box::new(socket);
    let message_handler = Arc::new(ChatCommandHandler::new(app_state.game_service.clone()));

    let connection = Connection::new(
        participant_id.clone(),
        name.clone(),
        room_id.clone(),
        socket_wrapper,
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(
                room_id = %room_id,
                participant_id = %participant_id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                room_id = %room_id,
                participant_id = %participant_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup; game state is untouched, a disconnect is not a leave
    app_state
        .connection_manager
        .remove_connection(&room_id, &participant_id)
        .await;
}
