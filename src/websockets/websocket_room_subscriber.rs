use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::{
    event::{GameEvent, RoomEventError, RoomEventHandler},
    game::CardView,
    render,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

/// WebSocket-specific room event handler
///
/// Translates game events into chat traffic: announcements fan out to the
/// whole room, while boards and rejections go as direct messages to the
/// participant they concern.
pub struct WebSocketRoomSubscriber {
    connection_manager: Arc<dyn ConnectionManager>,
}

impl WebSocketRoomSubscriber {
    pub fn new(connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self { connection_manager }
    }

    async fn broadcast(
        &self,
        room_id: &str,
        message: WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = serialize(&message)?;
        self.connection_manager
            .broadcast_to_room(room_id, &message_json)
            .await;
        Ok(())
    }

    async fn direct(
        &self,
        room_id: &str,
        participant_id: &str,
        message: WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = serialize(&message)?;
        self.connection_manager
            .send_to_participant(room_id, participant_id, &message_json)
            .await;
        Ok(())
    }

    async fn send_board(&self, room_id: &str, view: &CardView) -> Result<(), RoomEventError> {
        let message = WebSocketMessage::card_update(render::render_view(view));
        self.direct(room_id, &view.participant_id, message).await
    }
}

fn serialize(message: &WebSocketMessage) -> Result<String, RoomEventError> {
    serde_json::to_string(message)
        .map_err(|e| RoomEventError::HandlerError(format!("Failed to serialize message: {}", e)))
}

#[async_trait]
impl RoomEventHandler for WebSocketRoomSubscriber {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: GameEvent,
    ) -> Result<(), RoomEventError> {
        debug!(
            room_id = %room_id,
            event = event.event_type(),
            "Handling game event for WebSocket connections"
        );

        match event {
            GameEvent::GameStarted { .. } => {
                self.broadcast(room_id, WebSocketMessage::game_started())
                    .await
            }
            GameEvent::PlayerJoined {
                participant_id,
                name,
                card,
                ..
            } => {
                self.broadcast(
                    room_id,
                    WebSocketMessage::player_joined(participant_id.clone(), name.clone()),
                )
                .await?;

                // The fresh card goes to the joiner only
                let board = render::render_card(&name, &card, &HashSet::new(), &[]);
                self.direct(
                    room_id,
                    &participant_id,
                    WebSocketMessage::card_update(board),
                )
                .await
            }
            GameEvent::GameLocked { .. } => {
                self.broadcast(room_id, WebSocketMessage::game_locked())
                    .await
            }
            GameEvent::NumberCalled {
                caller_id,
                caller_name,
                number,
                boards,
                ..
            } => {
                self.broadcast(
                    room_id,
                    WebSocketMessage::number_called(caller_id, caller_name, number),
                )
                .await?;

                for view in &boards {
                    self.send_board(room_id, view).await?;
                }
                Ok(())
            }
            GameEvent::LineProgress {
                participant_id,
                name,
                line_count,
                ..
            } => {
                self.broadcast(
                    room_id,
                    WebSocketMessage::line_progress(participant_id, name, line_count),
                )
                .await
            }
            GameEvent::GameWon {
                winner_id,
                winner_name,
                ..
            } => {
                self.broadcast(room_id, WebSocketMessage::game_won(winner_id, winner_name))
                    .await
            }
            GameEvent::GameReset { .. } => {
                self.broadcast(room_id, WebSocketMessage::game_reset())
                    .await
            }
            GameEvent::OperationRejected {
                actor_id,
                command,
                error,
                ..
            } => {
                // Rejections concern one participant; the room stays quiet
                self.direct(
                    room_id,
                    &actor_id,
                    WebSocketMessage::command_rejected(command.to_string(), &error),
                )
                .await
            }
        }
    }

    fn handler_name(&self) -> &'static str {
        "WebSocketRoomSubscriber"
    }
}
