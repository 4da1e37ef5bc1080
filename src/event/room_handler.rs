use async_trait::async_trait;
use thiserror::Error;

use super::events::GameEvent;

/// Errors a room event handler can surface. These never stop the
/// subscription; failed events are logged and the stream moves on.
#[derive(Debug, Error)]
pub enum RoomEventError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Handler error: {0}")]
    HandlerError(String),
}

/// A consumer of one room's game events.
///
/// The engine only publishes facts; handlers decide what a fact means for
/// their transport, like turning a number call into chat announcements and
/// board updates. Keeping this behind a trait keeps the engine free of any
/// websocket knowledge.
#[async_trait]
pub trait RoomEventHandler: Send + Sync {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: GameEvent,
    ) -> Result<(), RoomEventError>;

    /// Name used in subscription logs.
    fn handler_name(&self) -> &'static str;
}
