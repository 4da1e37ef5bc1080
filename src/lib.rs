// Library crate for the bingo game server
// This file exposes the public API for integration tests

pub mod event;
pub mod game;
pub mod http;
pub mod render;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use event::{EventBus, GameEvent, RoomSubscription};
pub use game::{Card, GameError, GameService, GameStatus};
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, MessageHandler, MessageType, WebSocketMessage, WebSocketRoomSubscriber,
};
