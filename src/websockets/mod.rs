// Public API
pub use commands::{parse_command, ChatCommand};
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{websocket_handler, ChatCommandHandler};
pub use identity::{PetNameUsernameGenerator, UsernameGenerator};
pub use messages::{MessageType, WebSocketMessage};
pub use socket::MessageHandler;
pub use websocket_room_subscriber::WebSocketRoomSubscriber;

// Internal modules
mod commands;
mod connection_manager;
mod handler;
mod identity;
mod messages;
mod socket;
mod websocket_room_subscriber;
