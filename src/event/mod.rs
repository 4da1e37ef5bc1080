// Event-driven architecture components
//
// This module provides the core infrastructure for event-driven communication
// between different parts of the game server.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::{CommandKind, GameEvent};
pub use room_handler::{RoomEventError, RoomEventHandler};
pub use room_subscription::RoomSubscription;

// Internal modules
mod bus;
mod events;
mod room_handler;
mod room_subscription;
