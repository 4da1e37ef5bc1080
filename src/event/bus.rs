use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::GameEvent;

/// Buffered events per room before slow subscribers start losing them.
const ROOM_CHANNEL_CAPACITY: usize = 100;

/// Event bus for distributing events throughout the application
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Room-specific event channels: room_id -> sender
    room_channels: Arc<RwLock<HashMap<String, broadcast::Sender<GameEvent>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            room_channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Emits an event to all subscribers of a specific room
    pub async fn emit_to_room(&self, room_id: &str, event: GameEvent) {
        let room_channels = self.room_channels.read().await;

        if let Some(sender) = room_channels.get(room_id) {
            match sender.send(event) {
                Ok(receiver_count) => {
                    debug!(
                        room_id = %room_id,
                        receivers = receiver_count,
                        "Room event emitted"
                    );
                }
                Err(_) => {
                    debug!(room_id = %room_id, "Room event emitted with no receivers");
                }
            }
        } else {
            debug!(room_id = %room_id, "No room channel found - creating one");
            drop(room_channels);

            // Another task may have created the channel in the meantime, so
            // entry() keeps any sender that already has subscribers
            let mut room_channels = self.room_channels.write().await;
            let sender = room_channels
                .entry(room_id.to_string())
                .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
                .clone();

            if sender.send(event).is_err() {
                debug!(room_id = %room_id, "Room event sent to new channel with no receivers");
            }
        }
    }

    /// Subscribe to events for a specific room
    pub async fn subscribe_to_room(&self, room_id: &str) -> broadcast::Receiver<GameEvent> {
        let room_channels = self.room_channels.read().await;

        if let Some(sender) = room_channels.get(room_id) {
            sender.subscribe()
        } else {
            debug!(room_id = %room_id, "Creating new room channel for subscription");
            drop(room_channels);

            let mut room_channels = self.room_channels.write().await;
            room_channels
                .entry(room_id.to_string())
                .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
                .subscribe()
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
