use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::core::Game;

/// One room's game slot. None means the room currently has no game,
/// either because none was started yet or the last one finished.
type RoomSlot = Arc<Mutex<Option<Game>>>;

/// Process-wide map from room id to its single live game.
///
/// Each room gets its own mutex-guarded slot: operations on the same room
/// queue up on the slot while unrelated rooms run in parallel. The outer map
/// lock is only held long enough to look up or insert a slot, never across
/// game logic.
pub struct GameRegistry {
    rooms: RwLock<HashMap<String, RoomSlot>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Lock the slot for `room_id`, creating an empty one if the room has
    /// never hosted a game. The returned guard serializes the caller against
    /// every other operation on this room.
    pub async fn open_slot(&self, room_id: &str) -> OwnedMutexGuard<Option<Game>> {
        let slot = {
            let mut rooms = self.rooms.write().await;
            Arc::clone(rooms.entry(room_id.to_string()).or_default())
        };
        slot.lock_owned().await
    }

    /// Lock the slot for `room_id` if the room has one. None means no game
    /// was ever started there.
    pub async fn slot(&self, room_id: &str) -> Option<OwnedMutexGuard<Option<Game>>> {
        let slot = {
            let rooms = self.rooms.read().await;
            rooms.get(room_id).map(Arc::clone)
        };
        match slot {
            Some(slot) => Some(slot.lock_owned().await),
            None => None,
        }
    }

    /// Drop the room's slot entirely, returning whatever game was live.
    /// Waits for any in-flight operation on the room to finish first.
    pub async fn remove(&self, room_id: &str) -> Option<Game> {
        let slot = {
            let mut rooms = self.rooms.write().await;
            rooms.remove(room_id)
        };
        match slot {
            Some(slot) => slot.lock_owned().await.take(),
            None => None,
        }
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}
