use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Tracks live client connections per room so announcements can fan out to a
/// whole room and card updates can go to one participant.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(
        &self,
        room_id: &str,
        participant_id: &str,
        sender: mpsc::UnboundedSender<String>,
    );

    async fn remove_connection(&self, room_id: &str, participant_id: &str);

    /// Direct message to one participant. Silently drops if they are offline.
    async fn send_to_participant(&self, room_id: &str, participant_id: &str, message: &str);

    /// Fan a message out to everyone connected to the room.
    async fn broadcast_to_room(&self, room_id: &str, message: &str);
}

pub struct InMemoryConnectionManager {
    // room_id -> participant_id -> sender
    connections: Arc<RwLock<HashMap<String, HashMap<String, mpsc::UnboundedSender<String>>>>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(
        &self,
        room_id: &str,
        participant_id: &str,
        sender: mpsc::UnboundedSender<String>,
    ) {
        let mut connections = self.connections.write().await;
        connections
            .entry(room_id.to_string())
            .or_default()
            .insert(participant_id.to_string(), sender);
    }

    async fn remove_connection(&self, room_id: &str, participant_id: &str) {
        let mut connections = self.connections.write().await;
        if let Some(room) = connections.get_mut(room_id) {
            room.remove(participant_id);
            if room.is_empty() {
                connections.remove(room_id);
            }
        }
    }

    async fn send_to_participant(&self, room_id: &str, participant_id: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections
            .get(room_id)
            .and_then(|room| room.get(participant_id))
        {
            let _ = sender.send(message.to_string());
        }
    }

    async fn broadcast_to_room(&self, room_id: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(room) = connections.get(room_id) {
            for sender in room.values() {
                let _ = sender.send(message.to_string());
            }
        }
    }
}
