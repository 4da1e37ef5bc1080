use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::GameError;

/// Message types for WebSocket communication
///
/// Inbound traffic is plain chat text (see [`super::commands`]), so every
/// variant here flows server -> client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    GameStarted,
    PlayerJoined,
    GameLocked,
    NumberCalled,
    LineProgress,
    GameWon,
    GameReset,
    CardUpdate,
    CommandRejected,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    pub participant_id: Option<String>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Server-to-Client message payloads
///
/// Every announcement payload carries `text`, the line a plain chat client
/// can print as is, next to the structured fields richer clients use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStartedPayload {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerJoinedPayload {
    pub participant_id: String,
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLockedPayload {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberCalledPayload {
    pub caller_id: String,
    pub caller_name: String,
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineProgressPayload {
    pub participant_id: String,
    pub name: String,
    pub line_count: u8,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameWonPayload {
    pub winner_id: String,
    pub winner_name: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResetPayload {
    pub text: String,
}

/// Direct message: one participant's rendered board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardUpdatePayload {
    pub board: String,
}

/// Direct message: why a command did not go through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRejectedPayload {
    pub command: String,
    pub reason: String,
    pub text: String,
}

/// Chat wording for each rejection, matching the bot voice of the
/// announcements.
pub fn rejection_text(error: &GameError) -> &'static str {
    match error {
        GameError::NoActiveGame => "❌ No active game. Use /startgame to begin",
        GameError::GameLocked => "🔒 The game is locked, no more joins",
        GameError::AlreadyJoined => "⚠️ You already joined this game",
        GameError::NotJoined => "❌ You have not joined. Use /join first",
        GameError::DuplicateNumber => "⚠️ That number was already called",
    }
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                participant_id: None,
            }),
        }
    }

    /// Create a GAME_STARTED message
    pub fn game_started() -> Self {
        let payload = GameStartedPayload {
            text: "🎯 Bingo started! Use /join to get a card".to_string(),
        };
        Self::new(
            MessageType::GameStarted,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a PLAYER_JOINED message
    pub fn player_joined(participant_id: String, name: String) -> Self {
        let payload = PlayerJoinedPayload {
            text: format!("✅ {} joined the game", name),
            participant_id,
            name,
        };
        Self::new(
            MessageType::PlayerJoined,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a GAME_LOCKED message
    pub fn game_locked() -> Self {
        let payload = GameLockedPayload {
            text: "🔒 Game locked. Numbers only from here".to_string(),
        };
        Self::new(
            MessageType::GameLocked,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a NUMBER_CALLED message
    pub fn number_called(caller_id: String, caller_name: String, number: u32) -> Self {
        let payload = NumberCalledPayload {
            text: format!("📢 {} called {}", caller_name, number),
            caller_id,
            caller_name,
            number,
        };
        Self::new(
            MessageType::NumberCalled,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a LINE_PROGRESS message
    pub fn line_progress(participant_id: String, name: String, line_count: u8) -> Self {
        let payload = LineProgressPayload {
            text: format!(
                "✨ {} is on {} line{}",
                name,
                line_count,
                if line_count == 1 { "" } else { "s" }
            ),
            participant_id,
            name,
            line_count,
        };
        Self::new(
            MessageType::LineProgress,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a GAME_WON message
    pub fn game_won(winner_id: String, winner_name: String) -> Self {
        let payload = GameWonPayload {
            text: format!("🏆 BINGO! {} wins!", winner_name),
            winner_id,
            winner_name,
        };
        Self::new(MessageType::GameWon, serde_json::to_value(payload).unwrap())
    }

    /// Create a GAME_RESET message
    pub fn game_reset() -> Self {
        let payload = GameResetPayload {
            text: "🧹 Game cleared. Use /startgame for a new one".to_string(),
        };
        Self::new(
            MessageType::GameReset,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a CARD_UPDATE message
    pub fn card_update(board: String) -> Self {
        let payload = CardUpdatePayload { board };
        Self::new(
            MessageType::CardUpdate,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a COMMAND_REJECTED message
    pub fn command_rejected(command: String, error: &GameError) -> Self {
        let payload = CommandRejectedPayload {
            command,
            reason: error.kind().to_string(),
            text: rejection_text(error).to_string(),
        };
        Self::new(
            MessageType::CommandRejected,
            serde_json::to_value(payload).unwrap(),
        )
    }
}
