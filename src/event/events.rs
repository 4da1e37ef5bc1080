use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::{Card, CardView, GameError};

/// Events that can occur in a bingo room
///
/// Events represent facts about things that have already happened.
/// They are used to communicate state changes between different parts
/// of the system without tight coupling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh game opened for the room, replacing any previous one
    GameStarted { room_id: String },

    /// A player joined the game and was dealt a card
    PlayerJoined {
        room_id: String,
        participant_id: String,
        name: String,
        card: Card,
    },

    /// The roster was frozen; numbers only from here on
    GameLocked { room_id: String },

    /// A participant called a number. Carries every board as it stands after
    /// the call, since the game may be gone by the time a consumer looks.
    NumberCalled {
        room_id: String,
        caller_id: String,
        caller_name: String,
        number: u32,
        boards: Vec<CardView>,
    },

    /// A participant's completed-line count went up
    LineProgress {
        room_id: String,
        participant_id: String,
        name: String,
        line_count: u8,
    },

    /// A participant reached five lines; the game is over
    GameWon {
        room_id: String,
        winner_id: String,
        winner_name: String,
    },

    /// The room's game was cleared by an explicit reset
    GameReset { room_id: String },

    /// A command was refused; no state changed
    OperationRejected {
        room_id: String,
        actor_id: String,
        command: CommandKind,
        error: GameError,
    },
}

impl GameEvent {
    /// Get the room_id associated with this event
    /// All events are room-specific in our game
    pub fn room_id(&self) -> &str {
        match self {
            GameEvent::GameStarted { room_id, .. } => room_id,
            GameEvent::PlayerJoined { room_id, .. } => room_id,
            GameEvent::GameLocked { room_id, .. } => room_id,
            GameEvent::NumberCalled { room_id, .. } => room_id,
            GameEvent::LineProgress { room_id, .. } => room_id,
            GameEvent::GameWon { room_id, .. } => room_id,
            GameEvent::GameReset { room_id, .. } => room_id,
            GameEvent::OperationRejected { room_id, .. } => room_id,
        }
    }

    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::GameLocked { .. } => "game_locked",
            GameEvent::NumberCalled { .. } => "number_called",
            GameEvent::LineProgress { .. } => "line_progress",
            GameEvent::GameWon { .. } => "game_won",
            GameEvent::GameReset { .. } => "game_reset",
            GameEvent::OperationRejected { .. } => "operation_rejected",
        }
    }
}

/// Which command a [`GameEvent::OperationRejected`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    StartGame,
    Join,
    Lock,
    CallNumber,
    Reset,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CommandKind::StartGame => "start_game",
            CommandKind::Join => "join",
            CommandKind::Lock => "lock",
            CommandKind::CallNumber => "call_number",
            CommandKind::Reset => "reset",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_event_reports_its_room() {
        let events = vec![
            GameEvent::GameStarted {
                room_id: "room-1".to_string(),
            },
            GameEvent::GameLocked {
                room_id: "room-1".to_string(),
            },
            GameEvent::NumberCalled {
                room_id: "room-1".to_string(),
                caller_id: "u1".to_string(),
                caller_name: "alice".to_string(),
                number: 7,
                boards: Vec::new(),
            },
            GameEvent::GameWon {
                room_id: "room-1".to_string(),
                winner_id: "u1".to_string(),
                winner_name: "alice".to_string(),
            },
            GameEvent::OperationRejected {
                room_id: "room-1".to_string(),
                actor_id: "u1".to_string(),
                command: CommandKind::Join,
                error: GameError::GameLocked,
            },
        ];

        for event in events {
            assert_eq!(event.room_id(), "room-1");
        }
    }

    #[test]
    fn test_identical_events_compare_equal() {
        // Tests assert on whole event lists, so equality has to hold
        // structurally across every variant payload
        let make = || GameEvent::NumberCalled {
            room_id: "room-1".to_string(),
            caller_id: "u1".to_string(),
            caller_name: "alice".to_string(),
            number: 7,
            boards: Vec::new(),
        };

        assert_eq!(make(), make());
        assert_ne!(
            make(),
            GameEvent::GameStarted {
                room_id: "room-1".to_string(),
            }
        );
    }

    #[test]
    fn test_events_round_trip_through_json() {
        let event = GameEvent::NumberCalled {
            room_id: "room-1".to_string(),
            caller_id: "u1".to_string(),
            caller_name: "alice".to_string(),
            number: 13,
            boards: Vec::new(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, GameEvent::NumberCalled { number: 13, .. }));
    }
}
