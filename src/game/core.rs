use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::lines::{self, LineId, WINNING_LINES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum GameError {
    #[error("no active game in this room")]
    NoActiveGame,
    #[error("the game is locked to new players")]
    GameLocked,
    #[error("player already joined this game")]
    AlreadyJoined,
    #[error("player has not joined this game")]
    NotJoined,
    #[error("number was already called")]
    DuplicateNumber,
}

impl GameError {
    /// Stable machine-readable name, used in events and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::NoActiveGame => "NoActiveGame",
            GameError::GameLocked => "GameLocked",
            GameError::AlreadyJoined => "AlreadyJoined",
            GameError::NotJoined => "NotJoined",
            GameError::DuplicateNumber => "DuplicateNumber",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Accepting joins and calls.
    Open,
    /// Calls only; the roster is frozen.
    Locked,
    /// Someone won; no further operations apply.
    Finished,
}

/// A player inside one game: their card plus marking progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub card: Card,
    pub marked: HashSet<u8>,
    pub line_count: u8,
}

impl Participant {
    /// Read-only snapshot of this participant's board, ready for rendering.
    pub fn view(&self) -> CardView {
        CardView {
            participant_id: self.id.clone(),
            name: self.name.clone(),
            card: self.card.clone(),
            marked: self.marked.clone(),
            completed: lines::completed_lines(&self.card, &self.marked),
            line_count: self.line_count,
        }
    }
}

/// Snapshot of one participant's board at a point in time. Events carry
/// these so consumers never have to re-read game state that may already
/// have moved on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub participant_id: String,
    pub name: String,
    pub card: Card,
    pub marked: HashSet<u8>,
    pub completed: Vec<LineId>,
    pub line_count: u8,
}

/// A participant whose completed-line count went up on this call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAdvance {
    pub participant_id: String,
    pub name: String,
    pub line_count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub participant_id: String,
    pub name: String,
}

/// Everything a single accepted call changed, with advances in join order.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub caller_name: String,
    pub number: u32,
    pub advanced: Vec<LineAdvance>,
    pub winner: Option<Winner>,
}

/// Core bingo state machine for one room.
///
/// Purely synchronous: no IO, no locking, no events. Callers own
/// serialization and announcing what happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    room_id: String,
    status: GameStatus,
    participants: Vec<Participant>,
    called: HashSet<u32>,
    winner: Option<String>,
}

impl Game {
    pub fn new(room_id: String) -> Self {
        Self {
            room_id,
            status: GameStatus::Open,
            participants: Vec::new(),
            called: HashSet::new(),
            winner: None,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Roster in join order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    pub fn called_numbers(&self) -> &HashSet<u32> {
        &self.called
    }

    /// Winning participant id once the game is finished.
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Board snapshots for the whole roster, in join order.
    pub fn card_views(&self) -> Vec<CardView> {
        self.participants.iter().map(Participant::view).collect()
    }

    /// Add a player with the card they were dealt.
    ///
    /// Fails without side effects when the game no longer accepts joins or
    /// the player is already on the roster.
    pub fn join(&mut self, participant_id: &str, name: &str, card: Card) -> Result<(), GameError> {
        match self.status {
            GameStatus::Open => {}
            GameStatus::Locked | GameStatus::Finished => return Err(GameError::GameLocked),
        }
        if self.participant(participant_id).is_some() {
            return Err(GameError::AlreadyJoined);
        }

        self.participants.push(Participant {
            id: participant_id.to_string(),
            name: name.to_string(),
            card,
            marked: HashSet::new(),
            line_count: 0,
        });
        Ok(())
    }

    /// Freeze the roster. Returns true only on the Open -> Locked transition,
    /// so repeated locks can stay silent.
    pub fn lock(&mut self) -> bool {
        if self.status == GameStatus::Open {
            self.status = GameStatus::Locked;
            true
        } else {
            false
        }
    }

    /// Apply one called number and report every change it caused.
    ///
    /// The number lands in the called set whether or not it appears on any
    /// card. Marks, line advances and the winner scan all walk the roster in
    /// join order, which makes the first player to reach five lines win ties
    /// on a shared call.
    pub fn call_number(&mut self, caller_id: &str, number: u32) -> Result<CallOutcome, GameError> {
        if self.status == GameStatus::Finished {
            return Err(GameError::NoActiveGame);
        }
        let caller_name = match self.participant(caller_id) {
            Some(caller) => caller.name.clone(),
            None => return Err(GameError::NotJoined),
        };
        if self.called.contains(&number) {
            return Err(GameError::DuplicateNumber);
        }

        self.called.insert(number);

        let mut advanced = Vec::new();
        for participant in &mut self.participants {
            if !participant.card.contains(number) {
                continue;
            }
            // contains() passed, so the number fits in the 1..=25 card range
            participant.marked.insert(number as u8);

            let count = lines::line_count(&participant.card, &participant.marked);
            if count > participant.line_count {
                participant.line_count = count;
                advanced.push(LineAdvance {
                    participant_id: participant.id.clone(),
                    name: participant.name.clone(),
                    line_count: count,
                });
            }
        }

        let winner = self
            .participants
            .iter()
            .find(|p| p.line_count >= WINNING_LINES)
            .map(|p| Winner {
                participant_id: p.id.clone(),
                name: p.name.clone(),
            });
        if let Some(winner) = &winner {
            self.status = GameStatus::Finished;
            self.winner = Some(winner.participant_id.clone());
        }

        Ok(CallOutcome {
            caller_name,
            number,
            advanced,
            winner,
        })
    }
}
