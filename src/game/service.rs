use tracing::{debug, info, instrument};

use crate::event::{CommandKind, EventBus, GameEvent};
use crate::game::card::{self, Card};
use crate::game::core::{CardView, Game, GameError};
use crate::game::registry::GameRegistry;

/// Session engine: applies room commands to game state and publishes the
/// resulting events.
///
/// Every mutating operation locks the room's registry slot first and keeps
/// it until its events are on the bus, so subscribers observe events in the
/// same order the operations were applied. Failed operations never touch
/// state; they only publish an [`GameEvent::OperationRejected`].
pub struct GameService {
    registry: GameRegistry,
    event_bus: EventBus,
}

impl GameService {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            registry: GameRegistry::new(),
            event_bus,
        }
    }

    /// Open a fresh game for the room, replacing any game already there,
    /// finished or not. Cannot fail.
    #[instrument(skip(self))]
    pub async fn start_game(&self, room_id: &str) {
        let mut slot = self.registry.open_slot(room_id).await;
        let replaced = slot.is_some();
        *slot = Some(Game::new(room_id.to_string()));

        info!(room_id = %room_id, replaced = replaced, "Game started");
        self.event_bus
            .emit_to_room(
                room_id,
                GameEvent::GameStarted {
                    room_id: room_id.to_string(),
                },
            )
            .await;
    }

    /// Join the room's game and get dealt a random card.
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        room_id: &str,
        participant_id: &str,
        name: &str,
    ) -> Result<Card, GameError> {
        self.join_with_card(room_id, participant_id, name, card::new_card())
            .await
    }

    /// Join with a predetermined card. Lets tests and scripted games control
    /// the deal; [`join`](Self::join) is the random-card entry point.
    pub async fn join_with_card(
        &self,
        room_id: &str,
        participant_id: &str,
        name: &str,
        card: Card,
    ) -> Result<Card, GameError> {
        let result = self
            .try_join(room_id, participant_id, name, card)
            .await;
        if let Err(error) = &result {
            self.reject(room_id, participant_id, CommandKind::Join, *error)
                .await;
        }
        result
    }

    async fn try_join(
        &self,
        room_id: &str,
        participant_id: &str,
        name: &str,
        card: Card,
    ) -> Result<Card, GameError> {
        let mut slot = self
            .registry
            .slot(room_id)
            .await
            .ok_or(GameError::NoActiveGame)?;
        let game = slot.as_mut().ok_or(GameError::NoActiveGame)?;

        game.join(participant_id, name, card.clone())?;
        let player_count = game.participants().len();

        info!(
            room_id = %room_id,
            participant_id = %participant_id,
            name = %name,
            player_count = player_count,
            "Player joined game"
        );
        self.event_bus
            .emit_to_room(
                room_id,
                GameEvent::PlayerJoined {
                    room_id: room_id.to_string(),
                    participant_id: participant_id.to_string(),
                    name: name.to_string(),
                    card: card.clone(),
                },
            )
            .await;
        Ok(card)
    }

    /// Freeze the roster. Locking an already locked game succeeds silently.
    #[instrument(skip(self))]
    pub async fn lock(&self, room_id: &str, actor_id: &str) -> Result<(), GameError> {
        let result = self.try_lock(room_id).await;
        if let Err(error) = &result {
            self.reject(room_id, actor_id, CommandKind::Lock, *error)
                .await;
        }
        result
    }

    async fn try_lock(&self, room_id: &str) -> Result<(), GameError> {
        let mut slot = self
            .registry
            .slot(room_id)
            .await
            .ok_or(GameError::NoActiveGame)?;
        let game = slot.as_mut().ok_or(GameError::NoActiveGame)?;

        if game.lock() {
            info!(room_id = %room_id, "Game locked");
            self.event_bus
                .emit_to_room(
                    room_id,
                    GameEvent::GameLocked {
                        room_id: room_id.to_string(),
                    },
                )
                .await;
        }
        Ok(())
    }

    /// Call a number for the whole room and publish everything it changed:
    /// the call itself, each line advance in join order, and at most one win.
    /// Returns the published events.
    #[instrument(skip(self))]
    pub async fn call_number(
        &self,
        room_id: &str,
        caller_id: &str,
        number: u32,
    ) -> Result<Vec<GameEvent>, GameError> {
        let result = self.try_call_number(room_id, caller_id, number).await;
        if let Err(error) = &result {
            self.reject(room_id, caller_id, CommandKind::CallNumber, *error)
                .await;
        }
        result
    }

    async fn try_call_number(
        &self,
        room_id: &str,
        caller_id: &str,
        number: u32,
    ) -> Result<Vec<GameEvent>, GameError> {
        let mut slot = self
            .registry
            .slot(room_id)
            .await
            .ok_or(GameError::NoActiveGame)?;

        let (outcome, boards) = {
            let game = slot.as_mut().ok_or(GameError::NoActiveGame)?;
            let outcome = game.call_number(caller_id, number)?;
            // Snapshot boards now; a win empties the slot below
            (outcome, game.card_views())
        };

        let mut events = vec![GameEvent::NumberCalled {
            room_id: room_id.to_string(),
            caller_id: caller_id.to_string(),
            caller_name: outcome.caller_name.clone(),
            number,
            boards,
        }];
        for advance in &outcome.advanced {
            events.push(GameEvent::LineProgress {
                room_id: room_id.to_string(),
                participant_id: advance.participant_id.clone(),
                name: advance.name.clone(),
                line_count: advance.line_count,
            });
        }
        if let Some(winner) = &outcome.winner {
            events.push(GameEvent::GameWon {
                room_id: room_id.to_string(),
                winner_id: winner.participant_id.clone(),
                winner_name: winner.name.clone(),
            });
            // A finished game leaves the slot; the next start gets a blank room
            *slot = None;
            info!(
                room_id = %room_id,
                winner_id = %winner.participant_id,
                winner_name = %winner.name,
                "Game won"
            );
        }

        debug!(
            room_id = %room_id,
            caller_id = %caller_id,
            number = number,
            advances = outcome.advanced.len(),
            "Number called"
        );
        for event in &events {
            self.event_bus.emit_to_room(room_id, event.clone()).await;
        }
        Ok(events)
    }

    /// Clear the room's game without declaring a winner.
    #[instrument(skip(self))]
    pub async fn reset_game(&self, room_id: &str, actor_id: &str) -> Result<(), GameError> {
        match self.registry.remove(room_id).await {
            Some(_) => {
                info!(room_id = %room_id, "Game reset");
                self.event_bus
                    .emit_to_room(
                        room_id,
                        GameEvent::GameReset {
                            room_id: room_id.to_string(),
                        },
                    )
                    .await;
                Ok(())
            }
            None => {
                self.reject(room_id, actor_id, CommandKind::Reset, GameError::NoActiveGame)
                    .await;
                Err(GameError::NoActiveGame)
            }
        }
    }

    /// Current game state for a room (read-only snapshot)
    pub async fn get_game(&self, room_id: &str) -> Option<Game> {
        let slot = self.registry.slot(room_id).await?;
        slot.clone()
    }

    /// Board snapshot for one participant, if they are in the room's game.
    pub async fn card_view(&self, room_id: &str, participant_id: &str) -> Option<CardView> {
        let slot = self.registry.slot(room_id).await?;
        let game = slot.as_ref()?;
        game.participant(participant_id).map(|p| p.view())
    }

    /// Board snapshots for every participant, in join order.
    pub async fn card_views(&self, room_id: &str) -> Vec<CardView> {
        let slot = match self.registry.slot(room_id).await {
            Some(slot) => slot,
            None => return Vec::new(),
        };
        match slot.as_ref() {
            Some(game) => game.card_views(),
            None => Vec::new(),
        }
    }

    async fn reject(&self, room_id: &str, actor_id: &str, command: CommandKind, error: GameError) {
        debug!(
            room_id = %room_id,
            actor_id = %actor_id,
            command = %command,
            error = error.kind(),
            "Operation rejected"
        );
        self.event_bus
            .emit_to_room(
                room_id,
                GameEvent::OperationRejected {
                    room_id: room_id.to_string(),
                    actor_id: actor_id.to_string(),
                    command,
                    error,
                },
            )
            .await;
    }
}
