// End-to-end session flows: chat lines in, announcements and boards out.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::mpsc;

use bingo::game::Card;
use bingo::websockets::{ChatCommandHandler, MessageHandler, MessageType, WebSocketMessage};
use bingo::{AppState, GameError, GameEvent};

fn sequential_card() -> Card {
    Card::from_rows([
        [1, 2, 3, 4, 5],
        [6, 7, 8, 9, 10],
        [11, 12, 13, 14, 15],
        [16, 17, 18, 19, 20],
        [21, 22, 23, 24, 25],
    ])
}

/// One connected participant: their outbound channel plus identity.
struct TestClient {
    id: &'static str,
    name: &'static str,
    receiver: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    /// Everything delivered to this client so far, decoded.
    fn drain(&mut self) -> Vec<WebSocketMessage> {
        let mut messages = Vec::new();
        while let Ok(raw) = self.receiver.try_recv() {
            messages.push(serde_json::from_str(&raw).expect("valid outbound message"));
        }
        messages
    }

    fn drain_types(&mut self) -> Vec<MessageType> {
        self.drain().into_iter().map(|m| m.message_type).collect()
    }
}

struct TestRoom {
    state: AppState,
    handler: ChatCommandHandler,
    room_id: &'static str,
}

impl TestRoom {
    async fn new(room_id: &'static str) -> Self {
        let state = AppState::new();
        state.ensure_room_subscription(room_id).await;
        let handler = ChatCommandHandler::new(Arc::clone(&state.game_service));
        Self {
            state,
            handler,
            room_id,
        }
    }

    async fn connect(&self, id: &'static str, name: &'static str) -> TestClient {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.state
            .connection_manager
            .add_connection(self.room_id, id, sender)
            .await;
        TestClient { id, name, receiver }
    }

    async fn say(&self, client: &TestClient, text: &str) {
        self.handler
            .handle_message(client.id, client.name, self.room_id, text.to_string())
            .await;
    }

    /// Let the spawned subscription task catch up before asserting.
    async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
}

#[tokio::test]
async fn test_full_session_over_chat_lines() {
    let room = TestRoom::new("room-1").await;
    let mut alice = room.connect("u1", "alice").await;
    let mut bob = room.connect("u2", "bob").await;

    room.say(&alice, "/startgame").await;
    room.say(&alice, "/join").await;
    room.say(&bob, "/join").await;
    room.say(&bob, "nice cards everyone").await; // chatter, ignored
    room.say(&alice, "/lock").await;
    room.say(&alice, "7").await;
    room.settle().await;

    let alice_types = alice.drain_types();
    let bob_types = bob.drain_types();

    // Broadcasts reach both; each join also DMs the joiner their card, and
    // the call re-sends every board
    assert_eq!(
        alice_types,
        vec![
            MessageType::GameStarted,
            MessageType::PlayerJoined,
            MessageType::CardUpdate, // alice's fresh card
            MessageType::PlayerJoined,
            MessageType::GameLocked,
            MessageType::NumberCalled,
            MessageType::CardUpdate, // alice's board after the call
        ]
    );
    assert_eq!(
        bob_types,
        vec![
            MessageType::GameStarted,
            MessageType::PlayerJoined,
            MessageType::PlayerJoined,
            MessageType::CardUpdate, // bob's fresh card
            MessageType::GameLocked,
            MessageType::NumberCalled,
            MessageType::CardUpdate,
        ]
    );
}

#[tokio::test]
async fn test_join_after_lock_is_rejected_but_calls_continue() {
    let room = TestRoom::new("room-1").await;
    let mut alice = room.connect("u1", "alice").await;
    let mut carol = room.connect("u3", "carol").await;

    room.say(&alice, "/startgame").await;
    room.say(&alice, "/join").await;
    room.say(&alice, "/lock").await;
    room.settle().await;
    alice.drain();
    carol.drain();

    room.say(&carol, "/join").await;
    room.say(&alice, "13").await;
    room.settle().await;

    // The rejection goes to carol alone; the call still lands for everyone
    let carol_messages = carol.drain();
    assert_eq!(carol_messages[0].message_type, MessageType::CommandRejected);
    assert_eq!(
        carol_messages[0].payload.get("reason").and_then(|v| v.as_str()),
        Some("GameLocked")
    );

    let alice_types = alice.drain_types();
    assert!(alice_types.contains(&MessageType::NumberCalled));
    assert!(!alice_types.contains(&MessageType::CommandRejected));
}

#[tokio::test]
async fn test_join_before_startgame_is_rejected() {
    let room = TestRoom::new("room-1").await;
    let mut alice = room.connect("u1", "alice").await;

    room.say(&alice, "/join").await;
    room.settle().await;

    let messages = alice.drain();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, MessageType::CommandRejected);
    assert_eq!(
        messages[0].payload.get("reason").and_then(|v| v.as_str()),
        Some("NoActiveGame")
    );
}

#[tokio::test]
async fn test_join_deals_a_permutation_and_first_cell_marks() {
    let state = AppState::new();
    state.game_service.start_game("room-1").await;
    let card = state.game_service.join("room-1", "u1", "alice").await.unwrap();

    let mut values: Vec<u8> = card.values().collect();
    values.sort();
    assert_eq!(values, (1..=25).collect::<Vec<u8>>());

    let first_cell = u32::from(card.value_at(0, 0));
    state
        .game_service
        .call_number("room-1", "u1", first_cell)
        .await
        .unwrap();

    let view = state.game_service.card_view("room-1", "u1").await.unwrap();
    assert!(view.marked.contains(&card.value_at(0, 0)));
}

#[tokio::test]
async fn test_first_row_in_any_order_progresses_once_on_last_number() {
    let state = AppState::new();
    state.game_service.start_game("room-1").await;
    state
        .game_service
        .join_with_card("room-1", "u1", "alice", sequential_card())
        .await
        .unwrap();

    let mut progress_events = 0;
    for number in [3, 1, 5, 2, 4] {
        let events = state
            .game_service
            .call_number("room-1", "u1", number)
            .await
            .unwrap();
        let progressed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LineProgress { .. }))
            .count();
        progress_events += progressed;
        if number != 4 {
            assert_eq!(progressed, 0, "no line before the row is complete");
        }
    }

    // Only the row's final number triggers the single announcement
    assert_eq!(progress_events, 1);
}

#[tokio::test]
async fn test_win_announced_once_then_room_is_empty() {
    let room = TestRoom::new("room-1").await;
    let mut alice = room.connect("u1", "alice").await;

    room.state.game_service.start_game("room-1").await;
    room.state
        .game_service
        .join_with_card("room-1", "u1", "alice", sequential_card())
        .await
        .unwrap();

    let mut last_error = None;
    for number in 1..=25 {
        if let Err(error) = room
            .state
            .game_service
            .call_number("room-1", "u1", number)
            .await
        {
            last_error = Some(error);
            break;
        }
    }
    room.settle().await;

    // Marking the whole card wins early; the call after the win finds no game
    assert_eq!(last_error, Some(GameError::NoActiveGame));

    let types = alice.drain_types();
    assert_eq!(
        types.iter().filter(|t| **t == MessageType::GameWon).count(),
        1
    );
    assert!(room.state.game_service.get_game("room-1").await.is_none());
}

#[tokio::test]
async fn test_boards_are_delivered_only_to_their_owner() {
    let room = TestRoom::new("room-1").await;
    let mut alice = room.connect("u1", "alice").await;
    let mut bob = room.connect("u2", "bob").await;

    room.say(&alice, "/startgame").await;
    room.say(&alice, "/join").await;
    room.settle().await;
    alice.drain();
    bob.drain();

    room.say(&bob, "/join").await;
    room.settle().await;

    // Bob's fresh card names bob; alice sees the join but no board
    let bob_boards: Vec<WebSocketMessage> = bob
        .drain()
        .into_iter()
        .filter(|m| m.message_type == MessageType::CardUpdate)
        .collect();
    assert_eq!(bob_boards.len(), 1);
    assert!(bob_boards[0]
        .payload
        .get("board")
        .and_then(|v| v.as_str())
        .unwrap()
        .starts_with("bob's BINGO"));

    assert!(!alice.drain_types().contains(&MessageType::CardUpdate));
}

#[tokio::test]
async fn test_restart_discards_running_game() {
    let state = AppState::new();
    state.game_service.start_game("room-1").await;
    state
        .game_service
        .join_with_card("room-1", "u1", "alice", sequential_card())
        .await
        .unwrap();
    state.game_service.call_number("room-1", "u1", 7).await.unwrap();

    state.game_service.start_game("room-1").await;

    let game = state.game_service.get_game("room-1").await.unwrap();
    assert!(game.participants().is_empty());
    assert!(game.called_numbers().is_empty());

    // alice's seat went with the old game
    let result = state.game_service.call_number("room-1", "u1", 8).await;
    assert_eq!(result, Err(GameError::NotJoined));
}

#[tokio::test]
async fn test_many_rooms_play_out_in_parallel() {
    let state = Arc::new(AppState::new());
    let rooms: Vec<String> = (0..8).map(|i| format!("room-{}", i)).collect();

    let games = rooms.iter().cloned().map(|room_id| {
        let state = Arc::clone(&state);
        async move {
            let service = &state.game_service;
            service.start_game(&room_id).await;
            service
                .join_with_card(&room_id, "u1", "alice", sequential_card())
                .await
                .unwrap();
            service.lock(&room_id, "u1").await.unwrap();

            for number in 1..=25 {
                match service.call_number(&room_id, "u1", number).await {
                    Ok(events) => {
                        if events.iter().any(|e| matches!(e, GameEvent::GameWon { .. })) {
                            return true;
                        }
                    }
                    Err(error) => panic!("room {} failed on {}: {:?}", room_id, number, error),
                }
            }
            false
        }
    });

    let outcomes = join_all(games).await;
    assert!(outcomes.into_iter().all(|won| won), "every room finds a winner");

    for room_id in &rooms {
        assert!(state.game_service.get_game(room_id).await.is_none());
    }
}
