// Public API
pub use card::{new_card, Card, GRID};
pub use core::{
    CallOutcome, CardView, Game, GameError, GameStatus, LineAdvance, Participant, Winner,
};
pub use lines::{completed_lines, line_count, LineId, WINNING_LINES};
pub use registry::GameRegistry;
pub use service::GameService;

// Internal modules
mod card;
mod core;
mod lines;
mod registry;
mod service;
