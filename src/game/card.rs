use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Side length of a bingo card.
pub const GRID: usize = 5;

/// A 5x5 bingo card holding each number from 1 to 25 exactly once.
///
/// Cards are immutable after creation; marking progress lives with the
/// participant, not on the card itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    grid: [[u8; GRID]; GRID],
}

impl Card {
    /// Build a card from an explicit row layout.
    ///
    /// Deterministic counterpart to [`new_card`], mainly for tests and
    /// scripted games.
    pub fn from_rows(grid: [[u8; GRID]; GRID]) -> Self {
        Self { grid }
    }

    pub fn rows(&self) -> &[[u8; GRID]; GRID] {
        &self.grid
    }

    pub fn value_at(&self, row: usize, col: usize) -> u8 {
        self.grid[row][col]
    }

    /// Whether the called number appears anywhere on this card.
    pub fn contains(&self, number: u32) -> bool {
        self.grid
            .iter()
            .flatten()
            .any(|&value| u32::from(value) == number)
    }

    pub fn values(&self) -> impl Iterator<Item = u8> + '_ {
        self.grid.iter().flatten().copied()
    }
}

/// Deal a fresh card: a uniformly random arrangement of 1..=25.
pub fn new_card() -> Card {
    let mut numbers: Vec<u8> = (1..=(GRID * GRID) as u8).collect();
    numbers.shuffle(&mut rand::rng());

    let mut grid = [[0u8; GRID]; GRID];
    for (i, number) in numbers.into_iter().enumerate() {
        grid[i / GRID][i % GRID] = number;
    }
    Card { grid }
}
