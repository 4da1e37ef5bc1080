use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::card::{Card, GRID};

/// Completed-line totals saturate here, and reaching it wins the game.
pub const WINNING_LINES: u8 = 5;

/// One of the twelve ways to complete a line on a card:
/// five rows, five columns, and the two diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum LineId {
    Row1,
    Row2,
    Row3,
    Row4,
    Row5,
    Col1,
    Col2,
    Col3,
    Col4,
    Col5,
    DiagonalMain,
    DiagonalAnti,
}

impl LineId {
    /// Grid coordinates covered by this line, as (row, col) pairs.
    pub fn cells(self) -> [(usize, usize); GRID] {
        match self {
            LineId::Row1 => row_cells(0),
            LineId::Row2 => row_cells(1),
            LineId::Row3 => row_cells(2),
            LineId::Row4 => row_cells(3),
            LineId::Row5 => row_cells(4),
            LineId::Col1 => col_cells(0),
            LineId::Col2 => col_cells(1),
            LineId::Col3 => col_cells(2),
            LineId::Col4 => col_cells(3),
            LineId::Col5 => col_cells(4),
            LineId::DiagonalMain => std::array::from_fn(|i| (i, i)),
            LineId::DiagonalAnti => std::array::from_fn(|i| (i, GRID - 1 - i)),
        }
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            LineId::Row1 => "row 1",
            LineId::Row2 => "row 2",
            LineId::Row3 => "row 3",
            LineId::Row4 => "row 4",
            LineId::Row5 => "row 5",
            LineId::Col1 => "column 1",
            LineId::Col2 => "column 2",
            LineId::Col3 => "column 3",
            LineId::Col4 => "column 4",
            LineId::Col5 => "column 5",
            LineId::DiagonalMain => "main diagonal",
            LineId::DiagonalAnti => "anti diagonal",
        };
        write!(f, "{}", label)
    }
}

fn row_cells(row: usize) -> [(usize, usize); GRID] {
    std::array::from_fn(|col| (row, col))
}

fn col_cells(col: usize) -> [(usize, usize); GRID] {
    std::array::from_fn(|row| (row, col))
}

/// Every line on `card` whose five values are all marked, in a fixed
/// rows-columns-diagonals order.
pub fn completed_lines(card: &Card, marked: &HashSet<u8>) -> Vec<LineId> {
    LineId::iter()
        .filter(|line| {
            line.cells()
                .iter()
                .all(|&(row, col)| marked.contains(&card.value_at(row, col)))
        })
        .collect()
}

/// Completed-line count for scoring, saturating at [`WINNING_LINES`].
pub fn line_count(card: &Card, marked: &HashSet<u8>) -> u8 {
    let completed = completed_lines(card, marked).len() as u8;
    completed.min(WINNING_LINES)
}
