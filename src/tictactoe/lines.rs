//! Winning line detection for Tic-Tac-Toe

use serde::{Deserialize, Serialize};

use super::{Board, Cell, Player};

/// Winning line indices on the 3x3 board, in evaluation order
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Result of scanning a board for a completed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    pub winner: Option<Player>,
    pub line: Option<[usize; 3]>,
}

impl Evaluation {
    pub fn has_winner(&self) -> bool {
        self.winner.is_some()
    }
}

/// Check the 8 fixed lines in order and report the first one whose three
/// cells hold the same mark.
pub fn evaluate_board(board: &Board) -> Evaluation {
    let cells = board.cells();
    WINNING_LINES
        .iter()
        .find_map(|&[a, b, c]| {
            let first = cells[a];
            if first != Cell::Empty && first == cells[b] && first == cells[c] {
                first.player().map(|winner| Evaluation {
                    winner: Some(winner),
                    line: Some([a, b, c]),
                })
            } else {
                None
            }
        })
        .unwrap_or_default()
}
