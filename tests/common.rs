//! Common test utilities for the tictac-rl test suite.

#![allow(dead_code)]

use std::collections::VecDeque;

use proptest::prelude::*;
use tictac_rl::{
    Error,
    ports::MoveInput,
    tictactoe::{Board, Cell},
};

/// Any assignment of marks to the nine cells, reachable or not.
pub fn any_board() -> impl Strategy<Value = Board> {
    prop::array::uniform9(prop_oneof![Just(Cell::Empty), Just(Cell::X), Just(Cell::O)])
        .prop_map(Board::from_cells)
}

/// Move input that replays a fixed list of cell indices.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    moves: VecDeque<usize>,
    pub rejected: usize,
}

impl ScriptedInput {
    pub fn new(moves: &[usize]) -> Self {
        Self {
            moves: moves.iter().copied().collect(),
            rejected: 0,
        }
    }
}

impl MoveInput for ScriptedInput {
    fn next_move(&mut self, _board: &Board, legal_moves: &[usize]) -> tictac_rl::Result<usize> {
        // Fall back to the first legal cell once the script runs out
        Ok(self
            .moves
            .pop_front()
            .or_else(|| legal_moves.first().copied())
            .unwrap_or(0))
    }

    fn on_rejected(&mut self, _error: &Error) {
        self.rejected += 1;
    }
}
