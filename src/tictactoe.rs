//! Tic-Tac-Toe rules: board, winning lines and episode termination

pub mod board;
pub mod game;
pub mod lines;

pub use board::{Board, Cell, Player};
pub use game::{EpisodeOutcome, game_result, is_full, is_game_over};
pub use lines::{Evaluation, WINNING_LINES, evaluate_board};
