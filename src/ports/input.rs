//! Input port for human moves

use crate::{Error, Result, tictactoe::Board};

/// Supplies the human player's moves to a match.
pub trait MoveInput {
    /// Pick a cell index for the human on `board`.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the match (e.g. input closed).
    fn next_move(&mut self, board: &Board, legal_moves: &[usize]) -> Result<usize>;

    /// Called when the last move returned by [`Self::next_move`] was refused
    /// (occupied or out-of-range cell). The match asks again afterwards.
    fn on_rejected(&mut self, _error: &Error) {}
}
