//! Observer port - watching games as they are played
//!
//! Observers receive session events without the session knowing how they
//! are displayed or recorded: progress bars, board printing, test probes.

use crate::{
    Result,
    records::GameMatch,
    tictactoe::{Board, Evaluation, Player},
};

/// Observer trait for monitoring sessions
///
/// # Event Sequence
///
/// 1. `on_session_start(total_games)` - Once at the beginning
/// 2. For each game:
///    - `on_game_start(game_num)`
///    - `on_move(...)` - After each move is placed
///    - `on_game_end(...)` - After the agent has learned from the game
/// 3. `on_session_end()` - Once at the end
///
/// # Examples
///
/// ```
/// use tictac_rl::{ports::Observer, records::GameMatch, tictactoe::Evaluation};
///
/// struct GameCounter {
///     games: usize,
/// }
///
/// impl Observer for GameCounter {
///     fn on_game_end(
///         &mut self,
///         _game_num: usize,
///         _evaluation: &Evaluation,
///         _record: &GameMatch,
///     ) -> tictac_rl::Result<()> {
///         self.games += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called when a session starts. `total_games` is `None` for sessions
    /// that run until stopped.
    fn on_session_start(&mut self, _total_games: Option<usize>) -> Result<()> {
        Ok(())
    }

    /// Called when a game starts (`game_num` is 0-based).
    fn on_game_start(&mut self, _game_num: usize) -> Result<()> {
        Ok(())
    }

    /// Called after `player` placed a mark at `position`.
    ///
    /// `board` is the board after the move.
    fn on_move(
        &mut self,
        _game_num: usize,
        _step_num: usize,
        _board: &Board,
        _position: usize,
        _player: Player,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when a game is over and recorded.
    fn on_game_end(
        &mut self,
        _game_num: usize,
        _evaluation: &Evaluation,
        _record: &GameMatch,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when the session completes.
    fn on_session_end(&mut self) -> Result<()> {
        Ok(())
    }
}
