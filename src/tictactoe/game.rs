//! Episode termination and outcomes

use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Player},
    lines::evaluate_board,
};

/// Outcome of an episode from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeOutcome {
    Win,
    Lose,
    Draw,
}

impl EpisodeOutcome {
    /// Terminal reward assigned to the last step of an episode
    pub fn reward(self) -> f64 {
        match self {
            EpisodeOutcome::Win => 1.0,
            EpisodeOutcome::Lose => -1.0,
            EpisodeOutcome::Draw => 0.0,
        }
    }

    /// Outcome of a finished game with `winner` as seen by `perspective`.
    pub fn for_player(winner: Option<Player>, perspective: Player) -> Self {
        match winner {
            None => EpisodeOutcome::Draw,
            Some(w) if w == perspective => EpisodeOutcome::Win,
            Some(_) => EpisodeOutcome::Lose,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EpisodeOutcome::Win => "win",
            EpisodeOutcome::Lose => "lose",
            EpisodeOutcome::Draw => "draw",
        }
    }
}

/// True iff no empty cell remains
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

/// The game ends when a line is completed or the board is full.
pub fn is_game_over(board: &Board) -> bool {
    evaluate_board(board).has_winner() || board.is_full()
}

/// Result of the game from `perspective`'s side, or `None` while it is still
/// in progress.
pub fn game_result(board: &Board, perspective: Player) -> Option<EpisodeOutcome> {
    let eval = evaluate_board(board);
    if eval.winner.is_none() && !board.is_full() {
        return None;
    }
    Some(EpisodeOutcome::for_player(eval.winner, perspective))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewards() {
        assert_eq!(EpisodeOutcome::Win.reward(), 1.0);
        assert_eq!(EpisodeOutcome::Lose.reward(), -1.0);
        assert_eq!(EpisodeOutcome::Draw.reward(), 0.0);
    }

    #[test]
    fn test_is_full_with_one_empty_cell() {
        let board = Board::parse("XOXXOOOX.").unwrap();
        assert!(!is_full(&board));
        assert!(!is_game_over(&board));
        assert_eq!(game_result(&board, Player::X), None);
    }

    #[test]
    fn test_game_result_perspectives() {
        let x_wins = Board::parse("XXXOO....").unwrap();
        assert!(is_game_over(&x_wins));
        assert_eq!(game_result(&x_wins, Player::X), Some(EpisodeOutcome::Win));
        assert_eq!(game_result(&x_wins, Player::O), Some(EpisodeOutcome::Lose));

        let draw = Board::parse("XOXXOOOXX").unwrap();
        assert_eq!(game_result(&draw, Player::O), Some(EpisodeOutcome::Draw));
    }

    #[test]
    fn test_win_on_full_board_is_not_a_draw() {
        let board = Board::parse("XOXOXOOXX").unwrap();
        assert_eq!(game_result(&board, Player::X), Some(EpisodeOutcome::Win));
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        let json = serde_json::to_string(&EpisodeOutcome::Lose).unwrap();
        assert_eq!(json, "\"lose\"");
    }
}
