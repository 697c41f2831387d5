//! Tabular Q-learning agent
//!
//! The agent records the (state, action) pairs it plays during an episode and
//! learns from them in one backward pass once the episode's outcome is known.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::debug;

use super::{
    params::{Hyperparameters, ParamsUpdate},
    q_table::QTable,
};
use crate::{
    tictactoe::{Board, EpisodeOutcome},
    types::StateKey,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// One recorded decision of the current episode
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    pub state: StateKey,
    pub action: usize,
}

/// Q-learning agent with ε-greedy action selection
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    params: Hyperparameters,
    trace: Vec<TraceStep>,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create an agent with an empty value table
    pub fn new(params: Hyperparameters) -> Self {
        Self {
            q_table: QTable::new(),
            params,
            trace: Vec::new(),
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self
    }

    /// ε-greedy choice among `legal_moves` for `board`.
    ///
    /// With probability ε a uniformly random legal move is returned;
    /// otherwise the legal move with the highest value for the board's key,
    /// ties going to the earliest entry of `legal_moves`. Returns `None` when
    /// `legal_moves` is empty.
    pub fn select_action(&mut self, board: &Board, legal_moves: &[usize]) -> Option<usize> {
        if legal_moves.is_empty() {
            return None;
        }

        if self.rng.random::<f64>() < self.params.epsilon {
            // Explore: random action
            legal_moves.choose(&mut self.rng).copied()
        } else {
            // Exploit: greedy action based on Q-values
            self.q_table.greedy_action(&board.state_key(), legal_moves)
        }
    }

    /// [`Self::select_action`] over the board's empty cells in index order.
    pub fn choose_move(&mut self, board: &Board) -> Option<usize> {
        let legal_moves = board.legal_moves();
        self.select_action(board, &legal_moves)
    }

    /// Append the move `action` played from `board_before_move` to the trace.
    ///
    /// The action is not checked for legality.
    pub fn record_step(&mut self, board_before_move: &Board, action: usize) {
        self.trace.push(TraceStep {
            state: board_before_move.state_key(),
            action,
        });
    }

    /// Learn from the current trace and clear it.
    ///
    /// The last recorded step receives the outcome's reward, earlier steps
    /// receive 0. Steps are updated newest first; each one bootstraps from the
    /// best recorded value of the following step's state as it stands in the
    /// table at that moment. Returns the number of steps updated, which is 0
    /// when the trace was already empty.
    pub fn finish_episode(&mut self, outcome: EpisodeOutcome) -> usize {
        let trace = std::mem::take(&mut self.trace);
        let Some(last) = trace.len().checked_sub(1) else {
            return 0;
        };

        let Hyperparameters { alpha, gamma, .. } = self.params;
        for i in (0..trace.len()).rev() {
            let step = &trace[i];
            let (reward, max_next) = if i == last {
                (outcome.reward(), 0.0)
            } else {
                (0.0, self.q_table.max_recorded(&trace[i + 1].state))
            };
            self.q_table
                .update(&step.state, step.action, reward, max_next, alpha, gamma);
        }

        debug!(
            steps = trace.len(),
            outcome = outcome.as_str(),
            states = self.q_table.len(),
            "episode learned"
        );
        trace.len()
    }

    /// Drop the current trace without learning from it
    pub fn reset_trace(&mut self) {
        self.trace.clear();
    }

    pub fn trace(&self) -> &[TraceStep] {
        &self.trace
    }

    /// Copy of the whole value table
    pub fn export_table(&self) -> QTable {
        self.q_table.clone()
    }

    /// Replace the value table wholesale. Values are taken as they are.
    pub fn import_table(&mut self, table: QTable) {
        self.q_table = table;
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Value recorded for `action` on `board` (0.0 when absent)
    pub fn value(&self, board: &Board, action: usize) -> f64 {
        self.q_table.get(&board.state_key(), action)
    }

    /// Number of distinct states seen
    pub fn table_size(&self) -> usize {
        self.q_table.len()
    }

    /// Empty the value table and the trace
    pub fn clear_table(&mut self) {
        self.q_table.clear();
        self.trace.clear();
    }

    pub fn params(&self) -> Hyperparameters {
        self.params
    }

    pub fn set_params(&mut self, params: Hyperparameters) {
        self.params = params;
    }

    /// Apply a partial update, keeping unspecified values
    pub fn update_params(&mut self, update: ParamsUpdate) {
        self.params = self.params.merged(update);
    }

    pub fn set_learning_rate(&mut self, alpha: f64) {
        self.params.alpha = alpha;
    }

    pub fn set_discount_factor(&mut self, gamma: f64) {
        self.params.gamma = gamma;
    }

    pub fn set_exploration_rate(&mut self, epsilon: f64) {
        self.params.epsilon = epsilon;
    }
}

impl Default for QLearningAgent {
    fn default() -> Self {
        Self::new(Hyperparameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    fn greedy_agent() -> QLearningAgent {
        QLearningAgent::new(Hyperparameters::new(0.5, 0.9, 0.0)).with_seed(7)
    }

    #[test]
    fn test_single_step_win_yields_alpha() {
        let mut agent = greedy_agent();
        let board = Board::new();
        agent.record_step(&board, 4);

        assert_eq!(agent.finish_episode(EpisodeOutcome::Win), 1);
        assert!((agent.value(&board, 4) - 0.5).abs() < 1e-12);
        assert!(agent.trace().is_empty());
    }

    #[test]
    fn test_lose_and_draw_rewards() {
        let mut agent = greedy_agent();
        let board = Board::new();

        agent.record_step(&board, 0);
        agent.finish_episode(EpisodeOutcome::Lose);
        assert!((agent.value(&board, 0) + 0.5).abs() < 1e-12);

        agent.record_step(&board, 1);
        agent.finish_episode(EpisodeOutcome::Draw);
        assert_eq!(agent.value(&board, 1), 0.0);
        // Draw still creates the entry
        assert!(agent.q_table().actions(&board.state_key()).unwrap().contains_key(&1));
    }

    #[test]
    fn test_backward_pass_bootstraps_from_just_updated_step() {
        let mut agent = greedy_agent();
        let first = Board::new();
        let second = first.place(0, Player::X).unwrap().place(4, Player::O).unwrap();

        agent.record_step(&first, 0);
        agent.record_step(&second, 8);
        agent.finish_episode(EpisodeOutcome::Win);

        // Last step: 0 + 0.5 * (1 - 0) = 0.5
        assert!((agent.value(&second, 8) - 0.5).abs() < 1e-12);
        // First step sees the updated 0.5: 0 + 0.5 * (0 + 0.9 * 0.5 - 0) = 0.225
        assert!((agent.value(&first, 0) - 0.225).abs() < 1e-12);
    }

    #[test]
    fn test_second_finish_is_noop() {
        let mut agent = greedy_agent();
        let board = Board::new();
        agent.record_step(&board, 2);
        agent.finish_episode(EpisodeOutcome::Win);
        let snapshot = agent.export_table();

        assert_eq!(agent.finish_episode(EpisodeOutcome::Lose), 0);
        assert_eq!(agent.export_table(), snapshot);
    }

    #[test]
    fn test_reset_trace_discards_without_learning() {
        let mut agent = greedy_agent();
        agent.record_step(&Board::new(), 3);
        agent.reset_trace();
        assert_eq!(agent.finish_episode(EpisodeOutcome::Win), 0);
        assert_eq!(agent.table_size(), 0);
    }

    #[test]
    fn test_greedy_selection_prefers_highest_value() {
        let mut agent = greedy_agent();
        let board = Board::new();
        let mut table = QTable::new();
        table.set(board.state_key(), 7, 0.9);
        table.set(board.state_key(), 2, 0.4);
        agent.import_table(table);

        for _ in 0..20 {
            assert_eq!(agent.choose_move(&board), Some(7));
        }
        // 7 not legal: next best
        assert_eq!(agent.select_action(&board, &[1, 2, 3]), Some(2));
    }

    #[test]
    fn test_select_on_full_board_returns_none() {
        let mut agent = greedy_agent().with_seed(1);
        agent.set_exploration_rate(1.0);
        let full = Board::parse("XOXXOOOXX").unwrap();
        assert_eq!(agent.choose_move(&full), None);
        assert_eq!(agent.select_action(&Board::new(), &[]), None);
    }

    #[test]
    fn test_clear_table_also_clears_trace() {
        let mut agent = greedy_agent();
        let board = Board::new();
        agent.record_step(&board, 0);
        agent.finish_episode(EpisodeOutcome::Win);
        agent.record_step(&board, 1);

        agent.clear_table();
        assert_eq!(agent.table_size(), 0);
        assert!(agent.trace().is_empty());
    }

    #[test]
    fn test_param_setters_affect_next_update() {
        let mut agent = greedy_agent();
        agent.set_learning_rate(0.25);
        agent.update_params(ParamsUpdate {
            gamma: Some(0.5),
            ..Default::default()
        });
        assert_eq!(agent.params(), Hyperparameters::new(0.25, 0.5, 0.0));

        let board = Board::new();
        agent.record_step(&board, 4);
        agent.finish_episode(EpisodeOutcome::Win);
        assert!((agent.value(&board, 4) - 0.25).abs() < 1e-12);
    }
}
