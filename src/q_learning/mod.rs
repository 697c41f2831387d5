//! Tabular Q-learning
//!
//! The agent keeps a sparse table of action values keyed by exact board
//! configuration. During an episode it records every decision it makes;
//! once the outcome is known a single backward pass propagates the terminal
//! reward through the recorded steps:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! where `s'` is the state of the next recorded step (no bootstrap for the
//! final step) and `r` is the terminal reward on the final step, 0 elsewhere.
//!
//! ## Usage Example
//!
//! ```
//! use tictac_rl::q_learning::{Hyperparameters, QLearningAgent};
//! use tictac_rl::tictactoe::{Board, EpisodeOutcome};
//!
//! let mut agent = QLearningAgent::new(Hyperparameters::new(0.1, 0.9, 0.0)).with_seed(42);
//! let board = Board::new();
//! let action = agent.choose_move(&board).expect("empty board has moves");
//! agent.record_step(&board, action);
//! agent.finish_episode(EpisodeOutcome::Win);
//! assert!((agent.value(&board, action) - 0.1).abs() < 1e-12);
//! ```

pub mod agent;
pub mod params;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{QLearningAgent, TraceStep};
pub use params::{Hyperparameters, ParamsUpdate};
pub use q_table::{ActionValues, QTable};
pub use serialization::AgentSnapshot;
