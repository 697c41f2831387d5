//! Tic-tac-toe against a tabular Q-learning agent
//!
//! This crate provides:
//! - Tic-tac-toe board, move validation and line detection
//! - An ε-greedy Q-learning agent that learns once per episode in a backward pass
//! - Human-vs-agent matches and self-play training sessions
//! - Persistent state (value table, parameters, statistics, match history)
//!   with JSON export and import

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod records;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use q_learning::{Hyperparameters, QLearningAgent};
pub use types::StateKey;
