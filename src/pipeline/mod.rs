//! Session pipelines
//!
//! This module drives games to completion:
//! - Human-vs-agent matches as an explicit turn-based state machine
//! - Self-play loops with optional display pacing and batched saves
//! - Observers for watching sessions

pub mod match_play;
pub mod observers;
pub mod self_play;

pub use match_play::{HumanMatch, MatchPhase, MatchRunner};
pub use observers::ProgressObserver;
pub use self_play::{DisplayPace, SelfPlay, SelfPlayConfig, SelfPlaySummary, StopHandle};

pub use crate::ports::{MoveInput, Observer};
