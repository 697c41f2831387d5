//! CLI infrastructure for the tic-tac-toe agent
//!
//! This module provides the command-line interface for playing against the
//! agent, training it by self-play, and managing its saved state.

pub mod commands;
pub mod config;
pub mod output;
