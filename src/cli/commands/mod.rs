//! Subcommands of the `tictac` binary

pub mod data;
pub mod play;
pub mod stats;
pub mod train;
