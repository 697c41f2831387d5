//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the game/agent core and the
//! outside world: where state is stored, who supplies human moves, and who
//! watches a session. Adapters and front ends implement them.

pub mod input;
pub mod observer;
pub mod repository;

pub use input::MoveInput;
pub use observer::Observer;
pub use repository::{StateRepository, StoredState};
