//! Repository port for persisting agent and play records.
//!
//! A repository is a handle to one storage location, acquired once when the
//! application starts and injected into it. Everything the application keeps
//! between sessions crosses this boundary as a single [`StoredState`].

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    q_learning::AgentSnapshot,
    records::{GameStats, MatchHistory},
};

/// Everything persisted between sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    pub agent: AgentSnapshot,
    pub stats: GameStats,
    pub matches: MatchHistory,
}

/// Port for loading and saving [`StoredState`].
///
/// # Examples
///
/// ```
/// use tictac_rl::adapters::InMemoryRepository;
/// use tictac_rl::ports::{StateRepository, StoredState};
///
/// let repo = InMemoryRepository::new();
/// assert!(repo.load()?.is_none());
///
/// repo.save(&StoredState::default())?;
/// assert!(repo.load()?.is_some());
/// # Ok::<(), tictac_rl::Error>(())
/// ```
pub trait StateRepository {
    /// Load the stored state, or `None` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored data cannot be read or decoded.
    fn load(&self) -> Result<Option<StoredState>>;

    /// Replace the stored state.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails. The caller's in-memory
    /// state is unaffected.
    fn save(&self, state: &StoredState) -> Result<()>;

    /// Remove everything stored.
    fn clear(&self) -> Result<()>;
}
