//! In-memory state repository for testing.
//!
//! Keeps the encoded state in memory, so tests exercise the same
//! serialization path as the file store without touching the disk.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    Result,
    error::Error,
    ports::{StateRepository, StoredState},
};

/// In-memory repository for testing.
///
/// Clones share the same slot and counters, so a test can hand one clone to
/// the application and inspect the other.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Whether anything is stored.
    pub fn is_populated(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl StateRepository for InMemoryRepository {
    fn load(&self) -> Result<Option<StoredState>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_deref()
            .map(|bytes| {
                rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                    operation: "deserialize state from in-memory storage".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    fn save(&self, state: &StoredState) -> Result<()> {
        let bytes = rmp_serde::to_vec_named(state).map_err(|e| Error::SerializationContext {
            operation: "serialize state for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        assert!(!repo.is_populated());
        assert!(repo.load().unwrap().is_none());

        let mut state = StoredState::default();
        state.stats.draws = 2;
        repo.save(&state).unwrap();

        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.load().unwrap(), Some(state));
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();

        repo1.save(&StoredState::default()).unwrap();
        assert!(repo2.is_populated());
        assert_eq!(repo2.save_count(), 1);

        repo2.clear().unwrap();
        assert!(repo1.load().unwrap().is_none());
    }
}
