//! Sparse value table for tabular Q-learning

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::StateKey;

/// Action values recorded for one state: cell index -> Q-value
pub type ActionValues = BTreeMap<usize, f64>;

/// Q-table mapping state keys to per-action value estimates
///
/// Entries are created on first write; reads of missing entries return 0.0.
/// Serializes as a plain nested map (`{"X........": {"4": 0.1}}` in JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QTable {
    values: BTreeMap<StateKey, ActionValues>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &StateKey, action: usize) -> f64 {
        self.values
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: usize, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Recorded action values for a state, if any were written
    pub fn actions(&self, state: &StateKey) -> Option<&ActionValues> {
        self.values.get(state)
    }

    /// Best value among the actions recorded for `state`.
    ///
    /// Only recorded entries count: a state with no entries yields 0.0, and a
    /// state whose entries are all negative yields the largest negative one.
    pub fn max_recorded(&self, state: &StateKey) -> f64 {
        self.values
            .get(state)
            .filter(|actions| !actions.is_empty())
            .map(|actions| actions.values().copied().fold(f64::NEG_INFINITY, f64::max))
            .unwrap_or(0.0)
    }

    /// Select greedy action (highest Q-value) from legal actions
    ///
    /// Ties go to the earliest action in `legal_actions`.
    pub fn greedy_action(&self, state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        let (&first, rest) = legal_actions.split_first()?;
        let mut best = (first, self.get(state, first));
        for &action in rest {
            let value = self.get(state, action);
            if value > best.1 {
                best = (action, value);
            }
        }
        Some(best.0)
    }

    /// One-step update toward `reward + gamma * max_next`
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_next - Q(s,a)]
    ///
    /// Returns the new value.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        max_next: f64,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        let current_q = self.get(state, action);
        let td_target = reward + gamma * max_next;
        let new_q = current_q + alpha * (td_target - current_q);
        self.set(state.clone(), action, new_q);
        new_q
    }

    /// Number of distinct states with at least one entry slot
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ActionValues)> {
        self.values.iter()
    }
}

impl FromIterator<(StateKey, ActionValues)> for QTable {
    fn from_iter<I: IntoIterator<Item = (StateKey, ActionValues)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::from(s)
    }

    #[test]
    fn test_qtable_defaults_to_zero() {
        let qtable = QTable::new();
        assert_eq!(qtable.get(&key("........."), 0), 0.0);
        assert_eq!(qtable.len(), 0);
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new();
        qtable.set(key("........."), 4, 1.5);
        assert_eq!(qtable.get(&key("........."), 4), 1.5);
        assert_eq!(qtable.get(&key("........."), 3), 0.0);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_max_recorded() {
        let mut qtable = QTable::new();
        let state = key("X........");
        assert_eq!(qtable.max_recorded(&state), 0.0);

        qtable.set(state.clone(), 1, -0.5);
        qtable.set(state.clone(), 2, -0.2);
        assert_eq!(qtable.max_recorded(&state), -0.2);

        qtable.set(state.clone(), 3, 0.7);
        assert_eq!(qtable.max_recorded(&state), 0.7);
    }

    #[test]
    fn test_greedy_action() {
        let mut qtable = QTable::new();
        let state = key(".........");
        qtable.set(state.clone(), 0, 0.5);
        qtable.set(state.clone(), 1, 1.5);
        qtable.set(state.clone(), 2, 0.8);

        assert_eq!(qtable.greedy_action(&state, &[0, 1, 2]), Some(1));
        assert_eq!(qtable.greedy_action(&state, &[0, 2]), Some(2));
        assert_eq!(qtable.greedy_action(&state, &[]), None);
    }

    #[test]
    fn test_greedy_ties_go_to_first_listed() {
        let mut qtable = QTable::new();
        let state = key(".........");
        qtable.set(state.clone(), 6, 0.3);
        qtable.set(state.clone(), 2, 0.3);

        assert_eq!(qtable.greedy_action(&state, &[6, 2]), Some(6));
        assert_eq!(qtable.greedy_action(&state, &[2, 6]), Some(2));
        // All unseen: every action reads 0.0
        assert_eq!(qtable.greedy_action(&key("X........"), &[5, 1, 3]), Some(5));
    }

    #[test]
    fn test_update() {
        let mut qtable = QTable::new();
        let state = key(".........");

        // Q = 0 + 0.5 * (0 + 0.9 * 2.0 - 0) = 0.9
        let new_q = qtable.update(&state, 4, 0.0, 2.0, 0.5, 0.9);
        assert!((new_q - 0.9).abs() < 1e-12);
        assert_eq!(qtable.get(&state, 4), new_q);
    }

    #[test]
    fn test_json_shape() {
        let mut qtable = QTable::new();
        qtable.set(key("X........"), 4, 0.25);
        let json = serde_json::to_value(&qtable).unwrap();
        assert_eq!(json["X........"]["4"], 0.25);

        let back: QTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, qtable);
    }
}
