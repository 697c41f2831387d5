//! Configuration types for agent creation.

use crate::q_learning::Hyperparameters;

/// Configuration for the agent an [`App`](super::App) starts with.
///
/// The hyperparameters only apply when the store holds no saved state;
/// a restored agent keeps the parameters it was saved with.
///
/// # Examples
///
/// ```
/// use tictac_rl::app::AgentConfig;
/// use tictac_rl::q_learning::Hyperparameters;
///
/// let config = AgentConfig::new()
///     .with_params(Hyperparameters::new(0.2, 0.95, 0.05))
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// Hyperparameters for a fresh agent
    pub params: Hyperparameters,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Default hyperparameters (α 0.1, γ 0.9, ε 0.1) and no seed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(mut self, params: Hyperparameters) -> Self {
        self.params = params;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
