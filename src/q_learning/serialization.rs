//! Persistable snapshot of a Q-learning agent.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    q_learning::{agent::QLearningAgent, params::Hyperparameters, q_table::QTable},
};

/// Value table plus hyperparameters; the episode trace is never saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub version: u32,
    pub q_table: QTable,
    pub params: Hyperparameters,
}

impl AgentSnapshot {
    pub const VERSION: u32 = 1;

    pub fn new(q_table: QTable, params: Hyperparameters) -> Self {
        Self {
            version: Self::VERSION,
            q_table,
            params,
        }
    }

    pub fn from_agent(agent: &QLearningAgent) -> Self {
        Self::new(agent.export_table(), agent.params())
    }

    /// Load table and hyperparameters into `agent`, discarding its trace.
    pub fn restore_into(&self, agent: &mut QLearningAgent) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        agent.reset_trace();
        agent.import_table(self.q_table.clone());
        agent.set_params(self.params);
        Ok(())
    }
}

impl Default for AgentSnapshot {
    fn default() -> Self {
        Self::new(QTable::new(), Hyperparameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::{Board, EpisodeOutcome};

    #[test]
    fn test_snapshot_roundtrip_through_msgpack() -> Result<()> {
        let mut agent = QLearningAgent::new(Hyperparameters::new(0.3, 0.8, 0.0)).with_seed(11);
        agent.record_step(&Board::new(), 4);
        agent.finish_episode(EpisodeOutcome::Win);

        let snapshot = AgentSnapshot::from_agent(&agent);
        let bytes = rmp_serde::to_vec(&snapshot).unwrap();
        let loaded: AgentSnapshot = rmp_serde::from_slice(&bytes).unwrap();

        let mut restored = QLearningAgent::default();
        loaded.restore_into(&mut restored)?;
        assert_eq!(restored.table_size(), agent.table_size());
        assert_eq!(restored.params(), agent.params());
        assert_eq!(restored.value(&Board::new(), 4), agent.value(&Board::new(), 4));
        Ok(())
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut snapshot = AgentSnapshot::default();
        snapshot.version = 99;
        let mut agent = QLearningAgent::default();
        assert!(matches!(
            snapshot.restore_into(&mut agent),
            Err(Error::UnsupportedVersion {
                found: 99,
                expected: 1
            })
        ));
    }
}
