use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    ports::StoredState,
    q_learning::{AgentSnapshot, Hyperparameters, QTable},
    records::{GameMatch, GameStats, MatchHistory},
};

/// Portable snapshot written as pretty-printed JSON.
///
/// Field names follow the established file format (`qTable`, `params`,
/// `stats`, `matches`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub q_table: QTable,
    pub params: Hyperparameters,
    pub stats: GameStats,
    #[serde(default)]
    pub matches: Vec<GameMatch>,
}

impl ExportBundle {
    pub fn from_stored(state: &StoredState) -> Self {
        let mut matches: Vec<GameMatch> =
            state.matches.recent(None).into_iter().cloned().collect();
        matches.reverse();
        Self {
            q_table: state.agent.q_table.clone(),
            params: state.agent.params,
            stats: state.stats.clone(),
            matches,
        }
    }

    pub fn into_stored(self) -> StoredState {
        StoredState {
            agent: AgentSnapshot::new(self.q_table, self.params),
            stats: self.stats,
            matches: self.matches.into_iter().collect::<MatchHistory>(),
        }
    }

    /// Write the bundle as pretty JSON to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create export file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush export file {path:?}"),
            source,
        })?;
        Ok(())
    }

    /// Read and shape-check a bundle from `path`.
    ///
    /// Any missing or mistyped field is rejected here; values inside the
    /// table are not range-checked.
    pub fn read_from(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open import file {path:?}"),
            source,
        })?;
        let bundle = serde_json::from_reader(BufReader::new(file))?;
        Ok(bundle)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// File name used for exports made on `date`: `tictactoe-ai-YYYY-MM-DD.json`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("tictactoe-ai-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        app::{AgentConfig, App},
        pipeline::{SelfPlay, SelfPlayConfig},
        types::StateKey,
    };

    fn sample_state() -> StoredState {
        let mut state = StoredState::default();
        state.agent.q_table.set(StateKey::from("X...O...."), 2, -0.25);
        state.agent.params = Hyperparameters::new(0.2, 0.8, 0.05);
        state.stats.total_games = 7;
        state
    }

    #[test]
    fn test_bundle_json_shape() {
        let bundle = ExportBundle::from_stored(&sample_state());
        let json: serde_json::Value = serde_json::from_str(&bundle.to_json().unwrap()).unwrap();

        assert_eq!(json["qTable"]["X...O...."]["2"], -0.25);
        assert_eq!(json["params"]["epsilon"], 0.05);
        assert_eq!(json["stats"]["totalGames"], 7);
        assert!(json["matches"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_file_roundtrip_preserves_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(default_file_name(
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        ));
        assert!(path.ends_with("tictactoe-ai-2024-03-09.json"));

        let state = sample_state();
        ExportBundle::from_stored(&state).write_to(&path).unwrap();
        let restored = ExportBundle::read_from(&path).unwrap().into_stored();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_learned_table_survives_export_bit_for_bit() {
        let mut app = App::for_testing()
            .with_config(
                AgentConfig::new()
                    .with_params(Hyperparameters::new(0.1, 0.9, 0.3))
                    .with_seed(1),
            )
            .build()
            .unwrap();
        SelfPlay::new(SelfPlayConfig::new().with_games(3000))
            .run(&mut app)
            .unwrap();
        let state = app.snapshot();
        assert!(state.agent.q_table.len() > 100);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("learned.json");
        ExportBundle::from_stored(&state).write_to(&path).unwrap();
        let restored = ExportBundle::read_from(&path).unwrap().into_stored();

        let original = &state.agent.q_table;
        let reread = &restored.agent.q_table;
        assert_eq!(reread.len(), original.len());
        let mut differing = 0;
        for (key, actions) in original.iter() {
            for (&action, &value) in actions {
                if reread.get(key, action).to_bits() != value.to_bits() {
                    differing += 1;
                }
            }
        }
        assert_eq!(differing, 0, "values changed by the JSON round-trip");
    }

    #[test]
    fn test_malformed_payload_rejected() {
        assert!(ExportBundle::from_json("{\"qTable\": []}").is_err());
        assert!(ExportBundle::from_json("not json").is_err());
        let missing_stats = r#"{"qTable": {}, "params": {"alpha": 0.1, "gamma": 0.9, "epsilon": 0.1}}"#;
        assert!(matches!(
            ExportBundle::from_json(missing_stats),
            Err(Error::Serialization(_))
        ));
    }
}
