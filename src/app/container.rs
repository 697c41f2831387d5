//! Dependency injection container for the application.
//!
//! The [`App`] owns the agent, the play records and the repository handle
//! they are persisted through. It is built once at startup, with the
//! repository already acquired, and passed explicitly to every session.

use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::{InMemoryRepository, MsgPackRepository},
    export::ExportBundle,
    ports::{StateRepository, StoredState},
    q_learning::{AgentSnapshot, ParamsUpdate, QLearningAgent},
    records::{GameMatch, GameMode, GameStats, MatchHistory, match_id},
    tictactoe::Player,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use tictac_rl::app::{AgentConfig, App};
///
/// let app = App::open_file("tictactoe-ai.msgpack", AgentConfig::new())?;
/// println!("{} states known", app.agent().table_size());
/// # Ok::<(), tictac_rl::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use tictac_rl::app::App;
/// use tictac_rl::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build()?;
/// assert_eq!(app.stats().total_games, 0);
/// # Ok::<(), tictac_rl::Error>(())
/// ```
pub struct App {
    agent: QLearningAgent,
    stats: GameStats,
    history: MatchHistory,
    repository: Box<dyn StateRepository>,
    config: AgentConfig,
    match_seq: u64,
}

impl App {
    /// Build the app over `repository`, restoring whatever it holds.
    ///
    /// Saved hyperparameters take precedence over `config.params`.
    pub fn open<R: StateRepository + 'static>(repository: R, config: AgentConfig) -> Result<Self> {
        let mut app = Self {
            agent: fresh_agent(&config),
            stats: GameStats::new(Utc::now()),
            history: MatchHistory::new(),
            repository: Box::new(repository),
            config,
            match_seq: 0,
        };
        app.reload()?;
        Ok(app)
    }

    /// [`Self::open`] over a MessagePack file.
    pub fn open_file(path: impl AsRef<Path>, config: AgentConfig) -> Result<Self> {
        Self::open(MsgPackRepository::open(path)?, config)
    }

    /// Create a builder for constructing app with custom dependencies.
    ///
    /// Primarily used for testing with in-memory dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut QLearningAgent {
        &mut self.agent
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn history(&self) -> &MatchHistory {
        &self.history
    }

    /// Change some hyperparameters and persist them.
    ///
    /// Nothing changes if the merged values are out of range.
    pub fn set_params(&mut self, update: ParamsUpdate) -> Result<()> {
        let params = self.agent.params().merged(update);
        params.validate()?;
        self.agent.set_params(params);
        self.save()
    }

    /// Everything that would be persisted right now
    pub fn snapshot(&self) -> StoredState {
        StoredState {
            agent: AgentSnapshot::from_agent(&self.agent),
            stats: self.stats.clone(),
            matches: self.history.clone(),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.repository.save(&self.snapshot())
    }

    /// Save, logging a failure instead of returning it.
    ///
    /// The in-memory state stays authoritative either way.
    pub fn save_or_warn(&self) -> bool {
        match self.save() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to save state");
                false
            }
        }
    }

    /// Replace the in-memory state with what the repository holds.
    ///
    /// An empty repository yields a fresh agent with the configured
    /// parameters, zeroed statistics and no history.
    pub fn reload(&mut self) -> Result<()> {
        match self.repository.load()? {
            Some(state) => {
                let mut agent = fresh_agent(&self.config);
                state.agent.restore_into(&mut agent)?;
                info!(
                    states = agent.table_size(),
                    games = state.stats.total_games,
                    "state loaded"
                );
                self.agent = agent;
                self.stats = state.stats;
                self.history = state.matches;
            }
            None => {
                self.agent = fresh_agent(&self.config);
                self.stats = GameStats::new(Utc::now());
                self.history = MatchHistory::new();
            }
        }
        Ok(())
    }

    pub fn export_bundle(&self) -> ExportBundle {
        ExportBundle::from_stored(&self.snapshot())
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        self.export_bundle().write_to(path)?;
        info!(path = %path.display(), states = self.agent.table_size(), "state exported");
        Ok(())
    }

    /// Replace all local state with `bundle`, then reload it from the
    /// repository.
    pub fn import_bundle(&mut self, bundle: ExportBundle) -> Result<()> {
        self.repository.save(&bundle.into_stored())?;
        self.reload()
    }

    pub fn import_from(&mut self, path: &Path) -> Result<()> {
        let bundle = ExportBundle::read_from(path)?;
        self.import_bundle(bundle)?;
        info!(path = %path.display(), states = self.agent.table_size(), "state imported");
        Ok(())
    }

    /// Wipe the repository, the value table, the statistics and the history.
    ///
    /// Hyperparameters are kept and written back to the emptied store.
    pub fn clear_all(&mut self) -> Result<()> {
        self.repository.clear()?;
        self.agent.clear_table();
        self.stats = GameStats::new(Utc::now());
        self.history.clear();
        self.save()?;
        info!("all data cleared");
        Ok(())
    }

    /// Count a finished game in the statistics and keep its record.
    pub fn record_match(&mut self, record: GameMatch) {
        let now = Utc::now();
        match record.mode {
            GameMode::PlayerVsAi => self.stats.record_player_game(record.result, now),
            GameMode::AiVsAi => self.stats.record_self_play(record.winner, now),
        }
        self.history.put(record);
    }

    /// Count a self-play game without keeping a record of it.
    pub fn record_self_play(&mut self, winner: Option<Player>) {
        self.stats.record_self_play(winner, Utc::now());
    }

    /// Fresh match id, unique within this app
    pub fn next_match_id(&mut self) -> String {
        self.match_seq += 1;
        match_id(Utc::now(), self.match_seq)
    }
}

fn fresh_agent(config: &AgentConfig) -> QLearningAgent {
    let agent = QLearningAgent::new(config.params);
    match config.seed {
        Some(seed) => agent.with_seed(seed),
        None => agent,
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Defaults to an empty [`InMemoryRepository`].
pub struct AppBuilder {
    repository: Option<Box<dyn StateRepository>>,
    config: AgentConfig,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            config: AgentConfig::new(),
        }
    }

    pub fn with_repository<R: StateRepository + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Box::new(repo));
        self
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the agent's random source for deterministic tests.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the app, loading any state the repository holds.
    pub fn build(self) -> Result<App> {
        let repository = self
            .repository
            .unwrap_or_else(|| Box::new(InMemoryRepository::new()));
        let mut app = App {
            agent: fresh_agent(&self.config),
            stats: GameStats::new(Utc::now()),
            history: MatchHistory::new(),
            repository,
            config: self.config,
            match_seq: 0,
        };
        app.reload()?;
        Ok(app)
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
