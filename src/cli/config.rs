//! Shared configuration for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    app::{AgentConfig, App},
    q_learning::ParamsUpdate,
};

/// Default state file, relative to the working directory
pub const DEFAULT_STORE: &str = "tictactoe-ai.msgpack";

/// Options every command that touches saved state accepts
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// State file (MessagePack)
    #[arg(long, default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate α (0.0-1.0); saved with the state
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ (0.0-1.0); saved with the state
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate ε (0.0-1.0); saved with the state
    #[arg(long)]
    pub epsilon: Option<f64>,
}

impl StoreArgs {
    pub fn params_update(&self) -> ParamsUpdate {
        ParamsUpdate {
            alpha: self.alpha,
            gamma: self.gamma,
            epsilon: self.epsilon,
        }
    }

    /// Open the state file and apply any hyperparameter overrides.
    pub fn open_app(&self) -> Result<App> {
        let mut config = AgentConfig::new();
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        let mut app = App::open_file(&self.store, config)
            .with_context(|| format!("failed to open state file {}", self.store.display()))?;

        let update = self.params_update();
        if !update.is_empty() {
            app.set_params(update)
                .context("failed to apply hyperparameters")?;
        }
        Ok(app)
    }
}
