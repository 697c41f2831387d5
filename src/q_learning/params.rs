//! Learning hyperparameters

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Learning rate, discount factor and exploration probability.
///
/// Serialized with the short names used in exported files
/// (`alpha`, `gamma`, `epsilon`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Exploration probability ε
    pub epsilon: f64,
}

impl Hyperparameters {
    pub const DEFAULT_ALPHA: f64 = 0.1;
    pub const DEFAULT_GAMMA: f64 = 0.9;
    pub const DEFAULT_EPSILON: f64 = 0.1;

    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Self {
        Self {
            alpha,
            gamma,
            epsilon,
        }
    }

    /// Apply the fields present in `update`, leaving the others untouched.
    pub fn merged(self, update: ParamsUpdate) -> Self {
        Self {
            alpha: update.alpha.unwrap_or(self.alpha),
            gamma: update.gamma.unwrap_or(self.gamma),
            epsilon: update.epsilon.unwrap_or(self.epsilon),
        }
    }

    /// Check that every value is finite and within `[0, 1]`.
    ///
    /// The agent itself accepts any value; front ends call this before
    /// handing user input over.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("epsilon", self.epsilon),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ALPHA,
            Self::DEFAULT_GAMMA,
            Self::DEFAULT_EPSILON,
        )
    }
}

/// Partial hyperparameter change; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParamsUpdate {
    pub alpha: Option<f64>,
    pub gamma: Option<f64>,
    pub epsilon: Option<f64>,
}

impl ParamsUpdate {
    pub fn is_empty(&self) -> bool {
        self.alpha.is_none() && self.gamma.is_none() && self.epsilon.is_none()
    }
}
