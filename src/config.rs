//! Run configuration.
//!
//! Loaded from a TOML file, then overridden by command-line flags:
//!
//! ```toml
//! size = 7
//! seed = 1234
//! strategies = ["breadth-first", "heuristic-2"]
//!
//! [budget]
//! max_expansions = 50000
//! seconds_spent_limit = 10
//! ```

use std::path::Path;
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::puzzle::State;
use crate::search::Strategy;

const DEFAULT_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// Number of pancakes. Ignored when `initial` is given.
    pub size: usize,

    /// Seed for shuffling and for the random strategy.
    pub seed: Option<u64>,

    /// Explicit starting stack instead of a shuffled one.
    pub initial: Option<Vec<u32>>,

    /// Strategies to run, in order.
    pub strategies: Vec<Strategy>,

    pub budget: Budget,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            seed: None,
            initial: None,
            strategies: Strategy::ALL.to_vec(),
            budget: Budget::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Number of pancakes the run will use.
    pub fn effective_size(&self) -> usize {
        self.initial.as_ref().map_or(self.size, Vec::len)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(initial) = &self.initial {
            State::new(initial.clone())?;
        } else if self.size < 2 {
            return Err(ConfigError::Invalid(format!(
                "size must be at least 2, got {}",
                self.size
            )));
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::Invalid("no strategies selected".into()));
        }
        Ok(())
    }

    /// The configured stack, or a fresh shuffle of 1..=size.
    pub fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<State, ConfigError> {
        let state = match &self.initial {
            Some(initial) => State::new(initial.clone())?,
            None => State::shuffled(self.size, rng)?,
        };
        Ok(state)
    }
}

/// Optional limits on a single search run. Unbounded by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Budget {
    /// Hard cap on node expansions.
    pub max_expansions: Option<u64>,

    /// Wall-clock limit in seconds.
    pub seconds_spent_limit: Option<u64>,
}

/// Which budget limit stopped a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Expansions(u64),
    Time(Duration),
}

impl Budget {
    pub fn time_limit(&self) -> Option<Duration> {
        self.seconds_spent_limit.map(Duration::from_secs)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_expansions.is_none() && self.seconds_spent_limit.is_none()
    }

    /// The first limit reached after `expansions` expansions and `elapsed` time, if any.
    pub fn exceeded(&self, expansions: u64, elapsed: Duration) -> Option<Limit> {
        if let Some(max) = self.max_expansions {
            if expansions >= max {
                return Some(Limit::Expansions(max));
            }
        }
        match self.time_limit() {
            Some(limit) if elapsed >= limit => Some(Limit::Time(limit)),
            _ => None,
        }
    }
}
