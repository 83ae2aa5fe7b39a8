//! Selection of the reduction strategy and of the cell expansion.

use crate::error::{Error, Result};
use crate::stencil::Expansion;
use serde::{Deserialize, Serialize};

/// How the cells of the grid are distributed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Strategy {
    /// A single loop over all cells on the calling thread.
    Sequential,
    /// The cells are split into `n_cores` contiguous ranges of (almost) equal size, each one
    /// integrated on its own scoped thread.
    Threads {
        /// Number of threads to spawn.
        n_cores: usize,
    },
    /// Parallel map-reduce over the cells on the global `rayon` thread pool.
    Rayon,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Sequential
    }
}

/// Options of an integration.
///
/// The options only affect the run time and the rounding of the result, never the estimate
/// itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    strategy: Strategy,
    expansion: Expansion,
}

impl Config {
    /// Sequential integration with the six-point stencil expansion.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Integration on one thread per logical CPU.
    pub fn parallel() -> Self {
        Self::default().with_strategy(Strategy::Threads {
            n_cores: num_cpus::get(),
        })
    }

    /// Returns the configuration used by [`integrate`](crate::integrate) for the given flag.
    pub fn from_parallel_flag(parallel: bool) -> Self {
        if parallel {
            Self::parallel()
        } else {
            Self::sequential()
        }
    }

    /// Replaces the strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replaces the expansion.
    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.expansion = expansion;
        self
    }

    /// Returns the strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the expansion.
    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    /// Checks that the configuration can be used.
    pub fn validate(&self) -> Result<()> {
        match self.strategy {
            Strategy::Threads { n_cores: 0 } => Err(Error::InvalidConfig(
                "at least one thread is required".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Reads a configuration from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
