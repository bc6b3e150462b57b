//! Solver configuration.
//!
//! All settings have defaults; a TOML file only needs the keys it changes.
//!
//! # Example
//!
//! ```
//! use u_batching::config::{PricingStrategy, SolverConfig};
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     [pricing]
//!     strategy = "hybrid"
//!
//!     [heuristics]
//!     max_iterations = 20
//! "#).unwrap();
//!
//! assert_eq!(config.pricing.strategy, PricingStrategy::Hybrid);
//! assert_eq!(config.heuristics.max_iterations, 20);
//! assert!(config.heuristics.local_search);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default numerical tolerance.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Node id whose columns are accepted with the strict `rc < 0` rule.
pub const DEFAULT_STRICT_NODE_ID: usize = 2;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Pricing oracle settings.
    pub pricing: PricingConfig,
    /// Primal heuristic settings.
    pub heuristics: HeuristicsConfig,
}

impl SolverConfig {
    /// Creates a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the pricing section.
    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    /// Sets the heuristics section.
    pub fn with_heuristics(mut self, heuristics: HeuristicsConfig) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Rejects negative tolerances and thresholds outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pricing.epsilon.is_nan() || self.pricing.epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pricing.epsilon must be non-negative, got {}",
                self.pricing.epsilon
            )));
        }
        if self.heuristics.epsilon.is_nan() || self.heuristics.epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "heuristics.epsilon must be non-negative, got {}",
                self.heuristics.epsilon
            )));
        }
        if !(0.0..=1.0).contains(&self.heuristics.fix_threshold) {
            return Err(ConfigError::Invalid(format!(
                "heuristics.fix_threshold must lie in [0, 1], got {}",
                self.heuristics.fix_threshold
            )));
        }
        Ok(())
    }
}

/// Which pricing oracle to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Knapsack DP over capacity (relaxes branching constraints).
    #[default]
    Dynamic,
    /// Constrained branch-and-bound honoring every branching constraint.
    Exact,
    /// DP first, exact oracle at constrained nodes when DP yields nothing usable.
    Hybrid,
}

/// Pricing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Oracle implementation.
    pub strategy: PricingStrategy,
    /// Columns must satisfy `rc < -epsilon` outside the strict node.
    pub epsilon: f64,
    /// Node id whose columns are accepted when `rc < 0`. `None` disables it.
    pub strict_node_id: Option<usize>,
    /// Drop DP columns that violate the node's branching constraints.
    pub filter_branching: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            strategy: PricingStrategy::Dynamic,
            epsilon: DEFAULT_EPSILON,
            strict_node_id: Some(DEFAULT_STRICT_NODE_ID),
            filter_branching: true,
        }
    }
}

impl PricingConfig {
    /// Sets the oracle implementation.
    pub fn with_strategy(mut self, strategy: PricingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the acceptance tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the strict-acceptance node id.
    pub fn with_strict_node_id(mut self, id: Option<usize>) -> Self {
        self.strict_node_id = id;
        self
    }

    /// Enables or disables post-filtering of DP columns.
    pub fn with_filter_branching(mut self, filter: bool) -> Self {
        self.filter_branching = filter;
        self
    }
}

/// Primal heuristic settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Columns with master value above `fix_threshold + epsilon` are fixed.
    pub fix_threshold: f64,
    /// Tolerance on master values.
    pub epsilon: f64,
    /// Run relocate/exchange after construction.
    pub local_search: bool,
    /// Upper bound on local-search rounds.
    pub max_iterations: usize,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            fix_threshold: 0.5,
            epsilon: DEFAULT_EPSILON,
            local_search: true,
            max_iterations: 100,
        }
    }
}

impl HeuristicsConfig {
    /// Sets the fixing threshold.
    pub fn with_fix_threshold(mut self, threshold: f64) -> Self {
        self.fix_threshold = threshold;
        self
    }

    /// Enables or disables local search.
    pub fn with_local_search(mut self, enabled: bool) -> Self {
        self.local_search = enabled;
        self
    }

    /// Sets the round limit.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}
