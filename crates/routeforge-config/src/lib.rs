//! Configuration system for RouteForge.
//!
//! Load filter configuration from TOML or YAML to control invariant
//! checking, the chain decomposition algorithm and the range-query cache
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use routeforge_config::{ChainAlgorithm, EnvironmentMode, FilterConfig};
//!
//! let config = FilterConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!
//!     [path_state]
//!     chain_algorithm = "sorting"
//!
//!     [dimension]
//!     min_range_size_for_riq = 8
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! assert_eq!(config.path_state.chain_algorithm, ChainAlgorithm::Sorting);
//! assert_eq!(config.path_state.max_arcs_for_selection, 8);
//! assert_eq!(config.dimension.min_range_size_for_riq, 8);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use routeforge_config::FilterConfig;
//!
//! let config = FilterConfig::load("filters.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;

use routeforge_core::RouteForgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for RouteForgeError {
    fn from(err: ConfigError) -> Self {
        RouteForgeError::Config(err.to_string())
    }
}

/// Main filter configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterConfig {
    /// Environment mode controlling invariant checks.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Path state tuning.
    #[serde(default)]
    pub path_state: PathStateConfig,

    /// Dimension checker tuning.
    #[serde(default)]
    pub dimension: DimensionConfig,
}

impl FilterConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Forces a chain decomposition algorithm.
    pub fn with_chain_algorithm(mut self, algorithm: ChainAlgorithm) -> Self {
        self.path_state.chain_algorithm = algorithm;
        self
    }

    /// Sets the minimum chain span served by the range-query cache.
    pub fn with_min_range_size_for_riq(mut self, size: usize) -> Self {
        self.dimension.min_range_size_for_riq = size;
        self
    }

    /// Checks values that would make the filters misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path_state.max_arcs_for_selection == 0 {
            return Err(ConfigError::Invalid(
                "path_state.max_arcs_for_selection must be positive".to_string(),
            ));
        }
        if self.path_state.commit_growth_factor == 0 {
            return Err(ConfigError::Invalid(
                "path_state.commit_growth_factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Environment mode affecting invariant checking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Accepted so solver-wide configuration files load unchanged. The
    /// filters draw no random numbers, so it behaves like
    /// `non_reproducible`: no extra validation.
    Reproducible,

    /// Fast assert mode: chain bounds are validated on every change.
    FastAssert,

    /// Full assert mode: whole-structure validation after every commit.
    FullAssert,
}

impl EnvironmentMode {
    /// True for `fast_assert` and `full_assert`.
    pub fn is_asserted(&self) -> bool {
        matches!(self, Self::FastAssert | Self::FullAssert)
    }

    /// True for `full_assert` only.
    pub fn is_fully_asserted(&self) -> bool {
        matches!(self, Self::FullAssert)
    }
}

/// Algorithm used to rebuild chains of changed paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainAlgorithm {
    /// Selection for small changes, sorting otherwise.
    #[default]
    Auto,

    /// Quadratic selection scan.
    Selection,

    /// Sort-based linking.
    Sorting,
}

/// Path state configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PathStateConfig {
    /// Chain decomposition algorithm.
    pub chain_algorithm: ChainAlgorithm,

    /// Largest arc count (changed arcs plus one per changed path) handled by
    /// selection in `auto` mode.
    pub max_arcs_for_selection: usize,

    /// The committed layout may grow to this many times the node count
    /// before a full commit compacts it.
    pub commit_growth_factor: usize,

    /// Lower bound on the committed layout size allowed before compaction.
    pub min_commit_capacity: usize,
}

impl Default for PathStateConfig {
    fn default() -> Self {
        Self {
            chain_algorithm: ChainAlgorithm::Auto,
            max_arcs_for_selection: 8,
            commit_growth_factor: 4,
            min_commit_capacity: 16,
        }
    }
}

impl PathStateConfig {
    /// Committed layout size at or above which commits rebuild from scratch.
    pub fn max_committed_size(&self, num_nodes: usize) -> usize {
        self.min_commit_capacity
            .max(self.commit_growth_factor.saturating_mul(num_nodes))
    }
}

/// Dimension checker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DimensionConfig {
    /// Chains whose committed index span exceeds this are evaluated through
    /// the range-query cache instead of node by node.
    pub min_range_size_for_riq: usize,
}

impl Default for DimensionConfig {
    fn default() -> Self {
        Self {
            min_range_size_for_riq: 4,
        }
    }
}
