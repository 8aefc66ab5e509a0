//! Engine configuration: board dimensions, seeding, and run bounds.
//!
//! Configuration is read from `torus-config.yaml` in the working
//! directory; a missing file falls back to defaults. Every section has
//! a `Default` so a partial file only needs the keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors from configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for this schema.
    #[error("failed to parse config YAML: {source}")]
    Parse {
        /// The underlying parse error.
        #[from]
        source: serde_yml::Error,
    },

    /// The parsed configuration is semantically invalid.
    #[error("invalid config: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

/// Board dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Board width in cells (positive).
    pub width: u32,
    /// Board height in cells (positive).
    pub height: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 24,
            height: 16,
        }
    }
}

/// How the initial board is seeded.
///
/// Explicit `cells` win over the random fill; with no cells listed, the
/// board is filled randomly with the given live-cell probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Explicit live cells as `[x, y]` pairs, applied as tile clicks
    /// during the editing phase.
    pub cells: Vec<[u32; 2]>,
    /// Live-cell probability for the random fill, in `0.0..=1.0`.
    pub density: f64,
    /// RNG seed for the random fill, for reproducible runs.
    pub rng_seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            density: 0.25,
            rng_seed: 42,
        }
    }
}

/// Bounds on the simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Auto-advance interval in milliseconds (positive).
    pub tick_interval_ms: u64,
    /// Stop after this many generations; 0 means unbounded.
    pub max_generations: u64,
    /// Stop after this much wall-clock time; 0 means unbounded.
    pub max_real_time_seconds: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            max_generations: 50,
            max_real_time_seconds: 30,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Board dimensions.
    pub board: BoardConfig,
    /// Initial board seeding.
    pub seed: SeedConfig,
    /// Run bounds and tick speed.
    pub run: RunConfig,
}

impl EngineConfig {
    /// Parse and validate a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, plus the
    /// errors of [`Self::from_yaml`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::from_file`] when the file exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Check semantic constraints the schema cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.width == 0 || self.board.height == 0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "board dimensions must be positive, got {}x{}",
                    self.board.width, self.board.height
                ),
            });
        }
        if self.run.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&self.seed.density) {
            return Err(ConfigError::Invalid {
                reason: format!("seed density must be within 0.0..=1.0, got {}", self.seed.density),
            });
        }
        Ok(())
    }
}
