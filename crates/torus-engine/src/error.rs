//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all failure
//! modes during engine startup and the bounded run.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// Game construction or advancement failed.
    #[error("game error: {source}")]
    Game {
        /// The underlying game error.
        #[from]
        source: torus_game::GameError,
    },

    /// Serializing the final board snapshot failed.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
