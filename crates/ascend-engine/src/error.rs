//! Error types for the engine host binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the interaction loop, and shutdown.

/// Top-level error for the engine host.
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
        source: ascend_core::config::ConfigError,
    },

    /// The progression engine reported a broken invariant.
    #[error("progression error: {source}")]
    Progression {
        /// The underlying engine error.
        #[from]
        source: ascend_core::engine::ProgressionError,
    },

    /// A periodic trigger failed to shut down cleanly.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: ascend_core::runner::RunnerError,
    },

    /// Reading interaction events or writing snapshots failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A snapshot could not be serialized.
    #[error("snapshot serialization failed: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
