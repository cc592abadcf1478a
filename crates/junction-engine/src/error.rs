//! Error types for the junction engine binary.

/// Top-level error for the junction engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: junction_core::ConfigError,
    },

    /// Lane evaluation or arbitration failed.
    #[error("controller error: {source}")]
    Controller {
        /// The underlying controller error.
        #[from]
        source: junction_core::ControllerError,
    },

    /// The report could not be serialized.
    #[error("failed to serialize report: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Writing the report to stdout failed.
    #[error("failed to write report: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
