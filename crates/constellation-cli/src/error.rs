//! Error types for the constellation binary.
//!
//! [`CliError`] wraps every failure that can happen between reading the
//! command line and printing the scene, so `main` can propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the constellation binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: constellation_core::ConfigError,
    },

    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot file is not a valid snapshot document.
    #[error("failed to parse snapshot {}: {source}", path.display())]
    Snapshot {
        /// Snapshot file.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// `--at` is not an RFC 3339 timestamp.
    #[error("invalid --at timestamp {value:?}: {source}")]
    Time {
        /// The rejected argument.
        value: String,
        /// The underlying parse error.
        source: chrono::ParseError,
    },

    /// The scene could not be serialized.
    #[error("failed to serialize scene: {source}")]
    Output {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
