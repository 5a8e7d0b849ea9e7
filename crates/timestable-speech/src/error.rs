//! Speech error types.

use thiserror::Error;

/// Errors that can occur when producing speech.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The configured program is not on `PATH`.
    #[error("speech program not found: {0}")]
    ProgramNotFound(String),

    /// The program exists but could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend configuration is unusable.
    #[error("invalid speech configuration: {0}")]
    InvalidConfig(String),
}
