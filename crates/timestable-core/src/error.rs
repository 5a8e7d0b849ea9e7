//! Store and configuration error types.
//!
//! Defined in `timestable-core` so the typed storage helpers and the session
//! driver can report failures from any `KeyValueStore` implementation.

use thiserror::Error;

/// Errors that can occur when reading or writing the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key contains characters the backend cannot represent.
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    /// Reading or writing the backing medium failed.
    #[error("store I/O failed for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized to JSON.
    #[error("failed to serialize value for key {key:?}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Returns the key involved in this error.
    pub fn key(&self) -> &str {
        match self {
            StoreError::InvalidKey(key) => key,
            StoreError::Io { key, .. } | StoreError::Serialize { key, .. } => key,
        }
    }
}

/// Errors raised while loading the TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(std::path::PathBuf),

    #[error("failed to read config: {}", path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {}", path.display())]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment override holds a value that cannot be used.
    #[error("invalid value {value:?} for {var}")]
    InvalidOverride { var: &'static str, value: String },
}
