//! Error types for persista.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Result type alias for persista operations.
pub type Result<T> = std::result::Result<T, PersistaError>;

/// Every failure the engine can report.
///
/// A record that was never written is not an error: reads report it as
/// [`Record::Absent`](crate::engine::Record) and fall back to the default.
#[derive(Debug, Error)]
pub enum PersistaError {
    /// The value's type has no stable identifier (closures, tuples, slices...).
    #[error("type `{type_name}` has no stable identifier and can't be persisted")]
    Configuration { type_name: &'static str },

    /// The codec failed to encode or decode a record.
    #[error("failed to {operation} `{type_id}`: {source}")]
    Serialization {
        operation: &'static str,
        type_id: String,
        #[source]
        source: CodecError,
    },

    /// Filesystem failure other than "record absent".
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The background task running the operation panicked or was cancelled.
    #[error("background task failed: {0}")]
    Runtime(String),

    /// A config file could not be parsed.
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl PersistaError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn encode(type_id: impl Into<String>, source: CodecError) -> Self {
        Self::Serialization {
            operation: "encode",
            type_id: type_id.into(),
            source,
        }
    }

    #[must_use]
    pub fn decode(type_id: impl Into<String>, source: CodecError) -> Self {
        Self::Serialization {
            operation: "decode",
            type_id: type_id.into(),
            source,
        }
    }

    /// True for codec failures.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

impl From<tokio::task::JoinError> for PersistaError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Runtime(e.to_string())
    }
}
