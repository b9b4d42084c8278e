//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::binary::ProfileFlags;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a binary model dump
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid binary model: {0}")]
    Invalid(String),
}

/// Errors that can occur during profile output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("unable to open {} for output: {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize YAML: {0}")]
    SerializationFailed(#[from] serde_yaml::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Profile flags disagree between functions.
///
/// This is never reported to a user; the profile builder treats it as a
/// broken invariant in whatever attached the profile to the functions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("function {function} has profile data but no profile flags")]
    MissingFlags { function: String },

    #[error(
        "expected consistent profile flags across all functions: \
         {function} has {found:?}, expected {expected:?}"
    )]
    Mismatch {
        function: String,
        expected: ProfileFlags,
        found: ProfileFlags,
    },
}
