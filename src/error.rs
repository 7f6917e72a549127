//! Error types for map and tuning loading.
//!
//! These are the only fallible operations in the crate. Once a session is
//! running, the simulation never returns an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a map or a tuning file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The map text contained no rows.
    #[error("map is empty")]
    EmptyMap,

    /// The map has rows but not a single floor tile to stand on.
    #[error("map has no floor tiles ('.')")]
    NoFloor,

    /// File could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tuning JSON could not be parsed.
    #[error("invalid tuning data: {0}")]
    Tuning(#[from] serde_json::Error),
}
