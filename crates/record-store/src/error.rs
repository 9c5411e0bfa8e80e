//! Error types for the record-store crate.
//!
//! Only writes can fail from a caller's point of view: reads degrade to an
//! empty collection and are reported through `tracing` instead.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while opening the data directory or committing a collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The data directory could not be created or opened.
    #[error("failed to open data directory '{path}': {message}")]
    Open {
        /// Directory that was being opened.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The collection could not be encoded as JSON.
    #[error("failed to serialize collection for '{path}': {message}")]
    Serialize {
        /// File the collection was destined for.
        path: Utf8PathBuf,
        /// Description of the encoding error.
        message: String,
    },

    /// The temporary file could not be written or renamed into place.
    #[error("failed to write '{path}': {message}")]
    Write {
        /// Path of the file that failed.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}
