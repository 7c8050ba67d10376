//! Crate-wide error taxonomy.
//!
//! Every fallible operation in the engine returns [`Result`]. The variants
//! mirror the error taxonomy of the system this crate models: invalid
//! input, filesystem access failures during project initialization, and
//! durable-store failures during save/load.

use std::path::PathBuf;

use thiserror::Error;

/// The crate-wide result alias.
pub type Result<T> = std::result::Result<T, MicrofilmError>;

/// Errors surfaced by the microfilm allocation engine.
#[derive(Debug, Error)]
pub enum MicrofilmError {
    /// Wraps an underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller-supplied value was missing or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The given path does not exist or is not a directory.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// Neither the given path nor its parent matched the archive folder
    /// naming convention.
    #[error("folder name does not match the archive naming convention: {0}")]
    MalformedFolderName(String),

    /// A directory could not be read while resolving documents or the
    /// spreadsheet companion file.
    #[error("failed to read directory {path}: {source}")]
    DirectoryReadFailed {
        /// The directory that could not be read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A durable-store operation failed (open, prepare, step, or commit).
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Schema creation failed on first open of the store.
    #[error("schema error: {0}")]
    Schema(String),

    /// A roll could not be created, or a segment could not be placed due
    /// to an internal invariant violation.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Film number generation failed.
    #[error("film number error: {0}")]
    FilmNumber(String),

    /// Writing an export file failed.
    #[error("export error: {0}")]
    Export(String),
}
