// File: src/error.rs
use std::path::PathBuf;

/// Result type used across the crate, defaulting to [`TranslatorError`].
pub type Result<T, E = TranslatorError> = std::result::Result<T, E>;

/// Errors raised while loading sources or moving snapshots on and off disk.
///
/// The sentence operations never produce these; they signal failure with
/// `None` or `false`.
#[derive(Debug, thiserror::Error)]
pub enum TranslatorError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("The path '{0}' is a directory, but a file was expected.")]
    PathIsDirectory(PathBuf),

    /// Snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The temp file holding a snapshot could not be moved into place.
    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}
