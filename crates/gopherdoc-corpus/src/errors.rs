//! Error types reported by corpus collaborators.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced while resolving a package path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// No package exists at the requested path.
    #[error("package not found: '{path}'")]
    NotFound {
        /// Requested path.
        path: String,
    },
    /// The corpus could not answer for an existing path.
    #[error("lookup failed for '{path}': {message}")]
    Internal {
        /// Requested path.
        path: String,
        /// Description of the failure.
        message: String,
    },
}

impl LookupError {
    /// Creates a not-found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an internal error.
    pub fn internal(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced while rendering a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The page carries no documentation to render.
    #[error("no documentation available for '{dirname}'")]
    NoDocumentation {
        /// Package path of the page.
        dirname: String,
    },
    /// Writing to the sink failed.
    #[error("failed to write document: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while building a filesystem corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus root does not exist or is not a directory.
    #[error("corpus root '{path}' is not a directory")]
    NotADirectory {
        /// Configured root.
        path: Utf8PathBuf,
    },
    /// Reading a directory failed.
    #[error("failed to read directory '{path}': {source}")]
    ReadDir {
        /// Directory being listed.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Reading a documentation file failed.
    #[error("failed to read documentation file '{path}': {source}")]
    ReadDoc {
        /// Documentation file path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}
