//! Error types for selector routing.

use std::io;

use gopherdoc_corpus::{LookupError, RenderError};
use thiserror::Error;

/// Errors surfaced while answering a selector.
///
/// None of these has an in-protocol representation: the session logs them and
/// closes the connection without writing a response.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The corpus could not resolve the package path.
    #[error("lookup failed for '{path}': {source}")]
    Lookup {
        /// Package path taken from the selector.
        path: String,
        /// Underlying lookup error.
        #[source]
        source: LookupError,
    },
    /// The renderer failed to produce the document.
    #[error("rendering failed for '{path}': {source}")]
    Render {
        /// Package path taken from the selector.
        path: String,
        /// Underlying render error.
        #[source]
        source: RenderError,
    },
    /// Writing the response failed.
    #[error("failed to write response: {0}")]
    Io(#[from] io::Error),
}

impl RouteError {
    /// Creates a lookup error.
    pub fn lookup(path: impl Into<String>, source: LookupError) -> Self {
        Self::Lookup {
            path: path.into(),
            source,
        }
    }

    /// Creates a render error.
    pub fn render(path: impl Into<String>, source: RenderError) -> Self {
        Self::Render {
            path: path.into(),
            source,
        }
    }
}
