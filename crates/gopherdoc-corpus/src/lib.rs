//! Documentation corpus consumed by the gopherdoc server.
//!
//! The server core talks to the corpus through two traits:
//!
//! - [`PackageLookup`] resolves a package path to a [`PageInfo`] describing
//!   whether documentation is available and which sub-packages exist;
//! - [`DocumentRenderer`] turns a [`PageInfo`] into displayable text.
//!
//! Both are shared between every connection thread, so implementations must
//! be safe for concurrent reads. This crate also ships the concrete pair the
//! server binary uses: [`FsCorpus`], an index of a directory tree built once
//! at startup, and [`TextRenderer`], a plain-text page layout.

mod errors;
mod fs;
mod page;
mod render;
mod synopsis;

use std::io::Write;

pub use errors::{CorpusError, LookupError, RenderError};
pub use fs::{DOC_FILE_NAMES, FsCorpus};
pub use page::{DirEntry, DirList, PackageDoc, PageInfo};
pub use render::TextRenderer;
pub use synopsis::synopsis;

/// Resolves package paths to page metadata.
pub trait PackageLookup: Send + Sync {
    /// Looks up the package at `path`, relative to the corpus root.
    ///
    /// The empty path denotes the root.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] when the package is unknown or the corpus
    /// cannot answer. Callers treat either as fatal for the request.
    fn lookup(&self, path: &str) -> Result<PageInfo, LookupError>;
}

/// Renders package documentation as text.
pub trait DocumentRenderer: Send + Sync {
    /// Writes the document for `info` to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the page has nothing to render or the
    /// sink rejects a write.
    fn render(&self, sink: &mut dyn Write, info: &PageInfo) -> Result<(), RenderError>;
}
