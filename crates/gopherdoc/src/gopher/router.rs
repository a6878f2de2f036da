//! Selector routing.
//!
//! A selector starting with [`DOC_SELECTOR_PREFIX`] asks for the rendered
//! documentation of the package named by the rest of the selector. Any other
//! selector, including the empty one for the corpus root, asks for a menu of
//! that package: an entry for its documentation when there is any, followed by
//! one entry per immediate sub-package in corpus order.

use std::io::Write;
use std::sync::Arc;

use gopherdoc_corpus::{DirEntry, DocumentRenderer, PackageLookup, PageInfo};
use tracing::debug;

use super::errors::RouteError;
use super::menu::{DirEntity, ItemType, Menu};
use super::path;

/// Tracing target for routing.
pub(crate) const ROUTER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::router");

/// Prefix marking a document selector.
pub const DOC_SELECTOR_PREFIX: &str = "doc:";

const DOC_ENTRY_NAME: &str = "Package Documentation";

/// Column width the sub-package name is padded to before its synopsis.
const NAME_COLUMN_WIDTH: usize = 11;

/// Host and port written into every menu entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    host: String,
    port: u16,
}

impl ServerIdentity {
    /// Builds the advertised identity.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Advertised hostname.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Advertised port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

/// A parsed selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Rendered documentation for the package path.
    Document(&'a str),
    /// Menu for the package path; empty for the root.
    Directory(&'a str),
}

impl<'a> Selector<'a> {
    /// Classifies a raw selector by its literal prefix.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix(DOC_SELECTOR_PREFIX) {
            Some(path) => Self::Document(path),
            None => Self::Directory(raw),
        }
    }
}

/// Fully resolved answer to a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Rendered document bytes, sent without any menu framing.
    Document(Vec<u8>),
    /// Menu listing.
    Menu(Menu),
}

impl Response {
    /// Writes the response body to `sink`.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `sink`.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> std::io::Result<()> {
        match self {
            Self::Document(bytes) => sink.write_all(bytes),
            Self::Menu(menu) => menu.write_to(sink),
        }
    }
}

/// Answers selectors by consulting the corpus collaborators.
#[derive(Clone)]
pub struct SelectorRouter {
    lookup: Arc<dyn PackageLookup>,
    renderer: Arc<dyn DocumentRenderer>,
    identity: ServerIdentity,
}

impl std::fmt::Debug for SelectorRouter {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SelectorRouter")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl SelectorRouter {
    /// Creates a router over the given collaborators.
    pub fn new(
        lookup: Arc<dyn PackageLookup>,
        renderer: Arc<dyn DocumentRenderer>,
        identity: ServerIdentity,
    ) -> Self {
        Self {
            lookup,
            renderer,
            identity,
        }
    }

    /// Advertised identity used in menu entities.
    #[must_use]
    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Resolves a selector to a complete response.
    ///
    /// All collaborator calls happen here, and a document is rendered into
    /// memory, so a failure never leaves a partial response behind.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Lookup`] when the corpus cannot resolve the path
    /// and [`RouteError::Render`] when rendering fails.
    pub fn resolve(&self, raw: &str) -> Result<Response, RouteError> {
        match Selector::parse(raw) {
            Selector::Document(path) => {
                let info = self.page_info(path)?;
                let mut body = Vec::new();
                self.renderer
                    .render(&mut body, &info)
                    .map_err(|source| RouteError::render(path, source))?;
                Ok(Response::Document(body))
            }
            Selector::Directory(path) => {
                let info = self.page_info(path)?;
                Ok(Response::Menu(self.make_menu(&info, path)))
            }
        }
    }

    /// Resolves a selector and writes the response body to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::resolve`], or [`RouteError::Io`] when
    /// writing fails. Nothing is written when resolution fails.
    pub fn route<W: Write + ?Sized>(&self, raw: &str, sink: &mut W) -> Result<(), RouteError> {
        let response = self.resolve(raw)?;
        response.write_to(sink)?;
        Ok(())
    }

    fn page_info(&self, path: &str) -> Result<PageInfo, RouteError> {
        let info = self
            .lookup
            .lookup(path)
            .map_err(|source| RouteError::lookup(path, source))?;
        debug!(
            target: ROUTER_TARGET,
            directory = %info.dirname,
            has_doc = info.has_doc(),
            "resolved package"
        );
        Ok(info)
    }

    /// Builds the menu for a package page.
    ///
    /// The document entry comes first when documentation exists, then one
    /// directory entity per depth-0 child in the order the corpus listed them.
    #[must_use]
    pub fn make_menu(&self, info: &PageInfo, parent_path: &str) -> Menu {
        let mut entities = Vec::new();
        if info.has_doc() {
            entities.push(DirEntity::new(
                ItemType::Document,
                DOC_ENTRY_NAME,
                format!("{DOC_SELECTOR_PREFIX}{parent_path}"),
                self.identity.host(),
                self.identity.port(),
            ));
        }

        let Some(dirs) = info.dirs.as_ref() else {
            return Menu::new(entities);
        };
        entities.extend(
            dirs.list
                .iter()
                .filter(|dir| dir.depth == 0)
                .map(|dir| self.make_dir_entity(dir, parent_path)),
        );
        Menu::new(entities)
    }

    fn make_dir_entity(&self, dir: &DirEntry, parent_path: &str) -> DirEntity {
        let selector = path::join(&[parent_path, dir.path.as_str()]);
        let base = path::base(&selector);
        let name = if dir.synopsis.is_empty() {
            base.to_owned()
        } else {
            format!("{base:<width$}: {}", dir.synopsis, width = NAME_COLUMN_WIDTH)
        };
        DirEntity::new(
            ItemType::Directory,
            name,
            &selector,
            self.identity.host(),
            self.identity.port(),
        )
    }
}
