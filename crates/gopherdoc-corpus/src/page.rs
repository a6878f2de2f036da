//! Page metadata returned by [`crate::PackageLookup`].

/// Result of looking up a package path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Normalised package path that was looked up; empty for the root.
    pub dirname: String,
    /// Package documentation, when the package has any.
    pub doc: Option<PackageDoc>,
    /// Packages below `dirname`, or `None` when there are none.
    pub dirs: Option<DirList>,
}

impl PageInfo {
    /// Whether a document can be rendered for this page.
    #[must_use]
    pub fn has_doc(&self) -> bool {
        self.doc.is_some()
    }
}

/// Documentation attached to a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDoc {
    /// Package name (the last path segment, `root` for the corpus root).
    pub name: String,
    /// Full package path.
    pub import_path: String,
    /// Documentation body.
    pub text: String,
}

/// Packages below a queried path, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirList {
    /// Entries in the order the corpus produced them.
    pub list: Vec<DirEntry>,
}

impl DirList {
    /// Builds a list from entries.
    #[must_use]
    pub fn new(list: Vec<DirEntry>) -> Self {
        Self { list }
    }
}

/// A package below the queried path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirEntry {
    /// Number of segments below the immediate children; 0 for a direct child.
    pub depth: usize,
    /// Path relative to the queried package.
    pub path: String,
    /// Last segment of `path`.
    pub name: String,
    /// One-sentence summary; empty when the package has no documentation.
    pub synopsis: String,
}

impl DirEntry {
    /// Builds an entry, deriving the name from the relative path.
    #[must_use]
    pub fn new(path: impl Into<String>, depth: usize, synopsis: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or_default().to_owned();
        Self {
            depth,
            path,
            name,
            synopsis: synopsis.into(),
        }
    }
}
