//! Directory-tree corpus indexed once at startup.
//!
//! Every directory under the root is a package. A package is documented when
//! it holds one of [`DOC_FILE_NAMES`]. The index is immutable after
//! [`FsCorpus::open`] returns, so lookups from many connection threads need
//! no locking.

use std::collections::HashMap;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use crate::errors::{CorpusError, LookupError};
use crate::page::{DirEntry, DirList, PackageDoc, PageInfo};
use crate::synopsis::synopsis;
use crate::PackageLookup;

const CORPUS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::fs");

/// Documentation file names, in order of preference.
pub const DOC_FILE_NAMES: &[&str] = &["doc.txt", "README.md", "README"];

const ROOT_PACKAGE_NAME: &str = "root";

#[derive(Debug, Default)]
struct PackageNode {
    doc: Option<String>,
    synopsis: String,
    children: Vec<String>,
}

/// Package index over a directory tree.
#[derive(Debug)]
pub struct FsCorpus {
    root: Utf8PathBuf,
    packages: HashMap<String, PackageNode>,
}

impl FsCorpus {
    /// Walks `root` and indexes every package below it.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when the root is not a directory or a
    /// directory or documentation file cannot be read.
    pub fn open(root: impl Into<Utf8PathBuf>) -> Result<Self, CorpusError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CorpusError::NotADirectory { path: root });
        }
        let mut packages = HashMap::new();
        index_package(&root, "", &mut packages)?;
        debug!(
            target: CORPUS_TARGET,
            root = %root,
            packages = packages.len(),
            "corpus indexed"
        );
        Ok(Self { root, packages })
    }

    /// Root directory of the corpus.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        self.root.as_path()
    }

    /// Number of indexed packages, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the corpus holds no packages besides the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.len() <= 1
    }

    fn collect_descendants(&self, parent: &str, prefix: &str, depth: usize, out: &mut Vec<DirEntry>) {
        let Some(node) = self.packages.get(parent) else {
            return;
        };
        for child in &node.children {
            let Some(child_node) = self.packages.get(child) else {
                continue;
            };
            let name = child.rsplit('/').next().unwrap_or(child.as_str());
            let relative = if prefix.is_empty() {
                name.to_owned()
            } else {
                format!("{prefix}/{name}")
            };
            out.push(DirEntry::new(
                relative.clone(),
                depth,
                child_node.synopsis.clone(),
            ));
            self.collect_descendants(child, &relative, depth + 1, out);
        }
    }
}

impl PackageLookup for FsCorpus {
    fn lookup(&self, path: &str) -> Result<PageInfo, LookupError> {
        let key = normalise(path).ok_or_else(|| LookupError::not_found(path))?;
        let node = self
            .packages
            .get(&key)
            .ok_or_else(|| LookupError::not_found(path))?;

        let doc = node.doc.as_ref().map(|text| PackageDoc {
            name: package_name(&key).to_owned(),
            import_path: key.clone(),
            text: text.clone(),
        });

        let mut entries = Vec::new();
        self.collect_descendants(&key, "", 0, &mut entries);
        let dirs = (!entries.is_empty()).then(|| DirList::new(entries));

        Ok(PageInfo {
            dirname: key,
            doc,
            dirs,
        })
    }
}

/// Normalises a lookup path to an index key; `None` when it leaves the root.
fn normalise(path: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

fn package_name(key: &str) -> &str {
    if key.is_empty() {
        ROOT_PACKAGE_NAME
    } else {
        key.rsplit('/').next().unwrap_or(key)
    }
}

fn is_skipped(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_') || name == "testdata"
}

fn index_package(
    dir: &Utf8Path,
    key: &str,
    packages: &mut HashMap<String, PackageNode>,
) -> Result<(), CorpusError> {
    let doc = read_doc(dir)?;
    let node_synopsis = doc.as_deref().map(synopsis).unwrap_or_default();

    let mut child_names = Vec::new();
    let reader = fs::read_dir(dir).map_err(|source| CorpusError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in reader {
        let entry = entry.map_err(|source| CorpusError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        // `DirEntry::file_type` does not follow symlinks, which keeps
        // symlinked directories (and any cycles through them) out of the walk.
        let is_dir = entry
            .file_type()
            .map(|file_type| file_type.is_dir())
            .map_err(|source| CorpusError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
        if !is_dir {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            warn!(
                target: CORPUS_TARGET,
                directory = %dir,
                "skipping directory with a non UTF-8 name"
            );
            continue;
        };
        if is_skipped(&name) {
            continue;
        }
        child_names.push(name);
    }
    child_names.sort();

    let mut children = Vec::with_capacity(child_names.len());
    for name in child_names {
        let child_key = if key.is_empty() {
            name.clone()
        } else {
            format!("{key}/{name}")
        };
        index_package(&dir.join(&name), &child_key, packages)?;
        children.push(child_key);
    }

    packages.insert(
        key.to_owned(),
        PackageNode {
            doc,
            synopsis: node_synopsis,
            children,
        },
    );
    Ok(())
}

fn read_doc(dir: &Utf8Path) -> Result<Option<String>, CorpusError> {
    for name in DOC_FILE_NAMES {
        let path = dir.join(name);
        match fs::read(&path) {
            Ok(bytes) => return Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::IsADirectory
                ) || path.is_dir() =>
            {
                continue;
            }
            Err(source) => return Err(CorpusError::ReadDoc { path, source }),
        }
    }
    Ok(None)
}
