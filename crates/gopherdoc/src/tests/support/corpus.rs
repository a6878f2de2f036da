//! Temporary documentation trees for end-to-end scenarios.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A small corpus laid out on disk:
///
/// ```text
/// net/doc.txt          "Networking primitives."
/// net/http/doc.txt     "HTTP client and server."
/// net/url/             (no documentation)
/// ```
pub struct SampleCorpus {
    dir: TempDir,
}

impl SampleCorpus {
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create corpus directory");
        let corpus = Self { dir };
        corpus.write_doc("net", "Networking primitives.\n\nPackage net covers sockets.\n");
        corpus.write_doc("net/http", "HTTP client and server.\n");
        fs::create_dir_all(corpus.root().join("net/url")).expect("create net/url");
        corpus
    }

    pub fn root(&self) -> Utf8PathBuf {
        Utf8Path::from_path(self.dir.path())
            .expect("temporary directory path was not valid UTF-8")
            .to_owned()
    }

    fn write_doc(&self, package: &str, text: &str) {
        let dir = self.root().join(package);
        fs::create_dir_all(&dir).expect("create package directory");
        fs::write(dir.join("doc.txt"), text).expect("write doc.txt");
    }
}

impl Default for SampleCorpus {
    fn default() -> Self {
        Self::new()
    }
}
