//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use gopherdoc_config::{Config, ListenAddress};
use ortho_config::{OrthoConfig, OrthoError};

use crate::bootstrap::ConfigLoader;

/// Loader that binds an ephemeral loopback port and serves `corpus_root`.
pub struct TestConfigLoader {
    config: Config,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new(corpus_root: Utf8PathBuf) -> Self {
        Self {
            config: Config {
                listen: ListenAddress::new("127.0.0.1", 0),
                host: String::from("localhost"),
                corpus_root,
                ..Config::default()
            },
        }
    }

    /// Binds to a fixed port instead of an ephemeral one.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.listen = ListenAddress::new("127.0.0.1", port);
        self
    }

    /// Advertises `port` regardless of the bound port.
    #[must_use]
    pub fn advertising_port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Loader that intentionally fails by passing an invalid listen address.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("gopherdoc"),
            OsString::from("--listen"),
            OsString::from("localhost:not-a-port"),
        ];
        Config::load_from_iter(args)
    }
}
