//! Shared configuration for the gopherdoc server.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then a TOML
//! file named with `--config-path` (or `GOPHERDOC_CONFIG_PATH`), then
//! `GOPHERDOC_*` environment variables, then command-line flags. The resolved
//! [`Config`] is immutable once loaded; the server derives its advertised
//! identity from it once at startup and shares that by reference with every
//! connection.

mod defaults;
mod listen;
mod logging;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_ADVERTISED_HOST, DEFAULT_CORPUS_ROOT, DEFAULT_LOG_FILTER, READ_TIMEOUT,
    default_advertised_host, default_corpus_root, default_listen_address, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use listen::{GOPHER_PORT, ListenAddress, ListenAddressError};
pub use logging::{LogFormat, LogFormatParseError};
pub use ortho_config::{OrthoConfig, OrthoError};

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "GOPHERDOC")]
pub struct Config {
    /// Address the listener binds to.
    #[serde(default = "default_listen_address")]
    #[ortho_config(default = default_listen_address())]
    pub listen: ListenAddress,
    /// Hostname advertised in menu entries.
    #[serde(default = "default_advertised_host")]
    #[ortho_config(default = default_advertised_host())]
    pub host: String,
    /// Port advertised in menu entries; the bound port when unset.
    #[serde(default)]
    pub port: Option<u16>,
    /// Root directory of the documentation corpus.
    #[serde(default = "default_corpus_root")]
    #[ortho_config(default = default_corpus_root())]
    pub corpus_root: Utf8PathBuf,
    /// `tracing` filter expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen_address(),
            host: default_advertised_host(),
            port: None,
            corpus_root: default_corpus_root(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Address the listener binds to.
    #[must_use]
    pub fn listen(&self) -> &ListenAddress {
        &self.listen
    }

    /// Hostname advertised in menu entries.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Advertised port override, if configured.
    #[must_use]
    pub fn advertised_port(&self) -> Option<u16> {
        self.port
    }

    /// Root directory of the documentation corpus.
    #[must_use]
    pub fn corpus_root(&self) -> &Utf8Path {
        self.corpus_root.as_path()
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
