use std::time::Duration;

use camino::Utf8PathBuf;

use crate::listen::{GOPHER_PORT, ListenAddress};
use crate::logging::LogFormat;

/// Maximum time a client may take to send its selector line.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default advertised hostname written into menu entries.
pub const DEFAULT_ADVERTISED_HOST: &str = "localhost";

/// Default corpus root, relative to the working directory.
pub const DEFAULT_CORPUS_ROOT: &str = ".";

/// Default log filter expression used by the server.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the server.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the server.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default listen address: every interface on the Gopher port.
pub fn default_listen_address() -> ListenAddress {
    ListenAddress::any(GOPHER_PORT)
}

/// Default advertised hostname as an owned value for serde.
pub fn default_advertised_host() -> String {
    DEFAULT_ADVERTISED_HOST.to_owned()
}

/// Default corpus root as an owned value for serde.
pub fn default_corpus_root() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_CORPUS_ROOT)
}
