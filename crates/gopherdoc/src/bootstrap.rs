//! Server bootstrap orchestration.
//!
//! Bootstrap loads configuration, installs telemetry, indexes the corpus and
//! binds the listening socket. Every step is fatal on failure: a server that
//! cannot bind or read its corpus must not start.

use std::net::SocketAddr;
use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

use gopherdoc_config::Config;
use gopherdoc_corpus::{CorpusError, FsCorpus, TextRenderer};
use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use crate::gopher::{SelectorRouter, ServerIdentity};
use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{GopherConnectionHandler, ListenerError, ListenerHandle, SocketListener};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the server configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that returns a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already resolved configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The documentation corpus could not be indexed.
    #[error("failed to open documentation corpus: {source}")]
    Corpus {
        /// Underlying corpus error.
        #[source]
        source: CorpusError,
    },
    /// The listening socket could not be bound.
    #[error("failed to bind listener: {source}")]
    Listener {
        /// Underlying listener error.
        #[source]
        source: ListenerError,
    },
}

/// A bootstrapped server that has bound its socket but not started accepting.
pub struct Server {
    config: Config,
    identity: ServerIdentity,
    listener: SocketListener,
    router: SelectorRouter,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Server")
            .field("identity", &self.identity)
            .field("local_addr", &self.listener.local_addr())
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Host and port advertised in menu entries.
    #[must_use]
    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    #[cfg(test)]
    pub(crate) fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.listener = self.listener.with_read_timeout(read_timeout);
        self
    }

    /// Starts the accept loop on a background thread.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when the socket cannot be switched to
    /// non-blocking mode or the accept thread cannot be spawned.
    pub fn start(self) -> Result<RunningServer, ListenerError> {
        let address = self.listener.local_addr();
        let handler = Arc::new(GopherConnectionHandler::new(self.router));
        let handle = self.listener.start(handler)?;
        self.reporter.listener_ready(address);
        Ok(RunningServer {
            address,
            handle,
            reporter: self.reporter,
        })
    }
}

/// A server whose accept loop is running.
///
/// Dropping it stops the accept loop without waiting for it to exit.
pub struct RunningServer {
    address: SocketAddr,
    handle: ListenerHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl RunningServer {
    /// Address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.address
    }

    /// Stops accepting connections and waits for the accept loop to exit.
    ///
    /// Connections already accepted finish on their own threads.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadPanic`] if the accept loop panicked.
    pub fn stop(self) -> Result<(), ListenerError> {
        self.handle.shutdown();
        self.handle.join()?;
        self.reporter.listener_stopped(self.address);
        Ok(())
    }
}

/// Bootstraps the server using the supplied collaborators.
///
/// # Errors
///
/// Returns [`BootstrapError`] for the first step that fails. The reporter is
/// told about the failure before it is returned.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Server, BootstrapError> {
    reporter.bootstrap_starting();
    match bootstrap_steps(loader, &reporter) {
        Ok(server) => {
            reporter.bootstrap_succeeded(&server.config, &server.identity);
            Ok(server)
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn bootstrap_steps(
    loader: &dyn ConfigLoader,
    reporter: &Arc<dyn HealthReporter>,
) -> Result<Server, BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    let corpus = FsCorpus::open(config.corpus_root())
        .map_err(|source| BootstrapError::Corpus { source })?;
    let listener = SocketListener::bind(config.listen())
        .map_err(|source| BootstrapError::Listener { source })?;

    let port = config
        .advertised_port()
        .unwrap_or_else(|| listener.local_addr().port());
    let identity = ServerIdentity::new(config.host(), port);
    let router = SelectorRouter::new(
        Arc::new(corpus),
        Arc::new(TextRenderer::new()),
        identity.clone(),
    );

    Ok(Server {
        config,
        identity,
        listener,
        router,
        telemetry,
        reporter: Arc::clone(reporter),
    })
}
