//! BDD test world: owns the corpus, loader, reporter and running server for step functions.

use std::cell::RefCell;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::bootstrap::{BootstrapError, ConfigLoader, RunningServer, bootstrap_with};

use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::corpus::SampleCorpus;
use super::reporter::RecordingHealthReporter;

const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// What a client observed on one connection.
#[derive(Debug, Clone, Default)]
pub struct Exchange {
    pub bytes: Vec<u8>,
    pub elapsed: Duration,
}

impl Exchange {
    /// Response decoded as UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    corpus: SampleCorpus,
    loader: Box<dyn ConfigLoader>,
    pub reporter: Arc<RecordingHealthReporter>,
    read_timeout: Option<Duration>,
    server: Option<RunningServer>,
    bootstrap_error: Option<BootstrapError>,
    reserved: Option<TcpListener>,
    exchanges: Vec<Exchange>,
}

impl TestWorld {
    /// Builds a world serving the sample corpus on an ephemeral port.
    #[must_use]
    pub fn new() -> Self {
        let corpus = SampleCorpus::new();
        let loader = Box::new(TestConfigLoader::new(corpus.root()));
        Self {
            corpus,
            loader,
            reporter: Arc::new(RecordingHealthReporter::default()),
            read_timeout: None,
            server: None,
            bootstrap_error: None,
            reserved: None,
            exchanges: Vec::new(),
        }
    }

    /// Installs a loader that always fails.
    pub fn use_failing_loader(&mut self) {
        self.loader = Box::new(FailingConfigLoader);
    }

    /// Points the server at a corpus root that does not exist.
    pub fn use_missing_corpus(&mut self) {
        let missing = self.corpus.root().join("does-not-exist");
        self.loader = Box::new(TestConfigLoader::new(missing));
    }

    /// Occupies a loopback port and configures the server to bind it.
    pub fn use_reserved_port(&mut self) {
        let reserved = TcpListener::bind(("127.0.0.1", 0)).expect("reserve port");
        let port = reserved.local_addr().expect("reserved address").port();
        self.loader = Box::new(TestConfigLoader::new(self.corpus.root()).with_port(port));
        self.reserved = Some(reserved);
    }

    /// Advertises a fixed port in menu entries.
    pub fn advertise_port(&mut self, port: u16) {
        self.loader = Box::new(TestConfigLoader::new(self.corpus.root()).advertising_port(port));
    }

    /// Shortens the selector read deadline.
    pub fn shorten_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = Some(timeout);
    }

    /// Bootstraps and starts the server once.
    pub fn start(&mut self) {
        if self.server.is_some() || self.bootstrap_error.is_some() {
            return;
        }
        let reporter = Arc::clone(&self.reporter);
        let server = match bootstrap_with(&*self.loader, reporter) {
            Ok(server) => server,
            Err(error) => {
                self.bootstrap_error = Some(error);
                return;
            }
        };
        let server = match self.read_timeout {
            Some(timeout) => server.with_read_timeout(timeout),
            None => server,
        };
        self.server = Some(server.start().expect("start listener"));
    }

    /// Stops the running server and waits for the accept loop.
    pub fn stop(&mut self) {
        if let Some(server) = self.server.take() {
            server.stop().expect("stop listener");
        }
    }

    #[must_use]
    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.server.is_some()
    }

    #[must_use]
    pub fn address(&self) -> SocketAddr {
        self.server
            .as_ref()
            .map(RunningServer::local_addr)
            .expect("server should be running")
    }

    /// Sends `payload` and reads until the server closes.
    pub fn send(&mut self, payload: &[u8]) {
        let mut client = self.connect();
        let started = Instant::now();
        client.write_all(payload).expect("write selector");
        let exchange = read_until_closed(&mut client, started);
        self.exchanges.push(exchange);
    }

    /// Connects and sends nothing, keeping the write side open.
    pub fn idle(&mut self) {
        let mut client = self.connect();
        let started = Instant::now();
        let exchange = read_until_closed(&mut client, started);
        self.exchanges.push(exchange);
    }

    /// Sends a selector without a line terminator and closes the write side.
    pub fn send_unterminated(&mut self, selector: &str) {
        let mut client = self.connect();
        let started = Instant::now();
        client.write_all(selector.as_bytes()).expect("write selector");
        client.shutdown(Shutdown::Write).expect("half-close client");
        let exchange = read_until_closed(&mut client, started);
        self.exchanges.push(exchange);
    }

    #[must_use]
    pub fn last_exchange(&self) -> &Exchange {
        self.exchanges.last().expect("no exchange recorded")
    }

    fn connect(&self) -> TcpStream {
        let client = TcpStream::connect(self.address()).expect("connect client");
        client
            .set_read_timeout(Some(CLIENT_TIMEOUT))
            .expect("client read timeout");
        client
    }
}

fn read_until_closed(client: &mut TcpStream, started: Instant) -> Exchange {
    let mut bytes = Vec::new();
    // Closing with unread input resets the connection instead of a clean FIN.
    if let Err(error) = client.read_to_end(&mut bytes) {
        assert_eq!(
            error.kind(),
            ErrorKind::ConnectionReset,
            "unexpected read error: {error}"
        );
    }
    Exchange {
        bytes,
        elapsed: started.elapsed(),
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestWorld {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            let _ = server.stop();
        }
        self.reserved = None;
    }
}

/// Default test world fixture.
#[must_use]
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
