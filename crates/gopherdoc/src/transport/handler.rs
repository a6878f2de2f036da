//! Connection handling abstractions for the listener.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

/// An accepted TCP connection with an optional absolute read deadline.
///
/// The deadline is fixed when it is armed and is not extended by successful
/// reads: every read waits at most for the time still remaining, and a read
/// attempted after the deadline fails with [`io::ErrorKind::TimedOut`].
#[derive(Debug)]
pub(crate) struct ConnectionStream {
    stream: TcpStream,
    peer: Option<SocketAddr>,
    deadline: Option<Instant>,
}

impl ConnectionStream {
    pub(crate) fn new(stream: TcpStream) -> Self {
        let peer = stream.peer_addr().ok();
        Self {
            stream,
            peer,
            deadline: None,
        }
    }

    /// Remote address, when the socket could report one.
    pub(crate) fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Starts the read deadline `timeout` from now.
    pub(crate) fn arm_deadline(&mut self, timeout: Duration) {
        self.deadline = Some(Instant::now() + timeout);
    }

    /// Removes the read deadline.
    pub(crate) fn clear_deadline(&mut self) -> io::Result<()> {
        self.deadline = None;
        self.stream.set_read_timeout(None)
    }

    fn remaining(&self) -> io::Result<Option<Duration>> {
        let Some(deadline) = self.deadline else {
            return Ok(None);
        };
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "read deadline elapsed",
            ));
        }
        Ok(Some(remaining))
    }
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining()?;
        if remaining.is_some() {
            self.stream.set_read_timeout(remaining)?;
        }
        self.stream.read(buf).map_err(|error| {
            // Unix reports an expired socket timeout as WouldBlock.
            if error.kind() == io::ErrorKind::WouldBlock && remaining.is_some() {
                io::Error::new(io::ErrorKind::TimedOut, error)
            } else {
                error
            }
        })
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

/// Handles accepted socket connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection. The stream is closed when it is dropped.
    fn handle(&self, stream: ConnectionStream);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    fn connected_pair() -> (ConnectionStream, TcpStream) {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
        let addr = listener.local_addr().expect("listener address");
        let client = TcpStream::connect(addr).expect("connect client");
        let (server, _) = listener.accept().expect("accept connection");
        (ConnectionStream::new(server), client)
    }

    #[test]
    fn deadline_is_absolute_across_reads() {
        let (mut server, mut client) = connected_pair();
        server.arm_deadline(Duration::from_millis(300));

        let writer = thread::spawn(move || {
            for _ in 0..10 {
                if client.write_all(b"a").is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(100));
            }
            client
        });

        let started = Instant::now();
        let mut buf = [0_u8; 8];
        let error = loop {
            match server.read(&mut buf) {
                Ok(0) => panic!("client closed early"),
                Ok(_) => continue,
                Err(error) => break error,
            }
        };

        assert_eq!(error.kind(), io::ErrorKind::TimedOut);
        assert!(started.elapsed() < Duration::from_millis(900));
        drop(writer.join().expect("join writer"));
    }

    #[test]
    fn reports_peer_address() {
        let (server, client) = connected_pair();
        assert_eq!(
            server.peer(),
            Some(client.local_addr().expect("client address"))
        );
    }

    #[test]
    fn cleared_deadline_allows_blocking_reads() {
        let (mut server, mut client) = connected_pair();
        server.arm_deadline(Duration::from_millis(50));
        server.clear_deadline().expect("clear deadline");
        thread::sleep(Duration::from_millis(80));

        client.write_all(b"x").expect("write byte");
        let mut buf = [0_u8; 1];
        assert_eq!(server.read(&mut buf).expect("read byte"), 1);
    }
}
