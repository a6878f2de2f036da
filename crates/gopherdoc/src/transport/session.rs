//! One request/response exchange per connection.
//!
//! The session reads a single selector line under the read deadline armed by
//! the listener, resolves it completely, and only then writes the framed
//! response. A lookup or render failure sends no bytes at all; a panic while
//! resolving still leaves the bare terminator on the wire.

use std::io::{self, BufWriter, Read};

use tracing::{debug, error};

use crate::gopher::{RouteError, SelectorRouter};

use super::dot::DotWriter;
use super::errors::SessionError;
use super::{ConnectionHandler, ConnectionStream};

const SESSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::session");

/// Longest accepted selector, excluding its line terminator.
pub(crate) const MAX_SELECTOR_BYTES: usize = 4 * 1024;

const READ_CHUNK_BYTES: usize = 512;

/// Serves gopher selectors from a [`SelectorRouter`].
#[derive(Debug, Clone)]
pub(crate) struct GopherConnectionHandler {
    router: SelectorRouter,
}

impl GopherConnectionHandler {
    pub(crate) fn new(router: SelectorRouter) -> Self {
        Self { router }
    }

    fn serve(&self, stream: &mut ConnectionStream) -> Result<(), SessionError> {
        let selector = read_selector_line(stream)?;
        stream.clear_deadline()?;
        debug!(
            target: SESSION_TARGET,
            peer = ?stream.peer(),
            selector = %selector,
            "selector received"
        );

        // Armed before dispatch: unwinding out of `resolve` drops the writer,
        // which terminates the response.
        let mut writer = DotWriter::new(BufWriter::new(&mut *stream));
        let response = match self.router.resolve(&selector) {
            Ok(response) => response,
            Err(error) => {
                writer.abandon();
                log_route_error(&error, &selector);
                return Ok(());
            }
        };

        response
            .write_to(&mut writer)
            .and_then(|()| writer.finish())
            .map_err(SessionError::Write)
    }
}

impl ConnectionHandler for GopherConnectionHandler {
    fn handle(&self, mut stream: ConnectionStream) {
        if let Err(error) = self.serve(&mut stream) {
            debug!(
                target: SESSION_TARGET,
                peer = ?stream.peer(),
                error = %error,
                "connection ended without a response"
            );
        }
    }
}

fn log_route_error(error: &RouteError, selector: &str) {
    error!(
        target: SESSION_TARGET,
        selector = %selector,
        error = %error,
        "failed to answer selector"
    );
}

/// Reads one selector line and strips its terminator.
///
/// A final line without a terminator is accepted when the peer closes its
/// side. Invalid UTF-8 is replaced rather than rejected.
pub(crate) fn read_selector_line<R: Read + ?Sized>(
    reader: &mut R,
) -> Result<String, SessionError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; READ_CHUNK_BYTES];
    loop {
        let bytes_read = read_chunk_with_retry(reader, &mut chunk)?;
        if bytes_read == 0 {
            if buffer.is_empty() {
                return Err(SessionError::Disconnected);
            }
            break;
        }

        let received = &chunk[..bytes_read];
        if let Some(pos) = received.iter().position(|byte| *byte == b'\n') {
            buffer.extend_from_slice(&received[..pos]);
            if buffer.last() == Some(&b'\r') {
                buffer.pop();
            }
            break;
        }
        buffer.extend_from_slice(received);
        // Leave room for a carriage return whose line feed is still in flight.
        if buffer.len() > MAX_SELECTOR_BYTES + 1 {
            return Err(SessionError::SelectorTooLong {
                limit: MAX_SELECTOR_BYTES,
            });
        }
    }
    enforce_selector_limit(buffer.len())?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn read_chunk_with_retry<R: Read + ?Sized>(
    reader: &mut R,
    chunk: &mut [u8],
) -> io::Result<usize> {
    loop {
        match reader.read(chunk) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}

fn enforce_selector_limit(size: usize) -> Result<(), SessionError> {
    if size > MAX_SELECTOR_BYTES {
        return Err(SessionError::SelectorTooLong {
            limit: MAX_SELECTOR_BYTES,
        });
    }
    Ok(())
}
