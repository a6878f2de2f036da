//! TCP transport for the gopher server.
//!
//! The listener accepts connections on a background thread and hands each
//! one to a [`ConnectionHandler`] on its own thread, inside a panic boundary.

mod boundary;
mod dot;
mod errors;
mod handler;
mod listener;
mod session;
#[cfg(test)]
mod test_utils;

pub use self::errors::ListenerError;
pub(crate) use self::handler::{ConnectionHandler, ConnectionStream};
pub(crate) use self::listener::{ListenerHandle, SocketListener};
pub(crate) use self::session::GopherConnectionHandler;
#[cfg(test)]
pub(crate) use self::test_utils::{CountingHandler, PanickingHandler};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
