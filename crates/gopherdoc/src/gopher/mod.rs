//! Gopher protocol model and selector routing.
//!
//! This module is independent of sockets: the router writes into any
//! [`std::io::Write`] sink and the transport layer adds line framing.

mod errors;
mod menu;
mod path;
mod router;

pub use self::errors::RouteError;
pub use self::menu::{DirEntity, ItemType, Menu, MenuLineError};
pub use self::router::{DOC_SELECTOR_PREFIX, Response, Selector, SelectorRouter, ServerIdentity};
