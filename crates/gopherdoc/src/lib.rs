//! A Gopher server that publishes package documentation.
//!
//! Clients send one selector per connection. A selector prefixed with `doc:`
//! returns the rendered documentation of a package; any other selector
//! returns a menu with a documentation entry (when the package has any) and
//! one entry per immediate sub-package. Responses use the gopher text
//! convention: CRLF line endings, dot-stuffed lines and a lone `.` terminator.
//!
//! The crate is organised in layers:
//!
//! - [`gopher`] holds the protocol model and the [`gopher::SelectorRouter`],
//!   which works against any [`std::io::Write`] sink;
//! - the transport layer owns the TCP listener, the per-connection session
//!   with its read deadline and panic boundary, and response framing;
//! - [`bootstrap_with`] and [`run_server`] wire configuration, telemetry and
//!   the filesystem corpus together.

mod bootstrap;
pub mod gopher;
mod health;
mod process;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, RunningServer, Server, StaticConfigLoader, SystemConfigLoader,
    bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{
    LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_server,
    run_server_with,
};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
