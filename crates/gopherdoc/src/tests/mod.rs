//! Test suites for the gopherdoc server.

mod behaviour;
mod support;
