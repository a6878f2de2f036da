use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known port for the Gopher protocol.
pub const GOPHER_PORT: u16 = 70;

const WILDCARD_HOST: &str = "0.0.0.0";

/// Service names accepted in place of a numeric port.
const NAMED_PORTS: &[(&str, u16)] = &[("gopher", GOPHER_PORT), ("http", 80)];

/// Address the server binds its listener to.
///
/// Parsed from `host:port` text. The host may be omitted (`:70`) to bind every
/// interface, IPv6 hosts are written in brackets (`[::1]:70`), and the port may
/// be a service name such as `gopher`. A port of `0` asks the operating system
/// to pick one.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct ListenAddress {
    host: String,
    port: u16,
}

impl ListenAddress {
    /// Builds a listen address from its parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Address binding every IPv4 interface on the given port.
    #[must_use]
    pub fn any(port: u16) -> Self {
        Self::new(WILDCARD_HOST, port)
    }

    /// Host name or IP literal to bind.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Port to bind.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(formatter, "[{}]:{}", self.host, self.port)
        } else {
            write!(formatter, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ListenAddress {
    type Err = ListenAddressError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (host, port) = trimmed
            .rsplit_once(':')
            .ok_or_else(|| ListenAddressError::MissingPort(input.to_owned()))?;
        let host = host
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(host);
        if host.contains(':') && !trimmed.starts_with('[') {
            return Err(ListenAddressError::UnbracketedIpv6(input.to_owned()));
        }
        let port = parse_port(port)?;
        let host = if host.is_empty() { WILDCARD_HOST } else { host };
        Ok(Self::new(host, port))
    }
}

impl TryFrom<String> for ListenAddress {
    type Error = ListenAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ListenAddress> for String {
    fn from(value: ListenAddress) -> Self {
        value.to_string()
    }
}

fn parse_port(text: &str) -> Result<u16, ListenAddressError> {
    if text.is_empty() {
        return Err(ListenAddressError::MissingPort(text.to_owned()));
    }
    if text.bytes().all(|byte| byte.is_ascii_digit()) {
        return text
            .parse()
            .map_err(|_| ListenAddressError::InvalidPort(text.to_owned()));
    }
    NAMED_PORTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(text))
        .map(|(_, port)| *port)
        .ok_or_else(|| ListenAddressError::UnknownService(text.to_owned()))
}

/// Errors encountered while parsing a [`ListenAddress`] from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListenAddressError {
    /// The address had no `:port` component.
    #[error("missing port in listen address '{0}'")]
    MissingPort(String),
    /// The numeric port was out of range.
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    /// The port was neither numeric nor a known service name.
    #[error("unknown service name '{0}'")]
    UnknownService(String),
    /// An IPv6 host was written without brackets.
    #[error("IPv6 host in '{0}' must be enclosed in brackets")]
    UnbracketedIpv6(String),
}
