//! Listener configuration and constants.
//!
//! The deployment smoke-test listens on a fixed address. `ListenConfig` carries
//! that address so the listener can also be bound to an ephemeral port in tests;
//! the binary always uses `ListenConfig::default()`.

use const_format::formatcp;
use std::net::{IpAddr, SocketAddr};

// =============================================================================
// Listener
// =============================================================================

/// Bind on all interfaces, dual-stack where IPv6 is available
pub const DEFAULT_HOST: &str = "::";

/// All IPv4 interfaces, used when the host has no IPv6 support
pub const FALLBACK_HOST: &str = "0.0.0.0";

/// Fixed listen port
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// Responses and Process Output
// =============================================================================

/// Body served on `GET /`
pub const DEPLOY_MESSAGE: &str = "App deployed successfully on ECS Fargate using HCP Terraform!";

/// Methods answered on `/`, as sent in `Allow` and the `OPTIONS` body
pub const ALLOWED_METHODS: &str = "GET,HEAD";

/// Prefix of the stdout line written once the listener is bound
pub const STARTUP_MESSAGE_PREFIX: &str = "Server running on port";

/// Startup line for the default port
///
/// Written verbatim when the listener holds `DEFAULT_PORT`.
pub const STARTUP_MESSAGE: &str = formatcp!("{} {}", STARTUP_MESSAGE_PREFIX, DEFAULT_PORT);

// =============================================================================
// Logging
// =============================================================================

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "deploy_smoke=info,tower_http=debug";

/// Address the listener binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ListenConfig {
    /// Resolve host and port into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddress {
                addr: format!("{}:{}", self.host, self.port),
                reason: e.to_string(),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// IPv4 counterpart of an unspecified IPv6 host.
    ///
    /// Returns `None` for any other host.
    pub fn ipv4_fallback(&self) -> Option<ListenConfig> {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) if ip.is_unspecified() => Some(ListenConfig {
                host: FALLBACK_HOST.to_string(),
                port: self.port,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid listen address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },
}
