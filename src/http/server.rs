//! HTTP server startup logic.
//!
//! Binding and serving are split so the startup line is written only after the
//! port is actually held, and so callers can inspect the bound address before
//! the server starts accepting connections.

use std::borrow::Cow;
use std::io::{self, Write};
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{
    ConfigError, ListenConfig, DEFAULT_PORT, STARTUP_MESSAGE, STARTUP_MESSAGE_PREFIX,
};
use crate::routes::create_router;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write startup message: {0}")]
    Announce(#[source] io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] io::Error),
}

/// A bound TCP listener that has not started serving yet.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to the configured address.
    ///
    /// An unspecified IPv6 host that cannot be bound for lack of IPv6 support
    /// is retried on all IPv4 interfaces. Fails if the port is already in use
    /// or binding is not permitted.
    pub async fn bind(config: &ListenConfig) -> Result<Self, ServerError> {
        match Self::bind_addr(config.socket_addr()?).await {
            Err(ServerError::Bind { addr, source }) if !is_fatal_bind_error(&source) => {
                let Some(fallback) = config.ipv4_fallback() else {
                    return Err(ServerError::Bind { addr, source });
                };
                tracing::warn!(%addr, error = %source, "IPv6 unavailable, binding IPv4 only");
                Self::bind_addr(fallback.socket_addr()?).await
            }
            result => result,
        }
    }

    async fn bind_addr(addr: SocketAddr) -> Result<Self, ServerError> {
        let inner = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = inner
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        tracing::debug!(%local_addr, "Listener bound");

        Ok(Self { inner, local_addr })
    }

    /// The address actually bound (resolves an ephemeral port request).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Write the startup line for the bound port.
    pub fn announce<W: Write>(&self, out: &mut W) -> Result<(), ServerError> {
        writeln!(out, "{}", startup_line(self.local_addr.port()))
            .and_then(|()| out.flush())
            .map_err(ServerError::Announce)
    }

    /// Serve the router until the process is terminated.
    pub async fn serve(self, app: Router) -> Result<(), ServerError> {
        tracing::info!(addr = %self.local_addr, "Serving HTTP");
        axum::serve(self.inner, app)
            .await
            .map_err(ServerError::Serve)
    }
}

/// Port conflicts and privilege errors are never retried on another family.
fn is_fatal_bind_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::AddrInUse | io::ErrorKind::PermissionDenied
    )
}

fn startup_line(port: u16) -> Cow<'static, str> {
    if port == DEFAULT_PORT {
        Cow::Borrowed(STARTUP_MESSAGE)
    } else {
        Cow::Owned(format!("{} {}", STARTUP_MESSAGE_PREFIX, port))
    }
}

/// Bind, announce on stdout, and serve the deploy router.
///
/// This function blocks until the server stops.
pub async fn start_server(config: &ListenConfig) -> Result<(), ServerError> {
    let listener = Listener::bind(config).await?;
    listener.announce(&mut io::stdout().lock())?;
    listener.serve(create_router()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral() -> ListenConfig {
        ListenConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    #[tokio::test]
    async fn test_bind_resolves_ephemeral_port() {
        let listener = Listener::bind(&ephemeral()).await.unwrap();
        assert_ne!(listener.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn test_second_bind_on_same_port_fails() {
        let first = Listener::bind(&ephemeral()).await.unwrap();
        let taken = ListenConfig {
            host: "127.0.0.1".to_string(),
            port: first.local_addr().port(),
        };

        let err = Listener::bind(&taken).await.unwrap_err();
        match err {
            ServerError::Bind { addr, source } => {
                assert_eq!(addr.port(), first.local_addr().port());
                assert_eq!(source.kind(), io::ErrorKind::AddrInUse);
            }
            other => panic!("expected bind error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_announce_writes_single_line_with_bound_port() {
        let listener = Listener::bind(&ephemeral()).await.unwrap();
        let mut out = Vec::new();
        listener.announce(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = format!("Server running on port {}\n", listener.local_addr().port());
        assert_eq!(text, expected);
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_startup_line_for_default_port() {
        assert_eq!(startup_line(3000), "Server running on port 3000");
        assert!(matches!(startup_line(3000), Cow::Borrowed(_)));
        assert_eq!(startup_line(8080), "Server running on port 8080");
    }

    #[tokio::test]
    async fn test_unspecified_ipv6_host_binds_with_or_without_ipv6() {
        let config = ListenConfig {
            host: "::".to_string(),
            port: 0,
        };
        let listener = Listener::bind(&config).await.unwrap();
        assert!(listener.local_addr().ip().is_unspecified());
        assert_ne!(listener.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn test_port_conflict_is_not_retried_on_ipv4() {
        let any = ListenConfig {
            host: "::".to_string(),
            port: 0,
        };
        let first = Listener::bind(&any).await.unwrap();
        let taken = ListenConfig {
            host: "::".to_string(),
            port: first.local_addr().port(),
        };

        let err = Listener::bind(&taken).await.unwrap_err();
        match err {
            ServerError::Bind { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::AddrInUse);
            }
            other => panic!("expected bind error, got {other:?}"),
        }
    }

    #[test]
    fn test_only_conflicts_and_privilege_errors_are_fatal() {
        assert!(is_fatal_bind_error(&io::Error::from(io::ErrorKind::AddrInUse)));
        assert!(is_fatal_bind_error(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
        assert!(!is_fatal_bind_error(&io::Error::from(
            io::ErrorKind::AddrNotAvailable
        )));
    }

    #[tokio::test]
    async fn test_invalid_host_fails_before_bind() {
        let config = ListenConfig {
            host: "bad host".to_string(),
            port: 0,
        };
        let err = Listener::bind(&config).await.unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
