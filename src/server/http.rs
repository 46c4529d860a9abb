//! HTTP listener
//!
//! Serves the gated router with connect info enabled so the gate can fall
//! back to the transport peer address.

use crate::config::{DEFAULT_HTTP_PORT, ServerConfig};
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Address to bind to (e.g., "127.0.0.1:5000")
    pub bind: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_HTTP_PORT)),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with the specified bind address
    pub fn new(bind: SocketAddr) -> Self {
        Self { bind }
    }

    /// Create config from a host address and port.
    ///
    /// IPv6 hosts may be given bare (`::1`) or bracketed (`[::1]`).
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, std::net::AddrParseError> {
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let ip: IpAddr = host.parse()?;
        Ok(Self::new(SocketAddr::new(ip, port)))
    }

    /// Create config from the `[server]` section
    pub fn from_server_config(config: &ServerConfig) -> Result<Self, std::net::AddrParseError> {
        Self::from_host_port(&config.host, config.port)
    }
}

/// Handle to a server started with [`run_http`]
pub struct RunningServer {
    /// Address actually bound (differs from the request when port 0 was used)
    pub local_addr: SocketAddr,
    ct: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Token that stops the server when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.ct.clone()
    }

    /// Stop accepting connections and wait for in-flight requests to finish
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.ct.cancel();
        self.task.await??;
        Ok(())
    }
}

/// Start serving `router` in the background.
///
/// Binding errors are reported immediately; serving errors surface from
/// [`RunningServer::shutdown`].
pub async fn run_http(router: Router, config: HttpConfig) -> anyhow::Result<RunningServer> {
    let listener = TcpListener::bind(config.bind).await?;
    let local_addr = listener.local_addr()?;

    info!("HTTP server listening on http://{}", local_addr);

    let ct = CancellationToken::new();
    let shutdown = ct.clone().cancelled_owned();

    let task = tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
    });

    Ok(RunningServer {
        local_addr,
        ct,
        task,
    })
}

/// Run the HTTP server and wait for shutdown
///
/// This is a convenience function that starts the server and waits
/// for a shutdown signal (Ctrl+C).
pub async fn run_http_blocking(router: Router, config: HttpConfig) -> anyhow::Result<()> {
    let server = run_http(router, config).await?;
    let ct = server.cancellation_token();

    info!("Press Ctrl+C to stop the server");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        _ = ct.cancelled() => {
            info!("Server cancelled");
        }
    }

    server.shutdown().await?;

    info!("HTTP server stopped");
    Ok(())
}
