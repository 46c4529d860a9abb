//! HTTP server tests
//!
//! Configuration of the listener, plus a live round trip that exercises the
//! transport peer fallback (no forwarding header).

use office_gate::access_control::{AccessGate, AccessPolicy, AllowList};
use office_gate::config::ServerConfig;
use office_gate::server::{HttpConfig, build_router, run_http};
use office_gate::store::MemoryPolicyStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[test]
fn test_http_config_default() {
    let config = HttpConfig::default();
    assert_eq!(config.bind, SocketAddr::from(([127, 0, 0, 1], 5000)));
}

#[test]
fn test_http_config_from_host_port() {
    let config = HttpConfig::from_host_port("0.0.0.0", 9000).unwrap();

    assert_eq!(config.bind.port(), 9000);
    assert_eq!(config.bind.ip().to_string(), "0.0.0.0");
}

#[test]
fn test_http_config_from_host_port_ipv6() {
    let config = HttpConfig::from_host_port("[::1]", 8080).unwrap();

    assert_eq!(config.bind.port(), 8080);
    assert!(config.bind.ip().is_ipv6());
}

#[test]
fn test_http_config_from_host_port_bare_ipv6() {
    let config = HttpConfig::from_host_port("::", 8080).unwrap();
    assert_eq!(config.bind, "[::]:8080".parse().unwrap());

    let config = HttpConfig::from_host_port("::1", 5000).unwrap();
    assert_eq!(config.bind, "[::1]:5000".parse().unwrap());
}

#[test]
fn test_http_config_from_host_port_invalid() {
    assert!(HttpConfig::from_host_port("not-an-ip", 8080).is_err());
}

#[test]
fn test_http_config_from_server_config() {
    let config = HttpConfig::from_server_config(&ServerConfig::default()).unwrap();
    assert_eq!(config.bind, HttpConfig::default().bind);
}

/// Send a bare HTTP/1.1 GET and return the raw response text
async fn http_get(addr: SocketAddr, path: &str, forwarded_for: Option<&str>) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let mut request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(value) = forwarded_for {
        request.push_str(&format!("X-Forwarded-For: {value}\r\n"));
    }
    request.push_str("\r\n");

    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_live_server_loopback_peer_bypasses() {
    // Empty store: only the loopback bypass can let this through
    let gate = Arc::new(AccessGate::new(Arc::new(MemoryPolicyStore::empty())));
    let server = run_http(
        build_router(gate),
        HttpConfig::new(SocketAddr::from(([127, 0, 0, 1], 0))),
    )
    .await
    .unwrap();

    let response = http_get(server.local_addr, "/api/network-check", None).await;

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains(r#""clientIP":"127.0.0.1""#), "{response}");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_live_server_denies_forwarded_address() {
    let policy = AccessPolicy::new(AllowList::from_entries(["10.0.0.5"]), AllowList::default());
    let gate = Arc::new(AccessGate::new(Arc::new(MemoryPolicyStore::new(policy))));
    let server = run_http(
        build_router(gate),
        HttpConfig::new(SocketAddr::from(([127, 0, 0, 1], 0))),
    )
    .await
    .unwrap();

    let denied = http_get(server.local_addr, "/api/network-check", Some("10.0.0.6")).await;
    assert!(denied.starts_with("HTTP/1.1 403"), "{denied}");

    let allowed = http_get(server.local_addr, "/api/network-check", Some("10.0.0.5")).await;
    assert!(allowed.starts_with("HTTP/1.1 200"), "{allowed}");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_via_cancellation_token() {
    let gate = Arc::new(AccessGate::new(Arc::new(MemoryPolicyStore::empty())));
    let server = run_http(
        build_router(gate),
        HttpConfig::new(SocketAddr::from(([127, 0, 0, 1], 0))),
    )
    .await
    .unwrap();

    server.cancellation_token().cancel();
    server.shutdown().await.unwrap();
}
