//! Shared utilities for lifecycle integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::get, Router};
use taskd::config::ServerConfig;
use tokio::net::TcpStream;

/// Test configuration bound to a fixed local port.
pub fn test_config(addr: SocketAddr, grace_secs: u64) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = addr.to_string();
    config.listener.max_connections = 16;
    config.timeouts.shutdown_grace_secs = grace_secs;
    config
}

/// A router whose single endpoint takes `delay` to respond.
pub fn slow_router(delay: Duration) -> Router {
    Router::new().route(
        "/slow",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "done"
        }),
    )
}

/// Wait until the server accepts TCP connections.
#[allow(dead_code)]
pub async fn wait_until_ready(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {addr} never became ready");
}

/// Non-pooling client so connections close as soon as a request finishes.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
