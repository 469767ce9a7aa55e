//! Integration tests for the server lifecycle manager.
//!
//! Each test uses its own fixed local port so the suite can run in
//! parallel within one binary.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::Router;
use taskd::http::build_router;
use taskd::lifecycle::{Lifecycle, RunError, Shutdown};
use taskd::net::ListenerError;

mod common;

#[tokio::test]
async fn bind_conflict_fails_without_shutdown_sequence() {
    let addr: SocketAddr = "127.0.0.1:38101".parse().unwrap();
    let _occupier = tokio::net::TcpListener::bind(addr).await.unwrap();

    let shutdown = Shutdown::new();
    let outcome = Lifecycle::new(common::test_config(addr, 5), shutdown.token())
        .run(Router::new())
        .await;

    assert!(matches!(
        outcome,
        Err(RunError::Listener(ListenerError::Bind { .. }))
    ));
    // The shutdown path was never involved; the caller's token is untouched.
    assert!(!shutdown.is_triggered());
}

#[tokio::test]
async fn pre_cancelled_token_yields_exactly_one_clean_outcome() {
    let addr: SocketAddr = "127.0.0.1:38102".parse().unwrap();
    let shutdown = Shutdown::new();
    shutdown.trigger();

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        Lifecycle::new(common::test_config(addr, 2), shutdown.token()).run(Router::new()),
    )
    .await
    .expect("run did not terminate");

    assert!(outcome.is_ok());
}

#[tokio::test]
async fn cancellation_before_any_connection_is_clean_and_fast() {
    let addr: SocketAddr = "127.0.0.1:38103".parse().unwrap();
    let shutdown = Shutdown::new();
    let server = tokio::spawn(
        Lifecycle::new(common::test_config(addr, 10), shutdown.token()).run(Router::new()),
    );

    tokio::time::sleep(Duration::from_millis(300)).await;

    let started = Instant::now();
    shutdown.trigger();
    let outcome = server.await.unwrap();

    assert!(outcome.is_ok());
    // Nothing was in flight, so shutdown must finish well within the grace period.
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn in_flight_request_within_grace_completes() {
    let addr: SocketAddr = "127.0.0.1:38104".parse().unwrap();
    let shutdown = Shutdown::new();
    let server = tokio::spawn(
        Lifecycle::new(common::test_config(addr, 3), shutdown.token())
            .run(common::slow_router(Duration::from_secs(1))),
    );
    common::wait_until_ready(addr).await;

    let client = common::http_client();
    let url = format!("http://{addr}/slow");
    let request = tokio::spawn(async move { client.get(url).send().await });

    tokio::time::sleep(Duration::from_millis(300)).await;
    let started = Instant::now();
    shutdown.trigger();

    let response = request.await.unwrap().expect("in-flight request was dropped");
    assert_eq!(response.status(), 200);

    let outcome = server.await.unwrap();
    assert!(outcome.is_ok());
    assert!(started.elapsed() < Duration::from_millis(2500));
}

#[tokio::test]
async fn request_outlasting_grace_forces_shutdown() {
    let addr: SocketAddr = "127.0.0.1:38105".parse().unwrap();
    let shutdown = Shutdown::new();
    let server = tokio::spawn(
        Lifecycle::new(common::test_config(addr, 1), shutdown.token())
            .run(common::slow_router(Duration::from_secs(3))),
    );
    common::wait_until_ready(addr).await;

    let client = common::http_client();
    let url = format!("http://{addr}/slow");
    let request = tokio::spawn(async move { client.get(url).send().await });

    tokio::time::sleep(Duration::from_millis(300)).await;
    let started = Instant::now();
    shutdown.trigger();

    let outcome = server.await.unwrap();
    let elapsed = started.elapsed();

    assert!(matches!(outcome, Err(RunError::GraceExceeded(_))));
    // Wall time tracks the grace period, not the request duration.
    assert!(elapsed >= Duration::from_millis(900));
    assert!(elapsed < Duration::from_millis(2500));

    // The abandoned request observed a terminated connection.
    assert!(request.await.unwrap().is_err());

    // No connection survives the run: the port is immediately rebindable.
    tokio::net::TcpListener::bind(addr)
        .await
        .expect("socket was not released after forced shutdown");
}

#[tokio::test]
async fn no_connection_is_accepted_after_shutdown_begins() {
    let addr: SocketAddr = "127.0.0.1:38106".parse().unwrap();
    let shutdown = Shutdown::new();
    let server = tokio::spawn(
        Lifecycle::new(common::test_config(addr, 5), shutdown.token())
            .run(common::slow_router(Duration::from_secs(2))),
    );
    common::wait_until_ready(addr).await;

    // Keep one request in flight so the drain phase is still running when
    // the late connection attempt arrives.
    let client = common::http_client();
    let url = format!("http://{addr}/slow");
    let request = tokio::spawn(async move { client.get(url).send().await });

    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let late_attempt = tokio::net::TcpStream::connect(addr).await;
    assert!(late_attempt.is_err(), "connection accepted after shutdown began");

    // The in-flight request still drains successfully.
    let response = request.await.unwrap().expect("draining request was dropped");
    assert_eq!(response.status(), 200);
    assert!(server.await.unwrap().is_ok());
}

#[tokio::test]
async fn sequential_runs_release_all_state() {
    let addr: SocketAddr = "127.0.0.1:38107".parse().unwrap();

    for _ in 0..2 {
        let shutdown = Shutdown::new();
        let router = build_router();
        let server =
            tokio::spawn(Lifecycle::new(common::test_config(addr, 5), shutdown.token()).run(router));
        common::wait_until_ready(addr).await;

        shutdown.trigger();
        assert!(server.await.unwrap().is_ok());
    }
}

#[tokio::test]
async fn ping_endpoint_serves_through_the_full_stack() {
    let addr: SocketAddr = "127.0.0.1:38108".parse().unwrap();
    let shutdown = Shutdown::new();
    let router = build_router();
    let server =
        tokio::spawn(Lifecycle::new(common::test_config(addr, 5), shutdown.token()).run(router));
    common::wait_until_ready(addr).await;

    let client = common::http_client();
    let response = client
        .get(format!("http://{addr}/ping"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "pong");

    shutdown.trigger();
    assert!(server.await.unwrap().is_ok());
}
