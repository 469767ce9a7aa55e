//! Server lifecycle manager.
//!
//! # Responsibilities
//! - Bind the listener and run the accept loop
//! - Watch for cancellation and drive the ordered shutdown sequence
//! - Aggregate both activities into a single terminal outcome
//!
//! # Design Decisions
//! - Two concurrent activities share one derived cancellation token, so an
//!   external signal and a fatal serve error wake the watcher through the
//!   same codepath
//! - The join point waits for BOTH activities; the manager never returns
//!   while the listening socket might still be open
//! - Stop-accepting happens before the drain wait begins; the grace deadline
//!   is hard and ends with connection aborts, not another polite request

use std::time::Duration;

use axum::Router;
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};

use crate::config::ServerConfig;
use crate::net::connection::ConnectionTracker;
use crate::net::listener::{Listener, ListenerError};

/// Terminal failure cause of a lifecycle run.
///
/// There is no retry anywhere in the manager: every failure ends the current
/// run and is surfaced to the caller, which decides what to do next.
#[derive(Debug, Error)]
pub enum RunError {
    /// The listener failed to bind, or the accept loop hit a fatal error.
    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// In-flight connections did not drain within the grace period and were
    /// forcibly terminated.
    #[error("shutdown exceeded the {0:?} grace period")]
    GraceExceeded(Duration),
}

/// How the serve activity ended when it was not a fatal error.
enum ServeExit {
    /// The listener was closed by the shutdown sequence and every in-flight
    /// connection finished.
    Drained,
    /// The grace deadline fired first; remaining connections were aborted.
    Forced { abandoned: u64 },
}

/// Owns one run of the server: `Idle → Binding → Serving →
/// (ShuttingDownGraceful | ShuttingDownForced) → Terminated`.
///
/// The terminal state is entered exactly once; `run` consumes the manager
/// and returns the single aggregated outcome.
pub struct Lifecycle {
    config: ServerConfig,
    shutdown: CancellationToken,
}

impl Lifecycle {
    /// Create a manager for one run.
    ///
    /// `shutdown` is the caller's cancellation signal. A token that is
    /// already cancelled is accepted and causes an immediate, clean
    /// shutdown.
    pub fn new(config: ServerConfig, shutdown: CancellationToken) -> Self {
        Self { config, shutdown }
    }

    /// Run the server until cancelled, then shut it down within the grace
    /// period.
    ///
    /// Binds the listener, then races two cooperating activities (the
    /// accept loop and the shutdown watcher) and joins on BOTH before
    /// returning. A bind failure returns immediately; nothing was bound, so
    /// there is no shutdown sequence to run.
    pub async fn run(self, handler: Router) -> Result<(), RunError> {
        let listener = match Listener::bind(&self.config.listener).await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!(error = %err, "failed to start server");
                return Err(err.into());
            }
        };

        tracing::info!(
            address = %listener.local_addr(),
            shutdown_grace_secs = self.config.timeouts.shutdown_grace_secs,
            "server starting"
        );

        // One derived token wakes the watcher for both external cancellation
        // and a fatal serve error.
        let run_token = self.shutdown.child_token();
        // Listener stop control: cancelling it is safe while accepts are in
        // progress, which is the only shared mutable state in the manager.
        let stop_accepting = CancellationToken::new();
        let force = CancellationToken::new();
        let tracker = ConnectionTracker::new();
        let (drained_tx, drained_rx) = oneshot::channel();

        let (serve_result, shutdown_result) = tokio::join!(
            self.serve(
                listener,
                handler,
                run_token.clone(),
                stop_accepting.clone(),
                force.clone(),
                tracker.clone(),
                drained_tx,
            ),
            self.watch_shutdown(run_token, stop_accepting, force, drained_rx),
        );

        match (serve_result, shutdown_result) {
            // A fatal accept error is the root cause; the watcher result is
            // discarded since the run is already failing.
            (Err(err), _) => {
                tracing::error!(error = %err, "server terminated with error");
                Err(err.into())
            }
            (Ok(_), Err(err)) => {
                tracing::error!(error = %err, "shutdown was forced");
                Err(err)
            }
            (Ok(ServeExit::Forced { abandoned }), Ok(())) => {
                // The force token is only cancelled on the grace-exceeded
                // path, so a forced exit always counts as exceeding it even
                // if the watcher result raced to success.
                tracing::warn!(abandoned, "forced exit raced the watcher result");
                Err(RunError::GraceExceeded(self.config.timeouts.shutdown_grace()))
            }
            (Ok(ServeExit::Drained), Ok(())) => {
                tracing::info!("server stopped");
                Ok(())
            }
        }
    }

    /// Accept loop. Runs until the listener is closed by the shutdown
    /// sequence or an unrecoverable accept error occurs.
    #[allow(clippy::too_many_arguments)]
    async fn serve(
        &self,
        listener: Listener,
        handler: Router,
        run_token: CancellationToken,
        stop_accepting: CancellationToken,
        force: CancellationToken,
        tracker: ConnectionTracker,
        drained_tx: oneshot::Sender<()>,
    ) -> Result<ServeExit, ListenerError> {
        // Read and write bounds apply to whatever handler the caller
        // supplied; they are properties of the server, not of the routes.
        let handler = handler.layer((
            TimeoutLayer::new(self.config.timeouts.write()),
            RequestBodyTimeoutLayer::new(self.config.timeouts.read()),
        ));

        let mut builder = auto::Builder::new(TokioExecutor::new());
        // The header read timeout also bounds kept-alive connections parked
        // between requests, which is where the idle limit is enforced.
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.config.timeouts.idle());
        builder.http2().timer(TokioTimer::new());

        let graceful = GracefulShutdown::new();
        let mut connections: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                // Checked first: no connection is ever accepted after the
                // shutdown sequence has begun.
                biased;

                _ = stop_accepting.cancelled() => break,

                accepted = listener.accept() => {
                    let (stream, peer_addr, permit) = match accepted {
                        Ok(conn) => conn,
                        Err(err) => {
                            // Fatal: wake the watcher through the shared
                            // token, then report the raw error.
                            run_token.cancel();
                            return Err(err);
                        }
                    };

                    let guard = tracker.track();
                    let service = handler.clone();
                    let hyper_service =
                        hyper::service::service_fn(move |request: hyper::Request<Incoming>| {
                            service.clone().oneshot(request)
                        });

                    let conn = builder
                        .serve_connection_with_upgrades(TokioIo::new(stream), hyper_service);
                    let conn = graceful.watch(conn.into_owned());

                    connections.spawn(async move {
                        let _permit = permit;
                        if let Err(err) = conn.await {
                            tracing::debug!(
                                connection_id = %guard.id(),
                                peer_addr = %peer_addr,
                                error = %err,
                                "connection ended with error"
                            );
                        }
                    });
                }
            }
        }

        // Closing the socket before the drain wait guarantees nothing races
        // past the shutdown decision.
        drop(listener);
        tracing::info!(
            active_connections = tracker.active_count(),
            "listener closed, draining connections"
        );

        tokio::select! {
            _ = graceful.shutdown() => {
                while connections.join_next().await.is_some() {}
                let _ = drained_tx.send(());
                Ok(ServeExit::Drained)
            }
            _ = force.cancelled() => {
                let abandoned = tracker.active_count();
                connections.shutdown().await;
                tracing::warn!(abandoned, "connections abandoned by forced shutdown");
                Ok(ServeExit::Forced { abandoned })
            }
        }
    }

    /// Shutdown watcher. Blocks until the shared token is cancelled, then
    /// drives the bounded drain: stop accepting, wait up to the grace
    /// period, force if the deadline fires.
    async fn watch_shutdown(
        &self,
        run_token: CancellationToken,
        stop_accepting: CancellationToken,
        force: CancellationToken,
        drained_rx: oneshot::Receiver<()>,
    ) -> Result<(), RunError> {
        run_token.cancelled().await;

        let grace = self.config.timeouts.shutdown_grace();
        tracing::info!(grace_secs = grace.as_secs(), "shutdown signal received");
        stop_accepting.cancel();

        match tokio::time::timeout(grace, drained_rx).await {
            // Either the serve activity drained in time, or it already went
            // away on a fatal error, in which case its error is the root
            // cause and this result is discarded by the aggregation.
            Ok(_) => Ok(()),
            Err(_) => {
                force.cancel();
                Err(RunError::GraceExceeded(grace))
            }
        }
    }
}
