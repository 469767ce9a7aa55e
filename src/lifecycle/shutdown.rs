//! Shutdown coordination for the host.

use tokio_util::sync::CancellationToken;

/// Coordinator for graceful shutdown.
///
/// Owns the root cancellation token. Long-running components hold clones or
/// child tokens; triggering is monotonic: once cancelled, the token stays
/// cancelled, and every derived token observes it.
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// A clone of the root token, for handing to the lifecycle manager.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Whether shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_is_monotonic() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_triggered());

        shutdown.trigger();
        assert!(shutdown.is_triggered());

        // Triggering again is a no-op, never an un-cancel.
        shutdown.trigger();
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn derived_tokens_inherit_cancellation() {
        let shutdown = Shutdown::new();
        let child = shutdown.token().child_token();
        assert!(!child.is_cancelled());

        shutdown.trigger();
        assert!(child.is_cancelled());
    }

    #[test]
    fn child_cancellation_does_not_propagate_upward() {
        let shutdown = Shutdown::new();
        let child = shutdown.token().child_token();

        child.cancel();
        assert!(!shutdown.is_triggered());
    }
}
