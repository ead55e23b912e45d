//! Cancellation scope for the running program.

use tokio_util::sync::CancellationToken;

/// Coordinator for cooperative cancellation.
///
/// Every long-running operation receives a token derived from this scope.
/// Unlike a broadcast channel, a token that has already fired is observed by
/// operations that subscribe afterwards.
#[derive(Debug, Clone)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new, untriggered scope.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// A token that fires when this scope is triggered.
    ///
    /// Cancelling the returned token does not trigger the scope.
    pub fn subscribe(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// The scope's own token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Trigger cancellation for every subscriber.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
