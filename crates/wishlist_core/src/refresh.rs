//! Process-local refresh token.
//!
//! The UI collaborator bumps the token after every mutation and re-runs the
//! query facade whenever the token differs from the last value it rendered.
//! The token carries no relation to database content.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RefreshSignal {
    token: AtomicU64,
}

impl RefreshSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the token by one and returns the new value.
    pub fn bump(&self) -> u64 {
        self.token.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn token(&self) -> u64 {
        self.token.load(Ordering::Acquire)
    }

    /// Whether a watcher that last saw `seen` should re-query.
    ///
    /// Several bumps since `seen` still mean a single refresh.
    pub fn changed_since(&self, seen: u64) -> bool {
        self.token() != seen
    }
}
