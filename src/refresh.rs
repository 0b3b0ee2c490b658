use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonically increasing refresh token. Every triggering event (timer
/// tick, user navigation) begins a new cycle, which invalidates whatever was
/// in flight; stale cycles notice via their guard and abandon their results.
#[derive(Clone, Debug, Default)]
pub struct RefreshToken {
    current: Arc<AtomicU64>,
}

impl RefreshToken {
    pub fn new() -> Self {
        RefreshToken::default()
    }

    /// Increment the live token and capture the new value for one cycle.
    pub fn begin(&self) -> CycleGuard {
        let captured = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        CycleGuard {
            current: Arc::clone(&self.current),
            captured,
        }
    }

    pub fn value(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

/// Cancellation context for one refresh cycle, checked after every store
/// query. No in-flight work is interrupted; its results are discarded.
#[derive(Clone, Debug)]
pub struct CycleGuard {
    current: Arc<AtomicU64>,
    captured: u64,
}

impl CycleGuard {
    pub fn is_stale(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cycle_is_not_stale() {
        let token = RefreshToken::new();
        let guard = token.begin();
        assert!(!guard.is_stale());
    }

    #[test]
    fn newer_cycle_supersedes_older_one() {
        let token = RefreshToken::new();
        let first = token.begin();
        let second = token.begin();
        assert!(first.is_stale());
        assert!(!second.is_stale());
    }

    #[test]
    fn token_only_increases() {
        let token = RefreshToken::new();
        let mut previous = token.value();
        for _ in 0..10 {
            token.begin();
            let value = token.value();
            assert!(value > previous);
            previous = value;
        }
    }
}
