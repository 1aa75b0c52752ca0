//! Fetch-token gate for the render cycle.
//!
//! Each render cycle tags its fetches with a token issued for the Selection
//! that triggered it. When a fetch completes, its token must still be the
//! most recently issued one or the result is discarded — a user who changes
//! ticker twice quickly must never see the earlier fetch flicker in after
//! the later one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token tagging one fetch with the cycle it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

/// Lock-free latest-cycle gate.
///
/// Issuing a token supersedes every earlier one. No state beyond a counter:
/// the gate does not remember selections, only which cycle is newest.
#[derive(Debug, Default)]
pub struct CycleGate {
    seq: AtomicU64,
}

impl CycleGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle, superseding all earlier tokens.
    pub fn issue(&self) -> FetchToken {
        FetchToken(self.seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether this token still belongs to the newest cycle.
    pub fn is_current(&self, token: FetchToken) -> bool {
        token.0 == self.seq.load(Ordering::SeqCst)
    }

    /// Admit a completed fetch's result, or drop it if superseded.
    pub fn admit<T>(&self, token: FetchToken, value: T) -> Option<T> {
        if self.is_current(token) {
            Some(value)
        } else {
            tracing::debug!(token = token.0, "discarding superseded fetch result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cycle_is_current() {
        let gate = CycleGate::new();
        let t1 = gate.issue();
        assert!(gate.is_current(t1));
        assert_eq!(gate.admit(t1, "AAPL data"), Some("AAPL data"));
    }

    #[test]
    fn test_out_of_order_completion_discards_stale_result() {
        let gate = CycleGate::new();

        // User types AAPL, then switches to TSLA before the first fetch lands.
        let t1 = gate.issue();
        let t2 = gate.issue();

        // T2 resolves first and is rendered.
        assert_eq!(gate.admit(t2, "TSLA data"), Some("TSLA data"));

        // T1 resolves late; it must be dropped, not rendered.
        assert_eq!(gate.admit(t1, "AAPL data"), None);

        // T2 is still the live cycle.
        assert!(gate.is_current(t2));
        assert!(!gate.is_current(t1));
    }

    #[test]
    fn test_tokens_are_strictly_increasing() {
        let gate = CycleGate::new();
        let a = gate.issue();
        let b = gate.issue();
        let c = gate.issue();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(gate.is_current(c));
        assert!(!gate.is_current(a));
    }
}
