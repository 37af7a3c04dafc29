// BOQ recompute latch.
//
// Two independent event sources can ask for a BOQ recompute: the import
// pipeline itself, and ambient listeners reacting to "parsed data present".
// The latch serializes them: while raised, recompute requests are suppressed;
// the release site issues the one recompute that follows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A single boolean latch, scoped to one project context. Not a counter:
/// raising an already-raised gate is a no-op, and only the release that
/// actually clears it is meaningful.
#[derive(Debug, Clone, Default)]
pub struct ComputeGate {
    pending: Arc<AtomicBool>,
}

impl ComputeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the latch. Idempotent.
    pub fn raise(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Clear the latch. Returns true if this call was the one that cleared
    /// it, so the caller knows it owns the follow-up recompute.
    pub fn release(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}
