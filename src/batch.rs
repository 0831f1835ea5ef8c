use crate::Changes;

/// Coalesces bursts of change signals into one flush per window.
///
/// Headless: the owner supplies `now_ms` timestamps and polls for expiry, the
/// same way scrolling debounce is driven elsewhere in this crate. The window
/// is armed by the first signal after a flush and is *not* re-extended by
/// later signals; they fold into the already-pending flush.
#[derive(Clone, Copy, Debug)]
pub struct ChangeBatcher {
    window_ms: u64,
    deadline_ms: Option<u64>,
    pending: Changes,
}

impl ChangeBatcher {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            deadline_ms: None,
            pending: Changes::empty(),
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Records change tags; arms the flush deadline if none is pending.
    pub fn signal(&mut self, changes: Changes, now_ms: u64) {
        if changes.is_empty() {
            return;
        }
        self.pending |= changes;
        if self.deadline_ms.is_none() {
            self.deadline_ms = Some(now_ms.saturating_add(self.window_ms));
        }
    }

    /// Returns the pending deadline, if a flush is armed.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Flushes if the window has expired: at most one flush per window, whose
    /// tag set is the union of everything signalled since the last flush.
    ///
    /// Returns `(deadline, changes)` so callers can order flushes across
    /// batchers by window expiry.
    pub fn poll(&mut self, now_ms: u64) -> Option<(u64, Changes)> {
        let deadline = self.deadline_ms?;
        if now_ms < deadline {
            return None;
        }
        self.deadline_ms = None;
        let changes = core::mem::take(&mut self.pending);
        strace!(?changes, deadline, "batcher flush");
        Some((deadline, changes))
    }
}
