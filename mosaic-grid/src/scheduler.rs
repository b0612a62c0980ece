//! Cooperative deferral slots for the frame loop.
//!
//! All engine work happens on one logical thread; what varies is *when* a
//! piece of work is allowed to run. The scheduler models the three deferral
//! shapes the windowing controller needs:
//!
//! - a **frame-aligned slot** for the visible-set recompute: many scroll
//!   signals coalesce into at most one pending pass, and the pass reads the
//!   latest scroll state when it runs, not when it was scheduled;
//! - **deadline slots** (debounced relayout, load settle): re-arming moves
//!   the deadline instead of queuing a second one;
//! - a **low-priority slot** for "request next page", drained only after the
//!   frame's visual work is done.
//!
//! Teardown cancels everything so no deferred work mutates state after the
//! owning view is gone.

use std::time::{Duration, Instant};

/// Deferred-work slots owned by a view's frame loop.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    window_pass_pending: bool,
    relayout_deadline: Option<Instant>,
    settle_deadline: Option<Instant>,
    load_request_armed: bool,
    cancelled: bool,
}

impl FrameScheduler {
    /// Creates an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a visible-set recompute at the next frame boundary. A newly
    /// scheduled request supersedes a pending one; it never queues behind it.
    pub fn request_window_pass(&mut self) {
        if self.cancelled {
            return;
        }
        self.window_pass_pending = true;
    }

    /// Consumes the pending window pass, if any.
    pub fn take_window_pass(&mut self) -> bool {
        std::mem::take(&mut self.window_pass_pending)
    }

    /// (Re)arms the debounced relayout: the deadline moves to `now + quiet`,
    /// cancelling any earlier deadline.
    pub fn defer_relayout(&mut self, now: Instant, quiet: Duration) {
        if self.cancelled {
            return;
        }
        self.relayout_deadline = Some(now + quiet);
    }

    /// Consumes the relayout deadline once the quiet period has elapsed.
    pub fn take_due_relayout(&mut self, now: Instant) -> bool {
        match self.relayout_deadline {
            Some(deadline) if now >= deadline => {
                self.relayout_deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Arms the fixed settle deadline that ends a load-more cycle.
    pub fn schedule_settle(&mut self, now: Instant, delay: Duration) {
        if self.cancelled {
            return;
        }
        self.settle_deadline = Some(now + delay);
    }

    /// Consumes the settle deadline once it has elapsed.
    pub fn take_due_settle(&mut self, now: Instant) -> bool {
        match self.settle_deadline {
            Some(deadline) if now >= deadline => {
                self.settle_deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Arms the low-priority "request next page" slot. Idempotent while armed.
    pub fn arm_load_request(&mut self) {
        if self.cancelled {
            return;
        }
        self.load_request_armed = true;
    }

    /// Consumes the armed load request, if any.
    pub fn take_load_request(&mut self) -> bool {
        std::mem::take(&mut self.load_request_armed)
    }

    /// Cancels every pending deferral and refuses new ones.
    pub fn cancel_all(&mut self) {
        self.window_pass_pending = false;
        self.relayout_deadline = None;
        self.settle_deadline = None;
        self.load_request_armed = false;
        self.cancelled = true;
    }

    /// True once [`cancel_all`](Self::cancel_all) has run.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
