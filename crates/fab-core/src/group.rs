#![forbid(unsafe_code)]

//! Fan-out/fan-in join over concurrently running animations.
//!
//! A [`CompletionGroup`] tracks N outstanding members and runs a single
//! continuation once every member has finished. Members are represented
//! by RAII [`CompletionTicket`]s: taking a ticket increments the pending
//! count, completing (or dropping) it decrements. The continuation is
//! armed with [`CompletionGroup::notify`] and fires as soon as the
//! pending count is zero — immediately, if nothing is outstanding.
//!
//! # Invariants
//!
//! 1. The continuation fires exactly once.
//! 2. The continuation never fires while a ticket is outstanding.
//! 3. A dropped ticket counts as completed, so a schedule that is torn
//!    down early cannot wedge the group.
//! 4. Completion order of members is irrelevant; only "all done" is
//!    observable.
//!
//! # Failure Modes
//!
//! - `notify` called twice: the second continuation replaces the first
//!   only if the first has not fired yet; after firing, late `notify`
//!   runs its continuation immediately (the group is already drained).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct GroupInner {
    pending: Cell<usize>,
    continuation: RefCell<Option<Box<dyn FnOnce()>>>,
    fired: Cell<bool>,
}

impl GroupInner {
    fn maybe_fire(&self) {
        if self.pending.get() == 0
            && !self.fired.get()
            && let Some(f) = self.continuation.borrow_mut().take()
        {
            self.fired.set(true);
            f();
        }
    }
}

/// Aggregate completion over a set of [`CompletionTicket`]s.
#[derive(Clone)]
pub struct CompletionGroup {
    inner: Rc<GroupInner>,
}

impl Default for CompletionGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionGroup {
    /// Create a group with no outstanding members.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(GroupInner {
                pending: Cell::new(0),
                continuation: RefCell::new(None),
                fired: Cell::new(false),
            }),
        }
    }

    /// Register one member; the returned ticket must be completed (or
    /// dropped) for the group to finish.
    #[must_use]
    pub fn ticket(&self) -> CompletionTicket {
        self.inner.pending.set(self.inner.pending.get() + 1);
        CompletionTicket {
            inner: Rc::clone(&self.inner),
            done: false,
        }
    }

    /// Number of members still outstanding.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.pending.get()
    }

    /// Whether the continuation has already run.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.inner.fired.get()
    }

    /// Arm the continuation. Fires immediately if nothing is pending.
    pub fn notify(&self, f: impl FnOnce() + 'static) {
        if self.inner.fired.get() {
            // Group already drained and reported; run the late arrival
            // right away rather than swallowing it.
            f();
            return;
        }
        *self.inner.continuation.borrow_mut() = Some(Box::new(f));
        self.inner.maybe_fire();
    }
}

impl std::fmt::Debug for CompletionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionGroup")
            .field("pending", &self.pending())
            .field("fired", &self.has_fired())
            .finish()
    }
}

/// One outstanding member of a [`CompletionGroup`].
pub struct CompletionTicket {
    inner: Rc<GroupInner>,
    done: bool,
}

impl CompletionTicket {
    /// Mark this member finished.
    pub fn complete(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        let pending = self.inner.pending.get();
        debug_assert!(pending > 0, "ticket completed on drained group");
        self.inner.pending.set(pending.saturating_sub(1));
        self.inner.maybe_fire();
    }
}

impl Drop for CompletionTicket {
    fn drop(&mut self) {
        self.finish();
    }
}

impl std::fmt::Debug for CompletionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionTicket")
            .field("done", &self.done)
            .finish()
    }
}
