#![forbid(unsafe_code)]

//! Host-facing lifecycle notifications.
//!
//! One delegate at a time, held weakly so the widget never keeps its
//! host alive. All methods default to no-ops.
//!
//! Notification timing is deliberately asymmetric: `will_open` /
//! `did_open` (and the close pair) bracket the animated aggregate, while
//! `opened` / `closed` fire synchronously at call time regardless of
//! animation progress. Both channels are part of the contract.

use std::rc::{Rc, Weak};

use crate::fab::Fab;

/// Lifecycle observer for a [`Fab`].
pub trait FabDelegate {
    /// The open transition is starting.
    fn will_open(&self, _fab: &Fab) {}
    /// Every open animation has completed; the menu is fully open.
    fn did_open(&self, _fab: &Fab) {}
    /// The close transition is starting.
    fn will_close(&self, _fab: &Fab) {}
    /// Every close animation has completed; the menu is fully closed.
    fn did_close(&self, _fab: &Fab) {}
    /// Fired synchronously on `open()`, before any animation runs.
    fn opened(&self, _fab: &Fab) {}
    /// Fired synchronously on `close()`, before any animation runs.
    fn closed(&self, _fab: &Fab) {}
    /// `toggle()` was called with zero items.
    fn empty_selected(&self, _fab: &Fab) {}
}

/// Weak delegate slot; upgrades per notification.
#[derive(Default)]
pub(crate) struct DelegateSlot {
    delegate: Option<Weak<dyn FabDelegate>>,
}

impl DelegateSlot {
    pub(crate) fn set(&mut self, delegate: Option<Weak<dyn FabDelegate>>) {
        self.delegate = delegate;
    }

    /// Upgrade the weak edge; `None` when unset or the host dropped it.
    pub(crate) fn get(&self) -> Option<Rc<dyn FabDelegate>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for DelegateSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegateSlot")
            .field("alive", &self.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Probe {
        hits: Cell<u32>,
    }

    impl FabDelegate for Probe {
        fn opened(&self, _fab: &Fab) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    #[test]
    fn dead_delegate_is_silent() {
        let mut slot = DelegateSlot::default();
        let probe: Rc<dyn FabDelegate> = Rc::new(Probe { hits: Cell::new(0) });
        slot.set(Some(Rc::downgrade(&probe)));
        assert!(slot.get().is_some());
        drop(probe);
        assert!(slot.get().is_none());
    }

    #[test]
    fn get_reaches_live_delegate() {
        let mut slot = DelegateSlot::default();
        let probe = Rc::new(Probe { hits: Cell::new(0) });
        let as_delegate: Rc<dyn FabDelegate> = probe.clone();
        slot.set(Some(Rc::downgrade(&as_delegate)));
        let fab = Fab::new();
        if let Some(delegate) = slot.get() {
            delegate.opened(&fab);
        }
        assert_eq!(probe.hits.get(), 1);
    }
}
