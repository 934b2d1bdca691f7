#![forbid(unsafe_code)]

//! Change-tracking primitives for host-event reactivity.
//!
//! [`Observable<T>`] is a shared, version-tracked value with change
//! notification via subscriber callbacks; [`Subscription`] is the RAII
//! guard that unsubscribes on drop; [`SubscriptionSet`] collects the
//! subscriptions of one logical scope (a widget attachment) and releases
//! them together — deterministic teardown instead of implicit lifecycle
//! hooks.
//!
//! Single-threaded by construction: `Rc<RefCell<..>>` shared ownership,
//! callbacks run synchronously on `set`.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the
//!    value; setting an equal value is a no-op (no notification).
//! 2. Subscribers are notified in registration order.
//! 3. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 4. Subscribing or unsubscribing from inside a callback is allowed;
//!    it takes effect on the next notification cycle.
//!
//! # Failure Modes
//!
//! - Callback panics propagate to the `set` caller.
//! - A subscription outliving its observable is inert (weak back-edge).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    subscribers: RefCell<Vec<(u64, Callback<T>)>>,
    next_id: Cell<u64>,
}

/// A shared, observable value.
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Current value (cloned).
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Read the value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Mutation counter; bumps once per effective `set`.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Set a new value, notifying subscribers. Equal values are a no-op.
    pub fn set(&self, value: T) {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.inner.version.set(self.inner.version.get() + 1);
        self.notify();
    }

    fn notify(&self) {
        // Snapshot the list so callbacks may (un)subscribe re-entrantly.
        let callbacks: Vec<Callback<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        let value = self.get();
        for cb in callbacks {
            cb(&value);
        }
    }

    /// Register a change callback; dropping the returned subscription
    /// removes it.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));

        let weak: Weak<ObservableInner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner
                        .subscribers
                        .borrow_mut()
                        .retain(|(sub_id, _)| *sub_id != id);
                }
            })),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

/// RAII guard for one registered callback.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish()
    }
}

/// Collects subscriptions for a logical scope; releases all on drop or
/// [`SubscriptionSet::clear`].
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a subscription until the set is dropped or cleared.
    pub fn hold(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release everything now; the set stays reusable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_roundtrip() {
        let obs = Observable::new(7);
        assert_eq!(obs.get(), 7);
        obs.set(11);
        assert_eq!(obs.get(), 11);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn equal_set_is_noop() {
        let obs = Observable::new(5);
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        let _sub = obs.subscribe(move |_| f.set(f.get() + 1));

        obs.set(5);
        assert_eq!(obs.version(), 0);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn subscribers_notified_in_order() {
        let obs = Observable::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));
        let o1 = Rc::clone(&order);
        let o2 = Rc::clone(&order);
        let _s1 = obs.subscribe(move |_| o1.borrow_mut().push(1));
        let _s2 = obs.subscribe(move |_| o2.borrow_mut().push(2));
        obs.set(1);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn drop_subscription_stops_callbacks() {
        let obs = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let sub = obs.subscribe(move |v| s.set(*v));
        obs.set(1);
        assert_eq!(seen.get(), 1);
        drop(sub);
        obs.set(2);
        assert_eq!(seen.get(), 1);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_observable_is_inert() {
        let sub;
        {
            let obs = Observable::new(0);
            sub = obs.subscribe(|_| {});
        }
        drop(sub); // must not panic
    }

    #[test]
    fn reentrant_subscribe_from_callback() {
        let obs = Observable::new(0);
        let extra: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let obs2 = obs.clone();
        let extra2 = Rc::clone(&extra);
        let _sub = obs.subscribe(move |_| {
            if extra2.borrow().is_none() {
                *extra2.borrow_mut() = Some(obs2.subscribe(|_| {}));
            }
        });
        obs.set(1);
        assert_eq!(obs.subscriber_count(), 2);
    }

    #[test]
    fn set_holds_subscription() {
        let obs = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let mut set = SubscriptionSet::new();
        set.hold(obs.subscribe(move |v| s.set(*v)));
        assert_eq!(set.len(), 1);

        obs.set(3);
        assert_eq!(seen.get(), 3);

        drop(set);
        obs.set(9);
        assert_eq!(seen.get(), 3, "released on drop");
    }

    #[test]
    fn set_clear_is_reusable() {
        let obs = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let mut set = SubscriptionSet::new();

        let s = Rc::clone(&seen);
        set.hold(obs.subscribe(move |v| s.set(*v)));
        set.clear();
        assert!(set.is_empty());
        obs.set(1);
        assert_eq!(seen.get(), 0);

        let s = Rc::clone(&seen);
        set.hold(obs.subscribe(move |v| s.set(*v)));
        obs.set(2);
        assert_eq!(seen.get(), 2);
    }
}
