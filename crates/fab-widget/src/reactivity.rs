#![forbid(unsafe_code)]

//! Host-event signals the widget subscribes to while attached.
//!
//! The host owns one [`HostSignals`] bundle per screen and pushes
//! container resizes, orientation changes, keyboard height changes, and
//! scroll offsets into it. The widget subscribes on attach and drops
//! its [`fab_core::SubscriptionSet`] on detach, so teardown is
//! deterministic: after detach no callback can fire, no matter what the
//! host keeps publishing.

use fab_core::{Observable, Point, Rect};

/// One orientation event. The serial makes consecutive rotations
/// distinct even when the keyboard height is unchanged, since equal
/// values are not re-notified.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationChange {
    pub serial: u64,
    /// Keyboard height at rotation time, zero when hidden.
    pub keyboard_height: f32,
}

/// The host-side notification surface.
#[derive(Debug, Clone)]
pub struct HostSignals {
    /// Container bounds; publish on frame or bounds changes.
    pub container_bounds: Observable<Rect>,
    pub orientation: Observable<OrientationChange>,
    /// Current keyboard height; zero means hidden.
    pub keyboard_height: Observable<f32>,
    /// Content offset of the scrolling ancestor, for sticky mode.
    pub scroll_offset: Observable<Point>,
}

impl HostSignals {
    #[must_use]
    pub fn new(container: Rect) -> Self {
        Self {
            container_bounds: Observable::new(container),
            orientation: Observable::new(OrientationChange::default()),
            keyboard_height: Observable::new(0.0),
            scroll_offset: Observable::new(Point::ZERO),
        }
    }

    pub fn resize(&self, bounds: Rect) {
        self.container_bounds.set(bounds);
    }

    /// Publish a rotation, carrying the keyboard height if one is up.
    pub fn rotate(&self, keyboard_height: f32) {
        let serial = self.orientation.get().serial + 1;
        self.orientation.set(OrientationChange {
            serial,
            keyboard_height,
        });
    }

    pub fn show_keyboard(&self, height: f32) {
        self.keyboard_height.set(height);
    }

    pub fn hide_keyboard(&self) {
        self.keyboard_height.set(0.0);
    }

    pub fn scroll(&self, offset: Point) {
        self.scroll_offset.set(offset);
    }
}

impl Default for HostSignals {
    fn default() -> Self {
        Self::new(crate::placement::DEFAULT_SCREEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn rotate_always_notifies() {
        let signals = HostSignals::default();
        let seen = Rc::new(Cell::new(0u32));
        let s = Rc::clone(&seen);
        let _sub = signals.orientation.subscribe(move |_| s.set(s.get() + 1));

        signals.rotate(0.0);
        signals.rotate(0.0);
        assert_eq!(seen.get(), 2, "same keyboard height, distinct serials");
    }

    #[test]
    fn keyboard_roundtrip() {
        let signals = HostSignals::default();
        signals.show_keyboard(216.0);
        assert_eq!(signals.keyboard_height.get(), 216.0);
        signals.hide_keyboard();
        assert_eq!(signals.keyboard_height.get(), 0.0);
    }

    #[test]
    fn resize_dedups_equal_bounds() {
        let signals = HostSignals::new(Rect::new(0.0, 0.0, 375.0, 667.0));
        let seen = Rc::new(Cell::new(0u32));
        let s = Rc::clone(&seen);
        let _sub = signals.container_bounds.subscribe(move |_| s.set(s.get() + 1));

        signals.resize(Rect::new(0.0, 0.0, 375.0, 667.0));
        assert_eq!(seen.get(), 0);
        signals.resize(Rect::new(0.0, 0.0, 667.0, 375.0));
        assert_eq!(seen.get(), 1);
    }
}
