#![forbid(unsafe_code)]

//! Tap-to-close backdrop behind the open menu.
//!
//! The overlay is created once and attached/detached as the menu opens
//! and closes. Its opacity is timeline-driven through the same
//! [`VisualHandle`] mechanism as items. Taps are only honored once the
//! enter animation has completed; a tap landing mid-enter is dropped,
//! which keeps a half-open menu from tearing itself down from inside its
//! own open transition.
//!
//! # Invariants
//!
//! - `is_armed()` implies `is_attached()`.
//! - Detaching disarms, so a stale arm bit can never survive into the
//!   next open.

use fab_core::{Rect, Visual, VisualHandle};

use crate::style::Rgba;

#[derive(Debug, Clone)]
pub struct Overlay {
    pub color: Rgba,
    frame: Rect,
    attached: bool,
    armed: bool,
    visual: VisualHandle,
}

impl Overlay {
    #[must_use]
    pub fn new(color: Rgba) -> Self {
        Self {
            color,
            frame: Rect::default(),
            attached: false,
            armed: false,
            visual: VisualHandle::new(Visual::hidden()),
        }
    }

    /// Insert the overlay behind the button, covering `frame`, fully
    /// transparent and unarmed.
    pub fn attach(&mut self, frame: Rect) {
        self.frame = frame;
        self.attached = true;
        self.armed = false;
        self.visual.set(Visual::hidden());
    }

    /// Remove the overlay from the hierarchy.
    pub fn detach(&mut self) {
        self.attached = false;
        self.armed = false;
    }

    /// Called when the enter animation completes; taps are honored from
    /// here on.
    pub fn arm(&mut self) {
        if self.attached {
            self.armed = true;
        }
    }

    /// Stop honoring taps; the close transition calls this before its
    /// animations start.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Keep the overlay covering a resized container.
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    #[must_use]
    pub fn visual(&self) -> Visual {
        self.visual.get()
    }

    #[must_use]
    pub fn visual_handle(&self) -> VisualHandle {
        self.visual.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_resets_state() {
        let mut overlay = Overlay::new(Rgba::BLACK.with_opacity(0.3));
        overlay.attach(Rect::new(0.0, 0.0, 375.0, 667.0));
        overlay.arm();
        overlay.detach();

        overlay.attach(Rect::new(0.0, 0.0, 375.0, 667.0));
        assert!(overlay.is_attached());
        assert!(!overlay.is_armed(), "re-attach must start unarmed");
        assert_eq!(overlay.visual().alpha, 0.0);
    }

    #[test]
    fn arm_requires_attachment() {
        let mut overlay = Overlay::new(Rgba::BLACK);
        overlay.arm();
        assert!(!overlay.is_armed());
    }

    #[test]
    fn detach_disarms() {
        let mut overlay = Overlay::new(Rgba::BLACK);
        overlay.attach(Rect::new(0.0, 0.0, 100.0, 100.0));
        overlay.arm();
        assert!(overlay.is_armed());
        overlay.detach();
        assert!(!overlay.is_armed());
    }
}
