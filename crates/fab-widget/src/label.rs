#![forbid(unsafe_code)]

//! The widget's shared title label.
//!
//! Exactly one title-label instance exists per widget, created lazily on
//! first use. In cancel-less mode it doubles as the projection surface
//! for item[0]'s title; the animation strategies fade/scale it instead of
//! animating a zeroth item. Styling writes (color, corner radius,
//! background) are widget-owned state applied here, not ambient globals.

use fab_core::{Insets, Point, Size, Visual, VisualHandle};

use crate::item::LabelPosition;
use crate::style::{FontMetrics, Rgba, TITLE_TEXT_INSETS};

/// Gap between the label and the button edge.
const LABEL_GAP: f32 = 10.0;

/// Lazily created, shared title label.
#[derive(Debug, Clone)]
pub struct TitleLabel {
    text: Option<String>,
    size: Size,
    pub text_color: Rgba,
    pub background: Rgba,
    pub corner_radius: f32,
    pub text_insets: Insets,
    /// Horizontal mirror under right-to-left layout (render concern;
    /// the offset math is unaffected).
    pub mirrored: bool,
    visual: VisualHandle,
}

impl TitleLabel {
    #[must_use]
    pub fn new(text_color: Rgba, background: Rgba, corner_radius: f32) -> Self {
        let text_insets = if background.is_clear() {
            Insets::ZERO
        } else {
            TITLE_TEXT_INSETS
        };
        Self {
            text: None,
            size: Size::default(),
            text_color,
            background,
            corner_radius,
            text_insets,
            mirrored: false,
            visual: VisualHandle::new(Visual::hidden()),
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set (or clear) the label text, re-measuring its size.
    pub fn set_text(&mut self, text: Option<String>, metrics: &FontMetrics) {
        self.size = match text.as_deref() {
            Some(t) => {
                let base = metrics.measure(t);
                Size::new(
                    base.width + self.text_insets.horizontal(),
                    base.height + self.text_insets.vertical(),
                )
            }
            None => Size::default(),
        };
        self.text = text;
    }

    /// Swap the background, re-deriving the text insets the way the
    /// widget styles labels: clear backgrounds carry no insets.
    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
        self.text_insets = if background.is_clear() {
            Insets::ZERO
        } else {
            TITLE_TEXT_INSETS
        };
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn visual(&self) -> Visual {
        self.visual.get()
    }

    #[must_use]
    pub fn visual_handle(&self) -> VisualHandle {
        self.visual.clone()
    }

    /// Position the label against a button of `button_size`: trailing
    /// the button on the left (default) or leading on the right, and
    /// vertically centered on it.
    pub fn position(&self, position: LabelPosition, button_size: f32) {
        let x = match position {
            LabelPosition::Left => -self.size.width - LABEL_GAP,
            LabelPosition::Right => button_size + LABEL_GAP,
        };
        let y = button_size / 2.0 - self.size.height / 2.0;
        self.visual.update(|v| v.offset = Point::new(x, y));
    }
}
