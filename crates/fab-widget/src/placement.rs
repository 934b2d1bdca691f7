#![forbid(unsafe_code)]

//! Anchor-frame computation.
//!
//! The widget anchors to the bottom-right of its container (bottom-left
//! under right-to-left layout, with the content mirrored on X), offset
//! by the configured paddings and lifted by the keyboard when one is
//! showing. With `friendly_tap` the tappable frame grows by one padding
//! on each axis while the drawn circle stays centered inside it.
//!
//! # Invariants
//!
//! 1. `visual_frame` is always `size × size` and centered in `frame`.
//! 2. Without friendly tap, `frame == visual_frame`.
//! 3. An unattached widget (no container) places itself against
//!    [`DEFAULT_SCREEN`] instead of failing.
//!
//! Custom-frame mode bypasses all of this: the caller owns positioning
//! and `size` is derived as `min(width, height)` of the supplied frame.

use fab_core::{Insets, Point, Rect};

/// Horizontal layout direction, set on the widget config rather than
/// read from any process-global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Screen-relative fallback used before the widget is attached to a
/// container.
pub const DEFAULT_SCREEN: Rect = Rect::new(0.0, 0.0, 375.0, 667.0);

/// Everything the anchor computation reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementInput {
    /// Container bounds; `None` before attachment.
    pub container: Option<Rect>,
    /// Button diameter.
    pub size: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    /// Safe-area insets of the container (applied on the trailing and
    /// bottom edges in left-to-right layout).
    pub safe_area: Insets,
    /// Current keyboard height, zero when hidden.
    pub keyboard_height: f32,
    pub friendly_tap: bool,
    pub direction: LayoutDirection,
}

impl Default for PlacementInput {
    fn default() -> Self {
        Self {
            container: None,
            size: 56.0,
            padding_x: 14.0,
            padding_y: 14.0,
            safe_area: Insets::ZERO,
            keyboard_height: 0.0,
            friendly_tap: false,
            direction: LayoutDirection::LeftToRight,
        }
    }
}

/// Result of an anchor computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// The tappable frame (inflated under friendly tap).
    pub frame: Rect,
    /// The drawn circle, centered in `frame`.
    pub visual_frame: Rect,
    /// Content is drawn X-mirrored (right-to-left layout).
    pub mirrored: bool,
}

/// Compute the widget's anchor frame.
#[must_use]
pub fn anchor_frame(input: &PlacementInput) -> Placement {
    let container = input.container.unwrap_or(DEFAULT_SCREEN);
    let mirrored = input.direction == LayoutDirection::RightToLeft;

    let base = if mirrored {
        // Bottom-left anchor; the X padding is expressed through the
        // mirror, not the origin.
        Rect::new(
            container.x,
            container.bottom() - input.size - input.keyboard_height - input.padding_y,
            input.size,
            input.size,
        )
    } else {
        let horizontal_margin = input.size + input.safe_area.right;
        let vertical_margin = input.size + input.keyboard_height + input.safe_area.bottom;
        Rect::new(
            container.right() - horizontal_margin - input.padding_x,
            container.bottom() - vertical_margin - input.padding_y,
            input.size,
            input.size,
        )
    };

    let frame = if input.friendly_tap {
        base.extended(input.padding_x, input.padding_y)
    } else {
        base
    };

    let visual_frame = Rect::new(
        frame.x + (frame.width - input.size) / 2.0,
        frame.y + (frame.height - input.size) / 2.0,
        input.size,
        input.size,
    );

    Placement {
        frame,
        visual_frame,
        mirrored,
    }
}

/// Sticky-mode origin: the bottom corner of the currently visible
/// region of a scrolling container.
#[must_use]
pub fn scrolled_origin(input: &PlacementInput, scroll_offset: Point) -> Point {
    let container = input.container.unwrap_or(DEFAULT_SCREEN);
    Point::new(
        container.width - input.size - input.padding_x + scroll_offset.x,
        container.height - input.size - input.padding_y + scroll_offset.y,
    )
}

/// Size derived from a caller-supplied custom frame.
#[must_use]
pub fn custom_frame_size(frame: Rect) -> f32 {
    frame.width.min(frame.height)
}
