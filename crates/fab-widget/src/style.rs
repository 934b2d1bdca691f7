#![forbid(unsafe_code)]

//! Color and text-metric primitives for the widget.
//!
//! Rendering itself happens in the host layer; the widget only carries
//! the style values the host draws with, plus the font metrics it needs
//! to size the title label before the host ever sees it.

use fab_core::{Insets, Size};
use unicode_width::UnicodeWidthStr;

/// An RGBA color: 8-bit channels plus a float opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Rgba {
    /// Opaque color from RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Same channels with a different opacity.
    #[must_use]
    pub const fn with_opacity(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fully transparent ("clear") — used as the no-background marker
    /// for title labels.
    pub const CLEAR: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        alpha: 0.0,
    };
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Default main-button fill.
pub const DEFAULT_BUTTON_COLOR: Rgba = Rgba::rgb(73, 151, 241);
/// Default icon stroke color.
pub const DEFAULT_PLUS_COLOR: Rgba = Rgba::rgb(51, 51, 51);
/// Default translucent backdrop behind the open menu.
pub const DEFAULT_OVERLAY_COLOR: Rgba = Rgba::BLACK.with_opacity(0.3);

/// Title-label text insets applied when the label has a visible
/// background.
pub const TITLE_TEXT_INSETS: Insets = Insets::new(3.0, 6.0, 3.0, 6.0);

/// Monospace-ish metrics for sizing title labels without a rasterizer.
///
/// The host may substitute exact metrics; these defaults keep layout
/// deterministic in tests and acceptable on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Horizontal advance per display column.
    pub advance: f32,
    /// Line height of a single-line label.
    pub line_height: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            advance: 7.5,
            line_height: 16.0,
        }
    }
}

impl FontMetrics {
    /// Size of a single-line text run, before label insets.
    #[must_use]
    pub fn measure(&self, text: &str) -> Size {
        let columns = UnicodeWidthStr::width(text) as f32;
        Size::new(columns * self.advance, self.line_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_does_not_touch_channels() {
        let c = Rgba::rgb(10, 20, 30).with_opacity(0.5);
        assert_eq!((c.r, c.g, c.b), (10, 20, 30));
        assert_eq!(c.alpha, 0.5);
    }

    #[test]
    fn clear_is_clear() {
        assert!(Rgba::CLEAR.is_clear());
        assert!(!Rgba::WHITE.is_clear());
    }

    #[test]
    fn measure_scales_with_display_width() {
        let metrics = FontMetrics::default();
        let narrow = metrics.measure("Map");
        let wide = metrics.measure("Map View");
        assert!(wide.width > narrow.width);
        assert_eq!(narrow.height, metrics.line_height);
    }

    #[test]
    fn measure_counts_wide_graphemes_as_two_columns() {
        let metrics = FontMetrics::default();
        let cjk = metrics.measure("地図");
        assert_eq!(cjk.width, 4.0 * metrics.advance);
    }

    #[test]
    fn measure_empty_is_zero_width() {
        let metrics = FontMetrics::default();
        assert_eq!(metrics.measure("").width, 0.0);
    }
}
