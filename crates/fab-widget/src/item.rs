#![forbid(unsafe_code)]

//! Menu items: the entries a fab expands into.
//!
//! Items are owned by the widget's ordered registry. Each carries its
//! selectable payload (title, icon name, handler), its visual defaults
//! (propagated from the widget on add), and a shared [`VisualHandle`]
//! the animation timeline mutates.
//!
//! # Invariants
//!
//! - A freshly built item is transparent (`alpha == 0`) and centered on
//!   the widget; it becomes visible only through an open schedule.
//! - Cloning an item shares its handler and visual handle — clones are
//!   snapshots of the same on-screen entry, not new entries.

use std::rc::Rc;

use fab_core::{Point, Visual, VisualHandle};

use crate::style::Rgba;

/// Which side of an item its title label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPosition {
    #[default]
    Left,
    Right,
}

/// Selection callback, invoked with a snapshot of the activated item.
pub type ItemHandler = Rc<dyn Fn(&FabItem)>;

/// One entry of the expanded menu.
#[derive(Clone)]
pub struct FabItem {
    title: Option<String>,
    icon: Option<String>,
    handler: Option<ItemHandler>,
    size: f32,
    label_position: LabelPosition,
    hidden: bool,
    pub button_color: Rgba,
    pub title_color: Rgba,
    pub title_background: Rgba,
    pub title_corner_radius: f32,
    pub shadow_color: Rgba,
    /// Extra leading inset for the title label; nonzero only in
    /// cancel-less mode, where items are narrower than the main button.
    pub title_padding: f32,
    /// Whether the item participates in the visible hierarchy. The
    /// projected item[0] of a cancel-less widget stays detached.
    pub(crate) attached: bool,
    visual: VisualHandle,
}

impl FabItem {
    /// Start building an item.
    #[must_use]
    pub fn builder() -> FabItemBuilder {
        FabItemBuilder::default()
    }

    /// Shorthand for a titled item with a handler.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> FabItemBuilder {
        FabItemBuilder::default().title(title)
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    #[must_use]
    pub fn handler(&self) -> Option<ItemHandler> {
        self.handler.clone()
    }

    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    #[must_use]
    pub fn label_position(&self) -> LabelPosition {
        self.label_position
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Hide or show the item. Hidden items are skipped by animation
    /// schedules and consume no stack space.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Current animated state (offset relative to the widget, opacity,
    /// scale).
    #[must_use]
    pub fn visual(&self) -> Visual {
        self.visual.get()
    }

    /// Shared handle the timeline animates.
    #[must_use]
    pub fn visual_handle(&self) -> VisualHandle {
        self.visual.clone()
    }

    /// Place the item centered against the widget button: offset
    /// `(big - small) / 2` on both axes, where `big`/`small` order the
    /// widget size and the item size.
    pub fn center_on(&self, widget_size: f32) {
        let big = widget_size.max(self.size);
        let small = widget_size.min(self.size);
        let centered = (big - small) / 2.0;
        self.visual.update(|v| {
            v.offset = Point::new(centered, v.offset.y);
        });
    }
}

impl std::fmt::Debug for FabItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FabItem")
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("has_handler", &self.handler.is_some())
            .field("size", &self.size)
            .field("hidden", &self.hidden)
            .field("attached", &self.attached)
            .field("visual", &self.visual.get())
            .finish()
    }
}

/// Builder covering the construction shapes the widget API exposes
/// (title-only, icon-only, title + icon + handler, explicit label
/// position).
#[derive(Default)]
pub struct FabItemBuilder {
    title: Option<String>,
    icon: Option<String>,
    handler: Option<ItemHandler>,
    size: Option<f32>,
    label_position: LabelPosition,
    hidden: bool,
}

impl FabItemBuilder {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn handler(mut self, handler: impl Fn(&FabItem) + 'static) -> Self {
        self.handler = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn label_position(mut self, position: LabelPosition) -> Self {
        self.label_position = position;
        self
    }

    /// Override the widget's default item size.
    #[must_use]
    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Finish with the widget-provided defaults.
    #[must_use]
    pub fn build(self, defaults: &ItemDefaults) -> FabItem {
        FabItem {
            title: self.title,
            icon: self.icon,
            handler: self.handler,
            size: self.size.unwrap_or(defaults.size),
            label_position: self.label_position,
            hidden: self.hidden,
            button_color: defaults.button_color,
            title_color: defaults.title_color,
            title_background: defaults.title_background,
            title_corner_radius: defaults.title_corner_radius,
            shadow_color: defaults.shadow_color,
            title_padding: defaults.title_padding,
            attached: false,
            visual: VisualHandle::new(Visual::hidden()),
        }
    }
}

/// Visual defaults a widget stamps onto every added item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDefaults {
    pub size: f32,
    pub button_color: Rgba,
    pub title_color: Rgba,
    pub title_background: Rgba,
    pub title_corner_radius: f32,
    pub shadow_color: Rgba,
    pub title_padding: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn defaults() -> ItemDefaults {
        ItemDefaults {
            size: 42.0,
            button_color: Rgba::WHITE,
            title_color: Rgba::WHITE,
            title_background: Rgba::CLEAR,
            title_corner_radius: 5.0,
            shadow_color: Rgba::BLACK,
            title_padding: 0.0,
        }
    }

    #[test]
    fn builder_applies_defaults() {
        let item = FabItem::titled("Map").build(&defaults());
        assert_eq!(item.title(), Some("Map"));
        assert_eq!(item.size(), 42.0);
        assert_eq!(item.button_color, Rgba::WHITE);
        assert!(!item.is_hidden());
    }

    #[test]
    fn builder_size_overrides_default() {
        let item = FabItem::builder().size(30.0).build(&defaults());
        assert_eq!(item.size(), 30.0);
    }

    #[test]
    fn new_items_start_invisible() {
        let item = FabItem::titled("Map").build(&defaults());
        assert_eq!(item.visual().alpha, 0.0);
    }

    #[test]
    fn center_on_larger_widget() {
        let item = FabItem::builder().build(&defaults());
        item.center_on(56.0);
        assert_eq!(item.visual().offset.x, 7.0);
    }

    #[test]
    fn center_on_smaller_widget() {
        let item = FabItem::builder().size(60.0).build(&defaults());
        item.center_on(56.0);
        assert_eq!(item.visual().offset.x, 2.0);
    }

    #[test]
    fn clones_share_visual_state() {
        let item = FabItem::titled("Map").build(&defaults());
        let snapshot = item.clone();
        item.visual_handle().update(|v| v.alpha = 1.0);
        assert_eq!(snapshot.visual().alpha, 1.0);
    }

    #[test]
    fn handler_receives_snapshot() {
        let called = Rc::new(Cell::new(false));
        let c = Rc::clone(&called);
        let item = FabItem::titled("Map")
            .handler(move |it| {
                assert_eq!(it.title(), Some("Map"));
                c.set(true);
            })
            .build(&defaults());
        let handler = item.handler().unwrap();
        handler(&item.clone());
        assert!(called.get());
    }
}
