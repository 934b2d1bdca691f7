#![forbid(unsafe_code)]

//! The floating action button itself.
//!
//! [`Fab`] is a cheaply cloneable handle over shared single-threaded
//! state; clones refer to the same widget. The host drives it with
//! input events (`press_began`/`press_ended`, `overlay_tapped`) and
//! timeline ticks, and reads visuals back out for drawing.
//!
//! # Invariants
//!
//! 1. `closed` is the single source of truth for open/closed. It flips
//!    only inside a transition's aggregate continuation, and only if
//!    that transition is still the most recently started one, so
//!    overlapping `open(); close();` converges to `closed == true`.
//! 2. The synchronous `opened`/`closed` delegate notifications fire at
//!    call time, decoupled from animation completion; `did_open`/
//!    `did_close` fire from the aggregate continuation.
//! 3. The overlay is only removed on close if its enter animation had
//!    completed (it is never torn down mid-entrance).
//! 4. Delegate and item-handler callbacks run with no internal borrow
//!    held, so they may re-enter any widget method.
//!
//! # Failure Modes
//!
//! - `open()` with zero items is a no-op.
//! - Out-of-range item operations return `None`/do nothing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use fab_core::{
    CompletionGroup, Easing, Insets, Point, Rect, Timeline, Tween, Visual, VisualHandle,
};

use crate::animation::{
    animator, AnimationContext, ItemLayout, OpenAnimationType, Schedule, TweenTarget,
    VerticalDirection, OPEN_SPRING,
};
use crate::delegate::{DelegateSlot, FabDelegate};
use crate::item::{FabItem, FabItemBuilder, ItemDefaults, LabelPosition};
use crate::label::TitleLabel;
use crate::overlay::Overlay;
use crate::placement::{
    anchor_frame, custom_frame_size, scrolled_origin, LayoutDirection, Placement, PlacementInput,
};
use crate::reactivity::HostSignals;
use crate::style::{
    FontMetrics, Rgba, DEFAULT_BUTTON_COLOR, DEFAULT_OVERLAY_COLOR, DEFAULT_PLUS_COLOR,
};

const BUTTON_TRANSITION_DURATION: f32 = 0.3;
const CLOSE_SPRING: Easing = Easing::Spring {
    damping: 0.6,
    velocity: 0.8,
};
const KEYBOARD_GLIDE_DURATION: f32 = 0.2;

/// Construction-time configuration, builder style.
#[derive(Debug, Clone)]
pub struct FabConfig {
    pub size: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub item_space: f32,
    pub item_size: f32,
    /// Plus-icon rotation in the open state, degrees.
    pub rotation_degrees: f32,
    /// Per-item stagger interval, seconds.
    pub animation_speed: f32,
    pub open_animation_type: OpenAnimationType,
    pub vertical_direction: VerticalDirection,
    pub has_cancel_button: bool,
    pub friendly_tap: bool,
    pub sticky: bool,
    pub responds_to_keyboard: bool,
    pub auto_close_on_tap: bool,
    pub direction: LayoutDirection,
    pub label_position: LabelPosition,
    pub button_color: Rgba,
    pub plus_color: Rgba,
    pub overlay_color: Rgba,
    pub item_button_color: Rgba,
    pub item_title_color: Rgba,
    pub item_title_background: Rgba,
    pub item_shadow_color: Rgba,
    pub title_corner_radius: f32,
    pub font_metrics: FontMetrics,
    /// Caller-owned frame; placement recomputation is skipped and
    /// `size` is derived as `min(width, height)`.
    pub custom_frame: Option<Rect>,
}

impl Default for FabConfig {
    fn default() -> Self {
        Self {
            size: 56.0,
            padding_x: 14.0,
            padding_y: 14.0,
            item_space: 14.0,
            item_size: 42.0,
            rotation_degrees: -45.0,
            animation_speed: 0.1,
            open_animation_type: OpenAnimationType::default(),
            vertical_direction: VerticalDirection::default(),
            has_cancel_button: true,
            friendly_tap: true,
            sticky: false,
            responds_to_keyboard: true,
            auto_close_on_tap: true,
            direction: LayoutDirection::default(),
            label_position: LabelPosition::default(),
            button_color: DEFAULT_BUTTON_COLOR,
            plus_color: DEFAULT_PLUS_COLOR,
            overlay_color: DEFAULT_OVERLAY_COLOR,
            item_button_color: Rgba::WHITE,
            item_title_color: Rgba::WHITE,
            item_title_background: Rgba::CLEAR,
            item_shadow_color: Rgba::BLACK.with_opacity(0.4),
            title_corner_radius: 5.0,
            font_metrics: FontMetrics::default(),
            custom_frame: None,
        }
    }
}

macro_rules! config_setters {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[must_use]
            pub fn $name(mut self, value: $ty) -> Self {
                self.$name = value;
                self
            }
        )*
    };
}

impl FabConfig {
    config_setters! {
        size: f32,
        padding_x: f32,
        padding_y: f32,
        item_space: f32,
        item_size: f32,
        rotation_degrees: f32,
        animation_speed: f32,
        open_animation_type: OpenAnimationType,
        vertical_direction: VerticalDirection,
        has_cancel_button: bool,
        friendly_tap: bool,
        sticky: bool,
        responds_to_keyboard: bool,
        auto_close_on_tap: bool,
        direction: LayoutDirection,
        label_position: LabelPosition,
        button_color: Rgba,
        plus_color: Rgba,
        overlay_color: Rgba,
        title_corner_radius: f32,
        custom_frame: Option<Rect>,
    }
}

struct FabInner {
    config: FabConfig,
    size: f32,
    closed: bool,
    items: Vec<FabItem>,
    label: Option<TitleLabel>,
    overlay: Overlay,
    delegate: DelegateSlot,
    subscriptions: fab_core::SubscriptionSet,

    container: Option<Rect>,
    safe_area: Insets,
    keyboard_height: f32,
    frame: Rect,
    visual_frame: Rect,
    mirrored: bool,

    button_visual: VisualHandle,
    button_icon: Option<String>,
    saved_icon: Option<Option<String>>,
    pressed: bool,

    /// Bumped per transition; the continuation whose epoch is still
    /// current owns the authoritative `closed` flip.
    epoch: u64,
    opening_in_flight: bool,
    closing_in_flight: bool,
    overlay_open_complete: bool,
}

impl FabInner {
    fn new(config: FabConfig) -> Self {
        let size = match config.custom_frame {
            Some(frame) => custom_frame_size(frame),
            None => config.size,
        };
        let overlay = Overlay::new(config.overlay_color);
        let mut inner = Self {
            size,
            closed: true,
            items: Vec::new(),
            label: None,
            overlay,
            delegate: DelegateSlot::default(),
            subscriptions: fab_core::SubscriptionSet::new(),
            container: None,
            safe_area: Insets::ZERO,
            keyboard_height: 0.0,
            frame: Rect::default(),
            visual_frame: Rect::default(),
            mirrored: false,
            button_visual: VisualHandle::new(Visual::default()),
            button_icon: None,
            saved_icon: None,
            pressed: false,
            epoch: 0,
            opening_in_flight: false,
            closing_in_flight: false,
            overlay_open_complete: true,
            config,
        };
        match inner.config.custom_frame {
            Some(frame) => {
                inner.frame = frame;
                inner.visual_frame = Rect::new(
                    frame.x + (frame.width - inner.size) / 2.0,
                    frame.y + (frame.height - inner.size) / 2.0,
                    inner.size,
                    inner.size,
                );
            }
            None => inner.recompute_placement(),
        }
        inner
    }

    fn placement_input(&self) -> PlacementInput {
        PlacementInput {
            container: self.container,
            size: self.size,
            padding_x: self.config.padding_x,
            padding_y: self.config.padding_y,
            safe_area: self.safe_area,
            keyboard_height: self.keyboard_height,
            friendly_tap: self.config.friendly_tap,
            direction: self.config.direction,
        }
    }

    fn recompute_placement(&mut self) {
        if self.config.custom_frame.is_some() {
            return;
        }
        let Placement {
            frame,
            visual_frame,
            mirrored,
        } = anchor_frame(&self.placement_input());
        self.frame = frame;
        self.visual_frame = visual_frame;
        self.mirrored = mirrored;
        if let Some(label) = self.label.as_mut() {
            label.mirrored = mirrored;
        }
        if self.overlay.is_attached() {
            if let Some(container) = self.container {
                self.overlay.set_frame(container);
            }
        }
    }

    fn item_defaults(&self) -> ItemDefaults {
        ItemDefaults {
            size: self.config.item_size,
            button_color: self.config.item_button_color,
            title_color: self.config.item_title_color,
            title_background: self.config.item_title_background,
            title_corner_radius: self.config.title_corner_radius,
            shadow_color: self.config.item_shadow_color,
            title_padding: 0.0,
        }
    }

    fn title_padding_for(&self, item_size: f32) -> f32 {
        if self.config.has_cancel_button {
            0.0
        } else {
            (self.size - item_size) / 2.0
        }
    }

    /// Re-derive which items live in the visible hierarchy: in
    /// cancel-less mode item 0 is projected, never attached.
    fn refresh_attachment(&mut self) {
        let cancel_less = !self.config.has_cancel_button;
        for (index, item) in self.items.iter_mut().enumerate() {
            item.attached = !(cancel_less && index == 0);
            item.title_padding = if cancel_less {
                (self.size - item.size()) / 2.0
            } else {
                0.0
            };
        }
    }

    fn cancel_less(&self) -> bool {
        !self.config.has_cancel_button
    }

    /// Put the label in its resting place for the current projection,
    /// creating it on first use.
    fn project_label(&mut self) -> Point {
        let text = self.items.first().and_then(|i| i.title()).map(String::from);
        let metrics = self.config.font_metrics;
        let position = self.config.label_position;
        let size = self.size;
        let mirrored = self.mirrored;
        let label = self.label.get_or_insert_with(|| {
            TitleLabel::new(
                self.config.item_title_color,
                self.config.item_title_background,
                self.config.title_corner_radius,
            )
        });
        label.mirrored = mirrored;
        label.set_text(text, &metrics);
        label.position(position, size);
        label.visual().offset
    }

    fn animation_context(&self) -> AnimationContext {
        AnimationContext {
            items: self
                .items
                .iter()
                .map(|item| ItemLayout {
                    size: item.size(),
                    hidden: item.is_hidden(),
                })
                .collect(),
            cancel_less: self.cancel_less(),
            animation_speed: self.config.animation_speed,
            item_space: self.config.item_space,
            vertical_direction: self.config.vertical_direction,
            widget_size: self.size,
            container_width: self
                .container
                .unwrap_or(crate::placement::DEFAULT_SCREEN)
                .width,
            anchor_x: self.frame.x,
            label_offset: self
                .label
                .as_ref()
                .map(|l| l.visual().offset)
                .unwrap_or(Point::ZERO),
        }
    }

    fn resolve(&self, target: TweenTarget) -> Option<VisualHandle> {
        match target {
            TweenTarget::Item(index) => self.items.get(index).map(FabItem::visual_handle),
            TweenTarget::TitleLabel => self.label.as_ref().map(TitleLabel::visual_handle),
        }
    }
}

/// Cloneable handle to one floating action button.
#[derive(Clone)]
pub struct Fab {
    inner: Rc<RefCell<FabInner>>,
    timeline: Rc<RefCell<Timeline>>,
}

#[derive(Clone)]
struct WeakFab {
    inner: Weak<RefCell<FabInner>>,
    timeline: Weak<RefCell<Timeline>>,
}

impl WeakFab {
    fn upgrade(&self) -> Option<Fab> {
        Some(Fab {
            inner: self.inner.upgrade()?,
            timeline: self.timeline.upgrade()?,
        })
    }
}

impl Default for Fab {
    fn default() -> Self {
        Self::new()
    }
}

impl Fab {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FabConfig::default())
    }

    #[must_use]
    pub fn with_config(config: FabConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(FabInner::new(config))),
            timeline: Rc::new(RefCell::new(Timeline::new())),
        }
    }

    fn downgrade(&self) -> WeakFab {
        WeakFab {
            inner: Rc::downgrade(&self.inner),
            timeline: Rc::downgrade(&self.timeline),
        }
    }

    // ---- lifecycle -------------------------------------------------

    /// Subscribe to the host's signals and compute the initial anchor.
    pub fn attach(&self, signals: &HostSignals, safe_area: Insets) {
        self.detach();
        {
            let mut inner = self.inner.borrow_mut();
            inner.container = Some(signals.container_bounds.get());
            inner.safe_area = safe_area;
            inner.keyboard_height = signals.keyboard_height.get();
            inner.recompute_placement();
        }
        tracing::debug!(frame = ?self.frame(), "fab attached");

        let mut subs = fab_core::SubscriptionSet::new();

        let weak = self.downgrade();
        subs.hold(signals.container_bounds.subscribe(move |bounds| {
            if let Some(fab) = weak.upgrade() {
                fab.container_changed(*bounds);
            }
        }));

        let weak = self.downgrade();
        subs.hold(signals.orientation.subscribe(move |change| {
            if let Some(fab) = weak.upgrade() {
                fab.orientation_changed(change.keyboard_height);
            }
        }));

        let weak = self.downgrade();
        subs.hold(signals.keyboard_height.subscribe(move |height| {
            if let Some(fab) = weak.upgrade() {
                fab.keyboard_changed(*height);
            }
        }));

        let weak = self.downgrade();
        subs.hold(signals.scroll_offset.subscribe(move |offset| {
            if let Some(fab) = weak.upgrade() {
                fab.scrolled(*offset);
            }
        }));

        self.inner.borrow_mut().subscriptions = subs;
    }

    /// Drop all host subscriptions; no callback fires after this.
    pub fn detach(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.subscriptions.clear();
        inner.container = None;
    }

    fn container_changed(&self, bounds: Rect) {
        let mut inner = self.inner.borrow_mut();
        inner.container = Some(bounds);
        if inner.config.custom_frame.is_some() {
            inner.size = custom_frame_size(inner.frame);
        } else {
            inner.recompute_placement();
        }
    }

    fn orientation_changed(&self, keyboard_height: f32) {
        let mut inner = self.inner.borrow_mut();
        if inner.config.responds_to_keyboard {
            inner.keyboard_height = keyboard_height;
        }
        inner.recompute_placement();
        tracing::debug!(frame = ?inner.frame, "orientation change");
    }

    fn keyboard_changed(&self, height: f32) {
        let glide = {
            let mut inner = self.inner.borrow_mut();
            if !inner.config.responds_to_keyboard
                || inner.config.sticky
                || inner.config.custom_frame.is_some()
            {
                return;
            }
            let old_y = inner.frame.y;
            inner.keyboard_height = height;
            inner.recompute_placement();
            let dy = old_y - inner.frame.y;
            if dy == 0.0 {
                return;
            }
            // Stage the button at its old on-screen position and glide
            // it into the new frame.
            inner
                .button_visual
                .update(|v| v.offset = Point::new(0.0, dy));
            let to = inner.button_visual.get().with_offset(Point::ZERO);
            (inner.button_visual.clone(), to)
        };
        self.timeline.borrow_mut().schedule(Tween::new(
            glide.0,
            glide.1,
            0.0,
            KEYBOARD_GLIDE_DURATION,
            Easing::EaseInOut,
        ));
    }

    fn scrolled(&self, offset: Point) {
        let mut inner = self.inner.borrow_mut();
        if !inner.config.sticky || inner.config.custom_frame.is_some() {
            return;
        }
        let origin = scrolled_origin(&inner.placement_input(), offset);
        let delta = origin - inner.frame.origin();
        inner.frame = inner.frame.translated(delta);
        inner.visual_frame = inner.visual_frame.translated(delta);
    }

    // ---- item registry ---------------------------------------------

    /// Add a built item; returns its registration index.
    pub fn add_item(&self, builder: FabItemBuilder) -> usize {
        let mut inner = self.inner.borrow_mut();
        let mut item = builder.build(&inner.item_defaults());
        item.title_padding = inner.title_padding_for(item.size());
        item.attached = inner.config.has_cancel_button || !inner.items.is_empty();
        item.center_on(inner.size);
        inner.items.push(item);
        inner.items.len() - 1
    }

    /// Title-only item.
    pub fn add_titled(&self, title: impl Into<String>) -> usize {
        self.add_item(FabItem::titled(title))
    }

    /// Title + selection handler.
    pub fn add_titled_with(
        &self,
        title: impl Into<String>,
        handler: impl Fn(&FabItem) + 'static,
    ) -> usize {
        self.add_item(FabItem::titled(title).handler(handler))
    }

    /// Title + icon + handler, with an explicit label side.
    pub fn add_full(
        &self,
        title: impl Into<String>,
        icon: impl Into<String>,
        position: LabelPosition,
        handler: impl Fn(&FabItem) + 'static,
    ) -> usize {
        self.add_item(
            FabItem::titled(title)
                .icon(icon)
                .label_position(position)
                .handler(handler),
        )
    }

    /// Remove the item at `index`. Out of range is a no-op returning
    /// `None`. Removing the projected item 0 in cancel-less mode
    /// promotes the next item: attachment flags are re-derived and, if
    /// the menu is open, the label text refreshes immediately.
    pub fn remove_item(&self, index: usize) -> Option<FabItem> {
        let mut inner = self.inner.borrow_mut();
        if index >= inner.items.len() {
            return None;
        }
        let removed = inner.items.remove(index);
        inner.refresh_attachment();
        if inner.cancel_less() && index == 0 && !inner.closed {
            inner.project_label();
        }
        Some(removed)
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Snapshot of the item at `index` (shares visual state and
    /// handler with the registry entry).
    #[must_use]
    pub fn item(&self, index: usize) -> Option<FabItem> {
        self.inner.borrow().items.get(index).cloned()
    }

    #[must_use]
    pub fn items(&self) -> Vec<FabItem> {
        self.inner.borrow().items.clone()
    }

    /// Invoke the handler of the item at `index` as if tapped, closing
    /// the menu afterwards when `auto_close_on_tap` is set. Ignored
    /// while closed, for hidden items, and out of range.
    pub fn activate_item(&self, index: usize) {
        let (handler, snapshot, auto_close) = {
            let inner = self.inner.borrow();
            if inner.closed {
                return;
            }
            let Some(item) = inner.items.get(index) else {
                return;
            };
            if item.is_hidden() {
                return;
            }
            (item.handler(), item.clone(), inner.config.auto_close_on_tap)
        };
        tracing::debug!(index, "item activated");
        if let Some(handler) = handler {
            handler(&snapshot);
        }
        if auto_close {
            self.close();
        }
    }

    // ---- configuration ---------------------------------------------

    pub fn set_delegate(&self, delegate: Option<Weak<dyn FabDelegate>>) {
        self.inner.borrow_mut().delegate.set(delegate);
    }

    pub fn set_size(&self, size: f32) {
        let mut inner = self.inner.borrow_mut();
        if inner.config.custom_frame.is_some() {
            return;
        }
        inner.config.size = size;
        inner.size = size;
        inner.recompute_placement();
        inner.refresh_attachment();
        for item in &inner.items {
            item.center_on(size);
        }
    }

    pub fn set_paddings(&self, x: f32, y: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.config.padding_x = x;
        inner.config.padding_y = y;
        inner.recompute_placement();
    }

    pub fn set_open_animation_type(&self, kind: OpenAnimationType) {
        self.inner.borrow_mut().config.open_animation_type = kind;
    }

    pub fn set_animation_speed(&self, speed: f32) {
        self.inner.borrow_mut().config.animation_speed = speed;
    }

    pub fn set_vertical_direction(&self, direction: VerticalDirection) {
        self.inner.borrow_mut().config.vertical_direction = direction;
    }

    pub fn set_layout_direction(&self, direction: LayoutDirection) {
        let mut inner = self.inner.borrow_mut();
        inner.config.direction = direction;
        inner.recompute_placement();
    }

    pub fn set_friendly_tap(&self, friendly: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.config.friendly_tap = friendly;
        inner.recompute_placement();
    }

    pub fn set_sticky(&self, sticky: bool) {
        self.inner.borrow_mut().config.sticky = sticky;
    }

    pub fn set_responds_to_keyboard(&self, responds: bool) {
        self.inner.borrow_mut().config.responds_to_keyboard = responds;
    }

    /// Toggle cancel-less mode at runtime; item attachment and title
    /// paddings are re-derived.
    pub fn set_has_cancel_button(&self, has: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.config.has_cancel_button = has;
        inner.refresh_attachment();
    }

    pub fn set_button_icon(&self, icon: Option<String>) {
        self.inner.borrow_mut().button_icon = icon;
    }

    // ---- state -----------------------------------------------------

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.borrow().closed
    }

    #[must_use]
    pub fn frame(&self) -> Rect {
        self.inner.borrow().frame
    }

    /// The drawn circle, centered in [`Fab::frame`] under friendly tap.
    #[must_use]
    pub fn visual_frame(&self) -> Rect {
        self.inner.borrow().visual_frame
    }

    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.inner.borrow().mirrored
    }

    #[must_use]
    pub fn button_visual(&self) -> Visual {
        self.inner.borrow().button_visual.get()
    }

    #[must_use]
    pub fn button_icon(&self) -> Option<String> {
        self.inner.borrow().button_icon.clone()
    }

    #[must_use]
    pub fn overlay(&self) -> Overlay {
        self.inner.borrow().overlay.clone()
    }

    #[must_use]
    pub fn title_label(&self) -> Option<TitleLabel> {
        self.inner.borrow().label.clone()
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.inner.borrow().pressed
    }

    /// Whether any transition tweens are still running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.timeline.borrow().is_idle()
    }

    // ---- input -----------------------------------------------------

    /// Press started inside the widget: show the tint.
    pub fn press_began(&self, point: Point) {
        let mut inner = self.inner.borrow_mut();
        if inner.frame.contains(point) {
            inner.pressed = true;
        }
    }

    /// Press released: drop the tint, and toggle if the widget has a
    /// cancel button or the release point is still inside the tappable
    /// frame.
    pub fn press_ended(&self, point: Point) {
        let toggle = {
            let mut inner = self.inner.borrow_mut();
            inner.pressed = false;
            inner.config.has_cancel_button || inner.frame.contains(point)
        };
        if toggle {
            self.toggle();
        }
    }

    /// A tap on the backdrop closes the menu, but only once the enter
    /// animation has finished arming it.
    pub fn overlay_tapped(&self) {
        if self.inner.borrow().overlay.is_armed() {
            self.close();
        }
    }

    // ---- transitions -----------------------------------------------

    /// Open, close, or select, depending on state and item count.
    pub fn toggle(&self) {
        let (count, closed, cancel_less) = {
            let inner = self.inner.borrow();
            (inner.items.len(), inner.closed, inner.cancel_less())
        };
        if count == 0 {
            tracing::debug!("toggle with no items");
            self.with_delegate(|d, fab| d.empty_selected(fab));
            return;
        }
        if closed {
            if cancel_less && count == 1 {
                self.invoke_first_handler();
            } else {
                self.open();
            }
        } else {
            if cancel_less {
                self.invoke_first_handler();
            }
            self.close();
        }
    }

    fn invoke_first_handler(&self) {
        let pair = {
            let inner = self.inner.borrow();
            inner
                .items
                .first()
                .map(|item| (item.handler(), item.clone()))
        };
        if let Some((Some(handler), snapshot)) = pair {
            handler(&snapshot);
        }
    }

    /// Start the open transition. No-op with zero items; while an open
    /// is already in flight only the delegate notifications repeat.
    pub fn open(&self) {
        if self.inner.borrow().items.is_empty() {
            return;
        }
        self.with_delegate(|d, fab| d.will_open(fab));

        if self.inner.borrow().opening_in_flight {
            self.with_delegate(|d, fab| d.opened(fab));
            return;
        }

        // `will_open` may have mutated the registry re-entrantly.
        if self.inner.borrow().items.is_empty() {
            return;
        }

        let group = CompletionGroup::new();
        let epoch;
        {
            let mut inner = self.inner.borrow_mut();
            inner.epoch += 1;
            epoch = inner.epoch;
            inner.opening_in_flight = true;

            if inner.cancel_less() {
                let icon = inner.items.first().and_then(FabItem::icon).map(String::from);
                inner.saved_icon = Some(inner.button_icon.take());
                inner.button_icon = icon;
                inner.project_label();
            }

            let container = inner
                .container
                .unwrap_or(crate::placement::DEFAULT_SCREEN);
            inner.overlay.attach(container);
            inner.overlay_open_complete = false;

            let mut timeline = self.timeline.borrow_mut();

            // Overlay fade-in; arming happens on completion.
            let ticket = group.ticket();
            let weak = self.downgrade();
            let overlay_in = inner.overlay.visual().with_alpha(1.0);
            timeline.schedule(
                Tween::new(
                    inner.overlay.visual_handle(),
                    overlay_in,
                    0.0,
                    BUTTON_TRANSITION_DURATION,
                    OPEN_SPRING,
                )
                .on_complete(move || {
                    if let Some(fab) = weak.upgrade() {
                        let mut inner = fab.inner.borrow_mut();
                        inner.overlay_open_complete = true;
                        inner.overlay.arm();
                    }
                    ticket.complete();
                }),
            );

            // Plus-icon rotation, cancel-button widgets only.
            if inner.config.has_cancel_button {
                let ticket = group.ticket();
                let to = inner
                    .button_visual
                    .get()
                    .with_rotation(inner.config.rotation_degrees);
                timeline.schedule(
                    Tween::new(
                        inner.button_visual.clone(),
                        to,
                        0.0,
                        BUTTON_TRANSITION_DURATION,
                        OPEN_SPRING,
                    )
                    .on_complete(move || ticket.complete()),
                );
            }

            let ctx = inner.animation_context();
            let schedule = animator(inner.config.open_animation_type).schedule_open(&ctx);
            drop(timeline);
            self.apply_schedule(&inner, schedule, &group);
            tracing::debug!(
                epoch,
                items = inner.items.len(),
                kind = ?inner.config.open_animation_type,
                "opening"
            );
        }

        self.with_delegate(|d, fab| d.opened(fab));

        let weak = self.downgrade();
        group.notify(move || {
            if let Some(fab) = weak.upgrade() {
                let authoritative = {
                    let mut inner = fab.inner.borrow_mut();
                    inner.opening_in_flight = false;
                    if inner.epoch == epoch {
                        inner.closed = false;
                        true
                    } else {
                        false
                    }
                };
                tracing::debug!(epoch, authoritative, "open complete");
                fab.with_delegate(|d, f| d.did_open(f));
            }
        });
    }

    /// Start the close transition. While a close is already in flight
    /// only the delegate notifications repeat.
    pub fn close(&self) {
        self.with_delegate(|d, fab| d.will_close(fab));

        if self.inner.borrow().closing_in_flight {
            self.with_delegate(|d, fab| d.closed(fab));
            return;
        }

        let group = CompletionGroup::new();
        let epoch;
        {
            let mut inner = self.inner.borrow_mut();
            inner.epoch += 1;
            epoch = inner.epoch;
            inner.closing_in_flight = true;

            if inner.cancel_less() {
                if let Some(previous) = inner.saved_icon.take() {
                    inner.button_icon = previous;
                }
            }

            let mut timeline = self.timeline.borrow_mut();

            // The overlay comes down whenever it is up, even if the
            // registry was drained while open; removal only if the
            // enter animation had completed.
            if inner.overlay.is_attached() {
                inner.overlay.disarm();
                let ticket = group.ticket();
                let weak = self.downgrade();
                let overlay_out = inner.overlay.visual().with_alpha(0.0);
                timeline.schedule(
                    Tween::new(
                        inner.overlay.visual_handle(),
                        overlay_out,
                        0.0,
                        BUTTON_TRANSITION_DURATION,
                        CLOSE_SPRING,
                    )
                    .on_complete(move || {
                        if let Some(fab) = weak.upgrade() {
                            let mut inner = fab.inner.borrow_mut();
                            if inner.overlay_open_complete {
                                inner.overlay.detach();
                            }
                        }
                        ticket.complete();
                    }),
                );
            }

            if inner.config.has_cancel_button {
                let ticket = group.ticket();
                let to = inner.button_visual.get().with_rotation(0.0);
                timeline.schedule(
                    Tween::new(
                        inner.button_visual.clone(),
                        to,
                        0.0,
                        BUTTON_TRANSITION_DURATION,
                        CLOSE_SPRING,
                    )
                    .on_complete(move || ticket.complete()),
                );
            }

            let ctx = inner.animation_context();
            let schedule = animator(inner.config.open_animation_type).schedule_close(&ctx);
            drop(timeline);
            self.apply_schedule(&inner, schedule, &group);
            tracing::debug!(epoch, items = inner.items.len(), "closing");
        }

        self.with_delegate(|d, fab| d.closed(fab));

        let weak = self.downgrade();
        group.notify(move || {
            if let Some(fab) = weak.upgrade() {
                let authoritative = {
                    let mut inner = fab.inner.borrow_mut();
                    inner.closing_in_flight = false;
                    if inner.epoch == epoch {
                        inner.closed = true;
                        true
                    } else {
                        false
                    }
                };
                tracing::debug!(epoch, authoritative, "close complete");
                fab.with_delegate(|d, f| d.did_close(f));
            }
        });
    }

    fn apply_schedule(&self, inner: &FabInner, schedule: Schedule, group: &CompletionGroup) {
        for (target, visual) in schedule.instants {
            if let Some(handle) = inner.resolve(target) {
                handle.set(visual);
            }
        }
        let mut timeline = self.timeline.borrow_mut();
        for spec in schedule.tweens {
            let Some(handle) = inner.resolve(spec.target) else {
                continue;
            };
            if let Some(prepare) = spec.prepare {
                handle.set(prepare);
            }
            let ticket = group.ticket();
            timeline.schedule(
                Tween::new(handle, spec.to, spec.delay, spec.duration, spec.easing)
                    .on_complete(move || ticket.complete()),
            );
        }
    }

    // ---- driving ---------------------------------------------------

    /// Advance all animations by `dt` seconds and run whatever
    /// completed. Delegate callbacks triggered by completions run here,
    /// with no internal borrow held.
    pub fn tick(&self, dt: f32) {
        let completions = self.timeline.borrow_mut().advance(dt);
        for completion in completions {
            completion();
        }
    }

    /// Advance by wall-clock time since the previous call.
    pub fn tick_wall(&self) {
        let completions = self.timeline.borrow_mut().tick();
        for completion in completions {
            completion();
        }
    }

    fn with_delegate(&self, f: impl FnOnce(&dyn FabDelegate, &Fab)) {
        let delegate = self.inner.borrow().delegate.get();
        if let Some(delegate) = delegate {
            f(&*delegate, self);
        }
    }
}

impl std::fmt::Debug for Fab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Fab")
            .field("closed", &inner.closed)
            .field("items", &inner.items.len())
            .field("frame", &inner.frame)
            .field("animating", &!self.timeline.borrow().is_idle())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn settle(fab: &Fab) {
        for _ in 0..200 {
            fab.tick(0.05);
        }
    }

    #[test]
    fn open_with_no_items_is_a_noop() {
        let fab = Fab::new();
        fab.open();
        assert!(fab.is_closed());
        assert!(!fab.is_animating());
    }

    #[test]
    fn closed_flips_only_after_aggregate_completion() {
        let fab = Fab::new();
        fab.add_titled("Map");
        fab.open();
        assert!(fab.is_closed(), "still closed until the group completes");
        settle(&fab);
        assert!(!fab.is_closed());
    }

    #[test]
    fn open_then_close_converges_closed() {
        let fab = Fab::new();
        fab.add_titled("Map");
        fab.add_titled("Chat");
        fab.open();
        fab.close();
        settle(&fab);
        assert!(fab.is_closed());
        assert!(!fab.is_animating());
    }

    #[test]
    fn overlay_armed_only_after_enter_completes() {
        let fab = Fab::new();
        fab.add_titled("Map");
        fab.open();
        assert!(fab.overlay().is_attached());
        assert!(!fab.overlay().is_armed());
        fab.overlay_tapped(); // dropped
        settle(&fab);
        assert!(fab.overlay().is_armed());
        fab.overlay_tapped();
        settle(&fab);
        assert!(fab.is_closed());
        assert!(!fab.overlay().is_attached());
    }

    #[test]
    fn press_release_outside_needs_cancel_button() {
        let fab = Fab::with_config(FabConfig::default().has_cancel_button(false));
        fab.add_titled("Map");
        fab.add_titled("Chat");
        let outside = Point::new(-100.0, -100.0);
        fab.press_ended(outside);
        settle(&fab);
        assert!(fab.is_closed(), "cancel-less release outside does not toggle");

        let fab = Fab::new();
        fab.add_titled("Map");
        fab.press_ended(outside);
        settle(&fab);
        assert!(!fab.is_closed(), "cancel button toggles regardless of point");
    }

    #[test]
    fn cancel_less_projects_and_restores_icon() {
        let fab = Fab::with_config(FabConfig::default().has_cancel_button(false));
        fab.set_button_icon(Some("plus".into()));
        fab.add_item(FabItem::titled("Map").icon("map-pin"));
        fab.add_titled("Chat");
        fab.open();
        assert_eq!(fab.button_icon().as_deref(), Some("map-pin"));
        settle(&fab);
        fab.close();
        assert_eq!(fab.button_icon().as_deref(), Some("plus"));
    }

    #[test]
    fn button_rotates_open_and_back() {
        let fab = Fab::new();
        fab.add_titled("Map");
        fab.open();
        settle(&fab);
        assert_eq!(fab.button_visual().rotation, -45.0);
        fab.close();
        settle(&fab);
        assert_eq!(fab.button_visual().rotation, 0.0);
    }

    #[test]
    fn remove_item_out_of_range_is_none() {
        let fab = Fab::new();
        fab.add_titled("Map");
        assert!(fab.remove_item(5).is_none());
        assert_eq!(fab.item_count(), 1);
        let removed = fab.remove_item(0).unwrap();
        assert_eq!(removed.title(), Some("Map"));
        assert_eq!(fab.item_count(), 0);
    }

    #[test]
    fn cancel_less_first_item_is_detached() {
        let fab = Fab::with_config(FabConfig::default().has_cancel_button(false));
        fab.add_titled("Map");
        fab.add_titled("Chat");
        assert!(!fab.item(0).unwrap().is_attached());
        assert!(fab.item(1).unwrap().is_attached());

        fab.set_has_cancel_button(true);
        assert!(fab.item(0).unwrap().is_attached());
    }

    #[test]
    fn removing_projected_item_promotes_next() {
        let fab = Fab::with_config(FabConfig::default().has_cancel_button(false));
        fab.add_item(FabItem::titled("Map").icon("map-pin"));
        fab.add_titled("Chat");
        fab.remove_item(0);
        assert!(!fab.item(0).unwrap().is_attached());
        assert_eq!(fab.item(0).unwrap().title(), Some("Chat"));
    }

    #[test]
    fn activate_item_runs_handler_and_closes() {
        use std::cell::Cell;
        let hits = Rc::new(Cell::new(0));
        let fab = Fab::new();
        let h = Rc::clone(&hits);
        fab.add_titled_with("Map", move |_| h.set(h.get() + 1));
        fab.open();
        settle(&fab);
        fab.activate_item(0);
        assert_eq!(hits.get(), 1);
        settle(&fab);
        assert!(fab.is_closed());
    }

    #[traced_test]
    #[test]
    fn transitions_emit_debug_events() {
        let fab = Fab::new();
        fab.add_titled("Map");
        fab.open();
        settle(&fab);
        fab.close();
        settle(&fab);
        assert!(logs_contain("opening"));
        assert!(logs_contain("open complete"));
        assert!(logs_contain("closing"));
        assert!(logs_contain("close complete"));
    }

    #[test]
    fn activate_while_closed_is_ignored() {
        use std::cell::Cell;
        let hits = Rc::new(Cell::new(0));
        let fab = Fab::new();
        let h = Rc::clone(&hits);
        fab.add_titled_with("Map", move |_| h.set(h.get() + 1));
        fab.activate_item(0);
        assert_eq!(hits.get(), 0);
    }
}
