#![forbid(unsafe_code)]

//! Open/close transition strategies.
//!
//! Each strategy turns the widget's current item layout into a
//! [`Schedule`]: a transient batch of [`TweenSpec`]s (and instantaneous
//! sets, for the non-animated strategy) addressed by [`TweenTarget`].
//! Schedules are rebuilt on every `open()`/`close()` and never reused.
//!
//! # Invariants
//!
//! 1. The per-item start delay is `registration_index * animation_speed`
//!    on open and `(len - 1 - index) * animation_speed` on close, for
//!    every animated strategy. Hidden items are excluded from the
//!    schedule without shifting the delays of the items around them.
//! 2. Hidden items consume no stack space: the accumulated Y offset
//!    advances by `size + item_space` per *visible* item only.
//! 3. In cancel-less mode item 0 never appears in a schedule; the shared
//!    title label is animated in its stead.

use fab_core::{Easing, Point, Visual};

mod fade;
mod instant;
mod pop;
mod slide;

pub use fade::Fade;
pub use instant::Instant;
pub use pop::Pop;
pub use slide::{SlideDown, SlideLeft, SlideUp};

/// Which transition strategy the widget runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenAnimationType {
    #[default]
    Pop,
    Fade,
    SlideLeft,
    SlideUp,
    SlideDown,
    None,
}

/// Which way the item stack grows from the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalDirection {
    #[default]
    Up,
    Down,
}

pub(crate) const OPEN_SPRING: Easing = Easing::Spring {
    damping: 0.55,
    velocity: 0.3,
};

pub(crate) const POP_OPEN_DURATION: f32 = 0.3;
pub(crate) const POP_CLOSE_DURATION: f32 = 0.15;
pub(crate) const FADE_DURATION: f32 = 0.4;
pub(crate) const SLIDE_LEFT_DURATION: f32 = 0.3;
pub(crate) const SLIDE_VERTICAL_DURATION: f32 = 0.2;
pub(crate) const LABEL_FADE_DURATION: f32 = 0.2;

/// Per-item layout facts a strategy needs (registration order).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemLayout {
    pub size: f32,
    pub hidden: bool,
}

/// Everything a strategy reads to build a schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationContext {
    pub items: Vec<ItemLayout>,
    /// `has_cancel_button == false`: item 0 is projected onto the
    /// button and title label.
    pub cancel_less: bool,
    /// Per-item stagger interval, seconds.
    pub animation_speed: f32,
    pub item_space: f32,
    pub vertical_direction: VerticalDirection,
    /// Button diameter; items center against it on X.
    pub widget_size: f32,
    /// Container width, for the slide-left off-screen start.
    pub container_width: f32,
    /// Widget frame origin X within the container.
    pub anchor_x: f32,
    /// The title label's resting offset, so label tweens preserve it.
    pub label_offset: Point,
}

impl AnimationContext {
    /// X offset centering an item of `size` against the button.
    #[must_use]
    pub(crate) fn centered_x(&self, size: f32) -> f32 {
        let big = self.widget_size.max(size);
        let small = self.widget_size.min(size);
        (big - small) / 2.0
    }

    /// Registration indices that actually appear in a schedule.
    pub(crate) fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().enumerate().filter_map(|(i, item)| {
            if item.hidden || (self.cancel_less && i == 0) {
                None
            } else {
                Some(i)
            }
        })
    }

    /// `(index, open-state offset)` per visible item, accumulating
    /// `size + item_space` in the configured direction.
    #[must_use]
    pub(crate) fn stacked_offsets(&self) -> Vec<(usize, Point)> {
        let mut height = 0.0;
        self.visible_indices()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|i| {
                let item = self.items[i];
                height += item.size + self.item_space;
                let y = match self.vertical_direction {
                    VerticalDirection::Up => -height,
                    VerticalDirection::Down => height,
                };
                (i, Point::new(self.centered_x(item.size), y))
            })
            .collect()
    }

    #[must_use]
    pub(crate) fn open_delay(&self, index: usize) -> f32 {
        index as f32 * self.animation_speed
    }

    #[must_use]
    pub(crate) fn close_delay(&self, index: usize) -> f32 {
        (self.items.len() - 1 - index) as f32 * self.animation_speed
    }

    /// Close delay of the projected title label: the slot item 0 would
    /// have had, last in the reversed order.
    #[must_use]
    pub(crate) fn label_close_delay(&self) -> f32 {
        (self.items.len().saturating_sub(1)) as f32 * self.animation_speed
    }

    /// Title-label visual at rest in the open state.
    #[must_use]
    pub(crate) fn label_shown(&self) -> Visual {
        Visual::default().with_offset(self.label_offset)
    }

    /// Title-label visual in the closed state.
    #[must_use]
    pub(crate) fn label_hidden(&self) -> Visual {
        Visual::hidden().with_offset(self.label_offset)
    }
}

/// What a scheduled mutation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenTarget {
    /// Item at its registration index.
    Item(usize),
    /// The shared title label (cancel-less projection).
    TitleLabel,
}

/// One tween the widget should run: optionally snap the target to
/// `prepare`, then ease it to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenSpec {
    pub target: TweenTarget,
    /// Starting state applied instantly at schedule time (slide-in
    /// staging, pop pre-shrink). `None` tweens from wherever the target
    /// currently is.
    pub prepare: Option<Visual>,
    pub to: Visual,
    pub delay: f32,
    pub duration: f32,
    pub easing: Easing,
}

/// A transient, per-transition batch of animations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub tweens: Vec<TweenSpec>,
    /// Applied synchronously, outside the completion group.
    pub instants: Vec<(TweenTarget, Visual)>,
}

impl Schedule {
    /// Members the aggregate completion group must wait on.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.tweens.len()
    }
}

/// One open/close transition strategy.
pub trait TransitionAnimator {
    fn schedule_open(&self, ctx: &AnimationContext) -> Schedule;
    fn schedule_close(&self, ctx: &AnimationContext) -> Schedule;
}

/// Strategy for an [`OpenAnimationType`].
#[must_use]
pub fn animator(kind: OpenAnimationType) -> &'static dyn TransitionAnimator {
    match kind {
        OpenAnimationType::Pop => &Pop,
        OpenAnimationType::Fade => &Fade,
        OpenAnimationType::SlideLeft => &SlideLeft,
        OpenAnimationType::SlideUp => &SlideUp,
        OpenAnimationType::SlideDown => &SlideDown,
        OpenAnimationType::None => &Instant,
    }
}

#[cfg(test)]
pub(crate) fn test_context(sizes: &[f32]) -> AnimationContext {
    AnimationContext {
        items: sizes
            .iter()
            .map(|&size| ItemLayout {
                size,
                hidden: false,
            })
            .collect(),
        cancel_less: false,
        animation_speed: 0.1,
        item_space: 14.0,
        vertical_direction: VerticalDirection::Up,
        widget_size: 56.0,
        container_width: 375.0,
        anchor_x: 305.0,
        label_offset: Point::new(-50.0, 20.0),
    }
}
