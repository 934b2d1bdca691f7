#![forbid(unsafe_code)]

//! Slide strategies.
//!
//! `SlideLeft` stages items past the container's trailing edge and
//! springs them in horizontally; `SlideUp`/`SlideDown` animate only the
//! Y offset from the button to the stacked position, fading in flight.
//! For all three the title label simply cross-fades with no delay, on
//! open and close alike.

use fab_core::{Easing, Point, Visual};

use super::{
    AnimationContext, Schedule, TweenTarget, TransitionAnimator, TweenSpec, LABEL_FADE_DURATION,
    OPEN_SPRING, SLIDE_LEFT_DURATION, SLIDE_VERTICAL_DURATION,
};

fn label_fade(ctx: &AnimationContext, schedule: &mut Schedule, fade_in: bool) {
    if ctx.cancel_less && !ctx.items.is_empty() {
        schedule.tweens.push(TweenSpec {
            target: TweenTarget::TitleLabel,
            prepare: None,
            to: if fade_in {
                ctx.label_shown()
            } else {
                ctx.label_hidden()
            },
            delay: 0.0,
            duration: LABEL_FADE_DURATION,
            easing: Easing::EaseInOut,
        });
    }
}

pub struct SlideLeft;

impl SlideLeft {
    /// X offset placing an item just past the container's right edge.
    fn offscreen_x(ctx: &AnimationContext) -> f32 {
        ctx.container_width - ctx.anchor_x
    }
}

impl TransitionAnimator for SlideLeft {
    fn schedule_open(&self, ctx: &AnimationContext) -> Schedule {
        let mut schedule = Schedule::default();
        label_fade(ctx, &mut schedule, true);

        for (index, offset) in ctx.stacked_offsets() {
            schedule.tweens.push(TweenSpec {
                target: TweenTarget::Item(index),
                prepare: Some(
                    Visual::hidden().with_offset(Point::new(Self::offscreen_x(ctx), offset.y)),
                ),
                to: Visual::default().with_offset(offset),
                delay: ctx.open_delay(index),
                duration: SLIDE_LEFT_DURATION,
                easing: OPEN_SPRING,
            });
        }
        schedule
    }

    fn schedule_close(&self, ctx: &AnimationContext) -> Schedule {
        let mut schedule = Schedule::default();
        label_fade(ctx, &mut schedule, false);

        for (index, offset) in ctx.stacked_offsets() {
            schedule.tweens.push(TweenSpec {
                target: TweenTarget::Item(index),
                prepare: None,
                to: Visual::hidden().with_offset(Point::new(Self::offscreen_x(ctx), offset.y)),
                delay: ctx.close_delay(index),
                duration: SLIDE_LEFT_DURATION,
                easing: Easing::EaseInOut,
            });
        }
        schedule
    }
}

fn vertical_open(ctx: &AnimationContext) -> Schedule {
    let mut schedule = Schedule::default();
    label_fade(ctx, &mut schedule, true);

    for (index, offset) in ctx.stacked_offsets() {
        schedule.tweens.push(TweenSpec {
            target: TweenTarget::Item(index),
            prepare: None,
            to: Visual::default().with_offset(offset),
            delay: ctx.open_delay(index),
            duration: SLIDE_VERTICAL_DURATION,
            easing: Easing::EaseInOut,
        });
    }
    schedule
}

fn vertical_close(ctx: &AnimationContext) -> Schedule {
    let mut schedule = Schedule::default();
    label_fade(ctx, &mut schedule, false);

    for (index, offset) in ctx.stacked_offsets() {
        schedule.tweens.push(TweenSpec {
            target: TweenTarget::Item(index),
            prepare: None,
            to: Visual::hidden().with_offset(Point::new(offset.x, 0.0)),
            delay: ctx.close_delay(index),
            duration: SLIDE_VERTICAL_DURATION,
            easing: Easing::EaseInOut,
        });
    }
    schedule
}

pub struct SlideUp;

impl TransitionAnimator for SlideUp {
    fn schedule_open(&self, ctx: &AnimationContext) -> Schedule {
        vertical_open(ctx)
    }

    fn schedule_close(&self, ctx: &AnimationContext) -> Schedule {
        vertical_close(ctx)
    }
}

pub struct SlideDown;

impl TransitionAnimator for SlideDown {
    fn schedule_open(&self, ctx: &AnimationContext) -> Schedule {
        vertical_open(ctx)
    }

    fn schedule_close(&self, ctx: &AnimationContext) -> Schedule {
        vertical_close(ctx)
    }
}
