#![forbid(unsafe_code)]

//! Pop strategy: items pre-shrink to 0.4 scale at their stacked
//! position, then spring up to full size and opacity. Close shrinks
//! and fades them back quickly, front-to-back.

use fab_core::{Easing, Visual};

use super::{
    AnimationContext, Schedule, TweenTarget, TransitionAnimator, TweenSpec, LABEL_FADE_DURATION,
    OPEN_SPRING, POP_CLOSE_DURATION, POP_OPEN_DURATION,
};

const SHRUNK_SCALE: f32 = 0.4;

pub struct Pop;

impl TransitionAnimator for Pop {
    fn schedule_open(&self, ctx: &AnimationContext) -> Schedule {
        let mut schedule = Schedule::default();

        if ctx.cancel_less && !ctx.items.is_empty() {
            schedule.tweens.push(TweenSpec {
                target: TweenTarget::TitleLabel,
                prepare: Some(ctx.label_hidden().with_scale(SHRUNK_SCALE)),
                to: ctx.label_shown(),
                delay: 0.0,
                duration: POP_OPEN_DURATION,
                easing: OPEN_SPRING,
            });
        }

        for (index, offset) in ctx.stacked_offsets() {
            schedule.tweens.push(TweenSpec {
                target: TweenTarget::Item(index),
                prepare: Some(
                    Visual::hidden()
                        .with_offset(offset)
                        .with_scale(SHRUNK_SCALE),
                ),
                to: Visual::default().with_offset(offset),
                delay: ctx.open_delay(index),
                duration: POP_OPEN_DURATION,
                easing: OPEN_SPRING,
            });
        }
        schedule
    }

    fn schedule_close(&self, ctx: &AnimationContext) -> Schedule {
        let mut schedule = Schedule::default();

        for (index, offset) in ctx.stacked_offsets() {
            schedule.tweens.push(TweenSpec {
                target: TweenTarget::Item(index),
                prepare: None,
                to: Visual::hidden()
                    .with_offset(offset)
                    .with_scale(SHRUNK_SCALE),
                delay: ctx.close_delay(index),
                duration: POP_CLOSE_DURATION,
                easing: Easing::EaseInOut,
            });
        }

        if ctx.cancel_less && !ctx.items.is_empty() {
            schedule.tweens.push(TweenSpec {
                target: TweenTarget::TitleLabel,
                prepare: None,
                to: ctx.label_hidden().with_scale(SHRUNK_SCALE),
                delay: ctx.label_close_delay(),
                duration: LABEL_FADE_DURATION,
                easing: Easing::EaseInOut,
            });
        }
        schedule
    }
}
