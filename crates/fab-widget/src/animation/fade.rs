#![forbid(unsafe_code)]

//! Fade strategy: items sit at their stacked position and cross-fade
//! in and out; no transform animation at all.

use fab_core::{Easing, Visual};

use super::{
    AnimationContext, Schedule, TweenTarget, TransitionAnimator, TweenSpec, FADE_DURATION,
    LABEL_FADE_DURATION,
};

pub struct Fade;

impl TransitionAnimator for Fade {
    fn schedule_open(&self, ctx: &AnimationContext) -> Schedule {
        let mut schedule = Schedule::default();

        if ctx.cancel_less && !ctx.items.is_empty() {
            schedule.tweens.push(TweenSpec {
                target: TweenTarget::TitleLabel,
                prepare: None,
                to: ctx.label_shown(),
                delay: 0.0,
                duration: LABEL_FADE_DURATION,
                easing: Easing::EaseInOut,
            });
        }

        for (index, offset) in ctx.stacked_offsets() {
            schedule.tweens.push(TweenSpec {
                target: TweenTarget::Item(index),
                prepare: Some(Visual::hidden().with_offset(offset)),
                to: Visual::default().with_offset(offset),
                delay: ctx.open_delay(index),
                duration: FADE_DURATION,
                easing: Easing::EaseInOut,
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
                to: Visual::hidden().with_offset(offset),
                delay: ctx.close_delay(index),
                duration: FADE_DURATION,
                easing: Easing::EaseInOut,
            });
        }

        if ctx.cancel_less && !ctx.items.is_empty() {
            schedule.tweens.push(TweenSpec {
                target: TweenTarget::TitleLabel,
                prepare: None,
                to: ctx.label_hidden(),
                delay: ctx.label_close_delay(),
                duration: LABEL_FADE_DURATION,
                easing: Easing::EaseInOut,
            });
        }
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_context;
    use super::*;

    #[test]
    fn open_only_changes_alpha() {
        let ctx = test_context(&[42.0, 42.0]);
        let schedule = Fade.schedule_open(&ctx);
        for tween in &schedule.tweens {
            let prepare = tween.prepare.unwrap();
            assert_eq!(prepare.offset, tween.to.offset, "position fixed during fade");
            assert_eq!(prepare.scale, tween.to.scale);
            assert_eq!(prepare.alpha, 0.0);
            assert_eq!(tween.to.alpha, 1.0);
            assert_eq!(tween.duration, 0.4);
        }
    }

    #[test]
    fn uniform_stagger_open_and_reversed_close() {
        let ctx = test_context(&[42.0, 42.0, 42.0]);
        let open: Vec<f32> = Fade
            .schedule_open(&ctx)
            .tweens
            .iter()
            .map(|t| t.delay)
            .collect();
        assert_eq!(open, vec![0.0, 0.1, 0.2]);
        let close: Vec<f32> = Fade
            .schedule_close(&ctx)
            .tweens
            .iter()
            .map(|t| t.delay)
            .collect();
        assert_eq!(close, vec![0.2, 0.1, 0.0]);
    }

    #[test]
    fn cancel_less_label_closes_last() {
        let mut ctx = test_context(&[42.0, 42.0, 42.0]);
        ctx.cancel_less = true;
        let schedule = Fade.schedule_close(&ctx);
        let label = schedule.tweens.last().unwrap();
        assert_eq!(label.target, TweenTarget::TitleLabel);
        assert_eq!(label.delay, 0.2);
        assert_eq!(label.to.alpha, 0.0);
    }
}
