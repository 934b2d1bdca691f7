#![forbid(unsafe_code)]

//! Non-animated strategy: visuals snap to their open or closed state
//! synchronously. No tweens means the aggregate completion group is
//! empty and fires its continuation on the next tick with nothing to
//! wait for; a full open/close round trip restores every visual
//! bit-exactly because nothing ever interpolates.

use fab_core::{Point, Visual};

use super::{AnimationContext, Schedule, TweenTarget, TransitionAnimator};

pub struct Instant;

impl TransitionAnimator for Instant {
    fn schedule_open(&self, ctx: &AnimationContext) -> Schedule {
        let mut schedule = Schedule::default();

        if ctx.cancel_less && !ctx.items.is_empty() {
            schedule
                .instants
                .push((TweenTarget::TitleLabel, ctx.label_shown()));
        }
        for (index, offset) in ctx.stacked_offsets() {
            schedule.instants.push((
                TweenTarget::Item(index),
                Visual::default().with_offset(offset),
            ));
        }
        schedule
    }

    fn schedule_close(&self, ctx: &AnimationContext) -> Schedule {
        let mut schedule = Schedule::default();

        for (index, offset) in ctx.stacked_offsets() {
            schedule.instants.push((
                TweenTarget::Item(index),
                Visual::hidden().with_offset(Point::new(offset.x, 0.0)),
            ));
        }
        if ctx.cancel_less && !ctx.items.is_empty() {
            schedule
                .instants
                .push((TweenTarget::TitleLabel, ctx.label_hidden()));
        }
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_context;
    use super::*;

    #[test]
    fn open_has_no_tweens() {
        let ctx = test_context(&[42.0, 42.0]);
        let schedule = Instant.schedule_open(&ctx);
        assert!(schedule.tweens.is_empty());
        assert_eq!(schedule.instants.len(), 2);
        assert_eq!(schedule.member_count(), 0);
    }

    #[test]
    fn round_trip_restores_rest_state() {
        let ctx = test_context(&[42.0]);
        let open = Instant.schedule_open(&ctx);
        let close = Instant.schedule_close(&ctx);
        assert_eq!(open.instants[0].1, Visual::default().with_offset(Point::new(7.0, -56.0)));
        assert_eq!(
            close.instants[0].1,
            Visual::hidden().with_offset(Point::new(7.0, 0.0)),
            "closed state matches a freshly added item"
        );
    }
}
