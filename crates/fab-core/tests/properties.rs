#![forbid(unsafe_code)]

//! Property checks over the easing curves, the timeline, and the
//! completion group.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;

use fab_core::{CompletionGroup, Easing, Point, Timeline, Tween, Visual, VisualHandle};

proptest! {
    #[test]
    fn curves_clamp_to_exact_endpoints(
        t in -2.0f32..3.0,
        damping in 0.05f32..0.8,
        velocity in -2.0f32..2.0,
    ) {
        let curves = [
            Easing::Linear,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::Spring { damping, velocity },
        ];
        for curve in curves {
            let v = curve.eval(t);
            prop_assert!(v.is_finite());
            if t <= 0.0 {
                prop_assert_eq!(v, 0.0);
            }
            if t >= 1.0 {
                prop_assert_eq!(v, 1.0);
            }
        }
    }

    #[test]
    fn spring_stays_bounded_around_target(
        damping in 0.05f32..0.8,
        velocity in -2.0f32..2.0,
    ) {
        let s = Easing::Spring { damping, velocity };
        for i in 0..=100 {
            let v = s.eval(i as f32 / 100.0);
            prop_assert!(v.is_finite());
            prop_assert!((-2.0..3.0).contains(&v), "unbounded at t={i}: {v}");
        }
    }

    #[test]
    fn spring_settles_before_the_endpoint_clamp(
        damping in 0.45f32..0.8,
        velocity in -2.0f32..2.0,
    ) {
        let s = Easing::Spring { damping, velocity };
        prop_assert!((s.eval(0.999) - 1.0).abs() < 0.02);
    }

    #[test]
    fn finished_tween_lands_exactly_on_target(
        delay in 0.0f32..0.5,
        duration in 0.0f32..1.0,
        dx in -200.0f32..200.0,
        alpha in 0.0f32..1.0,
    ) {
        let handle = VisualHandle::new(Visual::hidden());
        let to = Visual::default()
            .with_offset(Point::new(dx, 0.0))
            .with_alpha(alpha);
        let mut timeline = Timeline::new();
        timeline.schedule(Tween::new(handle.clone(), to, delay, duration, Easing::EaseInOut));

        for _ in 0..60 {
            for f in timeline.advance(0.05) {
                f();
            }
        }
        prop_assert_eq!(handle.get(), to);
        prop_assert!(timeline.is_idle());
    }

    #[test]
    fn group_continuation_fires_exactly_once(members in 0usize..12) {
        let group = CompletionGroup::new();
        let tickets: Vec<_> = (0..members).map(|_| group.ticket()).collect();

        let fired = Rc::new(Cell::new(0u32));
        let f = Rc::clone(&fired);
        group.notify(move || f.set(f.get() + 1));

        if members == 0 {
            prop_assert_eq!(fired.get(), 1, "empty group fires on notify");
        } else {
            prop_assert_eq!(fired.get(), 0);
        }
        for ticket in tickets {
            ticket.complete();
        }
        prop_assert_eq!(fired.get(), 1);
        prop_assert_eq!(group.pending(), 0);
        prop_assert!(group.has_fired());
    }
}
