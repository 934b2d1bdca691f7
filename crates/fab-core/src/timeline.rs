#![forbid(unsafe_code)]

//! Delayed, eased tweens over shared visual state.
//!
//! The timeline is the sequencing engine behind every open/close
//! transition: callers schedule [`Tween`]s (start delay, duration,
//! easing, target [`Visual`]) and then drive the timeline with explicit
//! [`Timeline::advance`] ticks from the host event loop. Starting a
//! tween returns immediately; its completion callback runs on the tick
//! that carries it past its duration — same loop, later turn.
//!
//! # Invariants
//!
//! 1. A tween's start value is captured when its delay elapses, not when
//!    it is scheduled, so schedules built against moving state pick up
//!    wherever the previous transition left the target.
//! 2. A finished tween lands exactly on its target value (no easing
//!    drift).
//! 3. Completion callbacks are returned to the caller, never invoked
//!    while the timeline is borrowed — callers run them after `advance`
//!    returns, which keeps re-entrant scheduling safe.
//! 4. Tweens over the same target do not cancel each other; the one
//!    ticked last wins each frame. Overlapping transitions are the
//!    caller's documented limitation, not the timeline's.
//!
//! # Failure Modes
//!
//! - Zero or negative duration: the tween snaps to its target on the
//!   first tick past its delay.
//! - Negative `dt`: treated as zero (time never runs backward).

use std::cell::RefCell;
use std::rc::Rc;

use web_time::Instant;

use crate::easing::Easing;
use crate::geometry::Point;

/// Animatable visual state shared between the widget tree and the
/// timeline: position offset, opacity, uniform scale, and rotation in
/// degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub offset: Point,
    pub alpha: f32,
    pub scale: f32,
    pub rotation: f32,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            offset: Point::ZERO,
            alpha: 1.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Visual {
    /// Fully transparent at rest — the initial state of menu items.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            alpha: 0.0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Component-wise linear interpolation toward `other`.
    #[must_use]
    pub fn lerp(self, other: Visual, t: f32) -> Visual {
        Visual {
            offset: self.offset.lerp(other.offset, t),
            alpha: self.alpha + (other.alpha - self.alpha) * t,
            scale: self.scale + (other.scale - self.scale) * t,
            rotation: self.rotation + (other.rotation - self.rotation) * t,
        }
    }
}

/// Shared handle to a [`Visual`], cloneable across the widget tree and
/// scheduled tweens.
#[derive(Clone, Debug, Default)]
pub struct VisualHandle {
    inner: Rc<RefCell<Visual>>,
}

impl VisualHandle {
    #[must_use]
    pub fn new(visual: Visual) -> Self {
        Self {
            inner: Rc::new(RefCell::new(visual)),
        }
    }

    #[must_use]
    pub fn get(&self) -> Visual {
        *self.inner.borrow()
    }

    pub fn set(&self, visual: Visual) {
        *self.inner.borrow_mut() = visual;
    }

    pub fn update(&self, f: impl FnOnce(&mut Visual)) {
        f(&mut self.inner.borrow_mut());
    }
}

/// A completion callback drained from [`Timeline::advance`].
pub type Completion = Box<dyn FnOnce()>;

/// One scheduled animation: after `delay`, ease the target from its
/// then-current value to `to` over `duration`.
pub struct Tween {
    target: VisualHandle,
    to: Visual,
    from: Option<Visual>,
    delay: f32,
    duration: f32,
    easing: Easing,
    elapsed: f32,
    on_complete: Option<Completion>,
}

impl Tween {
    #[must_use]
    pub fn new(target: VisualHandle, to: Visual, delay: f32, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            to,
            from: None,
            delay: delay.max(0.0),
            duration: duration.max(0.0),
            easing,
            elapsed: 0.0,
            on_complete: None,
        }
    }

    /// Attach a completion callback, run when the tween finishes.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("to", &self.to)
            .field("delay", &self.delay)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

/// Single-threaded animation scheduler driven by explicit ticks.
#[derive(Debug, Default)]
pub struct Timeline {
    tweens: Vec<Tween>,
    now: f32,
    last_tick: Option<Instant>,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a tween. Returns immediately; progress happens on ticks.
    pub fn schedule(&mut self, tween: Tween) {
        tracing::trace!(
            delay = tween.delay,
            duration = tween.duration,
            active = self.tweens.len() + 1,
            "tween scheduled"
        );
        self.tweens.push(tween);
    }

    /// Advance all tweens by `dt` seconds.
    ///
    /// Returns the completion callbacks of every tween that finished on
    /// this tick, in scheduling order. The caller must invoke them after
    /// releasing any borrow of the timeline.
    #[must_use]
    pub fn advance(&mut self, dt: f32) -> Vec<Completion> {
        let dt = dt.max(0.0);
        self.now += dt;
        let mut finished = Vec::new();
        self.tweens.retain_mut(|tw| {
            tw.elapsed += dt;
            let local = tw.elapsed - tw.delay;
            if local < 0.0 {
                return true;
            }
            let from = *tw.from.get_or_insert_with(|| tw.target.get());
            let t = if tw.duration <= 0.0 {
                1.0
            } else {
                (local / tw.duration).min(1.0)
            };
            if t >= 1.0 {
                tw.target.set(tw.to);
                if let Some(f) = tw.on_complete.take() {
                    finished.push(f);
                }
                false
            } else {
                tw.target.set(from.lerp(tw.to, tw.easing.eval(t)));
                true
            }
        });
        if !finished.is_empty() {
            tracing::trace!(completed = finished.len(), active = self.tweens.len(), "tick");
        }
        finished
    }

    /// Advance by wall-clock time since the previous `tick` call.
    ///
    /// The first call establishes the reference point and advances by
    /// zero.
    #[must_use]
    pub fn tick(&mut self) -> Vec<Completion> {
        let now = Instant::now();
        let dt = self
            .last_tick
            .map(|prev| now.duration_since(prev).as_secs_f32())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        self.advance(dt)
    }

    /// Whether no tweens are pending or running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Number of tweens pending or running.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Seconds accumulated across all ticks.
    #[must_use]
    pub fn now(&self) -> f32 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn run(timeline: &mut Timeline, total: f32, step: f32) -> usize {
        let mut completions = 0;
        let mut t = 0.0;
        while t < total {
            completions += timeline.advance(step).into_iter().map(|f| f()).count();
            t += step;
        }
        completions
    }

    #[test]
    fn tween_reaches_target_exactly() {
        let handle = VisualHandle::new(Visual::hidden());
        let mut timeline = Timeline::new();
        let to = Visual::default().with_offset(Point::new(0.0, -56.0));
        timeline.schedule(Tween::new(handle.clone(), to, 0.0, 0.3, Easing::Linear));

        run(&mut timeline, 0.5, 0.05);
        assert_eq!(handle.get(), to);
        assert!(timeline.is_idle());
    }

    #[test]
    fn delay_defers_start_and_capture() {
        let handle = VisualHandle::new(Visual::hidden());
        let mut timeline = Timeline::new();
        let to = Visual::default();
        timeline.schedule(Tween::new(handle.clone(), to, 0.2, 0.2, Easing::Linear));

        let _ = timeline.advance(0.1);
        assert_eq!(handle.get(), Visual::hidden(), "still in delay window");

        // Move the target mid-delay; the tween must start from here.
        handle.set(Visual::hidden().with_alpha(0.5));
        let _ = timeline.advance(0.2); // 0.1s into the animation
        let alpha = handle.get().alpha;
        assert!(alpha > 0.5 && alpha < 1.0, "interpolates from late capture, got {alpha}");
    }

    #[test]
    fn completion_runs_once_after_duration() {
        let handle = VisualHandle::new(Visual::default());
        let mut timeline = Timeline::new();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        timeline.schedule(
            Tween::new(handle, Visual::hidden(), 0.0, 0.1, Easing::Linear)
                .on_complete(move || c.set(c.get() + 1)),
        );

        for f in timeline.advance(0.05) {
            f();
        }
        assert_eq!(count.get(), 0);
        for f in timeline.advance(0.1) {
            f();
        }
        assert_eq!(count.get(), 1);
        assert_eq!(run(&mut timeline, 1.0, 0.1), 0, "nothing left to complete");
    }

    #[test]
    fn zero_duration_snaps_on_first_tick() {
        let handle = VisualHandle::new(Visual::hidden());
        let mut timeline = Timeline::new();
        let to = Visual::default();
        let done = Rc::new(Cell::new(false));
        let d = Rc::clone(&done);
        timeline.schedule(
            Tween::new(handle.clone(), to, 0.0, 0.0, Easing::Linear)
                .on_complete(move || d.set(true)),
        );
        for f in timeline.advance(0.0) {
            f();
        }
        assert!(done.get());
        assert_eq!(handle.get(), to);
        assert!(timeline.is_idle());
    }

    #[test]
    fn completions_preserve_scheduling_order() {
        let mut timeline = Timeline::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let o = Rc::clone(&order);
            timeline.schedule(
                Tween::new(VisualHandle::default(), Visual::default(), 0.0, 0.1, Easing::Linear)
                    .on_complete(move || o.borrow_mut().push(i)),
            );
        }
        for f in timeline.advance(0.2) {
            f();
        }
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let handle = VisualHandle::new(Visual::hidden());
        let mut timeline = Timeline::new();
        timeline.schedule(Tween::new(
            handle.clone(),
            Visual::default(),
            0.0,
            0.1,
            Easing::Linear,
        ));
        let _ = timeline.advance(-1.0);
        assert_eq!(timeline.now(), 0.0);
        assert_eq!(timeline.active_count(), 1);
    }

    #[test]
    fn wall_clock_tick_establishes_reference() {
        let mut timeline = Timeline::new();
        timeline.schedule(Tween::new(
            VisualHandle::default(),
            Visual::default(),
            0.0,
            10.0,
            Easing::Linear,
        ));
        let finished = timeline.tick();
        assert!(finished.is_empty(), "first tick advances by zero");
        assert_eq!(timeline.active_count(), 1);
    }
}
