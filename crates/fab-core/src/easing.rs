#![forbid(unsafe_code)]

//! Easing curves for tween progress.
//!
//! All curves map normalized time `t` in `[0, 1]` to normalized progress.
//! Outside that range the output is clamped to the endpoints, so a tween
//! that has run past its duration always lands exactly on its target.
//!
//! The spring curve is the closed-form response of an underdamped
//! harmonic oscillator settling on 1.0, parameterized by a damping ratio
//! and a normalized initial velocity — the same shape platform animation
//! APIs expose for "spring with damping". It may overshoot 1.0 mid-flight
//! by design; only the endpoints are clamped.

/// Natural frequency of the spring curve, in radians per normalized
/// duration. Chosen so the envelope decays below 1% within `t = 1` for
/// damping ratios around 0.5.
const SPRING_OMEGA: f32 = 12.0;

/// An easing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Cubic ease-out: fast start, decelerating finish.
    EaseOut,
    /// Cubic ease-in-out: the default curve of most platform animators.
    EaseInOut,
    /// Underdamped spring settling on the target.
    ///
    /// `damping` is the damping ratio in `(0, 1)`; `velocity` the
    /// normalized initial velocity. A damping ratio at or above 1 is
    /// treated as critically damped and falls back to [`Easing::EaseOut`].
    Spring { damping: f32, velocity: f32 },
}

impl Easing {
    /// Evaluate the curve at normalized time `t`.
    #[must_use]
    pub fn eval(self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Easing::Spring { damping, velocity } => spring(t, damping, velocity),
        }
    }
}

fn spring(t: f32, damping: f32, velocity: f32) -> f32 {
    let zeta = damping.max(0.0);
    if zeta >= 1.0 {
        return Easing::EaseOut.eval(t);
    }
    // x(t) = 1 - e^(-ζωt) (cos(ω_d t) + B sin(ω_d t))
    // with x(0) = 0 and x'(0) = velocity.
    let omega_d = SPRING_OMEGA * (1.0 - zeta * zeta).sqrt();
    let b = (zeta * SPRING_OMEGA - velocity) / omega_d;
    let envelope = (-zeta * SPRING_OMEGA * t).exp();
    1.0 - envelope * ((omega_d * t).cos() + b * (omega_d * t).sin())
}
