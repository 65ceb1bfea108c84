//! Time-based tweens
//!
//! A [`Tween`] moves from one value to another over a fixed duration along an
//! [`Easing`] curve. Time is supplied by the caller, either as a delta
//! ([`Tween::step`]) or as an absolute elapsed duration ([`Tween::seek`]),
//! so tweens work the same under a frame clock or a tokio interval.

use std::time::Duration;

use crate::easing::Easing;
use crate::values::Interpolate;

/// An eased transition between two values
#[derive(Clone, Debug)]
pub struct Tween<T: Interpolate> {
    from: T,
    to: T,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// A finished tween resting at `value`
    pub fn idle(value: T) -> Self {
        Self::new(value.clone(), value, Duration::ZERO, Easing::Linear)
    }

    pub fn from(&self) -> &T {
        &self.from
    }

    pub fn to(&self) -> &T {
        &self.to
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn value(&self) -> T {
        self.from.lerp(&self.to, self.easing.apply(self.progress()))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt` and return the new value
    pub fn step(&mut self, dt: Duration) -> T {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    /// Jump to an absolute elapsed time
    pub fn seek(&mut self, elapsed: Duration) -> T {
        self.elapsed = elapsed.min(self.duration);
        self.value()
    }

    /// Start a new transition from the current value toward `to`
    pub fn retarget(&mut self, to: T, duration: Duration) {
        self.from = self.value();
        self.to = to;
        self.duration = duration;
        self.elapsed = Duration::ZERO;
    }
}
