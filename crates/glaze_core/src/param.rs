//! Bounded, user-adjustable parameters
//!
//! A [`ParamValue`] remembers whatever raw value it was last given and
//! reports a coerced value that always lies inside the currently active
//! range. The active range is the safe range, or the wider unsafe range while
//! unsafe mode is enabled. Switching unsafe mode off never rewrites the raw
//! value; it only changes what [`ParamValue::value`] and
//! [`ParamValue::is_valid`] report.
//!
//! ```rust
//! use glaze_core::param::{ParamRange, ParamValue};
//!
//! let mut chroma = ParamValue::new(
//!     1.0_f32,
//!     ParamRange::new(0.5, 2.0),
//!     ParamRange::new(0.0, 4.0),
//!     |v| format!("{v:.2}"),
//! );
//!
//! chroma.set_unsafe_mode(true);
//! chroma.set_value(3.0);
//! chroma.set_unsafe_mode(false);
//!
//! assert_eq!(chroma.raw_value(), 3.0);
//! assert_eq!(chroma.value(), 2.0);
//! assert!(!chroma.is_valid());
//! assert_eq!(chroma.raw_label(), "3.00");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::Dp;

/// A scalar that can be mapped onto a linear `f32` axis
pub trait ParamScalar: Copy + PartialOrd + Send + Sync + 'static {
    fn to_f32(self) -> f32;
    fn from_f32(value: f32) -> Self;
}

impl ParamScalar for f32 {
    fn to_f32(self) -> f32 {
        self
    }

    fn from_f32(value: f32) -> Self {
        value
    }
}

impl ParamScalar for Dp {
    fn to_f32(self) -> f32 {
        self.0
    }

    fn from_f32(value: f32) -> Self {
        Dp(value)
    }
}

/// Closed range `start..=end`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamRange<T> {
    pub start: T,
    pub end: T,
}

impl<T: ParamScalar> ParamRange<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.partial_cmp(&self.end).map_or(true, |o| o.is_gt())
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.start && value <= self.end
    }

    /// Clamp into the range; an empty range collapses to its start
    pub fn coerce(&self, value: T) -> T {
        if self.is_empty() || value < self.start {
            self.start
        } else if value > self.end {
            self.end
        } else {
            value
        }
    }

    /// Smallest range containing both
    pub fn union(&self, other: &ParamRange<T>) -> Self {
        let start = if other.start < self.start {
            other.start
        } else {
            self.start
        };
        let end = if other.end > self.end {
            other.end
        } else {
            self.end
        };
        Self { start, end }
    }

    fn span(&self) -> f32 {
        self.end.to_f32() - self.start.to_f32()
    }
}

/// A bounded parameter with safe and unsafe ranges
#[derive(Clone)]
pub struct ParamValue<T: ParamScalar> {
    initial: T,
    raw: T,
    safe: ParamRange<T>,
    unsafe_range: ParamRange<T>,
    unsafe_mode: bool,
    format: fn(T) -> String,
}

impl<T: ParamScalar> ParamValue<T> {
    /// The unsafe range is widened to contain the safe range if needed
    pub fn new(
        initial: T,
        safe: ParamRange<T>,
        unsafe_range: ParamRange<T>,
        format: fn(T) -> String,
    ) -> Self {
        Self {
            initial,
            raw: initial,
            safe,
            unsafe_range: unsafe_range.union(&safe),
            unsafe_mode: false,
            format,
        }
    }

    pub fn initial(&self) -> T {
        self.initial
    }

    pub fn safe_range(&self) -> ParamRange<T> {
        self.safe
    }

    pub fn unsafe_range(&self) -> ParamRange<T> {
        self.unsafe_range
    }

    pub fn is_unsafe_mode(&self) -> bool {
        self.unsafe_mode
    }

    /// Safe range, or the unsafe range while unsafe mode is on
    pub fn active_range(&self) -> ParamRange<T> {
        if self.unsafe_mode {
            self.unsafe_range
        } else {
            self.safe
        }
    }

    /// Value used for rendering, always inside the active range
    pub fn value(&self) -> T {
        self.active_range().coerce(self.raw)
    }

    /// Last value that was set, possibly outside the active range
    pub fn raw_value(&self) -> T {
        self.raw
    }

    /// Raw value lies inside the active range
    pub fn is_valid(&self) -> bool {
        self.active_range().contains(self.raw)
    }

    /// Raw value lies inside the safe range
    pub fn is_safe(&self) -> bool {
        self.safe.contains(self.raw)
    }

    /// Position of [`value`](Self::value) within the active range, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        let range = self.active_range();
        if range.is_empty() {
            return 0.0;
        }
        let span = range.span();
        if span == 0.0 {
            return 0.0;
        }
        ((self.value().to_f32() - range.start.to_f32()) / span).clamp(0.0, 1.0)
    }

    pub fn label(&self) -> String {
        (self.format)(self.value())
    }

    /// Label of the raw value; hosts show it struck through when invalid
    pub fn raw_label(&self) -> String {
        (self.format)(self.raw)
    }

    pub fn set_value(&mut self, value: T) {
        self.raw = self.active_range().coerce(value);
    }

    /// Set without coercion, as an animation or a config file does
    pub fn set_raw_value(&mut self, value: T) {
        self.raw = value;
    }

    /// Linear map of `progress` onto the active range
    pub fn set_progress(&mut self, progress: f32) {
        let range = self.active_range();
        let t = progress.clamp(0.0, 1.0);
        let start = range.start.to_f32();
        let v = start + (range.end.to_f32() - start) * t;
        self.set_value(T::from_f32(v));
    }

    pub fn set_unsafe_mode(&mut self, enabled: bool) {
        self.unsafe_mode = enabled;
    }

    /// Replace both ranges, keeping the raw value
    ///
    /// Used for ranges that depend on other parameters, e.g. a refraction
    /// height bounded by the current corner radius.
    pub fn set_ranges(&mut self, safe: ParamRange<T>, unsafe_range: ParamRange<T>) {
        self.safe = safe;
        self.unsafe_range = unsafe_range.union(&safe);
    }

    /// Jump straight back to the initial value
    pub fn reset(&mut self) {
        self.raw = self.initial;
    }
}

impl<T: ParamScalar + fmt::Debug> fmt::Debug for ParamValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamValue")
            .field("raw", &self.raw)
            .field("value", &self.value())
            .field("safe", &self.safe)
            .field("unsafe_range", &self.unsafe_range)
            .field("unsafe_mode", &self.unsafe_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dp_label(v: Dp) -> String {
        format!("{} dp", v.0.round() as i32)
    }

    fn height() -> ParamValue<Dp> {
        ParamValue::new(
            Dp(24.0),
            ParamRange::new(Dp(0.0), Dp(32.0)),
            ParamRange::new(Dp(0.0), Dp(100.0)),
            dp_label,
        )
    }

    #[test]
    fn test_value_stays_in_active_range() {
        let mut p = height();
        p.set_value(Dp(50.0));
        assert_eq!(p.raw_value(), Dp(32.0));
        assert!(p.is_valid());

        p.set_unsafe_mode(true);
        p.set_value(Dp(80.0));
        assert_eq!(p.value(), Dp(80.0));
        assert!(p.is_valid());
        assert!(!p.is_safe());

        p.set_value(Dp(500.0));
        assert_eq!(p.value(), Dp(100.0));
    }

    #[test]
    fn test_leaving_unsafe_mode_keeps_raw_value() {
        let mut p = height();
        p.set_unsafe_mode(true);
        p.set_value(Dp(80.0));
        p.set_unsafe_mode(false);

        assert_eq!(p.raw_value(), Dp(80.0));
        assert_eq!(p.value(), Dp(32.0));
        assert!(!p.is_valid());
        assert_eq!(p.label(), "32 dp");
        assert_eq!(p.raw_label(), "80 dp");
    }

    #[test]
    fn test_progress_roundtrip() {
        let mut p = height();
        p.set_progress(0.5);
        assert_eq!(p.value(), Dp(16.0));
        assert_eq!(p.progress(), 0.5);

        p.set_progress(2.0);
        assert_eq!(p.value(), Dp(32.0));
        assert_eq!(p.progress(), 1.0);
    }

    #[test]
    fn test_degenerate_range_progress_is_zero() {
        let mut p = height();
        p.set_ranges(
            ParamRange::new(Dp(0.0), Dp(0.0)),
            ParamRange::new(Dp(0.0), Dp(0.0)),
        );
        assert_eq!(p.progress(), 0.0);
        assert_eq!(p.value(), Dp(0.0));
        assert_eq!(p.raw_value(), Dp(24.0));

        p.set_ranges(
            ParamRange::new(Dp(10.0), Dp(5.0)),
            ParamRange::new(Dp(10.0), Dp(5.0)),
        );
        assert_eq!(p.progress(), 0.0);
        assert_eq!(p.value(), Dp(10.0));
    }

    #[test]
    fn test_unsafe_range_contains_safe_range() {
        let p = ParamValue::new(
            1.0_f32,
            ParamRange::new(0.5, 2.0),
            ParamRange::new(1.0, 1.5),
            |v| v.to_string(),
        );
        assert_eq!(p.unsafe_range(), ParamRange::new(0.5, 2.0));
    }

    #[test]
    fn test_reset() {
        let mut p = height();
        p.set_value(Dp(3.0));
        p.reset();
        assert_eq!(p.raw_value(), p.initial());
    }
}
