//! Easing curves
//!
//! Maps a linear progress `t ∈ [0, 1]` onto an eased progress. Used by
//! [`Tween`](crate::Tween) and, through it, by the continuous luminance
//! sampler.

use serde::{Deserialize, Serialize};

/// Easing function
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// CSS-style cubic bezier through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Material "emphasized decelerate"-like curve
    pub const FAST_OUT_SLOW_IN: Easing = Easing::CubicBezier(0.4, 0.0, 0.2, 1.0);

    /// Apply easing function to a value t in [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn bezier_axis(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_axis_derivative(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Solve x(s) = t for the curve parameter, then evaluate y(s)
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }

    // Newton-Raphson, falling back to bisection when the slope vanishes
    let mut s = t;
    for _ in 0..8 {
        let x = bezier_axis(x1, x2, s) - t;
        if x.abs() < 1e-6 {
            return bezier_axis(y1, y2, s);
        }
        let d = bezier_axis_derivative(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= x / d;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = t;
    for _ in 0..32 {
        let x = bezier_axis(x1, x2, s);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    bezier_axis(y1, y2, s)
}
