//! Density-independent lengths
//!
//! Style lengths are authored in [`Dp`] and converted to pixels with the
//! host's [`Density`] when a style is resolved for a frame.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::geometry::Size;

/// Density-independent pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dp(pub f32);

impl Dp {
    pub const ZERO: Dp = Dp(0.0);

    pub fn to_px(self, density: Density) -> f32 {
        self.0 * density.0
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn min(self, other: Dp) -> Dp {
        Dp(self.0.min(other.0))
    }

    pub fn max(self, other: Dp) -> Dp {
        Dp(self.0.max(other.0))
    }
}

impl fmt::Display for Dp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}dp", self.0)
    }
}

impl Add for Dp {
    type Output = Dp;

    fn add(self, rhs: Dp) -> Dp {
        Dp(self.0 + rhs.0)
    }
}

impl Sub for Dp {
    type Output = Dp;

    fn sub(self, rhs: Dp) -> Dp {
        Dp(self.0 - rhs.0)
    }
}

impl Mul<f32> for Dp {
    type Output = Dp;

    fn mul(self, rhs: f32) -> Dp {
        Dp(self.0 * rhs)
    }
}

impl Neg for Dp {
    type Output = Dp;

    fn neg(self) -> Dp {
        Dp(-self.0)
    }
}

/// Width and height in dp
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DpSize {
    pub width: Dp,
    pub height: Dp,
}

impl DpSize {
    pub const fn new(width: Dp, height: Dp) -> Self {
        Self { width, height }
    }

    pub fn min_dimension(&self) -> Dp {
        self.width.min(self.height)
    }

    pub fn to_px(self, density: Density) -> Size {
        Size::new(self.width.to_px(density), self.height.to_px(density))
    }
}

/// Pixels per dp
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Density(pub f32);

impl Density {
    pub const ONE: Density = Density(1.0);

    pub fn new(scale: f32) -> Self {
        Density(scale)
    }

    pub fn to_dp(self, px: f32) -> Dp {
        if self.0 > 0.0 {
            Dp(px / self.0)
        } else {
            Dp::ZERO
        }
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dp_conversion() {
        let density = Density::new(2.5);
        assert_eq!(Dp(16.0).to_px(density), 40.0);
        assert_eq!(density.to_dp(40.0), Dp(16.0));
        assert_eq!(Density(0.0).to_dp(10.0), Dp::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Dp(-32.0).to_string(), "-32.0dp");
    }
}
