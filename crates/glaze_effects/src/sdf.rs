//! Signed distance to a rounded rectangle
//!
//! Every stage shares one convention: the distance is negative inside the
//! shape, zero on the outline, positive outside, and its magnitude is the
//! Euclidean distance to the outline. Points are given in *centered*
//! coordinates, relative to the rectangle's center, with y pointing down.

use glaze_core::{Size, Vec2};

/// Ease-out profile `1 − sqrt(1 − x²)`; input clamped to `[0, 1]`
#[inline]
pub fn circle_map(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    1.0 - (1.0 - x * x).sqrt()
}

/// Anti-aliased coverage of a pixel whose center lies at distance `sd`
#[inline]
pub fn coverage(sd: f32) -> f32 {
    (0.5 - sd).clamp(0.0, 1.0)
}

/// Axis-aligned rectangle SDF
#[inline]
pub fn sd_rect(p: Vec2, half_size: Vec2) -> f32 {
    let d = p.abs() - half_size;
    let outside = d.max(Vec2::ZERO).length();
    let inside = d.x.max(d.y).min(0.0);
    outside + inside
}

/// Rounded rectangle SDF with a single radius
#[inline]
pub fn sd_rounded_rect(p: Vec2, half_size: Vec2, radius: f32) -> f32 {
    sd_rect(p, half_size - Vec2::splat(radius)) - radius
}

/// Analytic outward normal of a rounded rectangle with a single radius
///
/// Inside a corner region the normal points away from the corner circle's
/// center; elsewhere it snaps to the axis of the nearer edge.
pub fn grad_rounded_rect(p: Vec2, half_size: Vec2, radius: f32) -> Vec2 {
    let corner = p.abs() - (half_size - Vec2::splat(radius));
    let sign = p.signum();
    if corner.x >= 0.0 && corner.y >= 0.0 {
        sign.mul_elem(corner.normalize())
    } else if -corner.x < -corner.y {
        sign.mul_elem(Vec2::new(1.0, 0.0))
    } else {
        sign.mul_elem(Vec2::new(0.0, 1.0))
    }
}

/// Rounded rectangle with per-corner radii
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedRect {
    half_size: Vec2,
    /// `[top_left, top_right, bottom_right, bottom_left]`
    radii: [f32; 4],
}

impl RoundedRect {
    /// Radii are clamped into `[0, min(w, h) / 2]`
    pub fn new(size: Size, radii: [f32; 4]) -> Self {
        let half_size = size.half();
        let limit = half_size.x.min(half_size.y).max(0.0);
        Self {
            half_size,
            radii: radii.map(|r| r.clamp(0.0, limit)),
        }
    }

    pub fn uniform(size: Size, radius: f32) -> Self {
        Self::new(size, [radius; 4])
    }

    pub fn half_size(&self) -> Vec2 {
        self.half_size
    }

    pub fn radii(&self) -> [f32; 4] {
        self.radii
    }

    /// Local pixel coordinate to centered coordinate
    #[inline]
    pub fn centered(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x - self.half_size.x, y - self.half_size.y)
    }

    /// Radius of the quadrant `p` lies in
    #[inline]
    pub fn radius_at(&self, p: Vec2) -> f32 {
        match (p.x > 0.0, p.y < 0.0) {
            (false, true) => self.radii[0],
            (true, true) => self.radii[1],
            (true, false) => self.radii[2],
            (false, false) => self.radii[3],
        }
    }

    #[inline]
    pub fn distance(&self, p: Vec2) -> f32 {
        sd_rounded_rect(p, self.half_size, self.radius_at(p))
    }

    /// Analytic normal using the quadrant's own radius
    pub fn normal(&self, p: Vec2) -> Vec2 {
        grad_rounded_rect(p, self.half_size, self.radius_at(p))
    }

    /// Analytic normal with a softened radius
    ///
    /// Uses `min(r × 1.5, max(min(half_w, half_h), r))` in place of the
    /// quadrant radius `r`, which rounds off the normal field near corners.
    pub fn refraction_normal(&self, p: Vec2) -> Vec2 {
        let r = self.radius_at(p);
        let max_grad_radius = self.half_size.x.min(self.half_size.y).max(r);
        let grad_radius = (r * 1.5).min(max_grad_radius);
        grad_rounded_rect(p, self.half_size, grad_radius)
    }

    /// Normal from forward differences (step 0.5 px), for shading paths
    /// where the analytic corner test is inconvenient
    pub fn numeric_normal(&self, p: Vec2) -> Vec2 {
        let eps = 0.5;
        let d = self.distance(p);
        let dx = self.distance(p + Vec2::new(eps, 0.0)) - d;
        let dy = self.distance(p + Vec2::new(0.0, eps)) - d;
        Vec2::new(dx, dy).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> RoundedRect {
        RoundedRect::uniform(Size::new(100.0, 100.0), 20.0)
    }

    #[test]
    fn test_sign_convention() {
        let s = square();
        assert!(s.distance(Vec2::ZERO) < 0.0);
        assert_eq!(s.distance(Vec2::ZERO), -50.0);
        assert_eq!(s.distance(Vec2::new(50.0, 0.0)), 0.0);
        assert_eq!(s.distance(Vec2::new(60.0, 0.0)), 10.0);
        assert!(s.distance(Vec2::new(49.0, 49.0)) > 0.0);
    }

    #[test]
    fn test_corner_distance() {
        let s = square();
        // Corner circle center at (30, 30) with radius 20
        let p = Vec2::new(30.0 + 20.0 * 0.6, 30.0 + 20.0 * 0.8);
        assert!(s.distance(p).abs() < 1e-4);
    }

    #[test]
    fn test_zero_radius_is_rect_sdf() {
        let rect = RoundedRect::uniform(Size::new(80.0, 40.0), 0.0);
        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(39.0, 19.0),
            Vec2::new(50.0, 30.0),
            Vec2::new(-45.0, 0.0),
        ] {
            assert_eq!(rect.distance(p), sd_rect(p, Vec2::new(40.0, 20.0)));
        }
    }

    #[test]
    fn test_radius_clamped_to_half_min() {
        let r = RoundedRect::uniform(Size::new(100.0, 40.0), 80.0);
        assert_eq!(r.radii(), [20.0; 4]);
    }

    #[test]
    fn test_per_quadrant_radius() {
        let r = RoundedRect::new(Size::new(100.0, 100.0), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(r.radius_at(Vec2::new(-10.0, -10.0)), 1.0);
        assert_eq!(r.radius_at(Vec2::new(10.0, -10.0)), 2.0);
        assert_eq!(r.radius_at(Vec2::new(10.0, 10.0)), 3.0);
        assert_eq!(r.radius_at(Vec2::new(-10.0, 10.0)), 4.0);
    }

    #[test]
    fn test_normals() {
        let s = square();
        assert_eq!(s.normal(Vec2::new(45.0, 5.0)), Vec2::new(1.0, 0.0));
        assert_eq!(s.normal(Vec2::new(-5.0, -45.0)), Vec2::new(0.0, -1.0));
        let n = s.normal(Vec2::new(40.0, 40.0));
        assert!((n.x - n.y).abs() < 1e-6);
        assert!((n.length() - 1.0).abs() < 1e-6);

        let numeric = s.numeric_normal(Vec2::new(45.0, 5.0));
        assert!((numeric.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_circle_map() {
        assert_eq!(circle_map(0.0), 0.0);
        assert_eq!(circle_map(1.0), 1.0);
        assert!(circle_map(0.5) < 0.5);
        assert_eq!(circle_map(2.0), 1.0);
    }

    #[test]
    fn test_coverage() {
        assert_eq!(coverage(-3.0), 1.0);
        assert_eq!(coverage(0.0), 0.5);
        assert_eq!(coverage(2.0), 0.0);
    }
}
