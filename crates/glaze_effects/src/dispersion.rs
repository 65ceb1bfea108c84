//! Chromatic dispersion along the rim
//!
//! Inside the rim each pixel sweeps a line of samples along the outline
//! tangent. The first half of the sweep feeds blue, the middle half green and
//! the second half red, which splits the channels into a prism-like fringe.

use glaze_core::Vec2;

use crate::pixmap::{Pixmap, TileMode};
use crate::sdf::{circle_map, RoundedRect};

/// Upper bound on samples per pixel
pub const MAX_SAMPLES: u32 = 100;

/// Sweeps narrower than this many pixels sample directly
const MIN_WIDTH: f32 = 2.0;

/// Width of the tangent sweep at signed distance `sd` for a rim of `height`
#[inline]
pub fn sweep_width(sd: f32, height: f32) -> f32 {
    let f = circle_map(1.0 - (-sd / height));
    height * 2.0 * f * f
}

/// Disperse `src` within `height` pixels of the outline of `shape`
pub fn disperse(src: &Pixmap, shape: &RoundedRect, height: f32) -> Pixmap {
    if height <= 0.0 {
        return src.clone();
    }
    let mut out = src.clone();
    for y in 0..src.height() {
        for x in 0..src.width() {
            let coord = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let centered = shape.centered(coord.x, coord.y);
            let sd = shape.distance(centered);
            if sd >= 0.0 || -sd >= height {
                continue;
            }
            let width = sweep_width(sd, height);
            if width < MIN_WIDTH {
                continue;
            }
            let tangent = shape.normal(centered).perpendicular();
            let mut sum = [0.0f32; 3];
            let mut count = [0u32; 3];
            let max_i = width.min(MAX_SAMPLES as f32);
            for i in 0..MAX_SAMPLES {
                let t = i as f32 / max_i;
                if t > 1.0 {
                    break;
                }
                let p = coord + tangent * ((t - 0.5) * width);
                let px = src.sample(p.x, p.y, TileMode::Clamp);
                if t < 0.5 {
                    sum[2] += px.b;
                    count[2] += 1;
                }
                if t > 0.25 && t < 0.75 {
                    sum[1] += px.g;
                    count[1] += 1;
                }
                if t > 0.5 {
                    sum[0] += px.r;
                    count[0] += 1;
                }
            }
            let Some(mut px) = src.get(x, y) else {
                continue;
            };
            let avg = |i: usize, fallback: f32| {
                if count[i] == 0 {
                    fallback
                } else {
                    sum[i] / count[i] as f32
                }
            };
            px.r = avg(0, px.r).min(px.a);
            px.g = avg(1, px.g).min(px.a);
            px.b = avg(2, px.b).min(px.a);
            out.set(x, y, px);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::Rgba;

    fn stripes() -> Pixmap {
        Pixmap::from_fn(80, 80, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba::new(1.0, 0.0, 0.0, 1.0)
            } else {
                Rgba::new(0.0, 0.0, 1.0, 1.0)
            }
        })
    }

    #[test]
    fn test_zero_height_is_identity() {
        let src = stripes();
        let shape = RoundedRect::uniform(src.size(), 16.0);
        assert_eq!(disperse(&src, &shape, 0.0), src);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let src = Pixmap::filled(60, 60, Rgba::new(0.3, 0.6, 0.9, 1.0));
        let shape = RoundedRect::uniform(src.size(), 12.0);
        let out = disperse(&src, &shape, 20.0);
        for (a, b) in out.pixels().iter().zip(src.pixels()) {
            assert!(a.approx_eq(b, 1e-5));
        }
    }

    #[test]
    fn test_interior_passes_through() {
        let src = stripes();
        let shape = RoundedRect::uniform(src.size(), 16.0);
        let out = disperse(&src, &shape, 10.0);
        assert_eq!(out.get(40, 40), src.get(40, 40));
    }

    #[test]
    fn test_edge_splits_channels() {
        let src = stripes();
        let shape = RoundedRect::uniform(src.size(), 8.0);
        let out = disperse(&src, &shape, 20.0);
        let changed = (0..80)
            .filter(|&y| out.get(0, y) != src.get(0, y))
            .count();
        assert!(changed > 0);
        for px in out.pixels() {
            assert!(px.r <= px.a + 1e-6 && px.b <= px.a + 1e-6);
        }
    }

    #[test]
    fn test_sweep_width() {
        assert_eq!(sweep_width(-20.0, 20.0), 0.0);
        assert!((sweep_width(0.0, 20.0) - 40.0).abs() < 1e-5);
        assert!(sweep_width(-15.0, 20.0) < MIN_WIDTH);
    }
}
