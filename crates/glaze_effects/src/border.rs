//! Border and specular highlight
//!
//! Each border variant renders to its own layer which is then blended over the
//! finished surface image: solid strokes with `Plus`, highlights source-over
//! after a light decal blur.

use glaze_core::{Color, ResolvedBorder, Vec2};

use crate::blend::{composite_same_size, BlendMode};
use crate::blur::{blur_with_kernel, BlurKernel};
use crate::pixmap::{Pixmap, Rgba, TileMode};
use crate::sdf::{coverage, RoundedRect};

/// Highlight softening blur, in dp
pub const HIGHLIGHT_BLUR_DP: f32 = 0.5;

/// Pixel-unit border ready to draw
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BorderPass {
    Solid {
        width: f32,
        color: Color,
    },
    Highlight {
        width: f32,
        color: Color,
        /// Unit vector the light shines from
        light: Vec2,
        decay: f32,
        /// Softening blur radius in pixels
        blur_radius: f32,
    },
}

impl BorderPass {
    /// `None` for a missing or zero-width border
    pub fn from_resolved(border: ResolvedBorder, density: f32) -> Option<Self> {
        match border {
            ResolvedBorder::None => None,
            ResolvedBorder::Solid { width, color } if width > 0.0 => {
                Some(BorderPass::Solid { width, color })
            }
            ResolvedBorder::Highlight {
                width,
                color,
                angle,
                decay,
            } if width > 0.0 => Some(BorderPass::Highlight {
                width,
                color,
                light: Vec2::new(-angle.cos(), -angle.sin()),
                decay,
                blur_radius: HIGHLIGHT_BLUR_DP * density,
            }),
            _ => None,
        }
    }

    pub fn blend_mode(&self) -> BlendMode {
        match self {
            BorderPass::Solid { .. } => BlendMode::Plus,
            BorderPass::Highlight { .. } => BlendMode::SrcOver,
        }
    }

    pub fn blur_radius(&self) -> f32 {
        match self {
            BorderPass::Solid { .. } => 0.0,
            BorderPass::Highlight { blur_radius, .. } => *blur_radius,
        }
    }

    /// Stroke intensity at centered point `p` with signed distance `sd`
    pub fn fraction(&self, shape: &RoundedRect, p: Vec2, sd: f32) -> f32 {
        match *self {
            BorderPass::Solid { width, .. } => (width + sd + 0.5).clamp(0.0, 1.0),
            BorderPass::Highlight {
                width,
                light,
                decay,
                ..
            } => {
                let n = shape.normal(p);
                let facing = n.dot(light).max(n.dot(-light)).max(0.0).powf(decay);
                let depth = (-sd).max(0.0) / width;
                (facing * (1.0 - depth.sqrt())).max(0.0)
            }
        }
    }

    /// Render the stroke into its own layer
    pub fn layer(&self, shape: &RoundedRect, width: u32, height: u32) -> Pixmap {
        let color = match self {
            BorderPass::Solid { color, .. } | BorderPass::Highlight { color, .. } => *color,
        };
        let base = Rgba::from_color(color);
        Pixmap::from_fn(width, height, |x, y| {
            let p = shape.centered(x as f32 + 0.5, y as f32 + 0.5);
            let sd = shape.distance(p);
            let k = coverage(sd) * self.fraction(shape, p, sd);
            if k > 0.0 {
                base.scale(k)
            } else {
                Rgba::TRANSPARENT
            }
        })
    }

    /// Draw the border over `target`, which shares the shape's pixel space
    pub fn draw(&self, target: &mut Pixmap, shape: &RoundedRect, kernel: &BlurKernel) {
        let layer = self.layer(shape, target.width(), target.height());
        let layer = match self {
            BorderPass::Highlight { .. } => blur_with_kernel(&layer, kernel, TileMode::Decal),
            BorderPass::Solid { .. } => layer,
        };
        composite_same_size(target, &layer, self.blend_mode());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::Size;
    use std::f32::consts::FRAC_PI_2;

    fn shape() -> RoundedRect {
        RoundedRect::uniform(Size::new(40.0, 40.0), 8.0)
    }

    #[test]
    fn test_none_and_zero_width() {
        assert_eq!(BorderPass::from_resolved(ResolvedBorder::None, 1.0), None);
        let zero = ResolvedBorder::Solid {
            width: 0.0,
            color: Color::WHITE,
        };
        assert_eq!(BorderPass::from_resolved(zero, 1.0), None);
    }

    #[test]
    fn test_solid_stroke_band() {
        let pass = BorderPass::from_resolved(
            ResolvedBorder::Solid {
                width: 2.0,
                color: Color::WHITE,
            },
            1.0,
        )
        .unwrap();
        assert_eq!(pass.blend_mode(), BlendMode::Plus);
        let layer = pass.layer(&shape(), 40, 40);
        // Inside the stroke, at the edge, and deep inside
        assert_eq!(layer.get(1, 20).unwrap().a, 1.0);
        assert_eq!(layer.get(0, 20).unwrap().a, 1.0);
        assert_eq!(layer.get(10, 20).unwrap().a, 0.0);
    }

    #[test]
    fn test_highlight_follows_light_direction() {
        // Light from straight above: top and bottom edges lit, sides dark
        let pass = BorderPass::from_resolved(
            ResolvedBorder::Highlight {
                width: 3.0,
                color: Color::WHITE,
                angle: FRAC_PI_2,
                decay: 1.0,
            },
            2.0,
        )
        .unwrap();
        assert_eq!(pass.blur_radius(), 1.0);
        let layer = pass.layer(&shape(), 40, 40);
        let top = layer.get(20, 0).unwrap().a;
        let bottom = layer.get(20, 39).unwrap().a;
        let side = layer.get(0, 20).unwrap().a;
        assert!(top > 0.5);
        assert!((top - bottom).abs() < 1e-5);
        assert!(side < 1e-5);
    }

    #[test]
    fn test_draw_keeps_interior() {
        let mut target = Pixmap::filled(40, 40, Rgba::new(0.0, 0.0, 0.5, 1.0));
        let pass = BorderPass::from_resolved(
            ResolvedBorder::Highlight {
                width: 2.0,
                color: Color::WHITE,
                angle: 0.0,
                decay: 1.0,
            },
            1.0,
        )
        .unwrap();
        pass.draw(&mut target, &shape(), &BlurKernel::for_radius(pass.blur_radius()));
        assert_eq!(target.get(20, 20), Some(Rgba::new(0.0, 0.0, 0.5, 1.0)));
        assert!(target.get(0, 20).unwrap().r > 0.0);
    }
}
