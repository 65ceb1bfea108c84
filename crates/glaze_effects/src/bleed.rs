//! Bleed halo
//!
//! A second, much deeper refraction of the same input, brightened where it
//! is dark and optionally blurred. The primary refraction is darkened by its
//! own luma scaled by the bleed opacity and drawn source-over on top, so the
//! halo shows through where the primary result thins out.

use crate::blend::BlendMode;
use crate::blur::{blur_with_kernel, BlurKernel};
use crate::pixmap::{Pixmap, Rgba, TileMode};
use crate::refraction::{refract, RefractionParams};
use crate::sdf::{circle_map, RoundedRect};

/// Bleed height relative to the largest corner radius
pub const BLEED_HEIGHT_FACTOR: f32 = 3.5;

/// Pixel-unit bleed parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BleedParams {
    /// Displacement at the edge; `<= 0`
    pub amount: f32,
    /// `[0, 1]`; `0` disables the stage
    pub opacity: f32,
    pub blur_radius: f32,
    pub eccentric_factor: f32,
    /// Refraction depth, [`BLEED_HEIGHT_FACTOR`] times the corner radius
    pub height: f32,
}

impl BleedParams {
    pub fn new(
        amount: f32,
        opacity: f32,
        blur_radius: f32,
        eccentric_factor: f32,
        corner_radius: f32,
    ) -> Self {
        Self {
            amount,
            opacity,
            blur_radius,
            eccentric_factor,
            height: corner_radius * BLEED_HEIGHT_FACTOR,
        }
    }

    pub fn is_active(&self) -> bool {
        self.opacity > 0.0
    }

    fn refraction(&self) -> RefractionParams {
        RefractionParams {
            height: self.height,
            amount: self.amount,
            eccentric_factor: self.eccentric_factor,
        }
    }
}

/// Mix a premultiplied pixel toward white by `0.5 × circle_map(1 − luma)`
#[inline]
pub fn whiten(px: Rgba) -> Rgba {
    let k = 0.5 * circle_map(1.0 - px.luma());
    Rgba::new(
        px.r + (px.a - px.r) * k,
        px.g + (px.a - px.g) * k,
        px.b + (px.a - px.b) * k,
        px.a,
    )
}

/// The halo layer alone: deep refraction, whitening, then a clamped blur
pub fn bleed_layer(
    src: &Pixmap,
    shape: &RoundedRect,
    params: &BleedParams,
    kernel: &BlurKernel,
) -> Pixmap {
    let mut layer = refract(src, shape, &params.refraction());
    layer.map_in_place(whiten);
    blur_with_kernel(&layer, kernel, TileMode::Clamp)
}

/// Combine the primary refraction with the halo
///
/// With opacity `0` the primary image is returned untouched.
pub fn apply_bleed(primary: Pixmap, halo: &Pixmap, opacity: f32) -> Pixmap {
    if opacity <= 0.0 {
        return primary;
    }
    let mut out = halo.clone();
    for (dst, src) in out.pixels_mut().iter_mut().zip(primary.pixels()) {
        let darkened = src.scale(1.0 - opacity * src.luma());
        *dst = BlendMode::SrcOver.blend(darkened, *dst);
    }
    out
}
