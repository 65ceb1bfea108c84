//! Rim refraction
//!
//! Near the outline the sampled coordinate is pulled inward, following the
//! circle-map falloff: the full `amount` right at the edge, nothing at
//! `height` pixels inside. The pull direction is the outline normal blended
//! toward the radial direction by the eccentric factor.

use glaze_core::Vec2;

use crate::pixmap::{Pixmap, Rgba, TileMode};
use crate::sdf::{circle_map, RoundedRect};

/// Pixel-unit refraction parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefractionParams {
    /// Depth of the refracting rim; `>= 0`
    pub height: f32,
    /// Displacement at the edge; `<= 0`
    pub amount: f32,
    /// `[0, 1]`
    pub eccentric_factor: f32,
}

impl RefractionParams {
    pub fn is_identity(&self) -> bool {
        self.height <= 0.0 || self.amount == 0.0
    }
}

/// Where a pixel samples the backdrop
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleSite {
    /// Outside the rim: the pixel's own center
    Direct,
    /// Inside the rim: a displaced coordinate within the backdrop
    Displaced(Vec2),
    /// Displaced past the backdrop's extent
    OutOfBounds,
}

/// Sampling site for the pixel centered at `coord` (local pixel space)
pub fn sample_site(
    shape: &RoundedRect,
    coord: Vec2,
    extent: Vec2,
    params: &RefractionParams,
) -> SampleSite {
    if params.is_identity() {
        return SampleSite::Direct;
    }
    let centered = shape.centered(coord.x, coord.y);
    let sd = shape.distance(centered);
    if sd >= 0.0 || -sd >= params.height {
        return SampleSite::Direct;
    }

    let normal = shape.refraction_normal(centered);
    let distance = circle_map(1.0 - (-sd / params.height)) * params.amount;
    let direction = (normal + centered.normalize() * params.eccentric_factor).normalize();
    let refracted = coord + direction * distance;

    if refracted.x < 0.0 || refracted.y < 0.0 || refracted.x >= extent.x || refracted.y >= extent.y
    {
        SampleSite::OutOfBounds
    } else {
        SampleSite::Displaced(refracted)
    }
}

/// Refract `src` through the rim of `shape`
///
/// `src` and the shape share the same local pixel space.
pub fn refract(src: &Pixmap, shape: &RoundedRect, params: &RefractionParams) -> Pixmap {
    if params.is_identity() {
        return src.clone();
    }
    let extent = Vec2::new(src.width() as f32, src.height() as f32);
    Pixmap::from_fn(src.width(), src.height(), |x, y| {
        let coord = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        match sample_site(shape, coord, extent, params) {
            SampleSite::Direct => src.get(x, y).unwrap_or(Rgba::TRANSPARENT),
            SampleSite::Displaced(p) => src.sample(p.x, p.y, TileMode::Clamp),
            SampleSite::OutOfBounds => Rgba::OPAQUE_BLACK,
        }
    })
}
