//! The glass effect graph
//!
//! A [`ResolvedStyle`] expands into a fixed chain of programs:
//!
//! ```text
//! color filter → blur (clamp) → refraction [+ bleed] → dispersion → color grade
//!     → tint → shape clip → border
//! ```
//!
//! Disabled stages are left out. Only the backdrop feeds the chain; every
//! node reads the output of the node before it.

use smallvec::SmallVec;
use tracing::debug;

use glaze_core::{Color, ResolvedStyle};

use crate::bleed::BleedParams;
use crate::blend::BlendMode;
use crate::border::BorderPass;
use crate::cache::{ProgramCache, ProgramId, ProgramKey, ShaderKind, Uniforms};
use crate::color_grade::ColorGrade;
use crate::pixmap::{Pixmap, Rgba, TileMode};
use crate::refraction::RefractionParams;
use crate::sdf::{coverage, RoundedRect};

/// Shape the graph clips to, in local pixel space of `style.size`
pub fn shape_of(style: &ResolvedStyle) -> RoundedRect {
    RoundedRect::new(style.size, style.corner_radii)
}

/// Uniforms for every enabled stage, in evaluation order
pub fn stage_uniforms(style: &ResolvedStyle) -> SmallVec<[Uniforms; 6]> {
    let shape = shape_of(style);
    let mut stages = SmallVec::new();

    if let Some(matrix) = style.color_filter {
        stages.push(Uniforms::ColorFilter(matrix));
    }
    if style.blur_radius > 0.0 {
        stages.push(Uniforms::Blur {
            radius: style.blur_radius,
            tile_mode: TileMode::Clamp,
        });
    }
    if style.has_refraction() || style.has_bleed() {
        let bleed = style.has_bleed().then(|| {
            BleedParams::new(
                style.bleed_amount,
                style.bleed_opacity,
                style.bleed_blur_radius,
                style.eccentric_factor,
                style.max_corner_radius(),
            )
        });
        stages.push(Uniforms::Refraction {
            shape,
            params: RefractionParams {
                height: style.refraction_height,
                amount: style.refraction_amount,
                eccentric_factor: style.eccentric_factor,
            },
            bleed,
        });
    }
    if style.has_dispersion() {
        stages.push(Uniforms::Dispersion {
            shape,
            height: style.dispersion_height,
        });
    }
    if style.has_color_grade() {
        stages.push(Uniforms::ColorGrade(ColorGrade {
            contrast: style.contrast,
            white_point: style.white_point,
            chroma_multiplier: style.chroma_multiplier,
        }));
    }
    if let Some(pass) = BorderPass::from_resolved(style.border, style.density.0) {
        stages.push(Uniforms::Border { shape, pass });
    }
    stages
}

/// Chain of prepared programs for one resolved style
#[derive(Debug, Clone)]
pub struct EffectGraph {
    style: ResolvedStyle,
    shape: RoundedRect,
    nodes: SmallVec<[ProgramId; 5]>,
    border: Option<ProgramId>,
}

impl EffectGraph {
    /// Prepare every stage of `style` in `cache`
    ///
    /// Programs for stages the style no longer uses are evicted.
    pub fn build(style: &ResolvedStyle, cache: &mut ProgramCache) -> Self {
        let stages = stage_uniforms(style);
        let keys: SmallVec<[ProgramKey; 6]> = stages.iter().map(Uniforms::key).collect();
        cache.on_style_changed(&keys);

        let mut nodes = SmallVec::new();
        let mut border = None;
        for uniforms in stages {
            let id = cache.prepare(uniforms.key(), uniforms);
            if uniforms.kind() == ShaderKind::Border {
                border = Some(id);
            } else {
                nodes.push(id);
            }
        }
        debug!(
            stages = nodes.len() + border.is_some() as usize,
            width = style.size.width,
            height = style.size.height,
            "effect graph built"
        );
        Self {
            style: *style,
            shape: shape_of(style),
            nodes,
            border,
        }
    }

    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    pub fn shape(&self) -> &RoundedRect {
        &self.shape
    }

    /// Stage kinds in evaluation order, border last
    pub fn stages<'a>(&'a self, cache: &'a ProgramCache) -> impl Iterator<Item = ShaderKind> + 'a {
        self.nodes
            .iter()
            .chain(self.border.iter())
            .filter_map(|id| cache.get(*id))
            .map(|p| p.key().kind)
    }

    /// Run the chain over `input`, the backdrop region under the surface
    pub fn evaluate(&self, input: &Pixmap, cache: &ProgramCache) -> Pixmap {
        self.finish(self.evaluate_layer(input, cache), cache)
    }

    /// Run only the filter nodes, up to and including the color grade
    ///
    /// This is the glass layer the luminance sampler reads: unclipped, with
    /// no tint or border over it.
    pub fn evaluate_layer(&self, input: &Pixmap, cache: &ProgramCache) -> Pixmap {
        let mut image = input.clone();
        for id in &self.nodes {
            if let Some(program) = cache.get(*id) {
                image = program.run(image);
            }
        }
        image
    }

    /// Tint, clip and outline a layer produced by [`evaluate_layer`](Self::evaluate_layer)
    pub fn finish(&self, mut image: Pixmap, cache: &ProgramCache) -> Pixmap {
        if self.style.has_tint() {
            tint(&mut image, self.style.tint);
        }
        clip(&mut image, &self.shape);

        if let Some(program) = self.border.and_then(|id| cache.get(id)) {
            image = program.run(image);
        }
        image
    }
}

/// Paint `color` source-over the whole image
pub fn tint(image: &mut Pixmap, color: Color) {
    let src = Rgba::from_color(color);
    image.map_in_place(|dst| BlendMode::SrcOver.blend(src, dst));
}

/// Multiply every pixel by the shape's anti-aliased coverage
pub fn clip(image: &mut Pixmap, shape: &RoundedRect) {
    for y in 0..image.height() {
        for x in 0..image.width() {
            let p = shape.centered(x as f32 + 0.5, y as f32 + 0.5);
            let k = coverage(shape.distance(p));
            if k < 1.0 {
                if let Some(px) = image.get(x, y) {
                    image.set(x, y, px.scale(k));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::{Density, Dp, GlassBorder, GlassStyle, Size};

    fn resolve(style: GlassStyle) -> ResolvedStyle {
        style.resolve(Size::new(40.0, 40.0), Density::ONE)
    }

    fn bare() -> GlassStyle {
        GlassStyle::new()
            .refraction(Dp(0.0), Dp(0.0))
            .border(GlassBorder::None)
    }

    #[test]
    fn test_stage_order() {
        let style = resolve(
            GlassStyle::new()
                .blur(Dp(4.0))
                .refraction(Dp(8.0), Dp(-8.0))
                .dispersion(Dp(4.0))
                .contrast(0.2)
                .border(GlassBorder::solid()),
        );
        let mut cache = ProgramCache::new();
        let graph = EffectGraph::build(&style, &mut cache);
        let kinds: Vec<_> = graph.stages(&cache).collect();
        assert_eq!(
            kinds,
            vec![
                ShaderKind::Blur,
                ShaderKind::Refraction,
                ShaderKind::Dispersion,
                ShaderKind::ColorGrade,
                ShaderKind::Border,
            ]
        );
    }

    #[test]
    fn test_bare_style_only_clips() {
        let style = resolve(bare());
        let mut cache = ProgramCache::new();
        let graph = EffectGraph::build(&style, &mut cache);
        assert_eq!(graph.stages(&cache).count(), 0);

        let input = Pixmap::filled(40, 40, Rgba::new(0.2, 0.4, 0.6, 1.0));
        let out = graph.evaluate(&input, &cache);
        assert_eq!(out.get(20, 20), input.get(20, 20));
        // Outside the rounded corner
        assert_eq!(out.get(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_tint_is_source_over() {
        let style = resolve(bare().tint(Color::WHITE.with_alpha(0.5)));
        let mut cache = ProgramCache::new();
        let graph = EffectGraph::build(&style, &mut cache);
        let out = graph.evaluate(&Pixmap::filled(40, 40, Rgba::OPAQUE_BLACK), &cache);
        assert!(out.get(20, 20).unwrap().approx_eq(&Rgba::new(0.5, 0.5, 0.5, 1.0), 1e-6));
    }

    #[test]
    fn test_layer_excludes_tint_and_clip() {
        let style = resolve(
            bare()
                .corner_radius(Dp(20.0))
                .tint(Color::BLACK.with_alpha(0.5))
                .border(GlassBorder::solid()),
        );
        let mut cache = ProgramCache::new();
        let graph = EffectGraph::build(&style, &mut cache);
        let input = Pixmap::filled(40, 40, Rgba::OPAQUE_WHITE);

        let layer = graph.evaluate_layer(&input, &cache);
        assert_eq!(layer.get(0, 0), Some(Rgba::OPAQUE_WHITE));
        assert_eq!(layer.get(20, 20), Some(Rgba::OPAQUE_WHITE));

        let out = graph.finish(layer, &cache);
        assert_eq!(out.get(0, 0), Some(Rgba::TRANSPARENT));
        assert!(out.get(20, 20).unwrap().r < 0.6);
    }

    #[test]
    fn test_rebuild_evicts_unused_stages() {
        let mut cache = ProgramCache::new();
        EffectGraph::build(&resolve(bare().blur(Dp(4.0))), &mut cache);
        assert_eq!(cache.len(), 1);
        EffectGraph::build(&resolve(bare().contrast(0.3)), &mut cache);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains_key(&ProgramKey::new(ShaderKind::ColorGrade)));
    }
}
