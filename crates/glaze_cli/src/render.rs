//! One-shot rendering of a glass surface over a backdrop

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use glaze_core::{Point, Rect};
use glaze_effects::sampler::measure;
use glaze_effects::{
    BackdropCapture, Canvas, GlassSurface, ImpulseConfig, ImpulseSampler, Pixmap, SamplerPolicy,
};
use glaze_image::{load_backdrop, ImageSource};
use tracing::{debug, info};

use crate::config::GlazeConfig;

/// Largest frame edge, in pixels, the renderer will allocate
pub const MAX_DIMENSION: u32 = 16384;

/// A rendered frame: the composited image and the sampled glass layer
pub struct Frame {
    pub composite: Pixmap,
    /// Filtered backdrop under the surface, before tint, clip and border
    pub layer: Option<Pixmap>,
}

/// Capture `backdrop` (or the plain background) and draw the configured surface on it
pub fn render_frame(config: &GlazeConfig, backdrop: Option<&Path>) -> Result<Frame> {
    let surface_rect = config.surface.rect();
    let (right, bottom) = (surface_rect.right(), surface_rect.bottom());
    let finite = right.is_finite() && bottom.is_finite();
    if !finite || surface_rect.width() < 0.0 || surface_rect.height() < 0.0 {
        bail!("Invalid surface rect {:?}", surface_rect);
    }
    if right > MAX_DIMENSION as f32 || bottom > MAX_DIMENSION as f32 {
        bail!(
            "Surface extends to {}x{}, beyond the {}px limit",
            right,
            bottom,
            MAX_DIMENSION
        );
    }
    let fallback = (right.ceil().max(1.0) as u32, bottom.ceil().max(1.0) as u32);
    let image = match backdrop {
        Some(path) => load_backdrop(ImageSource::from(path), fallback, config.background),
        None => Pixmap::new(fallback.0, fallback.1),
    };
    if image.width() > MAX_DIMENSION || image.height() > MAX_DIMENSION {
        bail!(
            "Backdrop is {}x{}, beyond the {}px limit",
            image.width(),
            image.height(),
            MAX_DIMENSION
        );
    }

    let mut capture = BackdropCapture::new(config.background);
    let bounds = Rect::new(0.0, 0.0, image.width() as f32, image.height() as f32);
    let snapshot = capture.record(bounds, |canvas| {
        canvas.draw_pixmap(&image, Point::ZERO);
    });

    let mut surface = GlassSurface::with_style(config.style, config.density());
    surface.set_bounds(Some(surface_rect));

    let mut composite = snapshot.image.clone();
    let drawn = {
        let mut canvas = Canvas::new(&mut composite, snapshot.rect.origin);
        surface.draw(&snapshot, &mut canvas)
    };
    debug!(drawn, stats = ?surface.stats(), "frame rendered");

    Ok(Frame {
        composite,
        layer: surface.layer().cloned(),
    })
}

/// Luminance of the glass layer under `policy`, or its initial value if unmeasurable
pub fn layer_luminance(layer: &Pixmap, policy: &SamplerPolicy) -> f32 {
    measure(layer, policy.grid(), policy.precision())
        .unwrap_or_else(|| policy.initial_luminance())
}

pub fn cmd_render(
    backdrop: Option<&Path>,
    config_path: Option<&Path>,
    out: &Path,
    luminance: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => GlazeConfig::load(path)?,
        None => GlazeConfig::default(),
    };

    let frame = render_frame(&config, backdrop)?;
    glaze_image::save_png(&frame.composite, out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!(
        "Wrote {}x{} frame to {}",
        frame.composite.width(),
        frame.composite.height(),
        out.display()
    );

    if luminance {
        let policy = config.sampler.unwrap_or_default();
        match &frame.layer {
            Some(layer) => println!("luminance: {:.3}", layer_luminance(layer, &policy)),
            None => println!("luminance: n/a (surface not drawn)"),
        }
    }
    Ok(())
}

pub fn cmd_sample(image: &Path, precision: f32, grid: [u32; 2]) -> Result<()> {
    let layer = glaze_image::ImageData::load(ImageSource::from(image))
        .and_then(|data| data.to_pixmap())
        .with_context(|| format!("Failed to load {}", image.display()))?;

    let mut sampler = ImpulseSampler::new(ImpulseConfig {
        precision,
        grid,
        ..Default::default()
    });
    let value = sampler.sample(&layer, Instant::now());
    println!("{value:.3}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::{Color, Dp, GlassBorder, GlassStyle};
    use glaze_effects::Rgba;

    fn config() -> GlazeConfig {
        let mut config = GlazeConfig::default();
        config.background = Color::BLACK;
        config.surface.x = 10.0;
        config.surface.y = 20.0;
        config.surface.width = 30.0;
        config.surface.height = 30.0;
        config.style = GlassStyle::new()
            .refraction(Dp::ZERO, Dp::ZERO)
            .tint(Color::WHITE)
            .border(GlassBorder::None);
        config
    }

    #[test]
    fn test_render_without_backdrop_uses_background() {
        let frame = render_frame(&config(), None).unwrap();
        assert_eq!((frame.composite.width(), frame.composite.height()), (40, 50));
        assert_eq!(frame.composite.get(0, 0), Some(Rgba::from_color(Color::BLACK)));
        // opaque white tint at the surface center
        assert_eq!(frame.composite.get(25, 35), Some(Rgba::from_color(Color::WHITE)));
    }

    #[test]
    fn test_missing_backdrop_falls_back() {
        let frame = render_frame(&config(), Some(Path::new("missing/backdrop.png"))).unwrap();
        assert_eq!(frame.composite.get(1, 1), Some(Rgba::from_color(Color::BLACK)));
        assert!(frame.layer.is_some());
    }

    #[test]
    fn test_layer_luminance_ignores_tint() {
        let mut config = config();
        config.background = Color::WHITE;
        config.style = config
            .style
            .corner_radius(Dp(15.0))
            .tint(Color::BLACK.with_alpha(0.5));
        let frame = render_frame(&config, None).unwrap();
        let layer = frame.layer.unwrap();
        assert_eq!((layer.width(), layer.height()), (30, 30));
        assert_eq!(layer_luminance(&layer, &SamplerPolicy::default()), 1.0);
        // the composite still shows the tint
        assert!(frame.composite.get(25, 35).unwrap().r < 0.6);
    }

    #[test]
    fn test_oversized_surface_is_rejected() {
        let mut config = config();
        config.surface.width = 1e9;
        let err = render_frame(&config, None).err().unwrap();
        assert!(err.to_string().contains("limit"));

        config.surface.width = f32::NAN;
        assert!(render_frame(&config, None).is_err());
    }
}
