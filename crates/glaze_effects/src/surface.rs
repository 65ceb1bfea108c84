//! Glass surfaces
//!
//! A [`GlassSurface`] turns the backdrop region under its bounds into the
//! finished glass image. Per frame it:
//!
//! 1. resolves its style against the latest sampled luminance,
//! 2. rebuilds the effect graph only if the resolved style or size changed,
//! 3. re-renders only if the graph was rebuilt, the backdrop-relative rect
//!    moved, or a new backdrop was recorded,
//!
//! and otherwise hands back the image from the previous frame.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use glaze_core::{
    static_value, BoxedValue, Density, GlassStyle, Rect, ResolvedStyle, Size, ValueContext,
};

use crate::backdrop::{BackdropSnapshot, Canvas};
use crate::cache::{CacheStats, ProgramCache};
use crate::effect::EffectGraph;
use crate::pixmap::Pixmap;
use crate::sampler::{spawn_sampler, SamplerHandle, SamplerPolicy};

/// What the rendering backend supports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCapabilities {
    /// Per-pixel effect programs; without them glass renders nothing and the
    /// host draws its plain content
    pub runtime_effects: bool,
}

impl RenderCapabilities {
    pub const FULL: RenderCapabilities = RenderCapabilities {
        runtime_effects: true,
    };
    pub const NONE: RenderCapabilities = RenderCapabilities {
        runtime_effects: false,
    };
}

impl Default for RenderCapabilities {
    fn default() -> Self {
        Self::FULL
    }
}

/// Per-surface frame counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Calls to `render`
    pub frames: u64,
    /// Frames that produced nothing (unpositioned, empty or unsupported)
    pub skipped: u64,
    pub graph_builds: u64,
    /// Frames that evaluated the graph
    pub records: u64,
    /// Frames served from the previous output
    pub cache_hits: u64,
    /// Graph rebuilds whose style needed clamping
    pub clamp_warnings: u64,
    pub cache: CacheStats,
}

/// One glass surface and its cached rendering state
pub struct GlassSurface {
    style: BoxedValue<GlassStyle>,
    density: Density,
    capabilities: RenderCapabilities,
    bounds: Option<Rect>,

    cache: ProgramCache,
    graph: Option<EffectGraph>,
    last_rect: Option<Rect>,
    last_generation: Option<u64>,
    /// Filtered backdrop before tint, clip and border; what the sampler reads
    layer: Option<Arc<Pixmap>>,
    output: Option<Pixmap>,

    layer_tx: Option<watch::Sender<Option<Arc<Pixmap>>>>,
    sampler: Option<SamplerHandle>,
    stats: SurfaceStats,
}

impl GlassSurface {
    /// Surface whose style is resolved from `style` every frame
    pub fn new(style: BoxedValue<GlassStyle>, density: Density) -> Self {
        Self {
            style,
            density,
            capabilities: RenderCapabilities::default(),
            bounds: None,
            cache: ProgramCache::new(),
            graph: None,
            last_rect: None,
            last_generation: None,
            layer: None,
            output: None,
            layer_tx: None,
            sampler: None,
            stats: SurfaceStats::default(),
        }
    }

    /// Surface with a fixed style
    pub fn with_style(style: GlassStyle, density: Density) -> Self {
        Self::new(static_value(style), density)
    }

    pub fn with_capabilities(mut self, capabilities: RenderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn set_style(&mut self, style: BoxedValue<GlassStyle>) {
        self.style = style;
    }

    pub fn set_density(&mut self, density: Density) {
        self.density = density;
    }

    /// Root-space bounds; `None` while the surface is not positioned
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Style resolved for the current bounds and luminance
    pub fn resolved_style(&self) -> Option<ResolvedStyle> {
        self.resolve().map(|(style, _)| style)
    }

    fn resolve(&self) -> Option<(ResolvedStyle, Vec<&'static str>)> {
        let size = pixel_size(self.bounds?)?;
        let ctx = ValueContext {
            luminance: self.luminance(),
        };
        Some(self.style.get(&ctx).resolve_with_clamps(size, self.density))
    }

    /// Render against `snapshot`
    ///
    /// `None` means the host should draw nothing glass-like this frame: the
    /// surface is unpositioned or empty, or the backend lacks runtime effects.
    pub fn render(&mut self, snapshot: &BackdropSnapshot) -> Option<&Pixmap> {
        self.stats.frames += 1;
        if !self.capabilities.runtime_effects {
            trace!("runtime effects unsupported, glass skipped");
            self.stats.skipped += 1;
            return None;
        }
        let Some(bounds) = self.bounds else {
            trace!("surface not positioned");
            self.stats.skipped += 1;
            return None;
        };
        let Some((style, clamped)) = self.resolve() else {
            self.stats.skipped += 1;
            return None;
        };
        let rect = bounds.relative_to(&snapshot.rect);

        let rebuilt = self.update_graph(&style);
        if rebuilt && !clamped.is_empty() {
            warn!(fields = ?clamped, "glass style clamped into range");
            self.stats.clamp_warnings += 1;
        }
        let stale = rebuilt
            || self.output.is_none()
            || self.last_rect != Some(rect)
            || self.last_generation != Some(snapshot.generation);

        if stale {
            if let Some(graph) = &self.graph {
                let input = snapshot.image.crop(rect);
                let layer = Arc::new(graph.evaluate_layer(&input, &self.cache));
                let output = graph.finish((*layer).clone(), &self.cache);
                if let Some(tx) = &self.layer_tx {
                    tx.send_replace(Some(Arc::clone(&layer)));
                }
                self.layer = Some(layer);
                self.output = Some(output);
                self.last_rect = Some(rect);
                self.last_generation = Some(snapshot.generation);
                self.stats.records += 1;
            }
        } else {
            self.stats.cache_hits += 1;
            trace!("glass output reused");
        }
        self.output.as_ref()
    }

    /// Layer behind the last output, before tint, clip and border
    pub fn layer(&self) -> Option<&Pixmap> {
        self.layer.as_deref()
    }

    /// Render and draw at the surface's bounds; `false` if nothing was drawn
    pub fn draw(&mut self, snapshot: &BackdropSnapshot, canvas: &mut Canvas<'_>) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        match self.render(snapshot) {
            Some(output) => {
                canvas.draw_pixmap(output, bounds.origin);
                true
            }
            None => false,
        }
    }

    fn update_graph(&mut self, style: &ResolvedStyle) -> bool {
        let previous = self.graph.as_ref().map(|g| *g.style());
        if previous.as_ref() == Some(style) {
            return false;
        }
        if let Some(previous) = previous {
            if previous.size != style.size || previous.density != style.density {
                self.cache.on_size_changed();
            }
        }
        self.graph = Some(EffectGraph::build(style, &mut self.cache));
        self.stats.graph_builds += 1;
        true
    }

    /// Start sampling this surface's layer on `handle`
    ///
    /// Replaces any sampler already attached.
    pub fn attach_sampler(&mut self, policy: SamplerPolicy, handle: &Handle) {
        let (tx, rx) = watch::channel(self.layer.clone());
        self.sampler = Some(spawn_sampler(policy, rx, handle));
        self.layer_tx = Some(tx);
    }

    /// Latest sampled luminance, `0.5` without a sampler
    pub fn luminance(&self) -> f32 {
        self.sampler
            .as_ref()
            .map(SamplerHandle::latest)
            .unwrap_or_else(|| ValueContext::default().luminance)
    }

    pub fn has_sampler(&self) -> bool {
        self.sampler.is_some()
    }

    /// Release the layer and programs and cancel sampling
    pub fn detach(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            sampler.cancel();
        }
        self.layer_tx = None;
        self.layer = None;
        self.output = None;
        self.graph = None;
        self.last_rect = None;
        self.last_generation = None;
        self.cache.clear();
        debug!("glass surface detached");
    }

    pub fn stats(&self) -> SurfaceStats {
        SurfaceStats {
            cache: self.cache.stats(),
            ..self.stats
        }
    }

    pub fn program_count(&self) -> usize {
        self.cache.len()
    }
}

fn pixel_size(bounds: Rect) -> Option<Size> {
    let size = Size::new(bounds.width().round(), bounds.height().round());
    (!size.is_empty()).then_some(size)
}
