//! Prepared stage programs
//!
//! Every stage of the effect graph is a [`Program`]: a stage kind plus its
//! uniforms and any precomputed blur kernel. Programs live in a slot-map
//! arena owned by one surface and are looked up by [`ProgramKey`], so an
//! unchanged stage is reused as-is and a changed one has its uniforms updated
//! in place instead of being rebuilt.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use glaze_core::ColorMatrix;

use crate::bleed::{apply_bleed, bleed_layer, BleedParams};
use crate::blur::{blur_with_kernel, BlurKernel, KernelCache};
use crate::border::BorderPass;
use crate::color_grade::{color_filter, color_grade, ColorGrade};
use crate::dispersion::disperse;
use crate::pixmap::{Pixmap, TileMode};
use crate::refraction::{refract, RefractionParams};
use crate::sdf::RoundedRect;

new_key_type! {
    /// Handle to a prepared program
    pub struct ProgramId;
}

/// Kind of stage a program evaluates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    ColorFilter,
    Blur,
    Refraction,
    Dispersion,
    ColorGrade,
    Border,
}

/// Cache key; refraction programs with and without a bleed layer differ
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramKey {
    pub kind: ShaderKind,
    pub has_bleed: bool,
}

impl ProgramKey {
    pub const fn new(kind: ShaderKind) -> Self {
        Self {
            kind,
            has_bleed: false,
        }
    }

    pub const fn refraction(has_bleed: bool) -> Self {
        Self {
            kind: ShaderKind::Refraction,
            has_bleed,
        }
    }
}

/// Uniform values of one program
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniforms {
    ColorFilter(ColorMatrix),
    Blur {
        radius: f32,
        tile_mode: TileMode,
    },
    Refraction {
        shape: RoundedRect,
        params: RefractionParams,
        bleed: Option<BleedParams>,
    },
    Dispersion {
        shape: RoundedRect,
        height: f32,
    },
    ColorGrade(ColorGrade),
    Border {
        shape: RoundedRect,
        pass: BorderPass,
    },
}

impl Uniforms {
    pub fn kind(&self) -> ShaderKind {
        match self {
            Uniforms::ColorFilter(_) => ShaderKind::ColorFilter,
            Uniforms::Blur { .. } => ShaderKind::Blur,
            Uniforms::Refraction { .. } => ShaderKind::Refraction,
            Uniforms::Dispersion { .. } => ShaderKind::Dispersion,
            Uniforms::ColorGrade(_) => ShaderKind::ColorGrade,
            Uniforms::Border { .. } => ShaderKind::Border,
        }
    }

    /// Key these uniforms are cached under
    pub fn key(&self) -> ProgramKey {
        match self {
            Uniforms::Refraction { bleed, .. } => ProgramKey::refraction(bleed.is_some()),
            other => ProgramKey::new(other.kind()),
        }
    }

    fn blur_radius(&self) -> Option<f32> {
        match self {
            Uniforms::Blur { radius, .. } => Some(*radius),
            Uniforms::Refraction {
                bleed: Some(bleed), ..
            } => Some(bleed.blur_radius),
            Uniforms::Border { pass, .. } => Some(pass.blur_radius()),
            _ => None,
        }
    }
}

/// A prepared stage
#[derive(Debug)]
pub struct Program {
    key: ProgramKey,
    uniforms: Uniforms,
    kernel: Option<Arc<BlurKernel>>,
}

impl Program {
    fn build(uniforms: Uniforms, kernels: &mut KernelCache) -> Self {
        Self {
            key: uniforms.key(),
            kernel: uniforms.blur_radius().map(|r| kernels.get(r)),
            uniforms,
        }
    }

    fn update(&mut self, uniforms: Uniforms, kernels: &mut KernelCache) {
        if uniforms.blur_radius() != self.uniforms.blur_radius() {
            self.kernel = uniforms.blur_radius().map(|r| kernels.get(r));
        }
        self.uniforms = uniforms;
    }

    pub fn key(&self) -> ProgramKey {
        self.key
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    fn with_kernel<R>(&self, f: impl FnOnce(&BlurKernel) -> R) -> R {
        match &self.kernel {
            Some(kernel) => f(kernel),
            None => f(&BlurKernel::new(0.0)),
        }
    }

    /// Evaluate the stage over `input`
    pub fn run(&self, mut input: Pixmap) -> Pixmap {
        match &self.uniforms {
            Uniforms::ColorFilter(matrix) => {
                color_filter(&mut input, matrix);
                input
            }
            Uniforms::Blur { tile_mode, .. } => match &self.kernel {
                Some(kernel) => blur_with_kernel(&input, kernel, *tile_mode),
                None => input,
            },
            Uniforms::Refraction {
                shape,
                params,
                bleed,
            } => {
                let primary = refract(&input, shape, params);
                match bleed {
                    Some(bleed) if bleed.is_active() => {
                        let halo = self.with_kernel(|k| bleed_layer(&input, shape, bleed, k));
                        apply_bleed(primary, &halo, bleed.opacity)
                    }
                    _ => primary,
                }
            }
            Uniforms::Dispersion { shape, height } => disperse(&input, shape, *height),
            Uniforms::ColorGrade(grade) => {
                color_grade(&mut input, grade);
                input
            }
            Uniforms::Border { shape, pass } => {
                self.with_kernel(|k| pass.draw(&mut input, shape, k));
                input
            }
        }
    }
}

/// Counters for cache observability
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Programs created from scratch
    pub builds: u64,
    /// Programs whose uniforms were replaced in place
    pub updates: u64,
    /// Prepares that found an identical program
    pub reuses: u64,
    /// Programs dropped by invalidation
    pub evictions: u64,
}

/// Arena of prepared programs, one per [`ProgramKey`]
#[derive(Debug, Default)]
pub struct ProgramCache {
    programs: SlotMap<ProgramId, Program>,
    by_key: FxHashMap<ProgramKey, ProgramId>,
    kernels: KernelCache,
    stats: CacheStats,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a program for `key` carrying `uniforms`
    ///
    /// An equal program is reused, a program under the same key gets its
    /// uniforms replaced, anything else is built fresh.
    pub fn prepare(&mut self, key: ProgramKey, uniforms: Uniforms) -> ProgramId {
        if let Some(&id) = self.by_key.get(&key) {
            if let Some(program) = self.programs.get_mut(id) {
                if program.uniforms == uniforms {
                    self.stats.reuses += 1;
                    trace!(?key, "program reused");
                } else {
                    program.update(uniforms, &mut self.kernels);
                    self.stats.updates += 1;
                    trace!(?key, "program uniforms updated");
                }
                return id;
            }
        }

        let id = self.programs.insert(Program::build(uniforms, &mut self.kernels));
        self.by_key.insert(key, id);
        self.stats.builds += 1;
        debug!(?key, "program built");
        id
    }

    pub fn get(&self, id: ProgramId) -> Option<&Program> {
        self.programs.get(id)
    }

    pub fn contains_key(&self, key: &ProgramKey) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop programs whose keys the new style no longer uses
    pub fn on_style_changed(&mut self, active: &[ProgramKey]) {
        let stale: Vec<ProgramKey> = self
            .by_key
            .keys()
            .filter(|k| !active.contains(k))
            .copied()
            .collect();
        for key in stale {
            self.evict(key);
        }
    }

    /// Drop programs whose uniforms depend on the surface geometry
    pub fn on_size_changed(&mut self) {
        let geometric: Vec<ProgramKey> = self
            .by_key
            .keys()
            .filter(|k| {
                matches!(
                    k.kind,
                    ShaderKind::Refraction | ShaderKind::Dispersion | ShaderKind::Border
                )
            })
            .copied()
            .collect();
        for key in geometric {
            self.evict(key);
        }
    }

    /// Release every program and kernel
    pub fn clear(&mut self) {
        self.stats.evictions += self.programs.len() as u64;
        self.programs.clear();
        self.by_key.clear();
        self.kernels.clear();
        debug!("program cache cleared");
    }

    fn evict(&mut self, key: ProgramKey) {
        if let Some(id) = self.by_key.remove(&key) {
            self.programs.remove(id);
            self.stats.evictions += 1;
            debug!(?key, "program evicted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::Size;

    fn blur(radius: f32) -> Uniforms {
        Uniforms::Blur {
            radius,
            tile_mode: TileMode::Clamp,
        }
    }

    fn refraction(bleed: bool) -> Uniforms {
        Uniforms::Refraction {
            shape: RoundedRect::uniform(Size::new(20.0, 20.0), 4.0),
            params: RefractionParams {
                height: 4.0,
                amount: -4.0,
                eccentric_factor: 1.0,
            },
            bleed: bleed.then(|| BleedParams::new(-4.0, 0.5, 2.0, 1.0, 4.0)),
        }
    }

    #[test]
    fn test_prepare_reuses_equal_program() {
        let mut cache = ProgramCache::new();
        let key = ProgramKey::new(ShaderKind::Blur);
        let a = cache.prepare(key, blur(4.0));
        let b = cache.prepare(key, blur(4.0));
        assert_eq!(a, b);
        assert_eq!(
            cache.stats(),
            CacheStats {
                builds: 1,
                reuses: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_prepare_updates_in_place() {
        let mut cache = ProgramCache::new();
        let key = ProgramKey::new(ShaderKind::Blur);
        let a = cache.prepare(key, blur(4.0));
        let b = cache.prepare(key, blur(8.0));
        assert_eq!(a, b);
        assert_eq!(cache.stats().updates, 1);
        assert_eq!(cache.get(b).unwrap().uniforms(), &blur(8.0));
    }

    #[test]
    fn test_bleed_is_part_of_key() {
        let mut cache = ProgramCache::new();
        let plain = cache.prepare(refraction(false).key(), refraction(false));
        let bled = cache.prepare(refraction(true).key(), refraction(true));
        assert_ne!(plain, bled);
        assert_eq!(cache.len(), 2);
        assert!(cache.contains_key(&ProgramKey::refraction(true)));
    }

    #[test]
    fn test_invalidation_hooks() {
        let mut cache = ProgramCache::new();
        cache.prepare(ProgramKey::new(ShaderKind::Blur), blur(2.0));
        cache.prepare(refraction(false).key(), refraction(false));

        cache.on_size_changed();
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains_key(&ProgramKey::refraction(false)));

        cache.on_style_changed(&[ProgramKey::new(ShaderKind::ColorGrade)]);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().evictions, 2);

        cache.prepare(ProgramKey::new(ShaderKind::Blur), blur(2.0));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().builds, 3);
    }

    #[test]
    fn test_run_blur_program() {
        let mut cache = ProgramCache::new();
        let id = cache.prepare(ProgramKey::new(ShaderKind::Blur), blur(0.0));
        let input = Pixmap::filled(4, 4, crate::pixmap::Rgba::OPAQUE_BLACK);
        let out = cache.get(id).unwrap().run(input.clone());
        assert_eq!(out, input);
    }
}
