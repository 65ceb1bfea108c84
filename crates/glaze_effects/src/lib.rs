//! Glaze Effects
//!
//! A CPU image-filter graph that renders the liquid-glass material from a
//! backdrop snapshot. Every stage works on premultiplied RGBA `f32` pixels
//! and shares the signed-distance convention of [`sdf`]: negative inside the
//! rounded rectangle, zero on its outline.
//!
//! # Pipeline
//!
//! ```text
//! BackdropCapture ─▶ color filter ─▶ blur ─▶ refraction [+ bleed] ─▶ dispersion
//!                   ─▶ color grade ─▶ tint ─▶ clip ─▶ border ─▶ surface output
//! ```
//!
//! [`GlassSurface`] owns the per-surface state: a [`ProgramCache`] of prepared
//! stages, the current [`EffectGraph`] and the last output, which is reused
//! until the style, size, position or backdrop changes. An optional
//! luminance sampler runs as a tokio task and feeds back into the style.
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{Color, Density, Dp, GlassStyle, Rect};
//! use glaze_effects::{BackdropCapture, GlassSurface};
//!
//! let mut capture = BackdropCapture::new(Color::WHITE);
//! let snapshot = capture.record(Rect::new(0.0, 0.0, 200.0, 200.0), |canvas| {
//!     canvas.fill_rect(Rect::new(0.0, 0.0, 100.0, 200.0), Color::BLACK);
//! });
//!
//! let mut surface = GlassSurface::with_style(
//!     GlassStyle::new().corner_radius(Dp(24.0)).refraction(Dp(16.0), Dp(-24.0)),
//!     Density::ONE,
//! );
//! surface.set_bounds(Some(Rect::new(50.0, 50.0, 100.0, 100.0)));
//!
//! let image = surface.render(&snapshot).unwrap();
//! assert_eq!(image.width(), 100);
//! ```

pub mod backdrop;
pub mod bleed;
pub mod blend;
pub mod blur;
pub mod border;
pub mod cache;
pub mod color_grade;
pub mod dispersion;
pub mod effect;
pub mod error;
pub mod pixmap;
pub mod refraction;
pub mod sampler;
pub mod sdf;
pub mod surface;

pub use backdrop::{BackdropCapture, BackdropSnapshot, Canvas};
pub use blend::BlendMode;
pub use cache::{CacheStats, ProgramCache, ProgramId, ProgramKey, ShaderKind, Uniforms};
pub use effect::EffectGraph;
pub use error::{EffectError, Result};
pub use pixmap::{Pixmap, Rgba, TileMode};
pub use sampler::{
    spawn_sampler, ContinuousConfig, ContinuousSampler, ImpulseConfig, ImpulseSampler,
    SamplerHandle, SamplerPolicy,
};
pub use sdf::RoundedRect;
pub use surface::{GlassSurface, RenderCapabilities, SurfaceStats};
