//! Glaze Core
//!
//! Foundational types for the glaze liquid-glass material:
//!
//! - **Geometry**: points, sizes, rects and the `Vec2` math the SDF uses
//! - **Color**: straight-alpha colors, sRGB transfer and luma weights
//! - **Units**: density-independent `Dp` lengths
//! - **Style**: `GlassStyle` and its pixel-unit `ResolvedStyle`
//! - **Parameters**: bounded `ParamValue`s with safe and unsafe ranges
//! - **Values**: per-frame value sources fed by sampled luminance
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{Density, PlaygroundParams, Size};
//!
//! let mut params = PlaygroundParams::new();
//! params.chroma_multiplier.set_value(1.4);
//!
//! let style = params.to_style().resolve(Size::new(200.0, 200.0), Density::ONE);
//! assert!(style.has_color_grade());
//! ```

pub mod color;
pub mod error;
pub mod geometry;
pub mod param;
pub mod params;
pub mod style;
pub mod tracked;
pub mod units;
pub mod value;

pub use color::{linear_to_srgb, srgb_to_linear, Color, LUMA_601, LUMA_709};
pub use error::{Result, StyleError};
pub use geometry::{Point, Rect, Size, Vec2};
pub use param::{ParamRange, ParamScalar, ParamValue};
pub use params::PlaygroundParams;
pub use style::{
    Bleed, ColorMatrix, CornerRadius, CornerSize, Dispersion, GlassBorder, GlassStyle, Material,
    Refraction, RefractionAmount, ResolvedBorder, ResolvedStyle,
};
pub use tracked::Tracked;
pub use units::{Density, Dp, DpSize};
pub use value::{derived_value, static_value, BoxedValue, Derived, Static, Value, ValueContext};
