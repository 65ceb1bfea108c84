//! Glass style model
//!
//! A [`GlassStyle`] is the per-frame configuration of one glass surface. It is
//! authored in density-independent units and may hold values outside their
//! documented domains (a config file or a slider in unsafe mode can produce
//! them). [`GlassStyle::resolve`] turns it into a pixel-unit
//! [`ResolvedStyle`] with every invariant enforced, and that resolved value is
//! what the effect graph consumes and what the graph cache compares.
//!
//! # Example
//!
//! ```rust
//! use glaze_core::{Density, Dp, GlassStyle, Size};
//!
//! let style = GlassStyle::new()
//!     .corner_radius(Dp(30.0))
//!     .refraction(Dp(20.0), Dp(-60.0))
//!     .eccentric_factor(1.0);
//!
//! let resolved = style.resolve(Size::new(300.0, 300.0), Density::new(2.0));
//! assert_eq!(resolved.refraction_height, 40.0);
//! assert_eq!(resolved.refraction_amount, -120.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::{Result, StyleError};
use crate::geometry::Size;
use crate::units::{Density, Dp};

// ─────────────────────────────────────────────────────────────────────────────
// Shape
// ─────────────────────────────────────────────────────────────────────────────

/// Size of one corner
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerSize {
    /// Absolute radius
    Dp(Dp),
    /// Percentage of the shorter side; 50 makes a pill / circle
    Percent(f32),
}

impl CornerSize {
    pub fn to_px(self, size: Size, density: Density) -> f32 {
        match self {
            CornerSize::Dp(dp) => dp.to_px(density),
            CornerSize::Percent(p) => size.min_dimension() * p / 100.0,
        }
    }
}

impl Default for CornerSize {
    fn default() -> Self {
        CornerSize::Dp(Dp(32.0))
    }
}

impl From<Dp> for CornerSize {
    fn from(dp: Dp) -> Self {
        CornerSize::Dp(dp)
    }
}

/// Per-corner radii of the rounded-rectangle shape
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerRadius {
    pub top_left: CornerSize,
    pub top_right: CornerSize,
    pub bottom_right: CornerSize,
    pub bottom_left: CornerSize,
}

impl CornerRadius {
    pub fn uniform(size: impl Into<CornerSize>) -> Self {
        let size = size.into();
        Self {
            top_left: size,
            top_right: size,
            bottom_right: size,
            bottom_left: size,
        }
    }

    /// Fully rounded shorter side
    pub fn pill() -> Self {
        Self::uniform(CornerSize::Percent(50.0))
    }

    pub fn new(
        top_left: impl Into<CornerSize>,
        top_right: impl Into<CornerSize>,
        bottom_right: impl Into<CornerSize>,
        bottom_left: impl Into<CornerSize>,
    ) -> Self {
        Self {
            top_left: top_left.into(),
            top_right: top_right.into(),
            bottom_right: bottom_right.into(),
            bottom_left: bottom_left.into(),
        }
    }

    /// Raw pixel radii in `[top_left, top_right, bottom_right, bottom_left]`
    /// order, before clamping
    pub fn to_px(&self, size: Size, density: Density) -> [f32; 4] {
        [
            self.top_left.to_px(size, density),
            self.top_right.to_px(size, density),
            self.bottom_right.to_px(size, density),
            self.bottom_left.to_px(size, density),
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Refraction / Bleed / Dispersion
// ─────────────────────────────────────────────────────────────────────────────

/// How far the rim pulls sampled content inward
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefractionAmount {
    Dp(Dp),
    /// Half of the shorter side, pulling the rim all the way to the center
    Full,
}

impl RefractionAmount {
    pub fn to_px(self, size: Size, density: Density) -> f32 {
        match self {
            RefractionAmount::Dp(dp) => dp.to_px(density),
            RefractionAmount::Full => -size.min_dimension() / 2.0,
        }
    }
}

impl Default for RefractionAmount {
    fn default() -> Self {
        RefractionAmount::Dp(Dp(-16.0))
    }
}

impl From<Dp> for RefractionAmount {
    fn from(dp: Dp) -> Self {
        RefractionAmount::Dp(dp)
    }
}

/// Rim refraction descriptor
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Refraction {
    /// Depth of the refracting rim, measured inward from the edge
    pub height: Dp,
    /// Displacement at the very edge; never positive
    pub amount: RefractionAmount,
    /// Blend from edge normal (0) toward radial direction (1)
    pub eccentric_factor: f32,
}

impl Default for Refraction {
    fn default() -> Self {
        Self {
            height: Dp(8.0),
            amount: RefractionAmount::default(),
            eccentric_factor: 1.0,
        }
    }
}

/// Light bleeding out of the rim, drawn under the primary refraction
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bleed {
    pub amount: Dp,
    /// 0 disables the bleed layer entirely
    pub opacity: f32,
    pub blur_radius: Dp,
}

/// Chromatic dispersion along the rim
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dispersion {
    /// 0 disables dispersion
    pub height: Dp,
}

// ─────────────────────────────────────────────────────────────────────────────
// Material
// ─────────────────────────────────────────────────────────────────────────────

/// Row-major 4×5 color matrix applied to straight-alpha RGBA
///
/// Each output channel is `m[row*5+0]*r + m[row*5+1]*g + m[row*5+2]*b +
/// m[row*5+3]*a + m[row*5+4]`, with the offset column in `0..1` units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMatrix(pub [f32; 20]);

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Saturation matrix (0 = grayscale, 1 = unchanged)
    pub fn saturation(s: f32) -> Self {
        let [lr, lg, lb] = [0.213_f32, 0.715, 0.072];
        let inv = 1.0 - s;
        ColorMatrix([
            lr * inv + s, lg * inv, lb * inv, 0.0, 0.0, //
            lr * inv, lg * inv + s, lb * inv, 0.0, 0.0, //
            lr * inv, lg * inv, lb * inv + s, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Adds `delta` to every color channel
    pub fn brightness(delta: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.0[4] = delta;
        m.0[9] = delta;
        m.0[14] = delta;
        m
    }

    /// `self` applied after `first`
    pub fn concat(&self, first: &ColorMatrix) -> ColorMatrix {
        let a = &self.0;
        let b = &first.0;
        let mut out = [0.0; 20];
        for row in 0..4 {
            for col in 0..5 {
                let mut v = 0.0;
                for k in 0..4 {
                    v += a[row * 5 + k] * b[k * 5 + col];
                }
                if col == 4 {
                    v += a[row * 5 + 4];
                }
                out[row * 5 + col] = v;
            }
        }
        ColorMatrix(out)
    }

    /// Apply to a straight-alpha color, clamping the result
    pub fn apply(&self, c: [f32; 4]) -> [f32; 4] {
        let m = &self.0;
        let mut out = [0.0; 4];
        for (row, o) in out.iter_mut().enumerate() {
            let r = &m[row * 5..row * 5 + 5];
            *o = (r[0] * c[0] + r[1] * c[1] + r[2] * c[2] + r[3] * c[3] + r[4]).clamp(0.0, 1.0);
        }
        out
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Glass material: blur, tint and color grading
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub blur_radius: Dp,
    pub tint: Color,
    pub contrast: f32,
    /// Negative mixes toward black, positive toward white
    pub white_point: f32,
    pub chroma_multiplier: f32,
    pub color_filter: Option<ColorMatrix>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            blur_radius: Dp::ZERO,
            tint: Color::TRANSPARENT,
            contrast: 0.0,
            white_point: 0.0,
            chroma_multiplier: 1.0,
            color_filter: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Border
// ─────────────────────────────────────────────────────────────────────────────

fn default_border_width() -> Dp {
    Dp(2.0)
}

fn default_border_color() -> Color {
    Color::WHITE.with_alpha(0.4)
}

fn default_highlight_angle() -> f32 {
    45.0
}

fn default_highlight_decay() -> f32 {
    1.0
}

/// Stroke drawn along the shape outline, on top of everything else
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GlassBorder {
    None,
    /// Uniform stroke, added with the plus blend mode
    Solid {
        #[serde(default = "default_border_width")]
        width: Dp,
        #[serde(default = "default_border_color")]
        color: Color,
    },
    /// Directional specular stroke
    Highlight {
        #[serde(default = "default_border_width")]
        width: Dp,
        #[serde(default = "default_border_color")]
        color: Color,
        /// Light direction in degrees
        #[serde(default = "default_highlight_angle")]
        angle: f32,
        #[serde(default = "default_highlight_decay")]
        decay: f32,
    },
}

impl GlassBorder {
    pub fn solid() -> Self {
        GlassBorder::Solid {
            width: default_border_width(),
            color: default_border_color(),
        }
    }

    pub fn highlight() -> Self {
        GlassBorder::Highlight {
            width: default_border_width(),
            color: default_border_color(),
            angle: default_highlight_angle(),
            decay: default_highlight_decay(),
        }
    }

    pub fn width(&self) -> Dp {
        match self {
            GlassBorder::None => Dp::ZERO,
            GlassBorder::Solid { width, .. } | GlassBorder::Highlight { width, .. } => *width,
        }
    }
}

impl Default for GlassBorder {
    fn default() -> Self {
        Self::highlight()
    }
}

/// Pixel-unit border
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResolvedBorder {
    None,
    Solid {
        width: f32,
        color: Color,
    },
    Highlight {
        width: f32,
        color: Color,
        /// Radians
        angle: f32,
        decay: f32,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// GlassStyle
// ─────────────────────────────────────────────────────────────────────────────

/// Complete configuration of one glass surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassStyle {
    pub shape: CornerRadius,
    pub refraction: Refraction,
    pub bleed: Bleed,
    pub dispersion: Dispersion,
    pub material: Material,
    pub border: GlassBorder,
}

impl GlassStyle {
    /// Create a new glass style with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(mut self, shape: CornerRadius) -> Self {
        self.shape = shape;
        self
    }

    /// Uniform corner radius
    pub fn corner_radius(mut self, radius: impl Into<CornerSize>) -> Self {
        self.shape = CornerRadius::uniform(radius);
        self
    }

    pub fn refraction(mut self, height: Dp, amount: impl Into<RefractionAmount>) -> Self {
        self.refraction.height = height;
        self.refraction.amount = amount.into();
        self
    }

    pub fn eccentric_factor(mut self, factor: f32) -> Self {
        self.refraction.eccentric_factor = factor;
        self
    }

    pub fn bleed(mut self, amount: Dp, opacity: f32, blur_radius: Dp) -> Self {
        self.bleed = Bleed {
            amount,
            opacity,
            blur_radius,
        };
        self
    }

    pub fn dispersion(mut self, height: Dp) -> Self {
        self.dispersion.height = height;
        self
    }

    pub fn blur(mut self, radius: Dp) -> Self {
        self.material.blur_radius = radius;
        self
    }

    pub fn tint(mut self, color: Color) -> Self {
        self.material.tint = color;
        self
    }

    pub fn contrast(mut self, contrast: f32) -> Self {
        self.material.contrast = contrast;
        self
    }

    pub fn white_point(mut self, white_point: f32) -> Self {
        self.material.white_point = white_point;
        self
    }

    pub fn chroma(mut self, multiplier: f32) -> Self {
        self.material.chroma_multiplier = multiplier;
        self
    }

    pub fn color_filter(mut self, matrix: ColorMatrix) -> Self {
        self.material.color_filter = Some(matrix);
        self
    }

    pub fn border(mut self, border: GlassBorder) -> Self {
        self.border = border;
        self
    }

    // Presets

    /// Plain frosted panel: blur and tint only, no rim effects
    pub fn frosted() -> Self {
        Self::new()
            .refraction(Dp::ZERO, Dp::ZERO)
            .blur(Dp(12.0))
            .tint(Color::WHITE.with_alpha(0.1))
            .border(GlassBorder::None)
    }

    /// Fully rounded lens with strong refraction and a little dispersion
    pub fn lens() -> Self {
        Self::new()
            .shape(CornerRadius::pill())
            .refraction(Dp(24.0), RefractionAmount::Full)
            .dispersion(Dp(12.0))
            .chroma(1.5)
    }

    /// Every domain violation of this style at the given pixel size
    pub fn violations(&self, size: Size, density: Density) -> Vec<StyleError> {
        let mut errors = Vec::new();

        let finite_fields = [
            ("refraction.eccentric_factor", self.refraction.eccentric_factor),
            ("bleed.opacity", self.bleed.opacity),
            ("material.contrast", self.material.contrast),
            ("material.white_point", self.material.white_point),
            ("material.chroma_multiplier", self.material.chroma_multiplier),
        ];
        for (field, value) in finite_fields {
            if !value.is_finite() {
                errors.push(StyleError::NotFinite(field));
            }
        }

        if self.refraction.height.0 < 0.0 {
            errors.push(StyleError::NegativeRefractionHeight(self.refraction.height.0));
        }
        let amount = self.refraction.amount.to_px(size, density);
        if amount > 0.0 {
            errors.push(StyleError::PositiveRefractionAmount(amount));
        }
        let ecc = self.refraction.eccentric_factor;
        if !(0.0..=1.0).contains(&ecc) {
            errors.push(StyleError::EccentricOutOfRange(ecc));
        }
        if self.material.chroma_multiplier < 0.0 {
            errors.push(StyleError::NegativeChroma(self.material.chroma_multiplier));
        }

        let limit = size.min_dimension() / 2.0;
        for radius in self.shape.to_px(size, density) {
            if radius > limit {
                errors.push(StyleError::CornerRadiusTooLarge { radius, limit });
                break;
            }
        }
        for radius in self.shape.to_px(size, density) {
            if radius < 0.0 {
                errors.push(StyleError::NegativeLength {
                    field: "shape",
                    value: radius,
                });
                break;
            }
        }

        let lengths = [
            ("bleed.blur_radius", self.bleed.blur_radius),
            ("dispersion.height", self.dispersion.height),
            ("material.blur_radius", self.material.blur_radius),
            ("border.width", self.border.width()),
        ];
        for (field, value) in lengths {
            if value.0 < 0.0 {
                errors.push(StyleError::NegativeLength {
                    field,
                    value: value.0,
                });
            }
        }

        let unit_ranges = [
            ("bleed.opacity", self.bleed.opacity, 0.0, 1.0),
            ("material.white_point", self.material.white_point, -1.0, 1.0),
        ];
        for (field, value, min, max) in unit_ranges {
            if value.is_finite() && !(min..=max).contains(&value) {
                errors.push(StyleError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        errors
    }

    /// Check the style's invariants, returning the first violation
    pub fn validate(&self, size: Size, density: Density) -> Result<()> {
        match self.violations(size, density).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Convert to pixel units for a surface of `size` pixels
    ///
    /// Every field is clamped into its domain; see
    /// [`resolve_with_clamps`](Self::resolve_with_clamps) for which ones were.
    pub fn resolve(&self, size: Size, density: Density) -> ResolvedStyle {
        self.resolve_with_clamps(size, density).0
    }

    /// [`resolve`](Self::resolve), also returning the fields that were clamped
    ///
    /// Each clamp is logged at debug level only; callers that resolve once per
    /// frame decide when the list is worth a warning.
    pub fn resolve_with_clamps(
        &self,
        size: Size,
        density: Density,
    ) -> (ResolvedStyle, Vec<&'static str>) {
        let mut clamp = Clamper::default();
        let half_min = (size.min_dimension() / 2.0).max(0.0);

        let raw_radii = self.shape.to_px(size, density);
        let corner_radii = raw_radii.map(|r| clamp.range("shape", r, 0.0, half_min));

        let border = match self.border {
            GlassBorder::None => ResolvedBorder::None,
            GlassBorder::Solid { width, color } => ResolvedBorder::Solid {
                width: clamp.min("border.width", width.to_px(density), 0.0),
                color,
            },
            GlassBorder::Highlight {
                width,
                color,
                angle,
                decay,
            } => ResolvedBorder::Highlight {
                width: clamp.min("border.width", width.to_px(density), 0.0),
                color,
                angle: clamp.finite("border.angle", angle, 45.0).to_radians(),
                decay: clamp.min("border.decay", decay, 0.0),
            },
        };

        let resolved = ResolvedStyle {
            size,
            density,
            corner_radii,
            refraction_height: clamp.min(
                "refraction.height",
                self.refraction.height.to_px(density),
                0.0,
            ),
            refraction_amount: clamp.max(
                "refraction.amount",
                self.refraction.amount.to_px(size, density),
                0.0,
            ),
            eccentric_factor: clamp.range(
                "refraction.eccentric_factor",
                self.refraction.eccentric_factor,
                0.0,
                1.0,
            ),
            bleed_amount: clamp.max("bleed.amount", self.bleed.amount.to_px(density), 0.0),
            bleed_opacity: clamp.range("bleed.opacity", self.bleed.opacity, 0.0, 1.0),
            bleed_blur_radius: clamp.min(
                "bleed.blur_radius",
                self.bleed.blur_radius.to_px(density),
                0.0,
            ),
            dispersion_height: clamp.min(
                "dispersion.height",
                self.dispersion.height.to_px(density),
                0.0,
            ),
            blur_radius: clamp.min(
                "material.blur_radius",
                self.material.blur_radius.to_px(density),
                0.0,
            ),
            tint: self.material.tint,
            contrast: clamp.finite("material.contrast", self.material.contrast, 0.0),
            white_point: clamp.range("material.white_point", self.material.white_point, -1.0, 1.0),
            chroma_multiplier: clamp.min(
                "material.chroma_multiplier",
                self.material.chroma_multiplier,
                0.0,
            ),
            color_filter: self.material.color_filter.filter(|m| !m.is_identity()),
            border,
        };
        (resolved, clamp.fields)
    }
}

/// Clamps values and records which fields changed
#[derive(Default)]
struct Clamper {
    fields: Vec<&'static str>,
}

impl Clamper {
    fn note(&mut self, field: &'static str) {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
    }

    fn finite(&mut self, field: &'static str, value: f32, fallback: f32) -> f32 {
        if value.is_finite() {
            value
        } else {
            debug!(field, value, fallback, "non-finite style value replaced");
            self.note(field);
            fallback
        }
    }

    fn range(&mut self, field: &'static str, value: f32, min: f32, max: f32) -> f32 {
        let value = self.finite(field, value, min.max(0.0).min(max));
        let clamped = value.clamp(min, max);
        if clamped != value {
            debug!(field, value, clamped, "style value clamped");
            self.note(field);
        }
        clamped
    }

    fn min(&mut self, field: &'static str, value: f32, min: f32) -> f32 {
        self.range(field, value, min, f32::INFINITY)
    }

    fn max(&mut self, field: &'static str, value: f32, max: f32) -> f32 {
        self.range(field, value, f32::NEG_INFINITY, max)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResolvedStyle
// ─────────────────────────────────────────────────────────────────────────────

/// A [`GlassStyle`] in pixels for one surface size, with every invariant held
///
/// Equality of two resolved styles is what decides whether a surface's effect
/// graph must be rebuilt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub size: Size,
    pub density: Density,
    /// `[top_left, top_right, bottom_right, bottom_left]`, each `<= min(w, h) / 2`
    pub corner_radii: [f32; 4],
    pub refraction_height: f32,
    pub refraction_amount: f32,
    pub eccentric_factor: f32,
    pub bleed_amount: f32,
    pub bleed_opacity: f32,
    pub bleed_blur_radius: f32,
    pub dispersion_height: f32,
    pub blur_radius: f32,
    pub tint: Color,
    pub contrast: f32,
    pub white_point: f32,
    pub chroma_multiplier: f32,
    pub color_filter: Option<ColorMatrix>,
    pub border: ResolvedBorder,
}

impl ResolvedStyle {
    /// Largest of the four corner radii
    pub fn max_corner_radius(&self) -> f32 {
        self.corner_radii.iter().copied().fold(0.0, f32::max)
    }

    pub fn has_refraction(&self) -> bool {
        self.refraction_height > 0.0 && self.refraction_amount != 0.0
    }

    pub fn has_bleed(&self) -> bool {
        self.bleed_opacity > 0.0
    }

    pub fn has_dispersion(&self) -> bool {
        self.dispersion_height > 0.0
    }

    pub fn has_color_grade(&self) -> bool {
        self.contrast != 0.0 || self.white_point != 0.0 || self.chroma_multiplier != 1.0
    }

    pub fn has_tint(&self) -> bool {
        self.tint.a > 0.0
    }

    pub fn has_border(&self) -> bool {
        match self.border {
            ResolvedBorder::None => false,
            ResolvedBorder::Solid { width, .. } | ResolvedBorder::Highlight { width, .. } => {
                width > 0.0
            }
        }
    }
}
