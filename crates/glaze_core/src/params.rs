//! The playground's tunable parameter set
//!
//! Mirrors the sliders a tuning UI exposes for one glass surface. Some ranges
//! depend on other parameters (the corner radius is bounded by the surface
//! size, the refraction and dispersion heights by the corner radius), so call
//! [`PlaygroundParams::sync_ranges`] after changing the size or the corner
//! radius.

use crate::color::Color;
use crate::param::{ParamRange, ParamValue};
use crate::style::{GlassBorder, GlassStyle};
use crate::units::{Dp, DpSize};

fn dp_label(v: Dp) -> String {
    format!("{} dp", v.0.round() as i32)
}

fn percent_label(v: f32) -> String {
    format!("{}%", (v * 100.0).round() as i32)
}

fn fraction_label(v: f32) -> String {
    format!("{v:.2}")
}

fn dp_range(start: f32, end: f32) -> ParamRange<Dp> {
    ParamRange::new(Dp(start), Dp(end))
}

/// Initial surface size
pub const INITIAL_SIZE: DpSize = DpSize::new(Dp(200.0), Dp(200.0));

/// Every parameter of the playground
#[derive(Clone, Debug)]
pub struct PlaygroundParams {
    pub size: DpSize,
    pub blur_radius: ParamValue<Dp>,
    /// Alpha of the white material tint
    pub opacity: ParamValue<f32>,
    pub chroma_multiplier: ParamValue<f32>,
    pub contrast: ParamValue<f32>,
    pub white_point: ParamValue<f32>,
    pub corner_radius: ParamValue<Dp>,
    pub refraction_height: ParamValue<Dp>,
    pub refraction_amount: ParamValue<Dp>,
    pub dispersion_height: ParamValue<Dp>,
    pub eccentric_factor: ParamValue<f32>,
    pub bleed_amount: ParamValue<Dp>,
    pub bleed_opacity: ParamValue<f32>,
    pub bleed_blur_radius: ParamValue<Dp>,
    unsafe_mode: bool,
}

impl Default for PlaygroundParams {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaygroundParams {
    pub fn new() -> Self {
        let mut params = Self {
            size: INITIAL_SIZE,
            blur_radius: ParamValue::new(
                Dp(0.0),
                dp_range(0.0, 24.0),
                dp_range(0.0, 96.0),
                dp_label,
            ),
            opacity: ParamValue::new(
                0.0,
                ParamRange::new(0.0, 0.2),
                ParamRange::new(0.0, 1.0),
                percent_label,
            ),
            chroma_multiplier: ParamValue::new(
                1.0,
                ParamRange::new(0.5, 2.0),
                ParamRange::new(0.0, 4.0),
                fraction_label,
            ),
            contrast: ParamValue::new(
                0.0,
                ParamRange::new(-0.5, 0.5),
                ParamRange::new(-1.0, 2.0),
                fraction_label,
            ),
            white_point: ParamValue::new(
                0.0,
                ParamRange::new(-0.5, 0.5),
                ParamRange::new(-1.0, 1.0),
                fraction_label,
            ),
            corner_radius: ParamValue::new(
                Dp(32.0),
                dp_range(0.0, 100.0),
                dp_range(0.0, 100.0),
                dp_label,
            ),
            refraction_height: ParamValue::new(
                Dp(24.0),
                dp_range(0.0, 32.0),
                dp_range(0.0, 100.0),
                dp_label,
            ),
            refraction_amount: ParamValue::new(
                Dp(-32.0),
                dp_range(-512.0, 0.0),
                dp_range(-2048.0, 0.0),
                dp_label,
            ),
            dispersion_height: ParamValue::new(
                Dp(0.0),
                dp_range(0.0, 32.0),
                dp_range(0.0, 100.0),
                dp_label,
            ),
            eccentric_factor: ParamValue::new(
                1.0,
                ParamRange::new(0.0, 1.0),
                ParamRange::new(0.0, 1.0),
                fraction_label,
            ),
            bleed_amount: ParamValue::new(
                Dp(0.0),
                dp_range(-512.0, 0.0),
                dp_range(-2048.0, 0.0),
                dp_label,
            ),
            bleed_opacity: ParamValue::new(
                0.0,
                ParamRange::new(0.0, 1.0),
                ParamRange::new(0.0, 1.0),
                percent_label,
            ),
            bleed_blur_radius: ParamValue::new(
                Dp(0.0),
                dp_range(0.0, 24.0),
                dp_range(0.0, 96.0),
                dp_label,
            ),
            unsafe_mode: false,
        };
        params.sync_ranges();
        params
    }

    pub fn is_unsafe_mode(&self) -> bool {
        self.unsafe_mode
    }

    pub fn set_unsafe_mode(&mut self, enabled: bool) {
        self.unsafe_mode = enabled;
        self.for_each_scalar(|p| p.set_unsafe_mode(enabled));
        self.for_each_length(|p| p.set_unsafe_mode(enabled));
    }

    /// Recompute the ranges that depend on size and corner radius
    ///
    /// In unsafe mode heights may reach half of the shorter side instead of
    /// stopping at the corner radius.
    pub fn sync_ranges(&mut self) {
        let half_min = self.size.min_dimension().0 / 2.0;
        self.corner_radius
            .set_ranges(dp_range(0.0, half_min), dp_range(0.0, half_min));

        let radius = self.corner_radius.value().0;
        self.refraction_height
            .set_ranges(dp_range(0.0, radius), dp_range(0.0, half_min));
        self.dispersion_height
            .set_ranges(dp_range(0.0, radius), dp_range(0.0, half_min));
    }

    pub fn set_size(&mut self, size: DpSize) {
        self.size = size;
        self.sync_ranges();
    }

    /// Return every parameter, and the size, to its initial value
    pub fn reset(&mut self) {
        self.size = INITIAL_SIZE;
        self.for_each_scalar(ParamValue::reset);
        self.for_each_length(ParamValue::reset);
        self.sync_ranges();
    }

    pub fn for_each_scalar(&mut self, mut f: impl FnMut(&mut ParamValue<f32>)) {
        f(&mut self.opacity);
        f(&mut self.chroma_multiplier);
        f(&mut self.contrast);
        f(&mut self.white_point);
        f(&mut self.eccentric_factor);
        f(&mut self.bleed_opacity);
    }

    pub fn for_each_length(&mut self, mut f: impl FnMut(&mut ParamValue<Dp>)) {
        f(&mut self.blur_radius);
        f(&mut self.corner_radius);
        f(&mut self.refraction_height);
        f(&mut self.refraction_amount);
        f(&mut self.dispersion_height);
        f(&mut self.bleed_amount);
        f(&mut self.bleed_blur_radius);
    }

    /// Build a style from the coerced values
    pub fn to_style(&self) -> GlassStyle {
        GlassStyle::new()
            .corner_radius(self.corner_radius.value())
            .refraction(self.refraction_height.value(), self.refraction_amount.value())
            .eccentric_factor(self.eccentric_factor.value())
            .bleed(
                self.bleed_amount.value(),
                self.bleed_opacity.value(),
                self.bleed_blur_radius.value(),
            )
            .dispersion(self.dispersion_height.value())
            .blur(self.blur_radius.value())
            .tint(Color::WHITE.with_alpha(self.opacity.value()))
            .chroma(self.chroma_multiplier.value())
            .contrast(self.contrast.value())
            .white_point(self.white_point.value())
            .border(GlassBorder::highlight())
    }
}
