//! Luminance sampling
//!
//! Samplers estimate the average brightness of a rendered glass layer so the
//! host can adapt its style (for example, dark tint over bright content).
//! The measurement downsamples the layer to a tiny grid, averages Rec.601
//! luma over the 8-bit pixels and quantizes the result to a precision step.
//!
//! Two policies exist:
//!
//! - [`ImpulseSampler`] publishes each new measurement immediately, at most
//!   once per interval.
//! - [`ContinuousSampler`] measures continuously and eases toward every new
//!   measurement.
//!
//! [`spawn_sampler`] runs either policy as a tokio task off the render path.

mod continuous;
mod impulse;
mod task;

pub use continuous::ContinuousSampler;
pub use impulse::ImpulseSampler;
pub use task::{spawn_sampler, SamplerHandle};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use glaze_animation::Easing;
use glaze_core::LUMA_601;

use crate::pixmap::Pixmap;

fn default_initial() -> f32 {
    0.5
}

fn default_interval_ms() -> u64 {
    300
}

fn default_duration_ms() -> u64 {
    300
}

fn default_precision() -> f32 {
    0.25
}

fn default_grid() -> [u32; 2] {
    [5, 5]
}

/// Settings for [`ImpulseSampler`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpulseConfig {
    #[serde(default = "default_initial")]
    pub initial_luminance: f32,
    /// Minimum time between two measurements
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Quantization step; `<= 0` publishes unquantized values
    #[serde(default = "default_precision")]
    pub precision: f32,
    /// Downsample grid `[width, height]`
    #[serde(default = "default_grid")]
    pub grid: [u32; 2],
}

impl Default for ImpulseConfig {
    fn default() -> Self {
        Self {
            initial_luminance: default_initial(),
            interval_ms: default_interval_ms(),
            precision: default_precision(),
            grid: default_grid(),
        }
    }
}

impl ImpulseConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Settings for [`ContinuousSampler`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuousConfig {
    #[serde(default = "default_initial")]
    pub initial_luminance: f32,
    /// Length of the transition toward each new measurement
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default = "default_precision")]
    pub precision: f32,
    #[serde(default = "default_grid")]
    pub grid: [u32; 2],
}

impl Default for ContinuousConfig {
    fn default() -> Self {
        Self {
            initial_luminance: default_initial(),
            duration_ms: default_duration_ms(),
            easing: Easing::Linear,
            precision: default_precision(),
            grid: default_grid(),
        }
    }
}

impl ContinuousConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Which sampler to attach to a surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SamplerPolicy {
    Impulse(ImpulseConfig),
    Continuous(ContinuousConfig),
}

impl Default for SamplerPolicy {
    fn default() -> Self {
        SamplerPolicy::Impulse(ImpulseConfig::default())
    }
}

impl SamplerPolicy {
    pub fn initial_luminance(&self) -> f32 {
        match self {
            SamplerPolicy::Impulse(c) => c.initial_luminance,
            SamplerPolicy::Continuous(c) => c.initial_luminance,
        }
    }

    pub fn grid(&self) -> [u32; 2] {
        match self {
            SamplerPolicy::Impulse(c) => c.grid,
            SamplerPolicy::Continuous(c) => c.grid,
        }
    }

    pub fn precision(&self) -> f32 {
        match self {
            SamplerPolicy::Impulse(c) => c.precision,
            SamplerPolicy::Continuous(c) => c.precision,
        }
    }
}

/// Average Rec.601 luma of `layer` over a nearest-neighbor `grid`
///
/// Returns `None` for an empty layer or grid.
pub fn average_luma(layer: &Pixmap, grid: [u32; 2]) -> Option<f32> {
    let [gw, gh] = grid;
    if layer.is_empty() || gw == 0 || gh == 0 {
        return None;
    }
    let (w, h) = (layer.width(), layer.height());
    let mut sum = 0.0f32;
    for gy in 0..gh {
        let y = (((gy as f32 + 0.5) * h as f32 / gh as f32) as u32).min(h - 1);
        for gx in 0..gw {
            let x = (((gx as f32 + 0.5) * w as f32 / gw as f32) as u32).min(w - 1);
            let Some(px) = layer.get(x, y) else {
                continue;
            };
            let [r, g, b, _] = px.to_color().to_rgba8();
            sum += (LUMA_601[0] * r as f32 + LUMA_601[1] * g as f32 + LUMA_601[2] * b as f32)
                / 255.0;
        }
    }
    Some(sum / (gw * gh) as f32)
}

/// Round `value` to the nearest multiple of `precision`, clamped to `[0, 1]`
pub fn quantize(value: f32, precision: f32) -> f32 {
    if precision > 0.0 {
        ((value / precision).round() * precision).clamp(0.0, 1.0)
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Full measurement: downsample, average, quantize
///
/// `None` when nothing could be measured; the caller keeps its last value.
pub fn measure(layer: &Pixmap, grid: [u32; 2], precision: f32) -> Option<f32> {
    average_luma(layer, grid)
        .map(|avg| quantize(avg, precision))
        .filter(|v| !v.is_nan())
}
