use std::time::{Duration, Instant};

use tracing::trace;

use crate::pixmap::Pixmap;

use super::{measure, ImpulseConfig};

/// Publishes each measurement as-is, at most once per interval
#[derive(Debug, Clone)]
pub struct ImpulseSampler {
    config: ImpulseConfig,
    luminance: f32,
    last_sample: Option<Instant>,
}

impl ImpulseSampler {
    pub fn new(config: ImpulseConfig) -> Self {
        Self {
            luminance: config.initial_luminance.clamp(0.0, 1.0),
            config,
            last_sample: None,
        }
    }

    pub fn config(&self) -> &ImpulseConfig {
        &self.config
    }

    pub fn interval(&self) -> Duration {
        self.config.interval()
    }

    /// Last published value
    pub fn luminance(&self) -> f32 {
        self.luminance
    }

    /// Whether a measurement may start at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_sample {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval(),
        }
    }

    /// Claim the slot for a measurement starting at `now`
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_sample = Some(now);
        true
    }

    /// Store a finished measurement; `None` keeps the previous value
    pub fn publish(&mut self, measured: Option<f32>) -> f32 {
        if let Some(value) = measured {
            trace!(luminance = value, "luminance published");
            self.luminance = value;
        }
        self.luminance
    }

    /// Measure `layer` in place if the interval has elapsed
    pub fn sample(&mut self, layer: &Pixmap, now: Instant) -> f32 {
        if !self.try_begin(now) {
            return self.luminance;
        }
        let measured = measure(layer, self.config.grid, self.config.precision);
        self.publish(measured)
    }
}

impl Default for ImpulseSampler {
    fn default() -> Self {
        Self::new(ImpulseConfig::default())
    }
}
