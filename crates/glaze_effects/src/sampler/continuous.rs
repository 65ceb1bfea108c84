use std::time::{Duration, Instant};

use glaze_animation::Tween;

use crate::pixmap::Pixmap;

use super::{ContinuousConfig, ImpulseConfig, ImpulseSampler};

/// Measures without a minimum interval and eases toward each new value
#[derive(Debug, Clone)]
pub struct ContinuousSampler {
    config: ContinuousConfig,
    impulse: ImpulseSampler,
    tween: Tween<f32>,
}

impl ContinuousSampler {
    pub fn new(config: ContinuousConfig) -> Self {
        let impulse = ImpulseSampler::new(ImpulseConfig {
            initial_luminance: config.initial_luminance,
            interval_ms: 0,
            precision: config.precision,
            grid: config.grid,
        });
        Self {
            tween: Tween::idle(impulse.luminance()),
            impulse,
            config,
        }
    }

    pub fn config(&self) -> &ContinuousConfig {
        &self.config
    }

    /// Current animated value
    pub fn luminance(&self) -> f32 {
        self.tween.value().clamp(0.0, 1.0)
    }

    /// Latest measurement, the value being animated toward
    pub fn target(&self) -> f32 {
        self.impulse.luminance()
    }

    pub fn is_animating(&self) -> bool {
        !self.tween.is_finished()
    }

    pub(crate) fn impulse_mut(&mut self) -> &mut ImpulseSampler {
        &mut self.impulse
    }

    /// Start easing toward `measured`; `None` leaves the animation alone
    pub fn publish(&mut self, measured: Option<f32>) {
        let target = self.impulse.publish(measured);
        if measured.is_some() {
            self.ease_to(target);
        }
    }

    /// Advance the animation by `dt`
    pub fn step(&mut self, dt: Duration) -> f32 {
        self.tween.step(dt).clamp(0.0, 1.0)
    }

    /// Measure `layer` and start easing toward the result
    pub fn sample(&mut self, layer: &Pixmap, now: Instant) -> f32 {
        let target = self.impulse.sample(layer, now);
        self.ease_to(target);
        self.luminance()
    }

    fn ease_to(&mut self, target: f32) {
        if *self.tween.to() != target {
            self.tween = Tween::new(
                self.tween.value(),
                target,
                self.config.duration(),
                self.config.easing,
            );
        }
    }
}

impl Default for ContinuousSampler {
    fn default() -> Self {
        Self::new(ContinuousConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::Rgba;
    use glaze_animation::Easing;

    #[test]
    fn test_eases_toward_measurement() {
        let mut sampler = ContinuousSampler::new(ContinuousConfig {
            initial_luminance: 0.0,
            easing: Easing::Linear,
            ..Default::default()
        });
        let white = Pixmap::filled(8, 8, Rgba::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(sampler.sample(&white, Instant::now()), 0.0);
        assert_eq!(sampler.target(), 1.0);
        assert!(sampler.is_animating());

        let mid = sampler.step(Duration::from_millis(150));
        assert!((mid - 0.5).abs() < 1e-5);
        assert_eq!(sampler.step(Duration::from_millis(150)), 1.0);
        assert!(!sampler.is_animating());
    }

    #[test]
    fn test_same_value_does_not_restart() {
        let mut sampler = ContinuousSampler::default();
        let gray = Pixmap::filled(8, 8, Rgba::new(0.5, 0.5, 0.5, 1.0));
        sampler.sample(&gray, Instant::now());
        assert!(!sampler.is_animating());
        assert_eq!(sampler.luminance(), 0.5);
    }
}
