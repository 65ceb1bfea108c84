//! Animated parameter reset
//!
//! Springs a [`ParamValue`] from wherever it currently is back to its initial
//! value. Every step writes through [`ParamValue::set_value`], so the value
//! stays inside the active range for the whole animation.

use glaze_core::{ParamScalar, ParamValue, PlaygroundParams};
use tracing::trace;

use crate::spring::{Spring, SpringConfig};

/// A running reset of one parameter
#[derive(Clone, Copy, Debug)]
pub struct ParamReset {
    spring: Spring,
}

impl ParamReset {
    /// Start a reset with the slow spatial spring
    pub fn new<T: ParamScalar>(param: &ParamValue<T>) -> Self {
        Self::with_config(param, SpringConfig::slow_spatial())
    }

    pub fn with_config<T: ParamScalar>(param: &ParamValue<T>, config: SpringConfig) -> Self {
        let range = param.unsafe_range();
        let span = (range.end.to_f32() - range.start.to_f32()).abs();
        let epsilon = (span * 1e-4).max(1e-4);

        let mut spring = Spring::new(config, param.raw_value().to_f32())
            .with_thresholds(epsilon, epsilon * 10.0);
        spring.set_target(param.initial().to_f32());
        Self { spring }
    }

    pub fn is_finished(&self) -> bool {
        self.spring.is_settled()
    }

    /// Advance by `dt` seconds and write the new value; returns `true` once
    /// the parameter has arrived
    pub fn step<T: ParamScalar>(&mut self, param: &mut ParamValue<T>, dt: f32) -> bool {
        self.spring.step(dt);
        if self.spring.is_settled() {
            param.reset();
            return true;
        }
        param.set_value(T::from_f32(self.spring.value()));
        false
    }
}

/// Resets of every parameter in a [`PlaygroundParams`] at once
#[derive(Clone, Debug)]
pub struct PlaygroundReset {
    scalars: Vec<ParamReset>,
    lengths: Vec<ParamReset>,
}

impl PlaygroundReset {
    pub fn new(params: &mut PlaygroundParams) -> Self {
        let mut scalars = Vec::new();
        let mut lengths = Vec::new();
        params.for_each_scalar(|p| scalars.push(ParamReset::new(p)));
        params.for_each_length(|p| lengths.push(ParamReset::new(p)));
        Self { scalars, lengths }
    }

    /// Advance all resets; returns `true` when every parameter has arrived
    pub fn step(&mut self, params: &mut PlaygroundParams, dt: f32) -> bool {
        let mut done = true;

        let mut scalars = self.scalars.iter_mut();
        params.for_each_scalar(|p| {
            if let Some(reset) = scalars.next() {
                done &= reset.step(p, dt);
            }
        });

        let mut lengths = self.lengths.iter_mut();
        params.for_each_length(|p| {
            if let Some(reset) = lengths.next() {
                done &= reset.step(p, dt);
            }
        });

        params.sync_ranges();
        if done {
            trace!("playground reset finished");
        }
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::{Dp, DpSize, ParamRange};

    #[test]
    fn test_reset_springs_back_to_initial() {
        let mut p = ParamValue::new(
            1.0f32,
            ParamRange::new(0.5, 2.0),
            ParamRange::new(0.0, 4.0),
            |v| format!("{v:.2}"),
        );
        p.set_value(1.9);

        let mut reset = ParamReset::new(&p);
        let mut steps = 0;
        while !reset.step(&mut p, 1.0 / 60.0) {
            assert!(p.safe_range().contains(p.value()));
            steps += 1;
            assert!(steps < 600, "reset did not settle");
        }
        assert_eq!(p.raw_value(), 1.0);
        assert!(steps > 1);
    }

    #[test]
    fn test_playground_reset() {
        let mut params = PlaygroundParams::new();
        params.blur_radius.set_value(Dp(20.0));
        params.refraction_amount.set_value(Dp(-300.0));
        params.chroma_multiplier.set_value(0.6);
        params.set_size(DpSize::new(Dp(300.0), Dp(300.0)));
        params.corner_radius.set_value(Dp(120.0));

        let mut reset = PlaygroundReset::new(&mut params);
        let mut frames = 0;
        while !reset.step(&mut params, 1.0 / 60.0) {
            frames += 1;
            assert!(frames < 900, "reset did not settle");
        }

        assert_eq!(params.blur_radius.raw_value(), Dp(0.0));
        assert_eq!(params.refraction_amount.raw_value(), Dp(-32.0));
        assert_eq!(params.chroma_multiplier.raw_value(), 1.0);
        assert_eq!(params.corner_radius.raw_value(), Dp(32.0));
    }
}
