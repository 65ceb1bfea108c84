//! Spring physics animation
//!
//! RK4-integrated spring physics. Parameters are reset to their initial
//! values by springing them back rather than jumping.

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Unit-mass spring described by its damping ratio (1.0 = critical)
    pub fn from_damping_ratio(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            stiffness,
            damping: damping_ratio * 2.0 * stiffness.sqrt(),
            mass: 1.0,
        }
    }

    /// Slow spatial motion: large moves such as resetting a panel of sliders
    pub fn slow_spatial() -> Self {
        Self::from_damping_ratio(0.9, 300.0)
    }

    /// Default spatial motion
    pub fn default_spatial() -> Self {
        Self::from_damping_ratio(0.9, 700.0)
    }

    /// Fast spatial motion: small, quick moves
    pub fn fast_spatial() -> Self {
        Self::from_damping_ratio(0.9, 1400.0)
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::default_spatial()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    rest_epsilon: f32,
    velocity_epsilon: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            rest_epsilon: 0.5,
            velocity_epsilon: 5.0,
        }
    }

    /// Settling thresholds in the units of the animated value
    ///
    /// The defaults suit pixel-sized values; unit-range scalars such as a
    /// chroma multiplier need much smaller ones.
    pub fn with_thresholds(mut self, rest_epsilon: f32, velocity_epsilon: f32) -> Self {
        self.rest_epsilon = rest_epsilon;
        self.velocity_epsilon = velocity_epsilon;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Check if the spring has settled (within epsilon of target with minimal velocity)
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.rest_epsilon
            && self.velocity.abs() < self.velocity_epsilon
    }

    /// Step the spring simulation using RK4 integration
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_settles_to_target() {
        let mut spring = Spring::new(SpringConfig::slow_spatial(), 0.0);
        spring.set_target(100.0);

        // 2 seconds at 60fps
        for _ in 0..120 {
            spring.step(1.0 / 60.0);
        }

        assert!(spring.is_settled());
        assert!((spring.value() - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_fine_thresholds_settle_exactly() {
        let mut spring =
            Spring::new(SpringConfig::slow_spatial(), 1.8).with_thresholds(1e-4, 1e-3);
        spring.set_target(1.0);
        for _ in 0..600 {
            spring.step(1.0 / 60.0);
        }
        assert_eq!(spring.value(), 1.0);
    }

    #[test]
    fn test_spatial_presets_are_underdamped() {
        assert!(SpringConfig::slow_spatial().is_underdamped());
        assert!(SpringConfig::fast_spatial().is_underdamped());
        assert!(
            SpringConfig::fast_spatial().stiffness > SpringConfig::slow_spatial().stiffness
        );
    }

    #[test]
    fn test_spring_rk4_stability() {
        let mut spring = Spring::new(SpringConfig::fast_spatial(), 0.0);
        spring.set_target(1000.0);

        for _ in 0..100 {
            spring.step(1.0 / 30.0);
            assert!(spring.value() < 2000.0);
            assert!(spring.value() > -500.0);
        }
    }
}
