//! Glaze Animation
//!
//! Small, clock-agnostic animation primitives:
//!
//! - **Easing**: linear, quadratic and cubic-bezier curves
//! - **Tweens**: fixed-duration eased transitions, used to smooth sampled
//!   luminance
//! - **Spring Physics**: RK4-integrated springs with spatial presets
//! - **Parameter Reset**: springs tunable parameters back to their initial
//!   values
//!
//! None of these own a timer. Callers advance them with a `dt` from whatever
//! clock drives them.

pub mod easing;
pub mod param_reset;
pub mod spring;
pub mod tween;
pub mod values;

pub use easing::Easing;
pub use param_reset::{ParamReset, PlaygroundReset};
pub use spring::{Spring, SpringConfig};
pub use tween::Tween;
pub use values::Interpolate;
