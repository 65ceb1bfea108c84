//! Error types for glaze_core

use thiserror::Error;

/// A style field that violates its documented domain
///
/// Only produced by [`GlassStyle::validate`](crate::style::GlassStyle::validate).
/// Rendering never fails on a bad style; it clamps instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("refraction height must be >= 0, got {0}")]
    NegativeRefractionHeight(f32),

    #[error("refraction amount must be <= 0, got {0}")]
    PositiveRefractionAmount(f32),

    #[error("eccentric factor must be within [0, 1], got {0}")]
    EccentricOutOfRange(f32),

    #[error("chroma multiplier must be >= 0, got {0}")]
    NegativeChroma(f32),

    #[error("corner radius {radius} exceeds half of the shorter side ({limit})")]
    CornerRadiusTooLarge { radius: f32, limit: f32 },

    #[error("{field} must be >= 0, got {value}")]
    NegativeLength { field: &'static str, value: f32 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{0} is not a finite number")]
    NotFinite(&'static str),
}

/// Result type for glaze_core operations
pub type Result<T> = std::result::Result<T, StyleError>;
