//! Error types for glaze_effects
//!
//! Rendering itself has no error path: an unpositioned surface renders
//! nothing, an unsupported backend renders nothing, and a refraction sample
//! that leaves the backdrop becomes an opaque black pixel. These errors cover
//! the buffer boundary only.

use thiserror::Error;

/// Errors that can occur when building pixel buffers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    /// Byte buffer length does not match `width * height * 4`
    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Dimensions overflow the addressable buffer size
    #[error("pixmap dimensions {width}x{height} are too large")]
    TooLarge { width: u32, height: u32 },
}

/// Result type for glaze_effects operations
pub type Result<T> = std::result::Result<T, EffectError>;
