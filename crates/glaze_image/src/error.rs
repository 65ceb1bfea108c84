//! Error types for glaze_image

use thiserror::Error;

/// Errors that can occur while loading or writing backdrop images
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to load image file: {0}")]
    FileLoad(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("invalid base64 data: {0}")]
    Base64(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error(transparent)]
    Pixels(#[from] glaze_effects::EffectError),
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        ImageError::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for ImageError {
    fn from(err: base64::DecodeError) -> Self {
        ImageError::Base64(err.to_string())
    }
}

/// Result type for glaze_image operations
pub type Result<T> = std::result::Result<T, ImageError>;
