//! Image loading and data management

use std::path::Path;

use base64::Engine;
use glaze_core::Color;
use glaze_effects::{Pixmap, Rgba};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use tracing::{debug, warn};

use crate::error::{ImageError, Result};
use crate::source::ImageSource;

/// Decoded straight-alpha RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageData {
    /// Wrap raw RGBA pixels
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected_len = width as usize * height as usize * 4;
        if pixels.len() != expected_len {
            return Err(ImageError::Decode(format!(
                "invalid pixel data length: expected {}, got {}",
                expected_len,
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Load an image from a source
    pub fn load(source: ImageSource) -> Result<Self> {
        match source {
            ImageSource::File(path) => {
                let data = std::fs::read(&path)
                    .map_err(|e| ImageError::FileLoad(format!("{}: {}", path.display(), e)))?;
                Self::from_bytes(&data)
            }
            ImageSource::Bytes(data) => Self::from_bytes(&data),
            ImageSource::Base64(data) => Self::from_base64(&data),
            ImageSource::Rgba {
                data,
                width,
                height,
            } => Self::from_rgba(data, width, height),
        }
    }

    /// Decode image from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)?;
        Ok(Self::from_dynamic_image(img))
    }

    /// Decode image from base64 string
    ///
    /// Supports both plain base64 and data URIs like
    /// `data:image/png;base64,iVBORw0KGgo...`.
    pub fn from_base64(data: &str) -> Result<Self> {
        let base64_data = if data.starts_with("data:") {
            data.find(";base64,")
                .map(|pos| &data[pos + 8..])
                .ok_or_else(|| ImageError::Base64("invalid data URI format".to_string()))?
        } else {
            data
        };
        let bytes = base64::engine::general_purpose::STANDARD.decode(base64_data.trim())?;
        Self::from_bytes(&bytes)
    }

    fn from_dynamic_image(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            pixels: img.to_rgba8().into_raw(),
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Convert to a premultiplied pixel buffer for the effect pipeline
    pub fn to_pixmap(&self) -> Result<Pixmap> {
        Ok(Pixmap::from_rgba8(self.width, self.height, &self.pixels)?)
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Load a backdrop, or a `fallback_size` fill of `background` if it can't be decoded
///
/// A broken backdrop never stops a frame: the failure is logged and the glass
/// renders over the plain background instead.
pub fn load_backdrop(source: ImageSource, fallback_size: (u32, u32), background: Color) -> Pixmap {
    let description = source.describe();
    match ImageData::load(source).and_then(|data| data.to_pixmap()) {
        Ok(pixmap) => {
            debug!(
                source = %description,
                width = pixmap.width(),
                height = pixmap.height(),
                "backdrop loaded"
            );
            pixmap
        }
        Err(err) => {
            warn!(source = %description, %err, "backdrop failed to load, using background");
            let (width, height) = fallback_size;
            Pixmap::filled(width, height, Rgba::from_color(background))
        }
    }
}

/// Write `pixmap` as a PNG file
pub fn save_png(pixmap: &Pixmap, path: &Path) -> Result<()> {
    let image = RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.to_rgba8())
        .ok_or_else(|| ImageError::Encode("pixel buffer does not match dimensions".to_string()))?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| ImageError::Encode(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "png written");
    Ok(())
}

/// Encode `pixmap` as PNG bytes
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>> {
    let image = RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.to_rgba8())
        .ok_or_else(|| ImageError::Encode("pixel buffer does not match dimensions".to_string()))?;
    let mut out = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}
