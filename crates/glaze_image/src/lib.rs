//! Glaze Image
//!
//! Decodes backdrop images (file, encoded bytes, base64 / data URI or raw
//! RGBA) into the premultiplied [`Pixmap`](glaze_effects::Pixmap) the effect
//! pipeline consumes, and writes rendered frames back out as PNG.

pub mod error;
pub mod loader;
pub mod source;

pub use error::{ImageError, Result};
pub use loader::{encode_png, load_backdrop, save_png, ImageData};
pub use source::ImageSource;
