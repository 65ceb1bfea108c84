//! Premultiplied floating-point pixel buffers
//!
//! Every stage of the filter graph reads and writes [`Pixmap`]s. Pixels are
//! premultiplied RGBA `f32`, row-major, top-left origin. Pixel `(x, y)` covers
//! the square `[x, x+1) × [y, y+1)` and its center sits at `(x + 0.5, y + 0.5)`,
//! which is the coordinate [`Pixmap::sample`] reproduces exactly.

use bytemuck::{Pod, Zeroable};
use glaze_core::{Color, Rect, Size};

use crate::error::{EffectError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Rgba
// ─────────────────────────────────────────────────────────────────────────────

/// One premultiplied pixel
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    /// Sentinel written where refraction leaves the backdrop
    pub const OPAQUE_BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const OPAQUE_WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiply a straight-alpha color
    pub fn from_color(color: Color) -> Self {
        let [r, g, b, a] = color.premultiplied();
        Self { r, g, b, a }
    }

    /// Un-premultiply; fully transparent pixels become transparent black
    pub fn to_color(self) -> Color {
        if self.a <= 0.0 {
            return Color::TRANSPARENT;
        }
        Color::rgba(self.r / self.a, self.g / self.a, self.b / self.a, self.a)
    }

    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k, self.a * k)
    }

    pub fn add(self, other: Rgba) -> Self {
        Self::new(
            self.r + other.r,
            self.g + other.g,
            self.b + other.b,
            self.a + other.a,
        )
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        self.scale(1.0 - t).add(other.scale(t))
    }

    /// Linear-light luminance of the un-premultiplied color
    pub fn luma(self) -> f32 {
        self.to_color().to_linear().luma()
    }

    pub fn approx_eq(&self, other: &Rgba, epsilon: f32) -> bool {
        (self.r - other.r).abs() <= epsilon
            && (self.g - other.g).abs() <= epsilon
            && (self.b - other.b).abs() <= epsilon
            && (self.a - other.a).abs() <= epsilon
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TileMode
// ─────────────────────────────────────────────────────────────────────────────

/// How reads outside the buffer behave
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileMode {
    /// Repeat the nearest edge pixel
    #[default]
    Clamp,
    /// Transparent black outside the buffer
    Decal,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pixmap
// ─────────────────────────────────────────────────────────────────────────────

/// Premultiplied RGBA `f32` image
#[derive(Clone, Debug, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Pixmap {
    /// Transparent pixmap
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, pixel: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        }
    }

    /// Pixmap whose pixel at `(x, y)` is `f(x, y)`
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode straight-alpha RGBA8 bytes
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EffectError::TooLarge { width, height })?;
        if bytes.len() != expected {
            return Err(EffectError::BufferSize {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::from_color(Color::from_rgba8(p[0], p[1], p[2], p[3])))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Encode to straight-alpha RGBA8 bytes
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&p.to_color().to_rgba8());
        }
        out
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Raw `f32` channel data
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Raw bytes, e.g. for uploading to a GPU texture
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: Rgba) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = pixel;
        }
    }

    /// Read with the given out-of-bounds behavior
    pub fn pixel(&self, x: i64, y: i64, mode: TileMode) -> Rgba {
        if self.pixels.is_empty() {
            return Rgba::TRANSPARENT;
        }
        let (w, h) = (self.width as i64, self.height as i64);
        match mode {
            TileMode::Clamp => {
                let cx = x.clamp(0, w - 1) as u32;
                let cy = y.clamp(0, h - 1) as u32;
                self.pixels[self.index(cx, cy)]
            }
            TileMode::Decal => {
                if x < 0 || y < 0 || x >= w || y >= h {
                    Rgba::TRANSPARENT
                } else {
                    self.pixels[self.index(x as u32, y as u32)]
                }
            }
        }
    }

    /// Bilinear sample at a continuous coordinate (pixel centers at `+0.5`)
    pub fn sample(&self, x: f32, y: f32, mode: TileMode) -> Rgba {
        let fx = x - 0.5;
        let fy = y - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (ix, iy) = (x0 as i64, y0 as i64);

        let p00 = self.pixel(ix, iy, mode);
        let p10 = self.pixel(ix + 1, iy, mode);
        let p01 = self.pixel(ix, iy + 1, mode);
        let p11 = self.pixel(ix + 1, iy + 1, mode);

        let top = p00.lerp(p10, tx);
        let bottom = p01.lerp(p11, tx);
        top.lerp(bottom, ty)
    }

    /// Whether a continuous coordinate lies inside `[0, w) × [0, h)`
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width as f32 && y < self.height as f32
    }

    pub fn fill(&mut self, pixel: Rgba) {
        self.pixels.fill(pixel);
    }

    pub fn clear(&mut self) {
        self.fill(Rgba::TRANSPARENT);
    }

    /// Resize, discarding content when the dimensions change
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        }
    }

    /// Copy out the region `rect`, rounded to whole pixels
    ///
    /// Parts of the region outside this pixmap are transparent.
    pub fn crop(&self, rect: Rect) -> Pixmap {
        let left = rect.x().round() as i64;
        let top = rect.y().round() as i64;
        let width = rect.width().round().max(0.0) as u32;
        let height = rect.height().round().max(0.0) as u32;
        Pixmap::from_fn(width, height, |x, y| {
            self.pixel(left + x as i64, top + y as i64, TileMode::Decal)
        })
    }

    /// Apply `f` to every pixel in place
    pub fn map_in_place(&mut self, mut f: impl FnMut(Rgba) -> Rgba) {
        for p in &mut self.pixels {
            *p = f(*p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Pixmap {
        Pixmap::from_fn(width, height, |x, y| {
            Rgba::new(
                (x as f32 + 0.5) / width as f32,
                (y as f32 + 0.5) / height as f32,
                0.0,
                1.0,
            )
        })
    }

    #[test]
    fn test_rgba8_roundtrip() {
        let bytes = [255, 0, 0, 255, 0, 255, 0, 128, 10, 20, 30, 0, 1, 2, 3, 255];
        let pixmap = Pixmap::from_rgba8(2, 2, &bytes).unwrap();
        assert_eq!(pixmap.get(1, 0).unwrap().a, 128.0 / 255.0);
        let back = pixmap.to_rgba8();
        assert_eq!(&back[0..8], &bytes[0..8]);
        assert_eq!(&back[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_rgba8_rejects_bad_length() {
        let err = Pixmap::from_rgba8(2, 2, &[0; 15]).unwrap_err();
        assert_eq!(
            err,
            EffectError::BufferSize {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_sample_reproduces_centers() {
        let p = gradient(10, 10);
        assert_eq!(p.sample(3.5, 4.5, TileMode::Clamp), p.get(3, 4).unwrap());
    }

    #[test]
    fn test_sample_is_linear_inside() {
        let p = gradient(100, 50);
        let s = p.sample(37.25, 12.75, TileMode::Clamp);
        assert!((s.r - 37.25 / 100.0).abs() < 1e-5);
        assert!((s.g - 12.75 / 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_tile_modes() {
        let p = Pixmap::filled(4, 4, Rgba::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(p.pixel(-3, 2, TileMode::Clamp).a, 1.0);
        assert_eq!(p.pixel(-3, 2, TileMode::Decal), Rgba::TRANSPARENT);
        // Halfway between the last pixel center and the outside
        assert!((p.sample(4.0, 2.0, TileMode::Decal).a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_crop_outside_is_transparent() {
        let p = Pixmap::filled(4, 4, Rgba::OPAQUE_BLACK);
        let c = p.crop(Rect::new(2.0, 2.0, 4.0, 4.0));
        assert_eq!(c.width(), 4);
        assert_eq!(c.get(1, 1), Some(Rgba::OPAQUE_BLACK));
        assert_eq!(c.get(2, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_bytes_view() {
        let p = Pixmap::new(3, 2);
        assert_eq!(p.as_bytes().len(), 3 * 2 * 16);
        assert_eq!(p.as_f32_slice().len(), 3 * 2 * 4);
    }
}
