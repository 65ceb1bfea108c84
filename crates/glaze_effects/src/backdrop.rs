//! Backdrop capture
//!
//! A [`BackdropCapture`] owns the offscreen layer holding whatever is drawn
//! behind glass surfaces. Recording always starts from a cleared layer, so
//! recording twice in a frame leaves only the second result. Consumers get
//! read-only [`BackdropSnapshot`]s.

use std::sync::Arc;

use tracing::{debug, trace};

use glaze_core::{Color, Point, Rect, Tracked};

use crate::blend::{composite, BlendMode};
use crate::pixmap::{Pixmap, Rgba};

/// Recorded backdrop image and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropSnapshot {
    /// Layer content, one pixel per root-space pixel of `rect`
    pub image: Pixmap,
    /// Root-space rectangle the image covers
    pub rect: Rect,
    /// Incremented on every recording
    pub generation: u64,
}

impl BackdropSnapshot {
    /// A snapshot wrapping an existing image at `origin`
    pub fn from_image(image: Pixmap, origin: Point) -> Self {
        let rect = Rect::new(
            origin.x,
            origin.y,
            image.width() as f32,
            image.height() as f32,
        );
        Self {
            image,
            rect,
            generation: 0,
        }
    }
}

/// Drawing target handed to the record callback
///
/// Coordinates are root-space; the canvas offsets them into the layer.
pub struct Canvas<'a> {
    target: &'a mut Pixmap,
    origin: Point,
}

impl<'a> Canvas<'a> {
    pub fn new(target: &'a mut Pixmap, origin: Point) -> Self {
        Self { target, origin }
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    /// Fill a root-space rectangle, source-over
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let local = rect.translate(-self.origin.x, -self.origin.y);
        let left = local.x().round().max(0.0) as u32;
        let top = local.y().round().max(0.0) as u32;
        let right = (local.right().round().max(0.0) as u32).min(self.target.width());
        let bottom = (local.bottom().round().max(0.0) as u32).min(self.target.height());
        let src = Rgba::from_color(color);
        for y in top..bottom {
            for x in left..right {
                if let Some(dst) = self.target.get(x, y) {
                    self.target.set(x, y, BlendMode::SrcOver.blend(src, dst));
                }
            }
        }
    }

    /// Draw `pixmap` with its top-left at root-space `at`, source-over
    pub fn draw_pixmap(&mut self, pixmap: &Pixmap, at: Point) {
        let x = (at.x - self.origin.x).round() as i32;
        let y = (at.y - self.origin.y).round() as i32;
        composite(self.target, pixmap, x, y, BlendMode::SrcOver);
    }
}

/// Owner of the backdrop layer
#[derive(Debug)]
pub struct BackdropCapture {
    background: Tracked<Color>,
    layer: Pixmap,
    rect: Rect,
    generation: u64,
    dirty: bool,
    snapshot: Option<Arc<BackdropSnapshot>>,
}

impl BackdropCapture {
    /// Capture that clears to `background` before each recording
    pub fn new(background: Color) -> Self {
        Self {
            background: Tracked::new(background),
            layer: Pixmap::new(0, 0),
            rect: Rect::default(),
            generation: 0,
            dirty: true,
            snapshot: None,
        }
    }

    pub fn background(&self) -> Color {
        *self.background.get()
    }

    pub fn set_background(&mut self, color: Color) {
        if self.background.set(color) {
            self.dirty = true;
        }
    }

    /// Mark the provider's content as changed
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether the next frame must record
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clear, fill the background, then let `draw` paint the content
    ///
    /// `rect` is the root-space region the layer covers.
    pub fn record(&mut self, rect: Rect, draw: impl FnOnce(&mut Canvas<'_>)) -> Arc<BackdropSnapshot> {
        let width = rect.width().round().max(0.0) as u32;
        let height = rect.height().round().max(0.0) as u32;
        if width != self.layer.width() || height != self.layer.height() {
            debug!(width, height, "backdrop layer resized");
        }
        self.layer.resize(width, height);
        self.layer.fill(Rgba::from_color(*self.background.get()));

        let mut canvas = Canvas::new(&mut self.layer, rect.origin);
        draw(&mut canvas);

        self.rect = rect;
        self.generation += 1;
        self.dirty = false;
        trace!(generation = self.generation, "backdrop recorded");

        let snapshot = Arc::new(BackdropSnapshot {
            image: self.layer.clone(),
            rect,
            generation: self.generation,
        });
        self.snapshot = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Latest recording, if any
    pub fn snapshot(&self) -> Option<Arc<BackdropSnapshot>> {
        self.snapshot.clone()
    }
}

impl Default for BackdropCapture {
    fn default() -> Self {
        Self::new(Color::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fills_background_and_content() {
        let mut capture = BackdropCapture::new(Color::BLACK);
        assert!(capture.is_dirty());
        let snap = capture.record(Rect::new(10.0, 10.0, 20.0, 20.0), |canvas| {
            canvas.fill_rect(Rect::new(10.0, 10.0, 5.0, 5.0), Color::WHITE);
        });
        assert!(!capture.is_dirty());
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.image.get(0, 0), Some(Rgba::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(snap.image.get(5, 5), Some(Rgba::OPAQUE_BLACK));
    }

    #[test]
    fn test_rerecord_does_not_ghost() {
        let mut capture = BackdropCapture::new(Color::BLACK);
        let rect = Rect::new(0.0, 0.0, 8.0, 8.0);
        capture.record(rect, |canvas| {
            canvas.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::WHITE);
        });
        let snap = capture.record(rect, |_| {});
        assert_eq!(snap.generation, 2);
        assert!(snap.image.pixels().iter().all(|p| *p == Rgba::OPAQUE_BLACK));
    }

    #[test]
    fn test_draw_pixmap_at_root_position() {
        let mut capture = BackdropCapture::default();
        let tile = Pixmap::filled(2, 2, Rgba::OPAQUE_BLACK);
        let snap = capture.record(Rect::new(100.0, 50.0, 6.0, 6.0), |canvas| {
            canvas.draw_pixmap(&tile, Point::new(103.0, 51.0));
        });
        assert_eq!(snap.image.get(3, 1), Some(Rgba::OPAQUE_BLACK));
        assert_eq!(snap.image.get(2, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(capture.snapshot().map(|s| s.rect), Some(snap.rect));
    }

    #[test]
    fn test_invalidate() {
        let mut capture = BackdropCapture::default();
        capture.record(Rect::new(0.0, 0.0, 1.0, 1.0), |_| {});
        capture.invalidate();
        assert!(capture.is_dirty());
        capture.set_background(Color::WHITE);
        assert_eq!(capture.background(), Color::WHITE);
    }
}
