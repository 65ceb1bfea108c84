//! Porter-Duff compositing on premultiplied pixels

use crate::pixmap::{Pixmap, Rgba};

/// Compositing blend mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// `src + dst × (1 − src.a)`
    #[default]
    SrcOver,
    /// `min(src + dst, 1)`, used for solid borders
    Plus,
}

impl BlendMode {
    #[inline]
    pub fn blend(self, src: Rgba, dst: Rgba) -> Rgba {
        match self {
            BlendMode::SrcOver => {
                let k = 1.0 - src.a;
                Rgba::new(
                    src.r + dst.r * k,
                    src.g + dst.g * k,
                    src.b + dst.b * k,
                    src.a + dst.a * k,
                )
            }
            BlendMode::Plus => Rgba::new(
                (src.r + dst.r).min(1.0),
                (src.g + dst.g).min(1.0),
                (src.b + dst.b).min(1.0),
                (src.a + dst.a).min(1.0),
            ),
        }
    }
}

/// Blend `src` onto `dst` with `src`'s top-left at `(x, y)` in `dst`
pub fn composite(dst: &mut Pixmap, src: &Pixmap, x: i32, y: i32, mode: BlendMode) {
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    for sy in 0..src.height() {
        let ty = y as i64 + sy as i64;
        if ty < 0 || ty >= dh {
            continue;
        }
        for sx in 0..src.width() {
            let tx = x as i64 + sx as i64;
            if tx < 0 || tx >= dw {
                continue;
            }
            let Some(s) = src.get(sx, sy) else {
                continue;
            };
            let (tx, ty) = (tx as u32, ty as u32);
            if let Some(d) = dst.get(tx, ty) {
                dst.set(tx, ty, mode.blend(s, d));
            }
        }
    }
}

/// Blend two equally sized pixmaps pixel by pixel into `dst`
pub fn composite_same_size(dst: &mut Pixmap, src: &Pixmap, mode: BlendMode) {
    for (d, s) in dst.pixels_mut().iter_mut().zip(src.pixels()) {
        *d = mode.blend(*s, *d);
    }
}
