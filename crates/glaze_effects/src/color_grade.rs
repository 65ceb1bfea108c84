//! Material color grading and the backdrop color filter

use glaze_core::{linear_to_srgb, srgb_to_linear, Color, ColorMatrix, LUMA_709};

use crate::pixmap::{Pixmap, Rgba};

/// Grading parameters; the identity is `contrast = 0, white_point = 0, chroma = 1`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorGrade {
    pub contrast: f32,
    /// `[-1, 1]`; positive mixes toward white, negative toward black
    pub white_point: f32,
    pub chroma_multiplier: f32,
}

impl ColorGrade {
    pub const IDENTITY: ColorGrade = ColorGrade {
        contrast: 0.0,
        white_point: 0.0,
        chroma_multiplier: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Grade one straight-alpha sRGB color: chroma, then white point, then contrast
    pub fn apply(&self, color: Color) -> Color {
        let mut rgb = [color.r, color.g, color.b];

        if self.chroma_multiplier != 1.0 {
            let linear = rgb.map(srgb_to_linear);
            let y = linear[0] * LUMA_709[0] + linear[1] * LUMA_709[1] + linear[2] * LUMA_709[2];
            rgb = linear.map(|c| {
                let mixed = (y + (c - y) * self.chroma_multiplier).max(0.0);
                linear_to_srgb(mixed).clamp(0.0, 1.0)
            });
        }

        if self.white_point != 0.0 {
            let target = if self.white_point > 0.0 { 1.0 } else { 0.0 };
            let k = self.white_point.abs();
            rgb = rgb.map(|c| c + (target - c) * k);
        }

        if self.contrast != 0.0 {
            rgb = rgb.map(|c| ((c - 0.5) * (1.0 + self.contrast) + 0.5).clamp(0.0, 1.0));
        }

        Color::rgba(rgb[0], rgb[1], rgb[2], color.a)
    }

    /// Grade a premultiplied pixel
    #[inline]
    pub fn apply_pixel(&self, px: Rgba) -> Rgba {
        if px.a <= 0.0 {
            return px;
        }
        Rgba::from_color(self.apply(px.to_color()))
    }
}

impl Default for ColorGrade {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Grade every pixel of `image` in place
pub fn color_grade(image: &mut Pixmap, grade: &ColorGrade) {
    if grade.is_identity() {
        return;
    }
    image.map_in_place(|px| grade.apply_pixel(px));
}

/// Run `matrix` over every pixel of `image` in place
pub fn color_filter(image: &mut Pixmap, matrix: &ColorMatrix) {
    if matrix.is_identity() {
        return;
    }
    image.map_in_place(|px| {
        let [r, g, b, a] = matrix.apply(px.to_color().to_array());
        Rgba::from_color(Color::rgba(r, g, b, a))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pixmap {
        Pixmap::from_fn(8, 8, |x, y| {
            Rgba::from_color(Color::rgba(x as f32 / 7.0, y as f32 / 7.0, 0.3, 1.0))
        })
    }

    #[test]
    fn test_identity() {
        let mut image = sample();
        let before = image.clone();
        color_grade(&mut image, &ColorGrade::IDENTITY);
        assert_eq!(image, before);
        assert!(ColorGrade::default().is_identity());
    }

    #[test]
    fn test_zero_chroma_is_gray() {
        let g = ColorGrade {
            chroma_multiplier: 0.0,
            ..ColorGrade::IDENTITY
        };
        let c = g.apply(Color::rgb(0.9, 0.2, 0.4));
        assert!((c.r - c.g).abs() < 1e-5 && (c.g - c.b).abs() < 1e-5);
    }

    #[test]
    fn test_white_point() {
        let up = ColorGrade {
            white_point: 1.0,
            ..ColorGrade::IDENTITY
        };
        let c = up.apply(Color::rgb(0.2, 0.4, 0.6));
        assert!([c.r, c.g, c.b].iter().all(|v| (v - 1.0).abs() < 1e-6));

        let down = ColorGrade {
            white_point: -0.5,
            ..ColorGrade::IDENTITY
        };
        let c = down.apply(Color::rgb(0.8, 0.4, 0.2));
        assert!((c.r - 0.4).abs() < 1e-6 && (c.g - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_contrast() {
        let g = ColorGrade {
            contrast: 1.0,
            ..ColorGrade::IDENTITY
        };
        let c = g.apply(Color::rgb(0.5, 0.75, 0.1));
        assert_eq!(c.r, 0.5);
        assert_eq!(c.g, 1.0);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_order_is_white_point_then_contrast() {
        let g = ColorGrade {
            contrast: 1.0,
            white_point: 0.5,
            chroma_multiplier: 1.0,
        };
        // 0.2 -> 0.6 -> 0.7
        let c = g.apply(Color::rgb(0.2, 0.2, 0.2));
        assert!((c.r - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_transparent_pixels_untouched() {
        let g = ColorGrade {
            white_point: 1.0,
            ..ColorGrade::IDENTITY
        };
        assert_eq!(g.apply_pixel(Rgba::TRANSPARENT), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_color_filter() {
        let mut image = sample();
        let before = image.clone();
        color_filter(&mut image, &ColorMatrix::IDENTITY);
        assert_eq!(image, before);

        color_filter(&mut image, &ColorMatrix::saturation(0.0));
        let px = image.get(7, 0).unwrap().to_color();
        assert!((px.r - px.g).abs() < 1e-4);
    }
}
