//! End-to-end behavior of the glass pipeline

use glaze_core::{
    Color, Density, Dp, GlassBorder, GlassStyle, ParamRange, ParamValue, PlaygroundParams, Point,
    Rect, Size, Vec2,
};
use glaze_effects::bleed::{apply_bleed, bleed_layer, BleedParams};
use glaze_effects::blur::BlurKernel;
use glaze_effects::color_grade::{color_grade, ColorGrade};
use glaze_effects::dispersion::disperse;
use glaze_effects::refraction::{refract, RefractionParams};
use glaze_effects::sampler::measure;
use glaze_effects::sdf::circle_map;
use glaze_effects::{BackdropSnapshot, GlassSurface, Pixmap, Rgba, RoundedRect};

/// Pixel `(x, y)` encodes its own center: `r = (x + 0.5) / w`, `g = (y + 0.5) / h`
///
/// A bilinear sample at `(sx, sy)` therefore reads back `(sx / w, sy / h)`.
fn coordinate_backdrop(width: u32, height: u32) -> Pixmap {
    Pixmap::from_fn(width, height, |x, y| {
        Rgba::new(
            (x as f32 + 0.5) / width as f32,
            (y as f32 + 0.5) / height as f32,
            0.0,
            1.0,
        )
    })
}

fn lens_style() -> GlassStyle {
    GlassStyle::new()
        .corner_radius(Dp(30.0))
        .refraction(Dp(20.0), Dp(-60.0))
        .eccentric_factor(1.0)
        .border(GlassBorder::None)
}

fn render_lens(style: GlassStyle) -> Pixmap {
    let snapshot = BackdropSnapshot::from_image(coordinate_backdrop(300, 300), Point::ZERO);
    let mut surface = GlassSurface::with_style(style, Density::ONE);
    surface.set_bounds(Some(Rect::new(0.0, 0.0, 300.0, 300.0)));
    surface.render(&snapshot).cloned().unwrap_or_else(|| Pixmap::new(0, 0))
}

/// Horizontal sample coordinate recovered from an output pixel
fn sampled_x(image: &Pixmap, x: u32, y: u32) -> f32 {
    image.get(x, y).map(|p| p.r * 300.0).unwrap_or(f32::NAN)
}

#[test]
fn lens_shift_follows_circle_map() {
    let image = render_lens(lens_style());
    assert_eq!(image.width(), 300);

    // Left edge, vertically centered: the pull is along +x
    let expected_shift = circle_map(1.0 - 5.5 / 20.0) * 60.0;
    let shift = sampled_x(&image, 5, 150) - 5.5;
    assert!(
        (shift - expected_shift).abs() < 0.01,
        "shift {shift}, expected {expected_shift}"
    );
}

#[test]
fn lens_shift_peaks_at_edge_and_vanishes_inward() {
    let image = render_lens(lens_style());
    let shifts: Vec<f32> = (0..20)
        .map(|x| sampled_x(&image, x, 150) - (x as f32 + 0.5))
        .collect();

    for pair in shifts.windows(2) {
        assert!(pair[0] > pair[1], "shift must shrink inward: {shifts:?}");
    }
    assert!(shifts[0] > 45.0 && shifts[0] <= 60.0);
    assert!(shifts[19] < 0.1);

    // 25.5 px inside, beyond the rim
    assert!((sampled_x(&image, 25, 150) - 25.5).abs() < 1e-3);
}

#[test]
fn zero_amount_is_identity() {
    let src = coordinate_backdrop(120, 80);
    let shape = RoundedRect::uniform(src.size(), 20.0);
    let params = RefractionParams {
        height: 30.0,
        amount: 0.0,
        eccentric_factor: 1.0,
    };
    assert_eq!(refract(&src, &shape, &params), src);
}

#[test]
fn outside_and_deep_pixels_pass_through() {
    let src = coordinate_backdrop(120, 80);
    let shape = RoundedRect::uniform(src.size(), 30.0);
    let params = RefractionParams {
        height: 15.0,
        amount: -20.0,
        eccentric_factor: 0.5,
    };
    let out = refract(&src, &shape, &params);
    for y in 0..80 {
        for x in 0..120 {
            let p = shape.centered(x as f32 + 0.5, y as f32 + 0.5);
            let sd = shape.distance(p);
            if sd >= 0.0 || -sd >= params.height {
                assert_eq!(out.get(x, y), src.get(x, y), "pixel ({x}, {y})");
            }
        }
    }
}

#[test]
fn sdf_sign_and_rect_reduction() {
    let shape = RoundedRect::uniform(Size::new(60.0, 40.0), 10.0);
    assert!(shape.distance(Vec2::new(0.0, 0.0)) < 0.0);
    assert_eq!(shape.distance(Vec2::new(30.0, 0.0)), 0.0);
    assert!(shape.distance(Vec2::new(31.0, 0.0)) > 0.0);

    let square = RoundedRect::uniform(Size::new(60.0, 40.0), 0.0);
    assert_eq!(square.distance(Vec2::new(35.0, 25.0)), Vec2::new(5.0, 5.0).length());
    assert_eq!(square.distance(Vec2::new(10.0, 5.0)), -15.0);
}

#[test]
fn zero_height_dispersion_is_identity() {
    let src = coordinate_backdrop(64, 64);
    let shape = RoundedRect::uniform(src.size(), 16.0);
    assert_eq!(disperse(&src, &shape, 0.0), src);
}

#[test]
fn neutral_color_grade_is_identity() {
    let mut image = coordinate_backdrop(64, 64);
    let before = image.clone();
    color_grade(
        &mut image,
        &ColorGrade {
            contrast: 0.0,
            white_point: 0.0,
            chroma_multiplier: 1.0,
        },
    );
    assert_eq!(image, before);
}

#[test]
fn zero_bleed_opacity_contributes_nothing() {
    let plain = render_lens(lens_style());
    let with_bleed = render_lens(lens_style().bleed(Dp(-40.0), 0.0, Dp(4.0)));
    assert_eq!(plain, with_bleed);

    let src = coordinate_backdrop(60, 60);
    let shape = RoundedRect::uniform(src.size(), 12.0);
    let params = BleedParams::new(-30.0, 0.0, 2.0, 1.0, 12.0);
    let halo = bleed_layer(&src, &shape, &params, &BlurKernel::for_radius(2.0));
    assert_eq!(apply_bleed(src.clone(), &halo, params.opacity), src);
}

#[test]
fn active_bleed_changes_output() {
    let plain = render_lens(lens_style());
    let bled = render_lens(lens_style().bleed(Dp(-40.0), 0.8, Dp(0.0)));
    assert_ne!(plain, bled);
}

#[test]
fn unsafe_mode_toggle_keeps_raw_value() {
    let mut value = ParamValue::new(
        0.0f32,
        ParamRange::new(0.0, 1.0),
        ParamRange::new(-2.0, 2.0),
        |v: f32| format!("{v:.2}"),
    );
    value.set_unsafe_mode(true);
    value.set_value(1.5);
    assert_eq!(value.value(), 1.5);

    value.set_unsafe_mode(false);
    assert_eq!(value.raw_value(), 1.5);
    assert_eq!(value.value(), 1.0);
    assert!(!value.is_valid());
}

#[test]
fn reset_restores_documented_initials() {
    let mut params = PlaygroundParams::new();
    params.set_unsafe_mode(true);
    params.for_each_scalar(|p| p.set_progress(0.9));
    params.for_each_length(|p| p.set_progress(0.1));
    params.reset();

    assert_eq!(params.blur_radius.value(), Dp(0.0));
    assert_eq!(params.opacity.value(), 0.0);
    assert_eq!(params.chroma_multiplier.value(), 1.0);
    assert_eq!(params.contrast.value(), 0.0);
    assert_eq!(params.white_point.value(), 0.0);
    assert_eq!(params.corner_radius.value(), Dp(32.0));
    assert_eq!(params.refraction_height.value(), Dp(24.0));
    assert_eq!(params.refraction_amount.value(), Dp(-32.0));
    assert_eq!(params.dispersion_height.value(), Dp(0.0));
    assert_eq!(params.eccentric_factor.value(), 1.0);
    assert_eq!(params.bleed_amount.value(), Dp(0.0));
    assert_eq!(params.bleed_opacity.value(), 0.0);
    assert_eq!(params.bleed_blur_radius.value(), Dp(0.0));
}

#[test]
fn mid_gray_luminance_is_half() {
    let gray = Rgba::from_color(Color::from_rgba8(128, 128, 128, 255));
    let layer = Pixmap::filled(120, 90, gray);
    let luminance = measure(&layer, [5, 5], 0.25);
    assert_eq!(luminance, Some(0.5));
}

#[test]
fn unchanged_frames_reuse_output() {
    let snapshot = BackdropSnapshot::from_image(coordinate_backdrop(200, 200), Point::ZERO);
    let mut surface = GlassSurface::with_style(lens_style().blur(Dp(2.0)), Density::ONE);
    surface.set_bounds(Some(Rect::new(10.0, 10.0, 120.0, 120.0)));

    for _ in 0..5 {
        assert!(surface.render(&snapshot).is_some());
    }
    let stats = surface.stats();
    assert_eq!(stats.graph_builds, 1);
    assert_eq!(stats.records, 1);
    assert_eq!(stats.cache_hits, 4);
    assert_eq!(stats.cache.builds, 2);
}
