use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glaze_core::{Color, Density, Dp, GlassStyle, Point, Rect};
use glaze_effects::{BackdropSnapshot, GlassSurface, Pixmap, Rgba};

fn backdrop() -> BackdropSnapshot {
    let image = Pixmap::from_fn(400, 400, |x, y| {
        let stripe = if (x / 20 + y / 20) % 2 == 0 { 0.9 } else { 0.2 };
        Rgba::new(stripe, x as f32 / 400.0, y as f32 / 400.0, 1.0)
    });
    BackdropSnapshot::from_image(image, Point::ZERO)
}

fn style() -> GlassStyle {
    GlassStyle::new()
        .corner_radius(Dp(40.0))
        .refraction(Dp(24.0), Dp(-48.0))
        .bleed(Dp(-24.0), 0.4, Dp(4.0))
        .dispersion(Dp(12.0))
        .blur(Dp(6.0))
        .tint(Color::WHITE.with_alpha(0.1))
        .chroma(1.4)
}

fn bench_full_frame(c: &mut Criterion) {
    let snapshot = backdrop();
    let mut x = 0.0;
    let mut surface = GlassSurface::with_style(style(), Density::ONE);

    c.bench_function("glass 200x200 full frame", |b| {
        b.iter(|| {
            // Moving the surface forces a re-record every iteration
            x = if x > 100.0 { 0.0 } else { x + 1.0 };
            surface.set_bounds(Some(Rect::new(x, 100.0, 200.0, 200.0)));
            black_box(surface.render(&snapshot).map(Pixmap::width));
        })
    });
}

fn bench_cached_frame(c: &mut Criterion) {
    let snapshot = backdrop();
    let mut surface = GlassSurface::with_style(style(), Density::ONE);
    surface.set_bounds(Some(Rect::new(100.0, 100.0, 200.0, 200.0)));
    surface.render(&snapshot);

    c.bench_function("glass 200x200 cached frame", |b| {
        b.iter(|| black_box(surface.render(&snapshot).map(Pixmap::width)))
    });
}

criterion_group!(benches, bench_full_frame, bench_cached_frame);
criterion_main!(benches);
