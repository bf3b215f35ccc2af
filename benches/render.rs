#[macro_use]
extern crate criterion;
extern crate mandelview;
extern crate num;

use criterion::{black_box, Criterion};
use mandelview::{
    iterate, render, ColorStop, Coloring, FrameMapper, GradientPalette, Kernel, Rgb, Viewport,
};
use mandelview::lanes::{iterate_batch, LANES};
use num::Complex;

fn edge_view() -> Viewport {
    // A boundary-hugging view, so the benches measure mixed
    // fast-escape and full-budget work rather than one or the other.
    Viewport {
        center: Complex::new(-0.7435, 0.1314),
        zoom: 50.0,
        rotation: 0.0,
        max_iterations: 1000,
    }
}

fn palette() -> GradientPalette {
    GradientPalette::new(vec![
        ColorStop {
            position: 0.0,
            color: Rgb(0, 0, 0),
        },
        ColorStop {
            position: 1.0,
            color: Rgb(255, 255, 255),
        },
    ])
    .unwrap()
}

fn kernel_benches(c: &mut Criterion) {
    let view = edge_view();
    let mapper = FrameMapper::new(&view, 256, 256);

    c.bench_function("scalar_row", move |b| {
        b.iter(|| {
            for column in 0..256 {
                let point = mapper.pixel_to_point(column, 128);
                black_box(iterate(point, 1000));
            }
        })
    });

    let mapper = FrameMapper::new(&view, 256, 256);
    c.bench_function("vector_row", move |b| {
        b.iter(|| {
            let mut column = 0;
            while column < 256 {
                let points = [
                    mapper.pixel_to_point(column, 128),
                    mapper.pixel_to_point(column + 1, 128),
                    mapper.pixel_to_point(column + 2, 128),
                    mapper.pixel_to_point(column + 3, 128),
                ];
                black_box(iterate_batch(points, 1000));
                column += LANES;
            }
        })
    });
}

fn frame_benches(c: &mut Criterion) {
    c.bench_function("frame_160x90_smooth", |b| {
        let view = edge_view();
        let palette = palette();
        let mut buffer = vec![0u8; 160 * 90 * 3];
        b.iter(|| {
            render(
                &view,
                160,
                90,
                Kernel::Vector,
                Coloring::Smooth,
                &palette,
                8,
                &mut buffer,
            );
            black_box(&buffer);
        })
    });

    c.bench_function("frame_160x90_adaptive", |b| {
        let view = edge_view();
        let palette = palette();
        let mut buffer = vec![0u8; 160 * 90 * 3];
        b.iter(|| {
            render(
                &view,
                160,
                90,
                Kernel::Vector,
                Coloring::Adaptive,
                &palette,
                8,
                &mut buffer,
            );
            black_box(&buffer);
        })
    });
}

criterion_group!(benches, kernel_benches, frame_benches);
criterion_main!(benches);
