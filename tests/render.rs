//! Whole-frame checks: the scenarios a user would actually notice if
//! they broke.

extern crate mandelview;
extern crate num;

use mandelview::{
    render, ColorStop, Coloring, GradientPalette, Kernel, Rgb, Viewport, DEFAULT_WORKERS,
};
use num::Complex;

fn black_to_white() -> GradientPalette {
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

fn home_view(max_iterations: u32) -> Viewport {
    Viewport {
        center: Complex::new(-0.5, 0.0),
        zoom: 1.0,
        rotation: 0.0,
        max_iterations,
    }
}

#[test]
fn tiny_frame_renders_its_in_set_center_black() {
    // An 8x8 frame of the home view: the center pixel sits exactly on
    // c = -0.5 + 0i, which is comfortably inside the set.
    let view = home_view(50);
    let mut buffer = vec![0u8; 8 * 8 * 3];
    render(
        &view,
        8,
        8,
        Kernel::Scalar,
        Coloring::Discrete,
        &black_to_white(),
        DEFAULT_WORKERS,
        &mut buffer,
    );
    let center = (4 * 8 + 4) * 3;
    assert_eq!(&buffer[center..center + 3], &[0u8, 0, 0][..]);
}

#[test]
fn scalar_and_vector_kernels_agree_on_a_real_frame() {
    let view = home_view(500);
    let width = 800;
    let height = 450;
    let mut scalar = vec![0u8; width * height * 3];
    let mut vector = vec![0u8; width * height * 3];
    render(
        &view,
        width,
        height,
        Kernel::Scalar,
        Coloring::Smooth,
        &black_to_white(),
        DEFAULT_WORKERS,
        &mut scalar,
    );
    render(
        &view,
        width,
        height,
        Kernel::Vector,
        Coloring::Smooth,
        &black_to_white(),
        DEFAULT_WORKERS,
        &mut vector,
    );

    let total = width * height;
    let matching = scalar
        .chunks(3)
        .zip(vector.chunks(3))
        .filter(|&(a, b)| a == b)
        .count();
    // The kernels share every formula, so in practice this is 100%;
    // the contract allows a sliver of disagreement on pixels whose
    // orbits graze the escape threshold.
    assert!(
        matching as f64 >= total as f64 * 0.999,
        "only {} of {} pixels matched",
        matching,
        total
    );
}

#[test]
fn rotation_does_not_disturb_kernel_agreement() {
    let mut view = home_view(200);
    view.rotation = 0.7;
    view.zoom = 3.0;
    view.center = Complex::new(-0.74, 0.13);
    let mut scalar = vec![0u8; 240 * 180 * 3];
    let mut vector = vec![0u8; 240 * 180 * 3];
    render(
        &view,
        240,
        180,
        Kernel::Scalar,
        Coloring::Discrete,
        &black_to_white(),
        DEFAULT_WORKERS,
        &mut scalar,
    );
    render(
        &view,
        240,
        180,
        Kernel::Vector,
        Coloring::Discrete,
        &black_to_white(),
        DEFAULT_WORKERS,
        &mut vector,
    );
    assert_eq!(scalar, vector);
}

#[test]
fn adaptive_mode_renders_the_same_frame_on_either_kernel() {
    let view = home_view(300);
    let mut scalar = vec![0u8; 160 * 90 * 3];
    let mut vector = vec![0u8; 160 * 90 * 3];
    render(
        &view,
        160,
        90,
        Kernel::Scalar,
        Coloring::Adaptive,
        &black_to_white(),
        DEFAULT_WORKERS,
        &mut scalar,
    );
    render(
        &view,
        160,
        90,
        Kernel::Vector,
        Coloring::Adaptive,
        &black_to_white(),
        DEFAULT_WORKERS,
        &mut vector,
    );
    assert_eq!(scalar, vector);
}

#[test]
fn adaptive_mode_spreads_the_palette_wider_than_discrete() {
    // Zoomed into the seahorse valley, most escape counts huddle in a
    // narrow band; equalization should produce more distinct shades
    // than the raw count-over-budget mapping.
    let view = Viewport {
        center: Complex::new(-0.7435, 0.1314),
        zoom: 200.0,
        rotation: 0.0,
        max_iterations: 600,
    };
    let mut discrete = vec![0u8; 96 * 54 * 3];
    let mut adaptive = vec![0u8; 96 * 54 * 3];
    render(
        &view,
        96,
        54,
        Kernel::Vector,
        Coloring::Discrete,
        &black_to_white(),
        DEFAULT_WORKERS,
        &mut discrete,
    );
    render(
        &view,
        96,
        54,
        Kernel::Vector,
        Coloring::Adaptive,
        &black_to_white(),
        DEFAULT_WORKERS,
        &mut adaptive,
    );

    fn distinct_shades(buffer: &[u8]) -> usize {
        let mut seen = [false; 256];
        for pixel in buffer.chunks(3) {
            seen[pixel[0] as usize] = true;
        }
        seen.iter().filter(|&&s| s).count()
    }

    assert!(
        distinct_shades(&adaptive) >= distinct_shades(&discrete),
        "equalization narrowed the palette instead of widening it"
    );
}
