//! The render entry point.  Everything else in the crate is a part;
//! this is where they bolt together: a frame mapper for the view, a
//! kernel to iterate the points, a worker pool to spread the rows
//! around, and a coloring policy to turn the results into bytes in
//! the caller's buffer.
//!
//! The call is synchronous and self-contained.  It spawns its worker
//! pool on entry, joins it before returning, and holds no state
//! between calls.  The same entry point serves the interactive window
//! and a 15360x8640 poster export; nothing here cares about the
//! resolution beyond allocating the adaptive mode's scratch arrays.

use color::{shade_discrete, shade_smooth, smooth_iteration, GradientPalette, Rgb, BLACK};
use escape::{iterate, IterationResult};
use histogram::Histogram;
use lanes::{iterate_batch, LANES};
use planes::{FrameMapper, Viewport};
use rows::{dispatch_rows, RowWriter};

/// Which escape-time kernel iterates the points.  Both produce
/// bit-identical results; vector is simply faster on hardware with
/// the registers for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kernel {
    /// One point at a time.
    Scalar,
    /// Four points abreast.
    Vector,
}

/// How iteration results become colors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coloring {
    /// Raw count over budget.  Fast, banded.
    Discrete,
    /// Magnitude-refined count over budget.  Continuous ramps.
    Smooth,
    /// Histogram-equalized.  Two passes over the frame, but the
    /// palette range tracks the frame's actual distribution.
    Adaptive,
}

/// Bytes per output pixel.
const PIXEL_STRIDE: usize = 3;

/// Render one frame into `buffer`, which holds packed RGB bytes and
/// must be exactly `width * height * 3` long.  The engine only ever
/// writes the buffer, row by row, each row exactly once, so the
/// caller's prior contents need no clearing.
pub fn render(
    view: &Viewport,
    width: usize,
    height: usize,
    kernel: Kernel,
    coloring: Coloring,
    palette: &GradientPalette,
    workers: usize,
    buffer: &mut [u8],
) {
    assert_eq!(
        buffer.len(),
        width * height * PIXEL_STRIDE,
        "pixel buffer does not match {}x{}",
        width,
        height
    );
    if width == 0 || height == 0 {
        return;
    }
    let mapper = FrameMapper::new(view, width, height);
    let budget = view.max_iterations;
    match coloring {
        Coloring::Discrete => render_direct(&mapper, width, height, budget, kernel, workers, buffer, |result| {
            shade_discrete(result, budget, palette)
        }),
        Coloring::Smooth => render_direct(&mapper, width, height, budget, kernel, workers, buffer, |result| {
            shade_smooth(result, budget, palette)
        }),
        Coloring::Adaptive => {
            render_adaptive(&mapper, width, height, budget, kernel, palette, workers, buffer)
        }
    }
}

/// Iterate one row of pixels with the chosen kernel, handing each
/// `(column, result)` to the sink in column order.  The vector path
/// walks the row four columns at a time and lets the scalar kernel
/// mop up whatever is left at the right edge; the kernels agree bit
/// for bit, so the seam is invisible.
fn compute_row<S>(
    mapper: &FrameMapper,
    kernel: Kernel,
    row: usize,
    width: usize,
    max_iterations: u32,
    mut sink: S,
) where
    S: FnMut(usize, IterationResult),
{
    match kernel {
        Kernel::Scalar => {
            for column in 0..width {
                sink(column, iterate(mapper.pixel_to_point(column, row), max_iterations));
            }
        }
        Kernel::Vector => {
            let full = width - width % LANES;
            let mut column = 0;
            while column < full {
                let points = [
                    mapper.pixel_to_point(column, row),
                    mapper.pixel_to_point(column + 1, row),
                    mapper.pixel_to_point(column + 2, row),
                    mapper.pixel_to_point(column + 3, row),
                ];
                let results = iterate_batch(points, max_iterations);
                for lane in 0..LANES {
                    sink(column + lane, results[lane]);
                }
                column += LANES;
            }
            for tail in full..width {
                sink(tail, iterate(mapper.pixel_to_point(tail, row), max_iterations));
            }
        }
    }
}

fn write_pixel(row: &mut [u8], column: usize, color: Rgb) {
    let offset = column * PIXEL_STRIDE;
    row[offset] = color.0;
    row[offset + 1] = color.1;
    row[offset + 2] = color.2;
}

/// Discrete and smooth rendering: one dispatch over the rows, pixels
/// shaded the moment they are computed.
fn render_direct<Shade>(
    mapper: &FrameMapper,
    width: usize,
    height: usize,
    max_iterations: u32,
    kernel: Kernel,
    workers: usize,
    buffer: &mut [u8],
    shade: Shade,
) where
    Shade: Fn(IterationResult) -> Rgb + Sync,
{
    let writer = RowWriter::new(buffer, width * PIXEL_STRIDE);
    let writer = &writer;
    let shade = &shade;
    dispatch_rows(height, workers, |row| {
        let pixels = unsafe { writer.row(row) };
        compute_row(mapper, kernel, row, width, max_iterations, |column, result| {
            write_pixel(pixels, column, shade(result));
        });
    });
}

/// Adaptive rendering: materialize the whole frame's raw results,
/// build the histogram, then recolor.  The two passes each get their
/// own row queue over the same image, and the scratch arrays live
/// only as long as this call.  There is no way around the full
/// materialization: equalization needs the complete distribution
/// before the first pixel can be colored.
fn render_adaptive(
    mapper: &FrameMapper,
    width: usize,
    height: usize,
    max_iterations: u32,
    kernel: Kernel,
    palette: &GradientPalette,
    workers: usize,
    buffer: &mut [u8],
) {
    let area = width * height;
    let mut iteration_counts = vec![0u32; area];
    let mut magnitudes = vec![0f64; area];

    {
        let count_rows = RowWriter::new(&mut iteration_counts, width);
        let magnitude_rows = RowWriter::new(&mut magnitudes, width);
        let count_rows = &count_rows;
        let magnitude_rows = &magnitude_rows;
        dispatch_rows(height, workers, |row| {
            let counts = unsafe { count_rows.row(row) };
            let mags = unsafe { magnitude_rows.row(row) };
            compute_row(mapper, kernel, row, width, max_iterations, |column, result| {
                counts[column] = result.iterations;
                mags[column] = result.escape_magnitude_sq;
            });
        });
    }

    let histogram = Histogram::build(&iteration_counts, max_iterations);

    let counts = &iteration_counts;
    let mags = &magnitudes;
    let histogram = &histogram;
    let writer = RowWriter::new(buffer, width * PIXEL_STRIDE);
    let writer = &writer;
    dispatch_rows(height, workers, |row| {
        let pixels = unsafe { writer.row(row) };
        for column in 0..width {
            let index = row * width + column;
            let result = IterationResult {
                iterations: counts[index],
                escape_magnitude_sq: mags[index],
            };
            let color = if result.iterations >= max_iterations {
                BLACK
            } else {
                palette.sample(histogram.position(smooth_iteration(result)))
            };
            write_pixel(pixels, column, color);
        }
    });
}
