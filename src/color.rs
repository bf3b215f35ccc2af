//! Coloring.  The kernels produce iteration counts; this module
//! turns them into pixels.  A gradient palette maps a position in
//! [0, 1] to a color, and the two direct shading policies differ only
//! in how they compute that position: the discrete one divides the
//! raw count by the budget (visible banding and all), the smooth one
//! refines the count with the escape magnitude first, which melts the
//! bands into a continuous ramp.  Points that never escape are always
//! plain black, whatever the palette says.

use escape::IterationResult;
use itertools::Itertools;
use std::f64::consts::LN_2;

/// An 8-bit RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The color of the set's interior.
pub const BLACK: Rgb = Rgb(0, 0, 0);

/// A color anchored at a position along a gradient.
#[derive(Copy, Clone, Debug)]
pub struct ColorStop {
    /// Where along [0, 1] this color sits.
    pub position: f64,
    /// The color at that position.
    pub color: Rgb,
}

/// A piecewise-linear gradient through an ordered list of stops.
/// Loaded from wherever the application keeps its palettes; read-only
/// here.
#[derive(Clone, Debug)]
pub struct GradientPalette {
    stops: Vec<ColorStop>,
}

impl GradientPalette {
    /// Constructor.  A gradient needs at least two stops and their
    /// positions must be strictly ascending.
    pub fn new(stops: Vec<ColorStop>) -> Result<GradientPalette, String> {
        if stops.len() < 2 {
            return Err("a gradient palette needs at least two stops".to_string());
        }
        for (lower, upper) in stops.iter().tuple_windows() {
            if upper.position <= lower.position {
                return Err(format!(
                    "palette stop positions must be strictly ascending, got {} then {}",
                    lower.position, upper.position
                ));
            }
        }
        Ok(GradientPalette { stops })
    }

    /// The color at position `t`.  Positions at or beyond the end
    /// stops return those stops' exact colors; in between, the
    /// bracketing pair of stops is blended channel by channel.
    pub fn sample(&self, t: f64) -> Rgb {
        let first = self.stops[0];
        if t <= first.position {
            return first.color;
        }
        let last = self.stops[self.stops.len() - 1];
        if t >= last.position {
            return last.color;
        }
        for (lower, upper) in self.stops.iter().tuple_windows() {
            if t <= upper.position {
                let fraction = (t - lower.position) / (upper.position - lower.position);
                return blend(lower.color, upper.color, fraction);
            }
        }
        last.color
    }
}

fn blend(lower: Rgb, upper: Rgb, fraction: f64) -> Rgb {
    Rgb(
        channel(lower.0, upper.0, fraction),
        channel(lower.1, upper.1, fraction),
        channel(lower.2, upper.2, fraction),
    )
}

fn channel(lower: u8, upper: u8, fraction: f64) -> u8 {
    (f64::from(lower) + (f64::from(upper) - f64::from(lower)) * fraction).round() as u8
}

/// Refine a discrete escape count into a continuous one using the
/// magnitude at the escape step.  The fractional correction is
/// `1 - ln(ln |z|) / ln 2`, which is where banding goes to die.  The
/// double logarithm misbehaves for magnitudes at or below one (only
/// reachable by points that never escaped), so those fall back to the
/// plain count, and the result is floored at zero for points that
/// escaped with enormous magnitudes.
pub fn smooth_iteration(result: IterationResult) -> f64 {
    if result.escape_magnitude_sq <= 1.0 {
        return f64::from(result.iterations);
    }
    let refined = f64::from(result.iterations) + 1.0
        - result.escape_magnitude_sq.sqrt().ln().ln() / LN_2;
    if refined < 0.0 {
        0.0
    } else {
        refined
    }
}

/// Discrete shading: palette position is the raw count over the
/// budget.  Points that exhausted the budget are black.
pub fn shade_discrete(
    result: IterationResult,
    max_iterations: u32,
    palette: &GradientPalette,
) -> Rgb {
    if result.iterations >= max_iterations {
        return BLACK;
    }
    palette.sample(f64::from(result.iterations) / f64::from(max_iterations))
}

/// Smooth shading: same as discrete but through the refined count.
pub fn shade_smooth(result: IterationResult, max_iterations: u32, palette: &GradientPalette) -> Rgb {
    let smooth = smooth_iteration(result);
    let budget = f64::from(max_iterations);
    if smooth >= budget {
        return BLACK;
    }
    palette.sample(smooth / budget)
}
