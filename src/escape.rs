//! The scalar escape-time kernel.  One point in, one answer out:
//! how many steps of z = z² + c it took for the orbit to leave the
//! circle of radius two, and how big |z|² was at the moment it left.

use num::Complex;

/// Orbits escape once |z|² exceeds this.  |z| > 2 can never return,
/// so squaring the comparison saves the square root.
pub const ESCAPE_THRESHOLD_SQ: f64 = 4.0;

/// What iterating a single point produced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationResult {
    /// Number of z = z² + c steps taken before the orbit escaped, or
    /// the full budget if it never did.
    pub iterations: u32,
    /// |z|² at the step the orbit first escaped.  For points that
    /// exhaust the budget this is the final |z|², which is at most
    /// the escape threshold.  Smooth coloring leans on this value, so
    /// it is captured at the escape step and never touched again.
    pub escape_magnitude_sq: f64,
}

/// Iterate a single point of the complex plane.
///
/// The per-step order is: advance z, count the step, measure |z|²,
/// test the threshold.  The four-lane kernel performs the same steps
/// in the same order, which is what makes the two bit-identical; any
/// change here has to be mirrored there.
pub fn iterate(c: Complex<f64>, max_iterations: u32) -> IterationResult {
    let mut z: Complex<f64> = Complex::new(0.0, 0.0);
    let mut magnitude_sq = 0.0;
    let mut count = 0;
    while count < max_iterations {
        z = z * z + c;
        count += 1;
        magnitude_sq = z.norm_sqr();
        if magnitude_sq > ESCAPE_THRESHOLD_SQ {
            break;
        }
    }
    IterationResult {
        iterations: count,
        escape_magnitude_sq: magnitude_sq,
    }
}
