//! The four-lane escape-time kernel.  Four points ride through the
//! z = z² + c recurrence side by side, one per lane, in the layout
//! the optimizer turns into vector instructions.  Lanes rarely finish
//! together; one point may bail on the first step while its neighbor
//! burns the whole budget.  Each lane therefore carries an `active` flag and
//! the loop only stops once every flag has dropped.
//!
//! The subtle part is the escape magnitude.  Retired lanes keep
//! getting their z updated (a conditional store per lane would defeat
//! the vectorizer), which means their |z|² keeps growing toward
//! infinity after escape.  The magnitude that smooth coloring needs
//! is the one from the escape step itself, so it is latched exactly
//! once, on the lane's active-to-inactive transition, and never
//! written again.

use escape::{IterationResult, ESCAPE_THRESHOLD_SQ};
use num::Complex;

/// Number of points iterated per batch.
pub const LANES: usize = 4;

/// Iterate four points at once.  Per lane, the result is identical,
/// bit for bit, to what `escape::iterate` returns for the same
/// point, because both kernels advance z, count, measure, and test in
/// the same order with the same arithmetic.
pub fn iterate_batch(
    points: [Complex<f64>; LANES],
    max_iterations: u32,
) -> [IterationResult; LANES] {
    debug_assert!(max_iterations > 0, "iteration budget must be positive");

    let mut zr = [0.0f64; LANES];
    let mut zi = [0.0f64; LANES];
    let mut magnitude_sq = [0.0f64; LANES];
    let mut counts = [0u32; LANES];
    let mut latched = [0.0f64; LANES];
    let mut active = [true; LANES];

    while active.iter().any(|&lane| lane) {
        // Advance z on every lane, retired or not.
        for lane in 0..LANES {
            let re = zr[lane] * zr[lane] - zi[lane] * zi[lane] + points[lane].re;
            let im = 2.0 * zr[lane] * zi[lane] + points[lane].im;
            zr[lane] = re;
            zi[lane] = im;
        }
        // The step only counts for lanes that are still in play.
        for lane in 0..LANES {
            if active[lane] {
                counts[lane] += 1;
            }
        }
        for lane in 0..LANES {
            magnitude_sq[lane] = zr[lane] * zr[lane] + zi[lane] * zi[lane];
        }
        // Retire lanes that escaped or ran out of budget.  The latch
        // is guarded by the pre-retirement `active` flag: a lane that
        // already retired must never have its magnitude overwritten,
        // no matter what its z has grown into since.
        for lane in 0..LANES {
            if active[lane]
                && (magnitude_sq[lane] > ESCAPE_THRESHOLD_SQ || counts[lane] == max_iterations)
            {
                latched[lane] = magnitude_sq[lane];
                active[lane] = false;
            }
        }
    }

    let mut results = [IterationResult {
        iterations: 0,
        escape_magnitude_sq: 0.0,
    }; LANES];
    for lane in 0..LANES {
        results[lane] = IterationResult {
            iterations: counts[lane],
            escape_magnitude_sq: latched[lane],
        };
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape::iterate;

    /// |z|² after exactly `steps` updates of the recurrence, replayed
    /// independently of either kernel.
    fn magnitude_at_step(c: Complex<f64>, steps: u32) -> f64 {
        let mut z = Complex::new(0.0, 0.0);
        for _ in 0..steps {
            z = z * z + c;
        }
        z.norm_sqr()
    }

    /// A batch whose lanes retire at steps 1, 5, 5, and 20 (the last
    /// by exhausting the budget).
    fn staggered_points() -> [Complex<f64>; LANES] {
        [
            Complex::new(3.0, 0.0),
            Complex::new(0.5, 0.5),
            Complex::new(0.5, 0.5),
            Complex::new(-2.0, 0.0),
        ]
    }

    #[test]
    fn staggered_lanes_report_their_own_escape_counts() {
        let results = iterate_batch(staggered_points(), 20);
        let counts: Vec<u32> = results.iter().map(|r| r.iterations).collect();
        assert_eq!(counts, vec![1, 5, 5, 20]);
    }

    #[test]
    fn magnitude_is_latched_at_each_lane_own_escape_step() {
        let points = staggered_points();
        let results = iterate_batch(points, 20);
        for lane in 0..LANES {
            assert_eq!(
                results[lane].escape_magnitude_sq,
                magnitude_at_step(points[lane], results[lane].iterations),
                "lane {} kept iterating past its escape",
                lane
            );
        }
    }

    #[test]
    fn early_lane_magnitude_survives_nineteen_more_batch_steps() {
        // The first lane escapes at step 1 with |z|² = 9 while the
        // last lane keeps the batch alive until step 20.  If the
        // latch leaked, the first lane would report some enormous
        // post-escape magnitude instead.
        let results = iterate_batch(staggered_points(), 20);
        assert_eq!(results[0].escape_magnitude_sq, 9.0);
    }

    #[test]
    fn batch_agrees_with_the_scalar_kernel_bit_for_bit() {
        let points = [
            Complex::new(-0.7435, 0.1314),
            Complex::new(0.3, 0.02),
            Complex::new(-1.25, 0.05),
            Complex::new(-0.1, 0.95),
        ];
        let batch = iterate_batch(points, 500);
        for lane in 0..LANES {
            let scalar = iterate(points[lane], 500);
            assert_eq!(batch[lane], scalar, "lane {} diverged", lane);
        }
    }

    #[test]
    fn uniform_batch_retires_all_lanes_together() {
        let c = Complex::new(0.5, 0.5);
        let results = iterate_batch([c; LANES], 50);
        for result in &results {
            assert_eq!(*result, iterate(c, 50));
        }
    }
}
