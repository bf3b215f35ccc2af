//! The iteration histogram behind adaptive coloring.  A deep zoom
//! often squeezes nearly every pixel into a narrow band of escape
//! counts, and a fixed count-to-position mapping renders that as a
//! near-solid wash of one color.  Equalization fixes it by mapping
//! each count to its cumulative share of the frame's pixels: sparse
//! counts compress, crowded counts spread out, and the palette's
//! whole range gets used no matter how lopsided the frame is.
//!
//! Building the histogram needs every pixel's count before any pixel
//! can be colored, which is why adaptive rendering is two full passes
//! with this structure built in between.  Once built it is never
//! mutated again, so the recoloring pass shares it freely.

/// Distribution of escape counts over one finished frame, with its
/// cumulative form alongside.
pub struct Histogram {
    bins: Vec<u64>,
    cdf: Vec<f64>,
}

impl Histogram {
    /// Tally a frame's worth of escape counts.  One bin per discrete
    /// count from zero through `max_iterations`; the cumulative
    /// fractions are the running bin total over the pixel count.
    pub fn build(counts: &[u32], max_iterations: u32) -> Histogram {
        let mut bins = vec![0u64; max_iterations as usize + 1];
        for &count in counts {
            bins[count.min(max_iterations) as usize] += 1;
        }
        let total = if counts.is_empty() {
            1.0
        } else {
            counts.len() as f64
        };
        let mut cdf = Vec::with_capacity(bins.len());
        let mut running = 0u64;
        for &bin in &bins {
            running += bin;
            cdf.push(running as f64 / total);
        }
        Histogram { bins, cdf }
    }

    /// How many pixels landed on exactly this count.
    pub fn bin(&self, count: u32) -> u64 {
        self.bins[count as usize]
    }

    /// Fraction of pixels whose count is at or below this one.
    pub fn cumulative(&self, count: u32) -> f64 {
        self.cdf[(count as usize).min(self.cdf.len() - 1)]
    }

    /// Equalized palette position for a refined escape count.  The
    /// integer part selects a bin and the fractional part blends
    /// toward the next bin's cumulative value, so pixels whose smooth
    /// counts straddle a bin edge land on neighboring positions
    /// instead of snapping a full bin apart.
    pub fn position(&self, smooth: f64) -> f64 {
        let last = self.cdf.len() - 1;
        let clamped = if smooth < 0.0 { 0.0 } else { smooth };
        let bin = (clamped.floor() as usize).min(last.saturating_sub(1));
        let fraction = (clamped - bin as f64).min(1.0);
        self.cdf[bin] + (self.cdf[bin + 1] - self.cdf[bin]) * fraction
    }
}
