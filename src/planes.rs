//! Contains the Viewport, which describes what part of the complex
//! plane the caller wants to look at, and the FrameMapper, which
//! turns a pixel of the output image into the complex number sitting
//! under it.  The mapper is the single source of truth for that
//! conversion: both escape-time kernels go through it, and any other
//! backend that wants comparable output has to reproduce its
//! operation order exactly.
use num::Complex;

/// Width of the visible slice of the complex plane at zoom 1.0.  The
/// classic full-set framing is about 3.5 wide by 2.0 tall.
const SPAN_RE: f64 = 3.5;

/// Height of the visible slice of the complex plane at zoom 1.0.
const SPAN_IM: f64 = 2.0;

/// A view onto the complex plane: where we are looking, how far in
/// we are, how the view is tilted, and how long we are willing to
/// iterate before declaring a point a member of the set.
///
/// A Viewport is a read-only snapshot for the duration of one render;
/// whoever drives the interaction loop owns the mutable copy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center of the view on the complex plane.
    pub center: Complex<f64>,
    /// Magnification.  1.0 frames the whole set; larger is deeper.
    /// Must be positive; that is the caller's promise, not a runtime
    /// check.
    pub zoom: f64,
    /// Rotation of the view in radians, counter-clockwise.
    pub rotation: f64,
    /// Iteration budget per point.  Must be positive.
    pub max_iterations: u32,
}

/// Maps pixels of a concrete image to points on the complex plane
/// for one Viewport.  The rotation and zoom factors are computed once
/// here so the per-pixel path is four multiplies and four adds.
#[derive(Debug)]
pub struct FrameMapper {
    center: Complex<f64>,
    cos_rotation: f64,
    sin_rotation: f64,
    span_re: f64,
    span_im: f64,
    width: f64,
    height: f64,
}

impl FrameMapper {
    /// Constructor.  Takes the view and the pixel dimensions of the
    /// frame being rendered.
    pub fn new(view: &Viewport, width: usize, height: usize) -> FrameMapper {
        debug_assert!(view.zoom > 0.0, "zoom must be positive");
        debug_assert!(view.max_iterations > 0, "iteration budget must be positive");
        FrameMapper {
            center: view.center,
            cos_rotation: view.rotation.cos(),
            sin_rotation: view.rotation.sin(),
            span_re: SPAN_RE / view.zoom,
            span_im: SPAN_IM / view.zoom,
            width: width as f64,
            height: height as f64,
        }
    }

    /// Given the column and row of a pixel, return the complex number
    /// under it: normalize each axis to [-0.5, 0.5], rotate, scale by
    /// the zoomed spans, and translate to the view center.  The order
    /// of those operations is deliberate; a backend that reorders
    /// them will disagree with this one in the last bits and the
    /// outputs stop being comparable.
    pub fn pixel_to_point(&self, column: usize, row: usize) -> Complex<f64> {
        let nx = column as f64 / self.width - 0.5;
        let ny = row as f64 / self.height - 0.5;
        let rx = nx * self.cos_rotation - ny * self.sin_rotation;
        let ry = nx * self.sin_rotation + ny * self.cos_rotation;
        Complex::new(
            rx * self.span_re + self.center.re,
            ry * self.span_im + self.center.im,
        )
    }
}
