#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelview renderer
//!
//! The Mandelbrot set is drawn by taking every pixel of the output
//! image, mapping it to a point on the complex plane, and repeatedly
//! squaring-and-adding that point until the orbit flies off to
//! infinity (or until we give up and declare the point a member of
//! the set).  The number of steps it takes to fly away is the
//! "escape time," and the escape time is what gets colored.
//!
//! The engine here is organized around one awkward truth of the
//! Mandelbrot: neighboring rows of the image can differ in cost by
//! orders of magnitude, because points inside the set burn the whole
//! iteration budget while points far outside escape in a handful of
//! steps.  Handing each worker thread a fixed band of the image
//! therefore leaves most workers idle while one unlucky thread grinds
//! through the set's interior.  Instead, rows are claimed one at a
//! time from a shared atomic cursor, so the workers stay busy until
//! the whole frame is done.
//!
//! Two escape-time kernels are provided, a scalar one and a four-lane
//! batch that iterates four points abreast.  They share every formula
//! down to the operation order, so their output is bit-identical and
//! the choice between them is purely a question of throughput.
//! Coloring is a separate concern: discrete and smooth gradients
//! shade pixels as they are computed, while the adaptive mode makes a
//! full raw pass first and recolors through the histogram of the
//! frame it just measured.

extern crate crossbeam;
extern crate itertools;
extern crate num;

pub mod color;
pub mod escape;
pub mod histogram;
pub mod lanes;
pub mod planes;
pub mod render;
pub mod rows;

pub use color::{ColorStop, GradientPalette, Rgb};
pub use escape::{iterate, IterationResult};
pub use planes::{FrameMapper, Viewport};
pub use render::{render, Coloring, Kernel};
pub use rows::{dispatch_rows, RowQueue, RowWriter, DEFAULT_WORKERS};
