// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row scheduling.  A frame is rendered row by row, and the rows of a
//! Mandelbrot frame have wildly uneven costs, so carving the image
//! into fixed per-thread bands wastes most of the pool on the cheap
//! bands.  Instead the rows sit behind a single shared cursor and
//! every worker grabs the next undone row the moment it finishes its
//! current one.  The cursor is one atomic integer; nothing fancier is
//! needed, because a row index is claimed by whichever thread wins
//! the fetch-and-increment and by nobody else.

extern crate crossbeam;

use std::marker::PhantomData;
use std::slice;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Worker pool size used when the caller has no opinion.
pub const DEFAULT_WORKERS: usize = 8;

/// A claimable cursor over the rows of one frame.  Lives exactly as
/// long as the dispatch that owns it.
pub struct RowQueue {
    next_row: AtomicUsize,
    total_rows: usize,
}

impl RowQueue {
    /// A fresh queue over `total_rows` rows, none of them claimed.
    pub fn new(total_rows: usize) -> RowQueue {
        RowQueue {
            next_row: AtomicUsize::new(0),
            total_rows,
        }
    }

    /// Claim the next undone row, or None when the frame is spoken
    /// for.  Each row index is handed out exactly once across every
    /// thread that calls this.  Relaxed ordering suffices: the claim
    /// itself carries no data, and the scope join below is what
    /// publishes the workers' writes.
    pub fn claim(&self) -> Option<usize> {
        let row = self.next_row.fetch_add(1, Ordering::Relaxed);
        if row < self.total_rows {
            Some(row)
        } else {
            None
        }
    }
}

/// Hands out rows of a shared buffer as exclusive mutable slices.
///
/// The borrow checker cannot see that dynamically claimed rows are
/// disjoint, so this wrapper holds the buffer as a raw pointer and
/// re-slices one row at a time.  The contract that makes it sound is
/// exactly the one `RowQueue` provides: a row index reaches at most
/// one worker, so no two live slices ever overlap.
pub struct RowWriter<'a, T: 'a> {
    base: *mut T,
    stride: usize,
    rows: usize,
    _buffer: PhantomData<&'a mut [T]>,
}

unsafe impl<'a, T: Send + 'a> Send for RowWriter<'a, T> {}
unsafe impl<'a, T: Send + 'a> Sync for RowWriter<'a, T> {}

impl<'a, T: 'a> RowWriter<'a, T> {
    /// Wrap a buffer whose rows are `stride` elements long.  The
    /// buffer must divide evenly into rows.
    pub fn new(buffer: &'a mut [T], stride: usize) -> RowWriter<'a, T> {
        assert!(stride > 0, "row stride must be positive");
        assert_eq!(
            buffer.len() % stride,
            0,
            "buffer length {} is not a whole number of {}-element rows",
            buffer.len(),
            stride
        );
        RowWriter {
            rows: buffer.len() / stride,
            base: buffer.as_mut_ptr(),
            stride,
            _buffer: PhantomData,
        }
    }

    /// The slice for one row.
    ///
    /// # Safety
    ///
    /// The caller must hold the exclusive claim on `index`, in this
    /// crate, by having received it from `RowQueue::claim`.  Taking
    /// the same index twice while an earlier slice is live aliases
    /// two mutable slices and is undefined behavior.
    pub unsafe fn row(&self, index: usize) -> &'a mut [T] {
        debug_assert!(index < self.rows, "row {} of {}", index, self.rows);
        slice::from_raw_parts_mut(self.base.add(index * self.stride), self.stride)
    }
}

/// Run `work` once for every row index in `0..total_rows`, spread
/// across a pool of `workers` scoped threads.  The pool is spawned
/// here and joined here; when this returns, every row has been
/// processed and every worker is gone.  Rows are claimed dynamically,
/// so a worker that drew short rows simply claims more of them.
pub fn dispatch_rows<F>(total_rows: usize, workers: usize, work: F)
where
    F: Fn(usize) + Sync,
{
    let queue = RowQueue::new(total_rows);
    let queue = &queue;
    let work = &work;
    crossbeam::scope(|spawner| {
        for _ in 0..workers.max(1) {
            spawner.spawn(move |_| {
                while let Some(row) = queue.claim() {
                    work(row);
                }
            });
        }
    })
    .unwrap();
}
