use anyhow::{anyhow, Result};
use std::ops::Range;

/// A half-open range of columns `[start, end)` updated by a single worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragment {
    start: usize,
    end: usize,
}

impl Fragment {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn width(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn columns(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, x: usize) -> bool {
        self.columns().contains(&x)
    }
}

/// Rounds `width` up to the nearest multiple of `workers` (never down).
///
/// # Errors
///
/// Returns an error if either argument is zero or the result overflows.
pub fn padded_width(width: usize, workers: usize) -> Result<usize> {
    if workers == 0 {
        return Err(anyhow!("Worker count must be at least 1"));
    }
    if width == 0 {
        return Err(anyhow!("Grid width must be positive"));
    }
    width
        .checked_next_multiple_of(workers)
        .ok_or_else(|| anyhow!("Width {} padded to {} workers overflows", width, workers))
}

/// Splits `[0, width)` into `workers` contiguous fragments of
/// `ceil(width / workers)` columns, clamping the tail to `width`.
///
/// When `width` is not a multiple of `workers` the last fragments are
/// narrower, possibly empty. Use [`Partition`] to get equal fragments.
pub fn fragments(width: usize, workers: usize) -> Result<Vec<Fragment>> {
    if workers == 0 {
        return Err(anyhow!("Worker count must be at least 1"));
    }
    let fragment_width = width.div_ceil(workers);
    Ok((0..workers)
        .map(|i| {
            let start = (i * fragment_width).min(width);
            let end = (start + fragment_width).min(width);
            Fragment { start, end }
        })
        .collect())
}

/// Column partition of a grid among a fixed number of workers.
///
/// The grid width is padded once, on construction, so every worker gets
/// a fragment of the same width and no clamping happens afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    requested_width: usize,
    width: usize,
    fragments: Vec<Fragment>,
}

impl Partition {
    /// # Errors
    ///
    /// Returns an error if `workers` or `requested_width` is zero.
    pub fn new(requested_width: usize, workers: usize) -> Result<Self> {
        let width = padded_width(requested_width, workers)?;
        let fragments = fragments(width, workers)?;
        debug_assert!(fragments.iter().all(|f| f.width() == width / workers));
        Ok(Self {
            requested_width,
            width,
            fragments,
        })
    }

    /// Width the grid must be allocated with.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Width before padding.
    pub fn requested_width(&self) -> usize {
        self.requested_width
    }

    pub fn workers(&self) -> usize {
        self.fragments.len()
    }

    pub fn fragment_width(&self) -> usize {
        self.width / self.fragments.len()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }
}
