use crate::{Pattern, Torus};
use anyhow::{anyhow, Result};

/// Double-buffered cell storage of a toroidal world.
///
/// Both buffers are row-major, `width * height` long, and allocated once.
/// `active` selects the buffer holding the current generation; the other
/// one is the write target for the next generation until [`swap`] flips
/// them.
///
/// [`swap`]: WorldGrid::swap
pub struct WorldGrid {
    torus: Torus,
    buffers: [Vec<bool>; 2],
    active: usize,
}

impl WorldGrid {
    /// Creates a grid with every cell dead.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or the area overflows.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let area = Self::checked_area(width, height)?;
        Ok(Self {
            torus: Torus::new(width, height),
            buffers: [vec![false; area], vec![false; area]],
            active: 0,
        })
    }

    /// Wraps an existing row-major buffer as the current generation.
    ///
    /// # Errors
    ///
    /// Returns an error if `cells.len()` is not `width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        let area = Self::checked_area(width, height)?;
        if cells.len() != area {
            return Err(anyhow!(
                "Cell buffer has {} cells, expected {}x{} = {}",
                cells.len(),
                width,
                height,
                area
            ));
        }
        Ok(Self {
            torus: Torus::new(width, height),
            buffers: [cells, vec![false; area]],
            active: 0,
        })
    }

    /// Places `pattern` at the origin of a `width`-wide grid of the pattern's
    /// height. Columns beyond the pattern's width start dead.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is wider than `width` or has a zero
    /// dimension.
    pub fn from_pattern(pattern: &Pattern, width: usize) -> Result<Self> {
        if pattern.width() > width {
            return Err(anyhow!(
                "Pattern width {} exceeds grid width {}",
                pattern.width(),
                width
            ));
        }
        let height = pattern.height();
        let mut cells = vec![false; Self::checked_area(width, height)?];
        if pattern.width() > 0 {
            for (dst, src) in cells
                .chunks_exact_mut(width)
                .zip(pattern.cells().chunks_exact(pattern.width()))
            {
                dst[..src.len()].copy_from_slice(src);
            }
        }
        Self::from_cells(width, height, cells)
    }

    fn checked_area(width: usize, height: usize) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(anyhow!(
                "Grid dimensions must be positive: {}x{}",
                width,
                height
            ));
        }
        width
            .checked_mul(height)
            .ok_or_else(|| anyhow!("Grid {}x{} is too large", width, height))
    }

    pub fn width(&self) -> usize {
        self.torus.width()
    }

    pub fn height(&self) -> usize {
        self.torus.height()
    }

    pub fn torus(&self) -> Torus {
        self.torus
    }

    /// Index of the buffer holding the current generation, `0` or `1`.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Reads a cell of the current generation.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid; wrap coordinates through
    /// [`Torus`] first.
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(
            self.torus.contains(x, y),
            "({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.width(),
            self.height()
        );
        self.buffers[self.active][self.torus.index(x, y)]
    }

    /// Writes a cell of the next generation.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn set_next(&mut self, x: usize, y: usize, alive: bool) {
        assert!(
            self.torus.contains(x, y),
            "({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.width(),
            self.height()
        );
        let idx = self.torus.index(x, y);
        self.buffers[1 - self.active][idx] = alive;
    }

    /// Makes the next generation current.
    pub fn swap(&mut self) {
        self.active = 1 - self.active;
    }

    /// Read-only row-major view of the current generation.
    pub fn current(&self) -> &[bool] {
        &self.buffers[self.active]
    }

    /// Borrows the current generation for reading and the next one for
    /// writing at the same time.
    pub fn split_buffers(&mut self) -> (&[bool], &mut [bool]) {
        let [first, second] = &mut self.buffers;
        if self.active == 0 {
            (first.as_slice(), second.as_mut_slice())
        } else {
            (second.as_slice(), first.as_mut_slice())
        }
    }

    /// Number of live cells in the current generation.
    pub fn population(&self) -> usize {
        self.current().iter().filter(|&&alive| alive).count()
    }

    /// Copies the current generation into a [`Pattern`] of the same size.
    pub fn to_pattern(&self) -> Pattern {
        Pattern::from_cells(self.width(), self.height(), self.current().to_vec())
            .expect("A bug in WorldGrid: buffer size mismatch")
    }
}
