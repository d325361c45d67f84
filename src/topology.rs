/// Maps any integer onto `[0, modulus)` using mathematical modulo,
/// so `-1` lands on `modulus - 1` rather than staying negative.
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[inline]
pub fn wrap(value: isize, modulus: usize) -> usize {
    assert!(modulus > 0, "wrap modulus must be positive");
    value.rem_euclid(modulus as isize) as usize
}

/// Coordinate space of a field whose opposite bounds are stitched together.
///
/// Wrapping is always performed against the true field dimensions, so the
/// last row and the last column are distinct from the first ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Torus {
    width: usize,
    height: usize,
}

impl Torus {
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "Torus dimensions must be positive: {}x{}",
            width,
            height
        );
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells on the torus.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn wrap_x(&self, x: isize) -> usize {
        wrap(x, self.width)
    }

    #[inline]
    pub fn wrap_y(&self, y: isize) -> usize {
        wrap(y, self.height)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Row-major index of an in-range cell.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.contains(x, y), "({}, {}) is off the torus", x, y);
        self.width * y + x
    }

    /// Index of the cell at `(x + dx, y + dy)` after wrapping both axes.
    #[inline]
    pub fn offset_index(&self, x: usize, y: usize, dx: isize, dy: isize) -> usize {
        let x = self.wrap_x(x as isize + dx);
        let y = self.wrap_y(y as isize + dy);
        self.index(x, y)
    }
}
