use crate::Torus;

/// The eight compass offsets around a cell, `(0, 0)` excluded.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Counts live cells among the 8 toroidal neighbours of `(x, y)`.
///
/// `cells` is a row-major buffer laid out on `torus`. Cells away from the
/// bounds are counted directly; the rest go through [`Torus::offset_index`].
#[inline]
pub fn count_live_neighbors(cells: &[bool], torus: Torus, x: usize, y: usize) -> u8 {
    debug_assert_eq!(cells.len(), torus.area());
    let (w, h) = (torus.width(), torus.height());

    if x > 0 && x + 1 < w && y > 0 && y + 1 < h {
        let above = torus.index(x - 1, y - 1);
        let row = above + w;
        let below = row + w;
        return [
            cells[above],
            cells[above + 1],
            cells[above + 2],
            cells[row],
            cells[row + 2],
            cells[below],
            cells[below + 1],
            cells[below + 2],
        ]
        .into_iter()
        .filter(|&alive| alive)
        .count() as u8;
    }

    NEIGHBOR_OFFSETS
        .iter()
        .filter(|&&(dx, dy)| cells[torus.offset_index(x, y, dx, dy)])
        .count() as u8
}
