use crate::{neighbors::count_live_neighbors, rule, Fragment, Partition, Torus, WorldGrid};

/// Fork-join driver of generation updates.
///
/// Every call to [`advance`] spawns one scoped thread per fragment of the
/// partition and joins all of them before flipping the grid's buffers, so
/// no thread outlives the generation it computes.
///
/// Workers share the current buffer read-only. The next buffer is split
/// into per-fragment row segments up front, so each worker holds mutable
/// access to its own columns only and no locking is involved.
///
/// [`advance`]: GenerationScheduler::advance
#[derive(Clone, Debug)]
pub struct GenerationScheduler {
    partition: Partition,
}

impl GenerationScheduler {
    pub fn new(partition: Partition) -> Self {
        Self { partition }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn workers(&self) -> usize {
        self.partition.workers()
    }

    /// Computes the next generation of `grid` and makes it current.
    ///
    /// Blocks until every worker has finished; readers of `grid` only ever
    /// observe fully computed generations.
    ///
    /// # Panics
    ///
    /// Panics if the grid width differs from the partitioned width, or if a
    /// worker panics.
    pub fn advance(&self, grid: &mut WorldGrid) {
        assert_eq!(
            grid.width(),
            self.partition.width(),
            "Grid width does not match the partition"
        );
        let torus = grid.torus();
        let (current, next) = grid.split_buffers();
        let writers = FragmentWriter::split(next, torus, self.partition.fragments());

        std::thread::scope(|s| {
            for mut writer in writers {
                s.spawn(move || writer.update(current, torus));
            }
        });

        grid.swap();
    }
}

/// Exclusive write access to one fragment of the next buffer: one row
/// segment per grid row, each `fragment.width()` cells long.
struct FragmentWriter<'a> {
    fragment: Fragment,
    rows: Vec<&'a mut [bool]>,
}

impl<'a> FragmentWriter<'a> {
    fn split(next: &'a mut [bool], torus: Torus, fragments: &[Fragment]) -> Vec<Self> {
        let mut writers: Vec<Self> = fragments
            .iter()
            .map(|&fragment| Self {
                fragment,
                rows: Vec::with_capacity(torus.height()),
            })
            .collect();

        for row in next.chunks_exact_mut(torus.width()) {
            let mut rest = row;
            for writer in writers.iter_mut() {
                let (segment, tail) =
                    std::mem::take(&mut rest).split_at_mut(writer.fragment.width());
                writer.rows.push(segment);
                rest = tail;
            }
            debug_assert!(rest.is_empty(), "fragments must cover the row");
        }
        writers
    }

    fn update(&mut self, current: &[bool], torus: Torus) {
        let start = self.fragment.start();
        for (y, row) in self.rows.iter_mut().enumerate() {
            for (dx, cell) in row.iter_mut().enumerate() {
                let x = start + dx;
                let alive = current[torus.index(x, y)];
                *cell = rule::next_state(alive, count_live_neighbors(current, torus, x, y));
            }
        }
    }
}
