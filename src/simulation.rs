use crate::{GenerationScheduler, Partition, Pattern, WorldGrid};
use anyhow::{anyhow, Result};

/// Where the first generation comes from.
#[derive(Clone, Debug)]
pub enum InitialState {
    /// Every cell independently alive with probability 1/2.
    Random {
        width: usize,
        height: usize,
        /// Seeds the generator for reproducible runs; `None` seeds from the OS.
        seed: Option<u64>,
    },
    /// A loaded pattern, placed at the origin.
    Pattern(Pattern),
}

impl InitialState {
    fn requested_size(&self) -> (usize, usize) {
        match self {
            Self::Random { width, height, .. } => (*width, *height),
            Self::Pattern(pattern) => (pattern.width(), pattern.height()),
        }
    }
}

/// A running Game of Life: the double-buffered grid, the scheduler that
/// advances it and the number of generations computed so far.
///
/// # Example
///
/// ```rust
/// use torus_life::{InitialState, Simulation};
///
/// let init = InitialState::Random { width: 100, height: 60, seed: Some(7) };
/// let mut simulation = Simulation::new(init, 16).unwrap();
/// // width is padded up to a multiple of the worker count
/// assert_eq!(simulation.grid().width(), 112);
///
/// simulation.advance();
/// assert_eq!(simulation.generation(), 1);
/// ```
pub struct Simulation {
    grid: WorldGrid,
    scheduler: GenerationScheduler,
    generation: u64,
}

impl Simulation {
    /// Validates the configuration, pads the width to a multiple of
    /// `workers` and allocates the grid.
    ///
    /// # Errors
    ///
    /// Returns an error, before allocating anything, if `workers` is zero or
    /// a grid dimension is zero.
    pub fn new(init: InitialState, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(anyhow!("Worker count must be at least 1"));
        }
        let (requested_width, height) = init.requested_size();
        if requested_width == 0 || height == 0 {
            return Err(anyhow!(
                "Grid dimensions must be positive: {}x{}",
                requested_width,
                height
            ));
        }

        let partition = Partition::new(requested_width, workers)?;
        let grid = match &init {
            InitialState::Random { seed, .. } => {
                let pattern = Pattern::random(partition.width(), height, *seed)?;
                WorldGrid::from_pattern(&pattern, partition.width())?
            }
            InitialState::Pattern(pattern) => WorldGrid::from_pattern(pattern, partition.width())?,
        };
        tracing::info!(
            requested_width,
            width = grid.width(),
            height = grid.height(),
            workers,
            fragment_width = partition.fragment_width(),
            "allocated world"
        );

        Ok(Self {
            grid,
            scheduler: GenerationScheduler::new(partition),
            generation: 0,
        })
    }

    /// Computes the next generation, blocking until it is committed.
    pub fn advance(&mut self) {
        self.scheduler.advance(&mut self.grid);
        self.generation += 1;
        tracing::debug!(generation = self.generation, "generation committed");
    }

    /// Read-only view of the current generation.
    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn scheduler(&self) -> &GenerationScheduler {
        &self.scheduler
    }

    /// Number of generations computed since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Snapshot of the current generation, padded columns included.
    pub fn current_state(&self) -> Pattern {
        self.grid.to_pattern()
    }
}
