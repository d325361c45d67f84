#![warn(clippy::all)]

mod grid;
mod neighbors;
mod partition;
mod pattern;
pub mod render;
pub mod rule;
mod scheduler;
mod simulation;
mod topology;

pub use grid::WorldGrid;
pub use neighbors::{count_live_neighbors, NEIGHBOR_OFFSETS};
pub use partition::{fragments, padded_width, Fragment, Partition};
pub use pattern::{Pattern, PatternFormat};
pub use render::FrameView;
pub use scheduler::GenerationScheduler;
pub use simulation::{InitialState, Simulation};
pub use topology::{wrap, Torus};

pub const VERSION: &str = "0.1.0";

/// Worker count used when none is configured.
pub const DEFAULT_WORKERS: usize = 16;
