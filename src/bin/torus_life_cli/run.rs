use crate::util::format_population;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use tokio::time::MissedTickBehavior;
use torus_life::{FrameView, InitialState, Pattern, Simulation, DEFAULT_WORKERS};
use tracing::info;

#[derive(Args, Debug)]
pub(super) struct RunArgs {
    /// Pattern in Extended RLE format (.rle or .rle.gz); random fill when absent
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// The number of worker threads; the grid width is padded to a multiple of it
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Target frame rate; unlimited when absent
    #[arg(long)]
    fps: Option<f64>,

    /// Width of the random grid, default is a 1920 pixel screen at 3 pixels per cell
    #[arg(long, default_value_t = 640)]
    width: usize,

    /// Height of the random grid, default is a 1080 pixel screen at 3 pixels per cell
    #[arg(long, default_value_t = 360)]
    height: usize,

    /// Seed of the random fill; seeds from the OS when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many generations; runs until terminated when absent
    #[arg(short, long)]
    generations: Option<u64>,

    /// Print every frame as text
    #[arg(long)]
    show: bool,

    /// Log the measured generation rate every this many generations, 0 disables it
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Path to the file where the final state will be saved (.rle or .rle.gz)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to the file where the final frame will be saved as a PBM image
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

pub(super) fn run_simulation(args: RunArgs) -> Result<()> {
    let frame_period = match args.fps {
        Some(fps) if !(fps.is_finite() && fps > 0.0) => {
            return Err(anyhow!("Frame rate must be a positive number, got {}", fps));
        }
        Some(fps) => Some(Duration::from_secs_f64(1.0 / fps)),
        None => None,
    };

    let timer = Instant::now();
    let init = match &args.file {
        Some(path) => InitialState::Pattern(Pattern::from_file(path)?),
        None => InitialState::Random {
            width: args.width,
            height: args.height,
            seed: args.seed,
        },
    };
    let mut simulation = Simulation::new(init, args.workers)?;
    info!(
        "Initialized {}x{} world in {:.1} secs",
        simulation.grid().width(),
        simulation.grid().height(),
        timer.elapsed().as_secs_f64()
    );

    let timer = Instant::now();
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to build the frame loop runtime")?
        .block_on(frame_loop(&mut simulation, &args, frame_period));
    info!(
        "Computed {} generations in {:.1} secs",
        simulation.generation(),
        timer.elapsed().as_secs_f64()
    );

    info!(
        "Population: {}",
        format_population(simulation.grid().population())?
    );
    if let Some(path) = &args.output {
        simulation.current_state().to_file(path)?;
        info!("Saved final state to {}", path.display());
    }
    if let Some(path) = &args.snapshot {
        std::fs::write(path, FrameView::new(simulation.grid()).to_pbm())
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        info!("Saved final frame to {}", path.display());
    }
    Ok(())
}

async fn frame_loop(simulation: &mut Simulation, args: &RunArgs, frame_period: Option<Duration>) {
    let mut ticker = frame_period.map(|period| {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    let mut window = Instant::now();

    while !matches!(args.generations, Some(limit) if simulation.generation() >= limit) {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }
        if args.show {
            println!("{}", FrameView::new(simulation.grid()).to_text('#', '.'));
        }
        simulation.advance();

        if args.report_every > 0 && simulation.generation() % args.report_every == 0 {
            info!(
                generation = simulation.generation(),
                "{:.1} generations per second",
                args.report_every as f64 / window.elapsed().as_secs_f64()
            );
            window = Instant::now();
        }
    }
}
