use crate::util::format_population;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use torus_life::{padded_width, Pattern, DEFAULT_WORKERS};

#[derive(Args, Debug)]
pub(super) struct StatsArgs {
    /// Path to the file containing the pattern; supports .rle and .rle.gz formats
    pattern: PathBuf,

    /// Worker count used to report the padded grid width
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,
}

pub(super) fn run_stats(args: StatsArgs) -> Result<()> {
    let timer = std::time::Instant::now();
    let pattern = Pattern::from_file(&args.pattern)?;
    println!("Size: {}x{}", pattern.width(), pattern.height());
    if pattern.width() > 0 {
        println!(
            "Padded width for {} workers: {}",
            args.workers,
            padded_width(pattern.width(), args.workers)?
        );
    }

    let population = pattern.population();
    println!("Population: {}", format_population(population)?);
    let area = pattern.width() * pattern.height();
    if area > 0 {
        println!("Density: {:.2}%", population as f64 * 100.0 / area as f64);
    }
    print_bounding_box(&pattern);
    println!(
        "Computed stats in {:.1} secs",
        timer.elapsed().as_secs_f64()
    );
    Ok(())
}

fn print_bounding_box(pattern: &Pattern) {
    let live = pattern.live_cells();
    let (Some(min_x), Some(max_x)) = (
        live.iter().map(|&(x, _)| x).min(),
        live.iter().map(|&(x, _)| x).max(),
    ) else {
        println!("Bounding box: empty");
        return;
    };
    let min_y = live.iter().map(|&(_, y)| y).min().unwrap_or(0);
    let max_y = live.iter().map(|&(_, y)| y).max().unwrap_or(0);
    println!(
        "Bounding box: ({}, {})..=({}, {}), {}x{}",
        min_x,
        min_y,
        max_x,
        max_y,
        max_x - min_x + 1,
        max_y - min_y + 1
    );
}
