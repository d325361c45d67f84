use torus_life::*;

const WIDTH: usize = 1920;
const HEIGHT: usize = 1080;
const GENERATIONS: u32 = 64;
const SEED: u64 = 42;

fn main() {
    let pattern = Pattern::random(WIDTH, HEIGHT, Some(SEED)).unwrap();
    let mut reference = None;

    for workers in [1, 2, 4, 8, 16, 32] {
        let mut simulation = Simulation::new(InitialState::Pattern(pattern.clone()), workers).unwrap();

        let timer = std::time::Instant::now();
        for _ in 0..GENERATIONS {
            simulation.advance();
        }
        let elapsed = timer.elapsed().as_secs_f64();
        println!(
            "workers={:<3} width={} time={:.3} gens/sec={:.1}",
            workers,
            simulation.grid().width(),
            elapsed,
            GENERATIONS as f64 / elapsed
        );

        // WIDTH is a multiple of every worker count, so the results must agree
        let live = simulation.current_state().live_cells();
        let expected = reference.get_or_insert_with(|| live.clone());
        assert_eq!(&live, expected, "workers={} diverged", workers);
    }
}
