#[cfg(test)]
mod tests {
    use ahash::AHashSet;
    use torus_life::*;

    const SEED: u64 = 42;
    const GLIDER: &[u8] = b"x = 3, y = 3, rule = B3/S23\nbo$2bo$3o!";

    fn pattern_with(width: usize, height: usize, live: &[(usize, usize)]) -> Pattern {
        let mut cells = vec![false; width * height];
        for &(x, y) in live {
            cells[width * y + x] = true;
        }
        Pattern::from_cells(width, height, cells).unwrap()
    }

    fn simulation_with(
        width: usize,
        height: usize,
        live: &[(usize, usize)],
        workers: usize,
    ) -> Simulation {
        let pattern = pattern_with(width, height, live);
        Simulation::new(InitialState::Pattern(pattern), workers).unwrap()
    }

    fn live_cells(simulation: &Simulation) -> AHashSet<(usize, usize)> {
        simulation.current_state().live_cells()
    }

    fn shifted(
        cells: &AHashSet<(usize, usize)>,
        dx: isize,
        dy: isize,
        torus: Torus,
    ) -> AHashSet<(usize, usize)> {
        cells
            .iter()
            .map(|&(x, y)| {
                (
                    torus.wrap_x(x as isize + dx),
                    torus.wrap_y(y as isize + dy),
                )
            })
            .collect()
    }

    /// Set-based stepper on a torus, independent of the engine's buffers.
    fn step_naive(cells: &AHashSet<(usize, usize)>, torus: Torus) -> AHashSet<(usize, usize)> {
        let mut next = AHashSet::new();
        for y in 0..torus.height() {
            for x in 0..torus.width() {
                let mut neighbors = 0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = torus.wrap_x(x as isize + dx);
                        let ny = torus.wrap_y(y as isize + dy);
                        if cells.contains(&(nx, ny)) {
                            neighbors += 1;
                        }
                    }
                }
                let alive = cells.contains(&(x, y));
                if (alive && (neighbors == 2 || neighbors == 3)) || (!alive && neighbors == 3) {
                    next.insert((x, y));
                }
            }
        }
        next
    }

    #[test]
    fn test_neighbor_counting_is_toroidal() {
        let (w, h) = (12, 9);
        let simulation = simulation_with(w, h, &[(w - 1, h - 1)], 4);
        let grid = simulation.grid();
        assert_eq!(count_live_neighbors(grid.current(), grid.torus(), 0, 0), 1);
    }

    #[test]
    fn test_birth_in_l_shape() {
        // every cell of a 3x3 torus neighbours all the others
        let mut simulation = simulation_with(3, 3, &[(0, 0), (1, 0), (0, 1)], 1);
        assert!(!simulation.grid().get(1, 1));
        simulation.advance();
        assert!(simulation.grid().get(1, 1));
        assert!(simulation.grid().get(0, 0));
    }

    #[test]
    fn test_underpopulation() {
        let mut simulation = simulation_with(8, 8, &[(1, 1), (5, 5), (6, 5)], 2);
        simulation.advance();
        assert_eq!(simulation.grid().population(), 0);
    }

    #[test]
    fn test_block_is_still_life() {
        let block = [(3, 3), (4, 3), (3, 4), (4, 4)];
        for workers in [1, 2, 4, 8] {
            let mut simulation = simulation_with(8, 8, &block, workers);
            let initial = live_cells(&simulation);
            for _ in 0..3 {
                simulation.advance();
                assert_eq!(live_cells(&simulation), initial, "workers={}", workers);
            }
        }
    }

    #[test]
    fn test_block_across_corner_is_still_life() {
        let block = [(7, 7), (0, 7), (7, 0), (0, 0)];
        let mut simulation = simulation_with(8, 8, &block, 4);
        let initial = live_cells(&simulation);
        simulation.advance();
        assert_eq!(live_cells(&simulation), initial);
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = [(1, 2), (2, 2), (3, 2)];
        let vertical: AHashSet<_> = [(2, 1), (2, 2), (2, 3)].into_iter().collect();
        let mut simulation = simulation_with(6, 6, &horizontal, 3);
        let initial = live_cells(&simulation);
        simulation.advance();
        assert_eq!(live_cells(&simulation), vertical);
        simulation.advance();
        assert_eq!(live_cells(&simulation), initial);
    }

    #[test]
    fn test_glider_translates() {
        let glider = Pattern::from_format(PatternFormat::RLE, GLIDER).unwrap();
        let cells: Vec<_> = glider.live_cells().into_iter().collect();
        for workers in [1, 4, 16] {
            let mut simulation = simulation_with(16, 16, &cells, workers);
            let torus = simulation.grid().torus();
            let initial = live_cells(&simulation);
            for _ in 0..4 {
                simulation.advance();
            }
            assert_eq!(live_cells(&simulation), shifted(&initial, 1, 1, torus));
        }
    }

    #[test]
    fn test_glider_wraps_around() {
        // 64 generations move the glider by (16, 16): a full lap of the torus
        let glider = Pattern::from_format(PatternFormat::RLE, GLIDER).unwrap();
        let cells: Vec<_> = glider.live_cells().into_iter().collect();
        let mut simulation = simulation_with(16, 16, &cells, 8);
        let initial = live_cells(&simulation);
        for generation in 1..=64 {
            simulation.advance();
            assert_eq!(simulation.grid().population(), 5, "generation {}", generation);
        }
        assert_eq!(live_cells(&simulation), initial);
    }

    #[test]
    fn test_same_result_for_any_worker_count() {
        let pattern = Pattern::random(48, 40, Some(SEED)).unwrap();
        let run = |workers: usize| {
            let mut simulation =
                Simulation::new(InitialState::Pattern(pattern.clone()), workers).unwrap();
            assert_eq!(simulation.grid().width(), 48);
            simulation.advance();
            let after_one = simulation.grid().current().to_vec();
            for _ in 0..9 {
                simulation.advance();
            }
            (after_one, simulation.grid().current().to_vec())
        };

        let single = run(1);
        for workers in [2, 3, 16] {
            assert_eq!(run(workers), single, "workers={}", workers);
        }
    }

    #[test]
    fn test_matches_naive_stepper() {
        let pattern = Pattern::random(30, 20, Some(SEED)).unwrap();
        let mut simulation = Simulation::new(InitialState::Pattern(pattern), 7).unwrap();
        let torus = simulation.grid().torus();
        assert_eq!(torus.width(), 35);

        let mut expected = live_cells(&simulation);
        for generation in 1..=20 {
            simulation.advance();
            expected = step_naive(&expected, torus);
            assert_eq!(live_cells(&simulation), expected, "generation {}", generation);
        }
    }

    #[test]
    fn test_rle_roundtrip_through_grid() {
        let data = b"#C two gliders\nx = 10, y = 6, rule = B3/S23\nbo$2bo$3o2$7b2o$7b2o!";
        let pattern = Pattern::from_format(PatternFormat::RLE, data).unwrap();
        let expected: AHashSet<_> = [
            (1, 0),
            (2, 1),
            (0, 2),
            (1, 2),
            (2, 2),
            (7, 4),
            (8, 4),
            (7, 5),
            (8, 5),
        ]
        .into_iter()
        .collect();
        assert_eq!(pattern.live_cells(), expected);

        let simulation = Simulation::new(InitialState::Pattern(pattern), 4).unwrap();
        assert_eq!(simulation.grid().width(), 12);
        assert_eq!(live_cells(&simulation), expected);

        let saved = simulation.current_state().to_format(PatternFormat::RLE).unwrap();
        let reloaded = Pattern::from_format(PatternFormat::RLE, &saved).unwrap();
        assert_eq!(reloaded.live_cells(), expected);
    }

    #[test]
    fn test_partition_of_simulation() {
        for workers in [1, 2, 3, 7, 16] {
            let init = InitialState::Random {
                width: 100,
                height: 5,
                seed: Some(SEED),
            };
            let simulation = Simulation::new(init, workers).unwrap();
            let partition = simulation.scheduler().partition();
            let width = simulation.grid().width();
            assert_eq!(width % workers, 0);
            assert!(width >= 100 && width < 100 + workers);

            let mut covered = vec![false; width];
            for fragment in partition.fragments() {
                for x in fragment.columns() {
                    assert!(!covered[x], "column {} covered twice", x);
                    covered[x] = true;
                }
            }
            assert!(covered.into_iter().all(|c| c));
        }
    }
}
