use cosweep_core::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::{HashSet, VecDeque};

fn config_strategy() -> impl Strategy<Value = GameConfig> {
    (1u8..=20, 1u8..=20)
        .prop_filter("needs room for a mine and a safe cell", |&(w, h)| {
            mult(w, h) >= 2
        })
        .prop_flat_map(|(w, h)| {
            (1..mult(w, h)).prop_map(move |mines| GameConfig::new((w, h), mines).unwrap())
        })
}

fn generate(config: &GameConfig, seed: u64) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    RandomBoardGenerator::new(&mut rng).generate(config)
}

/// Mine count around `(x, y)` by scanning the full 3x3 window.
fn brute_force_count(board: &Board, (x, y): Coord2) -> u8 {
    let (w, h) = board.size();
    let mut count = 0;
    for nx in x.saturating_sub(1)..=x.saturating_add(1) {
        for ny in y.saturating_sub(1)..=y.saturating_add(1) {
            if (nx, ny) == (x, y) || nx >= w || ny >= h {
                continue;
            }
            if board[(nx, ny)].is_mine() {
                count += 1;
            }
        }
    }
    count
}

/// Cells a cascade from `start` must open: the connected zero region plus its numbered border.
fn expected_cascade(board: &Board, start: Coord2) -> HashSet<Coord2> {
    let mut region = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(coords) = queue.pop_front() {
        if !board[coords].value().is_zero() {
            continue;
        }
        for pos in board.neighbors(coords) {
            if !board[pos].is_mine() && region.insert(pos) {
                queue.push_back(pos);
            }
        }
    }
    region
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_boards_are_consistent(config in config_strategy(), seed in any::<u64>()) {
        let board = generate(&config, seed);

        prop_assert_eq!(board.size(), config.size);
        prop_assert_eq!(board.mine_count(), config.mines);
        prop_assert_eq!(board.mine_coords().count(), config.mines as usize);

        for (coords, cell) in board.iter() {
            prop_assert_eq!(cell.state(), CellState::Closed);
            if !cell.is_mine() {
                prop_assert_eq!(cell.value(), CellValue::Count(brute_force_count(&board, coords)));
            }
        }
    }

    #[test]
    fn cascade_opens_exactly_the_zero_region(config in config_strategy(), seed in any::<u64>(), pick in any::<prop::sample::Index>()) {
        let board = generate(&config, seed);
        let safe: Vec<Coord2> = board
            .iter()
            .filter(|(_, cell)| !cell.is_mine())
            .map(|(coords, _)| coords)
            .collect();
        let start = *pick.get(&safe);
        let expected = expected_cascade(&board, start);

        let mut field = Field::new(board);
        let reveal = field.open(start);

        let opened: HashSet<Coord2> = reveal.diff.iter().map(CellDiff::coords).collect();
        prop_assert_eq!(opened.len(), reveal.diff.len());
        prop_assert_eq!(&opened, &expected);
        for (coords, cell) in field.board().iter() {
            let should_be_open = expected.contains(&coords);
            prop_assert_eq!(cell.state() == CellState::Opened, should_be_open);
        }
        prop_assert_eq!(field.opened_count() as usize, expected.len());
    }

    #[test]
    fn any_mine_discloses_every_mine(config in config_strategy(), seed in any::<u64>(), pick in any::<prop::sample::Index>()) {
        let board = generate(&config, seed);
        let mines: Vec<Coord2> = board.mine_coords().collect();
        let start = *pick.get(&mines);

        let mut field = Field::new(board);
        let reveal = field.open(start);

        prop_assert_eq!(reveal.outcome, RevealOutcome::HitMine);
        prop_assert_eq!(reveal.diff.len(), mines.len());
        prop_assert_eq!(reveal.diff[0].coords(), start);
        for (_, cell) in field.board().iter() {
            prop_assert_eq!(cell.state() == CellState::Opened, cell.is_mine());
        }
    }

    #[test]
    fn counters_partition_the_board(config in config_strategy(), seed in any::<u64>(), moves in prop::collection::vec((any::<bool>(), any::<prop::sample::Index>()), 0..40)) {
        let board = generate(&config, seed);
        let cells: Vec<Coord2> = board.iter().map(|(coords, _)| coords).collect();
        let mut engine = GameEngine::with_board(config, board, ManualScheduler::new(), SmallRng::seed_from_u64(seed)).unwrap();

        for (is_flag, index) in moves {
            let coords = *index.get(&cells);
            if is_flag {
                engine.flag(coords);
            } else {
                engine.open(coords);
            }

            let board = engine.field().board();
            let flagged = board.iter().filter(|(_, c)| c.state() == CellState::Flagged).count();
            let opened = board.iter().filter(|(_, c)| c.state() == CellState::Opened).count();
            let closed = board.iter().filter(|(_, c)| c.state() == CellState::Closed).count();
            prop_assert_eq!(engine.flags_count() as usize, flagged);
            prop_assert_eq!(engine.opened_count() as usize, opened);
            prop_assert_eq!(opened + flagged + closed, board.total_cells() as usize);
        }
    }
}
