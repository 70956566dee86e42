use std::collections::VecDeque;

use grid_tactics_core::{CellCoord, MatchConfig};
use grid_tactics_world::{query, Grid, PathMode, World};
use proptest::prelude::*;

fn board(columns: u32, rows: u32, probability: f32, seed: u64) -> Option<World> {
    World::new(MatchConfig {
        columns,
        rows,
        obstacle_probability: probability,
        seed,
        ..MatchConfig::default()
    })
    .ok()
}

/// Unbounded breadth-first step count between two free cells.
fn shortest_distance(grid: &Grid, start: CellCoord, goal: CellCoord) -> Option<u32> {
    let mut distances = vec![None; grid.cell_count()];
    let index = |cell: CellCoord| {
        usize::try_from(cell.row() * grid.columns() + cell.column()).expect("index fits")
    };
    let mut queue = VecDeque::from([start]);
    distances[index(start)] = Some(0u32);

    while let Some(cell) = queue.pop_front() {
        let distance = distances[index(cell)].expect("visited");
        if cell == goal {
            return Some(distance);
        }
        let column = cell.column();
        let row = cell.row();
        let candidates = [
            row.checked_sub(1).map(|row| CellCoord::new(column, row)),
            Some(CellCoord::new(column + 1, row)),
            Some(CellCoord::new(column, row + 1)),
            column.checked_sub(1).map(|column| CellCoord::new(column, row)),
        ];
        for next in candidates.into_iter().flatten() {
            if !grid.is_free(next) || distances[index(next)].is_some() {
                continue;
            }
            distances[index(next)] = Some(distance + 1);
            queue.push_back(next);
        }
    }
    None
}

proptest! {
    #[test]
    fn generated_boards_stay_connected(
        columns in 4u32..16,
        rows in 4u32..16,
        probability in 0.0f32..0.6,
        seed in any::<u64>(),
    ) {
        let world = board(columns, rows, probability, seed);
        prop_assume!(world.is_some());
        let world = world.expect("assumed");
        prop_assert!(query::all_cells_reachable(&world));
    }

    #[test]
    fn paths_are_shortest_contiguous_and_clear(
        seed in any::<u64>(),
        start_pick in any::<prop::sample::Index>(),
        goal_pick in any::<prop::sample::Index>(),
        range in 1u32..14,
    ) {
        let world = board(10, 10, 0.3, seed);
        prop_assume!(world.is_some());
        let world = world.expect("assumed");
        let grid = query::grid(&world);
        let free: Vec<CellCoord> = grid.empty_cells().collect();
        let start = free[start_pick.index(free.len())];
        let goal = free[goal_pick.index(free.len())];
        prop_assume!(start != goal);

        let path = query::find_path(&world, start, goal, range, PathMode::Movement);
        let shortest = shortest_distance(grid, start, goal);

        match shortest {
            Some(distance) if distance <= range => {
                prop_assert_eq!(u32::try_from(path.len()).expect("len fits"), distance);
                prop_assert_eq!(path.last().copied(), Some(goal));
                prop_assert!(!path.contains(&start));
                let mut previous = start;
                for step in &path {
                    prop_assert!(previous.is_adjacent(*step));
                    prop_assert!(grid.is_free(*step));
                    previous = *step;
                }
            }
            _ => prop_assert!(path.is_empty()),
        }
    }
}
