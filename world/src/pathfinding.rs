//! Range-bounded A* search over the four-connected board.

use std::{cmp::Reverse, collections::BinaryHeap};

use grid_tactics_core::CellCoord;

use crate::grid::{neighbors, Grid};

/// Determines how the goal cell is treated during a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathMode {
    /// The goal must be free; used for movement.
    Movement,
    /// The goal may hold a unit; used to check melee reach and to approach enemies.
    Engagement,
}

/// Open-set entry ordered by estimated total cost, then remaining distance,
/// then coordinate so that equal-cost frontiers resolve deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Frontier {
    estimate: u32,
    remaining: u32,
    cell: CellCoord,
}

/// Finds a shortest four-directional path from `start` to `goal`.
///
/// The returned cells exclude `start` and end with `goal`. The path never
/// crosses obstacles or occupied cells (apart from an occupied goal in
/// [`PathMode::Engagement`]) and never exceeds `max_range` steps. An empty
/// vector means no such path exists, or that `start == goal`.
#[must_use]
pub(crate) fn find_path(
    grid: &Grid,
    start: CellCoord,
    goal: CellCoord,
    max_range: u32,
    mode: PathMode,
) -> Vec<CellCoord> {
    if start == goal {
        return Vec::new();
    }
    let (Some(start_index), Some(goal_index)) = (grid.index(start), grid.index(goal)) else {
        return Vec::new();
    };
    if !can_enter(grid, goal, goal, mode) {
        return Vec::new();
    }
    if start.manhattan_distance(goal) > max_range {
        return Vec::new();
    }

    let count = grid.cell_count();
    let mut cost = vec![u32::MAX; count];
    let mut came_from: Vec<Option<usize>> = vec![None; count];
    let mut closed = vec![false; count];
    let mut open = BinaryHeap::new();

    cost[start_index] = 0;
    let remaining = start.manhattan_distance(goal);
    open.push(Reverse(Frontier {
        estimate: remaining,
        remaining,
        cell: start,
    }));

    while let Some(Reverse(current)) = open.pop() {
        let Some(current_index) = grid.index(current.cell) else {
            continue;
        };
        if closed[current_index] {
            continue;
        }
        if current_index == goal_index {
            return reconstruct(grid, &came_from, start_index, goal_index);
        }
        closed[current_index] = true;

        let next_cost = cost[current_index].saturating_add(1);
        if next_cost > max_range {
            continue;
        }

        for neighbor in neighbors(current.cell, grid.columns(), grid.rows()) {
            let Some(neighbor_index) = grid.index(neighbor) else {
                continue;
            };
            if closed[neighbor_index] || !can_enter(grid, neighbor, goal, mode) {
                continue;
            }
            let remaining = neighbor.manhattan_distance(goal);
            if next_cost >= cost[neighbor_index] || next_cost + remaining > max_range {
                continue;
            }
            cost[neighbor_index] = next_cost;
            came_from[neighbor_index] = Some(current_index);
            open.push(Reverse(Frontier {
                estimate: next_cost + remaining,
                remaining,
                cell: neighbor,
            }));
        }
    }

    Vec::new()
}

/// Every free cell the unit at `start` can walk to within `range` steps, in
/// row-major order. The starting cell is excluded.
#[must_use]
pub(crate) fn reachable_cells(grid: &Grid, start: CellCoord, range: u32) -> Vec<CellCoord> {
    grid.coords()
        .filter(|cell| *cell != start && start.manhattan_distance(*cell) <= range)
        .filter(|cell| grid.is_free(*cell))
        .filter(|cell| !find_path(grid, start, *cell, range, PathMode::Movement).is_empty())
        .collect()
}

fn can_enter(grid: &Grid, cell: CellCoord, goal: CellCoord, mode: PathMode) -> bool {
    let Some(slot) = grid.cell_at(cell) else {
        return false;
    };
    if slot.is_obstacle() {
        return false;
    }
    match slot.occupant() {
        None => true,
        Some(_) => mode == PathMode::Engagement && cell == goal,
    }
}

fn reconstruct(
    grid: &Grid,
    came_from: &[Option<usize>],
    start_index: usize,
    goal_index: usize,
) -> Vec<CellCoord> {
    let mut path = Vec::new();
    let mut cursor = goal_index;
    while cursor != start_index {
        let Some(cell) = grid.coord(cursor) else {
            return Vec::new();
        };
        path.push(cell);
        match came_from.get(cursor).copied().flatten() {
            Some(previous) => cursor = previous,
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}
