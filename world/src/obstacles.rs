//! Random obstacle layout that keeps every free cell mutually reachable.

use std::collections::VecDeque;

use grid_tactics_core::CellCoord;
use rand::Rng;

use crate::grid::{coord_in, index_in, neighbors, Grid};

/// Reusable breadth-first flood fill over an obstacle mask.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReachabilityCheck {
    visited: Vec<bool>,
    queue: VecDeque<CellCoord>,
}

impl ReachabilityCheck {
    /// Reports whether every non-obstacle cell is connected to every other one.
    ///
    /// The fill starts from the first free cell in row-major order. A board
    /// without free cells is never considered connected.
    pub(crate) fn all_cells_reachable(&mut self, columns: u32, rows: u32, mask: &[bool]) -> bool {
        let Some(start_index) = mask.iter().position(|obstacle| !obstacle) else {
            return false;
        };
        let Some(start) = coord_in(columns, rows, start_index) else {
            return false;
        };

        if self.visited.len() != mask.len() {
            self.visited = vec![false; mask.len()];
        } else {
            self.visited.fill(false);
        }
        self.queue.clear();

        self.visited[start_index] = true;
        self.queue.push_back(start);
        let mut reached = 1usize;

        while let Some(cell) = self.queue.pop_front() {
            for neighbor in neighbors(cell, columns, rows) {
                let Some(index) = index_in(columns, rows, neighbor) else {
                    continue;
                };
                if mask[index] || self.visited[index] {
                    continue;
                }
                self.visited[index] = true;
                reached += 1;
                self.queue.push_back(neighbor);
            }
        }

        let free = mask.iter().filter(|obstacle| !**obstacle).count();
        reached == free
    }
}

/// Produces an obstacle mask in row-major order.
///
/// Cells are visited once each; a cell becomes an obstacle with probability
/// `probability` unless doing so would split the free cells, in which case it
/// stays free.
pub(crate) fn generate<R>(columns: u32, rows: u32, probability: f32, rng: &mut R) -> Vec<bool>
where
    R: Rng + ?Sized,
{
    let count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
    let mut mask = vec![false; count];
    let mut check = ReachabilityCheck::default();
    let probability = f64::from(probability).clamp(0.0, 1.0);

    for index in 0..count {
        if !rng.gen_bool(probability) {
            continue;
        }
        mask[index] = true;
        if !check.all_cells_reachable(columns, rows, &mask) {
            mask[index] = false;
        }
    }

    mask
}

/// Connectivity check over the live board.
pub(crate) fn grid_is_connected(grid: &Grid) -> bool {
    ReachabilityCheck::default().all_cells_reachable(grid.columns(), grid.rows(), &grid.obstacle_mask())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn wall_splitting_the_board_is_disconnected() {
        let mask = [
            false, true, false, //
            false, true, false, //
            false, true, false,
        ];
        assert!(!ReachabilityCheck::default().all_cells_reachable(3, 3, &mask));
    }

    #[test]
    fn wall_with_gap_is_connected() {
        let mask = [
            false, true, false, //
            false, false, false, //
            false, true, false,
        ];
        assert!(ReachabilityCheck::default().all_cells_reachable(3, 3, &mask));
    }

    #[test]
    fn boards_without_free_cells_are_not_connected() {
        assert!(!ReachabilityCheck::default().all_cells_reachable(2, 1, &[true, true]));
    }

    #[test]
    fn zero_probability_places_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mask = generate(6, 6, 0.0, &mut rng);
        assert!(mask.iter().all(|obstacle| !obstacle));
    }

    #[test]
    fn certain_probability_keeps_the_last_free_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mask = generate(5, 5, 1.0, &mut rng);

        assert_eq!(mask.iter().filter(|obstacle| !**obstacle).count(), 1);
        assert!(!mask[24]);
        assert!(ReachabilityCheck::default().all_cells_reachable(5, 5, &mask));
    }

    #[test]
    fn same_seed_yields_same_layout() {
        let first = generate(12, 9, 0.3, &mut ChaCha8Rng::seed_from_u64(42));
        let second = generate(12, 9, 0.3, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
