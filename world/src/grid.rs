//! Dense board storage shared by every other world component.

use glam::Vec2;
use grid_tactics_core::{CellCoord, UnitId};
use rand::Rng;

/// State of a single board square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    obstacle: bool,
    occupant: Option<UnitId>,
}

impl Cell {
    /// Reports whether the cell holds an obstacle.
    #[must_use]
    pub const fn is_obstacle(&self) -> bool {
        self.obstacle
    }

    /// Unit standing on the cell, if any. The cell never owns the unit.
    #[must_use]
    pub const fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    /// Reports whether a unit may enter or be placed on the cell.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        !self.obstacle && self.occupant.is_none()
    }
}

/// Fixed-size board of cells stored in row-major order.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cell_size,
            cells: vec![Cell::default(); capacity],
        }
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of a cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the coordinate lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the cell at the coordinate, or `None` when out of bounds.
    #[must_use]
    pub fn cell_at(&self, cell: CellCoord) -> Option<&Cell> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// True if the cell is out of bounds, an obstacle, or occupied.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        self.cell_at(cell).map_or(true, |slot| !slot.is_free())
    }

    /// True if the cell is on the board, not an obstacle and not occupied.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        !self.is_blocked(cell)
    }

    /// Reports whether the cell holds an obstacle. Out-of-bounds cells do not.
    #[must_use]
    pub fn is_obstacle(&self, cell: CellCoord) -> bool {
        self.cell_at(cell).is_some_and(Cell::is_obstacle)
    }

    /// Unit standing on the cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<UnitId> {
        self.cell_at(cell).and_then(Cell::occupant)
    }

    /// Iterator over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    /// Iterator over every free cell in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.coords().filter(|cell| self.is_free(*cell))
    }

    /// Uniformly samples a free cell, or returns `None` when the board is full.
    pub fn find_random_empty_cell<R>(&self, rng: &mut R) -> Option<CellCoord>
    where
        R: Rng + ?Sized,
    {
        let candidates: Vec<CellCoord> = self.empty_cells().collect();
        if candidates.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..candidates.len());
        candidates.get(index).copied()
    }

    /// World-space position of the cell's origin corner.
    #[must_use]
    pub fn world_position(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_size,
            cell.row() as f32 * self.cell_size,
        )
    }

    /// Cell whose origin lies nearest to the world-space position.
    #[must_use]
    pub fn cell_at_world_position(&self, position: Vec2) -> Option<CellCoord> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let scaled = (position / self.cell_size).round();
        if scaled.x < 0.0 || scaled.y < 0.0 {
            return None;
        }
        let cell = CellCoord::new(scaled.x as u32, scaled.y as u32);
        self.contains(cell).then_some(cell)
    }

    /// Copies out the obstacle flags in row-major order.
    #[must_use]
    pub fn obstacle_mask(&self) -> Vec<bool> {
        self.cells.iter().map(Cell::is_obstacle).collect()
    }

    pub(crate) fn set_occupant(&mut self, cell: CellCoord, occupant: Option<UnitId>) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            slot.occupant = occupant;
        }
    }

    pub(crate) fn set_obstacle(&mut self, cell: CellCoord, obstacle: bool) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            slot.obstacle = obstacle;
        }
    }

    pub(crate) fn apply_obstacle_mask(&mut self, mask: &[bool]) {
        for (slot, obstacle) in self.cells.iter_mut().zip(mask.iter().copied()) {
            slot.obstacle = obstacle;
        }
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        index_in(self.columns, self.rows, cell)
    }

    pub(crate) fn coord(&self, index: usize) -> Option<CellCoord> {
        coord_in(self.columns, self.rows, index)
    }
}

pub(crate) fn index_in(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() >= columns || cell.row() >= rows {
        return None;
    }
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    let width = usize::try_from(columns).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

pub(crate) fn coord_in(columns: u32, rows: u32, index: usize) -> Option<CellCoord> {
    let width = usize::try_from(columns).ok()?;
    if width == 0 {
        return None;
    }
    let column = u32::try_from(index % width).ok()?;
    let row = u32::try_from(index / width).ok()?;
    (row < rows).then_some(CellCoord::new(column, row))
}

/// Four-directional neighbours that lie on a `columns` x `rows` board.
pub(crate) fn neighbors(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < columns {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < rows {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}
