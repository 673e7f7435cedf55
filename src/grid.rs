use crate::tile::Coordinate;

/// Fixed grid bounds in tiles.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub rows: u16,
    pub cols: u16,
}

impl GridSize {
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }

    /// Returns true when `coord` lies inside the grid.
    #[must_use]
    pub fn contains(self, coord: Coordinate) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && coord.row < i32::from(self.rows)
            && coord.col < i32::from(self.cols)
    }

    /// Iterates every coordinate in row-major order.
    pub fn coordinates(self) -> impl Iterator<Item = Coordinate> {
        let cols = i32::from(self.cols);
        (0..i32::from(self.rows))
            .flat_map(move |row| (0..cols).map(move |col| Coordinate::new(row, col)))
    }
}
