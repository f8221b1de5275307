//! Immediate-neighbour patterns for grid filters

/// Pattern of immediate neighbours around a cell (center excluded)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    /// 8 neighbours: edges and diagonals
    Queen,
    /// 4 neighbours: north, south, west, east
    Rook,
}

const QUEEN: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl Neighborhood {
    /// Relative (dr, dc) positions of the neighbours
    pub fn offsets(&self) -> &'static [(isize, isize)] {
        match self {
            Neighborhood::Queen => &QUEEN,
            Neighborhood::Rook => &ROOK,
        }
    }

    /// Iterate the in-bounds neighbours of `(row, col)` in a `rows x cols`
    /// grid, yielding the offset together with the absolute position.
    ///
    /// Border cells simply get fewer neighbours: a Queen corner has 3, a
    /// Queen edge cell 5.
    pub fn around(
        &self,
        rows: usize,
        cols: usize,
        row: usize,
        col: usize,
    ) -> impl Iterator<Item = ((isize, isize), (usize, usize))> {
        self.offsets().iter().filter_map(move |&(dr, dc)| {
            offset_position(rows, cols, row, col, dr, dc).map(|pos| ((dr, dc), pos))
        })
    }
}

/// Absolute position of `(row + dr, col + dc)` if it lies inside the grid
#[inline]
pub fn offset_position(
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
) -> Option<(usize, usize)> {
    let nr = row.checked_add_signed(dr)?;
    let nc = col.checked_add_signed(dc)?;
    (nr < rows && nc < cols).then_some((nr, nc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_counts() {
        let queen = Neighborhood::Queen;
        assert_eq!(queen.around(5, 5, 0, 0).count(), 3);
        assert_eq!(queen.around(5, 5, 0, 2).count(), 5);
        assert_eq!(queen.around(5, 5, 2, 4).count(), 5);
        assert_eq!(queen.around(5, 5, 2, 2).count(), 8);

        let rook = Neighborhood::Rook;
        assert_eq!(rook.around(5, 5, 4, 4).count(), 2);
        assert_eq!(rook.around(5, 5, 4, 2).count(), 3);
        assert_eq!(rook.around(5, 5, 2, 2).count(), 4);
    }

    #[test]
    fn test_single_cell_has_no_neighbors() {
        assert_eq!(Neighborhood::Queen.around(1, 1, 0, 0).count(), 0);
    }

    #[test]
    fn test_offset_position() {
        assert_eq!(offset_position(3, 3, 0, 0, -1, 0), None);
        assert_eq!(offset_position(3, 3, 2, 2, 0, 1), None);
        assert_eq!(offset_position(3, 3, 1, 1, 1, -1), Some((2, 0)));
    }
}
