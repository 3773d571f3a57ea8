use ndarray::Array2;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, col)` into the board map.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Horizontal position of a cell in half-column steps.
///
/// Every map row sits half a hex below the previous one and even rows are
/// pushed right by half a column, so a hex and the hex two rows below share
/// a visual column.
pub const fn visual_column((row, col): Coord2) -> u16 {
    let shift = if row % 2 == 0 { 1 } else { 0 };
    (col as u16) * 2 + shift
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        let size = (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, size)
    }
}

const EVEN_ROW_DISPLACEMENTS: [(isize, isize); 6] =
    [(-2, 0), (-1, 0), (-1, 1), (1, 0), (1, 1), (2, 0)];

const ODD_ROW_DISPLACEMENTS: [(isize, isize); 6] =
    [(-2, 0), (-1, -1), (-1, 0), (1, -1), (1, 0), (2, 0)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the in-bounds hex neighbors of a cell, at most six.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }

    fn displacements(&self) -> &'static [(isize, isize); 6] {
        if self.center.0 % 2 == 0 {
            &EVEN_ROW_DISPLACEMENTS
        } else {
            &ODD_ROW_DISPLACEMENTS
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let displacements = self.displacements();
        loop {
            if usize::from(self.index) >= displacements.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, displacements[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn neighbors(center: Coord2, bounds: Coord2) -> Vec<Coord2> {
        NeighborIter::new(center, bounds).collect()
    }

    #[test]
    fn interior_even_row_has_six_neighbors() {
        let found = neighbors((4, 1), (11, 4));

        assert_eq!(found, [(2, 1), (3, 1), (3, 2), (5, 1), (5, 2), (6, 1)]);
    }

    #[test]
    fn interior_odd_row_leans_left() {
        let found = neighbors((5, 2), (11, 4));

        assert_eq!(found, [(3, 2), (4, 1), (4, 2), (6, 1), (6, 2), (7, 2)]);
    }

    #[test]
    fn corner_drops_out_of_bounds_neighbors() {
        assert_eq!(neighbors((0, 0), (11, 4)), [(1, 0), (1, 1), (2, 0)]);
        assert_eq!(neighbors((1, 0), (11, 4)), [(0, 0), (2, 0), (3, 0)]);
        assert_eq!(neighbors((10, 3), (11, 4)), [(8, 3), (9, 3)]);
    }

    #[test]
    fn neighbors_are_in_bounds_and_symmetric() {
        let bounds = (9, 5);
        for row in 0..bounds.0 {
            for col in 0..bounds.1 {
                for other in neighbors((row, col), bounds) {
                    assert!(other.0 < bounds.0 && other.1 < bounds.1);
                    assert!(
                        neighbors(other, bounds).contains(&(row, col)),
                        "{other:?} does not see {:?}",
                        (row, col)
                    );
                }
            }
        }
    }

    #[test]
    fn vertical_neighbors_share_visual_column() {
        for center in [(4, 1), (5, 1)] {
            let column = visual_column(center);
            let above = (center.0 - 2, center.1);
            assert!(neighbors(center, (11, 4)).contains(&above));
            assert_eq!(visual_column(above), column);
        }
    }
}
