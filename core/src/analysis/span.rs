use alloc::collections::{BTreeSet, VecDeque};

use crate::*;

/// Whether the `colour` region containing `start` touches both of the edges
/// `orientation` asks for.
///
/// Breadth-first over same-colour neighbors; each cell is visited once, so
/// loops in the claimed region cannot stall the search.
pub fn has_won(
    grid: &HexGrid,
    registry: &ClaimRegistry,
    start: Coord2,
    colour: Colour,
    orientation: Orientation,
) -> bool {
    if registry.colour_at(start) != Some(colour) {
        return false;
    }

    let (first, second) = orientation.edges();
    let target = first | second;
    let mut touched = Edges::empty();

    let mut visited = BTreeSet::from([start]);
    let mut to_visit = VecDeque::from([start]);

    while let Some(coords) = to_visit.pop_front() {
        touched |= grid.edges_at(coords) & target;
        if touched.contains(target) {
            return true;
        }

        for next in grid.neighbors(coords) {
            if registry.colour_at(next) == Some(colour) && visited.insert(next) {
                to_visit.push_back(next);
            }
        }
    }

    false
}

/// Every cell of `colour` reachable from `start`, `start` included.
pub fn connected_component(
    grid: &HexGrid,
    registry: &ClaimRegistry,
    start: Coord2,
) -> BTreeSet<Coord2> {
    let Some(colour) = registry.colour_at(start) else {
        return BTreeSet::new();
    };

    let mut visited = BTreeSet::from([start]);
    let mut to_visit = VecDeque::from([start]);

    while let Some(coords) = to_visit.pop_front() {
        for next in grid.neighbors(coords) {
            if registry.colour_at(next) == Some(colour) && visited.insert(next) {
                to_visit.push_back(next);
            }
        }
    }

    visited
}

/// Whether any `colour` region spans the board in the given orientation.
pub fn spans_board(
    grid: &HexGrid,
    registry: &ClaimRegistry,
    colour: Colour,
    orientation: Orientation,
) -> bool {
    let (first, _) = orientation.edges();
    registry
        .claims_of(colour)
        .filter(|&coords| grid.edges_at(coords).contains(first))
        .any(|coords| has_won(grid, registry, coords, colour, orientation))
}
