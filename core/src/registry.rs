use alloc::collections::{BTreeMap, BTreeSet};

use crate::*;

/// Who holds which cell on the current board.
///
/// A position is recorded at most once, either claimed for a colour or
/// forfeited. Only [`ClaimRegistry::clear`] (a board reset) releases it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimRegistry {
    claimed: BTreeMap<Coord2, Colour>,
    forfeited: BTreeSet<Coord2>,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, coords: Coord2, colour: Colour) -> Result<()> {
        self.check_unset(coords)?;
        self.claimed.insert(coords, colour);
        Ok(())
    }

    pub fn forfeit(&mut self, coords: Coord2) -> Result<()> {
        self.check_unset(coords)?;
        self.forfeited.insert(coords);
        Ok(())
    }

    pub fn owner(&self, coords: Coord2) -> Owner {
        if let Some(&colour) = self.claimed.get(&coords) {
            Owner::Claimed(colour)
        } else if self.forfeited.contains(&coords) {
            Owner::Forfeited
        } else {
            Owner::Unset
        }
    }

    pub fn colour_at(&self, coords: Coord2) -> Option<Colour> {
        self.claimed.get(&coords).copied()
    }

    pub fn is_unset(&self, coords: Coord2) -> bool {
        self.owner(coords).is_unset()
    }

    pub fn claims(&self) -> impl Iterator<Item = (Coord2, Colour)> + '_ {
        self.claimed.iter().map(|(&coords, &colour)| (coords, colour))
    }

    pub fn claims_of(&self, colour: Colour) -> impl Iterator<Item = Coord2> + '_ {
        self.claims()
            .filter(move |&(_, owner)| owner == colour)
            .map(|(coords, _)| coords)
    }

    pub fn forfeits(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.forfeited.iter().copied()
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    pub fn clear(&mut self) {
        self.claimed.clear();
        self.forfeited.clear();
    }

    fn check_unset(&self, coords: Coord2) -> Result<()> {
        if self.is_unset(coords) {
            Ok(())
        } else {
            Err(GameError::AlreadyClaimed)
        }
    }
}
