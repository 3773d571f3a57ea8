use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Tile id of a claimable board cell in the map resource.
pub const PLAYABLE_TILE_ID: u8 = 1;

/// What a map entry holds, decoded from its tile id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Unused,
    Playable,
    /// Border or decoration; the id selects the sprite.
    Border(u8),
}

impl TileKind {
    pub fn from_id(id: u32) -> Result<Self> {
        let id = u8::try_from(id).map_err(|_| GameError::InvalidTileId)?;
        Ok(match id {
            0 => Self::Unused,
            PLAYABLE_TILE_ID => Self::Playable,
            other => Self::Border(other),
        })
    }

    pub const fn id(self) -> u8 {
        match self {
            Self::Unused => 0,
            Self::Playable => PLAYABLE_TILE_ID,
            Self::Border(id) => id,
        }
    }

    pub const fn is_playable(self) -> bool {
        matches!(self, Self::Playable)
    }
}

impl Default for TileKind {
    fn default() -> Self {
        Self::Unused
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    White,
    Blue,
    Red,
    Green,
    Gold,
}

impl Colour {
    pub const ALL: [Colour; 5] = [
        Colour::White,
        Colour::Blue,
        Colour::Red,
        Colour::Green,
        Colour::Gold,
    ];
}

/// Ownership marker of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Unset,
    Claimed(Colour),
    /// Chances ran out; the cell is spent without an owner.
    Forfeited,
}

impl Owner {
    pub const fn is_unset(self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl Default for Owner {
    fn default() -> Self {
        Self::Unset
    }
}

/// Player-visible state of a board position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub tile: TileKind,
    pub letter: Option<char>,
    pub owner: Owner,
}
