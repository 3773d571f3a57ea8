use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Display;

use bitflags::bitflags;
use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// The classic board: five visual columns of four hexes inside a border.
pub const STANDARD_MAP: &str = "\
3 3 3 0
2 3 3 2
1 1 1 0
2 1 1 2
1 1 1 0
2 1 1 2
1 1 1 0
2 1 1 2
1 1 1 0
2 1 1 2
3 3 3 0
";

bitflags! {
    /// Board boundaries a playable cell touches.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Edges: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

/// Letters handed out to open cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    letters: Vec<char>,
}

impl Alphabet {
    pub const DEFAULT_EXCLUDED: [char; 2] = ['X', 'Z'];

    /// Upper-cases and de-duplicates `letters`, dropping anything in `excluded`.
    pub fn new(letters: impl IntoIterator<Item = char>, excluded: &[char]) -> Self {
        let mut kept = Vec::new();
        for letter in letters.into_iter().map(|c| c.to_ascii_uppercase()) {
            let is_excluded = excluded.iter().any(|x| x.eq_ignore_ascii_case(&letter));
            if !is_excluded && !kept.contains(&letter) {
                kept.push(letter);
            }
        }
        Self { letters: kept }
    }

    pub fn english(excluded: &[char]) -> Self {
        Self::new('A'..='Z', excluded)
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::english(&Self::DEFAULT_EXCLUDED)
    }
}

/// What to do when the board map cannot be read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Read again up to `attempts` more times, then give up.
    Retry { attempts: u8 },
    /// Carry on with an empty board.
    Ignore,
    Abort,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HexGrid {
    tiles: Array2<TileKind>,
    letters: Array2<Option<char>>,
    edges: Array2<Edges>,
    playable: Vec<Coord2>,
}

impl HexGrid {
    /// Parses a board map: one row per line, tile ids separated by anything
    /// that is not a digit. Lines without ids are skipped.
    pub fn parse(map: &str) -> Result<Self> {
        let mut rows: Vec<Vec<TileKind>> = Vec::new();
        for line in map.lines() {
            let row = line
                .split(|c: char| !c.is_ascii_digit())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token
                        .parse::<u32>()
                        .map_err(|_| GameError::InvalidTileId)
                        .and_then(TileKind::from_id)
                })
                .collect::<Result<Vec<_>>>()?;
            if !row.is_empty() {
                rows.push(row);
            }
        }

        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(GameError::InvalidBoardShape);
        }
        let height: Coord = rows
            .len()
            .try_into()
            .map_err(|_| GameError::InvalidBoardShape)?;
        let width: Coord = width
            .try_into()
            .map_err(|_| GameError::InvalidBoardShape)?;

        let tiles = Array2::from_shape_vec(
            (usize::from(height), usize::from(width)),
            rows.into_iter().flatten().collect(),
        )
        .map_err(|_| GameError::InvalidBoardShape)?;

        Ok(Self::from_tiles(tiles))
    }

    /// Reads the map through `read`, applying `policy` when reading fails.
    pub fn load_with<E, F>(policy: LoadPolicy, mut read: F) -> Result<Self>
    where
        E: Display,
        F: FnMut() -> core::result::Result<String, E>,
    {
        let attempts = match policy {
            LoadPolicy::Retry { attempts } => u16::from(attempts) + 1,
            LoadPolicy::Ignore | LoadPolicy::Abort => 1u16,
        };

        for attempt in 1..=attempts {
            match read() {
                Ok(map) => return Self::parse(&map),
                Err(err) => {
                    log::warn!("Failed to read board map (attempt {attempt}/{attempts}): {err}")
                }
            }
        }

        match policy {
            LoadPolicy::Ignore => {
                log::warn!("Board map unreadable, continuing with an empty board");
                Ok(Self::empty())
            }
            LoadPolicy::Retry { .. } | LoadPolicy::Abort => Err(GameError::MapUnreadable),
        }
    }

    pub fn standard() -> Self {
        Self::parse(STANDARD_MAP).expect("standard map should parse")
    }

    pub fn empty() -> Self {
        Self::from_tiles(Array2::default((0, 0)))
    }

    fn from_tiles(tiles: Array2<TileKind>) -> Self {
        let (rows, cols) = tiles.dim();
        let mut playable = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                if tiles[(row, col)].is_playable() {
                    // `parse` bounds both axes to `Coord`
                    playable.push((row as Coord, col as Coord));
                }
            }
        }

        let edges = find_edges(tiles.dim(), &playable);
        Self {
            letters: Array2::from_elem(tiles.dim(), None),
            tiles,
            edges,
            playable,
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.tiles.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn tile(&self, coords: Coord2) -> TileKind {
        self.tiles
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or_default()
    }

    pub fn is_playable(&self, coords: Coord2) -> bool {
        self.tile(coords).is_playable()
    }

    pub fn letter(&self, coords: Coord2) -> Option<char> {
        self.letters.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn edges_at(&self, coords: Coord2) -> Edges {
        self.edges
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(Edges::empty())
    }

    /// Playable cells in row-major order.
    pub fn playable_cells(&self) -> &[Coord2] {
        &self.playable
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        self.tiles.iter_neighbors(coords)
    }

    pub fn find_letter(&self, letter: char) -> Option<Coord2> {
        let letter = letter.to_ascii_uppercase();
        self.playable
            .iter()
            .copied()
            .find(|&coords| self.letter(coords) == Some(letter))
    }

    pub fn open_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.playable
            .iter()
            .filter_map(|&coords| self.letter(coords))
    }

    pub fn cell(&self, coords: Coord2, registry: &ClaimRegistry) -> Cell {
        Cell {
            tile: self.tile(coords),
            letter: self.letter(coords),
            owner: registry.owner(coords),
        }
    }

    pub fn clear_letter(&mut self, coords: Coord2) {
        if let Some(letter) = self.letters.get_mut(coords.to_nd_index()) {
            *letter = None;
        }
    }

    /// Gives every playable cell still unset in `registry` a distinct letter,
    /// drawn as a uniformly random permutation of `alphabet`.
    pub fn assign_letters<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        alphabet: &Alphabet,
        registry: &ClaimRegistry,
    ) -> Result<()> {
        let open: Vec<Coord2> = self
            .playable
            .iter()
            .copied()
            .filter(|&coords| registry.is_unset(coords))
            .collect();

        if open.len() > alphabet.len() {
            return Err(GameError::AlphabetExhausted {
                needed: open.len(),
                available: alphabet.len(),
            });
        }

        let mut letters = alphabet.letters().to_vec();
        letters.shuffle(rng);

        self.letters.fill(None);
        for (&coords, letter) in open.iter().zip(letters) {
            self.letters[coords.to_nd_index()] = Some(letter);
        }

        log::debug!("Assigned letters to {} open cells", open.len());
        Ok(())
    }
}

fn find_edges(dim: (usize, usize), playable: &[Coord2]) -> Array2<Edges> {
    let mut edges = Array2::from_elem(dim, Edges::empty());

    let columns = playable.iter().map(|&coords| visual_column(coords));
    let (Some(leftmost), Some(rightmost)) = (columns.clone().min(), columns.max()) else {
        return edges;
    };

    let mut column_span: BTreeMap<u16, (Coord, Coord)> = BTreeMap::new();
    for &coords in playable {
        let row = coords.0;
        column_span
            .entry(visual_column(coords))
            .and_modify(|(top, bottom)| {
                *top = (*top).min(row);
                *bottom = (*bottom).max(row);
            })
            .or_insert((row, row));
    }

    for &coords in playable {
        let column = visual_column(coords);
        let (top, bottom) = column_span[&column];
        let mut flags = Edges::empty();
        flags.set(Edges::LEFT, column == leftmost);
        flags.set(Edges::RIGHT, column == rightmost);
        flags.set(Edges::TOP, coords.0 == top);
        flags.set(Edges::BOTTOM, coords.0 == bottom);
        edges[coords.to_nd_index()] = flags;
    }

    edges
}
