//! Terrain variant and water-occlusion resolution from the 8-neighborhood.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Deserialize, Serialize};

use super::CanvasTile;
use crate::grid::GridCoord;

/// Terrain variant used when no frame matches the neighbor key.
pub const FALLBACK_VARIANT: &str = "X";

/// Compass directions in canonical order, clockwise from north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::A,
        Direction::B,
        Direction::C,
        Direction::D,
        Direction::E,
        Direction::F,
        Direction::G,
        Direction::H,
    ];

    /// Cell offset `(dx, dy)`; negative y is up.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::A => (0, -1),
            Direction::B => (1, -1),
            Direction::C => (1, 0),
            Direction::D => (1, 1),
            Direction::E => (0, 1),
            Direction::F => (-1, 1),
            Direction::G => (-1, 0),
            Direction::H => (-1, -1),
        }
    }

    pub fn code(self) -> char {
        match self {
            Direction::A => 'A',
            Direction::B => 'B',
            Direction::C => 'C',
            Direction::D => 'D',
            Direction::E => 'E',
            Direction::F => 'F',
            Direction::G => 'G',
            Direction::H => 'H',
        }
    }

    pub fn from_cell(self, cell: GridCoord) -> GridCoord {
        let (dx, dy) = self.offset();
        cell.offset(dx, dy)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Concatenated direction codes, e.g. `"CEG"`.
pub fn terrain_key(neighbors: &[Direction]) -> String {
    neighbors.iter().map(|dir| dir.code()).collect()
}

/// `key` when a terrain frame exists for it, otherwise [`FALLBACK_VARIANT`].
pub fn variant_or_fallback(key: String, variants: &BTreeSet<String>) -> String {
    if variants.contains(&key) {
        key
    } else {
        FALLBACK_VARIANT.to_string()
    }
}

/// Recompute neighbor codes and water occlusion for every existing cell in
/// the 3x3 block around `center`.
pub(crate) fn resolve(tiles: &mut BTreeMap<GridCoord, CanvasTile>, center: GridCoord) {
    for cell in center.block() {
        if !tiles.contains_key(&cell) {
            continue;
        }

        let mut neighbors = Vec::new();
        let mut water_on_top = false;
        for dir in Direction::ALL {
            let Some(neighbor) = tiles.get(&dir.from_cell(cell)) else {
                continue;
            };
            if neighbor.has_terrain {
                neighbors.push(dir);
            }
            if dir == Direction::A && neighbor.has_water {
                water_on_top = true;
            }
        }

        if let Some(tile) = tiles.get_mut(&cell) {
            tile.terrain_neighbors = neighbors;
            tile.water_on_top = water_on_top;
        }
    }
}
