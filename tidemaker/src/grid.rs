//! Cell coordinates for the editor canvas.
//!
//! The canvas is unbounded, so cells are plain integer pairs and world
//! positions map onto them by flooring, which keeps negative positions in the
//! correct cell.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// A cell on the canvas (column, row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell shifted by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> GridCoord {
        GridCoord::new(self.x + dx, self.y + dy)
    }

    /// Top-left corner of the cell, relative to the origin.
    pub fn top_left(&self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    /// The 3x3 block of cells centered on this one, row by row.
    pub fn block(&self) -> impl Iterator<Item = GridCoord> {
        let center = *self;
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| center.offset(dx, dy)))
    }
}

/// Map a screen or world position onto the cell containing it.
///
/// `origin` is subtracted first so the result is stable under panning.
pub fn cell_at(position: Vec2, origin: Vec2, tile_size: f32) -> GridCoord {
    let local = position - origin;
    GridCoord {
        x: (local.x / tile_size).floor() as i32,
        y: (local.y / tile_size).floor() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_positions_floor() {
        assert_eq!(cell_at(Vec2::new(-1.0, 0.0), Vec2::ZERO, 16.0), GridCoord::new(-1, 0));
        assert_eq!(cell_at(Vec2::new(-16.0, -17.0), Vec2::ZERO, 16.0), GridCoord::new(-1, -2));
    }

    #[test]
    fn test_cell_at_applies_origin() {
        let origin = Vec2::new(100.0, 50.0);
        assert_eq!(cell_at(Vec2::new(100.0, 50.0), origin, 64.0), GridCoord::new(0, 0));
        assert_eq!(cell_at(Vec2::new(99.0, 49.0), origin, 64.0), GridCoord::new(-1, -1));
    }

    #[test]
    fn test_cell_round_trip_stays_within_one_tile() {
        let tile = 64.0;
        let origin = Vec2::new(-37.5, 12.25);
        for &(x, y) in &[(0.0, 0.0), (-1.0, -1.0), (513.7, -900.2), (-64.0, 64.0), (1.0e4, -3.3)] {
            let pos = Vec2::new(x, y);
            let cell = cell_at(pos, origin, tile);
            let back = origin + cell.top_left(tile);
            let delta = pos - back;
            assert!(delta.x >= 0.0 && delta.x < tile, "x drifted for {pos:?}");
            assert!(delta.y >= 0.0 && delta.y < tile, "y drifted for {pos:?}");
        }
    }

    #[test]
    fn test_block_covers_neighborhood() {
        let cells: Vec<_> = GridCoord::new(5, 5).block().collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], GridCoord::new(4, 4));
        assert_eq!(cells[4], GridCoord::new(5, 5));
        assert_eq!(cells[8], GridCoord::new(6, 6));
    }
}
