//! Sparse cell store for the editor canvas.
//!
//! Cells are created on first placement and evicted when a removal leaves them
//! without terrain, water, coin or enemy. Every edit re-resolves terrain
//! neighbors in the 3x3 block around the edited cell.

mod neighbors;
mod tile;

use std::collections::BTreeMap;

pub use neighbors::{terrain_key, variant_or_fallback, Direction, FALLBACK_VARIANT};
pub use tile::CanvasTile;

use crate::{
    error::ConfigError,
    grid::GridCoord,
    math::Vec2,
    registry::{Style, TileId, TypeRegistry},
};

#[derive(Clone, Debug, Default)]
pub struct CanvasGrid {
    tiles: BTreeMap<GridCoord, CanvasTile>,
}

impl CanvasGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `id` at `cell`, creating the tile if needed.
    pub fn place_at(
        &mut self,
        registry: &TypeRegistry,
        cell: GridCoord,
        id: TileId,
        offset: Vec2,
    ) -> Result<(), ConfigError> {
        let style = registry.style(id)?;
        self.tiles.entry(cell).or_default().add(id, style, offset);
        neighbors::resolve(&mut self.tiles, cell);
        Ok(())
    }

    /// Clear the slot `id` occupies at `cell`, evicting the tile once it is empty.
    ///
    /// Returns true when the tile was evicted.
    pub fn remove_at(&mut self, registry: &TypeRegistry, cell: GridCoord, id: TileId) -> Result<bool, ConfigError> {
        let style = registry.style(id)?;
        let Some(tile) = self.tiles.get_mut(&cell) else {
            return Ok(false);
        };

        tile.remove(style);
        let evicted = tile.is_empty();
        if evicted {
            self.tiles.remove(&cell);
        }
        neighbors::resolve(&mut self.tiles, cell);
        Ok(evicted)
    }

    pub fn get(&self, cell: GridCoord) -> Option<&CanvasTile> {
        self.tiles.get(&cell)
    }

    pub fn contains(&self, cell: GridCoord) -> bool {
        self.tiles.contains_key(&cell)
    }

    /// Tiles in row-major cell order.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &CanvasTile)> {
        self.tiles.iter().map(|(&cell, tile)| (cell, tile))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Smallest occupied column and smallest occupied row (taken independently).
    pub fn min_cell(&self) -> Option<GridCoord> {
        let min_x = self.tiles.keys().map(|cell| cell.x).min()?;
        let min_y = self.tiles.keys().map(|cell| cell.y).min()?;
        Some(GridCoord::new(min_x, min_y))
    }

    /// Drop every object list, leaving the cell slots untouched.
    pub(crate) fn clear_objects(&mut self) {
        for tile in self.tiles.values_mut() {
            tile.objects.clear();
        }
    }

    /// Insert an object without touching neighbor state.
    pub(crate) fn insert_object(&mut self, cell: GridCoord, id: TileId, style: Style, offset: Vec2) {
        self.tiles.entry(cell).or_default().add(id, style, offset);
    }
}
