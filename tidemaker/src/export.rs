//! Grid compiler: turns the canvas and its free objects into layered export data.
//!
//! Positions are normalized so the smallest occupied column and row land at
//! pixel (0, 0). Every layer is an ordered map, which keeps the export
//! deterministic for equal input.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    canvas::{variant_or_fallback, CanvasGrid},
    error::ExportError,
    grid::cell_at,
    math::Vec2,
    registry::{Style, TileId, TypeRegistry},
};

/// Normalized pixel position in the exported level.
pub type PixelPos = (i32, i32);

/// Which water frame a cell uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterPosition {
    /// Surface: nothing wet above.
    Top,
    /// Submerged: the cell above holds water.
    Bottom,
}

/// Six export layers, in the order the runtime instantiates them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportLayers {
    #[serde(with = "entries")]
    pub water: BTreeMap<PixelPos, WaterPosition>,
    #[serde(with = "entries")]
    pub decoration_bg: BTreeMap<PixelPos, TileId>,
    #[serde(with = "entries")]
    pub terrain: BTreeMap<PixelPos, String>,
    #[serde(with = "entries")]
    pub enemies: BTreeMap<PixelPos, TileId>,
    #[serde(with = "entries")]
    pub coins: BTreeMap<PixelPos, TileId>,
    /// Foreground decorations plus the player and sky markers.
    #[serde(with = "entries")]
    pub decoration_fg: BTreeMap<PixelPos, TileId>,
}

impl ExportLayers {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Total number of entries across all layers.
    pub fn len(&self) -> usize {
        self.water.len()
            + self.decoration_bg.len()
            + self.terrain.len()
            + self.enemies.len()
            + self.coins.len()
            + self.decoration_fg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON objects need string keys, so each layer is written as a list of `[x, y, value]`.
mod entries {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::PixelPos;

    pub fn serialize<V, S>(map: &BTreeMap<PixelPos, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter().map(|(&(x, y), value)| (x, y, value)))
    }

    pub fn deserialize<'de, V, D>(deserializer: D) -> Result<BTreeMap<PixelPos, V>, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let items = Vec::<(i32, i32, V)>::deserialize(deserializer)?;
        Ok(items.into_iter().map(|(x, y, value)| ((x, y), value)).collect())
    }
}

/// Compile `grid` plus free-object `placements` into export layers.
///
/// `placements` holds `(id, top-left minus origin)` for every free object.
/// `variants` is the set of terrain keys with frames; unknown keys fall back.
/// The grid itself is left untouched. A grid with no cells is an
/// [`ExportError::EmptyGrid`] even when objects are placed.
pub fn compile(
    grid: &CanvasGrid,
    placements: &[(TileId, Vec2)],
    registry: &TypeRegistry,
    variants: &BTreeSet<String>,
    tile_size: f32,
) -> Result<ExportLayers, ExportError> {
    if grid.is_empty() {
        return Err(ExportError::EmptyGrid);
    }

    let mut work = grid.clone();
    work.clear_objects();
    for &(id, offset) in placements {
        let style = registry.style(id)?;
        let cell = cell_at(offset, Vec2::ZERO, tile_size);
        work.insert_object(cell, id, style, offset - cell.top_left(tile_size));
    }

    let min = work.min_cell().ok_or(ExportError::EmptyGrid)?;
    let mut layers = ExportLayers::default();

    for (cell, tile) in work.iter() {
        let corner = cell.offset(-min.x, -min.y).top_left(tile_size);
        let pos = (corner.x as i32, corner.y as i32);

        if tile.has_water {
            layers.water.insert(pos, tile.water_position());
        }
        if tile.has_terrain {
            layers.terrain.insert(pos, variant_or_fallback(tile.terrain_key(), variants));
        }
        if let Some(coin) = tile.coin {
            let half = (tile_size / 2.0) as i32;
            layers.coins.insert((pos.0 + half, pos.1 + half), coin);
        }
        if let Some(enemy) = tile.enemy {
            layers.enemies.insert(pos, enemy);
        }
        for &(id, offset) in &tile.objects {
            let at = ((corner.x + offset.x).floor() as i32, (corner.y + offset.y).floor() as i32);
            if let Style::DecorationBg(_) = registry.style(id)? {
                layers.decoration_bg.insert(at, id);
            } else {
                layers.decoration_fg.insert(at, id);
            }
        }
    }

    log::debug!("Compiled {} cells into {} export entries", work.len(), layers.len());
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridCoord;

    const TILE: f32 = 64.0;

    fn variants() -> BTreeSet<String> {
        ["X", "BC", "GH"].into_iter().map(String::from).collect()
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let registry = TypeRegistry::builtin();
        let result = compile(&CanvasGrid::new(), &[], &registry, &variants(), TILE);
        assert!(matches!(result, Err(ExportError::EmptyGrid)));

        let markers = [(TileId::PLAYER, Vec2::ZERO), (TileId::SKY, Vec2::new(0.0, -200.0))];
        let result = compile(&CanvasGrid::new(), &markers, &registry, &variants(), TILE);
        assert!(matches!(result, Err(ExportError::EmptyGrid)));
    }

    #[test]
    fn test_unknown_variant_falls_back() {
        let registry = TypeRegistry::builtin();
        let mut grid = CanvasGrid::new();
        for x in 0..3 {
            grid.place_at(&registry, GridCoord::new(x, 0), TileId(2), Vec2::ZERO).unwrap();
        }
        grid.place_at(&registry, GridCoord::new(1, -1), TileId(2), Vec2::ZERO).unwrap();

        let layers = compile(&grid, &[], &registry, &variants(), TILE).unwrap();
        assert_eq!(layers.terrain[&(0, 64)], "BC");
        assert_eq!(layers.terrain[&(128, 64)], "GH");
        // "ACG" and "DEF" have no frames.
        assert_eq!(layers.terrain[&(64, 64)], "X");
        assert_eq!(layers.terrain[&(64, 0)], "X");
    }

    #[test]
    fn test_coins_are_centered_and_enemies_cornered() {
        let registry = TypeRegistry::builtin();
        let mut grid = CanvasGrid::new();
        grid.place_at(&registry, GridCoord::new(0, 0), TileId(5), Vec2::ZERO).unwrap();
        grid.place_at(&registry, GridCoord::new(1, 0), TileId(8), Vec2::ZERO).unwrap();

        let layers = compile(&grid, &[], &registry, &variants(), TILE).unwrap();
        assert_eq!(layers.coins[&(32, 32)], TileId(5));
        assert_eq!(layers.enemies[&(64, 0)], TileId(8));
    }

    #[test]
    fn test_objects_are_split_by_layer() {
        let registry = TypeRegistry::builtin();
        let mut grid = CanvasGrid::new();
        grid.place_at(&registry, GridCoord::new(0, 0), TileId(2), Vec2::ZERO).unwrap();
        let placements = [
            (TileId::PLAYER, Vec2::new(10.5, 20.0)),
            (TileId(15), Vec2::new(100.0, 0.0)),
        ];
        let layers = compile(&grid, &placements, &registry, &variants(), TILE).unwrap();

        assert_eq!(layers.decoration_fg[&(10, 20)], TileId::PLAYER);
        assert_eq!(layers.decoration_bg[&(100, 0)], TileId(15));
    }

    #[test]
    fn test_export_leaves_grid_objects_untouched() {
        let registry = TypeRegistry::builtin();
        let mut grid = CanvasGrid::new();
        grid.place_at(&registry, GridCoord::new(0, 0), TileId(11), Vec2::new(3.0, 3.0)).unwrap();
        let before = grid.get(GridCoord::new(0, 0)).cloned();

        compile(&grid, &[(TileId::SKY, Vec2::new(0.0, 300.0))], &registry, &variants(), TILE).unwrap();
        assert_eq!(grid.get(GridCoord::new(0, 0)).cloned(), before);
    }

    #[test]
    fn test_json_uses_entry_lists() {
        let mut layers = ExportLayers::default();
        layers.water.insert((0, 64), WaterPosition::Bottom);
        layers.terrain.insert((64, 0), "X".to_string());

        let json = layers.to_json().unwrap();
        assert!(json.contains("\"bottom\""));
        assert_eq!(ExportLayers::from_json(&json).unwrap(), layers);
    }
}
