use crate::{
    canvas::neighbors::{terrain_key, Direction},
    export::WaterPosition,
    math::Vec2,
    registry::{Style, TileId},
};

/// Authoritative content of one canvas cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanvasTile {
    pub has_terrain: bool,
    /// Directions holding terrain, in canonical order.
    pub terrain_neighbors: Vec<Direction>,
    pub has_water: bool,
    /// Set when the cell above holds water.
    pub water_on_top: bool,
    pub coin: Option<TileId>,
    pub enemy: Option<TileId>,
    /// Decorations and markers anchored in this cell, with their pixel offset from the cell corner.
    pub objects: Vec<(TileId, Vec2)>,
}

impl CanvasTile {
    /// Put `id` into the slot for its style.
    ///
    /// Coins and enemies overwrite the previous occupant. Objects are only
    /// appended when the exact `(id, offset)` pair is not already present.
    pub fn add(&mut self, id: TileId, style: Style, offset: Vec2) {
        match style {
            Style::Terrain => self.has_terrain = true,
            Style::Water => self.has_water = true,
            Style::Coin(_) => self.coin = Some(id),
            Style::Enemy(_) => self.enemy = Some(id),
            Style::Marker(_) | Style::DecorationFg(_) | Style::DecorationBg(_) => {
                if !self.objects.contains(&(id, offset)) {
                    self.objects.push((id, offset));
                }
            }
        }
    }

    /// Clear the slot for `style`. Objects are not removed through this path.
    pub fn remove(&mut self, style: Style) {
        match style {
            Style::Terrain => self.has_terrain = false,
            Style::Water => self.has_water = false,
            Style::Coin(_) => self.coin = None,
            Style::Enemy(_) => self.enemy = None,
            Style::Marker(_) | Style::DecorationFg(_) | Style::DecorationBg(_) => {}
        }
    }

    /// True once no terrain, water, coin or enemy remains. Objects do not count.
    pub fn is_empty(&self) -> bool {
        !self.has_terrain && !self.has_water && self.coin.is_none() && self.enemy.is_none()
    }

    /// Neighbor key used to pick the terrain frame.
    pub fn terrain_key(&self) -> String {
        terrain_key(&self.terrain_neighbors)
    }

    pub fn water_position(&self) -> WaterPosition {
        if self.water_on_top {
            WaterPosition::Bottom
        } else {
            WaterPosition::Top
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CoinKind, EnemyKind, PalmKind};

    #[test]
    fn test_decoration_insert_is_idempotent() {
        let mut tile = CanvasTile::default();
        let palm = Style::DecorationFg(PalmKind::Small);
        tile.add(TileId(11), palm, Vec2::new(12.0, 30.0));
        tile.add(TileId(11), palm, Vec2::new(12.0, 30.0));
        tile.add(TileId(11), palm, Vec2::new(13.0, 30.0));
        assert_eq!(tile.objects.len(), 2);
    }

    #[test]
    fn test_coin_slot_is_overwritten() {
        let mut tile = CanvasTile::default();
        tile.add(TileId(4), Style::Coin(CoinKind::Gold), Vec2::ZERO);
        tile.add(TileId(6), Style::Coin(CoinKind::Diamond), Vec2::ZERO);
        assert_eq!(tile.coin, Some(TileId(6)));
    }

    #[test]
    fn test_objects_do_not_keep_tile_alive() {
        let mut tile = CanvasTile::default();
        tile.add(TileId(8), Style::Enemy(EnemyKind::Tooth), Vec2::ZERO);
        tile.add(TileId(15), Style::DecorationBg(PalmKind::Small), Vec2::new(4.0, 4.0));
        assert!(!tile.is_empty());

        tile.remove(Style::Enemy(EnemyKind::Tooth));
        assert!(tile.is_empty());
        assert_eq!(tile.objects.len(), 1);
    }

    #[test]
    fn test_water_position_tracks_occlusion() {
        let mut tile = CanvasTile::default();
        tile.add(TileId(3), Style::Water, Vec2::ZERO);
        assert_eq!(tile.water_position(), WaterPosition::Top);
        tile.water_on_top = true;
        assert_eq!(tile.water_position(), WaterPosition::Bottom);
    }
}
