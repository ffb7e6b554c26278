//! Type registry: what each placeable tile id is and how it is drawn.

use std::{collections::BTreeMap, fmt, fs, ops::RangeInclusive, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Integer identifier of a placeable type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u8);

impl TileId {
    pub const PLAYER: TileId = TileId(0);
    pub const SKY: TileId = TileId(1);
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Player,
    Sky,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinKind {
    Gold,
    Silver,
    Diamond,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Spikes,
    Tooth,
    ShellLeft,
    ShellRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PalmKind {
    Small,
    Large,
    Left,
    Right,
}

/// Style category of a tile type. Drives canvas dispatch and export layer choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Marker(Marker),
    Terrain,
    Water,
    Coin(CoinKind),
    Enemy(EnemyKind),
    DecorationFg(PalmKind),
    DecorationBg(PalmKind),
}

/// How a type is placed in the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Snapped into a canvas cell slot.
    Tile,
    /// Free-floating object anchored to the origin.
    Object,
}

impl Style {
    pub fn placement(self) -> Placement {
        match self {
            Style::Terrain | Style::Water | Style::Coin(_) | Style::Enemy(_) => Placement::Tile,
            Style::Marker(_) | Style::DecorationFg(_) | Style::DecorationBg(_) => Placement::Object,
        }
    }

    /// Background objects are drawn behind the canvas tiles.
    pub fn is_background(self) -> bool {
        matches!(self, Style::DecorationBg(_) | Style::Marker(Marker::Sky))
    }
}

/// Menu button a type is listed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Terrain,
    Coin,
    Enemy,
    PalmFg,
    PalmBg,
}

/// One registry entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileType {
    pub id: TileId,
    pub style: Style,
    /// Asset key of the frame set shown on the canvas.
    #[serde(default)]
    pub frames: Option<String>,
    /// Asset key of the preview image shown under the cursor and in the menu.
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub menu: Option<MenuCategory>,
}

impl TileType {
    fn new(id: u8, style: Style, frames: &str, preview: Option<&str>, menu: Option<MenuCategory>) -> Self {
        Self {
            id: TileId(id),
            style,
            frames: Some(frames.to_string()),
            preview: preview.map(str::to_string),
            menu,
        }
    }
}

/// Read-only table of tile types, validated once at load.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    entries: BTreeMap<TileId, TileType>,
}

impl TypeRegistry {
    /// Build a registry from entries, rejecting duplicates and incomplete entries.
    pub fn from_entries(entries: Vec<TileType>) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            if entry.frames.is_none() {
                return Err(ConfigError::MissingField {
                    tile: entry.id,
                    field: "frames",
                });
            }
            if entry.menu.is_some() {
                if entry.preview.is_none() {
                    return Err(ConfigError::MissingField {
                        tile: entry.id,
                        field: "preview",
                    });
                }
                if matches!(entry.style, Style::Marker(_)) {
                    return Err(ConfigError::UnplaceableMenuEntry(entry.id));
                }
            }
            let id = entry.id;
            if map.insert(id, entry).is_some() {
                return Err(ConfigError::DuplicateTile(id));
            }
        }

        for marker in [TileId::PLAYER, TileId::SKY] {
            if !map.contains_key(&marker) {
                return Err(ConfigError::UnknownTile(marker));
            }
        }

        Ok(Self { entries: map })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: Vec<TileType> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The built-in table of nineteen types.
    pub fn builtin() -> Self {
        use MenuCategory as M;

        let entries = vec![
            TileType::new(0, Style::Marker(Marker::Player), "player/idle_right", None, None),
            TileType::new(1, Style::Marker(Marker::Sky), "sky_handle", None, None),
            TileType::new(2, Style::Terrain, "land/X", Some("preview/land"), Some(M::Terrain)),
            TileType::new(3, Style::Water, "water/top", Some("preview/water"), Some(M::Terrain)),
            TileType::new(4, Style::Coin(CoinKind::Gold), "coin/gold", Some("preview/gold"), Some(M::Coin)),
            TileType::new(5, Style::Coin(CoinKind::Silver), "coin/silver", Some("preview/silver"), Some(M::Coin)),
            TileType::new(6, Style::Coin(CoinKind::Diamond), "coin/diamond", Some("preview/diamond"), Some(M::Coin)),
            TileType::new(7, Style::Enemy(EnemyKind::Spikes), "spikes", Some("preview/spikes"), Some(M::Enemy)),
            TileType::new(8, Style::Enemy(EnemyKind::Tooth), "tooth/idle", Some("preview/tooth"), Some(M::Enemy)),
            TileType::new(9, Style::Enemy(EnemyKind::ShellLeft), "shell_left/idle", Some("preview/shell_left"), Some(M::Enemy)),
            TileType::new(10, Style::Enemy(EnemyKind::ShellRight), "shell_right/idle", Some("preview/shell_right"), Some(M::Enemy)),
            TileType::new(11, Style::DecorationFg(PalmKind::Small), "palm/small_fg", Some("preview/small_fg"), Some(M::PalmFg)),
            TileType::new(12, Style::DecorationFg(PalmKind::Large), "palm/large_fg", Some("preview/large_fg"), Some(M::PalmFg)),
            TileType::new(13, Style::DecorationFg(PalmKind::Left), "palm/left_fg", Some("preview/left_fg"), Some(M::PalmFg)),
            TileType::new(14, Style::DecorationFg(PalmKind::Right), "palm/right_fg", Some("preview/right_fg"), Some(M::PalmFg)),
            TileType::new(15, Style::DecorationBg(PalmKind::Small), "palm/small_bg", Some("preview/small_bg"), Some(M::PalmBg)),
            TileType::new(16, Style::DecorationBg(PalmKind::Large), "palm/large_bg", Some("preview/large_bg"), Some(M::PalmBg)),
            TileType::new(17, Style::DecorationBg(PalmKind::Left), "palm/left_bg", Some("preview/left_bg"), Some(M::PalmBg)),
            TileType::new(18, Style::DecorationBg(PalmKind::Right), "palm/right_bg", Some("preview/right_bg"), Some(M::PalmBg)),
        ];

        Self {
            entries: entries.into_iter().map(|entry| (entry.id, entry)).collect(),
        }
    }

    pub fn get(&self, id: TileId) -> Result<&TileType, ConfigError> {
        self.entries.get(&id).ok_or(ConfigError::UnknownTile(id))
    }

    pub fn style(&self, id: TileId) -> Result<Style, ConfigError> {
        self.get(id).map(|entry| entry.style)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileType> {
        self.entries.values()
    }

    /// Ids listed under a menu category, in id order.
    pub fn menu_items(&self, category: MenuCategory) -> Vec<TileId> {
        self.entries
            .values()
            .filter(|entry| entry.menu == Some(category))
            .map(|entry| entry.id)
            .collect()
    }

    /// Range the editor's selection index is clamped to: every id that appears in the menu.
    pub fn selectable(&self) -> RangeInclusive<TileId> {
        let mut ids = self.entries.values().filter(|entry| entry.menu.is_some()).map(|entry| entry.id);
        let first = ids.next().unwrap_or(TileId::PLAYER);
        let last = ids.last().unwrap_or(first);
        first..=last
    }

    /// Clamp a signed selection index into [`TypeRegistry::selectable`].
    pub fn clamp_selection(&self, index: i32) -> TileId {
        let range = self.selectable();
        let clamped = index.clamp(i32::from(range.start().0), i32::from(range.end().0));
        TileId(clamped as u8)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_selection_range() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.selectable(), TileId(2)..=TileId(18));
        assert_eq!(registry.clamp_selection(19), TileId(18));
        assert_eq!(registry.clamp_selection(1), TileId(2));
        assert_eq!(registry.clamp_selection(-5), TileId(2));
    }

    #[test]
    fn test_builtin_entries_pass_validation() {
        let entries = TypeRegistry::builtin().iter().cloned().collect();
        assert!(TypeRegistry::from_entries(entries).is_ok());
    }

    #[test]
    fn test_menu_entry_without_preview_is_rejected() {
        let mut entries: Vec<TileType> = TypeRegistry::builtin().iter().cloned().collect();
        entries[4].preview = None;
        let err = TypeRegistry::from_entries(entries).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField { tile: TileId(4), field: "preview" }
        ));
    }

    #[test]
    fn test_unknown_id_is_a_config_error() {
        let registry = TypeRegistry::builtin();
        assert!(matches!(registry.style(TileId(42)), Err(ConfigError::UnknownTile(TileId(42)))));
    }

    #[test]
    fn test_registry_loads_from_json() {
        let json = r#"[
            {"id": 0, "style": {"marker": "player"}, "frames": "player/idle_right"},
            {"id": 1, "style": {"marker": "sky"}, "frames": "sky_handle"},
            {"id": 2, "style": "terrain", "frames": "land/X", "preview": "preview/land", "menu": "terrain"},
            {"id": 4, "style": {"coin": "gold"}, "frames": "coin/gold", "preview": "preview/gold", "menu": "coin"}
        ]"#;
        let registry = TypeRegistry::from_json(json).unwrap();
        assert_eq!(registry.style(TileId(4)).unwrap(), Style::Coin(CoinKind::Gold));
        assert_eq!(registry.menu_items(MenuCategory::Terrain), vec![TileId(2)]);
        assert_eq!(registry.selectable(), TileId(2)..=TileId(4));
    }

    #[test]
    fn test_placement_follows_style() {
        assert_eq!(Style::Terrain.placement(), Placement::Tile);
        assert_eq!(Style::Enemy(EnemyKind::Tooth).placement(), Placement::Tile);
        assert_eq!(Style::DecorationBg(PalmKind::Left).placement(), Placement::Object);
        assert_eq!(Style::Marker(Marker::Sky).placement(), Placement::Object);
    }
}
