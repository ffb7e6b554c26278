//! Error types for configuration, export and level building.

use std::path::PathBuf;

use thiserror::Error;

use crate::registry::TileId;

/// Problems with the type registry or settings files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown tile id {0}")]
    UnknownTile(TileId),

    #[error("tile {tile} is missing required field `{field}`")]
    MissingField { tile: TileId, field: &'static str },

    #[error("tile id {0} is registered twice")]
    DuplicateTile(TileId),

    #[error("menu entry {0} is not placeable")]
    UnplaceableMenuEntry(TileId),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while compiling the editor canvas into export layers.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing has been placed on the canvas")]
    EmptyGrid,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures while turning export layers into a playable level.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("level has no player start")]
    MissingPlayer,

    #[error("level has {count} player starts, expected exactly one")]
    DuplicatePlayer { count: usize },

    #[error("level has no horizon marker")]
    MissingHorizon,

    #[error("no frames loaded for `{0}`")]
    MissingFrames(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
