//! Tidemaker - a tile-based level editor paired with a platformer runtime.
//!
//! The editor keeps a sparse cell store plus free-floating objects, compiles
//! them into layered export data, and the runtime turns that export into a
//! playable level with axis-separated collision.

pub mod assets;
pub mod audio;
pub mod camera;
pub mod canvas;
pub mod editor;
pub mod engine;
pub mod error;
pub mod export;
pub mod grid;
pub mod input;
pub mod level;
pub mod math;
pub mod objects;
pub mod registry;
pub mod render;
pub mod settings;
pub mod state;
pub mod timer;
pub mod world;

pub use crate::assets::{AssetManager, Frame, FrameSet, Mask};
pub use crate::audio::{AudioSystem, SoundId, SoundPlayer};
pub use crate::camera::CameraFollow;
pub use crate::canvas::{CanvasGrid, CanvasTile, Direction};
pub use crate::editor::Editor;
pub use crate::engine::{Engine, EngineConfig, EngineContext, Game, Presenter};
pub use crate::error::{BuildError, ConfigError, ExportError};
pub use crate::export::{compile, ExportLayers, WaterPosition};
pub use crate::grid::{cell_at, GridCoord};
pub use crate::input::InputState;
pub use crate::level::Level;
pub use crate::math::{Camera2D, Rect, Vec2};
pub use crate::objects::{FreeObject, FreeObjects};
pub use crate::registry::{Style, TileId, TileType, TypeRegistry};
pub use crate::render::{rasterize, Color, DrawCommand, DrawList};
pub use crate::settings::Settings;
pub use crate::state::{State, StateMachine, StateMachineLike};
pub use crate::timer::Timer;
pub use crate::world::{EntityId, World};
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
