//! Editor session: placement tools, panning, dragging and the tile menu.

mod menu;

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

pub use menu::{Menu, MenuButton};

use crate::{
    assets::{AssetManager, Frame, FrameSet},
    canvas::{variant_or_fallback, CanvasGrid},
    error::{BuildError, ExportError},
    export::{compile, ExportLayers},
    grid::{cell_at, GridCoord},
    input::InputState,
    math::{Rect, Vec2},
    objects::FreeObjects,
    registry::{Placement, Style, TileId, TypeRegistry},
    render::{Color, DrawList},
    settings::Settings,
    timer::Timer,
    KeyCode, MouseButton,
};

/// Asset keys the editor draws from besides the registry's own frame keys.
const WATER_BOTTOM: &str = "water/bottom";

pub struct Editor {
    registry: TypeRegistry,
    settings: Settings,
    screen_size: Vec2,

    grid: CanvasGrid,
    objects: FreeObjects,
    menu: Menu,

    origin: Vec2,
    pan_offset: Vec2,
    panning: bool,
    pointer: Vec2,

    selection: TileId,
    last_cell: Option<GridCoord>,
    placement: Timer,
    clock: Duration,

    frames: BTreeMap<TileId, FrameSet>,
    frame_indices: BTreeMap<TileId, f32>,
    previews: BTreeMap<TileId, Frame>,
    land: BTreeMap<String, FrameSet>,
    water_bottom: FrameSet,
}

impl Editor {
    /// Create an empty canvas with the player and sky markers in their start positions.
    pub fn new(registry: TypeRegistry, settings: Settings, assets: &AssetManager) -> Result<Self, BuildError> {
        let screen_size = Vec2::new(settings.window.width as f32, settings.window.height as f32);

        let mut frames = BTreeMap::new();
        let mut previews = BTreeMap::new();
        for entry in registry.iter() {
            if let Some(key) = &entry.frames {
                frames.insert(entry.id, assets.frames(key)?);
            }
            if let Some(key) = &entry.preview {
                previews.insert(entry.id, assets.frames(key)?.first().clone());
            }
        }
        let land = assets
            .terrain_variants()
            .into_iter()
            .map(|variant| {
                let set = assets.frames(&format!("land/{variant}"))?;
                Ok((variant, set))
            })
            .collect::<Result<BTreeMap<_, _>, BuildError>>()?;

        let marker = |id: TileId| {
            frames
                .get(&id)
                .cloned()
                .ok_or_else(|| BuildError::MissingFrames(format!("marker {id}")))
        };
        let (player_x, player_y) = settings.editor.player_start;
        let origin = Vec2::ZERO;
        let objects = FreeObjects::new(
            marker(TileId::PLAYER)?,
            Vec2::new(player_x, player_y),
            marker(TileId::SKY)?,
            screen_size / 2.0,
            origin,
        );

        let selection = registry.clamp_selection(i32::from(settings.editor.initial_selection));
        let menu = Menu::new(&registry, &settings.editor, screen_size);
        let placement = Timer::new(settings.editor.placement_cooldown());
        log::info!("Editor ready with {} tile types and {} terrain variants", registry.iter().count(), land.len());

        Ok(Self {
            frame_indices: frames.keys().map(|&id| (id, 0.0)).collect(),
            registry,
            settings,
            screen_size,
            grid: CanvasGrid::new(),
            objects,
            menu,
            origin,
            pan_offset: Vec2::ZERO,
            panning: false,
            pointer: Vec2::ZERO,
            selection,
            last_cell: None,
            placement,
            clock: Duration::ZERO,
            frames,
            previews,
            land,
            water_bottom: assets.frames(WATER_BOTTOM)?,
        })
    }

    pub fn grid(&self) -> &CanvasGrid {
        &self.grid
    }

    pub fn objects(&self) -> &FreeObjects {
        &self.objects
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn selection(&self) -> TileId {
        self.selection
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn variants(&self) -> BTreeSet<String> {
        self.land.keys().cloned().collect()
    }

    /// Compile the canvas without touching it.
    pub fn export(&self) -> Result<ExportLayers, ExportError> {
        compile(
            &self.grid,
            &self.objects.placements(),
            &self.registry,
            &self.variants(),
            self.settings.tile_size,
        )
    }

    /// Run one editor tick. Returns the export when Enter was pressed.
    pub fn update(&mut self, dt: f32, input: &InputState) -> Result<Option<ExportLayers>, ExportError> {
        self.clock += Duration::from_secs_f32(dt);
        self.placement.update(self.clock);

        if input.is_key_pressed(KeyCode::Enter) {
            let layers = self.export()?;
            log::info!("Exported {} entries", layers.len());
            return Ok(Some(layers));
        }

        let pointer = input.mouse_position();
        self.pointer = pointer;
        self.pan(input, pointer);
        self.hotkeys(input);
        self.menu_click(input, pointer);
        self.drag(input, pointer);
        self.canvas_add(input, pointer)?;
        self.canvas_remove(input, pointer)?;

        self.objects.update(dt, self.settings.animation_speed, pointer);
        self.advance_animations(dt);
        Ok(None)
    }

    fn pan(&mut self, input: &InputState, pointer: Vec2) {
        if input.is_mouse_pressed(MouseButton::Middle) && !self.menu.contains(pointer) {
            self.panning = true;
            self.pan_offset = pointer - self.origin;
        }
        if !input.is_mouse_down(MouseButton::Middle) {
            self.panning = false;
        }

        let notches = input.scroll().y;
        if notches != 0.0 {
            let step = notches * self.settings.editor.scroll_step;
            if input.is_key_down(KeyCode::ControlLeft) {
                self.origin.y -= step;
            } else {
                self.origin.x -= step;
            }
            self.objects.pan(self.origin);
        }

        if self.panning {
            self.origin = pointer - self.pan_offset;
            self.objects.pan(self.origin);
        }
    }

    fn hotkeys(&mut self, input: &InputState) {
        let mut index = i32::from(self.selection.0);
        if input.is_key_pressed(KeyCode::ArrowRight) {
            index += 1;
        }
        if input.is_key_pressed(KeyCode::ArrowLeft) {
            index -= 1;
        }
        self.selection = self.registry.clamp_selection(index);
    }

    fn menu_click(&mut self, input: &InputState, pointer: Vec2) {
        if !self.menu.contains(pointer) {
            return;
        }
        for button in [MouseButton::Left, MouseButton::Middle, MouseButton::Right] {
            if input.is_mouse_pressed(button) {
                if let Some(id) = self.menu.click(pointer, button) {
                    log::debug!("Selected tile {id} from the menu");
                    self.selection = id;
                }
            }
        }
    }

    fn drag(&mut self, input: &InputState, pointer: Vec2) {
        if input.is_mouse_pressed(MouseButton::Left) && !self.menu.contains(pointer) {
            self.objects.start_drag(pointer);
        }
        if input.is_mouse_released(MouseButton::Left) {
            self.objects.end_drag(self.origin);
            self.last_cell = None;
        }
    }

    fn canvas_add(&mut self, input: &InputState, pointer: Vec2) -> Result<(), ExportError> {
        if !input.is_mouse_down(MouseButton::Left) || self.menu.contains(pointer) || self.objects.is_dragging() {
            return Ok(());
        }

        let style = self.registry.style(self.selection)?;
        match style.placement() {
            Placement::Tile => {
                let cell = cell_at(pointer, self.origin, self.settings.tile_size);
                if self.last_cell != Some(cell) {
                    self.grid.place_at(&self.registry, cell, self.selection, Vec2::ZERO)?;
                    self.last_cell = Some(cell);
                    log::debug!("Placed tile {} at {:?}", self.selection, cell);
                }
            }
            Placement::Object => {
                if !self.placement.is_active() {
                    let Some(frames) = self.frames.get(&self.selection).cloned() else {
                        log::warn!("No frames for tile {}, not placing it", self.selection);
                        return Ok(());
                    };
                    self.objects.spawn(self.selection, style, frames, pointer, self.origin);
                    self.placement.activate(self.clock);
                    log::debug!("Placed object {} at {:?}", self.selection, pointer);
                }
            }
        }
        Ok(())
    }

    fn canvas_remove(&mut self, input: &InputState, pointer: Vec2) -> Result<(), ExportError> {
        if !input.is_mouse_down(MouseButton::Right) || self.menu.contains(pointer) {
            return Ok(());
        }

        if !self.grid.is_empty() {
            let cell = cell_at(pointer, self.origin, self.settings.tile_size);
            if self.grid.remove_at(&self.registry, cell, self.selection)? {
                log::debug!("Cleared cell {:?}", cell);
            }
        }
        if let Some(id) = self.objects.remove_at(pointer) {
            log::debug!("Removed object {id}");
        }
        Ok(())
    }

    fn advance_animations(&mut self, dt: f32) {
        let step = self.settings.animation_speed * dt;
        for (id, index) in self.frame_indices.iter_mut() {
            let len = self.frames.get(id).map_or(1, FrameSet::len) as f32;
            *index += step;
            if *index >= len {
                *index = 0.0;
            }
        }
    }

    fn animated_frame(&self, id: TileId) -> Option<&Frame> {
        let index = self.frame_indices.get(&id).copied().unwrap_or(0.0);
        self.frames.get(&id).map(|set| set.frame(index))
    }

    /// Queue the sky, the canvas, the grid lines, the menu and the placement preview.
    pub fn draw(&self, list: &mut DrawList) {
        self.draw_sky(list);
        self.draw_objects(list, true);
        self.draw_tiles(list);
        self.draw_objects(list, false);
        self.draw_grid_lines(list);
        self.menu.draw(list, self.selection, &self.previews);
        self.draw_preview(list);
    }

    fn draw_sky(&self, list: &mut DrawList) {
        let width = self.screen_size.x;
        let height = self.screen_size.y;
        list.clear(Color::SKY);
        let Some(y) = self.objects.sky().map(|sky| sky.rect().center_y()) else {
            return;
        };

        if y > 0.0 {
            list.fill_rect(Rect::new(0.0, y - 10.0, width, 10.0), Color::HORIZON_TOP);
            list.fill_rect(Rect::new(0.0, y - 16.0, width, 4.0), Color::HORIZON_TOP);
            list.fill_rect(Rect::new(0.0, y - 20.0, width, 2.0), Color::HORIZON_TOP);
        }
        if y > 0.0 && y < height {
            list.fill_rect(Rect::new(0.0, y, width, height), Color::SEA);
            list.line(Vec2::new(0.0, y), Vec2::new(width, y), Color::HORIZON, 3.0);
        }
        if y < 0.0 {
            list.clear(Color::SEA);
        }
    }

    fn draw_objects(&self, list: &mut DrawList, background: bool) {
        for object in self.objects.iter() {
            if object.style().is_background() == background {
                list.sprite(object.frames().frame(object.frame_index()), object.rect().top_left());
            }
        }
    }

    fn draw_tiles(&self, list: &mut DrawList) {
        let tile = self.settings.tile_size;
        let variants = self.variants();

        for (cell, canvas_tile) in self.grid.iter() {
            let pos = self.origin + cell.top_left(tile);

            if canvas_tile.has_water {
                if canvas_tile.water_on_top {
                    list.sprite(self.water_bottom.first(), pos);
                } else if let Some(frame) = self.water_frame() {
                    list.sprite(frame, pos);
                }
            }
            if canvas_tile.has_terrain {
                let variant = variant_or_fallback(canvas_tile.terrain_key(), &variants);
                if let Some(set) = self.land.get(&variant) {
                    list.sprite(set.first(), pos);
                }
            }
            if let Some(frame) = canvas_tile.coin.and_then(|id| self.animated_frame(id)) {
                let rect = Rect::from_center(pos + Vec2::splat(tile / 2.0), frame.size());
                list.sprite(frame, rect.top_left());
            }
            if let Some(frame) = canvas_tile.enemy.and_then(|id| self.animated_frame(id)) {
                let rect = Rect::from_mid_bottom(pos + Vec2::new(tile / 2.0, tile), frame.size());
                list.sprite(frame, rect.top_left());
            }
        }
    }

    fn water_frame(&self) -> Option<&Frame> {
        let water = self
            .registry
            .iter()
            .find(|entry| entry.style == Style::Water)?;
        self.animated_frame(water.id)
    }

    fn draw_grid_lines(&self, list: &mut DrawList) {
        let tile = self.settings.tile_size;
        let width = self.screen_size.x;
        let height = self.screen_size.y;
        let cols = (width / tile).floor() as i32;
        let rows = (height / tile).floor() as i32;
        let offset = Vec2::new(self.origin.x % tile, self.origin.y % tile);

        for col in 0..=cols {
            let x = offset.x + col as f32 * tile;
            list.line(Vec2::new(x, 0.0), Vec2::new(x, height), Color::GRID_LINE, 1.0);
        }
        for row in 0..=rows {
            let y = offset.y + row as f32 * tile;
            list.line(Vec2::new(0.0, y), Vec2::new(width, y), Color::GRID_LINE, 1.0);
        }
    }

    /// Corner brackets around a hovered object, or a faded preview of the selected tile.
    fn draw_preview(&self, list: &mut DrawList) {
        let pointer = self.pointer;
        if self.menu.contains(pointer) {
            return;
        }

        if let Some(object) = self.objects.object_at(pointer).and_then(|index| self.objects.get(index)) {
            let rect = object.rect().inflate(10.0, 10.0);
            let size = 15.0;
            let corners = [
                (rect.top_left(), Vec2::new(0.0, size), Vec2::new(size, 0.0)),
                (rect.top_right(), Vec2::new(0.0, size), Vec2::new(-size, 0.0)),
                (rect.bottom_left(), Vec2::new(0.0, -size), Vec2::new(size, 0.0)),
                (rect.bottom_right(), Vec2::new(0.0, -size), Vec2::new(-size, 0.0)),
            ];
            for (corner, vertical, horizontal) in corners {
                list.line(corner + vertical, corner, Color::BLACK, 3.0);
                list.line(corner, corner + horizontal, Color::BLACK, 3.0);
            }
            return;
        }

        let Some(preview) = self.previews.get(&self.selection) else {
            return;
        };
        let Ok(style) = self.registry.style(self.selection) else {
            return;
        };
        let position = match style.placement() {
            Placement::Tile => {
                let cell = cell_at(pointer, self.origin, self.settings.tile_size);
                self.origin + cell.top_left(self.settings.tile_size)
            }
            Placement::Object => pointer - preview.size() / 2.0,
        };
        list.sprite_with(preview, position, 200, false);
    }
}
