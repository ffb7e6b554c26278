//! Free-floating editor objects: markers and decorations that are not snapped to cells.
//!
//! Each object stores the offset of its top-left corner from the canvas
//! origin. Panning only moves the origin, so stored offsets never change
//! until an object is dragged.

use crate::{
    assets::FrameSet,
    math::{Rect, Vec2},
    registry::{Marker, Style, TileId},
};

/// A placed object in the editor.
#[derive(Clone, Debug)]
pub struct FreeObject {
    id: TileId,
    style: Style,
    frames: FrameSet,
    frame_index: f32,
    /// Current rectangle in screen space.
    rect: Rect,
    /// Top-left corner minus the origin.
    offset: Vec2,
    selected: bool,
    drag_offset: Vec2,
}

impl FreeObject {
    /// Create an object whose first frame is centered on `center` (screen space).
    pub fn new(id: TileId, style: Style, frames: FrameSet, center: Vec2, origin: Vec2) -> Self {
        let rect = Rect::from_center(center, frames.first().size());
        Self {
            id,
            style,
            frames,
            frame_index: 0.0,
            offset: rect.top_left() - origin,
            rect,
            selected: false,
            drag_offset: Vec2::ZERO,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Origin-relative position of the top-left corner.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Markers always exist and cannot be deleted.
    pub fn is_marker(&self) -> bool {
        matches!(self.style, Style::Marker(_))
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    pub fn frame_index(&self) -> f32 {
        self.frame_index
    }

    fn start_drag(&mut self, pointer: Vec2) {
        self.selected = true;
        self.drag_offset = pointer - self.rect.top_left();
    }

    fn end_drag(&mut self, origin: Vec2) {
        self.selected = false;
        self.offset = self.rect.top_left() - origin;
    }

    fn pan(&mut self, origin: Vec2) {
        self.rect.set_top_left(origin + self.offset);
    }

    fn update(&mut self, dt: f32, animation_speed: f32, pointer: Vec2) {
        self.frame_index += animation_speed * dt;
        if self.frame_index >= self.frames.len() as f32 {
            self.frame_index = 0.0;
        }
        // Frames may differ in size; keep the feet in place.
        let mid_bottom = self.rect.mid_bottom();
        self.rect = Rect::from_mid_bottom(mid_bottom, self.frames.frame(self.frame_index).size());

        if self.selected {
            self.rect.set_top_left(pointer - self.drag_offset);
        }
    }
}

/// Registry of free objects in draw order.
///
/// The player-start and sky markers are created with the registry and are
/// never removed.
#[derive(Clone, Debug)]
pub struct FreeObjects {
    objects: Vec<FreeObject>,
}

impl FreeObjects {
    /// Create the registry with the player marker at `player_center` and the
    /// sky marker at `sky_center` (screen space).
    pub fn new(player: FrameSet, player_center: Vec2, sky: FrameSet, sky_center: Vec2, origin: Vec2) -> Self {
        Self {
            objects: vec![
                FreeObject::new(TileId::PLAYER, Style::Marker(Marker::Player), player, player_center, origin),
                FreeObject::new(TileId::SKY, Style::Marker(Marker::Sky), sky, sky_center, origin),
            ],
        }
    }

    /// Add an object centered on `center`. Returns its index.
    pub fn spawn(&mut self, id: TileId, style: Style, frames: FrameSet, center: Vec2, origin: Vec2) -> usize {
        self.objects.push(FreeObject::new(id, style, frames, center, origin));
        self.objects.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &FreeObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Always false: the markers are permanent.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FreeObject> {
        self.objects.get(index)
    }

    fn marker(&self, id: TileId) -> Option<&FreeObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn player(&self) -> Option<&FreeObject> {
        self.marker(TileId::PLAYER)
    }

    pub fn sky(&self) -> Option<&FreeObject> {
        self.marker(TileId::SKY)
    }

    /// Index of the topmost object under `point`.
    pub fn object_at(&self, point: Vec2) -> Option<usize> {
        self.objects.iter().rposition(|object| object.rect.contains(point))
    }

    pub fn is_dragging(&self) -> bool {
        self.objects.iter().any(|object| object.selected)
    }

    /// Start dragging the topmost object under `pointer`. Returns true if one was picked up.
    pub fn start_drag(&mut self, pointer: Vec2) -> bool {
        match self.object_at(pointer) {
            Some(index) => {
                self.objects[index].start_drag(pointer);
                true
            }
            None => false,
        }
    }

    /// Drop the dragged object and re-anchor it to `origin`.
    pub fn end_drag(&mut self, origin: Vec2) {
        for object in self.objects.iter_mut().filter(|object| object.selected) {
            object.end_drag(origin);
        }
    }

    /// Remove the topmost non-marker object under `point`.
    pub fn remove_at(&mut self, point: Vec2) -> Option<TileId> {
        let index = self.object_at(point)?;
        if self.objects[index].is_marker() {
            return None;
        }
        Some(self.objects.remove(index).id)
    }

    /// Re-position every object after the origin moved.
    pub fn pan(&mut self, origin: Vec2) {
        for object in &mut self.objects {
            object.pan(origin);
        }
    }

    /// Advance animations and move the dragged object with the pointer.
    pub fn update(&mut self, dt: f32, animation_speed: f32, pointer: Vec2) {
        for object in &mut self.objects {
            object.update(dt, animation_speed, pointer);
        }
    }

    /// `(id, origin-relative top-left)` of every object, for export.
    pub fn placements(&self) -> Vec<(TileId, Vec2)> {
        self.objects.iter().map(|object| (object.id, object.offset)).collect()
    }
}
