pub use glam::Vec2;

/// Axis-aligned rectangle in pixel space.
///
/// Edges follow the usual screen convention: `right = x + w`, `bottom = y + h`.
/// Two rectangles overlap only when they share a positive area, so touching
/// edges do not count as a collision.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self::new(top_left.x, top_left.y, size.x, size.y)
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::from_top_left(center - size / 2.0, size)
    }

    pub fn from_mid_bottom(mid_bottom: Vec2, size: Vec2) -> Self {
        Self::new(mid_bottom.x - size.x / 2.0, mid_bottom.y - size.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.y)
    }

    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.x, self.bottom())
    }

    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn mid_bottom(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.bottom())
    }

    pub fn mid_left(&self) -> Vec2 {
        Vec2::new(self.x, self.center_y())
    }

    pub fn mid_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.center_y())
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn set_center_x(&mut self, center_x: f32) {
        self.x = center_x - self.w / 2.0;
    }

    pub fn set_center_y(&mut self, center_y: f32) {
        self.y = center_y - self.h / 2.0;
    }

    pub fn set_top_left(&mut self, top_left: Vec2) {
        self.x = top_left.x;
        self.y = top_left.y;
    }

    /// Grow (or shrink, for negative amounts) around the center.
    #[must_use]
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x - dx / 2.0, self.y - dy / 2.0, self.w + dx, self.h + dy)
    }

    #[must_use]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// True when the two rectangles share a positive area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Half-open containment: the left and top edges are inside, the right and bottom are not.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Camera representing a simple 2D view. `position` is the world point drawn at the screen's top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
}

impl Camera2D {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    /// Converts screen coordinates to world coordinates using this camera.
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        screen_pos + self.position
    }

    /// Converts world coordinates to screen coordinates using this camera.
    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        world_pos - self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 64.0, 64.0);
        let b = Rect::new(64.0, 0.0, 64.0, 64.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&b.translate(Vec2::new(-1.0, 0.0))));
    }

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(!rect.contains(Vec2::new(10.0, 5.0)));
        assert!(!rect.contains(Vec2::new(5.0, 10.0)));
    }

    #[test]
    fn test_inflate_keeps_center() {
        let rect = Rect::new(0.0, 0.0, 64.0, 64.0).inflate(-50.0, 0.0);
        assert_eq!(rect, Rect::new(25.0, 0.0, 14.0, 64.0));
        assert_eq!(rect.center_x(), 32.0);
    }

    #[test]
    fn test_camera_round_trips_points() {
        let camera = Camera2D::new(Vec2::new(100.0, -40.0));
        let world = Vec2::new(12.0, 30.0);
        assert_eq!(camera.screen_to_world(camera.world_to_screen(world)), world);
    }
}
