//! Camera follow with an optional dead zone.

use crate::math::{Camera2D, Vec2};

/// Camera follow behavior configuration.
///
/// The camera keeps its target at the center of the screen. With a non-zero
/// dead zone the camera only moves once the target leaves that area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFollow {
    /// Dead zone size - camera won't move if target is within this area
    pub dead_zone: Vec2,
}

impl CameraFollow {
    /// Follow with no dead zone: the target is always centered.
    pub fn new() -> Self {
        Self { dead_zone: Vec2::ZERO }
    }

    /// Set the dead zone size (camera won't move if target is within this area).
    #[must_use]
    pub fn with_dead_zone(mut self, width: f32, height: f32) -> Self {
        self.dead_zone = Vec2::new(width, height);
        self
    }

    /// Move `camera` so `target` sits in the middle of a screen of `screen_size`.
    pub fn update(&self, camera: &mut Camera2D, target: Vec2, screen_size: Vec2) {
        let center = camera.position + screen_size / 2.0;
        let offset = target - center;
        let half_dead_zone = self.dead_zone / 2.0;

        if offset.x.abs() > half_dead_zone.x {
            camera.position.x += offset.x - offset.x.signum() * half_dead_zone.x;
        }
        if offset.y.abs() > half_dead_zone.y {
            camera.position.y += offset.y - offset.y.signum() * half_dead_zone.y;
        }
    }
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_centers_target() {
        let mut camera = Camera2D::default();
        CameraFollow::new().update(&mut camera, Vec2::new(1000.0, 500.0), Vec2::new(1280.0, 720.0));
        assert_eq!(camera.position, Vec2::new(360.0, 140.0));
    }

    #[test]
    fn test_dead_zone_holds_camera() {
        let mut camera = Camera2D::default();
        let follow = CameraFollow::new().with_dead_zone(100.0, 100.0);
        follow.update(&mut camera, Vec2::new(680.0, 360.0), Vec2::new(1280.0, 720.0));
        assert_eq!(camera.position, Vec2::ZERO);

        follow.update(&mut camera, Vec2::new(760.0, 360.0), Vec2::new(1280.0, 720.0));
        assert_eq!(camera.position, Vec2::new(70.0, 0.0));
    }
}
