//! Axis-separated AABB resolution against static colliders.

use crate::math::{Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Clamp the leading edge of `hitbox` against every collider it overlaps.
///
/// `velocity` is the direction the box just moved in. A vertical clamp zeroes
/// `velocity.y`; horizontal velocity is left alone since it comes from input.
pub fn resolve_axis(hitbox: &mut Rect, velocity: &mut Vec2, colliders: &[Rect], axis: Axis) {
    for collider in colliders {
        if !collider.overlaps(hitbox) {
            continue;
        }
        match axis {
            Axis::Horizontal => {
                if velocity.x > 0.0 {
                    hitbox.set_right(collider.left());
                }
                if velocity.x < 0.0 {
                    hitbox.set_left(collider.right());
                }
            }
            Axis::Vertical => {
                if velocity.y < 0.0 {
                    hitbox.set_top(collider.bottom());
                }
                if velocity.y > 0.0 {
                    hitbox.set_bottom(collider.top());
                }
                velocity.y = 0.0;
            }
        }
    }
}

/// True when a strip of `probe_height` pixels under `hitbox` touches a collider.
pub fn on_floor(hitbox: &Rect, colliders: &[Rect], probe_height: f32) -> bool {
    let probe = Rect::new(hitbox.left(), hitbox.bottom(), hitbox.w, probe_height);
    colliders.iter().any(|collider| collider.overlaps(&probe))
}

/// True when `point` lies inside any collider.
pub fn point_blocked(point: Vec2, colliders: &[Rect]) -> bool {
    colliders.iter().any(|collider| collider.contains(point))
}
