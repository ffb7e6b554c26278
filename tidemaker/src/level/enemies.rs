//! Enemy behaviors: the patrolling tooth, the shooting shell and its pearls.

use std::time::Duration;

use crate::{
    assets::FrameSet,
    level::{
        components::Visual,
        physics,
        player::Facing,
    },
    math::{Rect, Vec2},
    settings::ShellSettings,
    timer::Timer,
};

/// Walks along a ledge and turns at gaps and walls.
#[derive(Clone, Debug)]
pub struct Patrol {
    direction: Facing,
    speed: f32,
    /// Left edge as a float; the rect holds the rounded value.
    x: f32,
    left: FrameSet,
    right: FrameSet,
}

impl Patrol {
    pub fn new(direction: Facing, speed: f32, x: f32, left: FrameSet, right: FrameSet) -> Self {
        Self {
            direction,
            speed,
            x,
            left,
            right,
        }
    }

    pub fn direction(&self) -> Facing {
        self.direction
    }

    /// Frames for the current walking direction.
    pub fn frames(&self) -> &FrameSet {
        match self.direction {
            Facing::Left => &self.left,
            Facing::Right => &self.right,
        }
    }

    /// Turn if needed, then move `rect` along the ground.
    pub fn step(&mut self, rect: &mut Rect, dt: f32, colliders: &[Rect]) {
        let (gap, block) = match self.direction {
            Facing::Right => (rect.bottom_right() + Vec2::new(1.0, 1.0), rect.mid_right() + Vec2::new(1.0, 0.0)),
            Facing::Left => (rect.bottom_left() + Vec2::new(-1.0, 1.0), rect.mid_left() + Vec2::new(-1.0, 0.0)),
        };
        if !physics::point_blocked(gap, colliders) || physics::point_blocked(block, colliders) {
            self.direction = match self.direction {
                Facing::Left => Facing::Right,
                Facing::Right => Facing::Left,
            };
        }

        self.x += self.direction.sign() * self.speed * dt;
        rect.set_left(self.x.round());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellStatus {
    Idle,
    Attack,
}

/// A pearl the shell wants to fire this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub top_left: Vec2,
    pub direction: Facing,
}

/// Stationary attacker that fires pearls at a player in range.
#[derive(Clone, Debug)]
pub struct Shooter {
    facing: Facing,
    status: ShellStatus,
    cooldown: Timer,
    has_shot: bool,
    idle: FrameSet,
    attack: FrameSet,
}

impl Shooter {
    pub fn new(facing: Facing, idle: FrameSet, attack: FrameSet, settings: &ShellSettings) -> Self {
        Self {
            facing,
            status: ShellStatus::Idle,
            cooldown: Timer::from_millis(settings.cooldown_ms),
            has_shot: false,
            idle,
            attack,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn status(&self) -> ShellStatus {
        self.status
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_active()
    }

    fn frames(&self) -> &FrameSet {
        match self.status {
            ShellStatus::Idle => &self.idle,
            ShellStatus::Attack => &self.attack,
        }
    }

    /// Pick a status, advance the animation and maybe fire.
    pub fn update(
        &mut self,
        rect: &Rect,
        visual: &mut Visual,
        target_x: f32,
        step: f32,
        now: Duration,
        settings: &ShellSettings,
    ) -> Option<Shot> {
        self.status = if (target_x - rect.center_x()).abs() <= settings.range && !self.cooldown.is_active() {
            ShellStatus::Attack
        } else {
            ShellStatus::Idle
        };

        visual.frames = self.frames().clone();
        visual.index += step;
        if visual.index >= visual.frames.len() as f32 {
            visual.index = 0.0;
            if self.has_shot {
                self.cooldown.activate(now);
                self.has_shot = false;
            }
        }

        let mut shot = None;
        if self.status == ShellStatus::Attack && !self.has_shot && visual.index as usize == settings.fire_frame {
            let muzzle = match self.facing {
                Facing::Left => Vec2::new(-50.0, -10.0),
                Facing::Right => Vec2::new(20.0, -10.0),
            };
            shot = Some(Shot {
                top_left: rect.center() + muzzle,
                direction: self.facing,
            });
            self.has_shot = true;
        }

        self.cooldown.update(now);
        shot
    }
}

/// Straight-flying pearl with a limited lifetime.
#[derive(Clone, Debug)]
pub struct Projectile {
    direction: Facing,
    speed: f32,
    x: f32,
    lifetime: Timer,
}

impl Projectile {
    pub fn new(direction: Facing, x: f32, now: Duration, settings: &ShellSettings) -> Self {
        let mut lifetime = Timer::from_millis(settings.pearl_lifetime_ms);
        lifetime.activate(now);
        Self {
            direction,
            speed: settings.pearl_speed,
            x,
            lifetime,
        }
    }

    /// Move `rect`. Returns false once the lifetime has run out.
    pub fn step(&mut self, rect: &mut Rect, dt: f32, now: Duration) -> bool {
        self.x += self.direction.sign() * self.speed * dt;
        rect.set_left(self.x.round());
        self.lifetime.update(now);
        self.lifetime.is_active()
    }
}
