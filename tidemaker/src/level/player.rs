//! The player character: input, gravity, collision and animation.

use std::{fmt, time::Duration};

use crate::{
    assets::{AssetManager, Frame, FrameSet},
    audio::{SoundId, SoundPlayer},
    error::BuildError,
    input::InputState,
    level::physics::{self, Axis},
    math::{Rect, Vec2},
    settings::PlayerSettings,
    timer::Timer,
    KeyCode,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Idle,
    Run,
    Jump,
    Fall,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Idle, Status::Run, Status::Jump, Status::Fall];

    fn name(self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Run => "run",
            Status::Jump => "jump",
            Status::Fall => "fall",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub const ALL: [Facing; 2] = [Facing::Left, Facing::Right];

    fn name(self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    /// `-1.0` for left, `1.0` for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// One frame set per status and facing.
#[derive(Clone, Debug)]
pub struct PlayerFrames {
    sets: [[FrameSet; 2]; 4],
}

impl PlayerFrames {
    /// Load `player/<status>_<facing>` for every combination.
    pub fn load(assets: &AssetManager) -> Result<Self, BuildError> {
        let load = |status: Status| -> Result<[FrameSet; 2], BuildError> {
            Ok([
                assets.frames(&Self::key(status, Facing::Left))?,
                assets.frames(&Self::key(status, Facing::Right))?,
            ])
        };
        Ok(Self {
            sets: [
                load(Status::Idle)?,
                load(Status::Run)?,
                load(Status::Jump)?,
                load(Status::Fall)?,
            ],
        })
    }

    pub fn key(status: Status, facing: Facing) -> String {
        format!("player/{}_{}", status.name(), facing.name())
    }

    fn get(&self, status: Status, facing: Facing) -> &FrameSet {
        &self.sets[status as usize][facing as usize]
    }
}

/// Player state. `rect` keeps the size of the first idle frame for the whole session.
#[derive(Clone, Debug)]
pub struct Player {
    rect: Rect,
    hitbox: Rect,
    /// Hit-box center, kept as floats between rounded moves.
    pos: Vec2,
    direction: Vec2,
    on_floor: bool,
    status: Status,
    facing: Facing,
    invulnerable: Timer,
    frames: PlayerFrames,
    frame_index: f32,
}

impl Player {
    /// Place the player with its top-left at `top_left`.
    pub fn new(top_left: Vec2, frames: PlayerFrames, settings: &PlayerSettings) -> Self {
        let size = frames.get(Status::Idle, Facing::Right).first().size();
        let rect = Rect::from_top_left(top_left, size);
        let hitbox = rect.inflate(-settings.hitbox_inset, 0.0);

        Self {
            rect,
            hitbox,
            pos: hitbox.center(),
            direction: Vec2::ZERO,
            on_floor: false,
            status: Status::Idle,
            facing: Facing::Right,
            invulnerable: Timer::from_millis(settings.invulnerability_ms),
            frames,
            frame_index: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_on_floor(&self) -> bool {
        self.on_floor
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable.is_active()
    }

    /// Frame currently shown.
    pub fn frame(&self) -> &Frame {
        self.frames.get(self.status, self.facing).frame(self.frame_index)
    }

    /// Take a hit. Ignored while invulnerable.
    ///
    /// Returns true when the hit registered.
    pub fn damage(&mut self, now: Duration, knockback: f32) -> bool {
        if self.invulnerable.is_active() {
            return false;
        }
        self.invulnerable.activate(now);
        self.direction.y -= knockback;
        true
    }

    /// Run one tick.
    pub fn update(
        &mut self,
        dt: f32,
        now: Duration,
        input: &InputState,
        colliders: &[Rect],
        settings: &PlayerSettings,
        animation_speed: f32,
        audio: &mut dyn SoundPlayer,
    ) {
        self.read_input(input, settings, audio);
        self.direction.y += settings.gravity * dt;
        self.on_floor = physics::on_floor(&self.hitbox, colliders, settings.floor_probe_height);
        self.move_axis(Axis::Horizontal, dt, colliders, settings.speed);
        self.move_axis(Axis::Vertical, dt, colliders, settings.speed);
        self.invulnerable.update(now);
        self.status = self.next_status();
        self.animate(dt * animation_speed);
    }

    fn read_input(&mut self, input: &InputState, settings: &PlayerSettings, audio: &mut dyn SoundPlayer) {
        if input.is_key_down(KeyCode::ArrowRight) {
            self.direction.x = 1.0;
            self.facing = Facing::Right;
        } else if input.is_key_down(KeyCode::ArrowLeft) {
            self.direction.x = -1.0;
            self.facing = Facing::Left;
        } else {
            self.direction.x = 0.0;
        }

        if input.is_key_down(KeyCode::ArrowUp) && self.on_floor {
            self.direction.y = settings.jump;
            audio.play(SoundId::Jump);
        }
    }

    fn move_axis(&mut self, axis: Axis, dt: f32, colliders: &[Rect], speed: f32) {
        match axis {
            Axis::Horizontal => {
                self.pos.x += self.direction.x * speed * dt;
                self.hitbox.set_center_x(self.pos.x.round());
            }
            Axis::Vertical => {
                self.pos.y += self.direction.y * speed * dt;
                self.hitbox.set_center_y(self.pos.y.round());
            }
        }

        let before = self.hitbox;
        physics::resolve_axis(&mut self.hitbox, &mut self.direction, colliders, axis);
        match axis {
            Axis::Horizontal if self.hitbox != before => self.pos.x = self.hitbox.center_x(),
            Axis::Vertical if self.hitbox != before => self.pos.y = self.hitbox.center_y(),
            _ => {}
        }
        self.rect.set_center_x(self.hitbox.center_x());
        self.rect.set_center_y(self.hitbox.center_y());
    }

    fn next_status(&self) -> Status {
        if self.direction.y < 0.0 {
            Status::Jump
        } else if self.direction.y > 0.0 && !self.on_floor {
            Status::Fall
        } else if self.direction.x != 0.0 {
            Status::Run
        } else {
            Status::Idle
        }
    }

    fn animate(&mut self, step: f32) {
        let len = self.frames.get(self.status, self.facing).len();
        self.frame_index += step;
        if self.frame_index >= len as f32 {
            self.frame_index = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl SoundPlayer for Silent {
        fn play(&mut self, _sound: SoundId) {}
        fn stop(&mut self, _sound: SoundId) {}
    }

    fn frames() -> PlayerFrames {
        let mut assets = AssetManager::new();
        for status in Status::ALL {
            for facing in Facing::ALL {
                assets.insert_frames(PlayerFrames::key(status, facing), FrameSet::single(Frame::solid(64, 64, [255; 4])));
            }
        }
        PlayerFrames::load(&assets).unwrap()
    }

    #[test]
    fn test_hitbox_is_inset() {
        let player = Player::new(Vec2::ZERO, frames(), &PlayerSettings::default());
        assert_eq!(player.hitbox(), Rect::new(25.0, 0.0, 14.0, 64.0));
    }

    #[test]
    fn test_falls_without_ground() {
        let settings = PlayerSettings::default();
        let mut player = Player::new(Vec2::ZERO, frames(), &settings);
        let input = InputState::new();
        player.update(0.1, Duration::ZERO, &input, &[], &settings, 8.0, &mut Silent);
        assert_eq!(player.status(), Status::Fall);
        assert!(player.rect().top() > 0.0);
    }

    #[test]
    fn test_damage_respects_invulnerability() {
        let settings = PlayerSettings::default();
        let mut player = Player::new(Vec2::ZERO, frames(), &settings);

        assert!(player.damage(Duration::ZERO, 1.5));
        assert!(!player.damage(Duration::from_millis(100), 1.5));
        assert_eq!(player.direction().y, -1.5);

        let input = InputState::new();
        player.update(0.0, Duration::from_millis(250), &input, &[], &settings, 8.0, &mut Silent);
        assert!(!player.is_invulnerable());
        assert!(player.damage(Duration::from_millis(250), 1.5));
    }

    #[test]
    fn test_jump_requires_floor() {
        let settings = PlayerSettings::default();
        let ground = Rect::new(-100.0, 64.0, 300.0, 64.0);
        let mut player = Player::new(Vec2::ZERO, frames(), &settings);
        let mut input = InputState::new();
        input.press_key(KeyCode::ArrowUp);

        // First tick: not yet known to be grounded.
        player.update(1.0 / 60.0, Duration::ZERO, &input, &[ground], &settings, 8.0, &mut Silent);
        assert_eq!(player.status(), Status::Idle);
        assert!(player.is_on_floor());

        player.update(1.0 / 60.0, Duration::ZERO, &input, &[ground], &settings, 8.0, &mut Silent);
        assert_eq!(player.status(), Status::Jump);
    }
}
