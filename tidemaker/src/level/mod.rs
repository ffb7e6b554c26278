//! Play session built from export layers.
//!
//! Entities live in a [`World`]; the player is held directly since there is
//! exactly one. All spawning and despawning happens inside [`Level::update`],
//! with despawns deferred to the end of the tick.

pub mod components;
pub mod enemies;
pub mod physics;
pub mod player;
mod spawn;

use std::time::Duration;

use crate::{
    assets::FrameSet,
    audio::{SoundId, SoundPlayer},
    camera::CameraFollow,
    input::InputState,
    math::{Camera2D, Rect, Vec2},
    render::{Color, DrawList},
    settings::Settings,
    world::{EntityId, World},
};
use components::{Body, Coin, Collider, Damaging, Depth, Hidden, Kind, Playback, Visual};
use enemies::{Patrol, Projectile, Shooter, Shot};
use player::Player;

pub struct Level {
    world: World,
    player: Player,
    horizon_y: f32,
    camera: Camera2D,
    follow: CameraFollow,
    clock: Duration,
    settings: Settings,
    particle: FrameSet,
    pearl: FrameSet,
    screen_size: Vec2,
    coins_collected: usize,
}

impl Level {
    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn horizon_y(&self) -> f32 {
        self.horizon_y
    }

    pub fn camera(&self) -> Camera2D {
        self.camera
    }

    /// Accumulated play time.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn coins_collected(&self) -> usize {
        self.coins_collected
    }

    /// Number of live entities of `kind`.
    pub fn count(&self, kind: Kind) -> usize {
        self.world.query::<Kind>().into_iter().filter(|(_, &k)| k == kind).count()
    }

    /// Rects of every collidable entity.
    pub fn colliders(&self) -> Vec<Rect> {
        self.world
            .query_ids::<Collider>()
            .into_iter()
            .filter_map(|entity| self.world.get::<Body>(entity).map(|body| body.rect))
            .collect()
    }

    /// Advance the session by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &InputState, audio: &mut dyn SoundPlayer) {
        self.clock += Duration::from_secs_f32(dt);
        let now = self.clock;
        let step = dt * self.settings.animation_speed;
        let colliders = self.colliders();
        let mut despawn = Vec::new();

        self.player.update(
            dt,
            now,
            input,
            &colliders,
            &self.settings.player,
            self.settings.animation_speed,
            audio,
        );

        self.update_patrols(dt, &colliders);
        let shots = self.update_shooters(step, now);
        self.update_projectiles(dt, now, &mut despawn);
        for shot in shots {
            self.spawn_pearl(shot, now);
        }
        self.animate(step, &mut despawn);
        self.collect_coins(audio, &mut despawn);
        self.apply_damage(now, audio);

        for entity in despawn {
            self.world.despawn(entity);
        }
        self.follow_player();
    }

    fn follow_player(&mut self) {
        self.follow.update(&mut self.camera, self.player.rect().center(), self.screen_size);
    }

    fn update_patrols(&mut self, dt: f32, colliders: &[Rect]) {
        for entity in self.world.query_ids::<Patrol>() {
            let Some(mut rect) = self.world.get::<Body>(entity).map(|body| body.rect) else {
                continue;
            };
            let Some(patrol) = self.world.get_mut::<Patrol>(entity) else {
                continue;
            };
            patrol.step(&mut rect, dt, colliders);
            let frames = patrol.frames().clone();

            if let Some(body) = self.world.get_mut::<Body>(entity) {
                body.rect = rect;
            }
            if let Some(visual) = self.world.get_mut::<Visual>(entity) {
                visual.frames = frames;
            }
        }
    }

    fn update_shooters(&mut self, step: f32, now: Duration) -> Vec<Shot> {
        let target_x = self.player.rect().center_x();
        let mut shots = Vec::new();
        for entity in self.world.query_ids::<Shooter>() {
            let Some(rect) = self.world.get::<Body>(entity).map(|body| body.rect) else {
                continue;
            };
            let Some(mut visual) = self.world.remove::<Visual>(entity) else {
                continue;
            };
            if let Some(shooter) = self.world.get_mut::<Shooter>(entity) {
                shots.extend(shooter.update(&rect, &mut visual, target_x, step, now, &self.settings.shell));
            }
            self.world.insert(entity, visual);
        }
        shots
    }

    fn update_projectiles(&mut self, dt: f32, now: Duration, despawn: &mut Vec<EntityId>) {
        for entity in self.world.query_ids::<Projectile>() {
            let Some(mut rect) = self.world.get::<Body>(entity).map(|body| body.rect) else {
                continue;
            };
            let Some(projectile) = self.world.get_mut::<Projectile>(entity) else {
                continue;
            };
            let alive = projectile.step(&mut rect, dt, now);
            if let Some(body) = self.world.get_mut::<Body>(entity) {
                body.rect = rect;
            }
            if !alive {
                despawn.push(entity);
            }
        }
    }

    fn spawn_pearl(&mut self, shot: Shot, now: Duration) {
        let rect = Rect::from_top_left(shot.top_left, self.pearl.first().size());
        let entity = self.world.spawn();
        self.world.insert(entity, Kind::Pearl);
        self.world.insert(entity, Body::new(rect, Depth::Main));
        self.world.insert(entity, Visual::new(self.pearl.clone(), Playback::Still));
        self.world.insert(entity, Damaging);
        self.world
            .insert(entity, Projectile::new(shot.direction, rect.x, now, &self.settings.shell));
    }

    fn animate(&mut self, step: f32, despawn: &mut Vec<EntityId>) {
        for entity in self.world.query_ids::<Visual>() {
            if let Some(visual) = self.world.get_mut::<Visual>(entity) {
                if !visual.advance(step) {
                    despawn.push(entity);
                }
            }
        }
    }

    fn collect_coins(&mut self, audio: &mut dyn SoundPlayer, despawn: &mut Vec<EntityId>) {
        let player = self.player.rect();
        let touched: Vec<(EntityId, Rect)> = self
            .world
            .query_ids::<Coin>()
            .into_iter()
            .filter(|entity| !despawn.contains(entity))
            .filter_map(|entity| self.world.get::<Body>(entity).map(|body| (entity, body.rect)))
            .filter(|(_, rect)| rect.overlaps(&player))
            .collect();

        for (entity, rect) in touched {
            despawn.push(entity);
            self.coins_collected += 1;
            audio.play(SoundId::Coin);

            let particle = self.world.spawn();
            self.world.insert(particle, Kind::Particle);
            self.world.insert(
                particle,
                Body::new(Rect::from_center(rect.center(), self.particle.first().size()), Depth::Main),
            );
            self.world.insert(particle, Visual::new(self.particle.clone(), Playback::Once));
            log::debug!("Coin collected, {} so far", self.coins_collected);
        }
    }

    fn apply_damage(&mut self, now: Duration, audio: &mut dyn SoundPlayer) {
        let player_rect = self.player.rect();
        let player_mask = self.player.frame().mask();

        let hit = self.world.query_ids::<Damaging>().into_iter().any(|entity| {
            let (Some(body), Some(visual)) = (self.world.get::<Body>(entity), self.world.get::<Visual>(entity)) else {
                return false;
            };
            if !body.rect.overlaps(&player_rect) {
                return false;
            }
            let offset = body.rect.top_left() - player_rect.top_left();
            let mask = visual.frames.frame(visual.index).mask();
            player_mask.overlaps(mask, (offset.x.round() as i32, offset.y.round() as i32))
        });

        if hit && self.player.damage(now, self.settings.player.knockback) {
            audio.play(SoundId::Hit);
            log::debug!("Player hit at {:?}", player_rect.center());
        }
    }

    /// Queue this frame's sky, horizon, sprites and player.
    pub fn draw(&self, list: &mut DrawList) {
        list.clear(Color::SKY);
        self.draw_horizon(list);

        for depth in Depth::ALL {
            for (entity, body) in self.world.query::<Body>() {
                if body.depth != depth || self.world.has::<Hidden>(entity) {
                    continue;
                }
                if let Some(visual) = self.world.get::<Visual>(entity) {
                    let position = self.camera.world_to_screen(body.rect.top_left());
                    list.sprite(visual.frames.frame(visual.index), position);
                }
            }
        }

        let position = self.camera.world_to_screen(self.player.rect().top_left());
        list.sprite_with(self.player.frame(), position, 255, self.player.is_invulnerable());
    }

    fn draw_horizon(&self, list: &mut DrawList) {
        let width = self.screen_size.x;
        let height = self.screen_size.y;
        let y = self.horizon_y - self.camera.position.y;

        if y < height {
            list.fill_rect(Rect::new(0.0, y, width, height - y), Color::SEA);
        }
        if y > 0.0 {
            list.fill_rect(Rect::new(0.0, y, width, 3.0), Color::HORIZON);
            list.fill_rect(Rect::new(0.0, y - 10.0, width, 10.0), Color::HORIZON_TOP);
            list.fill_rect(Rect::new(0.0, y - 16.0, width, 4.0), Color::HORIZON_TOP);
            list.fill_rect(Rect::new(0.0, y - 20.0, width, 2.0), Color::HORIZON_TOP);
        }
        if y < 0.0 {
            list.clear(Color::SEA);
        }
    }
}
