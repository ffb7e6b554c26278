//! Turns export layers into a populated [`Level`].

use std::time::Duration;

use crate::{
    assets::{AssetManager, FrameSet},
    camera::CameraFollow,
    error::BuildError,
    export::{ExportLayers, PixelPos, WaterPosition},
    level::{
        components::{Body, Coin, Collider, Damaging, Depth, Hidden, Kind, Playback, Visual},
        enemies::{Patrol, Shooter},
        physics,
        player::{Facing, Player, PlayerFrames},
        Level,
    },
    math::{Camera2D, Rect, Vec2},
    registry::{EnemyKind, Marker, PalmKind, Style, TileId, TypeRegistry},
    settings::Settings,
    world::{EntityId, World},
};

fn to_vec(pos: PixelPos) -> Vec2 {
    Vec2::new(pos.0 as f32, pos.1 as f32)
}

/// Frame set named by the registry entry for `id`.
fn registry_frames(registry: &TypeRegistry, assets: &AssetManager, id: TileId) -> Result<FrameSet, BuildError> {
    let entry = registry.get(id)?;
    let key = entry.frames.as_deref().ok_or_else(|| BuildError::MissingFrames(format!("tile {id}")))?;
    assets.frames(key)
}

struct Spawner<'a> {
    world: World,
    registry: &'a TypeRegistry,
    assets: &'a AssetManager,
    settings: &'a Settings,
    rng: fastrand::Rng,
    player: Option<Player>,
    horizon_y: Option<f32>,
}

impl<'a> Spawner<'a> {
    fn sprite(&mut self, kind: Kind, rect: Rect, depth: Depth, visual: Visual) -> EntityId {
        let entity = self.world.spawn();
        self.world.insert(entity, kind);
        self.world.insert(entity, Body::new(rect, depth));
        self.world.insert(entity, visual);
        entity
    }

    fn colliders(&self) -> Vec<Rect> {
        self.world
            .query::<Collider>()
            .into_iter()
            .filter_map(|(entity, _)| self.world.get::<Body>(entity).map(|body| body.rect))
            .collect()
    }

    fn water(&mut self, pos: Vec2, position: WaterPosition) -> Result<(), BuildError> {
        let visual = match position {
            WaterPosition::Top => Visual::new(self.assets.frames("water/top")?, Playback::Loop),
            WaterPosition::Bottom => Visual::new(self.assets.frames("water/bottom")?, Playback::Still),
        };
        let rect = Rect::from_top_left(pos, visual.frames.first().size());
        self.sprite(Kind::Water, rect, Depth::Water, visual);
        Ok(())
    }

    fn terrain(&mut self, pos: Vec2, variant: &str) -> Result<(), BuildError> {
        let frames = self.assets.frames(&format!("land/{variant}"))?;
        let rect = Rect::from_top_left(pos, frames.first().size());
        let entity = self.sprite(Kind::Terrain, rect, Depth::Main, Visual::new(frames, Playback::Still));
        self.world.insert(entity, Collider);
        Ok(())
    }

    fn enemy(&mut self, pos: Vec2, id: TileId) -> Result<(), BuildError> {
        let Style::Enemy(kind) = self.registry.style(id)? else {
            log::warn!("Tile {id} in the enemy layer is not an enemy, skipping");
            return Ok(());
        };
        let tile = self.settings.tile_size;
        let anchored = |frames: &FrameSet| {
            let mut rect = Rect::from_top_left(pos, frames.first().size());
            rect.set_bottom(pos.y + tile);
            rect
        };

        match kind {
            EnemyKind::Spikes => {
                let frames = registry_frames(self.registry, self.assets, id)?;
                let rect = anchored(&frames);
                let entity = self.sprite(Kind::Spikes, rect, Depth::Main, Visual::new(frames, Playback::Still));
                self.world.insert(entity, Damaging);
            }
            EnemyKind::Tooth => {
                let left = self.assets.frames("tooth/run_left")?;
                let right = self.assets.frames("tooth/run_right")?;
                let rect = anchored(&right);

                let probe = rect.mid_bottom() + Vec2::new(0.0, self.settings.tooth.ground_probe);
                if !physics::point_blocked(probe, &self.colliders()) {
                    log::debug!("Tooth at {pos} has no ground below, dropping it");
                    return Ok(());
                }

                let direction = if self.rng.bool() { Facing::Right } else { Facing::Left };
                let patrol = Patrol::new(direction, self.settings.tooth.speed, rect.x, left, right);
                let visual = Visual::new(patrol.frames().clone(), Playback::Loop);
                let entity = self.sprite(Kind::Tooth, rect, Depth::Main, visual);
                self.world.insert(entity, Damaging);
                self.world.insert(entity, patrol);
            }
            EnemyKind::ShellLeft | EnemyKind::ShellRight => {
                let (facing, prefix) = if kind == EnemyKind::ShellLeft {
                    (Facing::Left, "shell_left")
                } else {
                    (Facing::Right, "shell_right")
                };
                let idle = self.assets.frames(&format!("{prefix}/idle"))?;
                let attack = self.assets.frames(&format!("{prefix}/attack"))?;
                let rect = anchored(&idle);
                let visual = Visual::new(idle.clone(), Playback::Manual);
                let entity = self.sprite(Kind::Shell, rect, Depth::Main, visual);
                self.world.insert(entity, Collider);
                self.world.insert(entity, Shooter::new(facing, idle, attack, &self.settings.shell));
            }
        }
        Ok(())
    }

    fn coin(&mut self, pos: Vec2, id: TileId) -> Result<(), BuildError> {
        let Style::Coin(kind) = self.registry.style(id)? else {
            log::warn!("Tile {id} in the coin layer is not a coin, skipping");
            return Ok(());
        };
        let frames = registry_frames(self.registry, self.assets, id)?;
        let rect = Rect::from_center(pos, frames.first().size());
        let entity = self.sprite(Kind::Coin, rect, Depth::Main, Visual::new(frames, Playback::Loop));
        self.world.insert(entity, Coin(kind));
        Ok(())
    }

    fn decoration(&mut self, pos: Vec2, id: TileId) -> Result<(), BuildError> {
        match self.registry.style(id)? {
            Style::Marker(Marker::Player) => {
                let frames = PlayerFrames::load(self.assets)?;
                self.player = Some(Player::new(pos, frames, &self.settings.player));
            }
            Style::Marker(Marker::Sky) => self.horizon_y = Some(pos.y),
            Style::DecorationFg(palm) => {
                self.palm(pos, id, Depth::Main)?;
                let trunk = &self.settings.palm_trunk;
                let shift = if palm == PalmKind::Right { trunk.right_shift } else { 0.0 };
                let rect = Rect::new(pos.x + shift, pos.y, trunk.width, trunk.height);

                let entity = self.world.spawn();
                self.world.insert(entity, Kind::Trunk);
                self.world.insert(entity, Body::new(rect, Depth::Main));
                self.world.insert(entity, Collider);
                self.world.insert(entity, Hidden);
            }
            Style::DecorationBg(_) => self.palm(pos, id, Depth::Background)?,
            other => log::warn!("Tile {id} ({other:?}) in a decoration layer, skipping"),
        }
        Ok(())
    }

    fn palm(&mut self, pos: Vec2, id: TileId, depth: Depth) -> Result<(), BuildError> {
        let frames = registry_frames(self.registry, self.assets, id)?;
        let rect = Rect::from_top_left(pos, frames.first().size());
        self.sprite(Kind::Palm, rect, depth, Visual::new(frames, Playback::Loop));
        Ok(())
    }
}

impl Level {
    /// Instantiate every export entry.
    ///
    /// Layers are processed in the order water, background decoration,
    /// terrain, enemies, coins, foreground decoration. A tooth only sees
    /// colliders that exist by the time it spawns.
    pub fn build(
        layers: &ExportLayers,
        registry: &TypeRegistry,
        assets: &AssetManager,
        settings: &Settings,
        screen_size: Vec2,
    ) -> Result<Level, BuildError> {
        let players = layers.decoration_fg.values().filter(|&&id| id == TileId::PLAYER).count();
        match players {
            0 => return Err(BuildError::MissingPlayer),
            1 => {}
            count => return Err(BuildError::DuplicatePlayer { count }),
        }
        if !layers.decoration_fg.values().any(|&id| id == TileId::SKY) {
            return Err(BuildError::MissingHorizon);
        }

        let rng = match settings.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let mut spawner = Spawner {
            world: World::new(),
            registry,
            assets,
            settings,
            rng,
            player: None,
            horizon_y: None,
        };

        for (&pos, &position) in &layers.water {
            spawner.water(to_vec(pos), position)?;
        }
        for (&pos, &id) in &layers.decoration_bg {
            spawner.decoration(to_vec(pos), id)?;
        }
        for (&pos, variant) in &layers.terrain {
            spawner.terrain(to_vec(pos), variant)?;
        }
        for (&pos, &id) in &layers.enemies {
            spawner.enemy(to_vec(pos), id)?;
        }
        for (&pos, &id) in &layers.coins {
            spawner.coin(to_vec(pos), id)?;
        }
        for (&pos, &id) in &layers.decoration_fg {
            spawner.decoration(to_vec(pos), id)?;
        }

        let Spawner { world, player, horizon_y, .. } = spawner;
        let player = player.ok_or(BuildError::MissingPlayer)?;
        let horizon_y = horizon_y.ok_or(BuildError::MissingHorizon)?;

        let mut level = Level {
            world,
            player,
            horizon_y,
            camera: Camera2D::default(),
            follow: CameraFollow::new(),
            clock: Duration::ZERO,
            settings: settings.clone(),
            particle: assets.frames("particle")?,
            pearl: assets.frames("pearl")?,
            screen_size,
            coins_collected: 0,
        };
        level.follow_player();

        log::info!(
            "Built level with {} entities ({} colliders), horizon at {}",
            level.world.len(),
            level.colliders().len(),
            level.horizon_y
        );
        Ok(level)
    }
}
