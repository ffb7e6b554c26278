mod modes;
mod presenter;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tidemaker::{AssetManager, AudioSystem, Editor, Engine, Settings, SoundId, StateMachine, TypeRegistry};

use crate::{modes::EditorMode, presenter::PixelsPresenter};

const SETTINGS_FILE: &str = "settings.json";

fn load_sounds(root: &Path, settings: &Settings) -> Result<AudioSystem> {
    let mut audio = AudioSystem::new()?;
    let volumes = &settings.audio;
    let clips = [
        (SoundId::EditorMusic, "Explorer.ogg", volumes.music_volume),
        (SoundId::LevelMusic, "SuperHero.ogg", volumes.music_volume),
        (SoundId::Coin, "coin.wav", volumes.effect_volume),
        (SoundId::Hit, "hit.wav", volumes.effect_volume),
        (SoundId::Jump, "jump.wav", volumes.jump_volume),
    ];
    for (id, file, volume) in clips {
        if let Err(err) = audio.load_clip(id, root.join("audio").join(file), volume) {
            log::warn!("{err:#}, {id:?} will be silent");
        }
    }
    Ok(audio)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let root = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    log::info!("Tidemaker starting with assets from {}", root.display());

    let settings = Settings::load_or_default(root.join(SETTINGS_FILE))?;
    let registry = TypeRegistry::builtin();

    let mut assets = AssetManager::new();
    assets
        .load_game_assets(&root)
        .with_context(|| format!("Failed to load graphics under {}", root.display()))?;
    let audio = load_sounds(&root, &settings)?;

    let editor = Editor::new(registry, settings.clone(), &assets).context("Failed to set up the editor")?;
    let states = StateMachine::with_initial_state(Box::new(EditorMode::new(editor)));

    Engine::new()
        .with_title(settings.window.title.clone())
        .with_size(settings.window.width, settings.window.height)
        .with_assets(assets)
        .with_audio(Box::new(audio))
        .with_presenter(Box::new(PixelsPresenter::new()))
        .run(states)
}
