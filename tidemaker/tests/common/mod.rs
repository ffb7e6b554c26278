#![allow(dead_code)]

use tidemaker::{
    level::player::{Facing, PlayerFrames, Status},
    AssetManager, Editor, Frame, FrameSet, InputState, MouseButton, Settings, SoundId, SoundPlayer, TypeRegistry,
    Vec2,
};

pub const TILE: f32 = 64.0;
pub const DT: f32 = 1.0 / 60.0;

pub fn solid(w: u32, h: u32, frames: usize) -> FrameSet {
    FrameSet::new(vec![Frame::solid(w, h, [200, 120, 80, 255]); frames]).expect("at least one frame")
}

/// Every frame set the editor and the level ask for, as opaque rectangles.
pub fn test_assets() -> AssetManager {
    let mut assets = AssetManager::new();

    for status in Status::ALL {
        for facing in Facing::ALL {
            assets.insert_frames(PlayerFrames::key(status, facing), solid(64, 64, 4));
        }
    }
    assets.insert_frames("sky_handle", solid(40, 40, 1));

    for variant in ["X", "C", "G", "CG", "AC", "AG", "ACG"] {
        assets.insert_frames(format!("land/{variant}"), solid(64, 64, 1));
    }
    assets.insert_frames("water/top", solid(64, 64, 4));
    assets.insert_frames("water/bottom", solid(64, 64, 1));

    for coin in ["gold", "silver", "diamond"] {
        assets.insert_frames(format!("coin/{coin}"), solid(16, 16, 4));
    }
    assets.insert_frames("particle", solid(24, 24, 3));

    assets.insert_frames("spikes", solid(64, 32, 1));
    for key in ["tooth/idle", "tooth/run_left", "tooth/run_right"] {
        assets.insert_frames(key, solid(48, 48, 4));
    }
    for side in ["shell_left", "shell_right"] {
        assets.insert_frames(format!("{side}/idle"), solid(64, 38, 1));
        assets.insert_frames(format!("{side}/attack"), solid(64, 38, 4));
    }
    assets.insert_frames("pearl", solid(12, 12, 1));

    for palm in ["small", "large", "left", "right"] {
        assets.insert_frames(format!("palm/{palm}_fg"), solid(64, 96, 4));
        assets.insert_frames(format!("palm/{palm}_bg"), solid(64, 96, 4));
    }

    let previews = [
        "land", "water", "gold", "silver", "diamond", "spikes", "tooth", "shell_left", "shell_right", "small_fg",
        "large_fg", "left_fg", "right_fg", "small_bg", "large_bg", "left_bg", "right_bg",
    ];
    for preview in previews {
        assets.insert_frames(format!("preview/{preview}"), solid(32, 32, 1));
    }
    assets
}

pub fn test_settings() -> Settings {
    Settings {
        seed: Some(7),
        ..Settings::default()
    }
}

pub fn editor() -> Editor {
    Editor::new(TypeRegistry::builtin(), test_settings(), &test_assets()).expect("editor builds")
}

/// Screen position of the center of `cell` while the origin is at zero.
pub fn cell_center(col: i32, row: i32) -> Vec2 {
    Vec2::new(col as f32 * TILE + TILE / 2.0, row as f32 * TILE + TILE / 2.0)
}

/// Drives an [`Editor`] the way the engine would, one frame per call.
pub struct Driver {
    pub input: InputState,
}

impl Driver {
    pub fn new() -> Self {
        Self { input: InputState::new() }
    }

    pub fn tick(&mut self, editor: &mut Editor) {
        editor.update(DT, &self.input).expect("editor tick");
        self.input.begin_frame();
    }

    /// Press and release `button` at `point`, two frames.
    pub fn click(&mut self, editor: &mut Editor, point: Vec2, button: MouseButton) {
        self.input.set_mouse_position(point);
        self.input.press_mouse(button);
        self.tick(editor);
        self.input.release_mouse(button);
        self.tick(editor);
    }

    pub fn click_cell(&mut self, editor: &mut Editor, col: i32, row: i32) {
        self.click(editor, cell_center(col, row), MouseButton::Left);
    }
}

/// Records every sound request.
#[derive(Default)]
pub struct RecordingAudio {
    pub played: Vec<SoundId>,
    pub stopped: Vec<SoundId>,
}

impl RecordingAudio {
    pub fn count(&self, sound: SoundId) -> usize {
        self.played.iter().filter(|&&played| played == sound).count()
    }
}

impl SoundPlayer for RecordingAudio {
    fn play(&mut self, sound: SoundId) {
        self.played.push(sound);
    }

    fn stop(&mut self, sound: SoundId) {
        self.stopped.push(sound);
    }
}
