//! The two application states: editing the canvas and playing it.

use anyhow::Result;
use tidemaker::{DrawList, Editor, EngineContext, KeyCode, Level, SoundId, State, StateMachineLike};

pub struct EditorMode {
    editor: Editor,
}

impl EditorMode {
    pub fn new(editor: Editor) -> Self {
        Self { editor }
    }
}

impl State for EditorMode {
    fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()> {
        ctx.audio().play(SoundId::EditorMusic);
        Ok(())
    }

    fn on_resume(&mut self, ctx: &mut EngineContext) -> Result<()> {
        log::info!("Back in the editor");
        ctx.audio().play(SoundId::EditorMusic);
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, state_machine: &mut dyn StateMachineLike) -> Result<()> {
        let dt = ctx.delta_time().as_secs_f32();
        let layers = match self.editor.update(dt, ctx.input()) {
            Ok(Some(layers)) => layers,
            Ok(None) => return Ok(()),
            Err(err) => {
                log::error!("Export failed: {err}");
                return Ok(());
            }
        };

        let built = Level::build(
            &layers,
            self.editor.registry(),
            ctx.assets(),
            self.editor.settings(),
            ctx.screen_size(),
        );
        match built {
            Ok(level) => {
                log::info!("Starting playtest with {} export entries", layers.len());
                state_machine.push(Box::new(PlaytestMode::new(level)));
            }
            Err(err) => log::error!("Could not build the level: {err}"),
        }
        Ok(())
    }

    fn draw(&self, list: &mut DrawList) {
        self.editor.draw(list);
    }
}

pub struct PlaytestMode {
    level: Level,
}

impl PlaytestMode {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl State for PlaytestMode {
    fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let audio = ctx.audio();
        audio.stop(SoundId::EditorMusic);
        audio.play(SoundId::LevelMusic);
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut EngineContext) -> Result<()> {
        ctx.audio().stop(SoundId::LevelMusic);
        log::info!(
            "Playtest ended after {:.1}s with {} coins",
            self.level.clock().as_secs_f32(),
            self.level.coins_collected()
        );
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, state_machine: &mut dyn StateMachineLike) -> Result<()> {
        if ctx.input().is_key_pressed(KeyCode::Escape) {
            state_machine.pop();
            return Ok(());
        }
        let dt = ctx.delta_time().as_secs_f32();
        let (input, audio) = ctx.input_and_audio();
        self.level.update(dt, input, audio);
        Ok(())
    }

    fn draw(&self, list: &mut DrawList) {
        self.level.draw(list);
    }
}
