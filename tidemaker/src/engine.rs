use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::Window,
};

use crate::{
    assets::AssetManager,
    audio::{AudioSystem, SoundPlayer},
    input::InputState,
    math::Vec2,
    render::DrawList,
    state::StateMachine,
};

/// Configuration values for the engine window.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Tidemaker".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Turns a finished [`DrawList`] into pixels.
pub trait Presenter {
    /// Called once with the window before the first frame.
    fn attach(&mut self, _window: Arc<Window>) -> Result<()> {
        Ok(())
    }

    fn present(&mut self, list: &DrawList, size: (u32, u32)) -> Result<()>;
}

/// Main entrypoint for running the editor and its play sessions.
pub struct Engine {
    config: EngineConfig,
    assets: AssetManager,
    audio: Option<Box<dyn SoundPlayer>>,
    presenter: Option<Box<dyn Presenter>>,
}

impl Engine {
    /// Create a new engine instance with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            assets: AssetManager::new(),
            audio: None,
            presenter: None,
        }
    }

    /// Override the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Override the initial window size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Hand over preloaded frames.
    #[must_use]
    pub fn with_assets(mut self, assets: AssetManager) -> Self {
        self.assets = assets;
        self
    }

    /// Use `audio` instead of opening the default output device.
    #[must_use]
    pub fn with_audio(mut self, audio: Box<dyn SoundPlayer>) -> Self {
        self.audio = Some(audio);
        self
    }

    #[must_use]
    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Run the provided game until the window is closed or the game requests exit.
    pub fn run<G: Game + 'static>(self, mut game: G) -> Result<()> {
        let Engine {
            config,
            assets,
            audio,
            mut presenter,
        } = self;

        let event_loop = EventLoop::new()?;
        let mut window_attributes = Window::default_attributes();
        window_attributes.title = config.title.clone();
        window_attributes.inner_size = Some(LogicalSize::new(config.width, config.height).into());
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        if let Some(presenter) = presenter.as_mut() {
            presenter.attach(Arc::clone(&window))?;
        }

        let audio = match audio {
            Some(audio) => audio,
            // Audio initialization is graceful - engine continues even if audio fails
            None => Box::new(AudioSystem::new()?),
        };
        let mut ctx = EngineContext::new(assets, audio, Vec2::new(config.width as f32, config.height as f32));
        game.init(&mut ctx)?;

        let mut list = DrawList::new();
        let mut last_frame = Instant::now();
        event_loop.run(move |event, elwt| match event {
            Event::NewEvents(_) => {
                ctx.begin_frame();
            }
            Event::WindowEvent { event, .. } => {
                ctx.handle_window_event(&event);

                match event {
                    WindowEvent::CloseRequested => {
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        ctx.screen_size = Vec2::new(new_size.width as f32, new_size.height as f32);
                    }
                    WindowEvent::RedrawRequested => {
                        list.reset();
                        game.draw(&mut ctx, &mut list);
                        if let Some(presenter) = presenter.as_mut() {
                            let size = window.inner_size();
                            if let Err(err) = presenter.present(&list, (size.width, size.height)) {
                                log::error!("Encountered error during present: {err:?}");
                                elwt.exit();
                                return;
                            }
                        }

                        if ctx.exit_requested {
                            elwt.exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                ctx.update_time(now - last_frame);
                last_frame = now;

                if let Err(err) = game.update(&mut ctx) {
                    log::error!("Encountered error during update: {err:?}");
                    elwt.exit();
                    return;
                }

                if ctx.exit_requested {
                    elwt.exit();
                    return;
                }

                window.request_redraw();
            }
            _ => {}
        })?;

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared context provided to game code each frame.
pub struct EngineContext {
    delta_time: Duration,
    elapsed_time: Duration,
    exit_requested: bool,
    screen_size: Vec2,
    input: InputState,
    assets: AssetManager,
    audio: Box<dyn SoundPlayer>,
}

impl EngineContext {
    /// Build a context without a window. The engine does this on startup;
    /// tests use it to drive states directly.
    pub fn new(assets: AssetManager, audio: Box<dyn SoundPlayer>, screen_size: Vec2) -> Self {
        Self {
            delta_time: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            exit_requested: false,
            screen_size,
            input: InputState::new(),
            assets,
            audio,
        }
    }

    /// Clear per-frame input edges.
    pub fn begin_frame(&mut self) {
        self.input.begin_frame();
    }

    /// Record the time since the last frame.
    pub fn update_time(&mut self, delta: Duration) {
        self.delta_time = delta;
        self.elapsed_time += delta;
    }

    fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.input.handle_key(event),
            WindowEvent::MouseInput { state, button, .. } => self.input.handle_mouse_button(*button, *state),
            WindowEvent::CursorMoved { position, .. } => self.input.handle_cursor_moved(position.x, position.y),
            WindowEvent::MouseWheel { delta, .. } => self.input.handle_scroll(*delta),
            _ => {}
        }
    }

    /// Duration between the current and previous frames.
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    /// Total time elapsed since the engine started running.
    pub fn elapsed_time(&self) -> Duration {
        self.elapsed_time
    }

    /// Window size in pixels.
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// Access the current input state.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Request that the engine exit after the current frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Access the loaded frames.
    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    /// Access the audio output for playing sounds and music.
    pub fn audio(&mut self) -> &mut dyn SoundPlayer {
        self.audio.as_mut()
    }

    /// Borrow input and audio at the same time, as a level update needs both.
    pub fn input_and_audio(&mut self) -> (&InputState, &mut dyn SoundPlayer) {
        (&self.input, self.audio.as_mut())
    }
}

/// Trait implemented by user code to hook into the engine lifecycle.
pub trait Game {
    /// Called once after the window is created but before the first frame.
    fn init(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Update game state. Called once per frame before drawing.
    fn update(&mut self, ctx: &mut EngineContext) -> Result<()>;

    /// Queue the current frame into `list`. Called when a redraw is requested.
    fn draw(&mut self, ctx: &mut EngineContext, list: &mut DrawList);
}

/// Adapter to use StateMachine as a Game.
/// This allows StateMachine to be used directly with Engine::run().
impl Game for StateMachine {
    fn init(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.init_top_state(ctx)?;
        self.apply_transitions(ctx)?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext) -> Result<()> {
        // Apply pending state transitions first
        self.apply_transitions(ctx)?;
        if self.is_empty() {
            ctx.request_exit();
            return Ok(());
        }
        self.update_top(ctx)
    }

    fn draw(&mut self, _ctx: &mut EngineContext, list: &mut DrawList) {
        self.draw_top(list);
    }
}
