use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use pixels::{Pixels, SurfaceTexture};
use tidemaker::{rasterize, DrawList, Presenter};
use winit::window::Window;

const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Software presenter: rasterizes each draw list into a `pixels` surface.
pub struct PixelsPresenter {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    size: (u32, u32),
    frames: u64,
    last_report: Instant,
}

impl PixelsPresenter {
    pub fn new() -> Self {
        Self {
            window: None,
            pixels: None,
            size: (0, 0),
            frames: 0,
            last_report: Instant::now(),
        }
    }

    fn build_pixels(window: Arc<Window>, width: u32, height: u32) -> Result<Pixels<'static>> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface).context("Failed to create the pixel surface")
    }

    fn report(&mut self, list: &DrawList) {
        self.frames += 1;
        let elapsed = self.last_report.elapsed();
        if elapsed >= REPORT_INTERVAL {
            log::debug!(
                "{:.1} fps at {}x{}, last frame had {} commands ({} sprites)",
                self.frames as f64 / elapsed.as_secs_f64(),
                self.size.0,
                self.size.1,
                list.len(),
                list.sprite_count()
            );
            self.frames = 0;
            self.last_report = Instant::now();
        }
    }
}

impl Presenter for PixelsPresenter {
    fn attach(&mut self, window: Arc<Window>) -> Result<()> {
        let size = window.inner_size();
        self.pixels = Some(Self::build_pixels(Arc::clone(&window), size.width, size.height)?);
        self.size = (size.width, size.height);
        self.window = Some(window);
        Ok(())
    }

    fn present(&mut self, list: &DrawList, size: (u32, u32)) -> Result<()> {
        if size.0 == 0 || size.1 == 0 {
            return Ok(());
        }
        if size != self.size {
            let window = self.window.clone().ok_or_else(|| anyhow!("Presenter used before attach"))?;
            self.pixels = Some(Self::build_pixels(window, size.0, size.1)?);
            self.size = size;
        }
        let pixels = self.pixels.as_mut().ok_or_else(|| anyhow!("Presenter used before attach"))?;

        rasterize(list, pixels.frame_mut(), size.0, size.1);
        pixels.render().context("Failed to present the frame")?;
        self.report(list);
        Ok(())
    }
}
