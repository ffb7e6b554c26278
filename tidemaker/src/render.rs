//! Backend-agnostic draw commands.
//!
//! The editor and the level describe a frame as a [`DrawList`]; a
//! [`crate::engine::Presenter`] turns the list into pixels, usually through
//! [`rasterize`].

use crate::{
    assets::Frame,
    math::{Rect, Vec2},
};

/// RGBA color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const SKY: Color = Color::rgb(0xdd, 0xc6, 0xa1);
    pub const SEA: Color = Color::rgb(0x92, 0xa9, 0xce);
    pub const HORIZON: Color = Color::rgb(0xf5, 0xf1, 0xde);
    pub const HORIZON_TOP: Color = Color::rgb(0xd1, 0xaa, 0x9d);
    pub const BUTTON_BG: Color = Color::rgb(0x33, 0x32, 0x3d);
    pub const BUTTON_LINE: Color = Color::rgb(0xf5, 0xf1, 0xde);
    pub const GRID_LINE: Color = Color::rgba(0, 0, 0, 30);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn with_alpha(self, alpha: u8) -> Self {
        Self {
            a: ((u16::from(self.a) * u16::from(alpha)) / 255) as u8,
            ..self
        }
    }
}

/// One drawing operation in screen space.
#[derive(Clone, Debug)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear(Color),
    Sprite {
        frame: Frame,
        position: Vec2,
        alpha: u8,
        /// Draw only the frame's mask, in white.
        silhouette: bool,
    },
    /// `width == 0.0` fills the rectangle.
    Rect { rect: Rect, color: Color, width: f32 },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
}

/// Ordered list of draw commands for one frame.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    pub fn sprite(&mut self, frame: &Frame, position: Vec2) {
        self.sprite_with(frame, position, 255, false);
    }

    pub fn sprite_with(&mut self, frame: &Frame, position: Vec2, alpha: u8, silhouette: bool) {
        self.commands.push(DrawCommand::Sprite {
            frame: frame.clone(),
            position,
            alpha,
            silhouette,
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect {
            rect,
            color,
            width: 0.0,
        });
    }

    pub fn outline_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands.push(DrawCommand::Rect { rect, color, width });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of sprite commands.
    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Sprite { .. }))
            .count()
    }
}

/// Paint `list` into `pixels`, a tightly packed RGBA8 buffer of
/// `width * height` pixels. Commands run in order with source-over blending;
/// anything outside the buffer is clipped. A buffer of the wrong length is
/// left untouched.
pub fn rasterize(list: &DrawList, pixels: &mut [u8], width: u32, height: u32) {
    if pixels.len() != width as usize * height as usize * 4 {
        log::warn!("Skipping a frame: {} bytes for a {width}x{height} surface", pixels.len());
        return;
    }
    let mut target = Target {
        pixels,
        width: width as i32,
        height: height as i32,
    };

    for command in list.commands() {
        match command {
            DrawCommand::Clear(color) => {
                for chunk in target.pixels.chunks_exact_mut(4) {
                    chunk.copy_from_slice(&[color.r, color.g, color.b, 255]);
                }
            }
            DrawCommand::Sprite {
                frame,
                position,
                alpha,
                silhouette,
            } => target.blit(frame, *position, *alpha, *silhouette),
            DrawCommand::Rect { rect, color, width } if *width <= 0.0 => target.fill(*rect, *color),
            DrawCommand::Rect { rect, color, width } => {
                let w = *width;
                target.fill(Rect::new(rect.x, rect.y, rect.w, w), *color);
                target.fill(Rect::new(rect.x, rect.bottom() - w, rect.w, w), *color);
                target.fill(Rect::new(rect.x, rect.y + w, w, rect.h - 2.0 * w), *color);
                target.fill(Rect::new(rect.right() - w, rect.y + w, w, rect.h - 2.0 * w), *color);
            }
            DrawCommand::Line { from, to, color, width } => target.line(*from, *to, *color, width.max(1.0)),
        }
    }
}

struct Target<'a> {
    pixels: &'a mut [u8],
    width: i32,
    height: i32,
}

impl Target<'_> {
    fn blend(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height || color.a == 0 {
            return;
        }
        let index = ((y * self.width + x) * 4) as usize;
        let alpha = u16::from(color.a);
        for (channel, source) in self.pixels[index..index + 3].iter_mut().zip([color.r, color.g, color.b]) {
            *channel = ((u16::from(source) * alpha + u16::from(*channel) * (255 - alpha)) / 255) as u8;
        }
        self.pixels[index + 3] = 255;
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let x0 = rect.left().round().max(0.0) as i32;
        let y0 = rect.top().round().max(0.0) as i32;
        let x1 = (rect.right().round() as i32).min(self.width);
        let y1 = (rect.bottom().round() as i32).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    fn blit(&mut self, frame: &Frame, position: Vec2, alpha: u8, silhouette: bool) {
        let x0 = position.x.round() as i32;
        let y0 = position.y.round() as i32;
        let image = frame.image();
        for (x, y, pixel) in image.enumerate_pixels() {
            let (px, py) = (x0 + x as i32, y0 + y as i32);
            let color = if silhouette {
                if !frame.mask().get(x as i32, y as i32) {
                    continue;
                }
                Color::rgba(255, 255, 255, alpha)
            } else {
                Color::rgba(pixel[0], pixel[1], pixel[2], pixel[3]).with_alpha(alpha)
            };
            self.blend(px, py, color);
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        let steps = (to - from).abs().max_element().ceil().max(1.0) as i32;
        let half = width / 2.0;
        for step in 0..=steps {
            let point = from.lerp(to, step as f32 / steps as f32);
            self.fill(Rect::new(point.x - half, point.y - half, width, width), color);
        }
    }
}
