use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::math::Vec2;

/// Pixels per line when a pixel-precise scroll delta is converted to notches.
const PIXELS_PER_LINE: f64 = 20.0;

/// Tracks keyboard, mouse and scroll state across frames.
///
/// Game logic only reads this; the engine feeds winit events in. The
/// `press_*`/`release_*` methods feed the same state without a window, which
/// is how tests drive the editor and the level.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    mouse_position: Vec2,
    mouse_down: [bool; 3],
    mouse_pressed: [bool; 3],
    mouse_released: [bool; 3],
    scroll: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame pressed/released flags and the scroll delta.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.fill(false);
        self.mouse_released.fill(false);
        self.scroll = Vec2::ZERO;
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match event.state {
                ElementState::Pressed => self.press_key(keycode),
                ElementState::Released => self.release_key(keycode),
            }
        }
    }

    /// Handle a mouse button input event from winit.
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => self.press_mouse(button),
            ElementState::Released => self.release_mouse(button),
        }
    }

    /// Handle mouse cursor movement from winit.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.set_mouse_position(Vec2::new(x as f32, y as f32));
    }

    /// Handle a wheel event from winit. Deltas are accumulated in notches, positive is up.
    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let (x, y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(position) => (
                (position.x / PIXELS_PER_LINE) as f32,
                (position.y / PIXELS_PER_LINE) as f32,
            ),
        };
        self.add_scroll(Vec2::new(x, y));
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn press_mouse(&mut self, button: MouseButton) {
        if let Some(idx) = mouse_button_index(button) {
            if !self.mouse_down[idx] {
                self.mouse_pressed[idx] = true;
            }
            self.mouse_down[idx] = true;
        }
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        if let Some(idx) = mouse_button_index(button) {
            self.mouse_down[idx] = false;
            self.mouse_released[idx] = true;
        }
    }

    pub fn set_mouse_position(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    pub fn add_scroll(&mut self, delta: Vec2) {
        self.scroll += delta;
    }

    /// Returns true if the key is currently held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the mouse button is currently held down.
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_down[idx])
            .unwrap_or(false)
    }

    /// Returns true if the mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_pressed[idx])
            .unwrap_or(false)
    }

    /// Returns true if the mouse button was released this frame.
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_released[idx])
            .unwrap_or(false)
    }

    /// Current mouse cursor position in logical pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Scroll accumulated this frame, in notches.
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }
}

fn mouse_button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_only_on_first_frame() {
        let mut input = InputState::new();
        input.press_key(KeyCode::ArrowRight);
        assert!(input.is_key_pressed(KeyCode::ArrowRight));

        input.begin_frame();
        input.press_key(KeyCode::ArrowRight);
        assert!(input.is_key_down(KeyCode::ArrowRight));
        assert!(!input.is_key_pressed(KeyCode::ArrowRight));
    }

    #[test]
    fn test_scroll_resets_each_frame() {
        let mut input = InputState::new();
        input.handle_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        assert_eq!(input.scroll(), Vec2::new(0.0, 2.0));
        input.begin_frame();
        assert_eq!(input.scroll(), Vec2::ZERO);
    }

    #[test]
    fn test_mouse_release_is_tracked() {
        let mut input = InputState::new();
        input.press_mouse(MouseButton::Middle);
        input.begin_frame();
        input.release_mouse(MouseButton::Middle);
        assert!(!input.is_mouse_down(MouseButton::Middle));
        assert!(input.is_mouse_released(MouseButton::Middle));
    }
}
