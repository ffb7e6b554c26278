//! Tile picker drawn in the bottom-right corner of the editor.

use std::collections::BTreeMap;

use crate::{
    assets::Frame,
    math::{Rect, Vec2},
    registry::{MenuCategory, TileId, TypeRegistry},
    render::{Color, DrawList},
    settings::EditorSettings,
    MouseButton,
};

/// One quadrant of the menu. The palm button also has an alternate item list.
#[derive(Clone, Debug)]
pub struct MenuButton {
    rect: Rect,
    main: Vec<TileId>,
    alt: Vec<TileId>,
    index: usize,
    main_active: bool,
}

impl MenuButton {
    fn new(rect: Rect, main: Vec<TileId>, alt: Vec<TileId>) -> Self {
        Self {
            rect,
            main,
            alt,
            index: 0,
            main_active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn items(&self) -> &[TileId] {
        if self.main_active {
            &self.main
        } else {
            &self.alt
        }
    }

    /// Item currently shown on the button.
    pub fn current(&self) -> Option<TileId> {
        let items = self.items();
        items.get(self.index % items.len().max(1)).copied()
    }

    /// True if `id` is listed in either item list.
    pub fn lists(&self, id: TileId) -> bool {
        self.main.contains(&id) || self.alt.contains(&id)
    }

    fn cycle(&mut self) {
        let len = self.items().len();
        self.index = if self.index + 1 < len { self.index + 1 } else { 0 };
    }

    fn toggle(&mut self) {
        self.main_active = if self.alt.is_empty() { true } else { !self.main_active };
    }
}

#[derive(Clone, Debug)]
pub struct Menu {
    rect: Rect,
    buttons: Vec<MenuButton>,
}

impl Menu {
    /// Lay the menu out for a screen of `screen_size`.
    pub fn new(registry: &TypeRegistry, settings: &EditorSettings, screen_size: Vec2) -> Self {
        let size = settings.menu_size;
        let top_left = screen_size - Vec2::splat(size + settings.menu_margin);
        let rect = Rect::from_top_left(top_left, Vec2::splat(size));

        let half = size / 2.0;
        let quadrant = |dx: f32, dy: f32| {
            Rect::from_top_left(top_left + Vec2::new(dx, dy), Vec2::splat(half))
                .inflate(-settings.button_margin, -settings.button_margin)
        };

        let layout = [
            (quadrant(0.0, 0.0), MenuCategory::Terrain, None),
            (quadrant(half, 0.0), MenuCategory::Coin, None),
            (quadrant(0.0, half), MenuCategory::Enemy, None),
            (quadrant(half, half), MenuCategory::PalmFg, Some(MenuCategory::PalmBg)),
        ];
        let buttons = layout
            .into_iter()
            .filter_map(|(rect, main, alt)| {
                let main = registry.menu_items(main);
                if main.is_empty() {
                    return None;
                }
                let alt = alt.map(|category| registry.menu_items(category)).unwrap_or_default();
                Some(MenuButton::new(rect, main, alt))
            })
            .collect();

        Self { rect, buttons }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }

    pub fn buttons(&self) -> &[MenuButton] {
        &self.buttons
    }

    /// Handle a click. Middle flips fg/bg, right cycles, and every button returns the shown id.
    pub fn click(&mut self, point: Vec2, button: MouseButton) -> Option<TileId> {
        let target = self.buttons.iter_mut().find(|candidate| candidate.rect.contains(point))?;
        match button {
            MouseButton::Middle => target.toggle(),
            MouseButton::Right => target.cycle(),
            _ => {}
        }
        target.current()
    }

    pub fn draw(&self, list: &mut DrawList, selection: TileId, previews: &BTreeMap<TileId, Frame>) {
        for button in &self.buttons {
            list.fill_rect(button.rect, Color::BUTTON_BG);
            if let Some(frame) = button.current().and_then(|id| previews.get(&id)) {
                let position = button.rect.center() - frame.size() / 2.0;
                list.sprite(frame, position);
            }
            if button.lists(selection) {
                list.outline_rect(button.rect.inflate(4.0, 4.0), Color::BUTTON_LINE, 5.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Menu {
        Menu::new(&TypeRegistry::builtin(), &EditorSettings::default(), Vec2::new(1280.0, 720.0))
    }

    #[test]
    fn test_layout_is_bottom_right() {
        let menu = menu();
        assert_eq!(menu.rect(), Rect::new(1094.0, 534.0, 180.0, 180.0));
        assert_eq!(menu.buttons()[0].rect(), Rect::new(1096.5, 536.5, 85.0, 85.0));
    }

    #[test]
    fn test_right_click_cycles_items() {
        let mut menu = menu();
        let coin_button = menu.buttons()[1].rect().center();
        assert_eq!(menu.click(coin_button, MouseButton::Left), Some(TileId(4)));
        assert_eq!(menu.click(coin_button, MouseButton::Right), Some(TileId(5)));
        assert_eq!(menu.click(coin_button, MouseButton::Right), Some(TileId(6)));
        assert_eq!(menu.click(coin_button, MouseButton::Right), Some(TileId(4)));
    }

    #[test]
    fn test_middle_click_flips_palms_only_where_available() {
        let mut menu = menu();
        let palm_button = menu.buttons()[3].rect().center();
        assert_eq!(menu.click(palm_button, MouseButton::Middle), Some(TileId(15)));
        assert_eq!(menu.click(palm_button, MouseButton::Middle), Some(TileId(11)));

        let terrain_button = menu.buttons()[0].rect().center();
        assert_eq!(menu.click(terrain_button, MouseButton::Middle), Some(TileId(2)));
    }

    #[test]
    fn test_click_between_buttons_selects_nothing() {
        let mut menu = menu();
        assert_eq!(menu.click(Vec2::new(1095.0, 535.0), MouseButton::Left), None);
    }
}
