mod common;

use common::{cell_center, editor, Driver, DT};
use tidemaker::{
    cell_at, CanvasGrid, Direction, GridCoord, KeyCode, MouseButton, TileId, TypeRegistry, Vec2,
};

const TERRAIN: TileId = TileId(2);
const WATER: TileId = TileId(3);
const GOLD: TileId = TileId(4);
const PALM_FG: TileId = TileId(11);

#[test]
fn negative_positions_floor_to_negative_cells() {
    assert_eq!(cell_at(Vec2::new(-1.0, 0.0), Vec2::ZERO, 16.0), GridCoord::new(-1, 0));
    assert_eq!(cell_at(Vec2::new(-16.0, -17.0), Vec2::ZERO, 16.0), GridCoord::new(-1, -2));
    assert_eq!(cell_at(Vec2::new(15.9, 16.0), Vec2::ZERO, 16.0), GridCoord::new(0, 1));
    // The origin is subtracted before dividing.
    assert_eq!(cell_at(Vec2::new(10.0, 10.0), Vec2::new(20.0, 0.0), 16.0), GridCoord::new(-1, 0));
}

#[test]
fn clicks_place_terrain_and_resolve_neighbors() {
    let mut editor = editor();
    let mut driver = Driver::new();
    assert_eq!(editor.selection(), TERRAIN);

    for col in 5..8 {
        driver.click_cell(&mut editor, col, 2);
    }

    let grid = editor.grid();
    assert_eq!(grid.len(), 3);
    let left = grid.get(GridCoord::new(5, 2)).unwrap();
    let middle = grid.get(GridCoord::new(6, 2)).unwrap();
    let right = grid.get(GridCoord::new(7, 2)).unwrap();
    assert_eq!(left.terrain_neighbors, vec![Direction::C]);
    assert_eq!(middle.terrain_key(), "CG");
    assert_eq!(right.terrain_neighbors, vec![Direction::G]);
}

#[test]
fn holding_the_button_places_once_per_cell() {
    let mut editor = editor();
    let mut driver = Driver::new();

    driver.input.set_mouse_position(cell_center(5, 1));
    driver.input.press_mouse(MouseButton::Left);
    for _ in 0..5 {
        driver.tick(&mut editor);
    }
    driver.input.set_mouse_position(cell_center(6, 1));
    driver.tick(&mut editor);
    driver.input.release_mouse(MouseButton::Left);
    driver.tick(&mut editor);

    assert_eq!(editor.grid().len(), 2);
}

#[test]
fn secondary_button_removes_the_selected_type_and_evicts() {
    let mut editor = editor();
    let mut driver = Driver::new();
    driver.click_cell(&mut editor, 5, 2);
    driver.click_cell(&mut editor, 6, 2);

    driver.click(&mut editor, cell_center(5, 2), MouseButton::Right);

    assert!(!editor.grid().contains(GridCoord::new(5, 2)));
    let survivor = editor.grid().get(GridCoord::new(6, 2)).unwrap();
    assert!(survivor.terrain_neighbors.is_empty(), "neighbors re-resolved after eviction");
}

#[test]
fn water_under_water_is_marked_as_covered() {
    let registry = TypeRegistry::builtin();
    let mut grid = CanvasGrid::new();
    grid.place_at(&registry, GridCoord::new(0, 1), WATER, Vec2::ZERO).unwrap();
    grid.place_at(&registry, GridCoord::new(0, 0), WATER, Vec2::ZERO).unwrap();

    assert!(!grid.get(GridCoord::new(0, 0)).unwrap().water_on_top);
    assert!(grid.get(GridCoord::new(0, 1)).unwrap().water_on_top);
}

#[test]
fn decoration_only_tile_survives_until_a_removal_runs() {
    let registry = TypeRegistry::builtin();
    let mut grid = CanvasGrid::new();
    let cell = GridCoord::new(2, 2);

    grid.place_at(&registry, cell, PALM_FG, Vec2::new(3.0, 4.0)).unwrap();
    grid.place_at(&registry, cell, PALM_FG, Vec2::new(3.0, 4.0)).unwrap();
    let tile = grid.get(cell).unwrap();
    assert!(tile.is_empty());
    assert_eq!(tile.objects.len(), 1);

    assert!(grid.remove_at(&registry, cell, GOLD).unwrap());
    assert!(!grid.contains(cell));
}

#[test]
fn arrow_keys_clamp_the_selection() {
    let mut editor = editor();
    let mut driver = Driver::new();

    driver.input.press_key(KeyCode::ArrowLeft);
    driver.tick(&mut editor);
    assert_eq!(editor.selection(), TERRAIN);
    driver.input.release_key(KeyCode::ArrowLeft);

    for _ in 0..30 {
        driver.input.press_key(KeyCode::ArrowRight);
        driver.tick(&mut editor);
        driver.input.release_key(KeyCode::ArrowRight);
        driver.tick(&mut editor);
    }
    assert_eq!(editor.selection(), TileId(18));
}

#[test]
fn menu_click_selects_without_touching_the_canvas() {
    let mut editor = editor();
    let mut driver = Driver::new();
    let coin_button = editor.menu().buttons()[1].rect().center();

    driver.click(&mut editor, coin_button, MouseButton::Left);
    assert_eq!(editor.selection(), GOLD);
    assert!(editor.grid().is_empty());

    driver.click_cell(&mut editor, 4, 4);
    assert_eq!(editor.grid().get(GridCoord::new(4, 4)).unwrap().coin, Some(GOLD));
}

#[test]
fn object_placement_is_throttled() {
    let mut editor = editor();
    let mut driver = Driver::new();
    let palm_button = editor.menu().buttons()[3].rect().center();
    driver.click(&mut editor, palm_button, MouseButton::Left);
    assert_eq!(editor.selection(), PALM_FG);
    let before = editor.objects().len();

    driver.input.set_mouse_position(Vec2::new(600.0, 150.0));
    driver.input.press_mouse(MouseButton::Left);
    driver.tick(&mut editor);
    // The new palm is under the pointer now, so move off it to keep painting.
    driver.input.set_mouse_position(Vec2::new(800.0, 150.0));
    for _ in 0..10 {
        driver.tick(&mut editor);
    }
    assert_eq!(editor.objects().len(), before + 1, "cooldown blocks a second palm");

    let cooldown_ticks = (0.45 / DT) as usize;
    for _ in 0..cooldown_ticks {
        driver.tick(&mut editor);
    }
    assert_eq!(editor.objects().len(), before + 2);
    assert!(editor.grid().is_empty(), "objects never live in the cell store while editing");
}

#[test]
fn dragging_moves_an_object_and_reanchors_it() {
    let mut editor = editor();
    let mut driver = Driver::new();
    let start = editor.objects().player().unwrap().rect();

    driver.input.set_mouse_position(start.center());
    driver.input.press_mouse(MouseButton::Left);
    driver.tick(&mut editor);
    driver.input.set_mouse_position(start.center() + Vec2::new(100.0, -40.0));
    driver.tick(&mut editor);
    driver.input.release_mouse(MouseButton::Left);
    driver.tick(&mut editor);

    let player = editor.objects().player().unwrap();
    assert!(!player.is_selected());
    assert_eq!(player.rect().top_left(), start.top_left() + Vec2::new(100.0, -40.0));
    assert_eq!(player.offset(), player.rect().top_left() - editor.origin());
    assert!(editor.grid().is_empty(), "dragging never places tiles");
}

#[test]
fn markers_cannot_be_removed() {
    let mut editor = editor();
    let mut driver = Driver::new();
    let player = editor.objects().player().unwrap().rect().center();
    let sky = editor.objects().sky().unwrap().rect().center();

    driver.click(&mut editor, player, MouseButton::Right);
    driver.click(&mut editor, sky, MouseButton::Right);

    assert!(editor.objects().player().is_some());
    assert!(editor.objects().sky().is_some());
}

#[test]
fn scrolling_pans_the_origin_and_the_objects() {
    let mut editor = editor();
    let mut driver = Driver::new();
    let player_before = editor.objects().player().unwrap().rect();

    driver.input.add_scroll(Vec2::new(0.0, 2.0));
    driver.tick(&mut editor);
    assert_eq!(editor.origin(), Vec2::new(-40.0, 0.0));

    driver.input.press_key(KeyCode::ControlLeft);
    driver.input.add_scroll(Vec2::new(0.0, -1.0));
    driver.tick(&mut editor);
    driver.input.release_key(KeyCode::ControlLeft);
    assert_eq!(editor.origin(), Vec2::new(-40.0, 20.0));

    let player = editor.objects().player().unwrap();
    assert_eq!(player.rect().top_left(), player_before.top_left() + editor.origin());

    // Screen (32, 32) is now world (72, 12): cell (1, 0).
    driver.click(&mut editor, Vec2::new(32.0, 32.0), MouseButton::Left);
    assert!(editor.grid().contains(GridCoord::new(1, 0)));
}
