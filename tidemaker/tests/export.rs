mod common;

use common::{editor, test_assets, Driver, TILE};
use tidemaker::{
    compile, CanvasGrid, ExportError, ExportLayers, GridCoord, KeyCode, TileId, TypeRegistry, Vec2, WaterPosition,
};

const TERRAIN: TileId = TileId(2);
const WATER: TileId = TileId(3);
const SILVER: TileId = TileId(5);
const TOOTH: TileId = TileId(8);
const PALM_LARGE_FG: TileId = TileId(12);
const PALM_SMALL_BG: TileId = TileId(15);

#[test]
fn export_normalizes_to_the_smallest_column_and_row() {
    let registry = TypeRegistry::builtin();
    let variants = test_assets().terrain_variants();
    let mut grid = CanvasGrid::new();
    grid.place_at(&registry, GridCoord::new(-2, 1), TERRAIN, Vec2::ZERO).unwrap();
    grid.place_at(&registry, GridCoord::new(3, 4), TERRAIN, Vec2::ZERO).unwrap();
    grid.place_at(&registry, GridCoord::new(0, -1), SILVER, Vec2::ZERO).unwrap();
    grid.place_at(&registry, GridCoord::new(1, 2), TOOTH, Vec2::ZERO).unwrap();

    let placements = [
        (PALM_SMALL_BG, Vec2::new(-100.0, 10.0)),
        (PALM_LARGE_FG, Vec2::new(70.5, 130.25)),
        (TileId::PLAYER, Vec2::new(40.0, 70.0)),
    ];
    let layers = compile(&grid, &placements, &registry, &variants, TILE).unwrap();

    // Columns span [-2, 3] and rows [-1, 4], so (-2, -1) maps to the pixel origin.
    assert_eq!(layers.terrain.keys().copied().collect::<Vec<_>>(), vec![(0, 128), (320, 320)]);
    assert_eq!(layers.coins.get(&(160, 32)), Some(&SILVER));
    assert_eq!(layers.enemies.get(&(192, 192)), Some(&TOOTH));

    // Objects keep their pixel offset inside the normalized cell.
    assert_eq!(layers.decoration_bg.get(&(28, 74)), Some(&PALM_SMALL_BG));
    assert_eq!(layers.decoration_fg.get(&(198, 194)), Some(&PALM_LARGE_FG));
    assert_eq!(layers.decoration_fg.get(&(168, 134)), Some(&TileId::PLAYER));
    assert_eq!(layers.len(), 7);
}

#[test]
fn terrain_layer_starts_at_the_pixel_origin() {
    let registry = TypeRegistry::builtin();
    let mut grid = CanvasGrid::new();
    grid.place_at(&registry, GridCoord::new(-2, -1), TERRAIN, Vec2::ZERO).unwrap();
    grid.place_at(&registry, GridCoord::new(3, 4), TERRAIN, Vec2::ZERO).unwrap();

    let layers = compile(&grid, &[], &registry, &test_assets().terrain_variants(), TILE).unwrap();
    assert_eq!(layers.terrain.keys().next(), Some(&(0, 0)));
    assert_eq!(layers.terrain.keys().last(), Some(&(320, 320)));
}

#[test]
fn water_layer_records_surface_and_depth() {
    let registry = TypeRegistry::builtin();
    let mut grid = CanvasGrid::new();
    grid.place_at(&registry, GridCoord::new(4, 4), WATER, Vec2::ZERO).unwrap();
    grid.place_at(&registry, GridCoord::new(4, 5), WATER, Vec2::ZERO).unwrap();

    let layers = compile(&grid, &[], &registry, &test_assets().terrain_variants(), TILE).unwrap();
    assert_eq!(layers.water.get(&(0, 0)), Some(&WaterPosition::Top));
    assert_eq!(layers.water.get(&(0, 64)), Some(&WaterPosition::Bottom));
}

#[test]
fn nothing_to_compile_is_an_error() {
    let registry = TypeRegistry::builtin();
    let result = compile(&CanvasGrid::new(), &[], &registry, &test_assets().terrain_variants(), TILE);
    assert!(matches!(result, Err(ExportError::EmptyGrid)));
}

#[test]
fn enter_on_an_untouched_canvas_reports_an_empty_grid() {
    let mut editor = editor();
    let mut driver = Driver::new();
    assert_eq!(editor.objects().len(), 2, "both markers exist from the start");

    driver.input.press_key(KeyCode::Enter);
    let result = editor.update(common::DT, &driver.input);
    assert!(matches!(result, Err(ExportError::EmptyGrid)));
    assert!(matches!(editor.export(), Err(ExportError::EmptyGrid)));
}

#[test]
fn enter_exports_and_leaves_the_canvas_editable() {
    let mut editor = editor();
    let mut driver = Driver::new();
    for col in 1..4 {
        driver.click_cell(&mut editor, col, 8);
    }
    let cells_before = editor.grid().len();

    driver.input.press_key(KeyCode::Enter);
    let layers = editor.update(common::DT, &driver.input).unwrap().expect("enter exports");
    driver.input.begin_frame();

    assert_eq!(layers.terrain.len(), 3);
    assert_eq!(layers.decoration_fg.values().filter(|&&id| id == TileId::PLAYER).count(), 1);
    assert_eq!(layers.decoration_fg.values().filter(|&&id| id == TileId::SKY).count(), 1);
    assert_eq!(editor.grid().len(), cells_before, "markers are not written into the canvas");

    let again = editor.export().unwrap();
    assert_eq!(again, layers, "exporting twice gives the same layers");
}

#[test]
fn export_survives_a_json_round_trip() {
    let mut editor = editor();
    let mut driver = Driver::new();
    driver.click_cell(&mut editor, 2, 9);

    let layers = editor.export().unwrap();
    let json = layers.to_json().unwrap();
    assert!(json.contains("\"terrain\""));
    assert_eq!(ExportLayers::from_json(&json).unwrap(), layers);
}
