use std::{fs, path::Path};

use image::{Rgba, RgbaImage};
use tidemaker::{AssetManager, Vec2};

fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let image = RgbaImage::from_fn(width, height, |x, _| {
        // Right half transparent.
        if x < width / 2 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    image.save(path).unwrap();
}

#[test]
fn folders_load_as_sorted_frame_sets() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("tooth/run");
    write_png(&folder.join("1.png"), 10, 8);
    write_png(&folder.join("0.png"), 12, 8);
    fs::write(folder.join("notes.txt"), "ignored").unwrap();

    let mut assets = AssetManager::new();
    assets.load_folder("tooth/run", &folder).unwrap();

    let frames = assets.frames("tooth/run").unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames.first().size(), Vec2::new(12.0, 8.0), "0.png comes first");
    assert_eq!(frames.first().mask().count(), 6 * 8);
}

#[test]
fn folder_dicts_and_subfolders_are_keyed_by_name() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("land/X.png"), 4, 4);
    write_png(&dir.path().join("land/CG.png"), 4, 4);
    write_png(&dir.path().join("palm/small_fg/0.png"), 4, 6);
    write_png(&dir.path().join("palm/small_fg/1.png"), 4, 6);
    write_png(&dir.path().join("palm/large_bg/0.png"), 4, 6);

    let mut assets = AssetManager::new();
    assets.load_folder_dict("land", dir.path().join("land")).unwrap();
    assets.load_subfolders("palm", dir.path().join("palm")).unwrap();

    let variants: Vec<String> = assets.terrain_variants().into_iter().collect();
    assert_eq!(variants, vec!["CG".to_string(), "X".to_string()]);
    assert_eq!(assets.frames("palm/small_fg").unwrap().len(), 2);
    assert_eq!(assets.frames("palm/large_bg").unwrap().len(), 1);
}

#[test]
fn empty_or_missing_folders_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("empty")).unwrap();

    let mut assets = AssetManager::new();
    assert!(assets.load_folder("empty", dir.path().join("empty")).is_err());
    assert!(assets.load_folder("missing", dir.path().join("missing")).is_err());
    assert!(assets.load_game_assets(dir.path()).is_err());
    assert!(assets.is_empty());
}
