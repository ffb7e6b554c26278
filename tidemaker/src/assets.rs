use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use image::{Rgba, RgbaImage};

use crate::{error::BuildError, math::Vec2};

/// Per-pixel opacity mask. A pixel is solid when its alpha is above half.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_image(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            bits: image.pixels().map(|pixel| pixel[3] > 127).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// True when any solid pixel of `other`, placed with its top-left at
    /// `offset` relative to this mask, lands on a solid pixel of this mask.
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;
        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (self.width as i32).min(dx + other.width as i32);
        let y_end = (self.height as i32).min(dy + other.height as i32);

        (y_start..y_end).any(|y| (x_start..x_end).any(|x| self.get(x, y) && other.get(x - dx, y - dy)))
    }
}

/// A single image with its collision mask.
#[derive(Clone, Debug)]
pub struct Frame {
    image: Arc<RgbaImage>,
    mask: Arc<Mask>,
}

impl Frame {
    pub fn from_image(image: RgbaImage) -> Self {
        let mask = Mask::from_image(&image);
        Self {
            image: Arc::new(image),
            mask: Arc::new(mask),
        }
    }

    /// A frame filled with one color.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    /// Mirror image of this frame.
    pub fn flipped(&self) -> Self {
        Self::from_image(image::imageops::flip_horizontal(self.image.as_ref()))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32)
    }
}

/// Non-empty, cheaply clonable sequence of animation frames.
#[derive(Clone, Debug)]
pub struct FrameSet {
    frames: Arc<[Frame]>,
}

impl FrameSet {
    /// Returns `None` for an empty list.
    pub fn new(frames: Vec<Frame>) -> Option<Self> {
        if frames.is_empty() {
            None
        } else {
            Some(Self {
                frames: frames.into(),
            })
        }
    }

    pub fn single(frame: Frame) -> Self {
        Self {
            frames: vec![frame].into(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Frame sets are never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Frame at an animation index. Fractional indices are truncated and
    /// out-of-range indices wrap.
    pub fn frame(&self, index: f32) -> &Frame {
        let index = index.max(0.0) as usize % self.frames.len();
        &self.frames[index]
    }

    pub fn first(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Every frame mirrored horizontally.
    pub fn flipped(&self) -> Self {
        Self {
            frames: self.frames.iter().map(Frame::flipped).collect::<Vec<_>>().into(),
        }
    }
}

/// Keyed cache of frame sets.
///
/// Keys are slash-separated names such as `land/AC`, `coin/gold` or
/// `player/run_left`.
pub struct AssetManager {
    frames: HashMap<String, FrameSet>,
}

impl AssetManager {
    /// Create a new asset manager with no cached assets.
    pub fn new() -> Self {
        Self {
            frames: HashMap::new(),
        }
    }

    pub fn insert_frames(&mut self, key: impl Into<String>, frames: FrameSet) {
        self.frames.insert(key.into(), frames);
    }

    /// Get a frame set that must exist for a level to build.
    pub fn frames(&self, key: &str) -> Result<FrameSet, BuildError> {
        self.frames
            .get(key)
            .cloned()
            .ok_or_else(|| BuildError::MissingFrames(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Terrain variants available under `land/`, used to validate neighbor keys.
    pub fn terrain_variants(&self) -> BTreeSet<String> {
        self.frames
            .keys()
            .filter_map(|key| key.strip_prefix("land/"))
            .map(str::to_string)
            .collect()
    }

    /// Load a single image from disk.
    pub fn load_image(path: impl AsRef<Path>) -> Result<Frame> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("Failed to load image {}", path.display()))?
            .to_rgba8();
        Ok(Frame::from_image(image))
    }

    /// Load a single image and cache it under `key`.
    pub fn load_single(&mut self, key: &str, path: impl AsRef<Path>) -> Result<()> {
        let frame = Self::load_image(path)?;
        self.insert_frames(key, FrameSet::single(frame));
        Ok(())
    }

    /// Load every image in a folder, sorted by file name, as one frame set.
    pub fn load_folder(&mut self, key: &str, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let frames = image_files(dir)?
            .iter()
            .map(Self::load_image)
            .collect::<Result<Vec<_>>>()?;
        let set = FrameSet::new(frames).ok_or_else(|| anyhow!("No images in {}", dir.display()))?;
        log::debug!("Loaded {} frames for {key}", set.len());
        self.insert_frames(key, set);
        Ok(())
    }

    /// Load every image in a folder as its own single-frame set keyed `prefix/stem`.
    pub fn load_folder_dict(&mut self, prefix: &str, dir: impl AsRef<Path>) -> Result<()> {
        for path in image_files(dir.as_ref())? {
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let key = format!("{prefix}/{stem}");
            self.load_single(&key, &path)?;
        }
        Ok(())
    }

    /// Load each subfolder of `dir` as a frame set keyed `prefix/subfolder`.
    pub fn load_subfolders(&mut self, prefix: &str, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let mut subdirs = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                subdirs.push(entry.path());
            }
        }
        subdirs.sort();

        for subdir in subdirs {
            let Some(name) = subdir.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let key = format!("{prefix}/{name}");
            self.load_folder(&key, &subdir)?;
        }
        Ok(())
    }

    /// Load the full game asset tree rooted at `root`.
    pub fn load_game_assets(&mut self, root: impl AsRef<Path>) -> Result<()> {
        let graphics = root.as_ref().join("graphics");

        self.load_folder_dict("land", graphics.join("terrain/land"))?;
        self.load_folder("water/top", graphics.join("terrain/water/animation"))?;
        self.load_single("water/bottom", graphics.join("terrain/water/water_bottom.png"))?;

        for coin in ["gold", "silver", "diamond"] {
            self.load_folder(&format!("coin/{coin}"), graphics.join("items").join(coin))?;
        }
        self.load_folder("particle", graphics.join("items/particle"))?;

        self.load_subfolders("palm", graphics.join("terrain/palm"))?;

        self.load_single("spikes", graphics.join("enemies/spikes/spikes.png"))?;
        self.load_subfolders("tooth", graphics.join("enemies/tooth"))?;
        self.load_subfolders("shell_left", graphics.join("enemies/shell_left"))?;
        for status in ["idle", "attack"] {
            let left = self.frames(&format!("shell_left/{status}"))?;
            self.insert_frames(format!("shell_right/{status}"), left.flipped());
        }
        self.load_single("pearl", graphics.join("enemies/pearl/pearl.png"))?;

        self.load_subfolders("player", graphics.join("player"))?;
        self.load_single("sky_handle", graphics.join("cursors/handle.png"))?;
        self.load_folder_dict("preview", graphics.join("preview"))?;

        log::info!("Loaded {} frame sets from {}", self.len(), root.as_ref().display());
        Ok(())
    }
}

impl Default for AssetManager {
    fn default() -> Self {
        Self::new()
    }
}

fn image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
