//! Components attached to level entities.

use crate::{
    assets::FrameSet,
    math::Rect,
    registry::CoinKind,
};

/// Draw layer. Lower layers are drawn first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Depth {
    Background,
    Water,
    Main,
}

impl Depth {
    pub const ALL: [Depth; 3] = [Depth::Background, Depth::Water, Depth::Main];
}

/// Position and extent in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub rect: Rect,
    pub depth: Depth,
}

impl Body {
    pub fn new(rect: Rect, depth: Depth) -> Self {
        Self { rect, depth }
    }
}

/// How a [`Visual`] advances its frame index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    /// Wrap back to the first frame.
    Loop,
    /// Play through once, then the entity is despawned.
    Once,
    /// Single image, never advances.
    Still,
    /// Driven by the entity's own behavior component.
    Manual,
}

/// Sprite animation state.
#[derive(Clone, Debug)]
pub struct Visual {
    pub frames: FrameSet,
    pub index: f32,
    pub playback: Playback,
}

impl Visual {
    pub fn new(frames: FrameSet, playback: Playback) -> Self {
        Self {
            frames,
            index: 0.0,
            playback,
        }
    }

    /// Advance the index. Returns false once a one-shot animation has finished.
    pub fn advance(&mut self, step: f32) -> bool {
        match self.playback {
            Playback::Loop => {
                self.index += step;
                if self.index >= self.frames.len() as f32 {
                    self.index = 0.0;
                }
                true
            }
            Playback::Once => {
                self.index += step;
                self.index < self.frames.len() as f32
            }
            Playback::Still | Playback::Manual => true,
        }
    }
}

/// Blocks the player and serves as ground for patrols.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Collider;

/// Hurts the player on mask contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Damaging;

/// Hidden from drawing (palm trunks).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hidden;

/// Collectible coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coin(pub CoinKind);

/// What an entity is, for logging and queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Terrain,
    Water,
    Palm,
    Trunk,
    Coin,
    Particle,
    Spikes,
    Tooth,
    Shell,
    Pearl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Frame;

    fn frames(count: usize) -> FrameSet {
        FrameSet::new((0..count).map(|_| Frame::solid(4, 4, [255; 4])).collect()).unwrap()
    }

    #[test]
    fn test_loop_wraps_at_length() {
        let mut visual = Visual::new(frames(3), Playback::Loop);
        assert!(visual.advance(2.5));
        assert!(visual.advance(0.5));
        assert_eq!(visual.index, 0.0);
    }

    #[test]
    fn test_once_finishes() {
        let mut visual = Visual::new(frames(2), Playback::Once);
        assert!(visual.advance(1.5));
        assert!(!visual.advance(0.5));
    }
}
