use std::{collections::HashMap, fs, io::Cursor, path::Path};

use anyhow::{anyhow, Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

/// Named sounds used by the editor and the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    EditorMusic,
    LevelMusic,
    Coin,
    Hit,
    Jump,
}

impl SoundId {
    /// Music loops until stopped; effects play once.
    pub fn is_music(self) -> bool {
        matches!(self, SoundId::EditorMusic | SoundId::LevelMusic)
    }
}

/// Play/stop interface the game logic talks to.
pub trait SoundPlayer {
    fn play(&mut self, sound: SoundId);
    fn stop(&mut self, sound: SoundId);
}

struct Clip {
    bytes: Vec<u8>,
    volume: f32,
}

/// Manages audio playback for sound effects and music.
pub struct AudioSystem {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    clips: HashMap<SoundId, Clip>,
    music: HashMap<SoundId, Sink>,
}

impl AudioSystem {
    /// Create a new audio system.
    ///
    /// This initializes the default audio output device. When no device is
    /// available the system stays silent instead of failing.
    pub fn new() -> Result<Self> {
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok((stream, handle)) => (Some(stream), Some(handle)),
            Err(e) => {
                log::warn!("Failed to initialize audio: {}. Audio will be unavailable.", e);
                (None, None)
            }
        };

        Ok(Self {
            _stream: stream,
            stream_handle,
            clips: HashMap::new(),
            music: HashMap::new(),
        })
    }

    /// Check if audio is available and working.
    pub fn is_available(&self) -> bool {
        self.stream_handle.is_some()
    }

    /// Read a sound file into memory and register it under `id`.
    pub fn load_clip<P: AsRef<Path>>(&mut self, id: SoundId, path: P, volume: f32) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Failed to open sound file {}", path.display()))?;
        self.clips.insert(
            id,
            Clip {
                bytes,
                volume: volume.clamp(0.0, 1.0),
            },
        );
        Ok(())
    }

    fn start(&mut self, id: SoundId) -> Result<()> {
        let stream_handle = self
            .stream_handle
            .as_ref()
            .ok_or_else(|| anyhow!("Audio system is not available"))?;
        let clip = self
            .clips
            .get(&id)
            .ok_or_else(|| anyhow!("No clip loaded for {id:?}"))?;

        let sink = Sink::try_new(stream_handle).map_err(|e| anyhow!("Failed to create audio sink: {}", e))?;
        sink.set_volume(clip.volume);

        let source = Decoder::new(Cursor::new(clip.bytes.clone()))
            .map_err(|e| anyhow!("Failed to decode {id:?}: {}", e))?;

        if id.is_music() {
            if let Some(previous) = self.music.remove(&id) {
                previous.stop();
            }
            sink.append(source.repeat_infinite());
            self.music.insert(id, sink);
        } else {
            sink.append(source);
            sink.detach();
        }
        Ok(())
    }
}

impl SoundPlayer for AudioSystem {
    fn play(&mut self, sound: SoundId) {
        if !self.is_available() {
            return;
        }
        if let Err(err) = self.start(sound) {
            log::warn!("Could not play {sound:?}: {err:#}");
        }
    }

    fn stop(&mut self, sound: SoundId) {
        if let Some(sink) = self.music.remove(&sound) {
            sink.stop();
        }
    }
}
