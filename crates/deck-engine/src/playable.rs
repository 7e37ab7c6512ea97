//! Playback-engine collaborator contract
//!
//! The board never decodes audio itself. Each sound owns a `Playable`
//! handle obtained from an `AudioBackend`, and the core only drives the
//! play/pause/volume/fade primitives below. Fades are backend-side ramps:
//! `fade` is fire-and-forget, and the terminal pause after a fade-out is
//! sequenced by the transition controller, not by the backend.

use deck_core::{BoardError, BoardResult, clamp_volume};

/// A live, engine-backed handle for one decoded audio resource.
pub trait Playable: Send {
    /// Begin (or resume) playback.
    fn play(&mut self) -> BoardResult<()>;

    /// Pause playback, preserving position.
    fn pause(&mut self);

    fn is_playing(&self) -> bool;

    /// Current live volume in [0, 1].
    fn volume(&self) -> f32;

    /// Set the live volume immediately, without a ramp.
    fn set_volume(&mut self, volume: f32);

    /// Ramp the live volume from `from` to `to` over `duration_ms`.
    fn fade(&mut self, from: f32, to: f32, duration_ms: u32);

    /// Release the underlying resource. The handle is unusable afterwards.
    fn release(&mut self);
}

/// Factory for playback handles.
pub trait AudioBackend: Send + Sync {
    /// Acquire a playable for the resource at `url`.
    fn create(&self, url: &str) -> BoardResult<Box<dyn Playable>>;
}

/// Headless backend that tracks playback state without producing audio.
///
/// Used by the test suites and the demo; a real deployment plugs in a
/// handle backed by an actual playback engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn create(&self, url: &str) -> BoardResult<Box<dyn Playable>> {
        if url.trim().is_empty() {
            return Err(BoardError::Resource("empty resource url".to_string()));
        }
        Ok(Box::new(NullPlayable::new()))
    }
}

/// State-tracking playable produced by [`NullBackend`].
///
/// Fades land on their target volume immediately; the audible ramp is an
/// engine concern the null backend has no use for.
#[derive(Debug, Default)]
pub struct NullPlayable {
    playing: bool,
    volume: f32,
    released: bool,
}

impl NullPlayable {
    pub fn new() -> Self {
        Self {
            playing: false,
            volume: 1.0,
            released: false,
        }
    }
}

impl Playable for NullPlayable {
    fn play(&mut self) -> BoardResult<()> {
        if self.released {
            return Err(BoardError::Resource(
                "playable was already released".to_string(),
            ));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
    }

    fn fade(&mut self, _from: f32, to: f32, _duration_ms: u32) {
        self.volume = clamp_volume(to);
    }

    fn release(&mut self) {
        self.playing = false;
        self.released = true;
    }
}
