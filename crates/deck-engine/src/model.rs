//! Live board model
//!
//! `Sound` and `SoundGroup` carry the runtime-attached playback handles.
//! They are deliberately not serializable: the handle-free snapshot
//! representation lives in deck-state, connected to this model by the
//! scene codec.

use crate::playable::Playable;
use deck_core::{DEFAULT_FADE_MS, GroupId, SoundId, clamp_fade_ms, clamp_volume};
use std::fmt;

/// One sound clip inside a group.
pub struct Sound {
    pub id: SoundId,
    pub name: String,
    /// Location reference, the only resource field that is ever persisted.
    pub url: String,
    /// Per-sound volume multiplier in [0, 1].
    pub volume: f32,
    /// Live engine handle. `None` until the resource resolves (or after a
    /// failed load); the sound is simply unplayable until then.
    pub handle: Option<Box<dyn Playable>>,
}

impl Sound {
    pub fn new(name: &str, url: &str, volume: f32) -> Self {
        Self {
            id: SoundId::new(),
            name: name.to_string(),
            url: url.to_string(),
            volume: clamp_volume(volume),
            handle: None,
        }
    }

    /// Attach a freshly acquired playback handle.
    pub fn with_handle(mut self, handle: Box<dyn Playable>) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Release and drop the live handle, if any.
    pub fn release_handle(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.release();
        }
    }

    /// Whether the live handle is currently audible.
    pub fn is_handle_playing(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_playing())
    }
}

impl fmt::Debug for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sound")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &self.url)
            .field("volume", &self.volume)
            .field("handle", &self.handle.is_some())
            .finish()
    }
}

/// A named bucket of sounds that plays one clip at a time.
#[derive(Debug)]
pub struct SoundGroup {
    pub id: GroupId,
    pub name: String,
    /// Category label; the owning store guarantees it exists.
    pub category: String,
    pub sounds: Vec<Sound>,
    /// Group volume multiplier in [0, 1].
    pub group_volume: f32,
    /// Fade duration for play/pause transitions, in [100, 5000] ms.
    pub fade_ms: u32,
}

impl SoundGroup {
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            id: GroupId::new(),
            name: name.to_string(),
            category: category.to_string(),
            sounds: Vec::new(),
            group_volume: 1.0,
            fade_ms: DEFAULT_FADE_MS,
        }
    }

    pub fn sound(&self, id: SoundId) -> Option<&Sound> {
        self.sounds.iter().find(|s| s.id == id)
    }

    pub fn sound_mut(&mut self, id: SoundId) -> Option<&mut Sound> {
        self.sounds.iter_mut().find(|s| s.id == id)
    }

    /// Append a sound. Ordering is insertion order and is preserved by
    /// snapshots.
    pub fn add_sound(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    /// Detach a sound from the group without touching its handle.
    pub fn take_sound(&mut self, id: SoundId) -> Option<Sound> {
        let index = self.sounds.iter().position(|s| s.id == id)?;
        Some(self.sounds.remove(index))
    }

    pub fn set_group_volume(&mut self, volume: f32) {
        self.group_volume = clamp_volume(volume);
    }

    pub fn set_fade_ms(&mut self, fade_ms: u32) {
        self.fade_ms = clamp_fade_ms(fade_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sound_clamps_volume() {
        let sound = Sound::new("Rain", "blob:rain", 1.8);
        assert_eq!(sound.volume, 1.0);
        assert!(sound.handle.is_none());
        assert!(!sound.is_handle_playing());
    }

    #[test]
    fn test_group_defaults() {
        let group = SoundGroup::new("Group 1", "Ambience");
        assert_eq!(group.group_volume, 1.0);
        assert_eq!(group.fade_ms, DEFAULT_FADE_MS);
        assert!(group.sounds.is_empty());
    }

    #[test]
    fn test_group_sound_lookup_and_take() {
        let mut group = SoundGroup::new("Group 1", "Music");
        let sound = Sound::new("Theme", "blob:theme", 0.7);
        let id = sound.id;
        group.add_sound(sound);

        assert!(group.sound(id).is_some());
        let taken = group.take_sound(id).unwrap();
        assert_eq!(taken.id, id);
        assert!(group.sound(id).is_none());
        assert!(group.take_sound(id).is_none());
    }

    #[test]
    fn test_group_setters_clamp() {
        let mut group = SoundGroup::new("Group 1", "Music");
        group.set_group_volume(-2.0);
        assert_eq!(group.group_volume, 0.0);
        group.set_fade_ms(9);
        assert_eq!(group.fade_ms, 100);
    }
}
