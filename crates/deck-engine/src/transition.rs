//! Transition controller
//!
//! Sequences the two observable transitions on a playable, fade-in-then-play
//! and fade-out-then-pause, with at most one transition in flight per group.
//! The fade itself is a backend-side ramp; what the controller owns is the
//! terminal pause after a fade-out. Each scheduled pause carries a token and
//! is cancelled when its sound restarts or its group is detached, so a stale
//! completion can never pause fresh playback. Logical state changes are
//! immediate at request time: `playing` is updated before any fade runs.
//!
//! All timing flows through caller-supplied `now_ms` values; the controller
//! never reads a wall clock.

use crate::model::SoundGroup;
use crate::resolver::effective_volume;
use deck_core::{BoardError, BoardResult, GroupId, SoundId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// A fade-out whose terminal pause has not happened yet.
#[derive(Debug, Clone)]
struct PendingPause {
    group: GroupId,
    sound: SoundId,
    /// Monotonic token identifying this transition in logs.
    token: u64,
    /// Absolute time at which the pause becomes due.
    due_ms: u64,
}

/// Drives play/pause fade sequencing and owns the playback state map.
pub struct TransitionController {
    /// Group -> currently playing sound. Hard invariant: at most one entry
    /// per group, and the entry never outlives the sound's membership in
    /// the group.
    playing: HashMap<GroupId, SoundId>,
    pending: Vec<PendingPause>,
    next_token: u64,
    rng: StdRng,
}

impl TransitionController {
    pub fn new() -> Self {
        Self {
            playing: HashMap::new(),
            pending: Vec::new(),
            next_token: 0,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Controller with a deterministic clip-selection sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    /// The sound currently marked playing for `group`, if any.
    pub fn playing_sound(&self, group: GroupId) -> Option<SoundId> {
        self.playing.get(&group).copied()
    }

    pub fn is_playing(&self, group: GroupId) -> bool {
        self.playing.contains_key(&group)
    }

    /// Number of groups with a playing sound.
    pub fn active_count(&self) -> usize {
        self.playing.len()
    }

    /// Number of scheduled pauses not yet due (test observability).
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Fade out whatever is playing (if anything), then pick a sound
    /// uniformly at random, start it at volume zero, and fade it up to its
    /// effective volume over the group's fade duration.
    ///
    /// The playback-state entry is recorded before the fade completes, so a
    /// settings change landing mid-fade retargets correctly. An empty group
    /// is a no-op. If the chosen sound has no loaded resource or fails to
    /// start, the error is reported and the playback state stays unchanged.
    pub fn start_random_playback(
        &mut self,
        group: &mut SoundGroup,
        global: f32,
        now_ms: u64,
    ) -> BoardResult<Option<SoundId>> {
        self.fade_out_current(group, now_ms);

        if group.sounds.is_empty() {
            return Ok(None);
        }

        let index = self.rng.random_range(0..group.sounds.len());
        let group_id = group.id;
        let group_volume = group.group_volume;
        let fade_ms = group.fade_ms;

        let sound = &mut group.sounds[index];
        let sound_id = sound.id;
        let target = effective_volume(sound.volume, group_volume, global);

        // Restarting a sound cancels any pause still pending against it.
        self.cancel_pending_for_sound(group_id, sound_id);

        let Some(handle) = sound.handle.as_mut() else {
            return Err(BoardError::Resource(format!(
                "sound '{}' has no loaded resource",
                sound.name
            )));
        };

        handle.set_volume(0.0);
        handle.play()?;
        self.playing.insert(group_id, sound_id);
        handle.fade(0.0, target, fade_ms);

        log::debug!(
            "group {group_id}: fading in '{}' to {target:.3} over {fade_ms}ms",
            sound.name
        );
        Ok(Some(sound_id))
    }

    /// Fade the playing sound to zero and pause it (position preserved)
    /// once the fade completes. The logical stop is immediate: the playback
    /// state entry is cleared at request time, not at fade completion.
    pub fn stop_playback(&mut self, group: &mut SoundGroup, now_ms: u64) {
        self.fade_out_current(group, now_ms);
    }

    /// Re-apply the effective volume to the group's playing sound after a
    /// sound/group/global volume change. No fade, no restart, and no effect
    /// when nothing is playing.
    pub fn retarget(&self, group: &mut SoundGroup, global: f32) {
        let Some(&sound_id) = self.playing.get(&group.id) else {
            return;
        };
        let group_volume = group.group_volume;
        if let Some(sound) = group.sound_mut(sound_id) {
            let target = effective_volume(sound.volume, group_volume, global);
            if let Some(handle) = sound.handle.as_mut() {
                handle.set_volume(target);
            }
        }
    }

    /// Complete every due pending pause. A pending entry that was cancelled
    /// by a later transition has already been removed; whatever is still
    /// queued here is authoritative.
    pub fn tick<'a, I>(&mut self, groups: I, now_ms: u64)
    where
        I: IntoIterator<Item = &'a mut SoundGroup>,
    {
        if self.pending.is_empty() {
            return;
        }

        let mut due = Vec::new();
        self.pending.retain(|p| {
            if p.due_ms <= now_ms {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        if due.is_empty() {
            return;
        }

        let mut by_id: HashMap<GroupId, &'a mut SoundGroup> =
            groups.into_iter().map(|g| (g.id, g)).collect();

        for p in due {
            let Some(group) = by_id.get_mut(&p.group) else {
                continue;
            };
            if let Some(sound) = group.sound_mut(p.sound) {
                if let Some(handle) = sound.handle.as_mut() {
                    if handle.is_playing() {
                        handle.pause();
                        log::debug!(
                            "transition {}: paused '{}' after fade-out",
                            p.token,
                            sound.name
                        );
                    }
                }
            }
        }
    }

    /// Immediately silence a group: cancel its pending pauses, pause its
    /// playing sound, and evict its playback-state entry. Used by removal,
    /// category cascade, and scene-load paths.
    pub fn detach(&mut self, group: &mut SoundGroup) {
        self.pending.retain(|p| p.group != group.id);
        if let Some(sound_id) = self.playing.remove(&group.id) {
            Self::pause_handle(group, sound_id);
        }
    }

    /// Immediately silence one sound ahead of its removal from the group.
    pub fn detach_sound(&mut self, group: &mut SoundGroup, sound_id: SoundId) {
        self.cancel_pending_for_sound(group.id, sound_id);
        if self.playing.get(&group.id) == Some(&sound_id) {
            self.playing.remove(&group.id);
            Self::pause_handle(group, sound_id);
        }
    }

    /// Hard reset of all playback state, e.g. when a scene load replaces
    /// the whole board.
    pub fn detach_all<'a, I>(&mut self, groups: I)
    where
        I: IntoIterator<Item = &'a mut SoundGroup>,
    {
        for group in groups {
            self.detach(group);
        }
        self.playing.clear();
        self.pending.clear();
    }

    fn fade_out_current(&mut self, group: &mut SoundGroup, now_ms: u64) {
        let Some(sound_id) = self.playing.remove(&group.id) else {
            return;
        };
        let fade_ms = group.fade_ms;
        let group_id = group.id;
        let Some(sound) = group.sound_mut(sound_id) else {
            return;
        };
        let Some(handle) = sound.handle.as_mut() else {
            return;
        };
        if !handle.is_playing() {
            return;
        }

        let current = handle.volume();
        handle.fade(current, 0.0, fade_ms);

        self.next_token += 1;
        let token = self.next_token;
        self.pending.push(PendingPause {
            group: group_id,
            sound: sound_id,
            token,
            due_ms: now_ms + u64::from(fade_ms),
        });
        log::debug!(
            "group {group_id}: fading out '{}' over {fade_ms}ms (transition {token})",
            sound.name
        );
    }

    fn cancel_pending_for_sound(&mut self, group: GroupId, sound: SoundId) {
        self.pending
            .retain(|p| !(p.group == group && p.sound == sound));
    }

    fn pause_handle(group: &mut SoundGroup, sound_id: SoundId) {
        if let Some(sound) = group.sound_mut(sound_id) {
            if let Some(handle) = sound.handle.as_mut() {
                if handle.is_playing() {
                    handle.pause();
                }
            }
        }
    }
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new()
    }
}
