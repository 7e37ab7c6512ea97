//! Soundboard facade
//!
//! Owns the live board and routes every intent through one `&mut self`
//! entry point. Group mutations autosave the categorized wire state on a
//! background task (fire-and-forget: the mutation completes locally before
//! the durable save resolves, and a failed save is logged, never rolled
//! back). Fade completions are driven by `tick`, fed from a process-local
//! monotonic clock.

use deck_core::{BoardError, BoardResult, GroupId, SceneId, SoundId, clamp_volume};
use deck_engine::{AudioBackend, Sound, TransitionController};
use deck_scene::{SceneManager, ScenePersistence};
use deck_state::{
    GroupStore, SceneSnapshot, from_categorized, from_snapshot, to_categorized, to_snapshot,
};
use std::sync::Arc;
use std::time::Instant;

/// The mixing board: groups and categories, per-group random playback with
/// fades, three-level volume composition, and named scenes.
pub struct Soundboard<P> {
    store: GroupStore,
    transitions: TransitionController,
    scenes: SceneManager<P>,
    backend: Arc<dyn AudioBackend>,
    persistence: Arc<P>,
    user_id: String,
    global_volume: f32,
    epoch: Instant,
}

impl<P: ScenePersistence + 'static> Soundboard<P> {
    pub fn new(backend: Arc<dyn AudioBackend>, persistence: Arc<P>, user_id: &str) -> Self {
        Self {
            store: GroupStore::new(),
            transitions: TransitionController::new(),
            scenes: SceneManager::new(Arc::clone(&persistence), user_id),
            backend,
            persistence,
            user_id: user_id.to_string(),
            global_volume: 1.0,
            epoch: Instant::now(),
        }
    }

    /// Deterministic clip selection, for tests and reproducible sessions.
    pub fn with_transition_seed(mut self, seed: u64) -> Self {
        self.transitions = TransitionController::with_seed(seed);
        self
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    pub fn global_volume(&self) -> f32 {
        self.global_volume
    }

    pub fn playing_sound(&self, group_id: GroupId) -> Option<SoundId> {
        self.transitions.playing_sound(group_id)
    }

    pub fn scenes(&self) -> &SceneManager<P> {
        &self.scenes
    }

    /// Milliseconds since the board was created.
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    // ── Playback ────────────────────────────────────────────────────────

    /// Toggle a group: fade out whatever is playing and fade in a random
    /// clip from the group.
    pub fn toggle_group_playback(&mut self, group_id: GroupId) -> BoardResult<Option<SoundId>> {
        let now = self.now_ms();
        let global = self.global_volume;
        let group = self
            .store
            .group_mut(group_id)
            .ok_or_else(|| BoardError::Validation(format!("no group {group_id}")))?;
        self.transitions.start_random_playback(group, global, now)
    }

    /// Fade out and pause the group's playing sound, if any.
    pub fn stop_group(&mut self, group_id: GroupId) -> BoardResult<()> {
        let now = self.now_ms();
        let group = self
            .store
            .group_mut(group_id)
            .ok_or_else(|| BoardError::Validation(format!("no group {group_id}")))?;
        self.transitions.stop_playback(group, now);
        Ok(())
    }

    /// Complete any due fade-out pauses. Hosts call this from their frame
    /// or timer loop.
    pub fn tick(&mut self) {
        let now = self.now_ms();
        self.tick_at(now);
    }

    /// `tick` with an explicit clock, for hosts that drive their own time
    /// (and for tests).
    pub fn tick_at(&mut self, now_ms: u64) {
        self.transitions.tick(self.store.groups_mut(), now_ms);
    }

    /// Set the global volume and retarget every playing sound, without
    /// restarting fades.
    pub fn set_global_volume(&mut self, volume: f32) {
        self.global_volume = clamp_volume(volume);
        let global = self.global_volume;
        for group in self.store.groups_mut() {
            self.transitions.retarget(group, global);
        }
    }

    // ── Group and category mutations ────────────────────────────────────

    pub fn add_group(&mut self, category: &str) -> BoardResult<GroupId> {
        let id = self.store.add_group(category)?;
        self.autosave();
        Ok(id)
    }

    /// Stop, release, and remove a group. Returns the removed sounds'
    /// urls so the caller can clean up their stored blobs.
    pub fn remove_group(&mut self, group_id: GroupId) -> BoardResult<Vec<String>> {
        let urls = self.store.remove_group(group_id, &mut self.transitions)?;
        self.autosave();
        Ok(urls)
    }

    pub fn rename_group(&mut self, group_id: GroupId, new_name: &str) -> BoardResult<()> {
        self.store.rename_group(group_id, new_name)?;
        self.autosave();
        Ok(())
    }

    /// Import completion: an upload resolved to a `{url, name}` pair. The
    /// sound is added even when its resource is not yet loadable; it stays
    /// unplayable until a retry succeeds.
    pub fn add_sound(
        &mut self,
        group_id: GroupId,
        name: &str,
        url: &str,
        volume: f32,
    ) -> BoardResult<SoundId> {
        let mut sound = Sound::new(name, url, volume);
        match self.backend.create(url) {
            Ok(mut handle) => {
                handle.set_volume(sound.volume);
                sound.handle = Some(handle);
            }
            Err(e) => log::warn!("resource for '{name}' not yet available: {e}"),
        }
        let id = self.store.add_sound(group_id, sound)?;
        self.autosave();
        Ok(id)
    }

    /// Remove one sound (stopping it first if playing). Returns its url
    /// for storage cleanup.
    pub fn remove_sound(&mut self, group_id: GroupId, sound_id: SoundId) -> BoardResult<String> {
        let url = self
            .store
            .remove_sound(group_id, sound_id, &mut self.transitions)?;
        self.autosave();
        Ok(url)
    }

    pub fn set_group_volume(&mut self, group_id: GroupId, volume: f32) -> BoardResult<()> {
        self.store
            .set_group_volume(group_id, volume, self.global_volume, &self.transitions)?;
        self.autosave();
        Ok(())
    }

    pub fn set_fade_ms(&mut self, group_id: GroupId, fade_ms: u32) -> BoardResult<()> {
        self.store
            .set_fade_ms(group_id, fade_ms, self.global_volume, &self.transitions)?;
        self.autosave();
        Ok(())
    }

    pub fn set_sound_volume(
        &mut self,
        group_id: GroupId,
        sound_id: SoundId,
        volume: f32,
    ) -> BoardResult<()> {
        self.store.set_sound_volume(
            group_id,
            sound_id,
            volume,
            self.global_volume,
            &self.transitions,
        )?;
        self.autosave();
        Ok(())
    }

    pub fn add_category(&mut self, name: &str) -> BoardResult<()> {
        self.store.add_category(name)
    }

    /// Remove a category and every group in it. Destructive: callers are
    /// expected to have confirmed with the user before invoking this.
    /// Returns the removed sounds' urls for storage cleanup.
    pub fn remove_category(&mut self, name: &str) -> BoardResult<Vec<String>> {
        let urls = self.store.remove_category(name, &mut self.transitions)?;
        self.autosave();
        Ok(urls)
    }

    // ── Scenes ──────────────────────────────────────────────────────────

    /// First-load sequence: fetch (or synthesize) the user's scenes and
    /// apply the default scene to the live board.
    pub async fn bootstrap(&mut self) -> BoardResult<()> {
        let scene = self.scenes.bootstrap().await?;
        self.apply_scene(&scene);
        Ok(())
    }

    /// Snapshot the live board into a new named scene and make it current.
    pub async fn create_scene(&mut self, name: &str) -> BoardResult<SceneId> {
        let snapshot = to_snapshot(&self.store, self.global_volume, name);
        self.scenes.create_scene(snapshot).await
    }

    /// Overwrite the current scene with the live board. Reports "nothing
    /// to save" when no scene is current.
    pub async fn save_current_scene(&mut self) -> BoardResult<SceneId> {
        let snapshot = to_snapshot(&self.store, self.global_volume, "Untitled Scene");
        self.scenes.save_current_scene(snapshot).await
    }

    /// Replace the live board with a stored scene. Loading is a hard reset
    /// of playback: every playing sound stops first, no cross-fade between
    /// scenes.
    pub async fn load_scene(&mut self, id: &SceneId) -> BoardResult<()> {
        let scene = self.scenes.load_scene(id)?;
        self.apply_scene(&scene);
        Ok(())
    }

    pub async fn load_all_scenes(&mut self) -> BoardResult<()> {
        self.scenes.load_all_scenes().await
    }

    pub async fn delete_scene(&mut self, id: &SceneId) -> BoardResult<()> {
        self.scenes.delete_scene(id).await
    }

    pub async fn rename_scene(&mut self, id: &SceneId, new_name: &str) -> BoardResult<()> {
        self.scenes.rename_scene(id, new_name).await
    }

    /// Restore the autosaved (non-scene) board state, if one exists.
    pub async fn restore_autosaved_state(&mut self) -> BoardResult<bool> {
        let Some(state) = self.persistence.fetch_state(&self.user_id).await? else {
            return Ok(false);
        };
        self.transitions.detach_all(self.store.groups_mut());
        self.store = from_categorized(&state, self.backend.as_ref());
        Ok(true)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn apply_scene(&mut self, scene: &SceneSnapshot) {
        self.transitions.detach_all(self.store.groups_mut());
        let (store, global) = from_snapshot(scene, self.backend.as_ref());
        self.store = store;
        self.global_volume = global;
    }

    /// Fire-and-forget save of the categorized wire state. The mutation
    /// has already completed locally; storage failure is only logged.
    fn autosave(&self) {
        let state = to_categorized(&self.store);
        let persistence = Arc::clone(&self.persistence);
        let user_id = self.user_id.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = persistence.persist_state(&user_id, &state).await {
                        log::warn!("autosave failed for {user_id}: {e}");
                    }
                });
            }
            Err(_) => log::debug!("autosave skipped: no async runtime"),
        }
    }
}
