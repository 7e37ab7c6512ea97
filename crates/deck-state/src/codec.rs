//! Scene codec
//!
//! Converts between the live model (engine handles attached) and the
//! snapshot representation (handle-free). Snapshotting strips runtime
//! state; rehydrating re-acquires a playable per sound from its url at the
//! stored per-sound volume. Volume composition is applied lazily at play
//! time, not at load time.
//!
//! Round-trip law: `from_snapshot(to_snapshot(x))` reproduces every
//! observable field of `x` (ids, names, volumes, fade durations, category
//! assignments, ordering); only the opaque resource identity differs.

use crate::snapshot::{CategorizedState, GroupSnapshot, SceneSnapshot, SoundSnapshot};
use crate::store::{GroupStore, STARTER_CATEGORIES};
use deck_core::clamp_volume;
use deck_engine::{AudioBackend, Sound, SoundGroup};
use std::collections::BTreeMap;

/// Snapshot the live board into a named scene.
pub fn to_snapshot(store: &GroupStore, global_volume: f32, name: &str) -> SceneSnapshot {
    SceneSnapshot {
        name: name.to_string(),
        sound_groups: store.groups().iter().map(group_to_snapshot).collect(),
        categories: store.categories().to_vec(),
        global_volume: clamp_volume(global_volume),
    }
}

/// Snapshot one group, stripping every runtime-only field.
pub fn group_to_snapshot(group: &SoundGroup) -> GroupSnapshot {
    GroupSnapshot {
        id: group.id,
        name: group.name.clone(),
        group_volume: group.group_volume,
        fade_duration_ms: group.fade_ms,
        category: group.category.clone(),
        sounds: group
            .sounds
            .iter()
            .map(|sound| SoundSnapshot {
                id: sound.id,
                name: sound.name.clone(),
                url: sound.url.clone(),
                volume: sound.volume,
            })
            .collect(),
    }
}

/// Rebuild the live board from a scene snapshot.
///
/// A sound whose resource fails to load is kept without a handle (it stays
/// unplayable until retried) and logged; one bad resource never aborts its
/// siblings. Categories referenced by groups but missing from the snapshot's
/// category list are registered, keeping the category invariant intact.
pub fn from_snapshot(scene: &SceneSnapshot, backend: &dyn AudioBackend) -> (GroupStore, f32) {
    let mut store = GroupStore::with_categories(scene.categories.clone());
    for group_snapshot in &scene.sound_groups {
        store.insert_group(rehydrate_group(group_snapshot, backend));
    }
    (store, clamp_volume(scene.global_volume))
}

/// Project the live board onto the autosave wire shape.
pub fn to_categorized(store: &GroupStore) -> CategorizedState {
    let mut categories: BTreeMap<String, Vec<GroupSnapshot>> = BTreeMap::new();
    for (category, groups) in store.by_category() {
        categories.insert(
            category.to_string(),
            groups.into_iter().map(group_to_snapshot).collect(),
        );
    }
    CategorizedState { categories }
}

/// Rebuild the live board from the autosave wire shape.
///
/// The wire format only carries categories that have groups, so the starter
/// categories are re-seeded ahead of whatever the document contains.
pub fn from_categorized(state: &CategorizedState, backend: &dyn AudioBackend) -> GroupStore {
    let mut categories: Vec<String> =
        STARTER_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for category in state.categories.keys() {
        if !categories.contains(category) {
            categories.push(category.clone());
        }
    }

    let mut store = GroupStore::with_categories(categories);
    for groups in state.categories.values() {
        for group_snapshot in groups {
            store.insert_group(rehydrate_group(group_snapshot, backend));
        }
    }
    store
}

fn rehydrate_group(snapshot: &GroupSnapshot, backend: &dyn AudioBackend) -> SoundGroup {
    let mut group = SoundGroup::new(&snapshot.name, &snapshot.category);
    group.id = snapshot.id;
    group.set_group_volume(snapshot.group_volume);
    group.set_fade_ms(snapshot.fade_duration_ms);

    for sound_snapshot in &snapshot.sounds {
        let mut sound = Sound::new(
            &sound_snapshot.name,
            &sound_snapshot.url,
            sound_snapshot.volume,
        );
        sound.id = sound_snapshot.id;
        match backend.create(&sound.url) {
            Ok(mut handle) => {
                // Initial volume is the stored per-sound volume; the
                // composed effective volume is applied at play time.
                handle.set_volume(sound.volume);
                sound.handle = Some(handle);
            }
            Err(e) => {
                log::warn!(
                    "sound '{}' failed to load from '{}': {e}",
                    sound.name,
                    sound.url
                );
            }
        }
        group.add_sound(sound);
    }
    group
}
