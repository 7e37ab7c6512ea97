//! Group store
//!
//! Owned, arena-like collection of groups and categories with id-based
//! lookup. Every mutation enforces the board invariants at entry: a group's
//! category always exists, volumes stay clamped, and removal paths stop
//! playback and release engine handles before dropping state.
//!
//! Removal paths return the removed sounds' urls so the boundary layer can
//! cascade-delete the stored blobs behind them.

use deck_core::{BoardError, BoardResult, GroupId, SoundId, clamp_volume};
use deck_engine::{Sound, SoundGroup, TransitionController};

/// Categories seeded onto a fresh board.
pub const STARTER_CATEGORIES: [&str; 3] = ["Music", "Sound Effects", "Ambience"];

/// Owns the collection of sound groups and their category labels.
#[derive(Debug)]
pub struct GroupStore {
    groups: Vec<SoundGroup>,
    /// Insertion-ordered unique labels.
    categories: Vec<String>,
}

impl GroupStore {
    /// Empty board with the starter categories.
    pub fn new() -> Self {
        Self::with_categories(STARTER_CATEGORIES.iter().map(|c| c.to_string()).collect())
    }

    pub fn with_categories(categories: Vec<String>) -> Self {
        let mut store = Self {
            groups: Vec::new(),
            categories: Vec::new(),
        };
        for category in categories {
            if !store.categories.contains(&category) {
                store.categories.push(category);
            }
        }
        store
    }

    pub fn groups(&self) -> &[SoundGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> impl Iterator<Item = &mut SoundGroup> {
        self.groups.iter_mut()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn group(&self, id: GroupId) -> Option<&SoundGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut SoundGroup> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups bucketed by category, in category order, preserving the
    /// groups' insertion order within each bucket. Categories without
    /// groups are omitted, matching the persisted wire shape.
    pub fn by_category(&self) -> Vec<(&str, Vec<&SoundGroup>)> {
        self.categories
            .iter()
            .filter_map(|category| {
                let bucket: Vec<&SoundGroup> = self
                    .groups
                    .iter()
                    .filter(|g| &g.category == category)
                    .collect();
                if bucket.is_empty() {
                    None
                } else {
                    Some((category.as_str(), bucket))
                }
            })
            .collect()
    }

    /// Create a group in `category` with a default name of `"Group {n+1}"`.
    /// Name collisions with renamed groups are acceptable; uniqueness is
    /// not enforced on names.
    pub fn add_group(&mut self, category: &str) -> BoardResult<GroupId> {
        if !self.categories.iter().any(|c| c == category) {
            return Err(BoardError::Validation(format!(
                "unknown category '{category}'"
            )));
        }
        let name = format!("Group {}", self.groups.len() + 1);
        let group = SoundGroup::new(&name, category);
        let id = group.id;
        self.groups.push(group);
        Ok(id)
    }

    /// Insert a fully formed group, registering its category if needed.
    /// Used by the scene codec when rehydrating a snapshot.
    pub(crate) fn insert_group(&mut self, group: SoundGroup) {
        if !self.categories.contains(&group.category) {
            self.categories.push(group.category.clone());
        }
        self.groups.push(group);
    }

    /// Stop the group's playback, release every sound's resource, and
    /// remove it. Returns the removed sounds' urls.
    pub fn remove_group(
        &mut self,
        id: GroupId,
        transitions: &mut TransitionController,
    ) -> BoardResult<Vec<String>> {
        let index = self
            .groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| BoardError::Validation(format!("no group {id}")))?;
        let mut group = self.groups.remove(index);
        transitions.detach(&mut group);
        Ok(Self::release_group_sounds(&mut group))
    }

    /// Rejects blank/whitespace-only names; silently ignores no-op renames.
    pub fn rename_group(&mut self, id: GroupId, new_name: &str) -> BoardResult<()> {
        if new_name.trim().is_empty() {
            return Err(BoardError::Validation(
                "group name cannot be blank".to_string(),
            ));
        }
        let group = self
            .group_mut(id)
            .ok_or_else(|| BoardError::Validation(format!("no group {id}")))?;
        if group.name != new_name {
            group.name = new_name.to_string();
        }
        Ok(())
    }

    /// Attach a sound produced by an upload completing.
    pub fn add_sound(&mut self, group_id: GroupId, sound: Sound) -> BoardResult<SoundId> {
        let group = self
            .group_mut(group_id)
            .ok_or_else(|| BoardError::Validation(format!("no group {group_id}")))?;
        if group.sound(sound.id).is_some() {
            return Err(BoardError::Validation(format!(
                "duplicate sound id {} in group {group_id}",
                sound.id
            )));
        }
        let id = sound.id;
        group.add_sound(sound);
        Ok(id)
    }

    /// Remove one sound, stopping it first if it is the one currently
    /// playing. Returns its url.
    pub fn remove_sound(
        &mut self,
        group_id: GroupId,
        sound_id: SoundId,
        transitions: &mut TransitionController,
    ) -> BoardResult<String> {
        let group = self
            .group_mut(group_id)
            .ok_or_else(|| BoardError::Validation(format!("no group {group_id}")))?;
        transitions.detach_sound(group, sound_id);
        let mut sound = group.take_sound(sound_id).ok_or_else(|| {
            BoardError::Validation(format!("no sound {sound_id} in group {group_id}"))
        })?;
        sound.release_handle();
        Ok(sound.url)
    }

    pub fn set_group_volume(
        &mut self,
        id: GroupId,
        volume: f32,
        global: f32,
        transitions: &TransitionController,
    ) -> BoardResult<()> {
        let group = self
            .group_mut(id)
            .ok_or_else(|| BoardError::Validation(format!("no group {id}")))?;
        group.set_group_volume(volume);
        transitions.retarget(group, global);
        Ok(())
    }

    pub fn set_fade_ms(
        &mut self,
        id: GroupId,
        fade_ms: u32,
        global: f32,
        transitions: &TransitionController,
    ) -> BoardResult<()> {
        let group = self
            .group_mut(id)
            .ok_or_else(|| BoardError::Validation(format!("no group {id}")))?;
        group.set_fade_ms(fade_ms);
        transitions.retarget(group, global);
        Ok(())
    }

    pub fn set_sound_volume(
        &mut self,
        group_id: GroupId,
        sound_id: SoundId,
        volume: f32,
        global: f32,
        transitions: &TransitionController,
    ) -> BoardResult<()> {
        let group = self
            .group_mut(group_id)
            .ok_or_else(|| BoardError::Validation(format!("no group {group_id}")))?;
        let sound = group.sound_mut(sound_id).ok_or_else(|| {
            BoardError::Validation(format!("no sound {sound_id} in group {group_id}"))
        })?;
        sound.volume = clamp_volume(volume);
        transitions.retarget(group, global);
        Ok(())
    }

    /// No-op if the category already exists.
    pub fn add_category(&mut self, name: &str) -> BoardResult<()> {
        if name.trim().is_empty() {
            return Err(BoardError::Validation(
                "category name cannot be blank".to_string(),
            ));
        }
        if !self.categories.iter().any(|c| c == name) {
            self.categories.push(name.to_string());
        }
        Ok(())
    }

    /// Remove a category and cascade to every group referencing it, each
    /// through the same stop+release path as `remove_group`. Destructive;
    /// the boundary layer is expected to have confirmed with the user.
    /// Returns the urls of every removed sound.
    pub fn remove_category(
        &mut self,
        name: &str,
        transitions: &mut TransitionController,
    ) -> BoardResult<Vec<String>> {
        let index = self
            .categories
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| BoardError::Validation(format!("unknown category '{name}'")))?;
        self.categories.remove(index);

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.groups.len());
        for group in self.groups.drain(..) {
            if group.category == name {
                removed.push(group);
            } else {
                kept.push(group);
            }
        }
        self.groups = kept;

        let mut urls = Vec::new();
        for group in &mut removed {
            transitions.detach(group);
            urls.extend(Self::release_group_sounds(group));
        }
        log::info!(
            "removed category '{name}' and {} associated group(s)",
            removed.len()
        );
        Ok(urls)
    }

    fn release_group_sounds(group: &mut SoundGroup) -> Vec<String> {
        group
            .sounds
            .iter_mut()
            .map(|sound| {
                sound.release_handle();
                sound.url.clone()
            })
            .collect()
    }
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}
