//! Scene manager
//!
//! CRUD over named scenes plus the nullable "current scene" pointer. Local
//! state is the source of truth: every operation applies locally first and
//! then persists, and a failed save is reported but never rolled back.

use crate::persist::ScenePersistence;
use deck_core::{BoardError, BoardResult, SceneId};
use deck_state::{GroupSnapshot, STARTER_CATEGORIES, SceneSnapshot};
use std::collections::HashMap;
use std::sync::Arc;

/// The scene synthesized on first load for a user with no persisted scenes:
/// one empty group per starter category, default volumes and fades.
pub fn default_scene() -> SceneSnapshot {
    let sound_groups = [
        ("Default Music Group", "Music"),
        ("Default SFX Group", "Sound Effects"),
        ("Default Ambience Group", "Ambience"),
    ]
    .into_iter()
    .map(|(name, category)| GroupSnapshot {
        id: deck_core::GroupId::new(),
        name: name.to_string(),
        group_volume: 1.0,
        fade_duration_ms: deck_core::DEFAULT_FADE_MS,
        category: category.to_string(),
        sounds: Vec::new(),
    })
    .collect();

    SceneSnapshot {
        name: "Default Scene".to_string(),
        sound_groups,
        categories: STARTER_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        global_volume: 1.0,
    }
}

/// State machine over the known scenes and the current-scene pointer.
pub struct SceneManager<P> {
    persistence: Arc<P>,
    user_id: String,
    scenes: HashMap<SceneId, SceneSnapshot>,
    current: Option<SceneId>,
}

impl<P: ScenePersistence> SceneManager<P> {
    pub fn new(persistence: Arc<P>, user_id: &str) -> Self {
        Self {
            persistence,
            user_id: user_id.to_string(),
            scenes: HashMap::new(),
            current: None,
        }
    }

    pub fn current(&self) -> Option<&SceneId> {
        self.current.as_ref()
    }

    pub fn scene(&self, id: &SceneId) -> Option<&SceneSnapshot> {
        self.scenes.get(id)
    }

    pub fn scenes(&self) -> &HashMap<SceneId, SceneSnapshot> {
        &self.scenes
    }

    /// First-load policy: fetch all scenes; a user with none gets the
    /// canonical default scene synthesized and persisted. A user whose
    /// scenes lack the default id gets it added alongside them. Either way
    /// the default scene becomes current, and its snapshot is returned for
    /// the caller to apply to the live board.
    pub async fn bootstrap(&mut self) -> BoardResult<SceneSnapshot> {
        let loaded = self.persistence.fetch_scenes(&self.user_id).await?;
        let default_id = SceneId::default_scene();

        self.scenes = loaded;
        if !self.scenes.contains_key(&default_id) {
            let scene = default_scene();
            self.scenes.insert(default_id.clone(), scene.clone());
            if let Err(e) = self
                .persistence
                .persist_scene(&self.user_id, &default_id, &scene)
                .await
            {
                log::warn!("failed to persist default scene: {e}");
            } else {
                log::info!("default scene created for user {}", self.user_id);
            }
        }

        self.current = Some(default_id.clone());
        Ok(self.scenes[&default_id].clone())
    }

    /// Store a snapshot of the live board as a new scene under a fresh id
    /// and make it current.
    pub async fn create_scene(&mut self, snapshot: SceneSnapshot) -> BoardResult<SceneId> {
        let id = SceneId::new();
        self.scenes.insert(id.clone(), snapshot.clone());
        self.current = Some(id.clone());

        if let Err(e) = self
            .persistence
            .persist_scene(&self.user_id, &id, &snapshot)
            .await
        {
            log::warn!("scene {id} created locally but failed to persist: {e}");
            return Err(e);
        }
        Ok(id)
    }

    /// Overwrite the current scene with a fresh snapshot of the live board,
    /// keeping the scene's name. With no current scene there is nothing to
    /// save and no persistence call is made.
    pub async fn save_current_scene(&mut self, mut snapshot: SceneSnapshot) -> BoardResult<SceneId> {
        let Some(id) = self.current.clone() else {
            return Err(BoardError::Validation("nothing to save".to_string()));
        };
        if let Some(existing) = self.scenes.get(&id) {
            snapshot.name = existing.name.clone();
        }
        self.scenes.insert(id.clone(), snapshot.clone());

        if let Err(e) = self
            .persistence
            .persist_scene(&self.user_id, &id, &snapshot)
            .await
        {
            log::warn!("scene {id} updated locally but failed to persist: {e}");
            return Err(e);
        }
        Ok(id)
    }

    /// Resolve a scene from the known mapping and make it current. The
    /// caller applies the returned snapshot to the live board.
    pub fn load_scene(&mut self, id: &SceneId) -> BoardResult<SceneSnapshot> {
        let scene = self
            .scenes
            .get(id)
            .ok_or_else(|| BoardError::NotFound(format!("no scene {id}")))?
            .clone();
        self.current = Some(id.clone());
        Ok(scene)
    }

    /// Repopulate the scene mapping from storage. On failure the existing
    /// mapping is left untouched and the error is reported.
    pub async fn load_all_scenes(&mut self) -> BoardResult<()> {
        let loaded = self.persistence.fetch_scenes(&self.user_id).await?;
        self.scenes = loaded;
        if let Some(current) = &self.current {
            if !self.scenes.contains_key(current) {
                self.current = None;
            }
        }
        Ok(())
    }

    pub async fn delete_scene(&mut self, id: &SceneId) -> BoardResult<()> {
        if self.scenes.remove(id).is_none() {
            return Err(BoardError::NotFound(format!("no scene {id}")));
        }
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }

        if let Err(e) = self.persistence.delete_scene(&self.user_id, id).await {
            log::warn!("scene {id} deleted locally but not in storage: {e}");
            return Err(e);
        }
        Ok(())
    }

    pub async fn rename_scene(&mut self, id: &SceneId, new_name: &str) -> BoardResult<()> {
        if new_name.trim().is_empty() {
            return Err(BoardError::Validation(
                "scene name cannot be blank".to_string(),
            ));
        }
        let scene = self
            .scenes
            .get_mut(id)
            .ok_or_else(|| BoardError::NotFound(format!("no scene {id}")))?;
        scene.name = new_name.to_string();

        if let Err(e) = self
            .persistence
            .rename_scene(&self.user_id, id, new_name)
            .await
        {
            log::warn!("scene {id} renamed locally but not in storage: {e}");
            return Err(e);
        }
        Ok(())
    }
}
