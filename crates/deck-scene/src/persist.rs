//! Persistence collaborator contract
//!
//! Storage transport is external; the core only sees these async calls.
//! All futures are `Send` so callers can run saves on a background task.
//! Persistence failures are never fatal: local state is the source of truth
//! and is not rolled back (last-write-wins per user).

use deck_core::{BoardResult, SceneId};
use deck_state::{CategorizedState, SceneSnapshot};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;

/// Durable storage for board state and named scenes, keyed by user.
pub trait ScenePersistence: Send + Sync {
    /// Save the autosaved board state.
    fn persist_state(
        &self,
        user_id: &str,
        state: &CategorizedState,
    ) -> impl Future<Output = BoardResult<()>> + Send;

    /// Fetch the autosaved board state, if any.
    fn fetch_state(
        &self,
        user_id: &str,
    ) -> impl Future<Output = BoardResult<Option<CategorizedState>>> + Send;

    /// Save (or overwrite) one scene.
    fn persist_scene(
        &self,
        user_id: &str,
        scene_id: &SceneId,
        scene: &SceneSnapshot,
    ) -> impl Future<Output = BoardResult<()>> + Send;

    /// Fetch every scene for the user.
    fn fetch_scenes(
        &self,
        user_id: &str,
    ) -> impl Future<Output = BoardResult<HashMap<SceneId, SceneSnapshot>>> + Send;

    /// Fetch one scene, if present.
    fn fetch_scene(
        &self,
        user_id: &str,
        scene_id: &SceneId,
    ) -> impl Future<Output = BoardResult<Option<SceneSnapshot>>> + Send;

    /// Delete one scene.
    fn delete_scene(
        &self,
        user_id: &str,
        scene_id: &SceneId,
    ) -> impl Future<Output = BoardResult<()>> + Send;

    /// Rename one scene in place.
    fn rename_scene(
        &self,
        user_id: &str,
        scene_id: &SceneId,
        new_name: &str,
    ) -> impl Future<Output = BoardResult<()>> + Send;
}

/// In-memory persistence backend for tests and the headless demo.
#[derive(Default)]
pub struct MemoryPersistence {
    states: Mutex<HashMap<String, CategorizedState>>,
    scenes: Mutex<HashMap<String, HashMap<SceneId, SceneSnapshot>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scenes stored for a user (test observability).
    pub fn scene_count(&self, user_id: &str) -> usize {
        self.scenes
            .lock()
            .get(user_id)
            .map(|m| m.len())
            .unwrap_or(0)
    }

    /// Whether an autosaved state exists for a user.
    pub fn has_state(&self, user_id: &str) -> bool {
        self.states.lock().contains_key(user_id)
    }
}

impl ScenePersistence for MemoryPersistence {
    async fn persist_state(&self, user_id: &str, state: &CategorizedState) -> BoardResult<()> {
        self.states
            .lock()
            .insert(user_id.to_string(), state.clone());
        Ok(())
    }

    async fn fetch_state(&self, user_id: &str) -> BoardResult<Option<CategorizedState>> {
        Ok(self.states.lock().get(user_id).cloned())
    }

    async fn persist_scene(
        &self,
        user_id: &str,
        scene_id: &SceneId,
        scene: &SceneSnapshot,
    ) -> BoardResult<()> {
        self.scenes
            .lock()
            .entry(user_id.to_string())
            .or_default()
            .insert(scene_id.clone(), scene.clone());
        Ok(())
    }

    async fn fetch_scenes(&self, user_id: &str) -> BoardResult<HashMap<SceneId, SceneSnapshot>> {
        Ok(self.scenes.lock().get(user_id).cloned().unwrap_or_default())
    }

    async fn fetch_scene(
        &self,
        user_id: &str,
        scene_id: &SceneId,
    ) -> BoardResult<Option<SceneSnapshot>> {
        Ok(self
            .scenes
            .lock()
            .get(user_id)
            .and_then(|m| m.get(scene_id))
            .cloned())
    }

    async fn delete_scene(&self, user_id: &str, scene_id: &SceneId) -> BoardResult<()> {
        if let Some(user_scenes) = self.scenes.lock().get_mut(user_id) {
            user_scenes.remove(scene_id);
        }
        Ok(())
    }

    async fn rename_scene(
        &self,
        user_id: &str,
        scene_id: &SceneId,
        new_name: &str,
    ) -> BoardResult<()> {
        if let Some(scene) = self
            .scenes
            .lock()
            .get_mut(user_id)
            .and_then(|m| m.get_mut(scene_id))
        {
            scene.name = new_name.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_scene(name: &str) -> SceneSnapshot {
        SceneSnapshot {
            name: name.to_string(),
            sound_groups: Vec::new(),
            categories: vec!["Music".to_string()],
            global_volume: 1.0,
        }
    }

    #[tokio::test]
    async fn test_memory_scene_crud() {
        let store = MemoryPersistence::new();
        let id = SceneId::new();

        store
            .persist_scene("u1", &id, &empty_scene("Tavern"))
            .await
            .unwrap();
        assert_eq!(store.scene_count("u1"), 1);
        assert_eq!(store.scene_count("u2"), 0);

        store.rename_scene("u1", &id, "Tavern Brawl").await.unwrap();
        let fetched = store.fetch_scene("u1", &id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Tavern Brawl");

        store.delete_scene("u1", &id).await.unwrap();
        assert!(store.fetch_scene("u1", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_state_is_per_user() {
        let store = MemoryPersistence::new();
        store
            .persist_state("u1", &CategorizedState::default())
            .await
            .unwrap();
        assert!(store.has_state("u1"));
        assert!(store.fetch_state("u2").await.unwrap().is_none());
    }
}
