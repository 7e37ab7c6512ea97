//! Identifier newtypes
//!
//! Groups and sounds are keyed by v4 UUIDs. Scenes are keyed by strings so
//! the well-known bootstrap id `defaultScene` can coexist with generated ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a sound group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a single sound within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(Uuid);

impl SoundId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SoundId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Id of the scene synthesized on first load for a new user.
pub const DEFAULT_SCENE_ID: &str = "defaultScene";

/// Identifier of a persisted scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The canonical bootstrap scene id.
    pub fn default_scene() -> Self {
        Self(DEFAULT_SCENE_ID.to_string())
    }

    /// Whether this is the bootstrap scene id.
    pub fn is_default_scene(&self) -> bool {
        self.0 == DEFAULT_SCENE_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SceneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(GroupId::new(), GroupId::new());
        assert_ne!(SoundId::new(), SoundId::new());
        assert_ne!(SceneId::new(), SceneId::new());
    }

    #[test]
    fn test_default_scene_id() {
        let id = SceneId::default_scene();
        assert!(id.is_default_scene());
        assert_eq!(id.as_str(), DEFAULT_SCENE_ID);
        assert!(!SceneId::new().is_default_scene());
    }
}
