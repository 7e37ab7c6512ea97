//! Snapshot representation
//!
//! The serializable, handle-free view of the board. Field names follow the
//! persisted wire format (camelCase), so a snapshot round-trips byte-stable
//! against documents written by earlier deployments.

use deck_core::{DEFAULT_FADE_MS, GroupId, SoundId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_volume() -> f32 {
    1.0
}

fn default_fade_ms() -> u32 {
    DEFAULT_FADE_MS
}

fn default_scene_name() -> String {
    "Untitled Scene".to_string()
}

/// Persisted view of one sound: the location reference, never the handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundSnapshot {
    pub id: SoundId,
    pub name: String,
    pub url: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

/// Persisted view of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub name: String,
    #[serde(default = "default_volume")]
    pub group_volume: f32,
    #[serde(default = "default_fade_ms")]
    pub fade_duration_ms: u32,
    pub category: String,
    #[serde(default)]
    pub sounds: Vec<SoundSnapshot>,
}

/// A named, persisted snapshot of the full board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    #[serde(default = "default_scene_name")]
    pub name: String,
    pub sound_groups: Vec<GroupSnapshot>,
    pub categories: Vec<String>,
    #[serde(default = "default_volume")]
    pub global_volume: f32,
}

/// Wire shape of the autosaved board state:
/// `{ "categories": { categoryName: [group, ...] } }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedState {
    pub categories: BTreeMap<String, Vec<GroupSnapshot>>,
}
