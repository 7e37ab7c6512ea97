//! End-to-end sessions through the board facade: bootstrap, playback,
//! autosave, and scene load as a hard reset.

use deck_board::Soundboard;
use deck_core::BoardError;
use deck_engine::NullBackend;
use deck_scene::{MemoryPersistence, ScenePersistence};
use std::sync::Arc;

fn new_board(persistence: &Arc<MemoryPersistence>) -> Soundboard<MemoryPersistence> {
    Soundboard::new(Arc::new(NullBackend), Arc::clone(persistence), "u1").with_transition_seed(42)
}

async fn settle_autosave(persistence: &MemoryPersistence) {
    // Every autosave task was spawned before this is called; yielding a
    // bounded number of times lets them all run to completion.
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
    assert!(persistence.has_state("u1"), "autosave task never ran");
}

#[tokio::test]
async fn test_bootstrap_applies_default_scene() {
    let persistence = Arc::new(MemoryPersistence::new());
    let mut board = new_board(&persistence);

    board.bootstrap().await.unwrap();

    assert_eq!(board.store().len(), 3);
    assert_eq!(
        board.store().categories(),
        ["Music", "Sound Effects", "Ambience"]
    );
    assert!((board.global_volume() - 1.0).abs() < 1e-6);
    assert!(board.scenes().current().unwrap().is_default_scene());
    assert_eq!(persistence.scene_count("u1"), 1);
}

#[tokio::test]
async fn test_toggle_plays_one_sound_at_a_time() {
    let persistence = Arc::new(MemoryPersistence::new());
    let mut board = new_board(&persistence);
    board.bootstrap().await.unwrap();

    let group = board.add_group("Ambience").unwrap();
    board.add_sound(group, "Rain", "blob:rain", 0.7).unwrap();
    board.add_sound(group, "Wind", "blob:wind", 0.5).unwrap();

    let first = board.toggle_group_playback(group).unwrap().unwrap();
    assert_eq!(board.playing_sound(group), Some(first));

    let second = board.toggle_group_playback(group).unwrap().unwrap();
    assert_eq!(board.playing_sound(group), Some(second));

    // The fade-out pause for the first sound resolves on a later tick; at
    // most one sound in the group is left audible.
    board.tick_at(board.now_ms() + 10_000);
    let audible = board
        .store()
        .group(group)
        .unwrap()
        .sounds
        .iter()
        .filter(|s| s.is_handle_playing())
        .count();
    assert_eq!(audible, 1);

    board.stop_group(group).unwrap();
    assert_eq!(board.playing_sound(group), None);
    board.tick_at(board.now_ms() + 10_000);
    let audible = board
        .store()
        .group(group)
        .unwrap()
        .sounds
        .iter()
        .filter(|s| s.is_handle_playing())
        .count();
    assert_eq!(audible, 0);
}

#[tokio::test]
async fn test_toggle_unknown_group_is_validation_error() {
    let persistence = Arc::new(MemoryPersistence::new());
    let mut board = new_board(&persistence);

    let err = board.toggle_group_playback(deck_core::GroupId::new());
    assert!(matches!(err, Err(BoardError::Validation(_))));
}

#[tokio::test]
async fn test_global_volume_retargets_playing_sound() {
    let persistence = Arc::new(MemoryPersistence::new());
    let mut board = new_board(&persistence);
    board.bootstrap().await.unwrap();

    let group = board.add_group("Music").unwrap();
    board.add_sound(group, "Theme", "blob:theme", 0.8).unwrap();
    board.set_group_volume(group, 0.5).unwrap();

    let id = board.toggle_group_playback(group).unwrap().unwrap();
    board.set_global_volume(0.5);

    let sound = board.store().group(group).unwrap().sound(id).unwrap();
    let handle_volume = sound.handle.as_ref().unwrap().volume();
    // 0.8 * 0.5 * 0.5
    assert!((handle_volume - 0.2).abs() < 1e-6);
}

#[tokio::test]
async fn test_group_mutations_autosave_categorized_state() {
    let persistence = Arc::new(MemoryPersistence::new());
    let mut board = new_board(&persistence);
    board.bootstrap().await.unwrap();

    let group = board.add_group("Music").unwrap();
    board.add_sound(group, "Drums", "blob:drums", 1.0).unwrap();
    settle_autosave(&persistence).await;

    let state = persistence.fetch_state("u1").await.unwrap().unwrap();
    let music = &state.categories["Music"];
    assert_eq!(music.len(), 2);
    assert!(music.iter().any(|g| g.sounds.iter().any(|s| s.name == "Drums")));
}

#[tokio::test]
async fn test_remove_group_returns_urls_and_stops_playback() {
    let persistence = Arc::new(MemoryPersistence::new());
    let mut board = new_board(&persistence);
    board.bootstrap().await.unwrap();

    let group = board.add_group("Sound Effects").unwrap();
    board.add_sound(group, "Clang", "blob:clang", 1.0).unwrap();
    board.add_sound(group, "Thud", "blob:thud", 1.0).unwrap();
    board.toggle_group_playback(group).unwrap();

    let mut urls = board.remove_group(group).unwrap();
    urls.sort();
    assert_eq!(urls, ["blob:clang", "blob:thud"]);
    assert!(board.playing_sound(group).is_none());
    assert!(board.store().group(group).is_none());
}

#[tokio::test]
async fn test_load_scene_is_a_hard_reset() {
    let persistence = Arc::new(MemoryPersistence::new());
    let mut board = new_board(&persistence);
    board.bootstrap().await.unwrap();

    let group = board.add_group("Ambience").unwrap();
    board.add_sound(group, "Creek", "blob:creek", 0.9).unwrap();
    board.set_global_volume(0.6);
    let scene_id = board.create_scene("Forest").await.unwrap();

    // Mutate away from the snapshot, with a sound playing.
    board.set_global_volume(1.0);
    board.toggle_group_playback(group).unwrap();
    board.add_group("Music").unwrap();

    board.load_scene(&scene_id).await.unwrap();

    assert!((board.global_volume() - 0.6).abs() < 1e-6);
    assert_eq!(board.store().len(), 4);
    // Nothing plays after a load; ids survive the round trip.
    assert!(board.playing_sound(group).is_none());
    let restored = board.store().group(group).unwrap();
    assert_eq!(restored.sounds.len(), 1);
    assert_eq!(restored.sounds[0].name, "Creek");
    assert!(!restored.sounds[0].is_handle_playing());
}

#[tokio::test]
async fn test_save_current_scene_overwrites_in_place() {
    let persistence = Arc::new(MemoryPersistence::new());
    let mut board = new_board(&persistence);
    board.bootstrap().await.unwrap();

    let scene_id = board.create_scene("Camp").await.unwrap();
    board.set_global_volume(0.3);
    let saved = board.save_current_scene().await.unwrap();
    assert_eq!(saved, scene_id);

    let stored = board.scenes().scene(&scene_id).unwrap();
    assert_eq!(stored.name, "Camp");
    assert!((stored.global_volume - 0.3).abs() < 1e-6);
}

#[tokio::test]
async fn test_restore_autosaved_state_rebuilds_board() {
    let persistence = Arc::new(MemoryPersistence::new());
    {
        let mut board = new_board(&persistence);
        board.bootstrap().await.unwrap();
        let group = board.add_group("Music").unwrap();
        board.add_sound(group, "March", "blob:march", 0.4).unwrap();
        settle_autosave(&persistence).await;
    }

    let mut fresh = new_board(&persistence);
    assert!(fresh.restore_autosaved_state().await.unwrap());

    let march = fresh
        .store()
        .groups()
        .iter()
        .flat_map(|g| g.sounds.iter())
        .find(|s| s.name == "March")
        .unwrap();
    assert!((march.volume - 0.4).abs() < 1e-6);

    let empty = Arc::new(MemoryPersistence::new());
    let mut blank = Soundboard::new(Arc::new(NullBackend), Arc::clone(&empty), "u1");
    assert!(!blank.restore_autosaved_state().await.unwrap());
}
