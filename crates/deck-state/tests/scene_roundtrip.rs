//! Scene round-trip law
//!
//! `from_snapshot(to_snapshot(x))` must reproduce every observable field of
//! `x`: ids, names, volumes, fade durations, category assignments, and
//! sound/group ordering. Only the opaque resource identity may differ.

use deck_engine::{AudioBackend, NullBackend, Sound};
use deck_state::{GroupStore, from_snapshot, to_snapshot};

fn build_board() -> GroupStore {
    let backend = NullBackend;
    let mut store = GroupStore::new();
    store.add_category("Voices").unwrap();

    let music = store.add_group("Music").unwrap();
    store.rename_group(music, "Battle Themes").unwrap();
    store.group_mut(music).unwrap().set_group_volume(0.5);
    store.group_mut(music).unwrap().set_fade_ms(300);
    for (name, volume) in [("Strings", 0.5f32), ("Brass", 0.8), ("Choir", 0.33)] {
        let url = format!("blob:{}", name.to_lowercase());
        let sound = Sound::new(name, &url, volume).with_handle(backend.create(&url).unwrap());
        store.add_sound(music, sound).unwrap();
    }

    let ambience = store.add_group("Ambience").unwrap();
    store.group_mut(ambience).unwrap().set_fade_ms(4200);
    let rain = Sound::new("Rain", "blob:rain", 0.9);
    store.add_sound(ambience, rain).unwrap();

    // Voices stays empty on purpose; categories round-trip even without
    // groups.
    store
}

#[test]
fn roundtrip_preserves_observable_fields() {
    let store = build_board();
    let scene = to_snapshot(&store, 0.6, "Siege of the Keep");
    let (rebuilt, global) = from_snapshot(&scene, &NullBackend);

    assert!((global - 0.6).abs() < 1e-6);
    assert_eq!(rebuilt.categories(), store.categories());
    assert_eq!(rebuilt.len(), store.len());

    for (original, restored) in store.groups().iter().zip(rebuilt.groups()) {
        assert_eq!(original.id, restored.id);
        assert_eq!(original.name, restored.name);
        assert_eq!(original.category, restored.category);
        assert_eq!(original.group_volume, restored.group_volume);
        assert_eq!(original.fade_ms, restored.fade_ms);
        assert_eq!(original.sounds.len(), restored.sounds.len());
        for (a, b) in original.sounds.iter().zip(&restored.sounds) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.name, b.name);
            assert_eq!(a.url, b.url);
            assert_eq!(a.volume, b.volume);
            // The resource is freshly instantiated, never reused: every
            // sound with a valid url comes back with a live handle.
            assert!(b.handle.is_some());
        }
    }
}

#[test]
fn roundtrip_survives_json_serialization() {
    let store = build_board();
    let scene = to_snapshot(&store, 1.0, "Siege of the Keep");

    let json = serde_json::to_string_pretty(&scene).unwrap();
    let parsed = serde_json::from_str(&json).unwrap();
    assert_eq!(scene, parsed);

    let (rebuilt, _) = from_snapshot(&parsed, &NullBackend);
    let second = to_snapshot(&rebuilt, 1.0, "Siege of the Keep");
    assert_eq!(scene, second);
}
