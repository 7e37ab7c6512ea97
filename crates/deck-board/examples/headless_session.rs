//! A headless session against the null audio backend: bootstrap a user,
//! build a small board, drive playback and sliders, and round-trip a scene.
//!
//! Run with `RUST_LOG=debug cargo run -p deck-board --example headless_session`.

use deck_board::Soundboard;
use deck_core::BoardResult;
use deck_engine::NullBackend;
use deck_scene::MemoryPersistence;
use std::sync::Arc;

#[tokio::main]
async fn main() -> BoardResult<()> {
    env_logger::init();

    let backend = Arc::new(NullBackend);
    let persistence = Arc::new(MemoryPersistence::new());
    let mut board = Soundboard::new(backend, Arc::clone(&persistence), "demo-user")
        .with_transition_seed(7);

    board.bootstrap().await?;
    println!(
        "bootstrapped: {} groups across {:?}",
        board.store().len(),
        board.store().categories()
    );

    let music = board.add_group("Music")?;
    board.rename_group(music, "Tavern Music")?;
    board.add_sound(music, "Lute Set", "blob:lute-set", 0.8)?;
    board.add_sound(music, "Fiddle Reel", "blob:fiddle-reel", 0.6)?;

    let started = board.toggle_group_playback(music)?;
    println!("now playing in Tavern Music: {started:?}");

    board.set_group_volume(music, 0.5)?;
    board.set_global_volume(0.9);

    // Retoggle picks another clip and fades the first one out; a later tick
    // completes the pause once the fade window has passed.
    let next = board.toggle_group_playback(music)?;
    println!("swapped to: {next:?}");
    board.tick_at(board.now_ms() + 10_000);

    let scene_id = board.create_scene("Tavern Night").await?;
    println!("saved scene {scene_id}");

    board.stop_group(music)?;
    board.load_scene(&scene_id).await?;
    println!(
        "reloaded '{}': {} groups, global volume {}",
        board
            .scenes()
            .scene(&scene_id)
            .map(|s| s.name.as_str())
            .unwrap_or("?"),
        board.store().len(),
        board.global_volume()
    );

    Ok(())
}
