//! deck-board: The soundboard facade
//!
//! Composes the group store, transition controller, scene codec, and scene
//! manager behind a single mutation entry point. All UI intents land here,
//! which is what serializes access to the board state: no two mutations
//! ever interleave at the data-structure level.

mod board;

pub use board::*;
