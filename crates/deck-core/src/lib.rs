//! deck-core: Shared types for SoundDeck
//!
//! Ids, the board-wide error taxonomy, and volume/fade bounds used across
//! all SoundDeck crates.

mod error;
mod id;
mod volume;

pub use error::*;
pub use id::*;
pub use volume::*;
