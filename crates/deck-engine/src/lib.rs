//! deck-engine: Layered playback engine for SoundDeck
//!
//! The live side of the board: sounds and groups carrying engine-backed
//! playback handles, the three-level volume resolver, and the transition
//! controller that sequences fade-in/fade-out play state without racing
//! the next user action.

mod model;
mod playable;
mod resolver;
mod transition;

pub use model::*;
pub use playable::*;
pub use resolver::*;
pub use transition::*;
