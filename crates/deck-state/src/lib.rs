//! deck-state: Board state and scene serialization for SoundDeck
//!
//! The owned group/category store with its mutation API, the handle-free
//! snapshot representation of the board, and the codec connecting the two.

mod codec;
mod snapshot;
mod store;

pub use codec::*;
pub use snapshot::*;
pub use store::*;
