//! deck-scene: Named scenes and their durable storage seam
//!
//! The async persistence collaborator contract, an in-memory reference
//! backend, and the scene manager's current-scene state machine.

mod manager;
mod persist;

pub use manager::*;
pub use persist::*;
