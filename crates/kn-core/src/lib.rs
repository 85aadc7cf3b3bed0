//! Core model for Kennel: geometry, road topology, maps, loot and dogs.
//!
//! This crate holds the static world description (maps built from roads,
//! buildings and offices) and the per-player [`Dog`] entity. It knows nothing
//! about ticks or sessions; those live in `kn-simulation`.

/// Dog entity: position, velocity, bag and idle/play counters.
pub mod dog;
/// Error types used throughout the crate.
pub mod error;
/// Integer map coordinates and floating-point simulation coordinates.
pub mod geometry;
/// Loot items spawned on a map.
pub mod loot;
/// Roads, buildings, offices and the map that owns them.
pub mod map;

/// Re-export dog types.
pub use dog::{Action, Dog, DogId};
/// Re-export error types.
pub use error::{ModelError, ModelResult};
/// Re-export geometry types.
pub use geometry::{Direction, Movement, Offset, Point, Position, Rectangle, Size, Speed};
/// Re-export loot types.
pub use loot::{Loot, LootId};
/// Re-export map types.
pub use map::{Building, LootType, Map, MapId, Office, OfficeId, Road};
