use crate::map::{MapId, OfficeId};

/// Alias for `Result<T, ModelError>`.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or mutating the static model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An office with the same id is already registered on the map.
    #[error("duplicate office \"{office}\" on map \"{map}\"")]
    DuplicateOffice {
        /// The map being built.
        map: MapId,
        /// The conflicting office id.
        office: OfficeId,
    },

    /// A movement command was not one of `""`, `U`, `D`, `L`, `R`.
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),

    /// The loot type index is outside the map's price table.
    #[error("unknown loot type {loot_type} on map \"{map}\"")]
    UnknownLootType {
        /// The map whose price table was consulted.
        map: MapId,
        /// The requested loot type index.
        loot_type: usize,
    },

    /// A restored dog carries more loot than its bag can hold.
    #[error("bag overflow: {len} items in a bag of capacity {capacity}")]
    BagOverflow {
        /// Number of items found in the bag.
        len: usize,
        /// The bag capacity.
        capacity: usize,
    },
}
