use kn_core::{DogId, MapId, ModelError};

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by the game, its sessions and the collision engine.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No map with this id is registered.
    #[error("map not found: {0}")]
    MapNotFound(MapId),

    /// A map with this id is already registered.
    #[error("map already registered: {0}")]
    DuplicateMap(MapId),

    /// The session has no dog with this id.
    #[error("dog {dog} not found on map {map}")]
    DogNotFound {
        /// The session's map.
        map: MapId,
        /// The missing dog.
        dog: DogId,
    },

    /// A saved session lists the same dog twice.
    #[error("duplicate dog {0} in session state")]
    DuplicateDog(DogId),

    /// A saved session belongs to another map.
    #[error("session state for map {found} cannot restore map {expected}")]
    SessionMismatch {
        /// The map of the session being restored.
        expected: MapId,
        /// The map named by the saved state.
        found: MapId,
    },

    /// Ticks must advance time.
    #[error("tick delta must be positive")]
    InvalidTickDelta,

    /// A gather event points past the gatherer list.
    #[error("gather event references gatherer {0}, which does not exist")]
    GathererOutOfRange(usize),

    /// A gather event points past the item list.
    #[error("gather event references item {0}, which does not exist")]
    ItemOutOfRange(usize),

    /// Error from the model layer.
    #[error(transparent)]
    Model(#[from] ModelError),
}
