//! Error types for the application layer.

use kn_core::{DogId, MapId, ModelError};
use kn_simulation::SimError;
use thiserror::Error;

use crate::player::PlayerId;

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors reported to callers of [`crate::Application`] and the loaders.
#[derive(Debug, Error)]
pub enum AppError {
    /// A player tried to join with an empty name.
    #[error("player name must not be empty")]
    EmptyName,

    /// A token is not 32 hexadecimal characters.
    #[error("malformed token")]
    InvalidToken,

    /// A well-formed token that belongs to no live player.
    #[error("unknown token")]
    UnknownToken,

    /// A leaderboard page size over the limit.
    #[error("invalid page: limit {limit} exceeds {max}")]
    InvalidPagination {
        /// Requested page size.
        limit: usize,
        /// Largest allowed page size.
        max: usize,
    },

    /// The requested map does not exist.
    #[error("map not found: {0}")]
    MapNotFound(MapId),

    /// A saved state references a map the game does not have.
    #[error("saved state references missing session {0}")]
    SessionNotFound(MapId),

    /// A player references a dog that is not in its session.
    #[error("dog {dog} not found on map {map}")]
    DogNotFound {
        /// The map searched.
        map: MapId,
        /// The missing dog.
        dog: DogId,
    },

    /// A saved state lists the same session twice.
    #[error("saved state lists session {0} more than once")]
    DuplicateSession(MapId),

    /// A saved state lists the same player id twice.
    #[error("saved state lists player {0} more than once")]
    DuplicatePlayer(PlayerId),

    /// A saved state hands one token to two players.
    #[error("saved state reuses a token for player {0}")]
    DuplicateToken(PlayerId),

    /// A saved state binds one dog to two players.
    #[error("dog {dog} on map {map} belongs to more than one player")]
    DuplicateDogBinding {
        /// The dog's map.
        map: MapId,
        /// The shared dog.
        dog: DogId,
    },

    /// The game configuration is structurally valid JSON but makes no sense.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Simulation error.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Model error, including malformed directions.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config or state file is not valid JSON for its schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
