//! Application layer for Kennel.
//!
//! [`Application`] is the facade a transport talks to: it joins players,
//! authorizes them by token, forwards their actions to the simulation and
//! answers state queries. Around it sit the JSON config loader, the
//! leaderboard store and the state snapshot used to survive restarts.

/// The application facade and its view types.
pub mod application;
/// Periodic state saving.
pub mod autosave;
/// Error types for the application crate.
pub mod error;
/// JSON game configuration.
pub mod loader;
/// Player registry.
pub mod player;
/// Leaderboard storage.
pub mod scores;
/// State snapshot persistence.
pub mod snapshot;
/// Bearer tokens.
pub mod token;

pub use application::{Application, JoinResult, MapSummary, PlayerInfo, SessionView};
pub use autosave::AutoSaver;
pub use error::{AppError, AppResult};
pub use loader::{GameConfig, load_game};
pub use player::{Player, PlayerId, Players};
pub use scores::{InMemoryScores, MAX_SCORES_PAGE, ScoreRecord, ScoreStore};
pub use snapshot::{AppState, PlayerRecord, load_state, save_state};
pub use token::{PlayerTokens, Token};
