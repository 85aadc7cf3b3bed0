//! Tick-based simulation for Kennel.
//!
//! A [`Game`] owns one [`GameSession`] per map and advances them in fixed
//! ticks. Each session moves its dogs along the road network, spawns loot and
//! resolves pickups and deliveries with the sweep-based collision engine in
//! [`collision`], which knows nothing about dogs or loot.

/// Simulation clock counting ticks and elapsed time.
pub mod clock;
/// Sweep-based collision detection between moving gatherers and static items.
pub mod collision;
/// Configuration for a game and its sessions.
pub mod config;
/// Error types for the simulation crate.
pub mod error;
/// Retirement notifications raised by sessions.
pub mod event;
/// The game aggregator: maps, sessions and the tick fan-out.
pub mod game;
/// Loot spawn policy.
pub mod loot_gen;
/// One map's live dogs and loot, and the per-tick pipeline.
pub mod session;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::RetiredDog`] and [`event::RetirementListener`].
pub use event::{IgnoreRetirements, RetiredDog, RetirementListener};
/// Re-export of [`game::Game`].
pub use game::Game;
/// Re-export of [`loot_gen::LootGenerator`].
pub use loot_gen::LootGenerator;
/// Re-exports of [`session::GameSession`], [`session::SessionState`] and [`session::TickReport`].
pub use session::{GameSession, SessionState, TickReport};
