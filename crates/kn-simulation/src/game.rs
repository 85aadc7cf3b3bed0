use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use kn_core::{DogId, Map, MapId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::event::RetirementListener;
use crate::session::{GameSession, TickReport};

type TickListener = Box<dyn FnMut(Duration) + Send>;

/// All maps of a game and one live session per map.
///
/// Sessions are created when their map is registered and live as long as
/// the game. The game owns the only RNG used for spawning, seeded from
/// [`SimConfig::seed`].
pub struct Game {
    config: SimConfig,
    maps: Vec<Arc<Map>>,
    map_index: HashMap<MapId, usize>,
    sessions: Vec<GameSession>,
    rng: StdRng,
    clock: SimClock,
    tick_listeners: Vec<TickListener>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("tick", &self.clock.tick())
            .field("maps", &self.maps.len())
            .field("tick_listeners", &self.tick_listeners.len())
            .finish()
    }
}

impl Game {
    /// Create a game without maps.
    pub fn new(config: SimConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            maps: Vec::new(),
            map_index: HashMap::new(),
            sessions: Vec::new(),
            rng,
            clock: SimClock::new(),
            tick_listeners: Vec::new(),
        }
    }

    /// The configuration the game was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks and game time elapsed.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Register a map and open its session. Fails without touching the game
    /// if the id is already taken.
    pub fn add_map(&mut self, map: Map) -> SimResult<()> {
        if self.map_index.contains_key(map.id()) {
            return Err(SimError::DuplicateMap(map.id().clone()));
        }
        let map = Arc::new(map);
        info!(map = %map.id(), roads = map.roads().len(), offices = map.offices().len(), "map registered");
        self.map_index.insert(map.id().clone(), self.maps.len());
        self.sessions.push(GameSession::new(Arc::clone(&map), &self.config));
        self.maps.push(map);
        Ok(())
    }

    /// Maps in registration order.
    pub fn maps(&self) -> &[Arc<Map>] {
        &self.maps
    }

    /// Look up a map by id.
    pub fn find_map(&self, id: &MapId) -> Option<&Arc<Map>> {
        self.map_index.get(id).map(|&i| &self.maps[i])
    }

    /// The session running on `id`.
    pub fn session(&self, id: &MapId) -> Option<&GameSession> {
        self.map_index.get(id).map(|&i| &self.sessions[i])
    }

    /// The session running on `id`, mutably.
    pub fn session_mut(&mut self, id: &MapId) -> Option<&mut GameSession> {
        self.map_index.get(id).map(|&i| &mut self.sessions[i])
    }

    /// Sessions in map registration order.
    pub fn sessions(&self) -> &[GameSession] {
        &self.sessions
    }

    /// Sessions in map registration order, mutably.
    pub fn sessions_mut(&mut self) -> &mut [GameSession] {
        &mut self.sessions
    }

    /// Spawn a dog on `map_id` using the game's RNG.
    pub fn add_dog(&mut self, map_id: &MapId, name: impl Into<String>) -> SimResult<DogId> {
        let idx = *self
            .map_index
            .get(map_id)
            .ok_or_else(|| SimError::MapNotFound(map_id.clone()))?;
        Ok(self.sessions[idx].add_dog(name, &mut self.rng))
    }

    /// Register a callback run after every tick, in registration order.
    pub fn on_tick<F>(&mut self, listener: F)
    where
        F: FnMut(Duration) + Send + 'static,
    {
        self.tick_listeners.push(Box::new(listener));
    }

    /// Advance every session by `delta`, then notify tick listeners.
    ///
    /// Retirements from every session go to `listener` while that session
    /// ticks. A zero delta is rejected before anything changes.
    pub fn tick<L>(&mut self, delta: Duration, listener: &mut L) -> SimResult<Vec<TickReport>>
    where
        L: RetirementListener + ?Sized,
    {
        if delta.is_zero() {
            return Err(SimError::InvalidTickDelta);
        }
        let mut reports = Vec::with_capacity(self.sessions.len());
        for session in &mut self.sessions {
            reports.push(session.tick(delta, &mut self.rng, &mut *listener)?);
        }
        let tick = self.clock.advance(delta);
        debug!(
            tick,
            spawned = reports.iter().map(|r| r.spawned).sum::<usize>(),
            collected = reports.iter().map(|r| r.collected).sum::<usize>(),
            retired = reports.iter().map(|r| r.retired.len()).sum::<usize>(),
            "tick complete"
        );
        for notify in &mut self.tick_listeners {
            notify(delta);
        }
        Ok(reports)
    }
}
