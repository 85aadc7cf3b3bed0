use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use kn_core::{Action, Dog, DogId, Loot, LootId, Map, MapId, Movement, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::collision::{Gatherer, Item, VecProvider, find_gather_events};
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::event::{RetiredDog, RetirementListener};
use crate::loot_gen::LootGenerator;

/// Hit radius of a moving dog.
pub const GATHERER_RADIUS: f64 = 0.6;
/// Hit radius of an office.
pub const OFFICE_RADIUS: f64 = 0.5;
/// Hit radius of a loot item.
pub const LOOT_RADIUS: f64 = 0.0;

/// What happened during one session tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Dogs reported as retired this tick.
    pub retired: Vec<RetiredDog>,
    /// Loot items spawned.
    pub spawned: usize,
    /// Loot items picked up.
    pub collected: usize,
    /// Score credited at offices.
    pub delivered: i64,
}

/// The live state of one map: its dogs and the loot lying around.
///
/// Dog ids are issued from a per-session counter starting at 1, loot ids
/// from a separate counter starting at 0. Neither counter is ever reset.
pub struct GameSession {
    map: Arc<Map>,
    dogs: BTreeMap<DogId, Dog>,
    last_dog_id: u64,
    loot: Vec<Loot>,
    next_loot_id: u64,
    loot_gen: LootGenerator,
    retirement_time: Duration,
    randomize_spawn_points: bool,
    reported_retired: BTreeSet<DogId>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("map", self.map.id())
            .field("dogs", &self.dogs.len())
            .field("loot", &self.loot.len())
            .finish()
    }
}

impl GameSession {
    /// Create an empty session on `map`.
    pub fn new(map: Arc<Map>, config: &SimConfig) -> Self {
        Self {
            map,
            dogs: BTreeMap::new(),
            last_dog_id: 0,
            loot: Vec::new(),
            next_loot_id: 0,
            loot_gen: config.loot_generator(),
            retirement_time: config.retirement_time,
            randomize_spawn_points: config.randomize_spawn_points,
            reported_retired: BTreeSet::new(),
        }
    }

    /// The map this session runs on.
    pub fn map(&self) -> &Arc<Map> {
        &self.map
    }

    /// Id of the map.
    pub fn map_id(&self) -> &MapId {
        self.map.id()
    }

    /// Live dogs in id order.
    pub fn dogs(&self) -> impl Iterator<Item = &Dog> {
        self.dogs.values()
    }

    /// Number of live dogs.
    pub fn dog_count(&self) -> usize {
        self.dogs.len()
    }

    /// Look up a dog.
    pub fn dog(&self, id: DogId) -> Option<&Dog> {
        self.dogs.get(&id)
    }

    /// Look up a dog, mutably.
    pub fn dog_mut(&mut self, id: DogId) -> Option<&mut Dog> {
        self.dogs.get_mut(&id)
    }

    /// Loot lying on the map, in spawn order.
    pub fn loot(&self) -> &[Loot] {
        &self.loot
    }

    /// Last dog id issued, or 0 before the first dog joined.
    pub fn last_dog_id(&self) -> u64 {
        self.last_dog_id
    }

    /// Id the next loot item will get.
    pub fn next_loot_id(&self) -> u64 {
        self.next_loot_id
    }

    /// Spawn a new dog with the map's speed and bag capacity.
    pub fn add_dog<R: Rng + ?Sized>(&mut self, name: impl Into<String>, rng: &mut R) -> DogId {
        self.last_dog_id += 1;
        let id = DogId(self.last_dog_id);
        let mut dog = Dog::new(id, name, self.map.dog_speed(), self.map.bag_capacity());
        dog.set_position(self.map.spawn_point(self.randomize_spawn_points, rng));
        debug!(map = %self.map.id(), dog = %id, position = %dog.position(), "dog spawned");
        self.dogs.insert(id, dog);
        id
    }

    /// Remove a dog, typically after it retired.
    pub fn remove_dog(&mut self, id: DogId) -> Option<Dog> {
        self.reported_retired.remove(&id);
        self.dogs.remove(&id)
    }

    /// Steer a dog.
    pub fn apply_action(&mut self, id: DogId, action: Action) -> SimResult<()> {
        let dog = self.dogs.get_mut(&id).ok_or_else(|| SimError::DogNotFound {
            map: self.map.id().clone(),
            dog: id,
        })?;
        dog.apply(action);
        Ok(())
    }

    /// Place a loot item of `loot_type` at `position`, pricing it from the
    /// map's loot table.
    pub fn add_loot_at(&mut self, loot_type: usize, position: Position) -> SimResult<LootId> {
        let price = self.map.loot_price(loot_type)?;
        let id = LootId(self.next_loot_id);
        self.next_loot_id += 1;
        self.loot.push(Loot {
            id,
            loot_type,
            position,
            price,
        });
        Ok(id)
    }

    /// Advance the session by `delta`.
    ///
    /// Runs aging, retirement, loot spawn, movement, collisions and loot
    /// compaction in that order. Retirements are handed to `listener` right
    /// after the aging scan, before anything else changes.
    pub fn tick<R, L>(&mut self, delta: Duration, rng: &mut R, listener: &mut L) -> SimResult<TickReport>
    where
        R: Rng + ?Sized,
        L: RetirementListener + ?Sized,
    {
        if delta.is_zero() {
            return Err(SimError::InvalidTickDelta);
        }
        let mut report = TickReport {
            retired: self.age_dogs(delta),
            ..TickReport::default()
        };
        if !report.retired.is_empty() {
            for retired in &report.retired {
                info!(map = %retired.map_id, dog = %retired.dog_id, "dog retired");
            }
            listener.on_retire(self, &report.retired);
        }

        report.spawned = self.spawn_loot(delta, rng)?;
        let (movers, gatherers) = self.move_dogs(delta);
        let (collected, delivered) = self.collect(&movers, gatherers)?;
        report.collected = collected;
        report.delivered = delivered;
        Ok(report)
    }

    fn age_dogs(&mut self, delta: Duration) -> Vec<RetiredDog> {
        let mut batch = Vec::new();
        for dog in self.dogs.values_mut() {
            dog.age(delta);
            if !dog.is_retired(self.retirement_time) {
                self.reported_retired.remove(&dog.id());
            } else if self.reported_retired.insert(dog.id()) {
                batch.push(RetiredDog {
                    dog_id: dog.id(),
                    map_id: self.map.id().clone(),
                });
            }
        }
        batch
    }

    fn spawn_loot<R: Rng + ?Sized>(&mut self, delta: Duration, rng: &mut R) -> SimResult<usize> {
        let count = self.loot_gen.generate(delta, self.loot.len(), self.dogs.len());
        if count == 0 {
            return Ok(0);
        }
        let type_count = self.map.loot_type_count();
        if type_count == 0 {
            warn!(map = %self.map.id(), "map has no loot types, skipping spawn");
            return Ok(0);
        }
        for _ in 0..count {
            let loot_type = rng.random_range(0..type_count);
            let position = self.map.spawn_point(self.randomize_spawn_points, rng);
            self.add_loot_at(loot_type, position)?;
        }
        Ok(count)
    }

    /// Move every dog and return the movement segments used for sweeping,
    /// paired with the dog ids in gatherer order.
    fn move_dogs(&mut self, delta: Duration) -> (Vec<DogId>, Vec<Gatherer>) {
        let secs = delta.as_secs_f64();
        let mut movers = Vec::with_capacity(self.dogs.len());
        let mut gatherers = Vec::with_capacity(self.dogs.len());

        for dog in self.dogs.values_mut() {
            let start = dog.position();
            let speed = dog.speed();
            let candidate = Position::new(
                start.x + speed.horizontal * secs,
                start.y + speed.vertical * secs,
            );
            let movement = Movement {
                start,
                end: candidate,
            };
            if dog.is_moving() {
                let clipped = self.map.clip_move(dog.direction(), start, candidate);
                // Exact comparison: a step shorter than the position epsilon
                // that runs into a wall must still stop the dog.
                if clipped.x != candidate.x || clipped.y != candidate.y {
                    dog.apply(Action::Stop);
                }
                dog.set_position(clipped);
            }

            movers.push(dog.id());
            gatherers.push(Gatherer {
                start: movement.start,
                end: movement.end,
                radius: GATHERER_RADIUS,
            });
        }
        (movers, gatherers)
    }

    fn collect(&mut self, movers: &[DogId], gatherers: Vec<Gatherer>) -> SimResult<(usize, i64)> {
        let loot_count = self.loot.len();
        let items = self
            .loot
            .iter()
            .map(|loot| Item {
                position: loot.position,
                radius: LOOT_RADIUS,
            })
            .chain(self.map.offices().iter().map(|office| Item {
                position: office.position().into(),
                radius: OFFICE_RADIUS,
            }))
            .collect::<Vec<_>>();
        let item_count = items.len();
        let events = find_gather_events(&VecProvider::new(items, gatherers));

        let mut collected = vec![false; loot_count];
        let mut delivered = 0;
        for event in events {
            let dog_id = movers
                .get(event.gatherer_id)
                .copied()
                .ok_or(SimError::GathererOutOfRange(event.gatherer_id))?;
            if event.item_id >= item_count {
                return Err(SimError::ItemOutOfRange(event.item_id));
            }
            let dog = self.dogs.get_mut(&dog_id).ok_or_else(|| SimError::DogNotFound {
                map: self.map.id().clone(),
                dog: dog_id,
            })?;

            if event.item_id >= loot_count {
                delivered += dog.deliver_bag();
            } else if !collected[event.item_id] && dog.add_loot(self.loot[event.item_id].clone()) {
                collected[event.item_id] = true;
            }
        }

        let mut idx = 0;
        self.loot.retain(|_| {
            let keep = !collected[idx];
            idx += 1;
            keep
        });
        let picked = collected.iter().filter(|&&c| c).count();
        Ok((picked, delivered))
    }

    /// Drop every dog and loot item. Id counters keep running, so ids
    /// issued before are never handed out again.
    pub fn clear(&mut self) {
        self.dogs.clear();
        self.loot.clear();
        self.reported_retired.clear();
    }

    /// Capture everything needed to resume this session later.
    pub fn export_state(&self) -> SessionState {
        SessionState {
            map_id: self.map.id().clone(),
            dogs: self.dogs.values().cloned().collect(),
            loot: self.loot.clone(),
            last_dog_id: self.last_dog_id,
            next_loot_id: self.next_loot_id,
            loot_timer: self.loot_gen.time_without_loot(),
        }
    }

    /// Check that `state` could be restored into this session.
    pub fn validate_state(&self, state: &SessionState) -> SimResult<()> {
        if &state.map_id != self.map.id() {
            return Err(SimError::SessionMismatch {
                expected: self.map.id().clone(),
                found: state.map_id.clone(),
            });
        }
        let mut seen = BTreeSet::new();
        for dog in &state.dogs {
            dog.validate()?;
            if !seen.insert(dog.id()) {
                return Err(SimError::DuplicateDog(dog.id()));
            }
        }
        for loot in &state.loot {
            self.map.loot_price(loot.loot_type)?;
        }
        Ok(())
    }

    /// Replace the session's dogs and loot with a previously exported state.
    ///
    /// Nothing changes unless [`validate_state`](Self::validate_state) passes.
    pub fn restore_state(&mut self, state: SessionState) -> SimResult<()> {
        self.validate_state(&state)?;

        let dogs: BTreeMap<DogId, Dog> = state.dogs.into_iter().map(|d| (d.id(), d)).collect();
        let max_dog_id = dogs.keys().next_back().map_or(0, |id| id.0);
        let max_loot_id = state.loot.iter().map(|l| l.id.0 + 1).max().unwrap_or(0);

        self.dogs = dogs;
        self.loot = state.loot;
        self.last_dog_id = state.last_dog_id.max(max_dog_id);
        self.next_loot_id = state.next_loot_id.max(max_loot_id);
        self.loot_gen.set_time_without_loot(state.loot_timer);
        self.reported_retired.clear();
        Ok(())
    }
}

/// Serializable state of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// The map the session runs on.
    pub map_id: MapId,
    /// Every live dog, including its bag and counters.
    pub dogs: Vec<Dog>,
    /// Loot lying on the map.
    pub loot: Vec<Loot>,
    /// Last dog id issued.
    pub last_dog_id: u64,
    /// Next loot id to issue.
    pub next_loot_id: u64,
    /// Time accumulated by the loot generator since its last spawn.
    pub loot_timer: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::IgnoreRetirements;
    use kn_core::{Direction, LootType, Office, Offset, Point, Road, Speed};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SECOND: Duration = Duration::from_secs(1);

    fn quiet_config() -> SimConfig {
        SimConfig::default().with_loot(Duration::from_secs(5), 0.0)
    }

    fn line_map(length: i32, speed: f64, bag_capacity: usize) -> Map {
        let loot_types = vec![LootType::priced(10), LootType::priced(20), LootType::priced(30)];
        let mut map = Map::new(MapId::new("town"), "Town", speed, bag_capacity, loot_types);
        map.add_road(Road::horizontal(Point::new(0, 0), length));
        map
    }

    fn session(map: Map, config: &SimConfig) -> GameSession {
        GameSession::new(Arc::new(map), config)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn dogs_get_sequential_ids_from_one() {
        let mut session = session(line_map(10, 1.0, 3), &quiet_config());
        let mut rng = rng();
        assert_eq!(session.add_dog("Rex", &mut rng), DogId(1));
        assert_eq!(session.add_dog("Fido", &mut rng), DogId(2));
        session.remove_dog(DogId(2));
        assert_eq!(session.add_dog("Spot", &mut rng), DogId(3));
        let dog = session.dog(DogId(1)).unwrap();
        assert_eq!(dog.position(), Position::new(0.0, 0.0));
        assert_eq!(dog.bag_capacity(), 3);
    }

    #[test]
    fn dog_moves_freely_inside_road() {
        let mut session = session(line_map(10, 1.0, 3), &quiet_config());
        let mut rng = rng();
        let id = session.add_dog("Rex", &mut rng);
        session.apply_action(id, Action::Move(Direction::East)).unwrap();

        session.tick(SECOND, &mut rng, &mut IgnoreRetirements).unwrap();

        let dog = session.dog(id).unwrap();
        assert_eq!(dog.position(), Position::new(1.0, 0.0));
        assert_eq!(dog.speed(), Speed::new(1.0, 0.0));
    }

    #[test]
    fn wall_stops_dog_at_road_edge() {
        let mut session = session(line_map(10, 1.0, 3), &quiet_config());
        let mut rng = rng();
        let id = session.add_dog("Rex", &mut rng);
        session.dog_mut(id).unwrap().set_position(Position::new(9.9, 0.0));
        session.apply_action(id, Action::Move(Direction::East)).unwrap();

        session.tick(SECOND, &mut rng, &mut IgnoreRetirements).unwrap();

        let dog = session.dog(id).unwrap();
        assert_eq!(dog.position(), Position::new(10.4, 0.0));
        assert!(!dog.is_moving());
        assert_eq!(dog.direction(), Direction::East);
    }

    #[test]
    fn very_slow_dog_still_advances() {
        let mut session = session(line_map(10, 0.0005, 3), &quiet_config());
        let mut rng = rng();
        let id = session.add_dog("Rex", &mut rng);
        session.apply_action(id, Action::Move(Direction::East)).unwrap();

        for _ in 0..10_000 {
            session
                .tick(Duration::from_millis(1), &mut rng, &mut IgnoreRetirements)
                .unwrap();
        }

        let dog = session.dog(id).unwrap();
        assert!((dog.position().x - 0.005).abs() < 1e-9);
        assert!(dog.is_moving());
    }

    #[test]
    fn tiny_step_into_wall_stops_dog() {
        let mut session = session(line_map(10, 0.0005, 3), &quiet_config());
        let mut rng = rng();
        let id = session.add_dog("Rex", &mut rng);
        session.dog_mut(id).unwrap().set_position(Position::new(10.4, 0.0));
        session.apply_action(id, Action::Move(Direction::East)).unwrap();

        session
            .tick(Duration::from_millis(1), &mut rng, &mut IgnoreRetirements)
            .unwrap();

        let dog = session.dog(id).unwrap();
        assert!(!dog.is_moving());
        assert_eq!(dog.position(), Position::new(10.4, 0.0));
    }

    #[test]
    fn full_bag_skips_loot_and_office_credits_score() {
        let mut map = line_map(20, 10.0, 2);
        map.add_office(Office::new("o1".into(), Point::new(6, 0), Offset::default()))
            .unwrap();
        let mut session = session(map, &quiet_config());
        let mut rng = rng();
        session.add_loot_at(0, Position::new(2.0, 0.0)).unwrap();
        session.add_loot_at(1, Position::new(3.0, 0.0)).unwrap();
        session.add_loot_at(2, Position::new(4.0, 0.0)).unwrap();
        let id = session.add_dog("Rex", &mut rng);
        session.apply_action(id, Action::Move(Direction::East)).unwrap();

        let report = session.tick(SECOND, &mut rng, &mut IgnoreRetirements).unwrap();

        let dog = session.dog(id).unwrap();
        assert_eq!(dog.position(), Position::new(10.0, 0.0));
        assert_eq!(dog.score(), 30);
        assert!(dog.bag().is_empty());
        assert_eq!(report.collected, 2);
        assert_eq!(report.delivered, 30);
        assert_eq!(session.loot().len(), 1);
        assert_eq!(session.loot()[0].position, Position::new(4.0, 0.0));
        assert_eq!(session.loot()[0].price, 30);
    }

    #[test]
    fn loot_is_picked_up_once() {
        // Two dogs sweep over the same item in the same tick.
        let mut session = session(line_map(20, 5.0, 3), &quiet_config());
        let mut rng = rng();
        session.add_loot_at(1, Position::new(3.0, 0.0)).unwrap();
        let first = session.add_dog("Rex", &mut rng);
        let second = session.add_dog("Fido", &mut rng);
        session.dog_mut(second).unwrap().set_position(Position::new(1.0, 0.0));
        session.apply_action(first, Action::Move(Direction::East)).unwrap();
        session.apply_action(second, Action::Move(Direction::East)).unwrap();

        session.tick(SECOND, &mut rng, &mut IgnoreRetirements).unwrap();

        let bags: usize = session.dogs().map(|d| d.bag().len()).sum();
        assert_eq!(bags, 1);
        // The second dog reaches the item earlier along its own path.
        assert_eq!(session.dog(second).unwrap().bag().len(), 1);
        assert!(session.loot().is_empty());
    }

    #[test]
    fn stationary_dog_collects_nothing() {
        let mut session = session(line_map(10, 1.0, 3), &quiet_config());
        let mut rng = rng();
        let id = session.add_dog("Rex", &mut rng);
        session.add_loot_at(0, Position::new(0.0, 0.0)).unwrap();

        session.tick(SECOND, &mut rng, &mut IgnoreRetirements).unwrap();

        assert!(session.dog(id).unwrap().bag().is_empty());
        assert_eq!(session.loot().len(), 1);
    }

    #[test]
    fn retirement_is_reported_exactly_once() {
        let config = quiet_config().with_retirement_time(SECOND);
        let mut session = session(line_map(10, 1.0, 3), &config);
        let mut rng = rng();
        let id = session.add_dog("Rex", &mut rng);

        let mut batches: Vec<Vec<RetiredDog>> = Vec::new();
        let mut record = |_: &mut GameSession, batch: &[RetiredDog]| batches.push(batch.to_vec());
        session.tick(Duration::from_millis(600), &mut rng, &mut record).unwrap();
        session.tick(Duration::from_millis(400), &mut rng, &mut record).unwrap();
        session.tick(Duration::from_millis(400), &mut rng, &mut record).unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0],
            vec![RetiredDog {
                dog_id: id,
                map_id: MapId::new("town"),
            }]
        );
        // The session never removes the dog on its own.
        assert!(session.dog(id).is_some());
    }

    #[test]
    fn listener_can_remove_retired_dogs() {
        let config = quiet_config().with_retirement_time(SECOND);
        let mut session = session(line_map(10, 1.0, 3), &config);
        let mut rng = rng();
        let idle = session.add_dog("Rex", &mut rng);
        let busy = session.add_dog("Fido", &mut rng);
        session.apply_action(busy, Action::Move(Direction::East)).unwrap();

        let mut scores = Vec::new();
        let mut remove = |session: &mut GameSession, batch: &[RetiredDog]| {
            for retired in batch {
                if let Some(dog) = session.remove_dog(retired.dog_id) {
                    scores.push((dog.name().to_string(), dog.score()));
                }
            }
        };
        let report = session.tick(SECOND, &mut rng, &mut remove).unwrap();

        assert_eq!(report.retired.len(), 1);
        assert_eq!(scores, vec![("Rex".to_string(), 0)]);
        assert!(session.dog(idle).is_none());
        assert!(session.dog(busy).is_some());
    }

    #[test]
    fn spawned_loot_is_priced_from_map() {
        let config = SimConfig::default().with_loot(SECOND, 1.0);
        let mut session = session(line_map(10, 1.0, 3), &config);
        let mut rng = rng();
        session.add_dog("Rex", &mut rng);
        session.add_dog("Fido", &mut rng);

        let report = session.tick(SECOND, &mut rng, &mut IgnoreRetirements).unwrap();

        assert_eq!(report.spawned, 2);
        let loot = session.loot();
        assert_eq!(loot.len(), 2);
        assert_eq!(loot[0].id, LootId(0));
        assert_eq!(loot[1].id, LootId(1));
        for item in loot {
            assert_eq!(item.price, session.map().loot_price(item.loot_type).unwrap());
            assert_eq!(item.position, Position::new(0.0, 0.0));
        }
        assert_eq!(session.next_loot_id(), 2);
    }

    #[test]
    fn map_without_loot_types_spawns_nothing() {
        let config = SimConfig::default().with_loot(SECOND, 1.0);
        let mut map = Map::new(MapId::new("bare"), "Bare", 1.0, 3, Vec::new());
        map.add_road(Road::vertical(Point::new(0, 0), 5));
        let mut session = session(map, &config);
        let mut rng = rng();
        session.add_dog("Rex", &mut rng);

        let report = session.tick(SECOND, &mut rng, &mut IgnoreRetirements).unwrap();
        assert_eq!(report.spawned, 0);
        assert!(session.loot().is_empty());
    }

    #[test]
    fn zero_delta_is_rejected() {
        let mut session = session(line_map(10, 1.0, 3), &quiet_config());
        let result = session.tick(Duration::ZERO, &mut rng(), &mut IgnoreRetirements);
        assert!(matches!(result, Err(SimError::InvalidTickDelta)));
    }

    #[test]
    fn unknown_dog_action_fails() {
        let mut session = session(line_map(10, 1.0, 3), &quiet_config());
        let result = session.apply_action(DogId(9), Action::Stop);
        assert!(matches!(result, Err(SimError::DogNotFound { dog: DogId(9), .. })));
    }

    #[test]
    fn state_roundtrip_reproduces_session() {
        let config = SimConfig::default().with_loot(SECOND, 1.0);
        let map = Arc::new(line_map(20, 2.0, 3));
        let mut original = GameSession::new(Arc::clone(&map), &config);
        let mut rng = rng();
        let rex = original.add_dog("Rex", &mut rng);
        original.add_dog("Fido", &mut rng);
        original.apply_action(rex, Action::Move(Direction::East)).unwrap();
        original.add_loot_at(2, Position::new(1.0, 0.0)).unwrap();
        for _ in 0..3 {
            original
                .tick(Duration::from_millis(250), &mut rng, &mut IgnoreRetirements)
                .unwrap();
        }

        let json = serde_json::to_string(&original.export_state()).unwrap();
        let state: SessionState = serde_json::from_str(&json).unwrap();
        let mut restored = GameSession::new(map, &config);
        restored.restore_state(state).unwrap();

        assert_eq!(restored.dogs().collect::<Vec<_>>(), original.dogs().collect::<Vec<_>>());
        assert_eq!(restored.loot(), original.loot());
        assert_eq!(restored.last_dog_id(), original.last_dog_id());
        assert_eq!(restored.next_loot_id(), original.next_loot_id());
        assert_eq!(restored.export_state(), original.export_state());
        assert_eq!(restored.add_dog("Spot", &mut rng), DogId(3));
    }

    #[test]
    fn restore_rejects_foreign_or_duplicate_state() {
        let config = quiet_config();
        let mut source = session(line_map(10, 1.0, 3), &config);
        let mut rng = rng();
        source.add_dog("Rex", &mut rng);
        let mut state = source.export_state();

        let mut other = GameSession::new(
            Arc::new(Map::new(MapId::new("elsewhere"), "Elsewhere", 1.0, 3, Vec::new())),
            &config,
        );
        assert!(matches!(
            other.restore_state(state.clone()),
            Err(SimError::SessionMismatch { .. })
        ));

        state.dogs.push(state.dogs[0].clone());
        let mut target = session(line_map(10, 1.0, 3), &config);
        target.add_dog("Keep", &mut rng);
        assert!(matches!(
            target.restore_state(state),
            Err(SimError::DuplicateDog(DogId(1)))
        ));
        // A failed restore leaves the session untouched.
        assert_eq!(target.dog(DogId(1)).unwrap().name(), "Keep");
    }

    #[test]
    fn clear_keeps_id_counters() {
        let mut session = session(line_map(10, 1.0, 3), &quiet_config());
        let mut rng = rng();
        session.add_dog("Rex", &mut rng);
        session.add_loot_at(0, Position::new(3.0, 0.0)).unwrap();

        session.clear();

        assert_eq!(session.dog_count(), 0);
        assert!(session.loot().is_empty());
        assert_eq!(session.add_dog("Fido", &mut rng), DogId(2));
        assert_eq!(session.add_loot_at(0, Position::new(3.0, 0.0)).unwrap(), LootId(1));
    }
}
