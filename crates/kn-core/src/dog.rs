use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::geometry::{Direction, Position, Speed};
use crate::loot::Loot;

/// Identifier of a dog, unique within its session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DogId(pub u64);

impl fmt::Display for DogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A steering command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop in place, keeping the current facing.
    Stop,
    /// Face `Direction` and move along it at full speed.
    Move(Direction),
}

impl FromStr for Action {
    type Err = ModelError;

    /// Parse a wire command: `""` stops, `U`/`D`/`L`/`R` move.
    fn from_str(s: &str) -> ModelResult<Self> {
        if s.is_empty() {
            return Ok(Self::Stop);
        }
        Direction::from_letter(s)
            .map(Self::Move)
            .ok_or_else(|| ModelError::InvalidDirection(s.to_string()))
    }
}

/// A player's avatar.
///
/// Velocity is always axis-aligned: either zero or `max_speed` along the
/// facing direction. The bag never holds more than `bag_capacity` items and
/// the score only grows, when the bag is exchanged at an office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    id: DogId,
    name: String,
    position: Position,
    speed: Speed,
    direction: Direction,
    max_speed: f64,
    bag: Vec<Loot>,
    bag_capacity: usize,
    score: i64,
    idle_time: Duration,
    play_time: Duration,
}

impl Dog {
    /// Create a stopped dog facing north at the origin.
    pub fn new(id: DogId, name: impl Into<String>, max_speed: f64, bag_capacity: usize) -> Self {
        Self {
            id,
            name: name.into(),
            position: Position::default(),
            speed: Speed::ZERO,
            direction: Direction::default(),
            max_speed,
            bag: Vec::new(),
            bag_capacity,
            score: 0,
            idle_time: Duration::ZERO,
            play_time: Duration::ZERO,
        }
    }

    /// Dog id.
    pub fn id(&self) -> DogId {
        self.id
    }

    /// Name given on join.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current velocity.
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Facing direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Speed applied by a move command.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Carried loot, in pickup order.
    pub fn bag(&self) -> &[Loot] {
        &self.bag
    }

    /// Maximum number of carried items.
    pub fn bag_capacity(&self) -> usize {
        self.bag_capacity
    }

    /// Points delivered so far.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Time spent without moving since the last movement.
    pub fn idle_time(&self) -> Duration {
        self.idle_time
    }

    /// Total time since the dog joined.
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    /// Returns `true` if the velocity is non-zero.
    pub fn is_moving(&self) -> bool {
        !self.speed.is_zero()
    }

    /// Returns `true` if no more loot fits.
    pub fn is_bag_full(&self) -> bool {
        self.bag.len() >= self.bag_capacity
    }

    /// Teleport the dog.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Apply a steering command.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Stop => self.speed = Speed::ZERO,
            Action::Move(dir) => {
                self.direction = dir;
                self.speed = dir.velocity(self.max_speed);
            }
        }
    }

    /// Put an item in the bag. Returns `false` and leaves the bag untouched
    /// when it is already full.
    pub fn add_loot(&mut self, loot: Loot) -> bool {
        if self.is_bag_full() {
            return false;
        }
        self.bag.push(loot);
        true
    }

    /// Empty the bag into the score. Returns the amount credited.
    pub fn deliver_bag(&mut self) -> i64 {
        let gained: i64 = self.bag.drain(..).map(|l| l.price).sum();
        self.score += gained;
        gained
    }

    /// Advance the idle and play clocks by `delta`.
    ///
    /// A moving dog has its idle clock reset; a stopped one accumulates.
    pub fn age(&mut self, delta: Duration) {
        if self.is_moving() {
            self.idle_time = Duration::ZERO;
        } else {
            self.idle_time += delta;
        }
        self.play_time += delta;
    }

    /// Returns `true` once the dog has idled for at least `threshold`.
    pub fn is_retired(&self, threshold: Duration) -> bool {
        self.idle_time >= threshold
    }

    /// Check invariants of a dog that came from outside (e.g. a snapshot).
    pub fn validate(&self) -> ModelResult<()> {
        if self.bag.len() > self.bag_capacity {
            return Err(ModelError::BagOverflow {
                len: self.bag.len(),
                capacity: self.bag_capacity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::LootId;

    fn loot(id: u64, price: i64) -> Loot {
        Loot {
            id: LootId(id),
            loot_type: 0,
            position: Position::default(),
            price,
        }
    }

    #[test]
    fn new_dog_is_stopped_facing_north() {
        let dog = Dog::new(DogId(1), "Rex", 2.0, 3);
        assert!(!dog.is_moving());
        assert_eq!(dog.direction(), Direction::North);
        assert_eq!(dog.score(), 0);
        assert!(dog.bag().is_empty());
    }

    #[test]
    fn parse_actions() {
        assert_eq!("".parse::<Action>().unwrap(), Action::Stop);
        assert_eq!("L".parse::<Action>().unwrap(), Action::Move(Direction::West));
        assert!(matches!(
            "X".parse::<Action>(),
            Err(ModelError::InvalidDirection(s)) if s == "X"
        ));
        assert!("u".parse::<Action>().is_err());
    }

    #[test]
    fn move_sets_facing_and_single_axis_speed() {
        let mut dog = Dog::new(DogId(1), "Rex", 2.5, 3);
        dog.apply(Action::Move(Direction::East));
        assert_eq!(dog.speed(), Speed::new(2.5, 0.0));
        dog.apply(Action::Move(Direction::North));
        assert_eq!(dog.speed(), Speed::new(0.0, -2.5));
        assert_eq!(dog.direction(), Direction::North);
    }

    #[test]
    fn stop_keeps_facing() {
        let mut dog = Dog::new(DogId(1), "Rex", 1.0, 3);
        dog.apply(Action::Move(Direction::West));
        dog.apply(Action::Stop);
        assert!(!dog.is_moving());
        assert_eq!(dog.direction(), Direction::West);
    }

    #[test]
    fn bag_is_bounded() {
        let mut dog = Dog::new(DogId(1), "Rex", 1.0, 2);
        assert!(dog.add_loot(loot(0, 10)));
        assert!(dog.add_loot(loot(1, 20)));
        assert!(dog.is_bag_full());
        assert!(!dog.add_loot(loot(2, 30)));
        assert_eq!(dog.bag().len(), 2);
    }

    #[test]
    fn delivery_moves_bag_into_score() {
        let mut dog = Dog::new(DogId(1), "Rex", 1.0, 2);
        dog.add_loot(loot(0, 10));
        dog.add_loot(loot(1, 20));
        assert_eq!(dog.deliver_bag(), 30);
        assert_eq!(dog.score(), 30);
        assert!(dog.bag().is_empty());
        // Delivering an empty bag changes nothing.
        assert_eq!(dog.deliver_bag(), 0);
        assert_eq!(dog.score(), 30);
    }

    #[test]
    fn idle_time_accumulates_only_while_stopped() {
        let mut dog = Dog::new(DogId(1), "Rex", 1.0, 2);
        dog.age(Duration::from_millis(300));
        dog.age(Duration::from_millis(200));
        assert_eq!(dog.idle_time(), Duration::from_millis(500));

        dog.apply(Action::Move(Direction::South));
        dog.age(Duration::from_millis(100));
        assert_eq!(dog.idle_time(), Duration::ZERO);
        assert_eq!(dog.play_time(), Duration::from_millis(600));
    }

    #[test]
    fn retirement_threshold_is_inclusive() {
        let mut dog = Dog::new(DogId(1), "Rex", 1.0, 2);
        let threshold = Duration::from_secs(1);
        dog.age(Duration::from_millis(999));
        assert!(!dog.is_retired(threshold));
        dog.age(Duration::from_millis(1));
        assert!(dog.is_retired(threshold));
    }

    #[test]
    fn validate_rejects_overfull_bag() {
        let json = r#"{
            "id": 4, "name": "Rex",
            "position": {"x": 0.0, "y": 0.0},
            "speed": {"horizontal": 0.0, "vertical": 0.0},
            "direction": "U", "max_speed": 1.0,
            "bag": [
                {"id": 0, "type": 0, "position": {"x": 0.0, "y": 0.0}, "price": 1},
                {"id": 1, "type": 0, "position": {"x": 0.0, "y": 0.0}, "price": 1}
            ],
            "bag_capacity": 1, "score": 0,
            "idle_time": {"secs": 0, "nanos": 0},
            "play_time": {"secs": 0, "nanos": 0}
        }"#;
        let dog: Dog = serde_json::from_str(json).unwrap();
        assert!(matches!(
            dog.validate(),
            Err(ModelError::BagOverflow { len: 2, capacity: 1 })
        ));
    }
}
