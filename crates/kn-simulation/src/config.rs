use std::time::Duration;

use crate::loot_gen::LootGenerator;

/// Configuration shared by a game and all of its sessions.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for deterministic spawning.
    pub seed: u64,
    /// Spawn dogs and loot at random road endpoints instead of the first road's start.
    pub randomize_spawn_points: bool,
    /// Idle time after which a dog is retired.
    pub retirement_time: Duration,
    /// Base interval of the loot spawn policy.
    pub loot_period: Duration,
    /// Probability that a missing item spawns within one base interval.
    pub loot_probability: f64,
    /// Dog speed for maps that do not set their own.
    pub default_dog_speed: f64,
    /// Bag capacity for maps that do not set their own.
    pub default_bag_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            randomize_spawn_points: false,
            retirement_time: Duration::from_secs(60),
            loot_period: Duration::from_secs(5),
            loot_probability: 0.5,
            default_dog_speed: 1.0,
            default_bag_capacity: 3,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable random spawn points.
    pub fn with_randomized_spawn(mut self, randomize: bool) -> Self {
        self.randomize_spawn_points = randomize;
        self
    }

    /// Set the idle time after which dogs retire.
    pub fn with_retirement_time(mut self, time: Duration) -> Self {
        self.retirement_time = time;
        self
    }

    /// Set the loot spawn policy parameters.
    pub fn with_loot(mut self, period: Duration, probability: f64) -> Self {
        self.loot_period = period;
        self.loot_probability = probability;
        self
    }

    /// Set the default dog speed.
    pub fn with_default_dog_speed(mut self, speed: f64) -> Self {
        self.default_dog_speed = speed;
        self
    }

    /// Set the default bag capacity.
    pub fn with_default_bag_capacity(mut self, capacity: usize) -> Self {
        self.default_bag_capacity = capacity;
        self
    }

    /// A fresh loot generator with this configuration's parameters.
    pub fn loot_generator(&self) -> LootGenerator {
        LootGenerator::new(self.loot_period, self.loot_probability)
    }
}
