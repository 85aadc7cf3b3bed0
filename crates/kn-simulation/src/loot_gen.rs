use std::time::Duration;

/// Decides how many loot items to spawn each tick.
///
/// The target is one item per player. Time without any spawn accumulates
/// across calls; after one full base interval the chance that a missing item
/// has appeared equals the configured probability. The credit resets
/// whenever something spawns.
#[derive(Debug, Clone, PartialEq)]
pub struct LootGenerator {
    base_interval: Duration,
    probability: f64,
    time_without_loot: Duration,
}

impl LootGenerator {
    /// Create a generator. `probability` is clamped to `0.0..=1.0`.
    pub fn new(base_interval: Duration, probability: f64) -> Self {
        Self {
            base_interval,
            probability: probability.clamp(0.0, 1.0),
            time_without_loot: Duration::ZERO,
        }
    }

    /// Base spawn interval.
    pub fn base_interval(&self) -> Duration {
        self.base_interval
    }

    /// Spawn probability per interval.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Time accumulated since the last spawn.
    pub fn time_without_loot(&self) -> Duration {
        self.time_without_loot
    }

    /// Restore the accumulated time, e.g. from a snapshot.
    pub fn set_time_without_loot(&mut self, time: Duration) {
        self.time_without_loot = time;
    }

    /// Number of items to spawn after `delta` has passed, given the loot
    /// already on the map and the number of players. Never exceeds the
    /// shortfall `looter_count - loot_count`.
    pub fn generate(&mut self, delta: Duration, loot_count: usize, looter_count: usize) -> usize {
        self.time_without_loot += delta;
        let shortage = looter_count.saturating_sub(loot_count);
        if shortage == 0 {
            return 0;
        }

        let ratio = if self.base_interval.is_zero() {
            f64::INFINITY
        } else {
            self.time_without_loot.as_secs_f64() / self.base_interval.as_secs_f64()
        };
        let chance = (1.0 - (1.0 - self.probability).powf(ratio)).clamp(0.0, 1.0);
        let generated = ((shortage as f64 * chance).round() as usize).min(shortage);

        if generated > 0 {
            self.time_without_loot = Duration::ZERO;
        }
        generated
    }
}
