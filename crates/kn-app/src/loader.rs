//! Game configuration file.
//!
//! The config is a JSON document with global defaults, the loot generator
//! settings and a list of maps. Per-map `dogSpeed` and `bagCapacity`
//! override the global defaults.

use std::path::Path;
use std::time::Duration;

use kn_core::{
    Building, LootType, Map, MapId, Offset, Office, OfficeId, Point, Rectangle, Road, Size,
};
use kn_simulation::{Game, SimConfig};
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};

/// The whole config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Speed for maps without `dogSpeed`.
    #[serde(default = "default_dog_speed")]
    pub default_dog_speed: f64,
    /// Bag capacity for maps without `bagCapacity`.
    #[serde(default = "default_bag_capacity")]
    pub default_bag_capacity: usize,
    /// Idle seconds before a dog retires.
    #[serde(default = "default_retirement_time")]
    pub dog_retirement_time: f64,
    /// Loot spawn policy.
    pub loot_generator_config: LootGeneratorConfig,
    /// Maps in registration order.
    pub maps: Vec<MapConfig>,
}

fn default_dog_speed() -> f64 {
    1.0
}

fn default_bag_capacity() -> usize {
    3
}

fn default_retirement_time() -> f64 {
    60.0
}

/// Loot generator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LootGeneratorConfig {
    /// Base interval in seconds.
    pub period: f64,
    /// Probability that a missing item spawns within one period.
    pub probability: f64,
}

/// One map entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    /// Unique map id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Overrides `defaultDogSpeed`.
    #[serde(default)]
    pub dog_speed: Option<f64>,
    /// Overrides `defaultBagCapacity`.
    #[serde(default)]
    pub bag_capacity: Option<usize>,
    /// Loot table; index is the loot type.
    #[serde(default)]
    pub loot_types: Vec<LootType>,
    /// Road segments.
    #[serde(default)]
    pub roads: Vec<RoadConfig>,
    /// Buildings, display only.
    #[serde(default)]
    pub buildings: Vec<BuildingConfig>,
    /// Delivery points.
    #[serde(default)]
    pub offices: Vec<OfficeConfig>,
}

/// A road: `x1` makes it horizontal, `y1` vertical.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadConfig {
    /// Start x.
    pub x0: i32,
    /// Start y.
    pub y0: i32,
    /// End x of a horizontal road.
    #[serde(default)]
    pub x1: Option<i32>,
    /// End y of a vertical road.
    #[serde(default)]
    pub y1: Option<i32>,
}

/// A building rectangle.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingConfig {
    /// Left x.
    pub x: i32,
    /// Top y.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

/// An office entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeConfig {
    /// Unique office id within the map.
    pub id: String,
    /// Office x.
    pub x: i32,
    /// Office y.
    pub y: i32,
    /// Display offset x.
    pub offset_x: i32,
    /// Display offset y.
    pub offset_y: i32,
}

impl RoadConfig {
    fn to_road(&self, map: &str) -> AppResult<Road> {
        let start = Point::new(self.x0, self.y0);
        match (self.x1, self.y1) {
            (Some(x1), _) => Ok(Road::horizontal(start, x1)),
            (None, Some(y1)) => Ok(Road::vertical(start, y1)),
            (None, None) => Err(AppError::InvalidConfig(format!(
                "road at ({}, {}) on map {map} has neither x1 nor y1",
                self.x0, self.y0
            ))),
        }
    }
}

impl GameConfig {
    /// Parse a config document.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Fold the file's settings into `base`, keeping its seed and spawn mode.
    pub fn sim_config(&self, base: SimConfig) -> AppResult<SimConfig> {
        let retirement = seconds("dogRetirementTime", self.dog_retirement_time)?;
        let period = seconds("lootGeneratorConfig.period", self.loot_generator_config.period)?;
        let probability = self.loot_generator_config.probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(AppError::InvalidConfig(format!(
                "loot probability {probability} is outside 0..=1"
            )));
        }
        Ok(base
            .with_retirement_time(retirement)
            .with_loot(period, probability)
            .with_default_dog_speed(self.default_dog_speed)
            .with_default_bag_capacity(self.default_bag_capacity))
    }

    /// Build every map. Maps without `dogSpeed` or `bagCapacity` take the
    /// defaults carried by `sim`.
    pub fn build_maps(&self, sim: &SimConfig) -> AppResult<Vec<Map>> {
        self.maps.iter().map(|m| build_map(m, sim)).collect()
    }

    /// Build a game with one session per map.
    pub fn into_game(self, base: SimConfig) -> AppResult<Game> {
        let sim = self.sim_config(base)?;
        let maps = self.build_maps(&sim)?;
        let mut game = Game::new(sim);
        for map in maps {
            game.add_map(map)?;
        }
        info!(maps = game.maps().len(), "game loaded");
        Ok(game)
    }
}

fn build_map(config: &MapConfig, sim: &SimConfig) -> AppResult<Map> {
    let mut map = Map::new(
        MapId::new(config.id.clone()),
        config.name.clone(),
        config.dog_speed.unwrap_or(sim.default_dog_speed),
        config.bag_capacity.unwrap_or(sim.default_bag_capacity),
        config.loot_types.clone(),
    );
    for road in &config.roads {
        map.add_road(road.to_road(&config.id)?);
    }
    for b in &config.buildings {
        map.add_building(Building::new(Rectangle {
            position: Point::new(b.x, b.y),
            size: Size {
                width: b.w,
                height: b.h,
            },
        }));
    }
    for o in &config.offices {
        map.add_office(Office::new(
            OfficeId(o.id.clone()),
            Point::new(o.x, o.y),
            Offset {
                dx: o.offset_x,
                dy: o.offset_y,
            },
        ))?;
    }
    Ok(map)
}

fn seconds(field: &str, value: f64) -> AppResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| AppError::InvalidConfig(format!("{field} must be a non-negative number of seconds, got {value}")))
}

/// Load a game from a config file.
pub fn load_game(path: &Path, base: SimConfig) -> AppResult<Game> {
    GameConfig::from_file(path)?.into_game(base)
}
