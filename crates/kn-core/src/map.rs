use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::geometry::{Coord, Direction, Offset, Point, Position, Rectangle, approx_eq};

/// Half of a road's width: roads extend this far on each side of the centerline.
pub const ROAD_HALF_WIDTH: f64 = 0.4;

/// Identifier of a map, unique within a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub String);

impl MapId {
    /// Create a map id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MapId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of an office, unique within its map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfficeId(pub String);

impl fmt::Display for OfficeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfficeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Inclusive axis-aligned bounds in simulation coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Top-left (minimum) corner.
    pub min: Position,
    /// Bottom-right (maximum) corner.
    pub max: Position,
}

impl Bounds {
    /// Returns `true` if `pos` lies inside the bounds, edges included
    /// within the position tolerance.
    pub fn contains(&self, pos: Position) -> bool {
        let ge = |lhs: f64, rhs: f64| lhs > rhs || approx_eq(lhs, rhs);
        let le = |lhs: f64, rhs: f64| lhs < rhs || approx_eq(lhs, rhs);
        ge(pos.x, self.min.x) && le(pos.x, self.max.x) && ge(pos.y, self.min.y) && le(pos.y, self.max.y)
    }
}

/// A straight horizontal or vertical road.
///
/// The walkable area is the centerline padded by [`ROAD_HALF_WIDTH`] on all
/// sides. It is computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    start: Point,
    end: Point,
    bounds: Bounds,
}

impl Road {
    /// A road running along `start.y` from `start.x` to `end_x`.
    pub fn horizontal(start: Point, end_x: Coord) -> Self {
        Self::between(start, Point::new(end_x, start.y))
    }

    /// A road running along `start.x` from `start.y` to `end_y`.
    pub fn vertical(start: Point, end_y: Coord) -> Self {
        Self::between(start, Point::new(start.x, end_y))
    }

    fn between(start: Point, end: Point) -> Self {
        let min = Position::new(
            f64::from(start.x.min(end.x)) - ROAD_HALF_WIDTH,
            f64::from(start.y.min(end.y)) - ROAD_HALF_WIDTH,
        );
        let max = Position::new(
            f64::from(start.x.max(end.x)) + ROAD_HALF_WIDTH,
            f64::from(start.y.max(end.y)) + ROAD_HALF_WIDTH,
        );
        Self {
            start,
            end,
            bounds: Bounds { min, max },
        }
    }

    /// First endpoint.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Second endpoint.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Returns `true` for roads along the x axis. Single-point roads are both.
    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    /// Returns `true` for roads along the y axis. Single-point roads are both.
    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    /// The padded walkable area.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns `true` if `pos` is on the road, padding included.
    pub fn contains(&self, pos: Position) -> bool {
        self.bounds.contains(pos)
    }

    /// Clamp `target` to this road's edge along `dir`.
    ///
    /// A target already on the road is returned unchanged.
    pub fn clamp(&self, dir: Direction, mut target: Position) -> Position {
        if self.contains(target) {
            return target;
        }
        match dir {
            Direction::North => target.y = self.bounds.min.y,
            Direction::South => target.y = self.bounds.max.y,
            Direction::West => target.x = self.bounds.min.x,
            Direction::East => target.x = self.bounds.max.x,
        }
        target
    }
}

/// A static building. Only used for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    bounds: Rectangle,
}

impl Building {
    /// Create a building occupying `bounds`.
    pub fn new(bounds: Rectangle) -> Self {
        Self { bounds }
    }

    /// The building footprint.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

/// A base where dogs exchange their bag for score.
#[derive(Debug, Clone, PartialEq)]
pub struct Office {
    id: OfficeId,
    position: Point,
    offset: Offset,
}

impl Office {
    /// Create an office at `position`, drawn shifted by `offset`.
    pub fn new(id: OfficeId, position: Point, offset: Offset) -> Self {
        Self {
            id,
            position,
            offset,
        }
    }

    /// The office id.
    pub fn id(&self) -> &OfficeId {
        &self.id
    }

    /// Location on the grid.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Drawing offset.
    pub fn offset(&self) -> Offset {
        self.offset
    }
}

/// One entry of a map's loot table.
///
/// `value` is the price credited when the item is delivered. Every other
/// property (name, file, color, ...) is display data kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootType {
    /// Price of one item of this type.
    pub value: i64,
    /// Display properties, opaque to the simulation.
    #[serde(flatten)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl LootType {
    /// A loot type with the given price and no display properties.
    pub fn priced(value: i64) -> Self {
        Self {
            value,
            properties: serde_json::Map::new(),
        }
    }
}

/// An immutable game map.
#[derive(Debug, Clone)]
pub struct Map {
    id: MapId,
    name: String,
    roads: Vec<Road>,
    buildings: Vec<Building>,
    offices: Vec<Office>,
    office_index: HashMap<OfficeId, usize>,
    dog_speed: f64,
    bag_capacity: usize,
    loot_types: Vec<LootType>,
}

impl Map {
    /// Create an empty map. Roads, buildings and offices are added afterwards.
    pub fn new(
        id: MapId,
        name: impl Into<String>,
        dog_speed: f64,
        bag_capacity: usize,
        loot_types: Vec<LootType>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            roads: Vec::new(),
            buildings: Vec::new(),
            offices: Vec::new(),
            office_index: HashMap::new(),
            dog_speed,
            bag_capacity,
            loot_types,
        }
    }

    /// Map id.
    pub fn id(&self) -> &MapId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Roads in insertion order.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Buildings in insertion order.
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Offices in insertion order.
    pub fn offices(&self) -> &[Office] {
        &self.offices
    }

    /// Speed given to dogs moving on this map, in units per second.
    pub fn dog_speed(&self) -> f64 {
        self.dog_speed
    }

    /// Maximum number of items a dog's bag can hold on this map.
    pub fn bag_capacity(&self) -> usize {
        self.bag_capacity
    }

    /// The loot table, indexed by loot type.
    pub fn loot_types(&self) -> &[LootType] {
        &self.loot_types
    }

    /// Number of distinct loot types.
    pub fn loot_type_count(&self) -> usize {
        self.loot_types.len()
    }

    /// Price of a loot type.
    pub fn loot_price(&self, loot_type: usize) -> ModelResult<i64> {
        self.loot_types
            .get(loot_type)
            .map(|t| t.value)
            .ok_or_else(|| ModelError::UnknownLootType {
                map: self.id.clone(),
                loot_type,
            })
    }

    /// Add a road.
    pub fn add_road(&mut self, road: Road) {
        self.roads.push(road);
    }

    /// Add a building.
    pub fn add_building(&mut self, building: Building) {
        self.buildings.push(building);
    }

    /// Add an office. Fails without modifying the map if the id is taken.
    pub fn add_office(&mut self, office: Office) -> ModelResult<()> {
        match self.office_index.entry(office.id.clone()) {
            Entry::Occupied(_) => Err(ModelError::DuplicateOffice {
                map: self.id.clone(),
                office: office.id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(self.offices.len());
                self.offices.push(office);
                Ok(())
            }
        }
    }

    /// Look up an office by id.
    pub fn find_office(&self, id: &OfficeId) -> Option<&Office> {
        self.office_index.get(id).map(|&i| &self.offices[i])
    }

    /// Pick a spawn point for a dog or a loot item.
    ///
    /// Without randomization this is always the start of the first road. With
    /// randomization a road is drawn uniformly, then one of its two endpoints.
    /// A map without roads spawns everything at the origin.
    pub fn spawn_point<R: Rng + ?Sized>(&self, randomize: bool, rng: &mut R) -> Position {
        let Some(first) = self.roads.first() else {
            return Position::default();
        };
        if !randomize {
            return first.start().into();
        }
        let road = &self.roads[rng.random_range(0..self.roads.len())];
        let point = if rng.random_bool(0.5) {
            road.start()
        } else {
            road.end()
        };
        point.into()
    }

    /// Resolve a move from `start` towards `target` against the road network.
    ///
    /// Every road containing `start` clamps `target` to its edge along `dir`;
    /// the result is the clamp reaching furthest along `dir`, so a dog can
    /// cross from one road onto an overlapping one. A start outside every
    /// road cannot move at all.
    pub fn clip_move(&self, dir: Direction, start: Position, target: Position) -> Position {
        let mut best = start;
        for road in self.roads.iter().filter(|r| r.contains(start)) {
            let candidate = road.clamp(dir, target);
            let further = match dir {
                Direction::North => candidate.y < best.y,
                Direction::South => candidate.y > best.y,
                Direction::West => candidate.x < best.x,
                Direction::East => candidate.x > best.x,
            };
            if further {
                best = candidate;
            }
        }
        best
    }
}
