use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer coordinate on the map grid.
pub type Coord = i32;

/// Tolerance used when comparing simulation coordinates.
pub const POSITION_EPSILON: f64 = 1e-6;

/// Compare two floats within [`POSITION_EPSILON`].
pub fn approx_eq(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() < POSITION_EPSILON
}

/// A point on the integer map grid (road ends, offices, building corners).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the east.
    pub x: Coord,
    /// Vertical coordinate, growing to the south.
    pub y: Coord,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

/// Width and height of a rectangle on the map grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: Coord,
    /// Vertical extent.
    pub height: Coord,
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Top-left corner.
    pub position: Point,
    /// Extent from the corner.
    pub size: Size,
}

/// Pixel offset used when drawing an office.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal offset.
    pub dx: Coord,
    /// Vertical offset.
    pub dy: Coord,
}

/// A continuous position used by the simulation.
///
/// Equality is approximate: two positions are equal when both coordinates
/// differ by less than [`POSITION_EPSILON`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        Self {
            x: f64::from(point.x),
            y: f64::from(point.y),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Velocity in map units per second, split per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    /// Horizontal component (positive = east).
    pub horizontal: f64,
    /// Vertical component (positive = south).
    pub vertical: f64,
}

impl Speed {
    /// A speed of zero on both axes.
    pub const ZERO: Self = Self {
        horizontal: 0.0,
        vertical: 0.0,
    };

    /// Create a speed from its components.
    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Returns `true` when both components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.horizontal == 0.0 && self.vertical == 0.0
    }
}

/// Cardinal facing of a dog. North points towards negative `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Up, towards negative `y`.
    #[default]
    #[serde(rename = "U")]
    North,
    /// Down, towards positive `y`.
    #[serde(rename = "D")]
    South,
    /// Left, towards negative `x`.
    #[serde(rename = "L")]
    West,
    /// Right, towards positive `x`.
    #[serde(rename = "R")]
    East,
}

impl Direction {
    /// All four directions in `U`, `D`, `L`, `R` order.
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::West, Self::East];

    /// The single-letter command used on the wire.
    pub fn letter(self) -> &'static str {
        match self {
            Self::North => "U",
            Self::South => "D",
            Self::West => "L",
            Self::East => "R",
        }
    }

    /// Parse a single-letter command. Returns `None` for anything else.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "U" => Some(Self::North),
            "D" => Some(Self::South),
            "L" => Some(Self::West),
            "R" => Some(Self::East),
            _ => None,
        }
    }

    /// Unit velocity along this direction, scaled by `magnitude`.
    pub fn velocity(self, magnitude: f64) -> Speed {
        match self {
            Self::North => Speed::new(0.0, -magnitude),
            Self::South => Speed::new(0.0, magnitude),
            Self::West => Speed::new(-magnitude, 0.0),
            Self::East => Speed::new(magnitude, 0.0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// The segment a dog travelled during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Position before the move.
    pub start: Position,
    /// Position the dog was heading to, before wall clipping.
    pub end: Position,
}

impl Movement {
    /// Returns `true` when the segment has zero length.
    pub fn is_stationary(&self) -> bool {
        self.start == self.end
    }
}
