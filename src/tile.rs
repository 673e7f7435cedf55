use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub use ratatui::style::Color;
use serde::Deserialize;

use crate::error::ConfigError;

/// Grid coordinate in logical cell units, zero-based.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize)]
pub struct Coordinate {
    pub row: i32,
    pub col: i32,
}

impl Coordinate {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns the coordinate one cell away in `direction`.
    #[must_use]
    pub fn offset(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.unit();
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Canonical movement directions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit vector as `(row, col)` deltas.
    #[must_use]
    pub fn unit(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Self::Up),
            "down" | "d" => Ok(Self::Down),
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            _ => Err(ConfigError::InvalidDirection(value.to_owned())),
        }
    }
}

/// A colored unit cell at a grid coordinate.
///
/// Equality and hashing look at the coordinate only, so two tiles of
/// different colors on the same cell compare equal.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub coord: Coordinate,
    pub color: Color,
}

impl Tile {
    #[must_use]
    pub const fn new(coord: Coordinate, color: Color) -> Self {
        Self { coord, color }
    }

    /// Returns a new tile moved one cell in `direction`, keeping the color.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Self {
        Self {
            coord: self.coord.offset(direction),
            color: self.color,
        }
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}
