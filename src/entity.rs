use std::fmt;

use crate::grid::GridSize;
use crate::snake::Snake;
use crate::tile::{Color, Coordinate, Tile};

/// Stable index of an entity slot in the board's arena.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityId(usize);

impl EntityId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminant of [`Entity`], cheap to copy out of a borrow.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EntityKind {
    Background,
    Snake,
    Fruit,
}

/// Static two-color checkerboard covering the whole grid.
#[derive(Debug, Clone)]
pub struct Checkerboard {
    grid: GridSize,
    colors: [Color; 2],
}

impl Checkerboard {
    #[must_use]
    pub fn new(grid: GridSize, colors: [Color; 2]) -> Self {
        Self { grid, colors }
    }

    /// Cells where `row + col` is even take the first color.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let colors = self.colors;
        self.grid.coordinates().map(move |coord| {
            let parity = usize::from((coord.row + coord.col).rem_euclid(2) == 1);
            Tile::new(coord, colors[parity])
        })
    }
}

/// Single-cell collectible.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Fruit {
    tile: Tile,
}

impl Fruit {
    #[must_use]
    pub fn new(coord: Coordinate, color: Color) -> Self {
        Self {
            tile: Tile::new(coord, color),
        }
    }

    #[must_use]
    pub fn coord(self) -> Coordinate {
        self.tile.coord
    }

    #[must_use]
    pub fn tile(self) -> Tile {
        self.tile
    }
}

/// Every kind of object the board can hold.
#[derive(Debug, Clone)]
pub enum Entity {
    Background(Checkerboard),
    Snake(Snake),
    Fruit(Fruit),
}

impl Entity {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Background(_) => EntityKind::Background,
            Self::Snake(_) => EntityKind::Snake,
            Self::Fruit(_) => EntityKind::Fruit,
        }
    }

    /// Background entities are drawn but never collide.
    #[must_use]
    pub fn is_background(&self) -> bool {
        matches!(self, Self::Background(_))
    }

    /// Lazily yields the tiles currently occupied, in drawing order.
    pub fn tiles(&self) -> Box<dyn Iterator<Item = Tile> + '_> {
        match self {
            Self::Background(board) => Box::new(board.tiles()),
            Self::Snake(snake) => Box::new(snake.tiles()),
            Self::Fruit(fruit) => Box::new(std::iter::once(fruit.tile())),
        }
    }

    #[must_use]
    pub fn occupies(&self, coord: Coordinate) -> bool {
        self.tiles().any(|tile| tile.coord == coord)
    }

    #[must_use]
    pub fn as_snake(&self) -> Option<&Snake> {
        match self {
            Self::Snake(snake) => Some(snake),
            _ => None,
        }
    }

    pub fn as_snake_mut(&mut self) -> Option<&mut Snake> {
        match self {
            Self::Snake(snake) => Some(snake),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_fruit(&self) -> Option<Fruit> {
        match self {
            Self::Fruit(fruit) => Some(*fruit),
            _ => None,
        }
    }
}
