use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::entity::EntityId;
use crate::tile::Coordinate;

/// Problems with the game configuration, detected before the first tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("initial snake segment {coord} lies outside the {rows}x{cols} grid")]
    SnakeOutOfBounds { coord: Coordinate, rows: u16, cols: u16 },

    #[error("initial snake of {length} segments leaves no room for fruit on a {cells}-cell grid")]
    SnakeTooLong { length: u16, cells: usize },

    #[error("unknown direction {0:?} (expected up, down, left or right)")]
    InvalidDirection(String),

    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures reported by the board arbiter.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum BoardError {
    #[error("no free cell left for fruit on a {cells}-cell grid")]
    Full { cells: usize },

    #[error("cell {0} is already occupied")]
    Occupied(Coordinate),

    #[error("entity {0} is not registered on the board")]
    UnknownEntity(EntityId),
}

/// Top-level failure surfaced by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialize logger")]
    Logger(#[from] log::SetLoggerError),
}
