use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::grid::GridSize;
use crate::tile::{Color, Coordinate, Direction};

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default grid width in tiles.
pub const DEFAULT_COLUMNS: u16 = 20;

/// Default grid height in tiles.
pub const DEFAULT_ROWS: u16 = 20;

/// Default tile width in terminal columns.
pub const DEFAULT_TILE_SIZE: u16 = 2;

/// Default simulation rate in ticks per second.
pub const DEFAULT_TICK_RATE: u16 = 10;

/// Default initial snake length.
pub const DEFAULT_SNAKE_LENGTH: u16 = 3;

/// Default head position; with [`DEFAULT_DIRECTION`] the body covers
/// (10,5), (10,6), (10,7).
pub const DEFAULT_SNAKE_START: Coordinate = Coordinate::new(10, 5);

pub const DEFAULT_DIRECTION: Direction = Direction::Left;

/// Every tunable of one game session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub columns: u16,
    pub rows: u16,
    pub tile_size: u16,
    pub tick_rate: u16,
    pub snake_length: u16,
    pub snake_start: Coordinate,
    pub snake_direction: Direction,
    pub background_colors: [Color; 2],
    pub snake_color: Color,
    pub fruit_color: Color,
    /// Fixed RNG seed for reproducible fruit placement.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            tile_size: DEFAULT_TILE_SIZE,
            tick_rate: DEFAULT_TICK_RATE,
            snake_length: DEFAULT_SNAKE_LENGTH,
            snake_start: DEFAULT_SNAKE_START,
            snake_direction: DEFAULT_DIRECTION,
            background_colors: [Color::White, Color::Black],
            snake_color: Color::Green,
            fruit_color: Color::Red,
            seed: None,
        }
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub columns: Option<u16>,
    pub rows: Option<u16>,
    pub tile_size: Option<u16>,
    pub tick_rate: Option<u16>,
    pub snake_length: Option<u16>,
    pub snake_direction: Option<Direction>,
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`. A missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a JSON document; absent fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Applies command-line values on top of this configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(columns) = overrides.columns {
            self.columns = columns;
        }
        if let Some(rows) = overrides.rows {
            self.rows = rows;
        }
        if let Some(tile_size) = overrides.tile_size {
            self.tile_size = tile_size;
        }
        if let Some(tick_rate) = overrides.tick_rate {
            self.tick_rate = tick_rate;
        }
        if let Some(snake_length) = overrides.snake_length {
            self.snake_length = snake_length;
        }
        if let Some(direction) = overrides.snake_direction {
            self.snake_direction = direction;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self
    }

    /// Checks positivity and that the initial snake fits on the grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("columns", self.columns),
            ("rows", self.rows),
            ("tile_size", self.tile_size),
            ("tick_rate", self.tick_rate),
            ("snake_length", self.snake_length),
        ];
        if let Some((field, _)) = positive.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::NotPositive { field });
        }

        let grid = self.grid();
        if usize::from(self.snake_length) >= grid.total_cells() {
            return Err(ConfigError::SnakeTooLong {
                length: self.snake_length,
                cells: grid.total_cells(),
            });
        }

        let mut coord = self.snake_start;
        for _ in 0..self.snake_length {
            if !grid.contains(coord) {
                return Err(ConfigError::SnakeOutOfBounds {
                    coord,
                    rows: grid.rows,
                    cols: grid.cols,
                });
            }
            coord = coord.offset(self.snake_direction.opposite());
        }

        Ok(())
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize::new(self.rows, self.columns)
    }

    /// Fixed duration of one tick.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / u32::from(self.tick_rate.max(1))
    }
}

/// Returns the platform-correct path of the optional config file.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Returns the platform-correct default log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push("grid-snake.log");
    base
}

/// Ensures the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{ConfigOverrides, GameConfig};
    use crate::error::ConfigError;
    use crate::tile::{Color, Coordinate, Direction};

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let config = GameConfig {
            rows: 0,
            ..GameConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "rows" })
        ));
    }

    #[test]
    fn snake_leaving_grid_is_rejected() {
        let config = GameConfig {
            columns: 6,
            rows: 12,
            ..GameConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnakeOutOfBounds { coord, .. }) if coord == Coordinate::new(10, 6)
        ));
    }

    #[test]
    fn snake_filling_grid_is_rejected() {
        let config = GameConfig {
            columns: 3,
            rows: 1,
            snake_start: Coordinate::new(0, 0),
            snake_direction: Direction::Left,
            ..GameConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnakeTooLong { length: 3, cells: 3 })
        ));
    }

    #[test]
    fn json_fields_override_defaults() {
        let config = GameConfig::from_json(
            r##"{ "columns": 30, "snake_direction": "up", "fruit_color": "#ff8800" }"##,
        )
        .expect("valid json");

        assert_eq!(config.columns, 30);
        assert_eq!(config.rows, 20);
        assert_eq!(config.snake_direction, Direction::Up);
        assert_eq!(config.fruit_color, Color::Rgb(0xff, 0x88, 0x00));
    }

    #[test]
    fn unknown_json_field_is_rejected() {
        assert!(GameConfig::from_json(r#"{ "speed": 3 }"#).is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let config = GameConfig::default().with_overrides(&ConfigOverrides {
            columns: Some(40),
            seed: Some(9),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.columns, 40);
        assert_eq!(config.rows, 20);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn load_reads_explicit_file() {
        let path = unique_test_path("explicit");
        fs::create_dir_all(path.parent().expect("temp path has parent"))
            .expect("test directory should be creatable");
        fs::write(&path, r#"{ "rows": 8, "snake_start": { "row": 3, "col": 2 } }"#)
            .expect("test file write should succeed");

        let config = GameConfig::load(Some(&path)).expect("config should load");

        assert_eq!(config.rows, 8);
        assert_eq!(config.snake_start, Coordinate::new(3, 2));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_reports_missing_explicit_file() {
        let path = unique_test_path("missing");

        assert!(matches!(
            GameConfig::load(Some(&path)),
            Err(ConfigError::Read { .. })
        ));
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grid-snake-config-tests")
            .join(format!("{label}-{nanos}.json"))
    }
}
