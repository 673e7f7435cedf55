use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::board::Board;
use crate::config::GameConfig;
use crate::entity::{Checkerboard, Entity, EntityId};
use crate::error::{BoardError, ConfigError};
use crate::input::GameInput;
use crate::snake::Snake;
use crate::tile::{Direction, Tile};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
    /// Every free cell was filled; no fruit can be placed.
    Victory,
}

/// Why the snake died.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    pub tick_count: u64,
    snake_id: EntityId,
    initial_len: usize,
    pending_direction: Option<Direction>,
}

impl GameState {
    /// Validates `config` and creates a session from it. Uses the configured
    /// seed when present, OS entropy otherwise.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = config.grid();
        let mut board = Board::new(grid, config.fruit_color, rng);
        board.add_object(Entity::Background(Checkerboard::new(
            grid,
            config.background_colors,
        )));

        let snake = Snake::new(
            config.snake_start,
            config.snake_direction,
            usize::from(config.snake_length),
            config.snake_color,
        );
        let initial_len = snake.len();
        let snake_id = board.add_object(Entity::Snake(snake));

        let mut state = Self {
            board,
            status: GameStatus::Playing,
            death_reason: None,
            tick_count: 0,
            snake_id,
            initial_len,
            pending_direction: None,
        };

        if let Err(error) = state.board.create_fruit() {
            info!("no room for the first fruit: {error}");
            state.status = GameStatus::Victory;
        }

        Ok(state)
    }

    /// Buffers one external input. Directions are last-wins until the next
    /// tick; quitting is handled by the runtime.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => {
                if self.status == GameStatus::Playing {
                    self.pending_direction = Some(direction);
                }
            }
            GameInput::Quit => {}
        }
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }

        self.tick_count += 1;

        if let Some(direction) = self.pending_direction.take() {
            if let Some(snake) = self.snake_mut() {
                snake.set_direction(direction);
            }
        }

        let outcome = match self.board.move_object(self.snake_id) {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return,
            Err(error @ BoardError::UnknownEntity(_)) => {
                error!("snake missing from board: {error}");
                self.end(GameStatus::GameOver, None);
                return;
            }
            Err(error) => {
                error!("move failed: {error}");
                return;
            }
        };

        if !self.board.grid().contains(outcome.head) {
            self.end(GameStatus::GameOver, Some(DeathReason::WallCollision));
            return;
        }

        if outcome.self_collision {
            self.end(GameStatus::GameOver, Some(DeathReason::SelfCollision));
            return;
        }

        if outcome.ate {
            info!("fruit eaten at {}, score {}", outcome.head, self.score());
        }

        if outcome.board_full {
            self.end(GameStatus::Victory, None);
        }
    }

    fn end(&mut self, status: GameStatus, reason: Option<DeathReason>) {
        self.status = status;
        self.death_reason = reason;
        info!(
            "game ended after {} ticks: {status:?} {reason:?}, score {}",
            self.tick_count,
            self.score()
        );
    }

    #[must_use]
    pub fn snake(&self) -> Option<&Snake> {
        self.board.get(self.snake_id).and_then(Entity::as_snake)
    }

    fn snake_mut(&mut self) -> Option<&mut Snake> {
        self.board.snake_mut(self.snake_id)
    }

    /// Segments gained since the start of the session.
    #[must_use]
    pub fn score(&self) -> usize {
        self.snake()
            .map_or(0, |snake| snake.len().saturating_sub(self.initial_len))
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Title/status line for the current tick.
    #[must_use]
    pub fn caption(&self) -> String {
        let suffix = match self.status {
            GameStatus::Playing => "",
            GameStatus::GameOver => " - Game over",
            GameStatus::Victory => " - You win!",
        };
        format!("Snake - Score: {}{suffix}", self.score())
    }

    /// Tiles to draw this tick, background first.
    #[must_use]
    pub fn tiles(&self) -> Vec<Tile> {
        self.board.tiles()
    }
}
