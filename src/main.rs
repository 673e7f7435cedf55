use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::config::{ConfigOverrides, GameConfig, default_log_path};
use grid_snake::error::AppError;
use grid_snake::game::{GameState, GameStatus};
use grid_snake::input::{GameInput, InputHandler};
use grid_snake::logging;
use grid_snake::renderer::{RenderSink, TerminalSink};
use grid_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use grid_snake::tile::Direction;
use log::{LevelFilter, info};

/// Sleep between input polls inside one tick.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How long the final frame stays on screen after the game ends.
const GAME_OVER_HOLD: Duration = Duration::from_millis(1200);

#[derive(Debug, Parser)]
#[command(version, about = "Grid-based terminal Snake")]
struct Cli {
    /// Number of columns.
    #[arg(short = 'C', long)]
    columns: Option<u16>,

    /// Number of lines.
    #[arg(short = 'L', long = "lines")]
    rows: Option<u16>,

    /// Width of one tile in terminal columns.
    #[arg(short = 'S', long = "square-size")]
    tile_size: Option<u16>,

    /// Ticks per second.
    #[arg(long)]
    tick_rate: Option<u16>,

    /// Initial snake length.
    #[arg(long)]
    length: Option<u16>,

    /// Initial heading (up, down, left, right).
    #[arg(long, value_parser = parse_direction)]
    direction: Option<Direction>,

    /// Seed for reproducible fruit placement.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file; defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file; defaults to the platform data directory.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            columns: self.columns,
            rows: self.rows,
            tile_size: self.tile_size,
            tick_rate: self.tick_rate,
            snake_length: self.length,
            snake_direction: self.direction,
            seed: self.seed,
        }
    }
}

fn parse_direction(value: &str) -> Result<Direction, String> {
    value.parse().map_err(|error| format!("{error}"))
}

fn parse_level(value: &str) -> Result<LevelFilter, String> {
    value
        .parse()
        .map_err(|_| format!("unknown log level {value:?}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(state) => {
            let verdict = match state.status {
                GameStatus::Victory => "You win!",
                GameStatus::GameOver => "Game over!",
                GameStatus::Playing => "Bye!",
            };
            println!("{verdict} Final score: {}", state.score());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("grid-snake: {error}");
            let mut source = error.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<GameState, AppError> {
    let config = GameConfig::load(cli.config.as_deref())?.with_overrides(&cli.overrides());

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    logging::init(&log_path, cli.log_level)?;
    info!("starting {}x{} game: {config:?}", config.rows, config.columns);

    let mut state = GameState::new(&config)?;

    install_panic_hook();
    let mut sink = TerminalSink::new(TerminalSession::enter()?);
    let mut input = InputHandler::new();

    play(&mut state, &mut sink, &mut input, &config)?;
    Ok(state)
}

/// Runs ticks at the configured rate until the game ends or the player quits.
fn play(
    state: &mut GameState,
    sink: &mut impl RenderSink,
    input: &mut InputHandler,
    config: &GameConfig,
) -> Result<(), AppError> {
    let tick_interval = config.tick_interval();
    let mut last_tick = Instant::now();

    sink.render(&state.tiles(), config.tile_size, &state.caption())?;

    while state.is_running() {
        if let Some(command) = input.poll_input()? {
            if command == GameInput::Quit {
                info!("player quit at score {}", state.score());
                return Ok(());
            }
            state.apply_input(command);
        }

        if last_tick.elapsed() >= tick_interval {
            last_tick = Instant::now();
            state.tick();
            sink.render(&state.tiles(), config.tile_size, &state.caption())?;
        }

        thread::sleep(POLL_INTERVAL);
    }

    thread::sleep(GAME_OVER_HOLD);
    Ok(())
}
