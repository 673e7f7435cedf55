pub mod board;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod game;
pub mod grid;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod tile;
pub mod ui;
