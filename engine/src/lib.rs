//! Connect 4 decision engine.
//! The board is a 6x7 gravity grid owned by the match loop; the engine
//! provides piece insertion/removal with backtracking support, four-in-a-row
//! detection, and a depth-limited recursive search that picks a column for a
//! computer-controlled player. Rendering and input are left to collaborators
//! behind the [`Renderer`] and [`InputController`] traits.
use thiserror::Error;

pub mod board;
pub mod game;
pub mod search;
pub mod win;

pub use board::{Board, Cell, WinLine};
pub use game::{
    play_match, GameMode, InputController, MatchResult, Renderer, Statistics, TurnCommand,
};
pub use search::{decide, ClockEntropy, Entropy, RngEntropy};
pub use win::{winner_any, winner_from};

pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const WIN_LENGTH: usize = 4;

/// One CPU move in `ERROR_FACTOR` is deliberately random in demo mode.
pub const ERROR_FACTOR: u64 = 20;

pub const CPU_EASY_MAX_DEPTH: usize = 4;
pub const CPU_HARD_MAX_DEPTH: usize = 7;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("column {column} is out of bounds")]
    ColumnOutOfBounds { column: usize },
    #[error("column {column} is full")]
    ColumnFull { column: usize },
    #[error("column {column} is empty")]
    ColumnEmpty { column: usize },
    #[error("board has no empty cells")]
    BoardFull,
    #[error("search depth {0} is out of range (must be at least 1)")]
    DepthOutOfRange(usize),
}
