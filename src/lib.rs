//! Tic-tac-toe with perfect, random and learning players
//!
//! This crate provides:
//! - A 3×3 board with an incrementally maintained Zobrist position hash
//! - A minimax player (optionally degraded to random moves)
//! - A temporal-difference learner that backs up losses through a value table
//! - A console player, a game driver with observers, and learned-data persistence

pub mod adapters;
pub mod agents;
pub mod app;
pub mod cli;
pub mod error;
pub mod learned_data;
pub mod pipeline;
pub mod ports;
pub mod tictactoe;
pub mod types;

pub use agents::{ConsoleAgent, LearningAgent, SearchAgent};
pub use error::{Error, Result};
pub use tictactoe::{Board, Mark, PlaceOutcome};
pub use types::Square;
