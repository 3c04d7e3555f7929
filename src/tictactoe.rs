//! Tic-Tac-Toe board, marks and position hashing

pub mod board;
pub mod lines;
pub mod zobrist;

pub use board::{Board, Cell, Mark, PlaceOutcome};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use zobrist::{KeyTable, ZobristKeys};
