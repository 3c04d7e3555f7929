//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Mark};
use crate::types::BOARD_SIZE;

/// Winning line indices on the 3x3 board (row-major cell indices)
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a mark has three in a row on any line
    pub fn has_won(cells: &[Cell; BOARD_SIZE], mark: Mark) -> bool {
        let target = mark.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// Check if some line through `index` is fully owned by `mark`.
    ///
    /// Used right after a placement at `index` to decide whether that placement
    /// completed a line, independently of lines finished earlier.
    pub fn completes_line(cells: &[Cell; BOARD_SIZE], index: usize, mark: Mark) -> bool {
        let target = mark.to_cell();
        WINNING_LINES
            .iter()
            .filter(|line| line.contains(&index))
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }
}
