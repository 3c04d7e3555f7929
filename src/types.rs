//! Newtype wrappers and shared constants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side length of the board.
pub const BOARD_DIM: usize = 3;

/// Number of cells on the board.
pub const BOARD_SIZE: usize = BOARD_DIM * BOARD_DIM;

/// Default learning rate for the learning agent.
pub const DEFAULT_ALPHA: f64 = 0.1;

/// Default exploration rate for the learning agent.
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Estimate given to a position the learner has never seen ("unknown, assume even").
pub const UNKNOWN_ESTIMATE: f64 = 0.5;

/// Estimate anchored to the final position of a lost game.
pub const LOSS_ESTIMATE: f64 = 0.0;

/// A cell coordinate on the 3x3 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    /// Create a new square, validating it lies on the board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IllegalMove`] if `row` or `col` is outside `0..3`.
    pub fn new(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row < BOARD_DIM && col < BOARD_DIM {
            Ok(Square { row, col })
        } else {
            Err(crate::Error::IllegalMove {
                row,
                col,
                reason: "coordinates out of range (must be 0-2)".to_string(),
            })
        }
    }

    /// Row-major index (0-8).
    pub fn index(&self) -> usize {
        self.row * BOARD_DIM + self.col
    }

    /// Build a square from a row-major index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IllegalMove`] if `index >= 9`.
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        Self::new(index / BOARD_DIM, index % BOARD_DIM)
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// All squares in row-major order (smallest row, then smallest column).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).map(|index| Square {
            row: index / BOARD_DIM,
            col: index % BOARD_DIM,
        })
    }
}

impl From<Square> for (usize, usize) {
    fn from(square: Square) -> Self {
        (square.row, square.col)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
