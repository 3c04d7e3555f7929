//! Board representation with incremental position hashing

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{lines::LineAnalyzer, zobrist::ZobristKeys};
use crate::{
    Error, Result,
    types::{BOARD_DIM, BOARD_SIZE, Square},
};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'x',
            Cell::O => 'o',
        }
    }

    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
            Cell::Empty => None,
        }
    }
}

/// A mark (piece) a player places on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the other mark
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Convert mark to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }

    pub fn to_char(self) -> char {
        self.to_cell().to_char()
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Result of a successful placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceOutcome {
    /// The game goes on
    Continue,
    /// The placement completed a line for the placing mark
    Win,
    /// The board is now full with no completed line
    Draw,
}

impl PlaceOutcome {
    /// Numeric result code: 0 continue, 1 win, 2 draw.
    pub fn code(self) -> i8 {
        match self {
            PlaceOutcome::Continue => 0,
            PlaceOutcome::Win => 1,
            PlaceOutcome::Draw => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != PlaceOutcome::Continue
    }
}

/// The 3x3 grid, its running Zobrist hash and the key table the hash is built from.
///
/// The two mark identities are fixed at construction: `primary` uses key slot 0
/// and its opponent key slot 1. The hash is updated by XOR on every placement
/// and is never recomputed from the cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
    hash: u64,
    occupied: usize,
    keys: ZobristKeys,
    primary: Mark,
}

impl Board {
    /// Create an empty board hashing under the supplied key table.
    pub fn new(primary: Mark, keys: ZobristKeys) -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
            hash: 0,
            occupied: 0,
            keys,
            primary,
        }
    }

    /// Create an empty board with a freshly randomized key table.
    pub fn with_random_keys<R: Rng + ?Sized>(primary: Mark, rng: &mut R) -> Self {
        Self::new(primary, ZobristKeys::random(rng))
    }

    /// Mark owning key slot 0 (the learner/AI piece).
    pub fn primary_mark(&self) -> Mark {
        self.primary
    }

    /// Mark owning key slot 1 (the opponent/human piece).
    pub fn secondary_mark(&self) -> Mark {
        self.primary.opponent()
    }

    pub fn keys(&self) -> &ZobristKeys {
        &self.keys
    }

    fn key_slot(&self, mark: Mark) -> usize {
        if mark == self.primary { 0 } else { 1 }
    }

    /// Place `mark` at (`row`, `col`).
    ///
    /// Returns the updated hash and whether the game continues, was won by this
    /// placement, or ended in a draw.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] if the coordinates are off the board or the
    /// cell is occupied. The board and hash are left unchanged.
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<(u64, PlaceOutcome)> {
        let square = Square::new(row, col)?;
        self.place_at(square, mark)
    }

    /// Same as [`Board::place`] for an already validated square.
    pub fn place_at(&mut self, square: Square, mark: Mark) -> Result<(u64, PlaceOutcome)> {
        let index = square.index();
        if self.cells[index] != Cell::Empty {
            return Err(Error::IllegalMove {
                row: square.row(),
                col: square.col(),
                reason: format!("cell already holds '{}'", self.cells[index].to_char()),
            });
        }

        self.cells[index] = mark.to_cell();
        self.hash ^= self.keys.key(square, self.key_slot(mark));
        self.occupied += 1;

        let outcome = if LineAnalyzer::completes_line(&self.cells, index, mark) {
            PlaceOutcome::Win
        } else if self.is_full() {
            PlaceOutcome::Draw
        } else {
            PlaceOutcome::Continue
        };

        Ok((self.hash, outcome))
    }

    /// Hash the board would have after placing `mark` at `square`, without mutating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] if the cell is occupied.
    pub fn hash_after(&self, square: Square, mark: Mark) -> Result<u64> {
        if !self.is_empty_at(square) {
            return Err(Error::IllegalMove {
                row: square.row(),
                col: square.col(),
                reason: "cell already occupied".to_string(),
            });
        }
        Ok(self.hash ^ self.keys.key(square, self.key_slot(mark)))
    }

    /// Hash recomputed from the occupied cells.
    ///
    /// Only for consistency checks; [`Board::hash`] is the maintained value.
    pub fn recompute_hash(&self) -> u64 {
        self.keys.hash_of(
            Square::all()
                .filter_map(|square| self.get(square).mark().map(|mark| (square, mark)))
                .map(|(square, mark)| (square, self.key_slot(mark))),
        )
    }

    /// Current running position hash
    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn get(&self, square: Square) -> Cell {
        self.cells[square.index()]
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.get(square) == Cell::Empty
    }

    /// Empty squares in row-major order
    pub fn empty_squares(&self) -> Vec<Square> {
        Square::all().filter(|&sq| self.is_empty_at(sq)).collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// True iff all 9 cells are occupied
    pub fn is_full(&self) -> bool {
        self.occupied == BOARD_SIZE
    }

    /// Check all 8 lines for three-in-a-row of `mark`
    pub fn winning_line_exists(&self, mark: Mark) -> bool {
        LineAnalyzer::has_won(&self.cells, mark)
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Mark> {
        [Mark::X, Mark::O]
            .into_iter()
            .find(|&mark| self.winning_line_exists(mark))
    }

    /// Check if the game is over (win or full board)
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.winner().is_some()
    }

    /// Clear all cells; the key table is kept
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; BOARD_SIZE];
        self.hash = 0;
        self.occupied = 0;
    }

    /// Multi-line depiction of the grid with row and column numbers
    pub fn render(&self) -> String {
        let mut out = String::from("    0   1   2\n");
        for row in 0..BOARD_DIM {
            let cells: Vec<String> = (0..BOARD_DIM)
                .map(|col| match self.cells[row * BOARD_DIM + col] {
                    Cell::Empty => " ".to_string(),
                    cell => cell.to_char().to_string(),
                })
                .collect();
            out.push_str(&format!("{row}   {}\n", cells.join(" | ")));
            if row + 1 < BOARD_DIM {
                out.push_str("   ---+---+---\n");
            }
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn board() -> Board {
        Board::with_random_keys(Mark::X, &mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_new_board() {
        let board = board();
        assert_eq!(board.hash(), 0);
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.empty_squares().len(), 9);
        assert!(!board.is_full());
    }

    #[test]
    fn test_place_updates_hash() {
        let mut board = board();
        let (hash, outcome) = board.place(1, 1, Mark::X).unwrap();
        let center = Square::new(1, 1).unwrap();
        assert_eq!(outcome, PlaceOutcome::Continue);
        assert_eq!(hash, board.keys().key(center, 0));
        assert_eq!(board.hash(), hash);

        let (hash, _) = board.place(0, 2, Mark::O).unwrap();
        let corner = Square::new(0, 2).unwrap();
        assert_eq!(
            hash,
            board.keys().key(center, 0) ^ board.keys().key(corner, 1)
        );
        assert_eq!(hash, board.recompute_hash());
    }

    #[test]
    fn test_place_rejects_occupied() {
        let mut board = board();
        board.place(0, 0, Mark::X).unwrap();
        let before = board.clone();

        let err = board.place(0, 0, Mark::O).unwrap_err();
        assert!(matches!(err, Error::IllegalMove { row: 0, col: 0, .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_rejects_out_of_range() {
        let mut board = board();
        assert!(matches!(
            board.place(3, 0, Mark::X),
            Err(Error::IllegalMove { .. })
        ));
        assert!(matches!(
            board.place(0, 5, Mark::X),
            Err(Error::IllegalMove { .. })
        ));
        assert_eq!(board.hash(), 0);
    }

    #[test]
    fn test_hash_after_matches_place() {
        let mut board = board();
        board.place(0, 0, Mark::O).unwrap();
        let target = Square::new(2, 1).unwrap();
        let predicted = board.hash_after(target, Mark::X).unwrap();
        assert_eq!(board.occupied_count(), 1);

        let (hash, _) = board.place_at(target, Mark::X).unwrap();
        assert_eq!(predicted, hash);
        assert!(board.hash_after(target, Mark::O).is_err());
    }

    #[test]
    fn test_win_detection_diagonal() {
        let mut board = board();
        board.place(0, 0, Mark::O).unwrap();
        board.place(1, 1, Mark::O).unwrap();
        let (_, outcome) = board.place(2, 2, Mark::O).unwrap();
        assert_eq!(outcome, PlaceOutcome::Win);
        assert!(board.winning_line_exists(Mark::O));
        assert_eq!(board.winner(), Some(Mark::O));
    }

    #[test]
    fn test_reset_keeps_keys() {
        let mut board = board();
        let keys = board.keys().clone();
        board.place(0, 1, Mark::X).unwrap();
        board.place(2, 0, Mark::O).unwrap();

        board.reset();
        assert_eq!(board.hash(), 0);
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.keys(), &keys);
        assert!(board.place(0, 1, Mark::O).is_ok());
    }

    #[test]
    fn test_secondary_mark_uses_slot_one() {
        let mut board = Board::with_random_keys(Mark::O, &mut StdRng::seed_from_u64(5));
        assert_eq!(board.secondary_mark(), Mark::X);
        let (hash, _) = board.place(0, 0, Mark::X).unwrap();
        assert_eq!(hash, board.keys().key(Square::new(0, 0).unwrap(), 1));
    }

    #[test]
    fn test_render() {
        let mut board = board();
        board.place(0, 0, Mark::X).unwrap();
        board.place(1, 1, Mark::O).unwrap();
        let rendered = board.render();
        assert!(rendered.contains("0   x |   |  "));
        assert!(rendered.contains("1     | o |  "));
        assert_eq!(rendered.lines().count(), 6);
        assert_eq!(format!("{board}"), rendered);
    }

    #[test]
    fn test_result_codes() {
        assert_eq!(PlaceOutcome::Continue.code(), 0);
        assert_eq!(PlaceOutcome::Win.code(), 1);
        assert_eq!(PlaceOutcome::Draw.code(), 2);
        assert!(!PlaceOutcome::Continue.is_terminal());
    }
}
