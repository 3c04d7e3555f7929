//! Exhaustive adversarial search player.
//!
//! Plays perfect tic-tac-toe by full-depth minimax, or, in random mode, picks a
//! uniformly random empty square to model an unskilled opponent.

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    ports::Agent,
    tictactoe::{Board, Mark, PlaceOutcome},
    types::Square,
};

const WIN_SCORE: i32 = 1;
const DRAW_SCORE: i32 = 0;
const LOSS_SCORE: i32 = -1;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Minimax (or random) player for one mark.
///
/// Holds no memory between moves. Ties between equally scored squares go to
/// the first square in row-major order, so the chosen move is a pure function
/// of the board.
#[derive(Debug, Clone)]
pub struct SearchAgent {
    mark: Mark,
    random_mode: bool,
    verbosity: u8,
    rng: StdRng,
    name: String,
}

impl SearchAgent {
    /// Create a perfect (minimax) player.
    pub fn new(mark: Mark) -> Self {
        Self {
            mark,
            random_mode: false,
            verbosity: 0,
            rng: build_rng(None),
            name: "Minimax".to_string(),
        }
    }

    /// Create a player that ignores search and moves uniformly at random.
    pub fn random(mark: Mark) -> Self {
        Self {
            random_mode: true,
            name: "Random".to_string(),
            ..Self::new(mark)
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn is_random(&self) -> bool {
        self.random_mode
    }

    /// Exact minimax score of every empty square, in row-major order.
    ///
    /// Scores are from this agent's perspective: 1 forced win, 0 draw, -1 forced loss.
    pub fn evaluate_moves(&self, board: &Board) -> Result<Vec<(Square, i32)>> {
        board
            .empty_squares()
            .into_iter()
            .map(|square| {
                let score =
                    self.score_placement(board, square, self.mark, LOSS_SCORE - 1, WIN_SCORE + 1)?;
                Ok((square, score))
            })
            .collect()
    }

    fn best_move(&self, board: &Board) -> Result<Square> {
        let mut best: Option<(Square, i32)> = None;
        let mut alpha = LOSS_SCORE - 1;

        for square in board.empty_squares() {
            // A fail-low child only returns a bound <= alpha, which never beats
            // the strict comparison below, so pruning keeps the first best square.
            let score = self.score_placement(board, square, self.mark, alpha, WIN_SCORE + 1)?;
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((square, score));
                alpha = score;
            }
            if score == WIN_SCORE {
                break;
            }
        }

        let (square, score) = best.ok_or(Error::NoLegalMove)?;
        if self.verbosity > 2 {
            eprintln!("[{}] chose {square} with minimax score {score}", self.name);
        }
        Ok(square)
    }

    /// Score of `to_move` placing at `square`, seen from this agent's side.
    fn score_placement(
        &self,
        board: &Board,
        square: Square,
        to_move: Mark,
        alpha: i32,
        beta: i32,
    ) -> Result<i32> {
        let mut child = board.clone();
        let (_, outcome) = child.place_at(square, to_move)?;
        let score = match outcome {
            PlaceOutcome::Win if to_move == self.mark => WIN_SCORE,
            PlaceOutcome::Win => LOSS_SCORE,
            PlaceOutcome::Draw => DRAW_SCORE,
            PlaceOutcome::Continue => self.minimax(&child, to_move.opponent(), alpha, beta)?,
        };
        Ok(score)
    }

    fn minimax(&self, board: &Board, to_move: Mark, mut alpha: i32, mut beta: i32) -> Result<i32> {
        let maximizing = to_move == self.mark;
        let mut best = if maximizing {
            LOSS_SCORE - 1
        } else {
            WIN_SCORE + 1
        };

        for square in board.empty_squares() {
            let score = self.score_placement(board, square, to_move, alpha, beta)?;
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if alpha >= beta {
                break;
            }
        }

        Ok(best)
    }
}

impl Agent for SearchAgent {
    fn select_move(&mut self, board: &Board) -> Result<Square> {
        if board.is_full() {
            return Err(Error::NoLegalMove);
        }

        if self.random_mode {
            return board
                .empty_squares()
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoLegalMove);
        }

        self.best_move(board)
    }

    fn mark(&self) -> Mark {
        self.mark
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
    }
}
