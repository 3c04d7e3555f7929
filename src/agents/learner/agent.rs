//! Value-based learning player
//!
//! Picks moves epsilon-greedily over the estimates of the positions its own
//! placements would produce, and backs up a loss along the positions it
//! visited once a game is lost.

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::value_table::ValueTable;
use crate::{
    Error, Result,
    ports::Agent,
    tictactoe::{Board, Mark},
    types::{LOSS_ESTIMATE, Square, UNKNOWN_ESTIMATE},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            message: format!("alpha {alpha} not in range (0.0, 1.0]"),
        })
    }
}

fn validate_epsilon(epsilon: f64) -> Result<()> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            message: format!("epsilon {epsilon} not in range [0.0, 1.0]"),
        })
    }
}

fn validate_estimate(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            message: format!("{name} estimate must be finite, got {value}"),
        })
    }
}

/// Learning player (TD backup on defeat, epsilon-greedy move choice)
#[derive(Debug, Clone)]
pub struct LearningAgent {
    mark: Mark,
    table: ValueTable,
    /// Learning rate α
    alpha: f64,
    /// Exploration rate ε
    epsilon: f64,
    /// Estimate the final position of a lost game is anchored to
    loss_estimate: f64,
    /// Whether any move of the current game was exploratory
    exploring_move: bool,
    /// Hashes produced by this agent's own placements in the current game
    trajectory: Vec<u64>,
    rng: StdRng,
    verbosity: u8,
    name: String,
}

impl LearningAgent {
    /// Create a learner with an empty value table
    ///
    /// # Arguments
    ///
    /// * `mark` - Mark this agent places
    /// * `alpha` - Learning rate, in (0.0, 1.0]
    /// * `epsilon` - Exploration rate, in [0.0, 1.0]
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a parameter is out of range.
    pub fn new(mark: Mark, alpha: f64, epsilon: f64) -> Result<Self> {
        validate_alpha(alpha)?;
        validate_epsilon(epsilon)?;
        Ok(Self {
            mark,
            table: ValueTable::new(UNKNOWN_ESTIMATE),
            alpha,
            epsilon,
            loss_estimate: LOSS_ESTIMATE,
            exploring_move: false,
            trajectory: Vec::new(),
            rng: build_rng(None),
            verbosity: 0,
            name: "Learner".to_string(),
        })
    }

    /// Start from an externally supplied hash → estimate mapping
    pub fn with_values(mut self, values: HashMap<u64, f64>) -> Self {
        self.table = ValueTable::from_values(values, self.table.default_estimate());
        self
    }

    /// Change the estimate given to unseen positions
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the estimate is not finite.
    pub fn with_initial_estimate(mut self, estimate: f64) -> Result<Self> {
        validate_estimate("initial", estimate)?;
        let values = std::mem::take(&mut self.table).into_values();
        self.table = ValueTable::from_values(values, estimate);
        Ok(self)
    }

    /// Change the estimate a lost final position is anchored to
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the estimate is not finite.
    pub fn with_loss_estimate(mut self, estimate: f64) -> Result<Self> {
        validate_estimate("loss", estimate)?;
        self.loss_estimate = estimate;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The value table, for inspection and persistence
    pub fn value_table(&self) -> &ValueTable {
        &self.table
    }

    /// Copy of the hash → estimate mapping for the persistence layer
    pub fn export_values(&self) -> HashMap<u64, f64> {
        self.table.values().clone()
    }

    /// Hashes visited by this agent's own placements in the current game
    pub fn trajectory(&self) -> &[u64] {
        &self.trajectory
    }

    /// Whether a random exploratory move was played in the current game
    pub fn exploring_move_flag(&self) -> bool {
        self.exploring_move
    }

    pub fn reset_exploring_move_flag(&mut self) {
        self.exploring_move = false;
    }

    /// Greedy choice: the empty square whose resulting position has the
    /// highest estimate, first in row-major order on ties.
    fn greedy_move(&mut self, board: &Board, empties: &[Square]) -> Result<(Square, u64)> {
        let mut best: Option<(Square, u64, f64)> = None;
        for &square in empties {
            let hash = board.hash_after(square, self.mark)?;
            let estimate = self.table.get_or_insert_default(hash);
            if self.verbosity > 2 {
                eprintln!("[{}] {square} -> estimate {estimate:.4}", self.name);
            }
            if best.is_none_or(|(_, _, best_estimate)| estimate > best_estimate) {
                best = Some((square, hash, estimate));
            }
        }
        best.map(|(square, hash, _)| (square, hash))
            .ok_or(Error::NoLegalMove)
    }

    /// Back up the loss that ended on `board` along this game's trajectory.
    ///
    /// The final position is anchored to the loss estimate, then each visited
    /// position, latest first, moves toward its successor:
    /// `V(earlier) += alpha * (V(later) - V(earlier))`. A step that would raise
    /// an estimate is skipped, so no position on a losing path gains value.
    pub fn learn_from_defeat(&mut self, board: &Board) {
        self.table.set(board.hash(), self.loss_estimate);

        let mut later = self.loss_estimate;
        for &hash in self.trajectory.iter().rev() {
            let earlier = self.table.get_or_insert_default(hash);
            let updated = earlier + self.alpha * (later - earlier);
            if updated < earlier {
                self.table.set(hash, updated);
                later = updated;
            } else {
                later = earlier;
            }
        }

        if self.verbosity > 2 {
            eprintln!(
                "[{}] backed up loss over {} positions ({} estimates known)",
                self.name,
                self.trajectory.len(),
                self.table.len()
            );
        }
        self.trajectory.clear();
    }
}

impl Agent for LearningAgent {
    fn select_move(&mut self, board: &Board) -> Result<Square> {
        let empties = board.empty_squares();
        if empties.is_empty() {
            return Err(Error::NoLegalMove);
        }

        let (square, hash) = if self.rng.random::<f64>() < self.epsilon {
            let square = *empties.choose(&mut self.rng).ok_or(Error::NoLegalMove)?;
            self.exploring_move = true;
            if self.verbosity > 2 {
                eprintln!("[{}] exploring move {square}", self.name);
            }
            (square, board.hash_after(square, self.mark)?)
        } else {
            self.greedy_move(board, &empties)?
        };

        self.trajectory.push(hash);
        Ok(square)
    }

    fn mark(&self) -> Mark {
        self.mark
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn start_game(&mut self) {
        self.trajectory.clear();
        self.reset_exploring_move_flag();
    }

    fn learn_from_defeat(&mut self, board: &Board) -> Result<()> {
        LearningAgent::learn_from_defeat(self, board);
        Ok(())
    }

    fn exploring_move_flag(&self) -> bool {
        self.exploring_move
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::with_random_keys(Mark::X, &mut StdRng::seed_from_u64(21))
    }

    fn greedy(mark: Mark) -> LearningAgent {
        LearningAgent::new(mark, 0.5, 0.0).unwrap().with_seed(1)
    }

    #[test]
    fn test_parameter_validation() {
        assert!(LearningAgent::new(Mark::X, 0.0, 0.1).is_err());
        assert!(LearningAgent::new(Mark::X, 1.5, 0.1).is_err());
        assert!(LearningAgent::new(Mark::X, 1.0, 0.1).is_ok());
        assert!(LearningAgent::new(Mark::X, 0.1, -0.1).is_err());
        assert!(LearningAgent::new(Mark::X, 0.1, 1.1).is_err());
        assert!(LearningAgent::new(Mark::X, 0.1, 0.0).is_ok());
        let agent = LearningAgent::new(Mark::X, 0.1, 0.1).unwrap();
        assert!(agent.with_initial_estimate(f64::NAN).is_err());
    }

    #[test]
    fn test_greedy_prefers_highest_estimate() {
        let board = board();
        let target = Square::new(2, 1).unwrap();
        let hash = board.hash_after(target, Mark::X).unwrap();
        let mut agent = greedy(Mark::X).with_values(HashMap::from([(hash, 0.9)]));

        assert_eq!(agent.select_move(&board).unwrap(), target);
        assert!(!agent.exploring_move_flag());
        assert_eq!(agent.trajectory(), &[hash]);
    }

    #[test]
    fn test_greedy_ties_break_row_major() {
        let mut board = board();
        board.place(0, 0, Mark::O).unwrap();
        let mut agent = greedy(Mark::X);
        assert_eq!(agent.select_move(&board).unwrap(), Square::new(0, 1).unwrap());
    }

    #[test]
    fn test_lookup_inserts_defaults() {
        let board = board();
        let mut agent = greedy(Mark::X);
        agent.select_move(&board).unwrap();
        assert_eq!(agent.value_table().len(), 9);
        assert!(
            agent
                .value_table()
                .values()
                .values()
                .all(|&v| v == UNKNOWN_ESTIMATE)
        );
    }

    #[test]
    fn test_full_exploration_sets_flag() {
        let board = board();
        let mut agent = LearningAgent::new(Mark::X, 0.1, 1.0).unwrap().with_seed(4);
        let square = agent.select_move(&board).unwrap();
        assert!(board.is_empty_at(square));
        assert!(agent.exploring_move_flag());

        agent.reset_exploring_move_flag();
        assert!(!agent.exploring_move_flag());
    }

    #[test]
    fn test_full_board_is_rejected() {
        let mut board = board();
        let fill = [
            (0, 0, Mark::X),
            (0, 1, Mark::O),
            (0, 2, Mark::X),
            (1, 0, Mark::X),
            (1, 1, Mark::O),
            (1, 2, Mark::O),
            (2, 0, Mark::O),
            (2, 1, Mark::X),
            (2, 2, Mark::X),
        ];
        for (row, col, mark) in fill {
            board.place(row, col, mark).unwrap();
        }
        let mut agent = greedy(Mark::X);
        assert!(matches!(agent.select_move(&board), Err(Error::NoLegalMove)));
    }

    #[test]
    fn test_learn_from_defeat_backs_up_loss() {
        let mut board = board();
        let mut agent = greedy(Mark::X);
        agent.start_game();

        // Learner plays (0,0) and (0,2); opponent completes the middle column.
        let first = agent.select_move(&board).unwrap();
        let first_hash = board.place_at(first, Mark::X).unwrap().0;
        board.place(0, 1, Mark::O).unwrap();
        let second = agent.select_move(&board).unwrap();
        let second_hash = board.place_at(second, Mark::X).unwrap().0;
        board.place(1, 1, Mark::O).unwrap();
        board.place(2, 1, Mark::O).unwrap();
        assert!(board.winning_line_exists(Mark::O));

        agent.learn_from_defeat(&board);

        let table = agent.value_table();
        assert_eq!(table.estimate(board.hash()), LOSS_ESTIMATE);
        // 0.5 + 0.5 * (0.0 - 0.5)
        assert!((table.estimate(second_hash) - 0.25).abs() < 1e-12);
        // 0.5 + 0.5 * (0.25 - 0.5)
        assert!((table.estimate(first_hash) - 0.375).abs() < 1e-12);
        assert!(agent.trajectory().is_empty());
    }

    #[test]
    fn test_backup_never_raises_estimates() {
        let mut board = board();
        let mut agent = greedy(Mark::X);
        agent.start_game();

        let first = agent.select_move(&board).unwrap();
        let first_hash = board.place_at(first, Mark::X).unwrap().0;
        board.place(2, 2, Mark::O).unwrap();
        let second = agent.select_move(&board).unwrap();
        let second_hash = board.place_at(second, Mark::X).unwrap().0;

        // Earlier position already known to be poor.
        let mut values = agent.export_values();
        values.insert(first_hash, 0.1);
        let mut agent = agent.with_values(values);
        assert_eq!(agent.trajectory(), &[first_hash, second_hash]);

        board.place(2, 0, Mark::O).unwrap();
        board.place(2, 1, Mark::O).unwrap();
        agent.learn_from_defeat(&board);

        assert!(agent.value_table().estimate(second_hash) < UNKNOWN_ESTIMATE);
        assert_eq!(agent.value_table().estimate(first_hash), 0.1);
    }

    #[test]
    fn test_start_game_clears_bookkeeping() {
        let board = board();
        let mut agent = LearningAgent::new(Mark::X, 0.1, 1.0).unwrap().with_seed(2);
        agent.select_move(&board).unwrap();
        assert!(!agent.trajectory().is_empty());
        assert!(agent.exploring_move_flag());

        Agent::start_game(&mut agent);
        assert!(agent.trajectory().is_empty());
        assert!(!agent.exploring_move_flag());
    }
}
