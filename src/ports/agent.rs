//! Agent port - the move contract shared by every player kind
//!
//! Search, learning and console players all implement this port, so the game
//! driver can alternate any two of them against one board.

use crate::{
    Result,
    tictactoe::{Board, Mark},
    types::Square,
};

/// Agent trait - Unified interface for all player kinds
///
/// # Defeat hook
///
/// Learning is loss-driven: when a game ends with a winning line, the driver
/// calls [`Agent::learn_from_defeat`] on the *losing* agent only. Agents that do
/// not learn keep the default no-op, so the driver never needs to know which
/// concrete type it is talking to.
///
/// # Examples
///
/// ```no_run
/// use jokettt::{ports::Agent, tictactoe::Board};
///
/// fn first_move(agent: &mut dyn Agent, board: &Board) -> jokettt::Result<(usize, usize)> {
///     Ok(agent.select_move(board)?.into())
/// }
/// ```
pub trait Agent: Send {
    /// Choose an empty square for this agent's mark.
    ///
    /// The board is not modified; the driver applies the placement.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalMove`] if the board is full.
    fn select_move(&mut self, board: &Board) -> Result<Square>;

    /// The mark this agent places.
    fn mark(&self) -> Mark;

    /// Name used in reports.
    fn name(&self) -> &str;

    /// Called by the driver before the first move of every game.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Stateful agents clear per-game bookkeeping here.
    fn start_game(&mut self) {}

    /// Called exactly when this agent has just lost the game that ended on `board`.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for agents that do not learn.
    fn learn_from_defeat(&mut self, _board: &Board) -> Result<()> {
        Ok(())
    }

    /// Whether a random exploratory move was played in the current game.
    ///
    /// # Default Implementation
    ///
    /// Returns `false`: only exploring agents ever deviate from their policy.
    fn exploring_move_flag(&self) -> bool {
        false
    }

    /// Reseed the agent's random source, if it has one.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
