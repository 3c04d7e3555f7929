//! Observer port - abstraction for watching a series of games
//!
//! Observers decouple the game loop from reporting: progress bars, per-game
//! statistics lines, board printing and CSV export are all observers.

use crate::{
    Result,
    pipeline::GameOutcome,
    tictactoe::{Board, Mark},
    types::Square,
};

/// Observer trait for monitoring a match
///
/// # Event Sequence
///
/// 1. `on_session_start(total_games)` - Once at the beginning
/// 2. For each game:
///    - `on_game_start(game_num, board)`
///    - `on_move(...)` - After each placement
///    - `on_game_end(game_num, outcome, exploring)`
/// 3. `on_session_end()` - Once at the end
///
/// `total_games` is `None` for open-ended sessions such as human play.
pub trait Observer: Send {
    /// Called when the session starts.
    fn on_session_start(&mut self, _total_games: Option<usize>) -> Result<()> {
        Ok(())
    }

    /// Called when a game starts on the freshly reset `board` (`game_num` is 0-based).
    fn on_game_start(&mut self, _game_num: usize, _board: &Board) -> Result<()> {
        Ok(())
    }

    /// Called after a placement has been applied to `board`.
    fn on_move(
        &mut self,
        _game_num: usize,
        _mark: Mark,
        _square: Square,
        _board: &Board,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when a game ends.
    ///
    /// `exploring` is true if a learning agent made a random exploratory move
    /// during the game.
    fn on_game_end(
        &mut self,
        _game_num: usize,
        _outcome: GameOutcome,
        _exploring: bool,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when the session completes.
    fn on_session_end(&mut self) -> Result<()> {
        Ok(())
    }
}
