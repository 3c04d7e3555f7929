//! Common test utilities for the jokettt test suite.

#![allow(dead_code)]

use jokettt::{
    Board, Mark, Result, Square,
    ports::Agent,
    tictactoe::{PlaceOutcome, ZobristKeys},
};
use rand::{SeedableRng, rngs::StdRng};

/// Empty board with `primary` in key slot 0 and keys drawn from `seed`.
pub fn seeded_board(primary: Mark, seed: u64) -> Board {
    Board::with_random_keys(primary, &mut StdRng::seed_from_u64(seed))
}

/// XOR of the keys of every occupied cell, computed from scratch.
pub fn expected_hash(board: &Board, keys: &ZobristKeys) -> u64 {
    Square::all()
        .filter_map(|square| board.get(square).mark().map(|mark| (square, mark)))
        .fold(0, |hash, (square, mark)| {
            let slot = if mark == board.primary_mark() { 0 } else { 1 };
            hash ^ keys.key(square, slot)
        })
}

/// Play `first` and `second` alternately from the current board until the game ends,
/// without calling any end-of-game hook. Returns the winning mark, if any.
pub fn play_out<'a>(board: &mut Board, first: &'a mut dyn Agent, second: &'a mut dyn Agent) -> Result<Option<Mark>> {
    first.start_game();
    second.start_game();
    let mut movers = [first, second];
    let mut turn = 0;
    loop {
        let agent = &mut movers[turn % 2];
        let mark = agent.mark();
        let square = agent.select_move(board)?;
        match board.place_at(square, mark)?.1 {
            PlaceOutcome::Win => return Ok(Some(mark)),
            PlaceOutcome::Draw => return Ok(None),
            PlaceOutcome::Continue => turn += 1,
        }
    }
}
