//! Zobrist key table for incremental position hashing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{BOARD_DIM, Square};

/// Number of mark identities with their own key per cell.
pub const KEY_SLOTS: usize = 2;

/// Raw key table layout: `[row][col][mark slot]`.
pub type KeyTable = [[[u64; KEY_SLOTS]; BOARD_DIM]; BOARD_DIM];

/// One random 64-bit key per (row, column, mark slot).
///
/// Value tables are only meaningful under the key table they were learned
/// with, so the table travels with the learned data when it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZobristKeys {
    table: KeyTable,
}

impl ZobristKeys {
    /// Draw a fresh table from the given random source.
    ///
    /// Keys are never zero, so every placement changes the hash.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut table = [[[0u64; KEY_SLOTS]; BOARD_DIM]; BOARD_DIM];
        for row in table.iter_mut() {
            for cell in row.iter_mut() {
                for key in cell.iter_mut() {
                    *key = rng.random_range(1..=u64::MAX);
                }
            }
        }
        Self { table }
    }

    /// Wrap an externally supplied table.
    pub fn from_table(table: KeyTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &KeyTable {
        &self.table
    }

    /// Key for `square` occupied by the mark in `slot`.
    pub fn key(&self, square: Square, slot: usize) -> u64 {
        self.table[square.row()][square.col()][slot]
    }

    /// Hash of an arbitrary set of occupied (square, slot) pairs, computed from scratch.
    pub fn hash_of<I>(&self, occupied: I) -> u64
    where
        I: IntoIterator<Item = (Square, usize)>,
    {
        occupied
            .into_iter()
            .fold(0, |hash, (square, slot)| hash ^ self.key(square, slot))
    }
}
