//! Persisted learner knowledge: the key table together with its value table.
//!
//! Estimates are keyed by position hashes, and hashes only mean something
//! under the key table that produced them. [`LearnedData`] therefore always
//! carries both, and a file that fails to load is replaced by a fresh pair
//! rather than half-used.

use std::{
    collections::HashMap,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::LearnedDataRepository,
    tictactoe::ZobristKeys,
    types::{DEFAULT_ALPHA, DEFAULT_EPSILON},
};

/// Format version written into every learned-data file.
pub const LEARNED_DATA_VERSION: u32 = 1;

/// Provenance recorded alongside the tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub games_played: usize,
    pub alpha: f64,
    pub epsilon: f64,
    /// Free-form description of the opponent trained against
    pub opponent: String,
    pub saved_at_unix: u64,
}

impl TrainingMetadata {
    pub fn new(games_played: usize, alpha: f64, epsilon: f64, opponent: impl Into<String>) -> Self {
        Self {
            games_played,
            alpha,
            epsilon,
            opponent: opponent.into(),
            saved_at_unix: unix_now(),
        }
    }
}

impl Default for TrainingMetadata {
    fn default() -> Self {
        Self::new(0, DEFAULT_ALPHA, DEFAULT_EPSILON, "none")
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Key table, value table and metadata saved as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedData {
    pub version: u32,
    pub keys: ZobristKeys,
    pub values: HashMap<u64, f64>,
    pub metadata: TrainingMetadata,
}

impl LearnedData {
    pub fn new(keys: ZobristKeys, values: HashMap<u64, f64>, metadata: TrainingMetadata) -> Self {
        Self {
            version: LEARNED_DATA_VERSION,
            keys,
            values,
            metadata,
        }
    }

    /// Freshly randomized keys and an empty value table.
    pub fn fresh<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            ZobristKeys::random(rng),
            HashMap::new(),
            TrainingMetadata::default(),
        )
    }

    /// Reject data that was written by another format version or is corrupt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] on a version mismatch and
    /// [`Error::SerializationContext`] for zero keys or non-finite estimates.
    pub fn validate(&self) -> Result<()> {
        if self.version != LEARNED_DATA_VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: LEARNED_DATA_VERSION,
            });
        }

        let zero_key = self
            .keys
            .table()
            .iter()
            .flatten()
            .flatten()
            .any(|&key| key == 0);
        if zero_key {
            return Err(Error::SerializationContext {
                operation: "validate learned data".to_string(),
                message: "key table contains a zero key".to_string(),
            });
        }

        if let Some((hash, value)) = self.values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(Error::SerializationContext {
                operation: "validate learned data".to_string(),
                message: format!("estimate for position {hash:#x} is {value}"),
            });
        }

        Ok(())
    }
}

/// Load learned data, falling back to a fresh pair on any failure.
///
/// Returns the data plus a warning describing why the fallback happened.
pub fn load_or_fresh<P, R>(repo: &P, path: &Path, rng: &mut R) -> (LearnedData, Option<String>)
where
    P: LearnedDataRepository + ?Sized,
    R: Rng + ?Sized,
{
    match repo.load(path).and_then(|data| data.validate().map(|()| data)) {
        Ok(data) => (data, None),
        Err(err) => {
            let warning = format!(
                "could not load learned data from {}: {err}; starting with fresh keys and an empty table",
                path.display()
            );
            (LearnedData::fresh(rng), Some(warning))
        }
    }
}
