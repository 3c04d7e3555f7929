//! Value table mapping position hashes to outcome estimates

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::UNKNOWN_ESTIMATE;

/// Estimates of the learner's expected outcome, keyed by position hash.
///
/// Entries are created lazily the first time a hash is looked up and are
/// never removed; the table only grows over a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<u64, f64>,
    /// Estimate for positions never seen before
    default_estimate: f64,
}

impl ValueTable {
    /// Create an empty table
    pub fn new(default_estimate: f64) -> Self {
        Self {
            values: HashMap::new(),
            default_estimate,
        }
    }

    /// Wrap an externally supplied mapping (e.g. loaded learned data)
    pub fn from_values(values: HashMap<u64, f64>, default_estimate: f64) -> Self {
        Self {
            values,
            default_estimate,
        }
    }

    /// Estimate for `hash`, falling back to the default without inserting
    pub fn estimate(&self, hash: u64) -> f64 {
        *self.values.get(&hash).unwrap_or(&self.default_estimate)
    }

    /// Estimate for `hash`, inserting the default estimate if it is missing
    pub fn get_or_insert_default(&mut self, hash: u64) -> f64 {
        *self.values.entry(hash).or_insert(self.default_estimate)
    }

    /// Set the estimate for `hash`
    pub fn set(&mut self, hash: u64, estimate: f64) {
        self.values.insert(hash, estimate);
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.values.contains_key(&hash)
    }

    pub fn default_estimate(&self) -> f64 {
        self.default_estimate
    }

    /// Number of positions with an estimate
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &HashMap<u64, f64> {
        &self.values
    }

    pub fn into_values(self) -> HashMap<u64, f64> {
        self.values
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new(UNKNOWN_ESTIMATE)
    }
}
