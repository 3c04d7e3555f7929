//! Game driver, match runner and reporting observers
//!
//! This module provides:
//! - `GameDriver` playing single games between two agents
//! - `MatchRunner` playing a configured series of games
//! - Observers recording progress, statistics and learning curves

pub mod driver;
pub mod observers;

pub use driver::{GameDriver, GameOutcome, MatchConfig, MatchResult, MatchRunner, Side};
pub use observers::{
    BoardObserver, CsvObserver, MetricsObserver, MetricsSummary, MilestoneObserver,
    ProgressObserver, StatisticsObserver, Tally,
};

pub use crate::ports::{Agent, Observer};
