//! Value-based learning player
//!
//! The learner keeps an estimate of its expected outcome for every position
//! hash it has seen. Moves are chosen epsilon-greedily over the positions its
//! own placement would create; after a lost game the loss is backed up along
//! the positions it visited, latest first:
//!
//! ```text
//! V(earlier) ← V(earlier) + α · (V(later) − V(earlier))
//! ```
//!
//! Wins and draws leave the table untouched.
//!
//! ## Usage Example
//!
//! ```no_run
//! use jokettt::agents::LearningAgent;
//! use jokettt::tictactoe::Mark;
//!
//! let learner = LearningAgent::new(
//!     Mark::X,
//!     0.1, // alpha (learning rate)
//!     0.1, // epsilon (exploration)
//! )?
//! .with_seed(42);
//! # Ok::<(), jokettt::Error>(())
//! ```

pub mod agent;
pub mod value_table;

pub use agent::LearningAgent;
pub use value_table::ValueTable;
