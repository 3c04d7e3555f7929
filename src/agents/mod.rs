//! Player implementations of the [`crate::ports::Agent`] port.

pub mod console;
pub mod learner;
pub mod search;

pub use console::ConsoleAgent;
pub use learner::{LearningAgent, ValueTable};
pub use search::SearchAgent;
