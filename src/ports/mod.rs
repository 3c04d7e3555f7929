//! Ports (trait boundaries) for external dependencies.
//!
//! The game loop talks to players, reporters and storage only through these
//! traits; concrete players live in `agents`, storage in `adapters`.

pub mod agent;
pub mod observer;
pub mod repository;

pub use agent::Agent;
pub use observer::Observer;
pub use repository::LearnedDataRepository;
