//! CLI infrastructure for the tic-tac-toe players
//!
//! Human-versus-AI play, learner training and AI-versus-AI duels.

pub mod commands;
pub mod config;
pub mod output;

pub use config::PlayerKind;
