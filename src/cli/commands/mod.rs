//! Subcommand implementations

pub mod duel;
pub mod play;
pub mod train;
