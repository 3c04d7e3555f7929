//! Shared argument types for CLI commands

use std::collections::HashMap;

use clap::ValueEnum;

use crate::{
    app::{App, LearnerConfig, SearchConfig},
    ports::Agent,
    tictactoe::Mark,
};

/// Kind of AI player
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    /// Perfect minimax search
    #[value(alias = "search")]
    Minimax,
    /// Temporal-difference learner
    Learner,
    /// Uniformly random moves
    Random,
}

impl PlayerKind {
    pub fn describe(self) -> &'static str {
        match self {
            PlayerKind::Minimax => "smart minimax player",
            PlayerKind::Learner => "learner player",
            PlayerKind::Random => "random (dumb) player",
        }
    }
}

/// Parse a learning rate in (0.0, 1.0]
pub fn alpha_value(raw: &str) -> Result<f64, String> {
    let alpha: f64 = raw
        .parse()
        .map_err(|_| format!("{raw:?} not a floating point literal"))?;
    if alpha <= 0.0 || alpha > 1.0 || alpha.is_nan() {
        return Err(format!("{alpha} not in range (0.0, 1.0]"));
    }
    Ok(alpha)
}

/// Parse an exploration rate in [0.0, 1.0]
pub fn epsilon_value(raw: &str) -> Result<f64, String> {
    let epsilon: f64 = raw
        .parse()
        .map_err(|_| format!("{raw:?} not a floating point literal"))?;
    if !(0.0..=1.0).contains(&epsilon) {
        return Err(format!("{epsilon} not in range [0.0, 1.0]"));
    }
    Ok(epsilon)
}

/// Build a boxed agent of `kind`; learners start from `values`.
pub fn build_agent(
    app: &App,
    kind: PlayerKind,
    mark: Mark,
    learner: &LearnerConfig,
    values: HashMap<u64, f64>,
) -> crate::Result<Box<dyn Agent>> {
    let search = SearchConfig {
        verbosity: learner.verbosity,
        seed: learner.seed,
        ..SearchConfig::default()
    };
    let agent: Box<dyn Agent> = match kind {
        PlayerKind::Minimax => Box::new(app.create_search_agent(mark, &search)),
        PlayerKind::Random => Box::new(app.create_search_agent(
            mark,
            &SearchConfig {
                random_mode: true,
                ..search
            },
        )),
        PlayerKind::Learner => Box::new(app.create_learner(mark, learner, values)?),
    };
    Ok(agent)
}
