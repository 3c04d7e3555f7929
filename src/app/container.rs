//! Dependency injection container.
//!
//! The container owns the learned-data repository and a default seed, and
//! creates boards and agents wired to them.

use std::{collections::HashMap, path::Path, sync::Arc};

use rand::{SeedableRng, rngs::StdRng};

use super::config::{LearnerConfig, SearchConfig};
use crate::{
    Result,
    adapters::MsgPackRepository,
    agents::{LearningAgent, SearchAgent},
    learned_data::{self, LearnedData, TrainingMetadata},
    ports::LearnedDataRepository,
    tictactoe::{Board, Mark, ZobristKeys},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use jokettt::app::{App, LearnerConfig};
/// use jokettt::tictactoe::Mark;
/// use std::collections::HashMap;
///
/// let app = App::new();
/// let learner = app.create_learner(Mark::X, &LearnerConfig::new().with_seed(42), HashMap::new())?;
/// # Ok::<(), jokettt::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use jokettt::app::App;
/// use jokettt::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    repository: Arc<dyn LearnedDataRepository + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with `MsgPackRepository` and no default seed.
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn repository(&self) -> Arc<dyn LearnedDataRepository + Sync> {
        Arc::clone(&self.repository)
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    fn rng(&self) -> StdRng {
        match self.default_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Board whose hashes are computed with `keys`, `primary` taking the first key slot.
    pub fn create_board(&self, primary: Mark, keys: ZobristKeys) -> Board {
        Board::new(primary, keys)
    }

    /// Create a learning agent starting from `values`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the config is out of range.
    pub fn create_learner(
        &self,
        mark: Mark,
        config: &LearnerConfig,
        values: HashMap<u64, f64>,
    ) -> Result<LearningAgent> {
        config.validate()?;
        let mut learner = LearningAgent::new(mark, config.alpha, config.epsilon)?
            .with_initial_estimate(config.initial_estimate)?
            .with_loss_estimate(config.loss_estimate)?
            .with_values(values)
            .with_verbosity(config.verbosity);

        // Apply seed from config or use container default
        if let Some(seed) = config.seed.or(self.default_seed) {
            learner = learner.with_seed(seed);
        }
        Ok(learner)
    }

    /// Create a minimax or random agent.
    pub fn create_search_agent(&self, mark: Mark, config: &SearchConfig) -> SearchAgent {
        let agent = match config.random_mode {
            true => SearchAgent::random(mark),
            false => SearchAgent::new(mark),
        };
        let agent = agent.with_verbosity(config.verbosity);

        match config.seed.or(self.default_seed) {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        }
    }

    /// Load learned data from `path`, or start fresh.
    ///
    /// Without a path, or when loading fails, fresh keys and an empty table are
    /// returned; the second element then explains a failed load.
    pub fn load_learned_data(&self, path: Option<&Path>) -> (LearnedData, Option<String>) {
        let mut rng = self.rng();
        match path {
            Some(path) => learned_data::load_or_fresh(self.repository.as_ref(), path, &mut rng),
            None => (LearnedData::fresh(&mut rng), None),
        }
    }

    /// Save the learner's table together with the key table of the board it played on.
    pub fn save_learned_data(
        &self,
        board: &Board,
        learner: &LearningAgent,
        metadata: TrainingMetadata,
        path: &Path,
    ) -> Result<()> {
        let data = LearnedData::new(board.keys().clone(), learner.export_values(), metadata);
        self.repository.save(&data, path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
pub struct AppBuilder {
    repository: Option<Arc<dyn LearnedDataRepository + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Set a custom learned-data repository.
    pub fn with_repository<R: LearnedDataRepository + Sync + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for everything created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app, falling back to `MsgPackRepository`.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
