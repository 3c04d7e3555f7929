//! Configuration types for agent creation.

use crate::{
    Error, Result,
    types::{DEFAULT_ALPHA, DEFAULT_EPSILON, LOSS_ESTIMATE, UNKNOWN_ESTIMATE},
};

/// Configuration for creating a learning agent.
///
/// # Examples
///
/// ```
/// use jokettt::app::LearnerConfig;
///
/// let config = LearnerConfig::new()
///     .with_alpha(0.2)
///     .with_epsilon(0.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerConfig {
    /// Learning rate, in (0.0, 1.0]
    pub alpha: f64,
    /// Exploration rate, in [0.0, 1.0]
    pub epsilon: f64,
    /// Estimate given to positions never seen before
    pub initial_estimate: f64,
    /// Estimate a lost final position is anchored to
    pub loss_estimate: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    pub verbosity: u8,
}

impl LearnerConfig {
    /// Defaults: alpha 0.1, epsilon 0.1, unseen positions 0.5, losses 0.0.
    pub fn new() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            epsilon: DEFAULT_EPSILON,
            initial_estimate: UNKNOWN_ESTIMATE,
            loss_estimate: LOSS_ESTIMATE,
            seed: None,
            verbosity: 0,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_initial_estimate(mut self, estimate: f64) -> Self {
        self.initial_estimate = estimate;
        self
    }

    pub fn with_loss_estimate(mut self, estimate: f64) -> Self {
        self.loss_estimate = estimate;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Check every parameter range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("alpha {} not in range (0.0, 1.0]", self.alpha),
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon {} not in range [0.0, 1.0]", self.epsilon),
            });
        }
        for (name, value) in [
            ("initial estimate", self.initial_estimate),
            ("loss estimate", self.loss_estimate),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} {value} is not a finite number"),
                });
            }
        }
        Ok(())
    }
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for creating a search (minimax or random) agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Move uniformly at random instead of searching
    pub random_mode: bool,
    pub seed: Option<u64>,
    pub verbosity: u8,
}

impl SearchConfig {
    /// Perfect minimax player.
    pub fn minimax() -> Self {
        Self::default()
    }

    /// Uniformly random player.
    pub fn random() -> Self {
        Self {
            random_mode: true,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LearnerConfig::default();
        assert_eq!(config.alpha, DEFAULT_ALPHA);
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_alpha_range() {
        assert!(LearnerConfig::new().with_alpha(1.0).validate().is_ok());
        assert!(LearnerConfig::new().with_alpha(0.0).validate().is_err());
        assert!(LearnerConfig::new().with_alpha(1.5).validate().is_err());
        assert!(LearnerConfig::new().with_alpha(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_epsilon_and_estimates() {
        assert!(LearnerConfig::new().with_epsilon(0.0).validate().is_ok());
        assert!(LearnerConfig::new().with_epsilon(-0.1).validate().is_err());
        assert!(
            LearnerConfig::new()
                .with_initial_estimate(f64::INFINITY)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_search_config_modes() {
        assert!(!SearchConfig::minimax().random_mode);
        let random = SearchConfig::random().with_seed(3);
        assert!(random.random_mode);
        assert_eq!(random.seed, Some(3));
    }
}
