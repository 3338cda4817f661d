//! Run-level configuration.
//!
//! [`RunConfig`] holds everything that is not specific to one algorithm.

use crate::error::{Error, Result};
use crate::space::SearchSpace;

/// Configuration of one optimization run.
///
/// # Examples
///
/// ```
/// use u_immune::{RunConfig, SearchSpace};
///
/// let config = RunConfig::new(SearchSpace::new(10, -5.0, 5.0))
///     .with_population_size(50)
///     .with_max_generations(1000)
///     .with_stagnation_limit(0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// The search space every individual lives in.
    pub space: SearchSpace,

    /// Number of individuals. Invariant for the whole run.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Generations without improving the best-ever fitness before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock limit in milliseconds, checked between generations.
    pub time_limit_ms: Option<u64>,
}

impl RunConfig {
    /// Creates a configuration with default run parameters.
    ///
    /// - Population: 100, Generations: 500
    /// - Stagnation limit: disabled, no seed, no time limit
    pub fn new(space: SearchSpace) -> Self {
        Self {
            space,
            population_size: 100,
            max_generations: 500,
            stagnation_limit: 0,
            seed: None,
            time_limit_ms: None,
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.space.validate()?;
        if self.population_size < 2 {
            return Err(Error::invalid("population.size", "must be at least 2"));
        }
        if self.max_generations == 0 {
            return Err(Error::invalid("max_generations", "must be at least 1"));
        }
        if self.time_limit_ms == Some(0) {
            return Err(Error::invalid("time_limit_ms", "must be positive or unset"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> SearchSpace {
        SearchSpace::new(2, -5.0, 5.0)
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::new(space());
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.stagnation_limit, 0);
        assert!(config.seed.is_none());
        assert!(config.time_limit_ms.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let err = RunConfig::new(space())
            .with_population_size(1)
            .validate()
            .unwrap_err();
        assert!(
            matches!(err, Error::InvalidParameter { ref name, .. } if name == "population.size")
        );
    }

    #[test]
    fn test_validate_zero_generations() {
        assert!(RunConfig::new(space())
            .with_max_generations(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_space() {
        let err = RunConfig::new(SearchSpace::new(2, 1.0, -1.0))
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { ref name, .. } if name == "ubound"));
    }

    #[test]
    fn test_validate_zero_time_limit() {
        assert!(RunConfig::new(space())
            .with_time_limit_ms(0)
            .validate()
            .is_err());
    }
}
