//! The contract between the driver and a concrete algorithm.

use super::config::RunConfig;
use crate::error::Result;
use crate::individual::Individual;
use crate::problem::{Evaluator, Objective};
use rand::Rng;

/// A population-transformation pipeline run once per generation.
///
/// Implementations hold only their immutable configuration; all mutable
/// search state lives in the population the driver passes in.
pub trait Algorithm {
    /// Short human-readable name used in log output.
    fn name(&self) -> &'static str;

    /// Validates the algorithm parameters against the run and prepares the
    /// auxiliary tags of the initial population.
    ///
    /// Called exactly once, before the first generation. An error here aborts
    /// the run with no generation executed.
    fn initialize(&self, population: &mut [Individual], run: &RunConfig) -> Result<()>;

    /// Runs one generation.
    ///
    /// On success the population must hold exactly as many individuals as it
    /// did on entry, each with a fitness consistent with its coordinates.
    fn advance_generation<O: Objective + ?Sized, R: Rng>(
        &self,
        population: &mut Vec<Individual>,
        evaluator: &mut Evaluator<'_, O>,
        rng: &mut R,
    ) -> Result<()>;
}
