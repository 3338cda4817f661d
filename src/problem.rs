//! The objective function contract and the evaluation wrapper the phases use.

use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::space::{Direction, SearchSpace};
use rand::Rng;

/// A black-box objective over a real vector.
///
/// Implementations must be deterministic for a fixed vector. Returning NaN
/// signals a failed evaluation and aborts the run.
///
/// # Examples
///
/// ```
/// use u_immune::Objective;
///
/// struct Sphere;
///
/// impl Objective for Sphere {
///     fn evaluate(&self, x: &[f64]) -> f64 {
///         x.iter().map(|v| v * v).sum()
///     }
/// }
///
/// assert_eq!(Sphere.evaluate(&[1.0, 2.0]), 5.0);
/// ```
pub trait Objective {
    /// Computes the fitness of a coordinate vector.
    fn evaluate(&self, x: &[f64]) -> f64;

    /// Called by the driver at the end of each generation with the best
    /// fitness found so far. The default implementation is a no-op.
    fn on_generation(&self, _generation: usize, _best_fitness: f64) {}
}

/// Evaluates individuals against an objective within a search space.
///
/// Counts every evaluation and turns a NaN fitness into
/// [`Error::Evaluation`] so that a failing objective never leaves a stale
/// fitness behind.
pub struct Evaluator<'a, O: Objective + ?Sized> {
    objective: &'a O,
    space: &'a SearchSpace,
    evaluations: usize,
}

impl<'a, O: Objective + ?Sized> Evaluator<'a, O> {
    pub fn new(objective: &'a O, space: &'a SearchSpace) -> Self {
        Self {
            objective,
            space,
            evaluations: 0,
        }
    }

    #[inline]
    pub fn space(&self) -> &SearchSpace {
        self.space
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.space.direction
    }

    /// Number of objective calls made through this evaluator.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Re-evaluates `individual` and stores the result in its fitness field.
    pub fn evaluate(&mut self, individual: &mut Individual) -> Result<()> {
        let fitness = self.objective.evaluate(&individual.vars);
        self.evaluations += 1;
        if fitness.is_nan() {
            return Err(Error::Evaluation {
                reason: format!("objective returned NaN for {:?}", individual.vars),
            });
        }
        individual.fitness = fitness;
        Ok(())
    }

    /// Creates a brand-new random individual and evaluates it.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R) -> Result<Individual> {
        let mut individual = Individual::random(self.space, rng);
        self.evaluate(&mut individual)?;
        Ok(individual)
    }

    /// Replaces the coordinates of `individual` with a fresh random vector and
    /// evaluates it. Tags are left to the caller.
    pub fn reinitialize<R: Rng>(&mut self, individual: &mut Individual, rng: &mut R) -> Result<()> {
        individual.vars = self.space.random_vector(rng);
        self.evaluate(individual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    struct Sum;

    impl Objective for Sum {
        fn evaluate(&self, x: &[f64]) -> f64 {
            x.iter().sum()
        }
    }

    struct Broken;

    impl Objective for Broken {
        fn evaluate(&self, _x: &[f64]) -> f64 {
            f64::NAN
        }
    }

    #[test]
    fn test_evaluate_sets_fitness_and_counts() {
        let space = SearchSpace::new(2, -1.0, 1.0);
        let mut eval = Evaluator::new(&Sum, &space);
        let mut ind = Individual::new(vec![0.25, 0.5], Direction::Minimize);
        eval.evaluate(&mut ind).unwrap();
        assert_eq!(ind.fitness, 0.75);
        assert_eq!(eval.evaluations(), 1);
    }

    #[test]
    fn test_nan_is_evaluation_error() {
        let space = SearchSpace::new(2, -1.0, 1.0);
        let mut eval = Evaluator::new(&Broken, &space);
        let mut ind = Individual::new(vec![0.0, 0.0], Direction::Minimize);
        let err = eval.evaluate(&mut ind).unwrap_err();
        assert!(matches!(err, Error::Evaluation { .. }));
        assert_eq!(ind.fitness, f64::INFINITY);
    }

    #[test]
    fn test_spawn_and_reinitialize() {
        let space = SearchSpace::new(4, 0.0, 10.0);
        let mut eval = Evaluator::new(&Sum, &space);
        let mut rng = create_rng(42);
        let mut ind = eval.spawn(&mut rng).unwrap();
        assert!(space.contains(&ind.vars));
        assert_eq!(ind.fitness, ind.vars.iter().sum::<f64>());

        let before = ind.vars.clone();
        eval.reinitialize(&mut ind, &mut rng).unwrap();
        assert_ne!(before, ind.vars);
        assert_eq!(ind.fitness, ind.vars.iter().sum::<f64>());
        assert_eq!(eval.evaluations(), 2);
    }
}
