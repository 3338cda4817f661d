//! A candidate solution and its auxiliary tags.

use crate::space::{Direction, SearchSpace};
use rand::Rng;

/// One candidate solution: a bounded real vector with its fitness.
///
/// Besides the vector and fitness, an individual carries the scalar tags the
/// algorithms keep per candidate. Each algorithm only touches the tags it
/// owns; the rest stay at zero.
///
/// | Tag | Owner |
/// |---|---|
/// | `trial` | ABC: cycles since the food source last improved |
/// | `probability` | ABC: onlooker acceptance probability |
/// | `age` | CLONALG (aging) and opt-IA |
/// | `parent_id` | CLONALG1: which antibody a clone descends from |
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    /// Coordinates, each within the space bounds.
    pub vars: Vec<f64>,

    /// Fitness of `vars` as of the last evaluation.
    pub fitness: f64,

    /// Consecutive failed improvement attempts of an ABC food source.
    pub trial: u32,

    /// Generations since the antibody was created or last improved.
    pub age: u32,

    /// Onlooker acceptance probability from the last assignment.
    pub probability: f64,

    /// Population index of the antibody this one was cloned from.
    pub parent_id: usize,
}

impl Individual {
    /// Wraps a vector with the worst fitness for `direction` and zeroed tags.
    ///
    /// The caller must evaluate it before it takes part in selection.
    pub fn new(vars: Vec<f64>, direction: Direction) -> Self {
        Self {
            vars,
            fitness: direction.worst(),
            trial: 0,
            age: 0,
            probability: 0.0,
            parent_id: 0,
        }
    }

    /// Creates an unevaluated individual drawn uniformly from `space`.
    pub fn random<R: Rng>(space: &SearchSpace, rng: &mut R) -> Self {
        Self::new(space.random_vector(rng), space.direction)
    }

    /// Returns `true` if this individual is strictly better than `other`.
    #[inline]
    pub fn is_better_than(&self, other: &Individual, direction: Direction) -> bool {
        direction.is_better(self.fitness, other.fitness)
    }

    /// Resets every auxiliary tag to zero.
    pub fn clear_tags(&mut self) {
        self.trial = 0;
        self.age = 0;
        self.probability = 0.0;
        self.parent_id = 0;
    }
}
