//! Selection operators over a population snapshot.
//!
//! All operators take the optimization [`Direction`] explicitly; nothing here
//! assumes minimization.

use crate::individual::Individual;
use crate::space::Direction;
use rand::Rng;

/// Acceptance probability floor for the worst food sources.
const PROBABILITY_FLOOR: f64 = 0.1;

/// Picks a uniformly random index in `0..len` different from `exclude`.
///
/// Rejection-samples until the draw differs, matching one
/// `random_range` call per attempt. Returns `None` when no other index exists
/// (`len < 2`).
pub fn random_other<R: Rng>(len: usize, exclude: usize, rng: &mut R) -> Option<usize> {
    if len < 2 {
        return None;
    }
    loop {
        let idx = rng.random_range(0..len);
        if idx != exclude {
            return Some(idx);
        }
    }
}

/// Index of the best individual. Ties resolve to the first occurrence.
///
/// Returns `None` for an empty population.
pub fn best_index(population: &[Individual], direction: Direction) -> Option<usize> {
    let mut iter = population.iter().enumerate();
    let (mut best, mut best_fitness) = match iter.next() {
        Some((i, ind)) => (i, ind.fitness),
        None => return None,
    };
    for (i, ind) in iter {
        if direction.is_better(ind.fitness, best_fitness) {
            best = i;
            best_fitness = ind.fitness;
        }
    }
    Some(best)
}

/// Stable best-first sort by fitness.
pub fn sort_by_fitness(population: &mut [Individual], direction: Direction) {
    population.sort_by(|a, b| direction.compare(a.fitness, b.fitness));
}

/// Stable sort by `parent_id` ascending, then best-first fitness within a parent.
pub fn sort_by_parent_and_fitness(population: &mut [Individual], direction: Direction) {
    population.sort_by(|a, b| {
        a.parent_id
            .cmp(&b.parent_id)
            .then_with(|| direction.compare(a.fitness, b.fitness))
    });
}

/// Fitness-proportional acceptance probability relative to the best fitness.
///
/// - equal to the best: `1.0`
/// - minimization: `0.1 + 0.9 · best / fitness`
/// - maximization: `0.1 + 0.9 · fitness / best`
///
/// For positive fitness values the result lies in `[0.1, 1.0]`.
pub fn acceptance_probability(fitness: f64, best: f64, direction: Direction) -> f64 {
    if fitness == best {
        return 1.0;
    }
    let ratio = match direction {
        Direction::Minimize => best / fitness,
        Direction::Maximize => fitness / best,
    };
    PROBABILITY_FLOOR + (1.0 - PROBABILITY_FLOOR) * ratio
}

/// Stores each individual's [`acceptance_probability`] in its `probability` tag.
///
/// The best individual always receives `1.0`.
pub fn assign_probabilities(population: &mut [Individual], direction: Direction) {
    let Some(best) = best_index(population, direction) else {
        return;
    };
    let best_fitness = population[best].fitness;
    for ind in population.iter_mut() {
        ind.probability = acceptance_probability(ind.fitness, best_fitness, direction);
    }
}
