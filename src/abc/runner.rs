//! ABC phase pipeline.

use super::config::AbcConfig;
use crate::engine::{Algorithm, RunConfig};
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::selection::{assign_probabilities, random_other};
use crate::problem::{Evaluator, Objective};
use log::{info, trace};
use rand::Rng;

/// The Artificial Bee Colony algorithm.
///
/// Uses the `trial` and `probability` tags of each individual.
#[derive(Debug, Clone, Default)]
pub struct Abc {
    config: AbcConfig,
}

impl Abc {
    pub fn new(config: AbcConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AbcConfig {
        &self.config
    }
}

impl Algorithm for Abc {
    fn name(&self) -> &'static str {
        "ABC"
    }

    fn initialize(&self, population: &mut [Individual], _run: &RunConfig) -> Result<()> {
        self.config.validate()?;
        for food in population.iter_mut() {
            food.trial = 0;
            food.probability = 0.0;
        }
        info!("ABC: limit {}, tracking trial and probability per food source", self.config.limit);
        Ok(())
    }

    fn advance_generation<O: Objective + ?Sized, R: Rng>(
        &self,
        population: &mut Vec<Individual>,
        evaluator: &mut Evaluator<'_, O>,
        rng: &mut R,
    ) -> Result<()> {
        employed_bees_phase(population, evaluator, rng)?;
        onlooker_bees_phase(population, evaluator, rng)?;
        scout_bees_phase(population, self.config.limit, evaluator, rng)?;
        Ok(())
    }
}

/// Tries to improve the food source at `index` by moving one coordinate.
///
/// Picks a neighbor other than `index`, a random coordinate `j` and a
/// uniform `f`, and evaluates a copy whose coordinate `j` is
/// `x[j]·(1 - 2f)·(x[j] - neighbor[j])` clamped to the bounds. If the copy is
/// strictly better, the move is committed and the trial counter reset;
/// otherwise the trial counter grows by one.
///
/// Returns whether the source improved.
pub fn create_new_food_source<O: Objective + ?Sized, R: Rng>(
    population: &mut [Individual],
    index: usize,
    evaluator: &mut Evaluator<'_, O>,
    rng: &mut R,
) -> Result<bool> {
    let neighbor = random_other(population.len(), index, rng).ok_or_else(|| {
        Error::InvariantViolation("ABC needs at least two food sources".into())
    })?;

    let param = rng.random_range(0..population[index].vars.len());
    let factor: f64 = rng.random();
    let x = population[index].vars[param];
    let value = evaluator
        .space()
        .clamp(x * (1.0 - 2.0 * factor) * (x - population[neighbor].vars[param]));

    let mut candidate = population[index].clone();
    candidate.vars[param] = value;
    evaluator.evaluate(&mut candidate)?;

    let direction = evaluator.direction();
    let food = &mut population[index];
    if candidate.is_better_than(food, direction) {
        food.vars[param] = value;
        food.fitness = candidate.fitness;
        food.trial = 0;
        Ok(true)
    } else {
        food.trial += 1;
        Ok(false)
    }
}

/// Every food source makes one improvement attempt, in index order.
pub fn employed_bees_phase<O: Objective + ?Sized, R: Rng>(
    population: &mut [Individual],
    evaluator: &mut Evaluator<'_, O>,
    rng: &mut R,
) -> Result<()> {
    for i in 0..population.len() {
        create_new_food_source(population, i, evaluator, rng)?;
    }
    Ok(())
}

/// Sweeps the food sources in index order, wrapping around, and accepts each
/// visited source with its acceptance probability until `population.len()`
/// sources have been accepted. Each acceptance is one improvement attempt.
///
/// Probabilities are assigned once at the start of the phase. The best
/// source gets probability 1.0 and is accepted on every visit, so each full
/// sweep yields at least one acceptance and the phase finishes within
/// `population.len()` sweeps.
pub fn onlooker_bees_phase<O: Objective + ?Sized, R: Rng>(
    population: &mut [Individual],
    evaluator: &mut Evaluator<'_, O>,
    rng: &mut R,
) -> Result<()> {
    assign_probabilities(population, evaluator.direction());

    let n = population.len();
    let max_visits = n * n;
    let mut accepted = 0usize;
    let mut visits = 0usize;

    while accepted < n {
        if visits >= max_visits {
            return Err(Error::InvariantViolation(format!(
                "onlooker phase accepted only {accepted} of {n} sources in {n} sweeps"
            )));
        }
        let index = visits % n;
        visits += 1;

        if rng.random::<f64>() < population[index].probability {
            accepted += 1;
            create_new_food_source(population, index, evaluator, rng)?;
        }
    }

    trace!("ABC: onlooker phase finished after {visits} visits");
    Ok(())
}

/// Abandons the most exhausted food source, if any exceeded `limit`.
///
/// Among sources with `trial > limit` the one with the largest trial counter
/// is chosen (first on ties). It gets a fresh random vector, a trial counter
/// of zero and a new fitness. At most one source is replaced.
///
/// Returns the index of the replaced source.
pub fn scout_bees_phase<O: Objective + ?Sized, R: Rng>(
    population: &mut [Individual],
    limit: u32,
    evaluator: &mut Evaluator<'_, O>,
    rng: &mut R,
) -> Result<Option<usize>> {
    let mut abandoned = None;
    let mut max_trial = 0;
    for (i, food) in population.iter().enumerate() {
        if food.trial > limit && food.trial > max_trial {
            abandoned = Some(i);
            max_trial = food.trial;
        }
    }

    if let Some(i) = abandoned {
        let food = &mut population[i];
        food.trial = 0;
        evaluator.reinitialize(food, rng)?;
        trace!("ABC: scout replaced food source {i} after {max_trial} trials");
    }
    Ok(abandoned)
}

// ============================================================================
// Tests
// ============================================================================
