//! Generational loop execution.
//!
//! [`Optimizer`] orchestrates a run:
//! initialization → (phase pipeline → invariant check → best tracking) → repeat.

use super::config::RunConfig;
use super::types::Algorithm;
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::selection::best_index;
use crate::problem::{Evaluator, Objective};
use crate::random::{create_rng, RunRng};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The best individual found during the entire run.
    pub best: Individual,

    /// Best fitness value (same as `best.fitness`).
    pub best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Total number of objective evaluations, including initialization.
    pub evaluations: usize,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best-ever fitness before the first generation and after each one.
    pub fitness_history: Vec<f64>,
}

/// Owns the search state of one run and advances it generation by
/// generation.
///
/// # Usage
///
/// ```
/// use u_immune::{Objective, Optimizer, RunConfig, SearchSpace};
/// use u_immune::optia::{OptIa, OptIaConfig};
///
/// struct Sphere;
/// impl Objective for Sphere {
///     fn evaluate(&self, x: &[f64]) -> f64 {
///         x.iter().map(|v| v * v).sum()
///     }
/// }
///
/// let config = RunConfig::new(SearchSpace::new(3, -5.0, 5.0))
///     .with_population_size(10)
///     .with_max_generations(20)
///     .with_seed(42);
/// let algorithm = OptIa::new(OptIaConfig::default().with_dup(2).with_elitism(true));
///
/// let mut optimizer = Optimizer::new(algorithm, Sphere, config).unwrap();
/// let result = optimizer.run().unwrap();
/// assert_eq!(result.generations, 20);
/// assert_eq!(optimizer.population().len(), 10);
/// ```
pub struct Optimizer<A: Algorithm, O: Objective> {
    algorithm: A,
    objective: O,
    config: RunConfig,
    population: Vec<Individual>,
    best: Individual,
    rng: RunRng,
    generation: usize,
    evaluations: usize,
}

impl<A: Algorithm, O: Objective> Optimizer<A, O> {
    /// Validates the configuration, creates and evaluates a random initial
    /// population, and initializes the algorithm.
    pub fn new(algorithm: A, objective: O, config: RunConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(&config);

        let mut evaluator = Evaluator::new(&objective, &config.space);
        let population = (0..config.population_size)
            .map(|_| evaluator.spawn(&mut rng))
            .collect::<Result<Vec<_>>>()?;
        let evaluations = evaluator.evaluations();

        Self::assemble(algorithm, objective, config, population, rng, evaluations)
    }

    /// Like [`new`](Self::new), but starts from the given coordinate vectors.
    ///
    /// Each vector must have the configured dimension and lie within the
    /// bounds, and there must be exactly `population_size` of them.
    pub fn with_population(
        algorithm: A,
        objective: O,
        config: RunConfig,
        initial: Vec<Vec<f64>>,
    ) -> Result<Self> {
        config.validate()?;
        if initial.len() != config.population_size {
            return Err(Error::invalid(
                "population",
                format!(
                    "expected {} individuals, got {}",
                    config.population_size,
                    initial.len()
                ),
            ));
        }
        if let Some(i) = initial.iter().position(|v| !config.space.contains(v)) {
            return Err(Error::invalid(
                "population",
                format!(
                    "individual {i} must have dimension {} with every coordinate in [{}, {}]",
                    config.space.dimension, config.space.lbound, config.space.ubound
                ),
            ));
        }
        let rng = seeded_rng(&config);

        let mut evaluator = Evaluator::new(&objective, &config.space);
        let mut population = Vec::with_capacity(initial.len());
        for vars in initial {
            let mut ind = Individual::new(vars, config.space.direction);
            evaluator.evaluate(&mut ind)?;
            population.push(ind);
        }
        let evaluations = evaluator.evaluations();

        Self::assemble(algorithm, objective, config, population, rng, evaluations)
    }

    fn assemble(
        algorithm: A,
        objective: O,
        config: RunConfig,
        mut population: Vec<Individual>,
        rng: RunRng,
        evaluations: usize,
    ) -> Result<Self> {
        algorithm.initialize(&mut population, &config)?;
        let best = find_best(&population, &config)?.clone();

        info!(
            "{}: initialized population of {} in {} dimensions ({}), best fitness {}",
            algorithm.name(),
            population.len(),
            config.space.dimension,
            config.space.direction,
            best.fitness
        );

        Ok(Self {
            algorithm,
            objective,
            config,
            population,
            best,
            rng,
            generation: 0,
            evaluations,
        })
    }

    /// Runs the algorithm's phase pipeline once.
    ///
    /// Fails with [`Error::InvariantViolation`] if the pipeline changed the
    /// population size, and propagates evaluation failures.
    pub fn advance_generation(&mut self) -> Result<()> {
        let size = self.population.len();

        let mut evaluator = Evaluator::new(&self.objective, &self.config.space);
        let outcome =
            self.algorithm
                .advance_generation(&mut self.population, &mut evaluator, &mut self.rng);
        self.evaluations += evaluator.evaluations();
        outcome?;

        if self.population.len() != size {
            return Err(Error::InvariantViolation(format!(
                "{} changed population size from {} to {} in generation {}",
                self.algorithm.name(),
                size,
                self.population.len(),
                self.generation + 1
            )));
        }

        self.generation += 1;

        let gen_best = find_best(&self.population, &self.config)?;
        if gen_best.is_better_than(&self.best, self.config.space.direction) {
            self.best = gen_best.clone();
        }

        debug!(
            "{}: generation {} best {} (generation best {}), {} evaluations",
            self.algorithm.name(),
            self.generation,
            self.best.fitness,
            gen_best.fitness,
            self.evaluations
        );

        Ok(())
    }

    /// Runs until `max_generations`, stagnation or the time limit.
    pub fn run(&mut self) -> Result<RunResult> {
        self.run_with_cancel(None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next generation and returns the best solution found so far.
    pub fn run_with_cancel(&mut self, cancel: Option<Arc<AtomicBool>>) -> Result<RunResult> {
        let started = Instant::now();
        let remaining = self.config.max_generations.saturating_sub(self.generation);
        let mut fitness_history = Vec::with_capacity(remaining + 1);
        fitness_history.push(self.best.fitness);

        let mut stagnation_counter = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;

        while self.generation < self.config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = self.config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    break;
                }
            }

            let previous = self.best.fitness;
            self.advance_generation()?;

            if self.config.space.direction.is_better(self.best.fitness, previous) {
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }

            fitness_history.push(self.best.fitness);
            self.objective.on_generation(self.generation, self.best.fitness);

            if self.config.stagnation_limit > 0
                && stagnation_counter >= self.config.stagnation_limit
            {
                stagnated = true;
                break;
            }
        }

        info!(
            "{}: finished after {} generations, best fitness {}{}{}",
            self.algorithm.name(),
            self.generation,
            self.best.fitness,
            if stagnated { " (stagnated)" } else { "" },
            if cancelled { " (cancelled)" } else { "" }
        );

        Ok(RunResult {
            best: self.best.clone(),
            best_fitness: self.best.fitness,
            generations: self.generation,
            evaluations: self.evaluations,
            stagnated,
            cancelled,
            fitness_history,
        })
    }

    /// The current population.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// The best individual found so far.
    pub fn best(&self) -> &Individual {
        &self.best
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Number of objective evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }
}

fn seeded_rng(config: &RunConfig) -> RunRng {
    match config.seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

fn find_best<'a>(population: &'a [Individual], config: &RunConfig) -> Result<&'a Individual> {
    best_index(population, config.space.direction)
        .map(|i| &population[i])
        .ok_or_else(|| Error::InvariantViolation("population is empty".into()))
}

// ============================================================================
// Tests
// ============================================================================
