//! CLONALG phase pipeline.

use super::config::{ClonalgConfig, CloningVersion, SelectionScheme};
use crate::engine::{Algorithm, RunConfig};
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::mutation::{hypermutate, hypermutation_count, rank_strength};
use crate::operators::selection::{best_index, sort_by_fitness, sort_by_parent_and_fitness};
use crate::problem::{Evaluator, Objective};
use crate::space::Direction;
use log::{info, trace};
use rand::Rng;

/// The Clonal Selection Algorithm.
///
/// Uses the `parent_id` tag under [`SelectionScheme::Clonalg1`] and the `age`
/// tag when aging is enabled.
#[derive(Debug, Clone, Default)]
pub struct Clonalg {
    config: ClonalgConfig,
}

impl Clonalg {
    pub fn new(config: ClonalgConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClonalgConfig {
        &self.config
    }
}

impl Algorithm for Clonalg {
    fn name(&self) -> &'static str {
        match (self.config.selection, self.config.tau_b) {
            (SelectionScheme::Clonalg1, _) => "CLONALG1",
            (SelectionScheme::Clonalg2, None) => "CLONALG2",
            (SelectionScheme::Clonalg2, Some(_)) => "CLONALG2+aging",
        }
    }

    fn initialize(&self, population: &mut [Individual], run: &RunConfig) -> Result<()> {
        self.config.validate_for(run.population_size)?;
        for ab in population.iter_mut() {
            ab.age = 0;
            ab.parent_id = 0;
        }
        info!(
            "{}: n {}, beta {}, c {}, d {}, {} cloning{}{}",
            self.name(),
            self.config.n,
            self.config.beta,
            self.config.c,
            self.config.d,
            self.config.cloning,
            if self.config.selection == SelectionScheme::Clonalg1 {
                ", tracking parent antibody"
            } else {
                ""
            },
            if self.config.tau_b.is_some() {
                ", tracking antibody age"
            } else {
                ""
            }
        );
        Ok(())
    }

    fn advance_generation<O: Objective + ?Sized, R: Rng>(
        &self,
        population: &mut Vec<Individual>,
        evaluator: &mut Evaluator<'_, O>,
        rng: &mut R,
    ) -> Result<()> {
        let population_size = population.len();
        let direction = evaluator.direction();

        if self.config.selection == SelectionScheme::Clonalg1 {
            mark_parents(population);
        }
        let mut clones = cloning_phase(population, &self.config, direction);
        hypermutation_phase(&mut clones, &self.config, population_size, evaluator, rng)?;
        selection_phase(&mut clones, &self.config, population_size, direction);
        birth_phase(&mut clones, population_size, evaluator, rng)?;
        replace_population(population, clones)?;

        if let Some(tau_b) = self.config.tau_b {
            aging_phase(population, tau_b, self.config.elitism, evaluator, rng)?;
        }
        Ok(())
    }
}

/// Tags every antibody with its population index.
fn mark_parents(population: &mut [Individual]) {
    for (i, ab) in population.iter_mut().enumerate() {
        ab.parent_id = i;
    }
}

/// Builds the clone set: the `n` best antibodies followed by their clones.
fn cloning_phase(
    population: &[Individual],
    config: &ClonalgConfig,
    direction: Direction,
) -> Vec<Individual> {
    let per_antibody = config.clones_per_antibody(population.len());

    let mut clones = population.to_vec();
    sort_by_fitness(&mut clones, direction);
    clones.truncate(config.n);

    for i in 0..config.n {
        let count = match config.cloning {
            CloningVersion::Static => per_antibody,
            CloningVersion::Proportional => per_antibody / (i + 1),
        };
        let source = clones[i].clone();
        clones.extend((0..count).map(|_| source.clone()));
    }
    clones
}

/// Mutates and re-evaluates every member of the clone set.
///
/// Strength grows with position in groups of `⌊beta·population_size⌋ + 1`.
/// With aging enabled, a clone that beats its pre-mutation fitness gets age 0.
fn hypermutation_phase<O: Objective + ?Sized, R: Rng>(
    clones: &mut [Individual],
    config: &ClonalgConfig,
    population_size: usize,
    evaluator: &mut Evaluator<'_, O>,
    rng: &mut R,
) -> Result<()> {
    let group = config.clones_per_antibody(population_size) + 1;
    let space = evaluator.space().clone();

    for (i, ab) in clones.iter_mut().enumerate() {
        let mutations = hypermutation_count(rank_strength(i, group), config.c, space.dimension);
        let original = ab.fitness;
        hypermutate(&mut ab.vars, mutations, &space, rng);
        evaluator.evaluate(ab)?;

        if config.tau_b.is_some() && space.direction.is_better(ab.fitness, original) {
            ab.age = 0;
        }
    }
    Ok(())
}

/// Reduces the clone set to at most `⌊(1-d)·population_size⌋` survivors.
fn selection_phase(
    clones: &mut Vec<Individual>,
    config: &ClonalgConfig,
    population_size: usize,
    direction: Direction,
) {
    let survivors = config.survivors(population_size);

    match config.selection {
        SelectionScheme::Clonalg2 => {
            sort_by_fitness(clones, direction);
            clones.truncate(survivors);
        }
        SelectionScheme::Clonalg1 => {
            sort_by_parent_and_fitness(clones, direction);
            let mut kept = Vec::with_capacity(survivors);
            let mut parent = None;
            let mut taken = 0usize;
            for ab in std::mem::take(clones) {
                if kept.len() >= survivors {
                    break;
                }
                if parent != Some(ab.parent_id) {
                    parent = Some(ab.parent_id);
                    taken = 0;
                }
                if taken < config.clones_per_parent {
                    kept.push(ab);
                    taken += 1;
                }
            }
            *clones = kept;
        }
    }
}

/// Appends freshly randomized antibodies until the clone set has
/// `population_size` members.
///
/// Survivors carry parent ids below `population_size`, so newborns are
/// numbered from `population_size` upward and never share a parent group.
fn birth_phase<O: Objective + ?Sized, R: Rng>(
    clones: &mut Vec<Individual>,
    population_size: usize,
    evaluator: &mut Evaluator<'_, O>,
    rng: &mut R,
) -> Result<()> {
    let births = population_size.saturating_sub(clones.len());
    for j in 0..births {
        let mut newborn = evaluator.spawn(rng)?;
        newborn.parent_id = population_size + j;
        clones.push(newborn);
    }
    if births > 0 {
        trace!("CLONALG: {births} antibodies born");
    }
    Ok(())
}

/// Overwrites the leading population slots with the clone set.
fn replace_population(population: &mut [Individual], clones: Vec<Individual>) -> Result<()> {
    if clones.len() > population.len() {
        return Err(Error::InvariantViolation(format!(
            "clone set of {} does not fit a population of {}",
            clones.len(),
            population.len()
        )));
    }
    for (slot, ab) in population.iter_mut().zip(clones) {
        *slot = ab;
    }
    Ok(())
}

/// Static pure aging: every antibody ages by one generation and any antibody
/// older than `tau_b` is replaced in place by a random one of age 0.
///
/// With `elitism`, the current best antibody is never replaced.
fn aging_phase<O: Objective + ?Sized, R: Rng>(
    population: &mut [Individual],
    tau_b: f64,
    elitism: bool,
    evaluator: &mut Evaluator<'_, O>,
    rng: &mut R,
) -> Result<()> {
    let elite = if elitism {
        best_index(population, evaluator.direction())
    } else {
        None
    };

    let mut replaced = 0usize;
    for (i, ab) in population.iter_mut().enumerate() {
        ab.age += 1;
        if f64::from(ab.age) > tau_b && Some(i) != elite {
            ab.age = 0;
            evaluator.reinitialize(ab, rng)?;
            replaced += 1;
        }
    }
    if replaced > 0 {
        trace!("CLONALG: {replaced} antibodies aged out");
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
