//! opt-IA phase pipeline.

use super::config::OptIaConfig;
use crate::engine::{Algorithm, RunConfig};
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::mutation::{hypermutate, hypermutation_count, rank_strength};
use crate::operators::selection::{best_index, sort_by_fitness};
use crate::problem::{Evaluator, Objective};
use crate::space::Direction;
use log::{info, trace};
use rand::Rng;

/// The Optimization Immune Algorithm.
///
/// Uses the `age` tag of each antibody.
#[derive(Debug, Clone, Default)]
pub struct OptIa {
    config: OptIaConfig,
}

impl OptIa {
    pub fn new(config: OptIaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptIaConfig {
        &self.config
    }
}

impl Algorithm for OptIa {
    fn name(&self) -> &'static str {
        "optIA"
    }

    fn initialize(&self, population: &mut [Individual], _run: &RunConfig) -> Result<()> {
        self.config.validate()?;
        for ab in population.iter_mut() {
            ab.age = 0;
        }
        info!(
            "optIA: dup {}, c {}, tauB {}, elitism {}, tracking antibody age",
            self.config.dup, self.config.c, self.config.tau_b, self.config.elitism
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

        // The clone set mutates the originals too, so the incoming best is
        // remembered separately for elitism.
        let incumbent = if self.config.elitism {
            best_index(population, direction).map(|i| population[i].clone())
        } else {
            None
        };

        let mut clones = cloning_phase(population, self.config.dup);
        hypermutation_phase(&mut clones, &self.config, evaluator, rng)?;
        aging_phase(&mut clones, self.config.tau_b, incumbent, direction);
        selection_phase(&mut clones, population_size, direction);
        birth_phase(&mut clones, population_size, evaluator, rng)?;
        replace_population(population, clones)
    }
}

/// Copies the population and appends `dup` clones of every antibody.
fn cloning_phase(population: &[Individual], dup: usize) -> Vec<Individual> {
    let mut clones = Vec::with_capacity(population.len() * (dup + 1));
    clones.extend_from_slice(population);
    for ab in population {
        clones.extend((0..dup).map(|_| ab.clone()));
    }
    clones
}

/// Sorts the clone set, then mutates and re-evaluates every member with
/// strength `k = 1 + ⌊i / (dup + 1)⌋`. Clones that beat their pre-mutation
/// fitness are rejuvenated.
fn hypermutation_phase<O: Objective + ?Sized, R: Rng>(
    clones: &mut [Individual],
    config: &OptIaConfig,
    evaluator: &mut Evaluator<'_, O>,
    rng: &mut R,
) -> Result<()> {
    let space = evaluator.space().clone();
    sort_by_fitness(clones, space.direction);

    for (i, ab) in clones.iter_mut().enumerate() {
        let mutations =
            hypermutation_count(rank_strength(i, config.dup + 1), config.c, space.dimension);
        let original = ab.fitness;
        hypermutate(&mut ab.vars, mutations, &space, rng);
        evaluator.evaluate(ab)?;

        if space.direction.is_better(ab.fitness, original) {
            ab.age = 0;
        }
    }
    Ok(())
}

/// Ages every clone by one generation and drops those older than `tau_b`.
///
/// With an `incumbent`, a single elite is kept regardless of age: the better
/// of the best clone and the incumbent, the clone winning ties. The elite is
/// placed first and never duplicated.
fn aging_phase(
    clones: &mut Vec<Individual>,
    tau_b: f64,
    incumbent: Option<Individual>,
    direction: Direction,
) {
    sort_by_fitness(clones, direction);
    for ab in clones.iter_mut() {
        ab.age += 1;
    }

    let elite = match incumbent {
        Some(mut incumbent) => {
            incumbent.age += 1;
            let clone_wins = clones
                .first()
                .is_some_and(|best| !incumbent.is_better_than(best, direction));
            Some(if clone_wins { clones.remove(0) } else { incumbent })
        }
        None => None,
    };

    let before = clones.len();
    clones.retain(|ab| f64::from(ab.age) <= tau_b);
    let dropped = before - clones.len();
    if let Some(elite) = elite {
        clones.insert(0, elite);
    }

    if dropped > 0 {
        trace!("optIA: {dropped} antibodies aged out");
    }
}

/// Keeps the best `population_size` clones.
fn selection_phase(clones: &mut Vec<Individual>, population_size: usize, direction: Direction) {
    sort_by_fitness(clones, direction);
    clones.truncate(population_size);
}

/// Appends random antibodies of age 0 until the clone set has
/// `population_size` members.
fn birth_phase<O: Objective + ?Sized, R: Rng>(
    clones: &mut Vec<Individual>,
    population_size: usize,
    evaluator: &mut Evaluator<'_, O>,
    rng: &mut R,
) -> Result<()> {
    let births = population_size.saturating_sub(clones.len());
    for _ in 0..births {
        clones.push(evaluator.spawn(rng)?);
    }
    if births > 0 {
        trace!("optIA: {births} antibodies born");
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

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Optimizer;
    use crate::random::create_rng;
    use crate::space::SearchSpace;
    use proptest::prelude::*;

    struct Sphere;

    impl Objective for Sphere {
        fn evaluate(&self, x: &[f64]) -> f64 {
            x.iter().map(|v| v * v).sum()
        }
    }

    fn with_fitness(fitness: f64, age: u32) -> Individual {
        let mut ab = Individual::new(vec![fitness], Direction::Minimize);
        ab.fitness = fitness;
        ab.age = age;
        ab
    }

    #[test]
    fn test_cloning_copies_every_antibody_dup_times() {
        let pop: Vec<Individual> = (0..4).map(|i| with_fitness(i as f64, 0)).collect();
        let clones = cloning_phase(&pop, 3);
        assert_eq!(clones.len(), 16);
        assert_eq!(&clones[..4], &pop[..]);
        for (k, chunk) in clones[4..].chunks(3).enumerate() {
            assert!(chunk.iter().all(|c| c == &pop[k]));
        }
    }

    #[test]
    fn test_tau_zero_regenerates_whole_population() {
        // dup=3, population 4, tauB=0: every clone is dropped by aging
        let config = RunConfig::new(SearchSpace::new(2, -5.0, 5.0))
            .with_population_size(4)
            .with_seed(11);
        let algorithm = OptIa::new(OptIaConfig::default().with_dup(3).with_tau_b(0.0));
        let mut opt = Optimizer::new(algorithm, Sphere, config).unwrap();
        let before = opt.population().to_vec();
        let evaluations = opt.evaluations();

        opt.advance_generation().unwrap();

        assert_eq!(opt.evaluations() - evaluations, 16 + 4);
        assert_eq!(opt.population().len(), 4);
        for ab in opt.population() {
            assert_eq!(ab.age, 0);
            assert!(before.iter().all(|old| old.vars != ab.vars));
        }
    }

    #[test]
    fn test_aging_drops_old_and_keeps_young() {
        let mut clones = vec![with_fitness(3.0, 0), with_fitness(1.0, 5), with_fitness(2.0, 1)];
        aging_phase(&mut clones, 2.0, None, Direction::Minimize);
        let survivors: Vec<(f64, u32)> = clones.iter().map(|c| (c.fitness, c.age)).collect();
        assert_eq!(survivors, vec![(2.0, 2), (3.0, 1)]);
    }

    #[test]
    fn test_aging_elite_best_clone_survives_once() {
        let mut clones = vec![with_fitness(1.0, 9), with_fitness(1.0, 9), with_fitness(2.0, 0)];
        aging_phase(&mut clones, 0.0, Some(with_fitness(4.0, 0)), Direction::Minimize);
        assert_eq!(clones.len(), 1);
        assert_eq!(clones[0].fitness, 1.0);
        assert_eq!(clones[0].age, 10);
    }

    #[test]
    fn test_aging_elite_incumbent_wins_when_clones_regress() {
        let mut clones = vec![with_fitness(5.0, 0), with_fitness(6.0, 0)];
        aging_phase(&mut clones, 3.0, Some(with_fitness(0.5, 2)), Direction::Minimize);
        let fitness: Vec<f64> = clones.iter().map(|c| c.fitness).collect();
        assert_eq!(fitness, vec![0.5, 5.0, 6.0]);
        assert_eq!(clones[0].age, 3);
    }

    #[test]
    fn test_aging_elite_tie_prefers_clone() {
        let mut clones = vec![with_fitness(1.0, 0)];
        clones[0].vars = vec![7.0];
        aging_phase(&mut clones, 10.0, Some(with_fitness(1.0, 0)), Direction::Minimize);
        assert_eq!(clones.len(), 1);
        assert_eq!(clones[0].vars, vec![7.0]);
    }

    #[test]
    fn test_selection_truncates_to_population() {
        let mut clones: Vec<Individual> =
            [4.0, 1.0, 3.0, 2.0, 5.0].iter().map(|&f| with_fitness(f, 0)).collect();
        selection_phase(&mut clones, 3, Direction::Maximize);
        let fitness: Vec<f64> = clones.iter().map(|c| c.fitness).collect();
        assert_eq!(fitness, vec![5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_hypermutation_rejuvenates_improved_clones() {
        let space = SearchSpace::new(4, -5.0, 5.0);
        let mut rng = create_rng(21);
        let mut eval = Evaluator::new(&Sphere, &space);
        let mut clones: Vec<Individual> = (0..12)
            .map(|_| {
                let mut ab = eval.spawn(&mut rng).unwrap();
                ab.age = 7;
                ab
            })
            .collect();
        let config = OptIaConfig::default().with_dup(2).with_c(0.5);
        let before = clones.clone();
        hypermutation_phase(&mut clones, &config, &mut eval, &mut rng).unwrap();
        assert_eq!(eval.evaluations(), 24);

        let mut sorted = before;
        sort_by_fitness(&mut sorted, Direction::Minimize);
        for (old, new) in sorted.iter().zip(&clones) {
            assert_eq!(new.fitness, Sphere.evaluate(&new.vars));
            if new.fitness < old.fitness {
                assert_eq!(new.age, 0);
            } else {
                assert_eq!(new.age, 7);
            }
        }
    }

    #[test]
    fn test_elitism_never_regresses() {
        let config = RunConfig::new(SearchSpace::new(5, -5.0, 5.0))
            .with_population_size(10)
            .with_seed(5);
        let algorithm = OptIa::new(
            OptIaConfig::default()
                .with_dup(2)
                .with_tau_b(1.0)
                .with_elitism(true),
        );
        let mut opt = Optimizer::new(algorithm, Sphere, config).unwrap();
        let mut best = opt
            .population()
            .iter()
            .map(|a| a.fitness)
            .fold(f64::INFINITY, f64::min);
        for _ in 0..40 {
            opt.advance_generation().unwrap();
            let current = opt
                .population()
                .iter()
                .map(|a| a.fitness)
                .fold(f64::INFINITY, f64::min);
            assert!(current <= best, "best regressed from {best} to {current}");
            best = current;
        }
    }

    #[test]
    fn test_converges_on_sphere() {
        let config = RunConfig::new(SearchSpace::new(3, -5.0, 5.0))
            .with_population_size(10)
            .with_max_generations(100)
            .with_seed(42);
        let algorithm = OptIa::new(
            OptIaConfig::default()
                .with_dup(2)
                .with_c(0.4)
                .with_elitism(true),
        );
        let mut opt = Optimizer::new(algorithm, Sphere, config).unwrap();
        let result = opt.run().unwrap();
        assert!(result.best_fitness < 0.5, "got {}", result.best_fitness);
    }

    #[test]
    fn test_deterministic_with_fixed_population() {
        let config = RunConfig::new(SearchSpace::new(3, -5.0, 5.0))
            .with_population_size(6)
            .with_seed(77);
        let initial: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64 - 2.5; 3]).collect();
        let algorithm = OptIa::new(OptIaConfig::default().with_dup(2).with_tau_b(3.0));
        let mut a =
            Optimizer::with_population(algorithm.clone(), Sphere, config.clone(), initial.clone())
                .unwrap();
        let mut b = Optimizer::with_population(algorithm, Sphere, config, initial).unwrap();
        for _ in 0..15 {
            a.advance_generation().unwrap();
            b.advance_generation().unwrap();
        }
        assert_eq!(a.population(), b.population());
    }

    proptest! {
        #[test]
        fn prop_optia_conserves_population_and_bounds(
            size in 2_usize..10,
            dim in 1_usize..4,
            dup in 1_usize..4,
            tau_b in 0.0_f64..3.0,
            elitism in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let space = SearchSpace::new(dim, -1.0, 2.0);
            let cfg = OptIaConfig::default()
                .with_dup(dup)
                .with_c(0.5)
                .with_tau_b(tau_b)
                .with_elitism(elitism);
            let run = RunConfig::new(space.clone()).with_population_size(size).with_seed(seed);
            let mut opt = Optimizer::new(OptIa::new(cfg), Sphere, run).unwrap();
            for _ in 0..4 {
                opt.advance_generation().unwrap();
                prop_assert_eq!(opt.population().len(), size);
                for ab in opt.population() {
                    prop_assert!(space.contains(&ab.vars));
                    prop_assert_eq!(ab.fitness, Sphere.evaluate(&ab.vars));
                }
            }
        }
    }
}
