//! Optimization Immune Algorithm (opt-IA).
//!
//! Unlike CLONALG, cloning ignores fitness: every antibody is copied `dup`
//! times. A generation then runs:
//!
//! 1. **Hypermutation** of the whole clone set, inversely to rank.
//! 2. **Aging**: every clone ages by one generation and clones older than
//!    `tau_b` are dropped. With elitism, one elite survives regardless.
//! 3. **Selection**: the best `population_size` survivors are kept.
//! 4. **Birth** of random antibodies to refill the population.
//!
//! # References
//!
//! - Cutello, Nicosia & Pavone (2004), "An immune algorithm with
//!   hyper-macromutations for the Dill's 2D hydrophobic-hydrophilic model"
//! - Cutello, Narzisi, Nicosia & Pavone (2005), "Clonal selection algorithms:
//!   a comparative case study using effective mutation potentials"

mod config;
mod runner;

pub use config::OptIaConfig;
pub use runner::OptIa;
