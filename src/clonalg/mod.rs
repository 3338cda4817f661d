//! Clonal Selection Algorithm (CLONALG).
//!
//! Each generation runs the clonal pipeline:
//!
//! 1. **Cloning**: the `n` best antibodies are cloned, either a fixed
//!    `⌊beta·population_size⌋` times each or proportionally fewer for worse
//!    ranks ([`CloningVersion`]).
//! 2. **Hypermutation**: every member of the clone set, originals included,
//!    is mutated inversely to its rank and re-evaluated.
//! 3. **Selection**: [`SelectionScheme::Clonalg1`] keeps the best clones of
//!    each parent antibody; [`SelectionScheme::Clonalg2`] keeps the best
//!    `(1-d)·population_size` clones overall.
//! 4. **Birth**: random antibodies fill the population back to size.
//! 5. **Replacement**, followed by optional static pure **aging**
//!    (see [`ClonalgConfig::version0`]).
//!
//! # References
//!
//! - de Castro & Von Zuben (2002), "Learning and Optimization Using the Clonal
//!   Selection Principle", *IEEE Trans. Evol. Comput.* 6(3), 239–251
//! - Cutello, Nicosia & Pavone (2004), "Exploring the capability of immune
//!   algorithms: a characterization of hypermutation operators"

mod config;
mod runner;

pub use config::{ClonalgConfig, CloningVersion, SelectionScheme};
pub use runner::Clonalg;
