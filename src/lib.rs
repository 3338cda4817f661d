//! Population-based immune and swarm optimizers for bounded continuous
//! search spaces.
//!
//! Provides generational implementations of:
//!
//! - **Artificial Bee Colony (ABC)**: employed, onlooker and scout bee phases
//!   over a population of food sources.
//! - **CLONALG**: clonal selection with rank-scaled hypermutation, in the
//!   CLONALG1 (best clone per parent) and CLONALG2 (best clones overall)
//!   selection schemes, plus an aging variant.
//! - **opt-IA**: fitness-independent cloning, hypermutation and static pure
//!   aging with optional elitism.
//!
//! Every algorithm minimizes or maximizes a black-box [`Objective`] over a
//! [`SearchSpace`] of `dimension` real coordinates sharing one bound pair.
//! The [`Optimizer`] owns the population and runs generations until a
//! stopping condition from [`RunConfig`] is met.
//!
//! # Architecture
//!
//! Algorithms implement [`Algorithm`], a phase pipeline that transforms the
//! population in place. Shared building blocks (hypermutation, fitness
//! ordering, acceptance probabilities) live in [`operators`]. The driver
//! checks that a generation never changes the population size and tracks
//! the best individual ever seen. Runs are reproducible given a seed.

pub mod abc;
pub mod clonalg;
pub mod engine;
pub mod error;
pub mod individual;
pub mod operators;
pub mod optia;
pub mod params;
pub mod problem;
pub mod random;
pub mod space;

pub use engine::{Algorithm, Optimizer, RunConfig, RunResult};
pub use error::{Error, Result};
pub use individual::Individual;
pub use problem::{Evaluator, Objective};
pub use space::{Direction, SearchSpace};
