//! Generational driver shared by every algorithm.
//!
//! An algorithm implements [`Algorithm`]: a one-time [`initialize`] that
//! validates its parameters against the run and prepares the auxiliary tags,
//! and an [`advance_generation`] that runs its phase pipeline once. The
//! [`Optimizer`] owns the population, the objective and the single seeded
//! generator, and calls the pipeline once per generation.
//!
//! # Key Types
//!
//! - [`RunConfig`]: search space, population size, termination
//! - [`Optimizer`]: initialization, per-generation stepping, the run loop
//! - [`RunResult`]: best solution and run statistics
//!
//! [`initialize`]: Algorithm::initialize
//! [`advance_generation`]: Algorithm::advance_generation

mod config;
mod runner;
mod types;

pub use config::RunConfig;
pub use runner::{Optimizer, RunResult};
pub use types::Algorithm;
