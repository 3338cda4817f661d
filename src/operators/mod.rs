//! Variation and selection operators over real-vector populations.
//!
//! - [`mutation`]: bounded coordinate perturbation and rank-scaled hypermutation
//! - [`selection`]: neighbor picking, best-of, fitness-proportional probabilities
//!   and the best-first stable sort the clonal algorithms rely on

pub mod mutation;
pub mod selection;
