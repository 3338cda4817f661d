//! Seeded random number generation.
//!
//! Every run draws from exactly one generator so that a fixed seed replays
//! the same sequence of phase decisions.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The generator type used by [`crate::engine::Optimizer`].
pub type RunRng = StdRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> RunRng {
    StdRng::seed_from_u64(seed)
}
