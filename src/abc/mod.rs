//! Artificial Bee Colony (ABC).
//!
//! The population is a set of food sources. Every generation runs three
//! phases in order:
//!
//! 1. **Employed bees**: each food source tries one neighbor-guided
//!    single-coordinate move ([`create_new_food_source`]).
//! 2. **Onlooker bees**: sources are revisited with a probability relative
//!    to the best fitness until `population_size` moves have been made.
//! 3. **Scout bees**: at most one exhausted source (trial counter above
//!    `limit`) is abandoned and replaced by a random one.
//!
//! # References
//!
//! - Karaboga (2005), "An idea based on honey bee swarm for numerical
//!   optimization", Technical Report TR06, Erciyes University
//! - Karaboga & Basturk (2007), "A powerful and efficient algorithm for
//!   numerical function optimization: artificial bee colony (ABC) algorithm"

mod config;
mod runner;

pub use config::AbcConfig;
pub use runner::{
    create_new_food_source, employed_bees_phase, onlooker_bees_phase, scout_bees_phase, Abc,
};
