//! Inversely proportional hypermutation for bounded real vectors.
//!
//! A single perturbation moves one coordinate by
//!
//! ```text
//! (1 - 2·r1) · 0.2 · (ubound - lbound) · 2^(-16·r2)
//! ```
//!
//! for fresh uniform draws `r1, r2 ∈ [0, 1)`, then clamps to the bounds. The
//! exponential term makes most steps tiny and a few steps large.
//!
//! How many coordinates are perturbed depends on a strength `k ≥ 1` derived
//! from the individual's rank: `M = ⌊(1 - 1/k)·c·dim + c·dim⌋`. Rank 0 gets
//! `k = 1` and therefore the fewest mutations; `M` approaches `2·c·dim` for
//! the worst ranks.
//!
//! None of these functions evaluate. Callers must re-evaluate the individual
//! after mutating it.
//!
//! # References
//!
//! - de Castro & Von Zuben (2002), "Learning and Optimization Using the Clonal
//!   Selection Principle"
//! - Cutello, Nicosia & Pavone (2004), "Exploring the capability of immune
//!   algorithms: a characterization of hypermutation operators"

use crate::space::SearchSpace;
use rand::Rng;

/// Fraction of the coordinate range used as the maximum step.
pub const MUTATION_SPREAD: f64 = 0.2;

/// Exponent scale of the `2^(-16·r)` step decay.
pub const STEP_DECAY: f64 = 16.0;

/// Strength `k` for the item at `position` when items come in groups of
/// `group_size` (an antibody followed by its clones).
///
/// `k = ⌊position / group_size⌋ + 1`.
#[inline]
pub fn rank_strength(position: usize, group_size: usize) -> usize {
    position / group_size.max(1) + 1
}

/// Number of coordinates to perturb for strength `k`.
///
/// `k = 0` is treated as `k = 1`.
///
/// # Examples
///
/// ```
/// use u_immune::operators::mutation::hypermutation_count;
///
/// // c·dim = 4: best rank mutates 4 coordinates, rank k=2 mutates 6
/// assert_eq!(hypermutation_count(1, 0.4, 10), 4);
/// assert_eq!(hypermutation_count(2, 0.4, 10), 6);
/// ```
pub fn hypermutation_count(k: usize, c: f64, dimension: usize) -> usize {
    let k = k.max(1) as f64;
    let base = c * dimension as f64;
    ((1.0 - 1.0 / k) * base + base) as usize
}

/// Returns a perturbed, clamped copy of one coordinate value.
///
/// Draws two uniform numbers: the step direction first, the decay second.
pub fn perturb<R: Rng>(value: f64, space: &SearchSpace, rng: &mut R) -> f64 {
    let direction = 1.0 - 2.0 * rng.random::<f64>();
    let decay = 2f64.powf(-STEP_DECAY * rng.random::<f64>());
    space.clamp(value + direction * MUTATION_SPREAD * space.range() * decay)
}

/// Perturbs `count` randomly chosen coordinates of `vars` in place.
///
/// Coordinates are drawn with replacement, so the same one may move twice.
pub fn hypermutate<R: Rng>(vars: &mut [f64], count: usize, space: &SearchSpace, rng: &mut R) {
    if vars.is_empty() {
        return;
    }
    for _ in 0..count {
        let idx = rng.random_range(0..vars.len());
        vars[idx] = perturb(vars[idx], space, rng);
    }
}
