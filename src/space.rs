//! The bounded real-valued search space and optimization direction.

use crate::error::{Error, Result};
use rand::Rng;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Whether lower or higher fitness values are better.
///
/// Fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Lower fitness is better.
    #[default]
    Minimize,
    /// Higher fitness is better.
    Maximize,
}

impl Direction {
    /// Returns `true` if `a` is strictly better than `b`.
    #[inline]
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Minimize => a < b,
            Direction::Maximize => a > b,
        }
    }

    /// Orders two fitness values best-first.
    ///
    /// Incomparable values compare as equal, which keeps stable sorts stable.
    #[inline]
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Direction::Minimize => ord,
            Direction::Maximize => ord.reverse(),
        }
    }

    /// The worst representable fitness for this direction.
    pub fn worst(self) -> f64 {
        match self {
            Direction::Minimize => f64::INFINITY,
            Direction::Maximize => f64::NEG_INFINITY,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Minimize => f.write_str("minimize"),
            Direction::Maximize => f.write_str("maximize"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minimize" | "min" => Ok(Direction::Minimize),
            "maximize" | "max" => Ok(Direction::Maximize),
            other => Err(Error::invalid(
                "direction",
                format!("expected 'minimize' or 'maximize', got '{other}'"),
            )),
        }
    }
}

/// A fixed-dimension box `[lbound, ubound]^dimension`.
///
/// # Examples
///
/// ```
/// use u_immune::{Direction, SearchSpace};
///
/// let space = SearchSpace::new(10, -5.0, 5.0).with_direction(Direction::Maximize);
/// assert_eq!(space.range(), 10.0);
/// assert!(space.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSpace {
    /// Number of real coordinates per individual.
    pub dimension: usize,

    /// Lower bound applied to every coordinate.
    pub lbound: f64,

    /// Upper bound applied to every coordinate.
    pub ubound: f64,

    /// Optimization direction.
    pub direction: Direction,
}

impl SearchSpace {
    /// Creates a minimization space.
    pub fn new(dimension: usize, lbound: f64, ubound: f64) -> Self {
        Self {
            dimension,
            lbound,
            ubound,
            direction: Direction::Minimize,
        }
    }

    /// Sets the optimization direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Width of the coordinate interval, `ubound - lbound`.
    #[inline]
    pub fn range(&self) -> f64 {
        self.ubound - self.lbound
    }

    /// Clamps a coordinate value into `[lbound, ubound]`.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value > self.ubound {
            self.ubound
        } else if value < self.lbound {
            self.lbound
        } else {
            value
        }
    }

    /// Returns `true` if every coordinate lies within the bounds.
    pub fn contains(&self, vars: &[f64]) -> bool {
        vars.len() == self.dimension
            && vars.iter().all(|&x| x >= self.lbound && x <= self.ubound)
    }

    /// Draws a vector uniformly from the box.
    pub fn random_vector<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        (0..self.dimension)
            .map(|_| self.clamp(self.lbound + rng.random::<f64>() * self.range()))
            .collect()
    }

    /// Validates the space.
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(Error::invalid("dimension", "must be at least 1"));
        }
        if !self.lbound.is_finite() {
            return Err(Error::invalid("lbound", "must be finite"));
        }
        if !self.ubound.is_finite() {
            return Err(Error::invalid("ubound", "must be finite"));
        }
        if self.lbound >= self.ubound {
            return Err(Error::invalid(
                "ubound",
                format!("must be greater than lbound ({})", self.lbound),
            ));
        }
        Ok(())
    }
}
