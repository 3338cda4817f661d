//! CLONALG configuration.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// How many clones each selected antibody receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CloningVersion {
    /// Every selected antibody gets `⌊beta·population_size⌋` clones.
    #[default]
    Static,

    /// The antibody at rank `i` gets `⌊beta·population_size⌋ / (i + 1)` clones.
    Proportional,
}

impl fmt::Display for CloningVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloningVersion::Static => f.write_str("static"),
            CloningVersion::Proportional => f.write_str("proportional"),
        }
    }
}

impl FromStr for CloningVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "static" => Ok(CloningVersion::Static),
            "proportional" => Ok(CloningVersion::Proportional),
            other => Err(Error::invalid(
                "cloningVersion",
                format!("expected 'static' or 'proportional', got '{other}'"),
            )),
        }
    }
}

/// How the next generation is chosen from the clone set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionScheme {
    /// Per parent antibody, in increasing parent order, keep its best
    /// `clones_per_parent` clones, up to `(1-d)·population_size` in total.
    #[cfg_attr(feature = "serde", serde(rename = "CLONALG1"))]
    Clonalg1,

    /// Keep the best `(1-d)·population_size` clones overall.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "CLONALG2"))]
    Clonalg2,
}

impl fmt::Display for SelectionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionScheme::Clonalg1 => f.write_str("CLONALG1"),
            SelectionScheme::Clonalg2 => f.write_str("CLONALG2"),
        }
    }
}

impl FromStr for SelectionScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CLONALG1" => Ok(SelectionScheme::Clonalg1),
            "CLONALG2" => Ok(SelectionScheme::Clonalg2),
            other => Err(Error::invalid(
                "selectionScheme",
                format!("expected 'CLONALG1' or 'CLONALG2', got '{other}'"),
            )),
        }
    }
}

/// Configuration for CLONALG.
///
/// # Examples
///
/// ```
/// use u_immune::clonalg::{ClonalgConfig, CloningVersion, SelectionScheme};
///
/// let config = ClonalgConfig::default()
///     .with_n(10)
///     .with_beta(0.5)
///     .with_cloning(CloningVersion::Proportional)
///     .with_selection(SelectionScheme::Clonalg1);
/// assert!(config.validate_for(20).is_ok());
/// assert!(config.validate_for(5).is_err()); // n > population size
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClonalgConfig {
    /// Number of best antibodies cloned every generation, in `[1, population_size]`.
    pub n: usize,

    /// Clone multiplier: each selected antibody gets `⌊beta·population_size⌋`
    /// clones under static cloning. Must be positive.
    pub beta: f64,

    /// Mutation intensity: rank-1 antibodies get `⌊c·dimension⌋` mutations.
    /// Must be positive.
    pub c: f64,

    /// Fraction of the population replaced by newborn antibodies, in `[0, 1]`.
    pub d: f64,

    pub cloning: CloningVersion,

    pub selection: SelectionScheme,

    /// Clones kept per parent antibody under [`SelectionScheme::Clonalg1`].
    pub clones_per_parent: usize,

    /// Static pure aging threshold. When set, antibodies older than `tau_b`
    /// generations are replaced by random ones after each generation.
    pub tau_b: Option<f64>,

    /// Exempts the current best antibody from aging replacement.
    pub elitism: bool,
}

impl Default for ClonalgConfig {
    fn default() -> Self {
        Self {
            n: 50,
            beta: 0.1,
            c: 0.8,
            d: 0.0,
            cloning: CloningVersion::Static,
            selection: SelectionScheme::Clonalg2,
            clones_per_parent: 1,
            tau_b: None,
            elitism: false,
        }
    }
}

impl ClonalgConfig {
    /// CLONALG1: each antibody is succeeded by the best of its own clones.
    pub fn clonalg1() -> Self {
        Self {
            selection: SelectionScheme::Clonalg1,
            ..Self::default()
        }
    }

    /// CLONALG2: the best clones overall survive, the rest are newborn.
    pub fn clonalg2() -> Self {
        Self::default()
    }

    /// CLONALG2 with static cloning and static pure aging.
    ///
    /// - n: 10, beta: 0.1, c: 0.3, d: 0.0, tau_b: 20
    pub fn version0() -> Self {
        Self {
            n: 10,
            c: 0.3,
            tau_b: Some(20.0),
            ..Self::default()
        }
    }

    /// Sets the number of antibodies cloned per generation.
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    /// Sets the clone multiplier.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the mutation intensity.
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Sets the fraction of newborns per generation.
    pub fn with_d(mut self, d: f64) -> Self {
        self.d = d;
        self
    }

    /// Sets the cloning version.
    pub fn with_cloning(mut self, cloning: CloningVersion) -> Self {
        self.cloning = cloning;
        self
    }

    /// Sets the selection scheme.
    pub fn with_selection(mut self, selection: SelectionScheme) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the clones kept per parent under CLONALG1.
    pub fn with_clones_per_parent(mut self, k: usize) -> Self {
        self.clones_per_parent = k;
        self
    }

    /// Enables static pure aging with threshold `tau_b`.
    pub fn with_aging(mut self, tau_b: f64) -> Self {
        self.tau_b = Some(tau_b);
        self
    }

    /// Sets whether the best antibody is exempt from aging.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Number of clones per antibody under static cloning.
    pub fn clones_per_antibody(&self, population_size: usize) -> usize {
        (self.beta * population_size as f64) as usize
    }

    /// Number of clones that survive selection, `⌊(1-d)·population_size⌋`.
    pub fn survivors(&self, population_size: usize) -> usize {
        ((1.0 - self.d) * population_size as f64) as usize
    }

    /// Validates the parameters that do not depend on the population size.
    pub fn validate(&self) -> Result<()> {
        if self.n < 1 {
            return Err(Error::invalid("n", "must be at least 1"));
        }
        if !(self.beta > 0.0 && self.beta.is_finite()) {
            return Err(Error::invalid("beta", "must be finite and greater than 0"));
        }
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(Error::invalid("c", "must be finite and greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.d) {
            return Err(Error::invalid("d", "must be in range [0, 1]"));
        }
        if self.clones_per_parent < 1 {
            return Err(Error::invalid("clonesPerParent", "must be at least 1"));
        }
        if let Some(tau_b) = self.tau_b {
            if !(tau_b >= 0.0) {
                return Err(Error::invalid("tauB", "must be non-negative"));
            }
        }
        Ok(())
    }

    /// Validates everything, including `n <= population_size`.
    pub fn validate_for(&self, population_size: usize) -> Result<()> {
        self.validate()?;
        if self.n > population_size {
            return Err(Error::invalid(
                "n",
                format!("must be in range [1, population.size = {population_size}]"),
            ));
        }
        Ok(())
    }
}
