//! opt-IA configuration.

use crate::error::{Error, Result};

/// Configuration for opt-IA.
///
/// # Examples
///
/// ```
/// use u_immune::optia::OptIaConfig;
///
/// let config = OptIaConfig::default().with_dup(2).with_tau_b(15.0).with_elitism(true);
/// assert!(config.validate().is_ok());
/// assert!(config.clone().with_dup(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptIaConfig {
    /// Clones per antibody. The clone set holds `(dup + 1)·population_size`
    /// antibodies.
    pub dup: usize,

    /// Mutation intensity: rank-1 antibodies get `⌊c·dimension⌋` mutations.
    pub c: f64,

    /// Maximum age. Clones older than `tau_b` generations are dropped.
    pub tau_b: f64,

    /// Keeps one elite antibody through aging regardless of its age.
    pub elitism: bool,
}

impl Default for OptIaConfig {
    fn default() -> Self {
        Self {
            dup: 10,
            c: 0.2,
            tau_b: 100.0,
            elitism: false,
        }
    }
}

impl OptIaConfig {
    /// Sets the number of clones per antibody.
    pub fn with_dup(mut self, dup: usize) -> Self {
        self.dup = dup;
        self
    }

    /// Sets the mutation intensity.
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Sets the maximum antibody age.
    pub fn with_tau_b(mut self, tau_b: f64) -> Self {
        self.tau_b = tau_b;
        self
    }

    /// Sets whether one elite survives aging.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.dup < 1 {
            return Err(Error::invalid("dup", "must be an integer greater than 0"));
        }
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(Error::invalid("c", "must be finite and greater than 0"));
        }
        if !(self.tau_b >= 0.0) {
            return Err(Error::invalid("tauB", "must be non-negative"));
        }
        Ok(())
    }
}
