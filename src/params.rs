//! String-keyed parameter registry.
//!
//! Hosts that configure runs from text (command lines, config files, job
//! descriptions) collect `key = value` pairs into a [`ParameterSet`] and
//! build typed configurations from it. Every lookup either falls back to the
//! documented default or fails with [`Error::InvalidParameter`] naming the key.
//!
//! | Key | Type | Default |
//! |-----|------|---------|
//! | `algorithm` | `ABC` \| `CLONALG` \| `optIA` | required |
//! | `dimension` | integer | required |
//! | `lbound`, `ubound` | real | required |
//! | `direction` | `minimize` \| `maximize` | `minimize` |
//! | `population.size` | integer | 100 |
//! | `max_generations` | integer | 500 |
//! | `stagnation_limit` | integer | 0 |
//! | `seed` | integer | random |
//! | `time_limit_ms` | integer | none |
//!
//! Algorithm keys: ABC reads `limit`; CLONALG reads `n`, `beta`, `c`, `d`,
//! `cloningVersion`, `selectionScheme`, `clonesPerParent`, `tauB` and
//! `elitism`; optIA reads `dup`, `c`, `tauB` and `elitism`.

use crate::abc::{Abc, AbcConfig};
use crate::clonalg::{Clonalg, ClonalgConfig};
use crate::engine::{Algorithm, RunConfig};
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::optia::{OptIa, OptIaConfig};
use crate::problem::{Evaluator, Objective};
use crate::space::{Direction, SearchSpace};
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// An ordered set of named string parameters.
///
/// # Examples
///
/// ```
/// use u_immune::params::{AlgorithmKind, ParameterSet};
///
/// let params = ParameterSet::new()
///     .with("algorithm", "CLONALG")
///     .with("selectionScheme", "CLONALG1")
///     .with("n", "5")
///     .with("dimension", "4")
///     .with("lbound", "-5")
///     .with("ubound", "5")
///     .with("population.size", "20");
///
/// let run = params.run_config().unwrap();
/// assert_eq!(run.population_size, 20);
/// let algorithm = AlgorithmKind::from_params(&params).unwrap();
/// assert!(matches!(algorithm, AlgorithmKind::Clonalg(_)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParameterSet {
    values: BTreeMap<String, String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses `key` if present.
    pub fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.raw(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| Error::invalid(key, format!("cannot parse '{raw}': {e}"))),
        }
    }

    /// Parses `key`, or returns `default` when absent.
    pub fn get_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Parses `key`, failing when absent.
    pub fn require<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get(key)?
            .ok_or_else(|| Error::invalid(key, "is required"))
    }

    /// Builds the search space from `dimension`, `lbound`, `ubound` and
    /// `direction`.
    pub fn search_space(&self) -> Result<SearchSpace> {
        let space = SearchSpace::new(
            self.require("dimension")?,
            self.require("lbound")?,
            self.require("ubound")?,
        )
        .with_direction(self.get_or("direction", Direction::Minimize)?);
        space.validate()?;
        Ok(space)
    }

    /// Builds the run configuration, search space included.
    pub fn run_config(&self) -> Result<RunConfig> {
        let defaults = RunConfig::new(self.search_space()?);
        let config = RunConfig {
            population_size: self.get_or("population.size", defaults.population_size)?,
            max_generations: self.get_or("max_generations", defaults.max_generations)?,
            stagnation_limit: self.get_or("stagnation_limit", defaults.stagnation_limit)?,
            seed: self.get("seed")?,
            time_limit_ms: self.get("time_limit_ms")?,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

impl AbcConfig {
    /// Reads `limit`.
    pub fn from_params(params: &ParameterSet) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            limit: params.get_or("limit", defaults.limit)?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl ClonalgConfig {
    /// Reads the CLONALG keys on top of [`ClonalgConfig::default`].
    ///
    /// Setting `tauB` enables aging.
    pub fn from_params(params: &ParameterSet) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            n: params.get_or("n", defaults.n)?,
            beta: params.get_or("beta", defaults.beta)?,
            c: params.get_or("c", defaults.c)?,
            d: params.get_or("d", defaults.d)?,
            cloning: params.get_or("cloningVersion", defaults.cloning)?,
            selection: params.get_or("selectionScheme", defaults.selection)?,
            clones_per_parent: params.get_or("clonesPerParent", defaults.clones_per_parent)?,
            tau_b: params.get("tauB")?,
            elitism: params.get_or("elitism", defaults.elitism)?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl OptIaConfig {
    /// Reads `dup`, `c`, `tauB` and `elitism`.
    pub fn from_params(params: &ParameterSet) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            dup: params.get_or("dup", defaults.dup)?,
            c: params.get_or("c", defaults.c)?,
            tau_b: params.get_or("tauB", defaults.tau_b)?,
            elitism: params.get_or("elitism", defaults.elitism)?,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Any of the crate's algorithms, chosen at run time.
#[derive(Debug, Clone)]
pub enum AlgorithmKind {
    Abc(Abc),
    Clonalg(Clonalg),
    OptIa(OptIa),
}

impl AlgorithmKind {
    /// Selects and configures the algorithm named by the `algorithm` key.
    ///
    /// Names are matched case-insensitively.
    pub fn from_params(params: &ParameterSet) -> Result<Self> {
        let name: String = params.require("algorithm")?;
        match name.to_ascii_lowercase().as_str() {
            "abc" => Ok(Self::Abc(Abc::new(AbcConfig::from_params(params)?))),
            "clonalg" => Ok(Self::Clonalg(Clonalg::new(ClonalgConfig::from_params(params)?))),
            "optia" | "opt-ia" => Ok(Self::OptIa(OptIa::new(OptIaConfig::from_params(params)?))),
            _ => Err(Error::invalid(
                "algorithm",
                format!("unknown algorithm '{name}', expected ABC, CLONALG or optIA"),
            )),
        }
    }
}

impl From<Abc> for AlgorithmKind {
    fn from(a: Abc) -> Self {
        Self::Abc(a)
    }
}

impl From<Clonalg> for AlgorithmKind {
    fn from(a: Clonalg) -> Self {
        Self::Clonalg(a)
    }
}

impl From<OptIa> for AlgorithmKind {
    fn from(a: OptIa) -> Self {
        Self::OptIa(a)
    }
}

impl Algorithm for AlgorithmKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Abc(a) => a.name(),
            Self::Clonalg(a) => a.name(),
            Self::OptIa(a) => a.name(),
        }
    }

    fn initialize(&self, population: &mut [Individual], run: &RunConfig) -> Result<()> {
        match self {
            Self::Abc(a) => a.initialize(population, run),
            Self::Clonalg(a) => a.initialize(population, run),
            Self::OptIa(a) => a.initialize(population, run),
        }
    }

    fn advance_generation<O: Objective + ?Sized, R: Rng>(
        &self,
        population: &mut Vec<Individual>,
        evaluator: &mut Evaluator<'_, O>,
        rng: &mut R,
    ) -> Result<()> {
        match self {
            Self::Abc(a) => a.advance_generation(population, evaluator, rng),
            Self::Clonalg(a) => a.advance_generation(population, evaluator, rng),
            Self::OptIa(a) => a.advance_generation(population, evaluator, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clonalg::{CloningVersion, SelectionScheme};
    use crate::engine::Optimizer;

    struct Sphere;

    impl Objective for Sphere {
        fn evaluate(&self, x: &[f64]) -> f64 {
            x.iter().map(|v| v * v).sum()
        }
    }

    fn base() -> ParameterSet {
        [("dimension", "3"), ("lbound", "-5.12"), ("ubound", "5.12")]
            .into_iter()
            .collect()
    }

    fn param_name<T: std::fmt::Debug>(result: Result<T>) -> String {
        match result {
            Err(Error::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_lookup() {
        let params = ParameterSet::new().with("n", " 7 ").with("beta", "abc");
        assert_eq!(params.get::<usize>("n").unwrap(), Some(7));
        assert_eq!(params.get::<usize>("missing").unwrap(), None);
        assert_eq!(params.get_or("missing", 3.5).unwrap(), 3.5);
        assert_eq!(param_name(params.get::<f64>("beta")), "beta");
        assert_eq!(param_name(params.require::<u64>("seed")), "seed");
    }

    #[test]
    fn test_set_replaces() {
        let mut params = ParameterSet::new();
        params.set("dup", "3");
        params.set("dup", "4");
        assert_eq!(params.len(), 1);
        assert_eq!(params.raw("dup"), Some("4"));
        assert!(params.contains("dup"));
        assert!(!ParameterSet::new().contains("dup"));
        assert!(ParameterSet::new().is_empty());
    }

    #[test]
    fn test_run_config_defaults() {
        let config = base().run_config().unwrap();
        assert_eq!(config.space.dimension, 3);
        assert_eq!(config.space.lbound, -5.12);
        assert_eq!(config.space.ubound, 5.12);
        assert_eq!(config.space.direction, Direction::Minimize);
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_run_config_overrides() {
        let config = base()
            .with("direction", "maximize")
            .with("population.size", "30")
            .with("max_generations", "12")
            .with("stagnation_limit", "4")
            .with("seed", "9")
            .with("time_limit_ms", "1000")
            .run_config()
            .unwrap();
        assert_eq!(config.space.direction, Direction::Maximize);
        assert_eq!(config.population_size, 30);
        assert_eq!(config.max_generations, 12);
        assert_eq!(config.stagnation_limit, 4);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.time_limit_ms, Some(1000));
    }

    #[test]
    fn test_run_config_errors_name_the_key() {
        assert_eq!(param_name(ParameterSet::new().run_config()), "dimension");
        assert_eq!(param_name(base().with("ubound", "-6").run_config()), "ubound");
        assert_eq!(param_name(base().with("population.size", "1").run_config()), "population.size");
        assert_eq!(param_name(base().with("direction", "sideways").run_config()), "direction");
    }

    #[test]
    fn test_clonalg_from_params() {
        let config = ClonalgConfig::from_params(
            &ParameterSet::new()
                .with("n", "10")
                .with("beta", "0.5")
                .with("cloningVersion", "proportional")
                .with("selectionScheme", "CLONALG1")
                .with("clonesPerParent", "2")
                .with("tauB", "20")
                .with("elitism", "true"),
        )
        .unwrap();
        assert_eq!(config.n, 10);
        assert_eq!(config.beta, 0.5);
        assert_eq!(config.cloning, CloningVersion::Proportional);
        assert_eq!(config.selection, SelectionScheme::Clonalg1);
        assert_eq!(config.clones_per_parent, 2);
        assert_eq!(config.tau_b, Some(20.0));
        assert!(config.elitism);

        assert_eq!(
            ClonalgConfig::from_params(&ParameterSet::new()).unwrap(),
            ClonalgConfig::default()
        );
        let bad_cloning = ParameterSet::new().with("cloningVersion", "dynamic");
        assert_eq!(
            param_name(ClonalgConfig::from_params(&bad_cloning)),
            "cloningVersion"
        );
        assert_eq!(
            param_name(ClonalgConfig::from_params(&ParameterSet::new().with("d", "2"))),
            "d"
        );
    }

    #[test]
    fn test_optia_from_params() {
        let config = OptIaConfig::from_params(
            &ParameterSet::new().with("dup", "3").with("tauB", "0").with("elitism", "true"),
        )
        .unwrap();
        assert_eq!(config, OptIaConfig::default().with_dup(3).with_tau_b(0.0).with_elitism(true));
        assert_eq!(
            param_name(OptIaConfig::from_params(&ParameterSet::new().with("elitism", "yes"))),
            "elitism"
        );
        assert_eq!(
            param_name(OptIaConfig::from_params(&ParameterSet::new().with("dup", "0"))),
            "dup"
        );
    }

    #[test]
    fn test_abc_from_params() {
        let config = AbcConfig::from_params(&ParameterSet::new().with("limit", "25")).unwrap();
        assert_eq!(config.limit, 25);
        assert_eq!(
            param_name(AbcConfig::from_params(&ParameterSet::new().with("limit", "-1"))),
            "limit"
        );
    }

    #[test]
    fn test_algorithm_kind_selection() {
        let abc = AlgorithmKind::from_params(&base().with("algorithm", "ABC")).unwrap();
        assert_eq!(abc.name(), "ABC");
        let optia = AlgorithmKind::from_params(&base().with("algorithm", "optIA")).unwrap();
        assert_eq!(optia.name(), "optIA");
        let clonalg = AlgorithmKind::from_params(
            &base()
                .with("algorithm", "clonalg")
                .with("selectionScheme", "CLONALG1"),
        )
        .unwrap();
        assert_eq!(clonalg.name(), "CLONALG1");

        assert_eq!(param_name(AlgorithmKind::from_params(&base())), "algorithm");
        assert_eq!(
            param_name(AlgorithmKind::from_params(&base().with("algorithm", "PSO"))),
            "algorithm"
        );
    }

    #[test]
    fn test_run_from_params() {
        for name in ["ABC", "CLONALG", "optIA"] {
            let params = base()
                .with("algorithm", name)
                .with("population.size", "10")
                .with("max_generations", "5")
                .with("seed", "1")
                .with("n", "4")
                .with("dup", "2");
            let algorithm = AlgorithmKind::from_params(&params).unwrap();
            let mut opt = Optimizer::new(algorithm, Sphere, params.run_config().unwrap()).unwrap();
            let result = opt.run().unwrap();
            assert_eq!(result.generations, 5, "{name}");
            assert_eq!(opt.population().len(), 10, "{name}");
        }
    }

    #[test]
    fn test_clonalg_n_checked_against_population() {
        let params = base()
            .with("algorithm", "CLONALG")
            .with("population.size", "10")
            .with("n", "11");
        let algorithm = AlgorithmKind::from_params(&params).unwrap();
        let result = Optimizer::new(algorithm, Sphere, params.run_config().unwrap());
        assert_eq!(param_name(result.map(|_| ())), "n");
    }
}
