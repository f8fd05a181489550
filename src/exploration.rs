//! Configuration of a batch exploration and dispatch to the sampling methods
use crate::errors::{Result, SamplingError};
use crate::exhaustive::Exhaustive;
use crate::factorial::Factorial;
use crate::lhs::{Lhs, LhsKind, DEFAULT_LHS_ITERATIONS};
use crate::morris::{Morris, DEFAULT_MORRIS_LEVELS};
use crate::random::Random;
use crate::saltelli::Saltelli;
use crate::{DesignPoint, ParameterDimension, SamplingMethod};
use log::info;
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default number of samples of a stochastic exploration
pub const DEFAULT_SAMPLE_SIZE: usize = 132;

/// Number of levels of the dimensions missing from the configured factorial levels
pub const DEFAULT_FACTORIAL_LEVELS: usize = 11;

/// Methods available to explore a parameter space
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum ExplorationMethod {
    /// Every combination of the swept values of the dimensions
    #[default]
    Exhaustive,
    /// Independent uniform draws
    Uniform,
    /// Combinations of levels drawn per dimension
    Factorial,
    /// Latin hypercube design
    LatinHypercube,
    /// Latin hypercube design with the least correlated dimensions among several draws
    Orthogonal,
    /// Morris trajectories, the sample size being the number of trajectories
    Morris,
    /// Saltelli design, the sample size being the number of base samples
    Saltelli,
}

impl FromStr for ExplorationMethod {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "exhaustive" => Ok(ExplorationMethod::Exhaustive),
            "uniform" => Ok(ExplorationMethod::Uniform),
            "factorial" => Ok(ExplorationMethod::Factorial),
            "latinhypercube" => Ok(ExplorationMethod::LatinHypercube),
            "orthogonal" => Ok(ExplorationMethod::Orthogonal),
            "morris" => Ok(ExplorationMethod::Morris),
            "saltelli" => Ok(ExplorationMethod::Saltelli),
            _ => Err(SamplingError::InvalidArgument(format!(
                "unknown exploration method '{s}'"
            ))),
        }
    }
}

impl fmt::Display for ExplorationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExplorationMethod::Exhaustive => "exhaustive",
            ExplorationMethod::Uniform => "uniform",
            ExplorationMethod::Factorial => "factorial",
            ExplorationMethod::LatinHypercube => "latinhypercube",
            ExplorationMethod::Orthogonal => "orthogonal",
            ExplorationMethod::Morris => "morris",
            ExplorationMethod::Saltelli => "saltelli",
        };
        write!(f, "{name}")
    }
}

/// Parameters of an exploration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct ExplorationConfig {
    method: ExplorationMethod,
    sample_size: usize,
    levels: usize,
    iterations: usize,
    factorial: Option<Vec<usize>>,
    seed: Option<u64>,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        ExplorationConfig {
            method: ExplorationMethod::default(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            levels: DEFAULT_MORRIS_LEVELS,
            iterations: DEFAULT_LHS_ITERATIONS,
            factorial: None,
            seed: None,
        }
    }
}

impl ExplorationConfig {
    /// Default configuration for the given method
    pub fn new(method: ExplorationMethod) -> Self {
        ExplorationConfig {
            method,
            ..Default::default()
        }
    }

    /// Sets the exploration method
    pub fn method(mut self, method: ExplorationMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the number of samples (trajectories for Morris, base samples for Saltelli)
    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Sets the number of grid levels of Morris method
    pub fn levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    /// Sets the number of candidate designs of orthogonal sampling
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the number of levels per dimension of the factorial design,
    /// the sample size is used to derive them otherwise.
    ///
    /// Missing levels default to [DEFAULT_FACTORIAL_LEVELS], extra levels are ignored.
    pub fn factorial(mut self, levels: Vec<usize>) -> Self {
        self.factorial = Some(levels);
        self
    }

    /// Sets the seed of the random generator
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Exploration method
    pub fn get_method(&self) -> ExplorationMethod {
        self.method
    }

    /// Number of samples
    pub fn get_sample_size(&self) -> usize {
        self.sample_size
    }

    /// Number of Morris grid levels
    pub fn get_levels(&self) -> usize {
        self.levels
    }

    /// Number of candidate designs of orthogonal sampling
    pub fn get_iterations(&self) -> usize {
        self.iterations
    }

    /// Factorial levels per dimension if any
    pub fn get_factorial(&self) -> Option<&[usize]> {
        self.factorial.as_deref()
    }

    /// Random generator seed if any
    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Generates the design points of the exploration described by `config`.
///
/// The random generator is seeded with the configured seed if any, from entropy otherwise.
///
/// ```
/// use batch_doe::{explore, ExplorationConfig, ExplorationMethod, ParameterDimension};
///
/// let dims = [ParameterDimension::float("x", 0., 1.), ParameterDimension::boolean("b")];
/// let config = ExplorationConfig::new(ExplorationMethod::LatinHypercube)
///     .sample_size(10)
///     .seed(42);
/// assert_eq!(explore(&config, &dims).unwrap().len(), 10);
/// ```
pub fn explore(config: &ExplorationConfig, dims: &[ParameterDimension]) -> Result<Vec<DesignPoint>> {
    let rng = match config.seed {
        Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
        None => Xoshiro256Plus::from_entropy(),
    };
    explore_with_rng(config, dims, rng)
}

/// Generates the design points of the exploration described by `config`
/// using the given random generator, the configured seed being ignored.
pub fn explore_with_rng<R: Rng>(
    config: &ExplorationConfig,
    dims: &[ParameterDimension],
    rng: R,
) -> Result<Vec<DesignPoint>> {
    info!(
        "{} exploration of {} dimensions (sample size {})",
        config.method,
        dims.len(),
        config.sample_size
    );
    let ns = config.sample_size;
    match config.method {
        ExplorationMethod::Exhaustive => Exhaustive::new(dims).sample(),
        ExplorationMethod::Uniform => Random::new_with_rng(dims, rng).sample(ns),
        ExplorationMethod::Factorial => {
            let factorial = Factorial::new_with_rng(dims, rng);
            match &config.factorial {
                Some(levels) => {
                    let mut levels = levels.clone();
                    levels.resize(dims.len(), DEFAULT_FACTORIAL_LEVELS);
                    factorial.sample_levels(&levels)
                }
                None => factorial.sample(ns),
            }
        }
        ExplorationMethod::LatinHypercube => Lhs::new_with_rng(dims, rng).sample(ns),
        ExplorationMethod::Orthogonal => Lhs::new_with_rng(dims, rng)
            .kind(LhsKind::Orthogonal)
            .iterations(config.iterations)
            .sample(ns),
        ExplorationMethod::Morris => Morris::new_with_rng(dims, rng)
            .levels(config.levels)
            .sample(ns),
        ExplorationMethod::Saltelli => Saltelli::new_with_rng(dims, rng).sample(ns),
    }
}
