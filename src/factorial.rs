use crate::errors::{Result, SamplingError};
use crate::scaler::{scale_rows, validate_dimensions};
use crate::utils::{cartesian_product, check_not_empty, check_sample_size, lock, rng_ref, RngRef};
use crate::{DesignPoint, ParameterDimension, SamplingMethod};
use log::{debug, info};
use ndarray::Array2;
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Kinds of levels used by the factorial design
#[derive(Clone, Debug, Default, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum FactorialKind {
    /// levels are drawn uniformly at random within each dimension
    #[default]
    Random,
    /// levels are evenly spaced from lower to upper bound
    Regular,
}

/// The Factorial design consists of all possible combinations
/// of levels for all components within the parameter space.
///
/// The first dimension varies slowest in the resulting design.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Factorial<R: Rng> {
    /// Parameter space definition
    dims: Vec<ParameterDimension>,
    /// How levels are chosen
    kind: FactorialKind,
    /// Random generator used for reproducibility (not used in case of Regular levels)
    rng: RngRef<R>,
}

impl Factorial<Xoshiro256Plus> {
    /// Constructor given the dimensions of the parameter space
    ///
    /// ```
    /// use batch_doe::{Factorial, ParameterDimension};
    ///
    /// let dims = [ParameterDimension::float("x", 0., 1.), ParameterDimension::int("n", 1, 9)];
    /// let doe = Factorial::new(&dims).sample_levels(&[3, 4]).unwrap();
    /// assert_eq!(doe.len(), 12);
    /// ```
    pub fn new(dims: &[ParameterDimension]) -> Self {
        Self::new_with_rng(dims, Xoshiro256Plus::from_entropy())
    }
}

impl<R: Rng> Factorial<R> {
    /// Constructor given the dimensions of the parameter space
    /// and a random generator for reproducibility
    pub fn new_with_rng(dims: &[ParameterDimension], rng: R) -> Self {
        Factorial {
            dims: dims.to_vec(),
            kind: FactorialKind::default(),
            rng: rng_ref(rng),
        }
    }

    /// Sets the kind of levels
    pub fn kind(mut self, kind: FactorialKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Factorial<R2> {
        Factorial {
            dims: self.dims,
            kind: self.kind,
            rng: rng_ref(rng),
        }
    }

    /// Number of levels per dimension used to approach `ns` samples:
    /// `max(1, round(ns^(1/nx)))` for every dimension.
    pub fn levels_for(&self, ns: usize) -> Vec<usize> {
        let nx = self.dims.len();
        let f = (ns as f64).powf(1. / nx as f64).round().max(1.) as usize;
        vec![f; nx]
    }

    /// Generates the `(prod(levels), nx)` unit design where the ith dimension
    /// takes `levels[i]` distinct levels.
    pub fn normalized_sample_levels(&self, levels: &[usize]) -> Result<Array2<f64>> {
        check_not_empty(&self.dims)?;
        if levels.len() != self.dims.len() {
            return Err(SamplingError::InvalidArgument(format!(
                "{} levels given for {} dimensions",
                levels.len(),
                self.dims.len()
            )));
        }
        if let Some(i) = levels.iter().position(|&l| l == 0) {
            return Err(SamplingError::InvalidArgument(format!(
                "dimension '{}' requires at least one level",
                self.dims[i].name()
            )));
        }
        info!("Factorial design with levels {levels:?}");

        let level_values: Vec<Vec<f64>> = match self.kind {
            FactorialKind::Random => {
                let mut rng = lock(&self.rng);
                levels
                    .iter()
                    .map(|&n| (0..n).map(|_| rng.gen::<f64>()).collect())
                    .collect()
            }
            FactorialKind::Regular => levels
                .iter()
                .map(|&n| {
                    (0..n)
                        .map(|i| if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 })
                        .collect()
                })
                .collect(),
        };

        let combinations = cartesian_product(&level_values);
        debug!("Factorial design of {} points", combinations.len());
        let nrows = combinations.len();
        Array2::from_shape_vec((nrows, self.dims.len()), combinations.concat())
            .map_err(|e| SamplingError::InvalidArgument(e.to_string()))
    }

    /// Generates the design points of the factorial design where the ith dimension
    /// takes `levels[i]` distinct levels, that is `prod(levels)` points.
    pub fn sample_levels(&self, levels: &[usize]) -> Result<Vec<DesignPoint>> {
        validate_dimensions(&self.dims)?;
        let doe = self.normalized_sample_levels(levels)?;
        scale_rows(&doe, &self.dims)
    }
}

impl<R: Rng> SamplingMethod for Factorial<R> {
    fn sampling_space(&self) -> &[ParameterDimension] {
        &self.dims
    }

    /// Generates `f^nx` samples with `f` levels per dimension (see [Factorial::levels_for]),
    /// the number of returned samples may differ from `ns`.
    fn normalized_sample(&self, ns: usize) -> Result<Array2<f64>> {
        check_sample_size(ns)?;
        check_not_empty(&self.dims)?;
        self.normalized_sample_levels(&self.levels_for(ns))
    }
}
