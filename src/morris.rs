//! Morris one-at-a-time design for elementary effects screening
//!
//! A Morris design is made of `r` independent trajectories in the unit hypercube
//! of the `k` parameters. A trajectory visits `k + 1` points of a grid of `p` levels,
//! two consecutive points differing by `delta = p / (2 (p - 1))` along one single
//! parameter, every parameter being moved exactly once.
//!
//! Trajectories are built with the classical random strategy of Morris (1991):
//!
//! `B* = x* + (delta / 2) ((2 B P* - J) D* + J)`
//!
//! where `x*` is a random base point, `B` the `(k+1, k)` strictly lower triangular
//! matrix of ones, `P*` a random permutation matrix, `J` the `(k+1, k)` matrix of ones
//! and `D*` a diagonal matrix of random directions `±1`.
use crate::errors::{Result, SamplingError};
use crate::scaler::{scale_rows, unit_samples, validate_dimensions};
use crate::utils::{lock, rng_ref, RngRef};
use crate::{DesignPoint, ParameterDimension, SamplingMethod, UnitSample};
use log::{debug, info};
use ndarray::{concatenate, Array1, Array2, ArrayView2, Axis};
use ndarray_rand::rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default number of grid levels
pub const DEFAULT_MORRIS_LEVELS: usize = 4;

/// A one-at-a-time path of `k + 1` points in the unit hypercube `[0, 1]^k`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Trajectory {
    points: Array2<f64>,
}

impl Trajectory {
    /// Points of the trajectory as a `(k + 1, k)` matrix, one point per row
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Number of points, that is `k + 1`
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    /// Whether the trajectory has no point
    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }
}

/// The Morris design generates trajectories for elementary effects screening.
///
/// With `SamplingMethod`, `ns` is the number of trajectories `r` and
/// `r * (k + 1)` samples are returned, trajectory after trajectory.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Morris<R: Rng> {
    /// Parameter space definition
    dims: Vec<ParameterDimension>,
    /// Number of grid levels `p` (even)
    levels: usize,
    /// Random generator used for reproducibility
    rng: RngRef<R>,
}

impl Morris<Xoshiro256Plus> {
    /// Constructor given the dimensions of the parameter space
    ///
    /// ```
    /// use batch_doe::{Morris, ParameterDimension, SamplingMethod};
    ///
    /// let dims = [ParameterDimension::float("x", 0., 1.), ParameterDimension::int("n", 1, 9)];
    /// let doe = Morris::new(&dims).levels(4).sample(10).unwrap();
    /// assert_eq!(doe.len(), 30);
    /// ```
    pub fn new(dims: &[ParameterDimension]) -> Self {
        Self::new_with_rng(dims, Xoshiro256Plus::from_entropy())
    }
}

impl<R: Rng> Morris<R> {
    /// Constructor given the dimensions of the parameter space
    /// and a random generator for reproducibility
    pub fn new_with_rng(dims: &[ParameterDimension], rng: R) -> Self {
        Morris {
            dims: dims.to_vec(),
            levels: DEFAULT_MORRIS_LEVELS,
            rng: rng_ref(rng),
        }
    }

    /// Sets the number of grid levels `p`, expected to be even
    pub fn levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    /// Sets the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Morris<R2> {
        Morris {
            dims: self.dims,
            levels: self.levels,
            rng: rng_ref(rng),
        }
    }

    /// Step between two consecutive points of a trajectory: `p / (2 (p - 1))`
    pub fn delta(&self) -> f64 {
        self.levels as f64 / (2. * (self.levels as f64 - 1.))
    }

    fn check_levels(&self) -> Result<()> {
        if self.levels < 2 || self.levels % 2 != 0 {
            return Err(SamplingError::InvalidArgument(format!(
                "Morris number of levels should be even and at least 2, got {}",
                self.levels
            )));
        }
        Ok(())
    }

    /// Generates `r` independent trajectories
    pub fn trajectories(&self, r: usize) -> Result<Vec<Trajectory>> {
        self.check_levels()?;
        let k = self.dims.len();
        info!(
            "Morris sampling of {r} trajectories over {k} dimensions with {} levels",
            self.levels
        );
        debug!("Morris delta = {}", self.delta());
        let mut rng = lock(&self.rng);
        Ok((0..r)
            .map(|_| Trajectory {
                points: trajectory(k, self.levels, &mut *rng),
            })
            .collect())
    }

    /// Generates the design points of `r` trajectories together with the
    /// corresponding unit hypercube points, as required by elementary effects computation.
    pub fn sample_with_unit_points(
        &self,
        r: usize,
    ) -> Result<(Vec<DesignPoint>, Vec<UnitSample>)> {
        validate_dimensions(&self.dims)?;
        let doe = self.normalized_sample(r)?;
        let points = scale_rows(&doe, &self.dims)?;
        Ok((points, unit_samples(&doe, &self.dims)))
    }
}

impl<R: Rng> SamplingMethod for Morris<R> {
    fn sampling_space(&self) -> &[ParameterDimension] {
        &self.dims
    }

    fn normalized_sample(&self, ns: usize) -> Result<Array2<f64>> {
        let trajectories = self.trajectories(ns)?;
        if trajectories.is_empty() {
            return Ok(Array2::zeros((0, self.dims.len())));
        }
        let views: Vec<_> = trajectories.iter().map(|t| t.points()).collect();
        concatenate(Axis(0), &views).map_err(|e| SamplingError::InvalidArgument(e.to_string()))
    }
}

/// Base point `x*` drawn on the grid `{0, bound / (p/2 - 1), ..., bound}` with `bound = 1 - delta`
fn base_point<R: Rng>(k: usize, levels: usize, delta: f64, rng: &mut R) -> Array1<f64> {
    let n_grid = levels / 2;
    let bound = 1. - delta;
    let grid: Vec<f64> = if n_grid > 1 {
        (0..n_grid)
            .map(|i| i as f64 * bound / (n_grid - 1) as f64)
            .collect()
    } else {
        vec![0.]
    };
    (0..k).map(|_| grid[rng.gen_range(0..grid.len())]).collect()
}

/// Strictly lower triangular `(k + 1, k)` matrix of ones
fn orientation_matrix(k: usize) -> Array2<f64> {
    Array2::from_shape_fn((k + 1, k), |(i, j)| if i > j { 1. } else { 0. })
}

/// Random `(k, k)` permutation matrix
fn permutation_matrix<R: Rng>(k: usize, rng: &mut R) -> Array2<f64> {
    let mut order: Vec<usize> = (0..k).collect();
    order.shuffle(rng);
    let mut p = Array2::zeros((k, k));
    for (j, &i) in order.iter().enumerate() {
        p[[i, j]] = 1.;
    }
    p
}

/// Random `(k, k)` diagonal matrix of directions `±1`
fn direction_matrix<R: Rng>(k: usize, rng: &mut R) -> Array2<f64> {
    let directions: Array1<f64> = (0..k)
        .map(|_| if rng.gen::<bool>() { -1. } else { 1. })
        .collect();
    Array2::from_diag(&directions)
}

/// One trajectory as a `(k + 1, k)` matrix
fn trajectory<R: Rng>(k: usize, levels: usize, rng: &mut R) -> Array2<f64> {
    if k == 0 {
        return Array2::zeros((1, 0));
    }
    let delta = levels as f64 / (2. * (levels as f64 - 1.));
    let x_star = base_point(k, levels, delta, rng);
    let d_star = direction_matrix(k, rng);
    let p_star = permutation_matrix(k, rng);
    let b = orientation_matrix(k);
    let j = Array2::<f64>::ones((k + 1, k));

    let ee = ((b.dot(&p_star) * 2. - &j).dot(&d_star) + &j) * (delta / 2.);
    // x* + delta may exceed 1 by rounding
    (ee + &x_star).mapv_into(|v| v.clamp(0., 1.))
}
