use crate::errors::{Result, SamplingError};
use crate::utils::{check_not_empty, check_sample_size, lock, pdist, rng_ref, RngRef};
use crate::{ParameterDimension, SamplingMethod};
use log::{debug, info};
use ndarray::{s, Array, Array2, ShapeBuilder};
use ndarray_rand::{
    rand::seq::SliceRandom, rand::Rng, rand::SeedableRng, rand_distr::Uniform, RandomExt,
};
use ndarray_stats::{CorrelationExt, QuantileExt};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default number of candidate designs drawn by maximin and orthogonal kinds
pub const DEFAULT_LHS_ITERATIONS: usize = 5;

/// Kinds of Latin Hypercube Design
#[derive(Clone, Debug, Default, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum LhsKind {
    /// sample is choosen randomly within its latin hypercube intervals
    #[default]
    Classic,
    /// sample is the middle of its latin hypercube intervals
    Centered,
    /// distance between points is maximized
    Maximin,
    /// sample is the middle of its latin hypercube intervals and distance between points is maximized
    CenteredMaximin,
    /// correlation between dimensions is minimized
    Orthogonal,
}

/// The LHS design is built as follows: each dimension space is divided into ns sections
/// where ns is the number of sampling points, and one point in selected in each section.
/// Sections are then shuffled independently for each dimension.
/// The selection method gives different kind of LHS (see [LhsKind])
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Lhs<R: Rng> {
    /// Parameter space definition
    dims: Vec<ParameterDimension>,
    /// The requested kind of LHS
    kind: LhsKind,
    /// Number of candidate designs for maximin and orthogonal kinds
    iterations: usize,
    /// Random generator used for reproducibility
    rng: RngRef<R>,
}

/// LHS with default random generator
impl Lhs<Xoshiro256Plus> {
    /// Constructor given the dimensions of the parameter space
    ///
    /// ```
    /// use batch_doe::{Lhs, ParameterDimension};
    ///
    /// let doe = Lhs::new(&[ParameterDimension::float("x", 0., 1.)]);
    /// ```
    pub fn new(dims: &[ParameterDimension]) -> Self {
        Self::new_with_rng(dims, Xoshiro256Plus::from_entropy())
    }
}

impl<R: Rng> SamplingMethod for Lhs<R> {
    fn sampling_space(&self) -> &[ParameterDimension] {
        &self.dims
    }

    fn normalized_sample(&self, ns: usize) -> Result<Array2<f64>> {
        check_sample_size(ns)?;
        check_not_empty(&self.dims)?;
        if self.iterations == 0 {
            return Err(SamplingError::InvalidArgument(
                "LHS requires at least one iteration".to_string(),
            ));
        }
        info!(
            "{:?} LHS of {ns} points over {} dimensions",
            self.kind,
            self.dims.len()
        );
        let doe = match &self.kind {
            LhsKind::Classic => self._classic_lhs(ns),
            LhsKind::Centered => self._centered_lhs(ns),
            LhsKind::Maximin => self._maximin_lhs(ns, false, self.iterations),
            LhsKind::CenteredMaximin => self._maximin_lhs(ns, true, self.iterations),
            LhsKind::Orthogonal => self._orthogonal_lhs(ns, self.iterations),
        };
        Ok(doe)
    }
}

impl<R: Rng> Lhs<R> {
    /// Constructor with given parameter space and random generator.
    /// * `dims`: the dimensions of the parameter space
    /// * `rng`: random generator used to draw and shuffle samples within sections
    pub fn new_with_rng(dims: &[ParameterDimension], rng: R) -> Self {
        Lhs {
            dims: dims.to_vec(),
            kind: LhsKind::default(),
            iterations: DEFAULT_LHS_ITERATIONS,
            rng: rng_ref(rng),
        }
    }

    /// Sets the kind of LHS
    pub fn kind(mut self, kind: LhsKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the number of candidate designs drawn by maximin and orthogonal kinds
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Lhs<R2> {
        Lhs {
            dims: self.dims,
            kind: self.kind,
            iterations: self.iterations,
            rng: rng_ref(rng),
        }
    }

    fn _classic_lhs(&self, ns: usize) -> Array2<f64> {
        let nx = self.dims.len();
        let cut = Array::linspace(0., 1., ns + 1);

        let mut rng = lock(&self.rng);
        let rnd = Array::random_using((ns, nx).f(), Uniform::new(0., 1.), &mut *rng);
        let a = cut.slice(s![..ns]).to_owned();
        let b = cut.slice(s![1..(ns + 1)]);
        let c = &b - &a;
        let mut lhs = Array::zeros((ns, nx).f());
        for j in 0..nx {
            let mut colj = rnd.column(j).to_owned() * &c + &a;
            if let Some(values) = colj.as_slice_mut() {
                values.shuffle(&mut *rng);
            }
            lhs.column_mut(j).assign(&colj);
        }
        lhs
    }

    fn _centered_lhs(&self, ns: usize) -> Array2<f64> {
        let nx = self.dims.len();
        let cut = Array::linspace(0., 1., ns + 1);

        let a = cut.slice(s![..ns]).to_owned();
        let b = cut.slice(s![1..(ns + 1)]);
        let mut c = (a + b) / 2.;
        let mut lhs = Array::zeros((ns, nx).f());

        let mut rng = lock(&self.rng);
        for j in 0..nx {
            if let Some(values) = c.as_slice_mut() {
                values.shuffle(&mut *rng);
            }
            lhs.column_mut(j).assign(&c);
        }
        lhs
    }

    fn _maximin_lhs(&self, ns: usize, centered: bool, max_iters: usize) -> Array2<f64> {
        let draw = || {
            if centered {
                self._centered_lhs(ns)
            } else {
                self._classic_lhs(ns)
            }
        };
        // a single point has no pairwise distance
        let min_dist = |lhs: &Array2<f64>| *pdist(lhs).min().unwrap_or(&f64::INFINITY);

        let mut lhs_maximin = draw();
        let mut max_dist = min_dist(&lhs_maximin);
        for _ in 0..max_iters - 1 {
            let lhs = draw();
            let d_min = min_dist(&lhs);
            if max_dist < d_min {
                debug!("Maximin LHS improved: min distance {max_dist} -> {d_min}");
                max_dist = d_min;
                lhs_maximin = lhs;
            }
        }
        lhs_maximin
    }

    fn _orthogonal_lhs(&self, ns: usize, max_iters: usize) -> Array2<f64> {
        let mut lhs_orthogonal = self._classic_lhs(ns);
        let mut min_corr = max_correlation(&lhs_orthogonal);
        for _ in 0..max_iters - 1 {
            let lhs = self._classic_lhs(ns);
            let corr = max_correlation(&lhs);
            if corr < min_corr {
                debug!("Orthogonal LHS improved: max correlation {min_corr} -> {corr}");
                min_corr = corr;
                lhs_orthogonal = lhs;
            }
        }
        lhs_orthogonal
    }
}

/// Largest absolute Pearson correlation between two columns of `doe`
fn max_correlation(doe: &Array2<f64>) -> f64 {
    if doe.nrows() < 2 || doe.ncols() < 2 {
        return 0.;
    }
    match doe.t().pearson_correlation() {
        Ok(corr) => corr
            .indexed_iter()
            .filter(|((i, j), _)| i != j)
            .fold(0., |max, (_, c)| c.abs().max(max)),
        Err(_) => 0.,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use approx::{assert_abs_diff_eq, assert_abs_diff_ne};
    use ndarray::array;

    fn unit_dims(nx: usize) -> Vec<ParameterDimension> {
        (0..nx)
            .map(|i| ParameterDimension::float(format!("x{i}"), 0., 1.))
            .collect()
    }

    fn assert_stratified(doe: &Array2<f64>) {
        let ns = doe.nrows();
        for col in doe.columns() {
            let mut strata: Vec<usize> = col
                .iter()
                .map(|&v| ((v * ns as f64).floor() as usize).min(ns - 1))
                .collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..ns).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_lhs_stratification() {
        for kind in [
            LhsKind::Classic,
            LhsKind::Centered,
            LhsKind::Maximin,
            LhsKind::CenteredMaximin,
            LhsKind::Orthogonal,
        ] {
            for (ns, nx) in [(1, 1), (5, 2), (10, 4), (37, 3)] {
                let doe = Lhs::new(&unit_dims(nx))
                    .kind(kind)
                    .with_rng(Xoshiro256Plus::seed_from_u64(42))
                    .normalized_sample(ns)
                    .unwrap();
                assert_eq!(doe.dim(), (ns, nx));
                assert_stratified(&doe);
            }
        }
    }

    #[test]
    fn test_lhs_scaled() {
        let dims = [
            ParameterDimension::float("x", 5., 10.),
            ParameterDimension::int("n", 0, 4),
        ];
        let doe = Lhs::new(&dims)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(5)
            .unwrap();
        assert_eq!(doe.len(), 5);
        for p in &doe {
            assert_eq!(p.names().collect::<Vec<_>>(), vec!["x", "n"]);
            match p.get("x") {
                Some(Value::Float(v)) => assert!((5. ..=10.).contains(v)),
                v => panic!("unexpected {v:?}"),
            }
        }
    }

    #[test]
    fn test_centered_lhs() {
        let doe = Lhs::new(&unit_dims(2))
            .kind(LhsKind::Centered)
            .with_rng(Xoshiro256Plus::seed_from_u64(0))
            .normalized_sample(5)
            .unwrap();
        let mut col = doe.column(0).to_vec();
        col.sort_by(|a, b| a.total_cmp(b));
        assert_abs_diff_eq!(
            Array::from_vec(col),
            array![0.1, 0.3, 0.5, 0.7, 0.9],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_lhs_reproducible() {
        let doe = |seed| {
            Lhs::new(&unit_dims(3))
                .with_rng(Xoshiro256Plus::seed_from_u64(seed))
                .normalized_sample(8)
                .unwrap()
        };
        assert_abs_diff_eq!(doe(42), doe(42), epsilon = 0.);
        assert_abs_diff_ne!(doe(42), doe(43), epsilon = 1e-12);
    }

    #[test]
    fn test_no_duplicate() {
        let lhs = Lhs::new(&unit_dims(2)).with_rng(Xoshiro256Plus::seed_from_u64(42));
        let sample1 = lhs.normalized_sample(5).unwrap();
        let sample2 = lhs.normalized_sample(5).unwrap();
        assert_abs_diff_ne!(sample1, sample2);
    }

    #[test]
    fn test_orthogonal_lhs_less_correlated() {
        let classic = Lhs::new(&unit_dims(3))
            .with_rng(Xoshiro256Plus::seed_from_u64(7))
            .normalized_sample(20)
            .unwrap();
        // first candidate is the classic design drawn from the same seed
        let orthogonal = Lhs::new(&unit_dims(3))
            .kind(LhsKind::Orthogonal)
            .iterations(30)
            .with_rng(Xoshiro256Plus::seed_from_u64(7))
            .normalized_sample(20)
            .unwrap();
        assert_stratified(&orthogonal);
        assert!(max_correlation(&orthogonal) <= max_correlation(&classic));
        assert!(max_correlation(&orthogonal) < 0.5);
    }

    #[test]
    fn test_lhs_invalid_arguments() {
        assert!(matches!(
            Lhs::new(&unit_dims(2))
                .kind(LhsKind::Orthogonal)
                .iterations(0)
                .sample(5),
            Err(SamplingError::InvalidArgument(_))
        ));
        assert!(matches!(
            Lhs::new(&unit_dims(2)).sample(0),
            Err(SamplingError::InvalidArgument(_))
        ));
        assert!(matches!(
            Lhs::new(&[]).sample(3),
            Err(SamplingError::InvalidArgument(_))
        ));
    }
}
