use crate::errors::{Result, SamplingError};
use crate::sobol::{SequenceGenerator, Sobol};
use crate::utils::{check_not_empty, check_sample_size, lock, rng_ref, RngRef};
use crate::{ParameterDimension, SamplingMethod};
use log::{debug, info};
use ndarray::{s, Array2, Axis};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// The Saltelli design is the sampling scheme used to estimate Sobol sensitivity indices.
///
/// A `(ns, 2 nx)` low-discrepancy matrix is split into two matrices `A` and `B`.
/// For each of the `ns` base samples, the design holds the `A` sample, the `nx`
/// samples `AB_j` (`A` with its jth component taken from `B`), the `nx` samples
/// `BA_j` (`B` with its jth component taken from `A`, only for second order indices)
/// and finally the `B` sample, that is `ns (2 nx + 2)` samples (`ns (nx + 2)`
/// without second order).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Saltelli<R: Rng, G: SequenceGenerator = Sobol> {
    /// Parameter space definition
    dims: Vec<ParameterDimension>,
    /// Low-discrepancy sequence generator
    generator: G,
    /// Whether `BA_j` samples required by second order indices are generated
    second_order: bool,
    /// Whether the sequence is randomly shifted
    scrambled: bool,
    /// Random generator used for the random shift
    rng: RngRef<R>,
}

impl Saltelli<Xoshiro256Plus> {
    /// Constructor given the dimensions of the parameter space
    ///
    /// ```
    /// use batch_doe::{ParameterDimension, Saltelli, SamplingMethod};
    ///
    /// let dims = [ParameterDimension::float("x", 0., 1.), ParameterDimension::int("n", 1, 9)];
    /// let doe = Saltelli::new(&dims).sample(8).unwrap();
    /// assert_eq!(doe.len(), 8 * (2 * 2 + 2));
    /// ```
    pub fn new(dims: &[ParameterDimension]) -> Self {
        Self::new_with_rng(dims, Xoshiro256Plus::from_entropy())
    }
}

impl<R: Rng> Saltelli<R> {
    /// Constructor given the dimensions of the parameter space
    /// and a random generator for reproducibility
    pub fn new_with_rng(dims: &[ParameterDimension], rng: R) -> Self {
        Saltelli {
            dims: dims.to_vec(),
            generator: Sobol,
            second_order: true,
            scrambled: false,
            rng: rng_ref(rng),
        }
    }
}

impl<R: Rng, G: SequenceGenerator> Saltelli<R, G> {
    /// Sets the low-discrepancy sequence generator
    pub fn with_generator<G2: SequenceGenerator>(self, generator: G2) -> Saltelli<R, G2> {
        Saltelli {
            dims: self.dims,
            generator,
            second_order: self.second_order,
            scrambled: self.scrambled,
            rng: self.rng,
        }
    }

    /// Sets the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Saltelli<R2, G> {
        Saltelli {
            dims: self.dims,
            generator: self.generator,
            second_order: self.second_order,
            scrambled: self.scrambled,
            rng: rng_ref(rng),
        }
    }

    /// Sets whether samples for second order indices are generated (default true)
    pub fn second_order(mut self, second_order: bool) -> Self {
        self.second_order = second_order;
        self
    }

    /// Sets whether the sequence is shifted by a random vector modulo 1 (default false)
    pub fn scrambled(mut self, scrambled: bool) -> Self {
        self.scrambled = scrambled;
        self
    }

    /// Number of samples generated for each base sample
    pub fn samples_per_base(&self) -> usize {
        let nx = self.dims.len();
        if self.second_order {
            2 * nx + 2
        } else {
            nx + 2
        }
    }

    fn base_sample(&self, ns: usize) -> Result<Array2<f64>> {
        let nx = self.dims.len();
        if let Some(max_dim) = self.generator.max_dim() {
            if 2 * nx > max_dim {
                return Err(SamplingError::InvalidArgument(format!(
                    "Saltelli sampling of {nx} dimensions requires a sequence of dimension {}, max is {max_dim}",
                    2 * nx
                )));
            }
        }
        let mut base = self.generator.generate(ns, 2 * nx)?;
        if base.dim() != (ns, 2 * nx) {
            return Err(SamplingError::InvalidArgument(format!(
                "sequence generator returned a {:?} matrix, expected {:?}",
                base.dim(),
                (ns, 2 * nx)
            )));
        }
        if self.scrambled {
            let mut rng = lock(&self.rng);
            for mut col in base.columns_mut() {
                let shift = rng.gen::<f64>();
                col.mapv_inplace(|v| (v + shift).fract());
            }
        }
        Ok(base)
    }
}

impl<R: Rng, G: SequenceGenerator> SamplingMethod for Saltelli<R, G> {
    fn sampling_space(&self) -> &[ParameterDimension] {
        &self.dims
    }

    /// Generates `ns (2 nx + 2)` samples, `ns (nx + 2)` without second order
    fn normalized_sample(&self, ns: usize) -> Result<Array2<f64>> {
        check_sample_size(ns)?;
        check_not_empty(&self.dims)?;
        let nx = self.dims.len();
        info!("Saltelli sampling of {ns} base samples over {nx} dimensions");
        let base = self.base_sample(ns)?;
        let per_base = self.samples_per_base();
        debug!("Saltelli design of {} samples", ns * per_base);

        let mut doe = Array2::zeros((ns * per_base, nx));
        for (i, row) in base.axis_iter(Axis(0)).enumerate() {
            let a = row.slice(s![..nx]);
            let b = row.slice(s![nx..]);
            let mut block = doe.slice_mut(s![i * per_base..(i + 1) * per_base, ..]);
            block.row_mut(0).assign(&a);
            for j in 0..nx {
                let mut ab = block.row_mut(1 + j);
                ab.assign(&a);
                ab[j] = b[j];
            }
            if self.second_order {
                for j in 0..nx {
                    let mut ba = block.row_mut(1 + nx + j);
                    ba.assign(&b);
                    ba[j] = a[j];
                }
            }
            block.row_mut(per_base - 1).assign(&b);
        }
        Ok(doe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use approx::assert_abs_diff_eq;

    fn dims(nx: usize) -> Vec<ParameterDimension> {
        (0..nx)
            .map(|i| ParameterDimension::float(format!("x{i}"), 0., 1.))
            .collect()
    }

    #[test]
    fn test_saltelli_shape() {
        let doe = Saltelli::new(&dims(3)).normalized_sample(8).unwrap();
        assert_eq!(doe.dim(), (8 * 8, 3));
        let doe = Saltelli::new(&dims(3))
            .second_order(false)
            .normalized_sample(8)
            .unwrap();
        assert_eq!(doe.dim(), (8 * 5, 3));
    }

    #[test]
    fn test_saltelli_cross_samples() {
        let nx = 3;
        let base = Sobol.generate(4, 2 * nx).unwrap();
        let doe = Saltelli::new(&dims(nx)).normalized_sample(4).unwrap();
        let per_base = 2 * nx + 2;
        for i in 0..4 {
            let a = base.slice(s![i, ..nx]);
            let b = base.slice(s![i, nx..]);
            let block = doe.slice(s![i * per_base..(i + 1) * per_base, ..]);
            assert_abs_diff_eq!(block.row(0), a, epsilon = 0.);
            assert_abs_diff_eq!(block.row(per_base - 1), b, epsilon = 0.);
            for j in 0..nx {
                for c in 0..nx {
                    let ab = if c == j { b[c] } else { a[c] };
                    let ba = if c == j { a[c] } else { b[c] };
                    assert_eq!(block[[1 + j, c]], ab);
                    assert_eq!(block[[1 + nx + j, c]], ba);
                }
            }
        }
    }

    #[test]
    fn test_saltelli_scaled() {
        let dims = vec![
            ParameterDimension::float("x", -5., 5.),
            ParameterDimension::boolean("b"),
        ];
        let doe = Saltelli::new(&dims).sample(2).unwrap();
        assert_eq!(doe.len(), 12);
        // first base sample of the Sobol sequence is the center of the hypercube
        assert_eq!(doe[0].get("x"), Some(&Value::Float(0.)));
        assert_eq!(doe[0].get("b"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_saltelli_scrambled_reproducible() {
        let doe = |seed| {
            Saltelli::new(&dims(2))
                .scrambled(true)
                .with_rng(Xoshiro256Plus::seed_from_u64(seed))
                .normalized_sample(16)
                .unwrap()
        };
        let d1 = doe(42);
        assert_eq!(d1, doe(42));
        assert_ne!(d1, doe(0));
        assert!(d1.iter().all(|v| (0. ..1.).contains(v)));
    }

    #[test]
    fn test_saltelli_many_parameters() {
        for nx in [11, 50] {
            let doe = Saltelli::new(&dims(nx)).sample(4).unwrap();
            assert_eq!(doe.len(), 4 * (2 * nx + 2));
            assert_eq!(doe[0].len(), nx);
        }
    }

    #[test]
    fn test_saltelli_too_many_dims() {
        assert!(matches!(
            Saltelli::new(&dims(Sobol::MAX_DIM / 2 + 1)).sample(4),
            Err(SamplingError::InvalidArgument(_))
        ));
    }
}
