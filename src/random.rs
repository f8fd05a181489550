use crate::errors::Result;
use crate::utils::{check_not_empty, check_sample_size, lock, rng_ref, RngRef};
use crate::{ParameterDimension, SamplingMethod};
use log::info;
use ndarray::{Array, Array2};
use ndarray_rand::{rand::Rng, rand::SeedableRng, rand_distr::Uniform, RandomExt};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// The Random design consists in drawing samples randomly.
///
/// Each component of each sample is an independent uniform draw, no
/// stratification is guaranteed.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Random<R: Rng> {
    /// Parameter space definition
    dims: Vec<ParameterDimension>,
    /// Random generator used for reproducibility
    rng: RngRef<R>,
}

impl Random<Xoshiro256Plus> {
    /// Constructor given the dimensions of the parameter space
    ///
    /// ```
    /// use batch_doe::{ParameterDimension, Random};
    ///
    /// let doe = Random::new(&[ParameterDimension::float("x", 0., 1.)]);
    /// ```
    pub fn new(dims: &[ParameterDimension]) -> Self {
        Self::new_with_rng(dims, Xoshiro256Plus::from_entropy())
    }
}

impl<R: Rng> Random<R> {
    /// Constructor given the dimensions of the parameter space
    /// and a random generator for reproducibility
    pub fn new_with_rng(dims: &[ParameterDimension], rng: R) -> Self {
        Random {
            dims: dims.to_vec(),
            rng: rng_ref(rng),
        }
    }

    /// Set random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Random<R2> {
        Random {
            dims: self.dims,
            rng: rng_ref(rng),
        }
    }
}

impl<R: Rng> SamplingMethod for Random<R> {
    fn sampling_space(&self) -> &[ParameterDimension] {
        &self.dims
    }

    fn normalized_sample(&self, ns: usize) -> Result<Array2<f64>> {
        check_sample_size(ns)?;
        check_not_empty(&self.dims)?;
        let nx = self.dims.len();
        info!("Random sampling of {ns} points over {nx} dimensions");
        let mut rng = lock(&self.rng);
        Ok(Array::random_using(
            (ns, nx),
            Uniform::new(0., 1.),
            &mut *rng,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SamplingError, Value};

    fn dims() -> Vec<ParameterDimension> {
        vec![
            ParameterDimension::float("x", 5., 10.),
            ParameterDimension::int("n", 0, 100),
            ParameterDimension::boolean("flag"),
        ]
    }

    #[test]
    fn test_random() {
        let doe = Random::new(&dims())
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(9)
            .unwrap();
        assert_eq!(doe.len(), 9);
        for p in &doe {
            assert_eq!(p.names().collect::<Vec<_>>(), vec!["x", "n", "flag"]);
            match p.get("x") {
                Some(Value::Float(v)) => assert!((5. ..=10.).contains(v)),
                v => panic!("unexpected {v:?}"),
            }
            match p.get("n") {
                Some(Value::Int(v)) => assert!((0..=100).contains(v)),
                v => panic!("unexpected {v:?}"),
            }
        }
    }

    #[test]
    fn test_random_unit_space() {
        let doe = Random::new(&dims())
            .with_rng(Xoshiro256Plus::seed_from_u64(0))
            .normalized_sample(50)
            .unwrap();
        assert_eq!(doe.dim(), (50, 3));
        assert!(doe.iter().all(|&v| (0. ..1.).contains(&v)));
    }

    #[test]
    fn test_random_reproducible() {
        let s1 = Random::new(&dims())
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(5)
            .unwrap();
        let s2 = Random::new(&dims())
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(5)
            .unwrap();
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_random_no_sample() {
        assert!(matches!(
            Random::new(&dims()).sample(0),
            Err(SamplingError::InvalidArgument(_))
        ));
    }
}
