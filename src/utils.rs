use crate::errors::{Result, SamplingError};
use crate::types::ParameterDimension;
use linfa::Float;
use ndarray::{Array, Array1, ArrayBase, Data, Ix2};
use ndarray_rand::rand::Rng;
use ndarray_stats::DeviationExt;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

/// Shared random generator allowing `&self` sampling
pub(crate) type RngRef<R> = Arc<RwLock<R>>;

pub(crate) fn rng_ref<R: Rng>(rng: R) -> RngRef<R> {
    Arc::new(RwLock::new(rng))
}

/// Locks the generator, a poisoned lock still holds a valid generator state
pub(crate) fn lock<R>(rng: &RngRef<R>) -> RwLockWriteGuard<'_, R> {
    rng.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Computes the pairwise distances between rows of a 2D-array
pub fn pdist<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array1<F> {
    let nrows = x.nrows();
    let distances: Vec<F> = (0..nrows)
        .flat_map(|i| ((i + 1)..nrows).map(move |j| (i, j)))
        .map(|(i, j)| {
            let a = x.row(i);
            let b = x.row(j);
            // rows have the same length by construction
            F::cast(a.l2_dist(&b).unwrap_or(0.))
        })
        .collect();
    Array::from_vec(distances)
}

pub(crate) fn check_sample_size(ns: usize) -> Result<()> {
    if ns == 0 {
        return Err(SamplingError::InvalidArgument(
            "number of samples should be positive".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_not_empty(dims: &[ParameterDimension]) -> Result<()> {
    if dims.is_empty() {
        return Err(SamplingError::InvalidArgument(
            "at least one dimension is required".to_string(),
        ));
    }
    Ok(())
}

/// Cartesian product of the given per-dimension values.
///
/// The first list varies slowest: each partial combination is extended in turn
/// with every value of the next list.
pub(crate) fn cartesian_product<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    lists.iter().fold(vec![vec![]], |partials, values| {
        partials
            .iter()
            .flat_map(|partial| {
                values.iter().map(move |v| {
                    let mut combination = partial.clone();
                    combination.push(v.clone());
                    combination
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_pdist() {
        let x = array![[1., 0., 0.], [0., 1., 0.], [0., 2., 0.], [3., 4., 5.]];
        #[allow(clippy::approx_constant)]
        let expected = array![1.41421356, 2.23606798, 6.70820393, 1., 6.55743852, 6.164414];
        let actual = pdist(&x);
        assert_abs_diff_eq!(actual, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_pdist_single_precision() {
        let x = array![[0f32, 0.], [3., 4.], [0., 1.]];
        let actual: Array1<f32> = pdist(&x);
        assert_abs_diff_eq!(actual, array![5f32, 1., 4.2426405], epsilon = 1e-5);
    }

    #[test]
    fn test_cartesian_product() {
        let product = cartesian_product(&[vec![1, 2], vec![10, 20, 30]]);
        assert_eq!(
            product,
            vec![
                vec![1, 10],
                vec![1, 20],
                vec![1, 30],
                vec![2, 10],
                vec![2, 20],
                vec![2, 30]
            ]
        );
        assert_eq!(cartesian_product::<i32>(&[]), vec![Vec::<i32>::new()]);
        assert!(cartesian_product(&[vec![1], vec![]]).is_empty());
    }
}
