use crate::errors::Result;
use crate::scaler::{scale_rows, validate_dimensions};
use crate::types::{DesignPoint, ParameterDimension};
use ndarray::Array2;

/// Sampling method allowing to generate a DoE in a given parameter space
///
/// A sampling method is able to generate a set of samples in a parameter space
/// defined by an ordered list of typed dimensions `x = (x_i)` with i in [1, nx].
/// Samples are first drawn in the unit hypercube `[0, 1]^nx` then each component
/// is scaled into the domain of its dimension (see [crate::scale]).
pub trait SamplingMethod {
    /// Returns the dimensions of the parameter space
    fn sampling_space(&self) -> &[ParameterDimension];

    /// Generates a (nrows, nx)-shaped array of samples belonging to `[0., 1.]^nx`
    ///
    /// # Parameters
    ///
    /// * `ns`: number of samples, the actual meaning depends on the method
    ///   (e.g. number of trajectories for Morris method)
    ///
    /// # Returns
    ///
    /// * A (nrows, nx) matrix of samples where nx is the number of dimensions,
    ///   columns being ordered as the dimensions
    fn normalized_sample(&self, ns: usize) -> Result<Array2<f64>>;

    /// Generates the design points of `ns` samples
    ///
    /// Dimensions are validated before any random draw so that an invalid
    /// parameter space leaves the random generator untouched.
    ///
    /// # Returns
    ///
    /// * A list of design points, each one holding a value for every dimension
    ///   in the order of the dimensions
    fn sample(&self, ns: usize) -> Result<Vec<DesignPoint>> {
        let dims = self.sampling_space();
        validate_dimensions(dims)?;
        let doe = self.normalized_sample(ns)?;
        scale_rows(&doe, dims)
    }
}
