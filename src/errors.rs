use thiserror::Error;

/// A result type for sampling methods
pub type Result<T> = std::result::Result<T, SamplingError>;

/// An error when building a design of experiments
#[derive(Error, Debug)]
pub enum SamplingError {
    /// When a sampling parameter is invalid (sample size, levels, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// When the domain of a dimension cannot be sampled
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
    /// When a type of parameter is not handled
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),
    /// When date arithmetic fails
    #[error(transparent)]
    DateError(#[from] jiff::Error),
}
