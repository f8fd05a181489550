/*!
This library implements the Design of Experiments (DoE) methods used to explore the
parameter space of a simulation model in batch mode: exhaustive sweep, uniform random,
factorial, [Latin Hypercube](https://en.wikipedia.org/wiki/Latin_hypercube_sampling),
[Morris](https://en.wikipedia.org/wiki/Morris_method) one-at-a-time trajectories and
the Saltelli scheme for Sobol sensitivity indices.

The parameter space is defined as an ordered list of [ParameterDimension], each one
having a name, a [ParameterType] and either bounds (with an optional step) or a list of
discrete values. Sampling methods draw samples in the unit hypercube `[0, 1]^nx` which
are then scaled into the domain of each dimension to give [DesignPoint]s, that is
ordered name/value maps.

Example:
```
use batch_doe::{Lhs, LhsKind, Morris, ParameterDimension, ParameterType, SamplingMethod};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

let dims = [
    ParameterDimension::float("speed", 5., 10.),
    ParameterDimension::int("agents", 10, 100),
    ParameterDimension::among("color", ParameterType::String, ["red", "green", "blue"]),
];
// We generate five design points using centered Latin Hypercube sampling.
let points = Lhs::new(&dims).kind(LhsKind::Centered).sample(5).unwrap();
assert_eq!(points.len(), 5);
// or else 3 Morris trajectories with a random generator for reproducibility
let points = Morris::new(&dims)
    .with_rng(Xoshiro256Plus::seed_from_u64(42))
    .sample(3)
    .unwrap();
assert_eq!(points.len(), 3 * 4);
```

This library contains the following sampling methods:
* [Exhaustive sweep](crate::exhaustive::Exhaustive),
* [Uniform Random Sampling](crate::random::Random),
* [Factorial Sampling](crate::factorial::Factorial),
* [Latin Hypercube Sampling](crate::lhs::Lhs),
* [Orthogonal Sampling](crate::lhs::LhsKind::Orthogonal), a decorrelated Latin Hypercube,
* [Morris trajectories](crate::morris::Morris),
* [Saltelli Sampling](crate::saltelli::Saltelli) over a [Sobol sequence](crate::sobol::Sobol).

An exploration can also be described with an [ExplorationConfig] and run with [explore].
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod errors;
mod exhaustive;
mod exploration;
mod factorial;
mod lhs;
mod morris;
mod random;
mod saltelli;
mod scaler;
mod sobol;
mod traits;
mod types;
mod utils;

pub use errors::*;
pub use exhaustive::*;
pub use exploration::*;
pub use factorial::*;
pub use lhs::*;
pub use morris::*;
pub use random::*;
pub use saltelli::*;
pub use scaler::*;
pub use sobol::*;
pub use traits::*;
pub use types::*;
