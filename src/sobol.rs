//! Sobol low-discrepancy sequence
//!
//! Gray code construction of Antonov & Saleev. The first 21 dimensions use the
//! direction numbers of Joe & Kuo (2008) "Constructing Sobol sequences with better
//! two-dimensional projections", SIAM J. Sci. Comput. 30, 2635-2654. Further
//! dimensions use the next primitive polynomials (by degree, then coefficients)
//! with odd initial direction numbers drawn from a generator seeded by the dimension.
use crate::errors::{Result, SamplingError};
use ndarray::Array2;
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Number of bits of the direction numbers
const BITS: usize = 32;

/// Highest degree of the primitive polynomials, giving 1110 polynomials
const MAX_DEGREE: u32 = 13;

/// Primitive polynomials (degree `s`, coefficients `a`) and initial direction
/// numbers `m` of dimensions 2 to 21, the first dimension being Van der Corput.
const JOE_KUO: [(u32, u32, &[u32]); 20] = [
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6, 1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
    (6, 19, &[1, 1, 1, 15, 7, 5]),
    (6, 22, &[1, 3, 1, 15, 13, 25]),
    (6, 25, &[1, 1, 5, 5, 19, 61]),
    (7, 1, &[1, 3, 7, 11, 23, 15, 103]),
    (7, 4, &[1, 3, 7, 13, 13, 15, 69]),
];

/// Product of `a` and `b` modulo `poly` of degree `degree` over GF(2)
fn mulmod(mut a: u64, mut b: u64, poly: u64, degree: u32) -> u64 {
    let mut r = 0;
    while b != 0 {
        if b & 1 == 1 {
            r ^= a;
        }
        b >>= 1;
        a <<= 1;
        if (a >> degree) & 1 == 1 {
            a ^= poly;
        }
    }
    r
}

/// `x^e` modulo `poly` over GF(2)
fn powmod_x(mut e: u64, poly: u64, degree: u32) -> u64 {
    let mut base = if degree == 1 { 2 ^ poly } else { 2 };
    let mut r = 1;
    while e != 0 {
        if e & 1 == 1 {
            r = mulmod(r, base, poly, degree);
        }
        base = mulmod(base, base, poly, degree);
        e >>= 1;
    }
    r
}

fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = vec![];
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            factors.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// A polynomial is primitive when `x` has order `2^degree - 1` modulo it
fn is_primitive(degree: u32, a: u32) -> bool {
    let poly = (1u64 << degree) | ((a as u64) << 1) | 1;
    let order = (1u64 << degree) - 1;
    powmod_x(order, poly, degree) == 1
        && prime_factors(order)
            .iter()
            .all(|q| powmod_x(order / q, poly, degree) != 1)
}

/// The first `count` primitive polynomials as `(degree, a)` pairs where the bits of `a`
/// are the inner coefficients, ordered by degree then by `a`
fn primitive_polynomials(count: usize) -> Vec<(u32, u32)> {
    (1..=MAX_DEGREE)
        .flat_map(|degree| (0..1u32 << (degree - 1)).map(move |a| (degree, a)))
        .filter(|&(degree, a)| is_primitive(degree, a))
        .take(count)
        .collect()
}

/// Generator of quasi-random points in the unit hypercube
///
/// Implementations are expected to return `n` points of dimension `k`
/// with values in `[0, 1)`, one point per row.
pub trait SequenceGenerator {
    /// Maximum supported dimension if any
    fn max_dim(&self) -> Option<usize> {
        None
    }

    /// Generates the `(n, k)` matrix of the first `n` points of the sequence
    fn generate(&self, n: usize, k: usize) -> Result<Array2<f64>>;
}

/// Sobol sequence generator, the origin point is skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Sobol;

impl Sobol {
    /// Maximum number of dimensions supported
    pub const MAX_DIM: usize = 1111;

    fn directions(dim: usize, polynomial: (u32, u32)) -> [u32; BITS] {
        let mut v = [0u32; BITS];
        if dim == 0 {
            for (c, vc) in v.iter_mut().enumerate() {
                *vc = 1 << (BITS - 1 - c);
            }
            return v;
        }
        let (s, a) = polynomial;
        let s = s as usize;
        let m: Vec<u32> = match JOE_KUO.get(dim - 1) {
            Some((_, _, m)) => m.to_vec(),
            None => {
                let mut rng = Xoshiro256Plus::seed_from_u64(dim as u64);
                (0..s)
                    .map(|k| (rng.gen_range(0..1u32 << k) << 1) | 1)
                    .collect()
            }
        };
        for c in 0..BITS {
            v[c] = if c < s {
                m[c] << (BITS - 1 - c)
            } else {
                let mut val = v[c - s] ^ (v[c - s] >> s);
                for k in 1..s {
                    if (a >> (s - 1 - k)) & 1 == 1 {
                        val ^= v[c - k];
                    }
                }
                val
            };
        }
        v
    }
}

impl SequenceGenerator for Sobol {
    fn max_dim(&self) -> Option<usize> {
        Some(Self::MAX_DIM)
    }

    fn generate(&self, n: usize, k: usize) -> Result<Array2<f64>> {
        if k > Self::MAX_DIM {
            return Err(SamplingError::InvalidArgument(format!(
                "Sobol sequence supports up to {} dimensions, {k} requested",
                Self::MAX_DIM
            )));
        }
        if n >= u32::MAX as usize {
            return Err(SamplingError::InvalidArgument(format!(
                "Sobol sequence supports less than {} points, {n} requested",
                u32::MAX
            )));
        }
        let polynomials = primitive_polynomials(k.saturating_sub(1));
        let directions: Vec<[u32; BITS]> = (0..k)
            .map(|j| Self::directions(j, if j == 0 { (0, 0) } else { polynomials[j - 1] }))
            .collect();
        let scale = 1. / (1u64 << BITS) as f64;
        let mut x = vec![0u32; k];
        let mut points = Array2::zeros((n, k));
        for (i, mut row) in points.rows_mut().into_iter().enumerate() {
            // the point of index i + 1 derives from the point of index i
            // through the lowest zero bit of i
            let c = (!(i as u32)).trailing_zeros() as usize;
            for ((xj, dj), vj) in x.iter_mut().zip(&directions).zip(row.iter_mut()) {
                *xj ^= dj[c];
                *vj = *xj as f64 * scale;
            }
        }
        Ok(points)
    }
}
