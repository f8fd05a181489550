use crate::errors::{Result, SamplingError};
use crate::scaler::{date_bounds, float_bounds, int_bounds, point_bounds, validate_dimensions};
use crate::types::{DesignPoint, ParameterDimension, ParameterType, Point, Value};
use crate::utils::cartesian_product;
use jiff::SignedDuration;
use log::{debug, info};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Number of steps used to sweep a range when no step is given
const DEFAULT_STEP_FACTOR: f64 = 10.;

/// Tolerance on the number of steps fitting in a range
const STEP_EPSILON: f64 = 1e-9;

/// The Exhaustive design sweeps every dimension with its step and
/// combines all the values, the first dimension varying slowest.
///
/// Sweep values of a dimension are:
/// * its discrete values when given,
/// * `false` then `true` for a boolean,
/// * values from min to max by step otherwise (from max to min when the step is negative),
///   the bound opposite to the start being excluded for dates.
///
/// Without step, integer ranges are swept by 1 up to a range of 10 and by a tenth of the
/// range above, other ranges are swept by a tenth of their range.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Exhaustive {
    /// Parameter space definition
    dims: Vec<ParameterDimension>,
}

impl Exhaustive {
    /// Constructor given the dimensions of the parameter space
    ///
    /// ```
    /// use batch_doe::{Exhaustive, ParameterDimension};
    ///
    /// let dims = [ParameterDimension::int("n", 0, 4).with_step(3i64), ParameterDimension::boolean("b")];
    /// let doe = Exhaustive::new(&dims).sample().unwrap();
    /// assert_eq!(doe.len(), 4);
    /// ```
    pub fn new(dims: &[ParameterDimension]) -> Self {
        Exhaustive {
            dims: dims.to_vec(),
        }
    }

    /// Dimensions of the parameter space
    pub fn sampling_space(&self) -> &[ParameterDimension] {
        &self.dims
    }

    /// Generates the design points of every combination of sweep values.
    ///
    /// An empty parameter space gives a single empty design point.
    pub fn sample(&self) -> Result<Vec<DesignPoint>> {
        validate_dimensions(&self.dims)?;
        let values = self
            .dims
            .iter()
            .map(sweep_values)
            .collect::<Result<Vec<_>>>()?;
        for (dim, v) in self.dims.iter().zip(&values) {
            debug!("Exhaustive sweep of '{}': {} values", dim.name(), v.len());
        }
        let combinations = cartesian_product(&values);
        info!(
            "Exhaustive design of {} points over {} dimensions",
            combinations.len(),
            self.dims.len()
        );
        Ok(combinations
            .into_iter()
            .map(|combination| {
                self.dims
                    .iter()
                    .map(|dim| dim.name().to_string())
                    .zip(combination)
                    .collect()
            })
            .collect())
    }
}

/// Values taken by `dim` in an exhaustive exploration
pub fn sweep_values(dim: &ParameterDimension) -> Result<Vec<Value>> {
    if dim.is_discrete() {
        return Ok(dim.discrete_values().to_vec());
    }
    match dim.ptype() {
        ParameterType::Bool => Ok(vec![Value::Bool(false), Value::Bool(true)]),
        ParameterType::Int => int_sweep(dim),
        ParameterType::Float => {
            let (min, max) = float_bounds(dim)?;
            let step = match dim.step() {
                Some(step) => float_step(dim, step)?,
                None => (max - min) / DEFAULT_STEP_FACTOR,
            };
            Ok(float_sweep(min, max, step)
                .into_iter()
                .map(Value::Float)
                .collect())
        }
        ParameterType::Date => date_sweep(dim),
        ParameterType::Point2D | ParameterType::Point3D => point_sweep(dim),
        ParameterType::String => Err(SamplingError::InvalidDomain(format!(
            "string dimension '{}' requires discrete values",
            dim.name()
        ))),
    }
}

fn zero_step(dim: &ParameterDimension) -> SamplingError {
    SamplingError::InvalidDomain(format!("dimension '{}' has a zero step", dim.name()))
}

fn float_step(dim: &ParameterDimension, step: &Value) -> Result<f64> {
    let step = match step {
        Value::Float(s) => *s,
        Value::Int(s) => *s as f64,
        _ => {
            return Err(SamplingError::InvalidDomain(format!(
                "step of dimension '{}' should be a number",
                dim.name()
            )))
        }
    };
    if step == 0. || !step.is_finite() {
        return Err(zero_step(dim));
    }
    Ok(step)
}

/// Number of values of a sweep of `range` by `step`
fn sweep_len(range: f64, step: f64) -> usize {
    if range == 0. || step == 0. {
        1
    } else {
        (range / step.abs() + STEP_EPSILON).floor() as usize + 1
    }
}

fn float_sweep(min: f64, max: f64, step: f64) -> Vec<f64> {
    let n = sweep_len(max - min, step);
    (0..n)
        .map(|i| {
            if step >= 0. {
                min + i as f64 * step
            } else {
                max + i as f64 * step
            }
        })
        .collect()
}

fn int_sweep(dim: &ParameterDimension) -> Result<Vec<Value>> {
    let (min, max) = int_bounds(dim)?;
    let range = max as f64 - min as f64;
    let step = match dim.step() {
        Some(step) => float_step(dim, step)?,
        None if range > DEFAULT_STEP_FACTOR => range / DEFAULT_STEP_FACTOR,
        None => 1.,
    };
    // e.g. min = 0, max = 4 and step = 3 gives [0, 3]
    let n = (range / step.abs()).trunc() as usize;
    let start = if step >= 0. { min } else { max };
    Ok((0..=n)
        .map(|i| Value::Int(start + (step * i as f64).trunc() as i64))
        .collect())
}

fn date_sweep(dim: &ParameterDimension) -> Result<Vec<Value>> {
    let (min, max) = date_bounds(dim)?;
    let span = min.duration_until(max).as_secs();
    let step = match dim.step() {
        Some(step) => float_step(dim, step)?.round() as i64,
        None => (span as f64 / DEFAULT_STEP_FACTOR).round().max(1.) as i64,
    };
    if step == 0 {
        return Err(zero_step(dim));
    }
    // a sweep stops before reaching the opposite bound
    let n = if span == 0 {
        1
    } else {
        (span + step.abs() - 1) / step.abs()
    };
    (0..n)
        .map(|i| {
            let offset = SignedDuration::from_secs(step * i as i64);
            let date = if step > 0 {
                min.checked_add(offset)?
            } else {
                max.checked_add(offset)?
            };
            Ok(Value::Date(date))
        })
        .collect()
}

fn point_sweep(dim: &ParameterDimension) -> Result<Vec<Value>> {
    let (min, max) = point_bounds(dim)?;
    let three_d = dim.ptype() == ParameterType::Point3D;
    let ranges = [max.x - min.x, max.y - min.y, if three_d { max.z - min.z } else { 0. }];
    let steps = match dim.step() {
        Some(Value::Point(p)) => p.coords(),
        Some(step) => [float_step(dim, step)?; 3],
        None => ranges.map(|r| r / DEFAULT_STEP_FACTOR),
    };
    if ranges.iter().zip(&steps).any(|(&r, &s)| r > 0. && s == 0.) {
        return Err(zero_step(dim));
    }
    let descending = steps.iter().any(|&s| s < 0.);
    let n = ranges
        .iter()
        .zip(&steps)
        .filter(|&(&r, _)| r > 0.)
        .map(|(&r, &s)| sweep_len(r, s))
        .min()
        .unwrap_or(1);
    let (start, sign) = if descending { (max, -1.) } else { (min, 1.) };
    Ok((0..n)
        .map(|i| {
            let t = sign * i as f64;
            let z = if three_d { start.z + t * steps[2].abs() } else { 0. };
            Value::Point(Point::new_3d(
                start.x + t * steps[0].abs(),
                start.y + t * steps[1].abs(),
                z,
            ))
        })
        .collect())
}
