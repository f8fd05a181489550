//! Conversion of unit hypercube samples into typed design points
//!
//! Every sampling method works in `[0, 1]^nx` and relies on [scale] to map
//! each unit value into the domain of its dimension.
use crate::errors::{Result, SamplingError};
use crate::types::{DesignPoint, ParameterDimension, ParameterType, Point, UnitSample, Value};
use jiff::civil::DateTime;
use jiff::SignedDuration;
use ndarray::{ArrayBase, ArrayView1, Data, Ix2};
use num_traits::ToPrimitive;
use std::collections::HashSet;

/// Maps a `unit` value in `[0, 1]` into the domain of `dim`.
///
/// When discrete values are given, the value of the `i`th bucket is returned where
/// `i` is the smallest index in `[1, m]` such that `unit <= i / m` (`m` if none),
/// `m` being the number of discrete values. Otherwise the range `[min, max]`
/// is scaled linearly according to the declared type:
///
/// * `Int`: `min + unit * (max - min)` rounded half up,
/// * `Float`: `min + unit * (max - min)`,
/// * `Date`: `min + unit * (max - min)` rounded to the second,
/// * `Point2D`, `Point3D`: float rule on each axis,
/// * `Bool`: `unit > 0.5`.
///
/// ```
/// use batch_doe::{scale, ParameterDimension, ParameterType, Value};
///
/// let dim = ParameterDimension::int("agents", 10, 20);
/// assert_eq!(scale(0.5, &dim).unwrap(), Value::Int(15));
/// let dim = ParameterDimension::among("color", ParameterType::String, ["red", "blue"]);
/// assert_eq!(scale(0.7, &dim).unwrap(), Value::from("blue"));
/// ```
pub fn scale(unit: f64, dim: &ParameterDimension) -> Result<Value> {
    if dim.is_discrete() {
        return Ok(among(unit, dim.discrete_values()).clone());
    }
    match dim.ptype() {
        ParameterType::Int => {
            let (min, max) = int_bounds(dim)?;
            let v = round_half_up(min as f64 + unit * (max as f64 - min as f64));
            v.to_i64().map(Value::Int).ok_or_else(|| {
                SamplingError::InvalidDomain(format!(
                    "value {v} of dimension '{}' overflows integer range",
                    dim.name()
                ))
            })
        }
        ParameterType::Float => {
            let (min, max) = float_bounds(dim)?;
            Ok(Value::Float(lerp(unit, min, max)))
        }
        ParameterType::Date => {
            let (min, max) = date_bounds(dim)?;
            scale_date(unit, min, max).map(Value::Date)
        }
        ParameterType::Point2D => {
            let (min, max) = point_bounds(dim)?;
            Ok(Value::Point(Point::new(
                lerp(unit, min.x, max.x),
                lerp(unit, min.y, max.y),
            )))
        }
        ParameterType::Point3D => {
            let (min, max) = point_bounds(dim)?;
            Ok(Value::Point(Point::new_3d(
                lerp(unit, min.x, max.x),
                lerp(unit, min.y, max.y),
                lerp(unit, min.z, max.z),
            )))
        }
        ParameterType::Bool => Ok(Value::Bool(unit > 0.5)),
        ParameterType::String => Err(SamplingError::InvalidDomain(format!(
            "string dimension '{}' requires discrete values",
            dim.name()
        ))),
    }
}

/// Builds the design point of a unit sample `row` given in dimension order.
pub fn scale_row(row: ArrayView1<f64>, dims: &[ParameterDimension]) -> Result<DesignPoint> {
    if row.len() != dims.len() {
        return Err(SamplingError::InvalidArgument(format!(
            "sample of size {} does not match {} dimensions",
            row.len(),
            dims.len()
        )));
    }
    dims.iter()
        .zip(row.iter())
        .map(|(dim, &unit)| Ok((dim.name().to_string(), scale(unit, dim)?)))
        .collect()
}

/// Builds the design points of a `(ns, nx)` unit doe.
pub fn scale_rows(
    doe: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    dims: &[ParameterDimension],
) -> Result<Vec<DesignPoint>> {
    doe.rows()
        .into_iter()
        .map(|row| scale_row(row, dims))
        .collect()
}

/// Names the columns of a `(ns, nx)` unit doe after the dimensions.
pub fn unit_samples(
    doe: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    dims: &[ParameterDimension],
) -> Vec<UnitSample> {
    doe.rows()
        .into_iter()
        .map(|row| {
            dims.iter()
                .zip(row.iter())
                .map(|(dim, &unit)| (dim.name().to_string(), unit))
                .collect()
        })
        .collect()
}

/// Checks that every dimension can be scaled.
///
/// Names have to be unique, ranges have to be typed after the declared type with
/// `min <= max`, string dimensions require discrete values and discrete values
/// have to match the declared type.
pub fn validate_dimensions(dims: &[ParameterDimension]) -> Result<()> {
    let mut names = HashSet::new();
    for dim in dims {
        if !names.insert(dim.name()) {
            return Err(SamplingError::InvalidArgument(format!(
                "dimension '{}' is declared twice",
                dim.name()
            )));
        }
        if dim.is_discrete() {
            if let Some(v) = dim
                .discrete_values()
                .iter()
                .find(|v| !v.is_of_type(dim.ptype()))
            {
                return Err(SamplingError::InvalidDomain(format!(
                    "value {v} is not a {} as declared by dimension '{}'",
                    dim.ptype(),
                    dim.name()
                )));
            }
            continue;
        }
        match dim.ptype() {
            ParameterType::Int => int_bounds(dim).map(|_| ())?,
            ParameterType::Float => float_bounds(dim).map(|_| ())?,
            ParameterType::Date => date_bounds(dim).map(|_| ())?,
            ParameterType::Point2D | ParameterType::Point3D => point_bounds(dim).map(|_| ())?,
            ParameterType::Bool => (),
            ParameterType::String => {
                return Err(SamplingError::InvalidDomain(format!(
                    "string dimension '{}' requires discrete values",
                    dim.name()
                )))
            }
        }
    }
    Ok(())
}

/// Ceiling bucket selection among `values`
fn among(unit: f64, values: &[Value]) -> &Value {
    let m = values.len();
    let i = (1..=m)
        .find(|&i| unit <= i as f64 / m as f64)
        .unwrap_or(m);
    &values[i - 1]
}

/// Linear interpolation giving exactly `min` at 0 and `max` at 1
fn lerp(unit: f64, min: f64, max: f64) -> f64 {
    (1. - unit) * min + unit * max
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

fn scale_date(unit: f64, min: DateTime, max: DateTime) -> Result<DateTime> {
    let span = min.duration_until(max).as_secs();
    let offset = round_half_up(unit * span as f64)
        .to_i64()
        .unwrap_or(i64::MAX);
    if offset >= span {
        return Ok(max);
    }
    Ok(min.checked_add(SignedDuration::from_secs(offset))?)
}

fn mismatch(dim: &ParameterDimension) -> SamplingError {
    SamplingError::InvalidDomain(format!(
        "bounds of dimension '{}' are not of type {}",
        dim.name(),
        dim.ptype()
    ))
}

fn check_order<T: PartialOrd + std::fmt::Debug>(
    dim: &ParameterDimension,
    min: T,
    max: T,
) -> Result<()> {
    if min > max {
        return Err(SamplingError::InvalidDomain(format!(
            "dimension '{}' has min {min:?} greater than max {max:?}",
            dim.name()
        )));
    }
    Ok(())
}

pub(crate) fn int_bounds(dim: &ParameterDimension) -> Result<(i64, i64)> {
    match dim.bounds()? {
        (Value::Int(min), Value::Int(max)) => {
            check_order(dim, min, max)?;
            Ok((*min, *max))
        }
        _ => Err(mismatch(dim)),
    }
}

pub(crate) fn float_bounds(dim: &ParameterDimension) -> Result<(f64, f64)> {
    let as_float = |v: &Value| match v {
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f64),
        _ => None,
    };
    let (min, max) = dim.bounds()?;
    match (as_float(min), as_float(max)) {
        (Some(min), Some(max)) if min.is_finite() && max.is_finite() => {
            check_order(dim, min, max)?;
            Ok((min, max))
        }
        (Some(_), Some(_)) => Err(SamplingError::InvalidDomain(format!(
            "dimension '{}' requires finite bounds",
            dim.name()
        ))),
        _ => Err(mismatch(dim)),
    }
}

pub(crate) fn date_bounds(dim: &ParameterDimension) -> Result<(DateTime, DateTime)> {
    match dim.bounds()? {
        (Value::Date(min), Value::Date(max)) => {
            check_order(dim, min, max)?;
            Ok((*min, *max))
        }
        _ => Err(mismatch(dim)),
    }
}

pub(crate) fn point_bounds(dim: &ParameterDimension) -> Result<(Point, Point)> {
    match dim.bounds()? {
        (Value::Point(min), Value::Point(max)) => {
            for (lo, hi) in min.coords().into_iter().zip(max.coords()) {
                check_order(dim, lo, hi)?;
            }
            Ok((*min, *max))
        }
        _ => Err(mismatch(dim)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use jiff::civil::date;
    use ndarray::array;

    fn abc() -> ParameterDimension {
        ParameterDimension::among("letter", ParameterType::String, ["a", "b", "c"])
    }

    #[test]
    fn test_discrete_ceiling_buckets() {
        let dim = abc();
        assert_eq!(scale(0.0, &dim).unwrap(), Value::from("a"));
        assert_eq!(scale(0.33, &dim).unwrap(), Value::from("a"));
        assert_eq!(scale(1. / 3., &dim).unwrap(), Value::from("a"));
        assert_eq!(scale(0.34, &dim).unwrap(), Value::from("b"));
        assert_eq!(scale(0.35, &dim).unwrap(), Value::from("b"));
        assert_eq!(scale(0.99, &dim).unwrap(), Value::from("c"));
        assert_eq!(scale(1.0, &dim).unwrap(), Value::from("c"));
    }

    #[test]
    fn test_discrete_takes_precedence() {
        let dim = ParameterDimension::among("n", ParameterType::Int, [1i64, 10, 100]);
        assert_eq!(scale(0.9, &dim).unwrap(), Value::Int(100));
    }

    #[test]
    fn test_int_boundaries_and_rounding() {
        let dim = ParameterDimension::int("i", -3, 7);
        assert_eq!(scale(0., &dim).unwrap(), Value::Int(-3));
        assert_eq!(scale(1., &dim).unwrap(), Value::Int(7));
        // -3 + 0.25 * 10 = -0.5 rounds half up
        assert_eq!(scale(0.25, &dim).unwrap(), Value::Int(0));
        assert_eq!(scale(0.36, &dim).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_float_boundaries() {
        let dim = ParameterDimension::float("f", 0.1, 0.3);
        assert_eq!(scale(0., &dim).unwrap(), Value::Float(0.1));
        assert_eq!(scale(1., &dim).unwrap(), Value::Float(0.3));
        match scale(0.5, &dim).unwrap() {
            Value::Float(v) => assert_abs_diff_eq!(v, 0.2, epsilon = 1e-12),
            v => panic!("unexpected {v:?}"),
        }
    }

    #[test]
    fn test_date_scaling() {
        let min = date(2020, 1, 1).at(0, 0, 0, 0);
        let max = date(2020, 1, 2).at(0, 0, 0, 0);
        let dim = ParameterDimension::date("d", min, max);
        assert_eq!(scale(0., &dim).unwrap(), Value::Date(min));
        assert_eq!(scale(1., &dim).unwrap(), Value::Date(max));
        assert_eq!(
            scale(0.5, &dim).unwrap(),
            Value::Date(date(2020, 1, 1).at(12, 0, 0, 0))
        );
    }

    #[test]
    fn test_point_scaling() {
        let dim = ParameterDimension::point2d("p", Point::new(0., 10.), Point::new(10., 20.));
        assert_eq!(scale(0.5, &dim).unwrap(), Value::Point(Point::new(5., 15.)));
        let dim = ParameterDimension::point3d(
            "p",
            Point::new_3d(0., 0., -1.),
            Point::new_3d(1., 2., 1.),
        );
        assert_eq!(
            scale(1., &dim).unwrap(),
            Value::Point(Point::new_3d(1., 2., 1.))
        );
    }

    #[test]
    fn test_bool_scaling() {
        let dim = ParameterDimension::boolean("b");
        assert_eq!(scale(0.5, &dim).unwrap(), Value::Bool(false));
        assert_eq!(scale(0.51, &dim).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_invalid_domains() {
        let dim = ParameterDimension::new("s", ParameterType::String, "a", "z");
        assert!(matches!(
            scale(0.5, &dim),
            Err(SamplingError::InvalidDomain(_))
        ));
        let dim = ParameterDimension::float("f", 2., 1.);
        assert!(matches!(
            validate_dimensions(&[dim]),
            Err(SamplingError::InvalidDomain(_))
        ));
        let dim = ParameterDimension::new("i", ParameterType::Int, 0.5, 2.);
        assert!(matches!(
            scale(0.5, &dim),
            Err(SamplingError::InvalidDomain(_))
        ));
        let dim = ParameterDimension::among("i", ParameterType::Int, [1.5, 2.5]);
        assert!(matches!(
            validate_dimensions(&[dim]),
            Err(SamplingError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let dims = [
            ParameterDimension::float("x", 0., 1.),
            ParameterDimension::int("x", 0, 1),
        ];
        assert!(matches!(
            validate_dimensions(&dims),
            Err(SamplingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_scale_rows_keeps_dimension_order() {
        let dims = [
            ParameterDimension::float("z", 0., 2.),
            ParameterDimension::int("a", 0, 10),
            abc(),
        ];
        let points = scale_rows(&array![[0.5, 0.5, 0.5], [1., 0., 0.]], &dims).unwrap();
        assert_eq!(points.len(), 2);
        for p in &points {
            assert_eq!(p.names().collect::<Vec<_>>(), vec!["z", "a", "letter"]);
        }
        assert_eq!(points[0].get("a"), Some(&Value::Int(5)));
        assert_eq!(points[1].get("z"), Some(&Value::Float(2.)));
    }
}
