use crate::errors::{Result, SamplingError};
use jiff::civil::DateTime;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Declared type of a parameter dimension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum ParameterType {
    /// Integer values
    Int,
    /// Floating point values
    Float,
    /// Boolean values
    Bool,
    /// String values, only sampled among discrete values
    String,
    /// Date values with a one second resolution
    Date,
    /// Points in the plane
    Point2D,
    /// Points in space
    Point3D,
}

impl FromStr for ParameterType {
    type Err = SamplingError;

    /// Parses a type name as found in experiment descriptions (`int`, `float`, `point`, ...)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(ParameterType::Int),
            "float" | "double" => Ok(ParameterType::Float),
            "bool" | "boolean" => Ok(ParameterType::Bool),
            "string" => Ok(ParameterType::String),
            "date" => Ok(ParameterType::Date),
            "point" | "point2d" => Ok(ParameterType::Point2D),
            "point3d" => Ok(ParameterType::Point3D),
            other => Err(SamplingError::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ParameterType::Int => "int",
            ParameterType::Float => "float",
            ParameterType::Bool => "bool",
            ParameterType::String => "string",
            ParameterType::Date => "date",
            ParameterType::Point2D => "point2d",
            ParameterType::Point3D => "point3d",
        };
        write!(f, "{name}")
    }
}

/// A point in 2D or 3D space (`z` is 0 for 2D points)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Point {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// z coordinate
    pub z: f64,
}

impl Point {
    /// Constructor of a 2D point
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y, z: 0. }
    }

    /// Constructor of a 3D point
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    pub(crate) fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// A concrete parameter value
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum Value {
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// String value
    String(String),
    /// Date value
    Date(DateTime),
    /// 2D or 3D point value
    Point(Point),
}

impl Value {
    /// Returns the parameter type matching this value.
    ///
    /// Points are reported as [ParameterType::Point3D] as the variant does not
    /// carry its dimension.
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Value::Int(_) => ParameterType::Int,
            Value::Float(_) => ParameterType::Float,
            Value::Bool(_) => ParameterType::Bool,
            Value::String(_) => ParameterType::String,
            Value::Date(_) => ParameterType::Date,
            Value::Point(_) => ParameterType::Point3D,
        }
    }

    /// Whether the value can be held by a dimension of type `ptype`
    pub fn is_of_type(&self, ptype: ParameterType) -> bool {
        matches!(
            (self, ptype),
            (Value::Int(_), ParameterType::Int)
                | (Value::Float(_), ParameterType::Float)
                | (Value::Bool(_), ParameterType::Bool)
                | (Value::String(_), ParameterType::String)
                | (Value::Date(_), ParameterType::Date)
                | (Value::Point(_), ParameterType::Point2D | ParameterType::Point3D)
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
            Value::Point(p) => write!(f, "{{{}, {}, {}}}", p.x, p.y, p.z),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<DateTime> for Value {
    fn from(v: DateTime) -> Self {
        Value::Date(v)
    }
}

impl From<Point> for Value {
    fn from(v: Point) -> Self {
        Value::Point(v)
    }
}

/// A named dimension of the parameter space to be explored
///
/// The domain is either a `[min, max]` range (with an optional `step` used by
/// exhaustive exploration) or an ordered list of discrete values which, when
/// not empty, takes precedence over the range.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct ParameterDimension {
    name: String,
    ptype: ParameterType,
    min: Option<Value>,
    max: Option<Value>,
    step: Option<Value>,
    discrete_values: Vec<Value>,
}

impl ParameterDimension {
    /// Constructor of a range dimension
    pub fn new(
        name: impl Into<String>,
        ptype: ParameterType,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        ParameterDimension {
            name: name.into(),
            ptype,
            min: Some(min.into()),
            max: Some(max.into()),
            step: None,
            discrete_values: vec![],
        }
    }

    /// Integer dimension in `[min, max]`
    pub fn int(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(name, ParameterType::Int, min, max)
    }

    /// Float dimension in `[min, max]`
    pub fn float(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(name, ParameterType::Float, min, max)
    }

    /// Boolean dimension
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Bool, false, true)
    }

    /// Date dimension in `[min, max]`
    pub fn date(name: impl Into<String>, min: DateTime, max: DateTime) -> Self {
        Self::new(name, ParameterType::Date, min, max)
    }

    /// Point dimension in the rectangle defined by `min` and `max` corners
    pub fn point2d(name: impl Into<String>, min: Point, max: Point) -> Self {
        Self::new(name, ParameterType::Point2D, min, max)
    }

    /// Point dimension in the box defined by `min` and `max` corners
    pub fn point3d(name: impl Into<String>, min: Point, max: Point) -> Self {
        Self::new(name, ParameterType::Point3D, min, max)
    }

    /// Dimension taking its values among the given ordered list
    pub fn among<V: Into<Value>>(
        name: impl Into<String>,
        ptype: ParameterType,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        ParameterDimension {
            name: name.into(),
            ptype,
            min: None,
            max: None,
            step: None,
            discrete_values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the step used to sweep the range in exhaustive exploration
    pub fn with_step(mut self, step: impl Into<Value>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Name of the dimension
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn ptype(&self) -> ParameterType {
        self.ptype
    }

    /// Lower bound if any
    pub fn min(&self) -> Option<&Value> {
        self.min.as_ref()
    }

    /// Upper bound if any
    pub fn max(&self) -> Option<&Value> {
        self.max.as_ref()
    }

    /// Sweep step if any
    pub fn step(&self) -> Option<&Value> {
        self.step.as_ref()
    }

    /// Discrete values, empty for range dimensions
    pub fn discrete_values(&self) -> &[Value] {
        &self.discrete_values
    }

    /// Whether values are taken among discrete values
    pub fn is_discrete(&self) -> bool {
        !self.discrete_values.is_empty()
    }

    pub(crate) fn bounds(&self) -> Result<(&Value, &Value)> {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => Ok((min, max)),
            _ => Err(SamplingError::InvalidDomain(format!(
                "dimension '{}' of type {} requires both min and max values",
                self.name, self.ptype
            ))),
        }
    }
}

/// An ordered mapping from dimension names to values
///
/// Entries keep the order of the dimensions the point was built from.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct NamedPoint<T> {
    entries: Vec<(String, T)>,
}

/// A fully typed assignment of values to all parameter dimensions
pub type DesignPoint = NamedPoint<Value>;

/// A point of the unit hypercube indexed by dimension names
pub type UnitSample = NamedPoint<f64>;

impl<T> NamedPoint<T> {
    /// Value of the dimension `name`
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Names in dimension order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Values in dimension order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// (name, value) pairs in dimension order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of dimensions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the point has no dimension
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for NamedPoint<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        NamedPoint {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for NamedPoint<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_names() {
        assert_eq!(ParameterType::from_str("int").unwrap(), ParameterType::Int);
        assert_eq!(
            ParameterType::from_str(" Point ").unwrap(),
            ParameterType::Point2D
        );
        assert_eq!(ParameterType::from_str("date").unwrap(), ParameterType::Date);
        assert!(matches!(
            ParameterType::from_str("list"),
            Err(SamplingError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_named_point_order() {
        let p: DesignPoint = vec![
            ("b".to_string(), Value::Int(1)),
            ("a".to_string(), Value::Bool(true)),
        ]
        .into_iter()
        .collect();
        assert_eq!(p.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(p.get("a"), Some(&Value::Bool(true)));
        assert_eq!(p.get("c"), None);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_value_types() {
        assert!(Value::Point(Point::new(1., 2.)).is_of_type(ParameterType::Point2D));
        assert!(Value::from("x").is_of_type(ParameterType::String));
        assert!(!Value::Float(1.).is_of_type(ParameterType::Int));
    }

    #[cfg(feature = "serializable")]
    #[test]
    fn test_serialize_design_point() {
        let p: DesignPoint = vec![
            ("n".to_string(), Value::Int(3)),
            ("s".to_string(), Value::from("red")),
            ("p".to_string(), Value::Point(Point::new(1., 2.))),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&p).unwrap();
        let q: DesignPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(p, q);
        assert_eq!(q.names().collect::<Vec<_>>(), vec!["n", "s", "p"]);
    }
}
