//! Data-point identifiers, values, and metadata.

use core::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IdError;

/// Validated, dot-delimited identifier of a data point in the state tree.
///
/// An identifier is a non-empty sequence of segments joined by `.`, where
/// each segment consists of alphanumeric characters and `_` only. Instances
/// can only be obtained through the validating constructors, so holding a
/// `PointId` is proof that the path is well formed; downstream code never
/// concatenates id strings by hand.
///
/// Identifiers are stable: the same location configuration produces the same
/// ids on every run, and an id is never reused for a different meaning.
///
/// # Examples
///
/// ```
/// use meteotree_types::PointId;
///
/// let id = PointId::new(["berlin", "current", "temperature_2m"]).unwrap();
/// assert_eq!(id.as_str(), "berlin.current.temperature_2m");
/// assert_eq!(id.root(), "berlin");
///
/// let hour = id.join("extra").unwrap();
/// assert_eq!(hour.as_str(), "berlin.current.temperature_2m.extra");
///
/// assert!(PointId::new(["bad segment"]).is_err());
/// assert!("a..b".parse::<PointId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct PointId(String);

impl PointId {
    /// Build an identifier from an ordered list of segments.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] for an empty list,
    /// [`IdError::EmptySegment`] for a zero-length segment, and
    /// [`IdError::InvalidCharacter`] for a segment containing anything other
    /// than alphanumerics and `_`.
    pub fn new<I, S>(segments: I) -> Result<Self, IdError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = String::new();
        let mut any = false;
        for segment in segments {
            let segment = segment.as_ref();
            Self::validate_segment(segment)?;
            if any {
                path.push('.');
            }
            path.push_str(segment);
            any = true;
        }
        if !any {
            return Err(IdError::Empty);
        }
        Ok(PointId(path))
    }

    /// Parse a dotted identifier string, validating every segment.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`PointId::new`].
    pub fn parse(id: &str) -> Result<Self, IdError> {
        if id.is_empty() {
            return Err(IdError::Empty);
        }
        for segment in id.split('.') {
            if segment.is_empty() {
                return Err(IdError::EmptySegment(id.to_string()));
            }
            Self::validate_segment(segment)?;
        }
        Ok(PointId(id.to_string()))
    }

    /// Append one segment, producing a child identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::EmptySegment`] or [`IdError::InvalidCharacter`]
    /// when the segment is not well formed.
    pub fn join(&self, segment: &str) -> Result<Self, IdError> {
        Self::validate_segment(segment)?;
        let mut path = String::with_capacity(self.0.len() + 1 + segment.len());
        path.push_str(&self.0);
        path.push('.');
        path.push_str(segment);
        Ok(PointId(path))
    }

    /// The full dotted path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterator over the path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// The first segment (the subtree the point belongs to).
    #[must_use]
    pub fn root(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// Whether `other` lies in the subtree rooted at `self`.
    ///
    /// True when the ids are equal or `other` extends `self` across a
    /// segment boundary. `a.b` contains `a.b.c` but not `a.bc.d`.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteotree_types::PointId;
    ///
    /// let root: PointId = "berlin.forecast".parse().unwrap();
    /// assert!(root.contains(&"berlin.forecast.day0.sunrise".parse().unwrap()));
    /// assert!(root.contains(&"berlin.forecast".parse().unwrap()));
    /// assert!(!root.contains(&"berlin.forecastx.day0".parse().unwrap()));
    /// ```
    #[must_use]
    pub fn contains(&self, other: &PointId) -> bool {
        other.0 == self.0
            || (other.0.len() > self.0.len()
                && other.0.starts_with(&self.0)
                && other.0.as_bytes()[self.0.len()] == b'.')
    }

    fn validate_segment(segment: &str) -> Result<(), IdError> {
        if segment.is_empty() {
            return Err(IdError::EmptySegment(segment.to_string()));
        }
        if let Some(ch) = segment.chars().find(|c| !c.is_alphanumeric() && *c != '_') {
            return Err(IdError::InvalidCharacter {
                segment: segment.to_string(),
                ch,
            });
        }
        Ok(())
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PointId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PointId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PointId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for PointId {
    type Error = IdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PointId> for String {
    fn from(id: PointId) -> Self {
        id.0
    }
}

/// Runtime type of a data-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ValueKind {
    /// Floating-point number.
    Number,
    /// UTF-8 string.
    Text,
    /// Boolean flag.
    Bool,
}

impl ValueKind {
    /// Lowercase name as stored in point metadata.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::Text => "text",
            ValueKind::Bool => "bool",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation role of a data point.
///
/// Raw snapshot fields carry [`Role::Value`]; derived companion points
/// declare how their content should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    /// A measured or forecast value.
    Value,
    /// Human-readable text (classifications, weekday names, times of day).
    Text,
    /// A relative or absolute URL, typically an icon path.
    Url,
    /// A calendar date or timestamp rendered as text.
    Date,
}

impl Role {
    /// Lowercase name as stored in point metadata.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Value => "value",
            Role::Text => "text",
            Role::Url => "url",
            Role::Date => "date",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value written to a data point on every sync cycle.
///
/// Serialized untagged, so the JSON form is the bare number, string, or
/// boolean.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PointValue {
    /// Floating-point number.
    Number(f64),
    /// UTF-8 string.
    Text(String),
    /// Boolean flag.
    Bool(bool),
}

impl PointValue {
    /// The runtime kind of this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteotree_types::{PointValue, ValueKind};
    ///
    /// assert_eq!(PointValue::Number(9.3).kind(), ValueKind::Number);
    /// assert_eq!(PointValue::from("E").kind(), ValueKind::Text);
    /// assert_eq!(PointValue::Bool(true).kind(), ValueKind::Bool);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            PointValue::Number(_) => ValueKind::Number,
            PointValue::Text(_) => ValueKind::Text,
            PointValue::Bool(_) => ValueKind::Bool,
        }
    }

    /// Numeric content, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PointValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text content, if this is a string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PointValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a flag.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PointValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for PointValue {
    fn from(value: f64) -> Self {
        PointValue::Number(value)
    }
}

impl From<&str> for PointValue {
    fn from(value: &str) -> Self {
        PointValue::Text(value.to_string())
    }
}

impl From<String> for PointValue {
    fn from(value: String) -> Self {
        PointValue::Text(value)
    }
}

impl From<bool> for PointValue {
    fn from(value: bool) -> Self {
        PointValue::Bool(value)
    }
}

impl fmt::Display for PointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointValue::Number(n) => write!(f, "{n}"),
            PointValue::Text(s) => f.write_str(s),
            PointValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Metadata defined once per data point.
///
/// Defined through the create-once path when a point is first seen in a
/// process; the store treats a repeated definition with unchanged content
/// as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointMeta {
    /// Expected value type.
    pub kind: ValueKind,
    /// Presentation role.
    pub role: Role,
    /// Display unit, when the point has one.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: Option<String>,
    /// Translated display label.
    pub label: String,
}

impl PointMeta {
    /// Metadata without a unit.
    pub fn new(kind: ValueKind, role: Role, label: impl Into<String>) -> Self {
        Self {
            kind,
            role,
            unit: None,
            label: label.into(),
        }
    }

    /// Attach a display unit.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}
