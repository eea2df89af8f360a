use super::escape::{escape, unescape};
use crate::errors::SpecError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// A bound of a range filter: a number, or a date given as a string.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RangeValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RangeValue {
    /// Compare two bounds if both are literals of the same kind. Text is only
    /// comparable when both sides are RFC 3339 timestamps, since the service
    /// also understands relative dates such as `now-1d`.
    fn literal_cmp(&self, other: &RangeValue) -> Option<Ordering> {
        match (self, other) {
            (RangeValue::Int(a), RangeValue::Int(b)) => Some(a.cmp(b)),
            (RangeValue::Text(a), RangeValue::Text(b)) => {
                let a = OffsetDateTime::parse(a, &Rfc3339).ok()?;
                let b = OffsetDateTime::parse(b, &Rfc3339).ok()?;
                Some(a.cmp(&b))
            }
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            RangeValue::Int(i) => Some(*i as f64),
            RangeValue::Float(f) => Some(*f),
            RangeValue::Text(_) => None,
        }
    }

    /// JSON has no representation of NaN or infinity.
    fn is_finite(&self) -> bool {
        !matches!(self, RangeValue::Float(f) if !f.is_finite())
    }
}

impl From<i64> for RangeValue {
    fn from(value: i64) -> Self {
        RangeValue::Int(value)
    }
}

impl From<i32> for RangeValue {
    fn from(value: i32) -> Self {
        RangeValue::Int(value.into())
    }
}

impl From<u32> for RangeValue {
    fn from(value: u32) -> Self {
        RangeValue::Int(value.into())
    }
}

impl From<f64> for RangeValue {
    fn from(value: f64) -> Self {
        RangeValue::Float(value)
    }
}

impl From<&str> for RangeValue {
    fn from(value: &str) -> Self {
        RangeValue::Text(value.to_string())
    }
}

impl From<String> for RangeValue {
    fn from(value: String) -> Self {
        RangeValue::Text(value)
    }
}

/// Lower bound of a range filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Lower {
    /// Greater than
    Gt(RangeValue),
    /// Greater than or equal to
    Gte(RangeValue),
}

/// Upper bound of a range filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Upper {
    /// Less than
    Lt(RangeValue),
    /// Less than or equal to
    Lte(RangeValue),
}

impl Lower {
    pub fn gt(value: impl Into<RangeValue>) -> Self {
        Lower::Gt(value.into())
    }

    pub fn gte(value: impl Into<RangeValue>) -> Self {
        Lower::Gte(value.into())
    }

    fn entry(&self) -> (&'static str, &RangeValue) {
        match self {
            Lower::Gt(v) => ("gt", v),
            Lower::Gte(v) => ("gte", v),
        }
    }
}

impl Upper {
    pub fn lt(value: impl Into<RangeValue>) -> Self {
        Upper::Lt(value.into())
    }

    pub fn lte(value: impl Into<RangeValue>) -> Self {
        Upper::Lte(value.into())
    }

    fn entry(&self) -> (&'static str, &RangeValue) {
        match self {
            Upper::Lt(v) => ("lt", v),
            Upper::Lte(v) => ("lte", v),
        }
    }
}

/// Validated bounds of a range filter. At least one bound is present.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBounds {
    lower: Option<Lower>,
    upper: Option<Upper>,
}

impl RangeBounds {
    pub fn new(
        field: &str,
        lower: Option<Lower>,
        upper: Option<Upper>,
    ) -> Result<Self, SpecError> {
        let invalid = |reason: &str| SpecError::InvalidRange {
            field: field.to_string(),
            reason: reason.to_string(),
        };
        if lower.is_none() && upper.is_none() {
            return Err(invalid("at least one bound is required"));
        }
        let lower_value = lower.as_ref().map(|l| l.entry().1);
        let upper_value = upper.as_ref().map(|u| u.entry().1);
        if !lower_value.into_iter().chain(upper_value).all(RangeValue::is_finite) {
            return Err(invalid("bound is not a finite number"));
        }
        if let (Some(l), Some(u)) = (lower_value, upper_value) {
            if l.literal_cmp(u) == Some(Ordering::Greater) {
                return Err(invalid("lower bound is greater than upper bound"));
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> Option<&Lower> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Option<&Upper> {
        self.upper.as_ref()
    }

    fn entries(&self) -> impl Iterator<Item = (&'static str, &RangeValue)> + Clone + '_ {
        let lower = self.lower.as_ref().map(Lower::entry);
        let upper = self.upper.as_ref().map(Upper::entry);
        lower.into_iter().chain(upper)
    }
}

impl Serialize for RangeBounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries())
    }
}

/// A sub-filter of a `bool.must` list.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Exact match on one field. The field name is stored escaped.
    Match { field: String, value: Value },
    /// Range filter on one field. The field name is stored escaped.
    Range { field: String, bounds: RangeBounds },
    /// Nested list of clauses which must all hold.
    Must(Vec<Clause>),
}

impl Clause {
    pub fn matching(field: &str, value: impl Into<Value>) -> Self {
        Clause::Match {
            field: escape(field),
            value: value.into(),
        }
    }

    pub fn range(
        field: &str,
        lower: Option<Lower>,
        upper: Option<Upper>,
    ) -> Result<Self, SpecError> {
        let bounds = RangeBounds::new(field, lower, upper)?;
        Ok(Clause::Range {
            field: escape(field),
            bounds,
        })
    }

    pub fn must(clauses: impl IntoIterator<Item = Clause>) -> Self {
        Clause::Must(clauses.into_iter().collect())
    }
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Clause::Match { field, value } => {
                map.serialize_entry("match", &Unescaped::one(field, value))?
            }
            Clause::Range { field, bounds } => {
                map.serialize_entry("range", &Unescaped::one(field, bounds))?
            }
            Clause::Must(clauses) => map.serialize_entry("bool", &MustList(clauses))?,
        }
        map.end()
    }
}

/// `{"must": [...]}`
pub(super) struct MustList<'a>(pub &'a [Clause]);

impl Serialize for MustList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("must", self.0)?;
        map.end()
    }
}

/// Serializes escaped keys using their original field names.
pub(super) struct Unescaped<I>(pub I);

impl<'a, V: 'a> Unescaped<std::iter::Once<(&'a String, &'a V)>> {
    fn one(field: &'a String, value: &'a V) -> Self {
        Unescaped(std::iter::once((field, value)))
    }
}

impl<'a, I, V> Serialize for Unescaped<I>
where
    I: Iterator<Item = (&'a String, &'a V)> + Clone,
    V: Serialize + 'a,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.clone().map(|(k, v)| (unescape(k), v)))
    }
}
