//! Common types for the RigView environment layer.

use serde::{Deserialize, Serialize};

/// A single value stored under a field of a configuration entity.
///
/// Values are returned as-is by accessors. In particular a
/// [`FieldValue::References`] list is never resolved into proxies
/// automatically; callers go through the environment for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Whole number (angles, rates, counts)
    Integer(i64),

    /// Fractional number
    Float(f64),

    /// Boolean flag
    Bool(bool),

    /// String scalar, typically an enum tag such as `ANTENNA_TYPE_1`
    Text(String),

    /// Ordered sequence of entity ids
    References(Vec<String>),
}

impl FieldValue {
    /// Returns the integer value, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the referenced ids in declaration order.
    pub fn as_references(&self) -> Option<&[String]> {
        match self {
            FieldValue::References(ids) => Some(ids),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::Text(_) => "text",
            FieldValue::References(_) => "references",
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(ids: Vec<String>) -> Self {
        FieldValue::References(ids)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(ids: Vec<&str>) -> Self {
        FieldValue::References(ids.into_iter().map(str::to_string).collect())
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "{}", v),
            FieldValue::References(ids) => write!(f, "[{}]", ids.join(", ")),
        }
    }
}

/// Identity of a proxy entity: the (category, id) pair it is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub category: String,
    pub id: String,
}

impl EntityKey {
    pub fn new(category: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.id)
    }
}
