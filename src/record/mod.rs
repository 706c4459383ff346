//! Raw and flattened beer records
//!
//! ## Record Shapes
//!
//! ```text
//! RawRecord (nested JSON object, as delivered upstream)
//!     │
//!     │ flatten()       schema table: (group, path, output)
//!     ▼
//! FlatRecord
//!     ├── attributes: name -> Scalar      (single level, never nested)
//!     └── ingredients: raw group          (expanded later by the trimmer)
//! ```

mod flatten;
mod schema;

pub use flatten::{flatten, flatten_all};
pub use schema::{FieldPath, FLATTEN_SCHEMA, INGREDIENTS_KEY, KNOWN_GROUPS, STYLE_GROUP};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// One source entity exactly as delivered by the upstream API.
pub type RawRecord = Map<String, Value>;

/// The raw `ingredients` group: ingredient kind -> list of ingredient objects.
pub type Ingredients = Map<String, Value>;

/// A single attribute value of a flat record.
///
/// Variant order matters for `#[serde(untagged)]`: integers are tried before
/// floats so `5` stays an integer and `7.5` becomes a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// JSON boolean
    Bool(bool),
    /// JSON integer that fits in `i64`
    Integer(i64),
    /// Any other JSON number
    Float(f64),
    /// JSON string
    Text(String),
}

impl Scalar {
    /// Convert a JSON value into a scalar.
    ///
    /// Returns `None` for `null`, arrays and objects.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Convert back into a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// Numeric view of the value, if it has one.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A single-level record of scalar attributes.
///
/// The raw `ingredients` group rides along outside the attribute map until a
/// trim either expands it into boolean attributes or drops it. On disk both
/// live in the same JSON object, `ingredients` being the only non-scalar key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ingredients: Option<Ingredients>,
    #[serde(flatten)]
    attributes: BTreeMap<String, Scalar>,
}

impl FlatRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(name, value)` pairs.
    #[must_use]
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            ingredients: None,
            attributes: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Attach a raw ingredients group.
    #[must_use]
    pub fn with_ingredients(mut self, ingredients: Ingredients) -> Self {
        self.ingredients = Some(ingredients);
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.attributes.get(name)
    }

    /// Set an attribute value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Option<Scalar> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Remove an attribute.
    pub fn remove(&mut self, name: &str) -> Option<Scalar> {
        self.attributes.remove(name)
    }

    /// Whether the record carries `name`.
    ///
    /// `"ingredients"` refers to the raw ingredients group.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        if name == INGREDIENTS_KEY {
            self.ingredients.is_some()
        } else {
            self.attributes.contains_key(name)
        }
    }

    /// All scalar attributes, sorted by name.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, Scalar> {
        &self.attributes
    }

    /// Attribute names, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Raw ingredients group, if still attached.
    #[must_use]
    pub const fn ingredients(&self) -> Option<&Ingredients> {
        self.ingredients.as_ref()
    }

    /// Detach the raw ingredients group.
    pub fn take_ingredients(&mut self) -> Option<Ingredients> {
        self.ingredients.take()
    }

    /// Number of scalar attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the record has no scalar attributes and no ingredients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.ingredients.is_none()
    }

    /// Turn the record back into a raw JSON object.
    #[must_use]
    pub fn into_raw(self) -> RawRecord {
        let mut raw: RawRecord = self
            .attributes
            .into_iter()
            .map(|(k, v)| {
                let json = v.to_json();
                (k, json)
            })
            .collect();
        if let Some(ingredients) = self.ingredients {
            raw.insert(INGREDIENTS_KEY.to_string(), Value::Object(ingredients));
        }
        raw
    }
}
