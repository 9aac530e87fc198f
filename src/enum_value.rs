use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The payload carried by an enumerator.
///
/// `EnumValue` is a closed set of variants with equality and hashing
/// defined per variant, so it can key the value index of a
/// [`Registry`](crate::Registry).
///
/// - Floats compare and hash by bit pattern.
/// - Structured payloads compare structurally and hash by their JSON text.
/// - `Int(1)` and `UInt(1)` are different values; unsigned integers are the
///   representation used for flag masks.
///
/// # Examples
///
/// ```
/// use enumerators::EnumValue;
///
/// assert_eq!(EnumValue::from(1), EnumValue::Int(1));
/// assert_ne!(EnumValue::Int(1), EnumValue::UInt(1));
/// assert_eq!(EnumValue::Float(2.0).normalized(), EnumValue::Int(2));
/// ```
#[derive(Clone, Debug, Default)]
pub enum EnumValue {
    /// No value.
    #[default]
    Null,
    /// A signed integer.
    Int(i64),
    /// An unsigned integer, typically a bit mask.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A text value.
    Text(String),
    /// A boolean value.
    Bool(bool),
    /// Arbitrary structured data (JSON arrays and objects).
    Structured(serde_json::Value),
}

/// The kind of an [`EnumValue`], used to constrain loaded values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    /// Both signed and unsigned integers.
    Integer,
    Float,
    Text,
    Boolean,
    Structured,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
            ValueKind::Structured => "structured",
        };
        f.write_str(name)
    }
}

impl EnumValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            EnumValue::Null => ValueKind::Null,
            EnumValue::Int(_) | EnumValue::UInt(_) => ValueKind::Integer,
            EnumValue::Float(_) => ValueKind::Float,
            EnumValue::Text(_) => ValueKind::Text,
            EnumValue::Bool(_) => ValueKind::Boolean,
            EnumValue::Structured(_) => ValueKind::Structured,
        }
    }

    /// Returns true if this is [`EnumValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, EnumValue::Null)
    }

    /// Returns true if this value can be stored where `kind` is expected.
    ///
    /// Numbers are checked the way they are stored: an integer is
    /// assignable to [`ValueKind::Float`], and a float is assignable to
    /// [`ValueKind::Integer`] when [`normalized`](Self::normalized) would
    /// turn it into one.
    pub fn is_assignable_to(&self, kind: ValueKind) -> bool {
        match (self, kind) {
            (EnumValue::Int(_) | EnumValue::UInt(_), ValueKind::Float) => true,
            (EnumValue::Float(f), ValueKind::Integer) => integral(*f).is_some(),
            _ => self.kind() == kind,
        }
    }

    /// Narrows an integral float to an integer.
    ///
    /// JSON has a single numeric type, so a value written as `1.0` must be
    /// stored as `Int(1)` to be found by an integer lookup. Floats with a
    /// fractional part, non-finite floats and floats outside the `i64`
    /// range are returned unchanged.
    pub fn normalized(self) -> Self {
        match self {
            EnumValue::Float(f) => integral(f).map_or(EnumValue::Float(f), EnumValue::Int),
            other => other,
        }
    }

    /// Returns the value as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            EnumValue::Null => serde_json::Value::Null,
            EnumValue::Int(i) => (*i).into(),
            EnumValue::UInt(u) => (*u).into(),
            EnumValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            EnumValue::Text(s) => serde_json::Value::String(s.clone()),
            EnumValue::Bool(b) => serde_json::Value::Bool(*b),
            EnumValue::Structured(v) => v.clone(),
        }
    }

    /// Returns the value as an `i64` if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            EnumValue::Int(i) => Some(*i),
            EnumValue::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Returns the value as a `u64` if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            EnumValue::UInt(u) => Some(*u),
            EnumValue::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Returns the text of a [`EnumValue::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EnumValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
        .then_some(f as i64)
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (EnumValue::Null, EnumValue::Null) => true,
            (EnumValue::Int(a), EnumValue::Int(b)) => a == b,
            (EnumValue::UInt(a), EnumValue::UInt(b)) => a == b,
            (EnumValue::Float(a), EnumValue::Float(b)) => {
                a.to_bits() == b.to_bits()
            }
            (EnumValue::Text(a), EnumValue::Text(b)) => a == b,
            (EnumValue::Bool(a), EnumValue::Bool(b)) => a == b,
            (EnumValue::Structured(a), EnumValue::Structured(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            EnumValue::Null => {}
            EnumValue::Int(i) => i.hash(state),
            EnumValue::UInt(u) => u.hash(state),
            EnumValue::Float(f) => f.to_bits().hash(state),
            EnumValue::Text(s) => s.hash(state),
            EnumValue::Bool(b) => b.hash(state),
            EnumValue::Structured(v) => v.to_string().hash(state),
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Null => f.write_str("null"),
            EnumValue::Int(i) => write!(f, "{}", i),
            EnumValue::UInt(u) => write!(f, "{}", u),
            EnumValue::Float(x) => write!(f, "{}", x),
            EnumValue::Text(s) => f.write_str(s),
            EnumValue::Bool(b) => write!(f, "{}", b),
            EnumValue::Structured(v) => write!(f, "{}", v),
        }
    }
}

impl From<serde_json::Value> for EnumValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => EnumValue::Null,
            serde_json::Value::Bool(b) => EnumValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    EnumValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    EnumValue::UInt(u)
                } else {
                    EnumValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => EnumValue::Text(s),
            structured => EnumValue::Structured(structured),
        }
    }
}

impl From<&EnumValue> for serde_json::Value {
    fn from(value: &EnumValue) -> Self { value.to_json() }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for EnumValue {
            fn from(value: $t) -> Self { EnumValue::Int(value as i64) }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for EnumValue {
            fn from(value: $t) -> Self { EnumValue::UInt(value as u64) }
        })*
    };
}

impl_from_unsigned!(u8, u16, u32, u64);

impl From<f64> for EnumValue {
    fn from(value: f64) -> Self { EnumValue::Float(value) }
}

impl From<f32> for EnumValue {
    fn from(value: f32) -> Self { EnumValue::Float(value as f64) }
}

impl From<bool> for EnumValue {
    fn from(value: bool) -> Self { EnumValue::Bool(value) }
}

impl From<&str> for EnumValue {
    fn from(value: &str) -> Self { EnumValue::Text(value.to_string()) }
}

impl From<String> for EnumValue {
    fn from(value: String) -> Self { EnumValue::Text(value) }
}

impl<T: Into<EnumValue>> From<Option<T>> for EnumValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(EnumValue::Null)
    }
}

impl Serialize for EnumValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EnumValue::Null => serializer.serialize_unit(),
            EnumValue::Int(i) => serializer.serialize_i64(*i),
            EnumValue::UInt(u) => serializer.serialize_u64(*u),
            EnumValue::Float(f) => serializer.serialize_f64(*f),
            EnumValue::Text(s) => serializer.serialize_str(s),
            EnumValue::Bool(b) => serializer.serialize_bool(*b),
            EnumValue::Structured(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for EnumValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(EnumValue::from)
    }
}
