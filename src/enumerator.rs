use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{EnumDefinition, EnumValue};

/// The shared read contract of everything a [`Registry`](crate::Registry)
/// can hold.
///
/// `Option<T>` implements the trait as well: `None` behaves as an
/// unconstructed enumerator, with an empty name, a `Null` value and no
/// aliases.
pub trait Enumeration {
    /// The canonical name.
    fn name(&self) -> &str;

    /// The stored value, without coercion.
    fn value(&self) -> &EnumValue;

    /// The human-readable description, possibly empty.
    fn description(&self) -> &str;

    /// The aliases verbatim, including duplicates and empty strings.
    fn aliases(&self) -> &[String];

    /// Returns true if any alias case-insensitively equals `alias`.
    fn has_alias(&self, alias: &str) -> bool {
        let folded = alias.to_lowercase();
        self.aliases().iter().any(|a| a.to_lowercase() == folded)
    }

    /// Returns true if the enumerator has a non-empty name.
    fn is_valid(&self) -> bool { !self.name().is_empty() }
}

static NULL_VALUE: EnumValue = EnumValue::Null;

impl<T: Enumeration> Enumeration for Option<T> {
    fn name(&self) -> &str { self.as_ref().map_or("", |e| e.name()) }

    fn value(&self) -> &EnumValue {
        self.as_ref().map_or(&NULL_VALUE, |e| e.value())
    }

    fn description(&self) -> &str {
        self.as_ref().map_or("", |e| e.description())
    }

    fn aliases(&self) -> &[String] {
        match self {
            Some(e) => e.aliases(),
            None => &[],
        }
    }

    fn has_alias(&self, alias: &str) -> bool {
        self.as_ref().is_some_and(|e| e.has_alias(alias))
    }

    fn is_valid(&self) -> bool { self.as_ref().is_some_and(|e| e.is_valid()) }
}

impl<T: Enumeration + ?Sized> Enumeration for &T {
    fn name(&self) -> &str { (**self).name() }
    fn value(&self) -> &EnumValue { (**self).value() }
    fn description(&self) -> &str { (**self).description() }
    fn aliases(&self) -> &[String] { (**self).aliases() }
    fn has_alias(&self, alias: &str) -> bool { (**self).has_alias(alias) }
    fn is_valid(&self) -> bool { (**self).is_valid() }
}

/// How an enumerator is written to and read from JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    /// The bare name as a JSON string, e.g. `"ACTIVE"`.
    #[default]
    Name,
    /// The bare value, e.g. `1` or `"low"`.
    Value,
    /// A record with `name`, `value`, `description` and `aliases`.
    Full,
}

/// Errors that can occur when decoding an enumerator.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The decode target does not exist.
    #[error("cannot decode into null Enumerator")]
    NullTarget,
    /// The input is not valid JSON for the selected format.
    #[error("invalid enumerator JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A named, valued, described and aliased constant.
///
/// The name and value are fixed at construction; only the serialization
/// format may change afterwards. Name and value uniqueness is enforced by a
/// [`Registry`](crate::Registry), not here.
///
/// # Examples
///
/// ```
/// use enumerators::{Enumeration, Enumerator, SerializationFormat};
///
/// let active = Enumerator::new(1, "ACTIVE", "Currently active")
///     .with_alias("on")
///     .with_alias("enabled");
///
/// assert_eq!(active.name(), "ACTIVE");
/// assert!(active.has_alias("ON"));
/// assert_eq!(active.encode(), br#""ACTIVE""#);
///
/// let active = active.with_format(SerializationFormat::Value);
/// assert_eq!(active.encode(), b"1");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Enumerator {
    name: String,
    value: EnumValue,
    description: String,
    aliases: Vec<String>,
    format: SerializationFormat,
}

impl Enumerator {
    /// Creates an enumerator with no aliases and the name-only format.
    pub fn new(
        value: impl Into<EnumValue>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: description.into(),
            aliases: Vec::new(),
            format: SerializationFormat::default(),
        }
    }

    /// Appends an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Appends several aliases, keeping their order.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets the serialization format.
    pub fn with_format(mut self, format: SerializationFormat) -> Self {
        self.format = format;
        self
    }

    pub fn serialization_format(&self) -> SerializationFormat { self.format }

    pub fn set_serialization_format(&mut self, format: SerializationFormat) {
        self.format = format;
    }

    /// Returns the JSON representation selected by the serialization format.
    pub fn to_json(&self) -> serde_json::Value {
        match self.format {
            SerializationFormat::Name => {
                serde_json::Value::String(self.name.clone())
            }
            SerializationFormat::Value => self.value.to_json(),
            SerializationFormat::Full => {
                let mut record = serde_json::Map::new();
                record.insert("name".into(), self.name.clone().into());
                record.insert("value".into(), self.value.to_json());
                record.insert(
                    "description".into(),
                    self.description.clone().into(),
                );
                if !self.aliases.is_empty() {
                    record.insert("aliases".into(), self.aliases.clone().into());
                }
                serde_json::Value::Object(record)
            }
        }
    }

    /// Encodes the enumerator as JSON bytes in its serialization format.
    pub fn encode(&self) -> Vec<u8> { self.to_json().to_string().into_bytes() }

    /// Decodes JSON bytes into this enumerator using its serialization
    /// format.
    ///
    /// The name-only format replaces only the name, the value-only format
    /// only the value (narrowing integral floats), and the full format all
    /// four fields. On error the enumerator is left unchanged.
    pub fn decode(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        match self.format {
            SerializationFormat::Name => {
                self.name = serde_json::from_slice(data)?;
            }
            SerializationFormat::Value => {
                let value: EnumValue = serde_json::from_slice(data)?;
                self.value = value.normalized();
            }
            SerializationFormat::Full => {
                let record: EnumDefinition = serde_json::from_slice(data)?;
                self.name = record.name;
                self.value = record.value.normalized();
                self.description = record.description;
                self.aliases = record.aliases;
            }
        }
        Ok(())
    }

    /// Converts the enumerator into its interchange record.
    pub fn to_definition(&self) -> EnumDefinition {
        EnumDefinition {
            name: self.name.clone(),
            value: self.value.clone(),
            description: self.description.clone(),
            aliases: self.aliases.clone(),
        }
    }
}

impl Enumeration for Enumerator {
    fn name(&self) -> &str { &self.name }
    fn value(&self) -> &EnumValue { &self.value }
    fn description(&self) -> &str { &self.description }
    fn aliases(&self) -> &[String] { &self.aliases }
}

impl From<EnumDefinition> for Enumerator {
    fn from(definition: EnumDefinition) -> Self {
        Self {
            name: definition.name,
            value: definition.value,
            description: definition.description,
            aliases: definition.aliases,
            format: SerializationFormat::default(),
        }
    }
}

impl fmt::Display for Enumerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for Enumerator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnumeratorRepr {
    Name(String),
    Full(EnumDefinition),
}

/// Accepts either a bare name or a full record; the resulting format
/// matches the shape that was read.
impl<'de> Deserialize<'de> for Enumerator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match EnumeratorRepr::deserialize(deserializer)? {
            EnumeratorRepr::Name(name) => Enumerator::new(EnumValue::Null, name, ""),
            EnumeratorRepr::Full(mut record) => {
                record.value = record.value.normalized();
                Enumerator::from(record).with_format(SerializationFormat::Full)
            }
        })
    }
}

/// Encodes a possibly absent enumerator; `None` encodes as `""`.
pub fn encode_enumerator(enumerator: Option<&Enumerator>) -> Vec<u8> {
    match enumerator {
        Some(enumerator) => enumerator.encode(),
        None => br#""""#.to_vec(),
    }
}

/// Decodes into a possibly absent enumerator.
///
/// Fails with [`DecodeError::NullTarget`] when `target` is `None`,
/// whatever the input.
pub fn decode_enumerator(
    target: Option<&mut Enumerator>,
    data: &[u8],
) -> Result<(), DecodeError> {
    target.ok_or(DecodeError::NullTarget)?.decode(data)
}
