use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use serde::{Serialize, Serializer};

use crate::{DecodeError, EnumValue, Enumeration, Enumerator, SerializationFormat};

/// An enumerator whose value is a 64-bit flag mask.
///
/// The value reported by [`Enumeration::value`] is always
/// `EnumValue::UInt(flags)`. Combining operators return new enumerators and
/// never modify their operands; the result is named after its operands
/// joined by the operator glyph and carries no aliases.
///
/// # Examples
///
/// ```
/// use enumerators::{CompositeEnumerator, EnumValue, Enumeration};
///
/// let read = CompositeEnumerator::new(0, "READ", "Read access");
/// let write = CompositeEnumerator::new(1, "WRITE", "Write access");
///
/// let read_write = &read | &write;
/// assert_eq!(read_write.flags(), 3);
/// assert_eq!(read_write.name(), "READ|WRITE");
/// assert!(read_write.has_flag(&read));
/// assert_eq!(read_write.value(), &EnumValue::UInt(3));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeEnumerator {
    base: Enumerator,
    flags: u64,
}

impl CompositeEnumerator {
    /// Creates a composite enumerator from a raw value.
    ///
    /// An unsigned integer is used verbatim as the mask. A signed integer
    /// `n` in `0..64` is a bit position and becomes `1 << n`. Any other
    /// value yields an empty mask without complaint.
    pub fn new(
        raw: impl Into<EnumValue>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let flags = match raw.into() {
            EnumValue::UInt(mask) => mask,
            EnumValue::Int(position) if (0..64).contains(&position) => {
                1 << position
            }
            _ => 0,
        };
        Self::from_bits(flags, name, description)
    }

    /// Creates a composite enumerator from a mask.
    pub fn from_bits(
        flags: u64,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            base: Enumerator::new(flags, name, description),
            flags,
        }
    }

    /// Creates a composite enumerator with the single bit at `position`.
    pub fn from_bit(
        position: u32,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::from_bits(1u64.checked_shl(position).unwrap_or(0), name, description)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.base = self.base.with_alias(alias);
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base = self.base.with_aliases(aliases);
        self
    }

    pub fn flags(&self) -> u64 { self.flags }

    fn combine(&self, glyph: char, other: &Self, flags: u64) -> Self {
        Self::from_bits(
            flags,
            format!("{}{}{}", self.name(), glyph, other.name()),
            self.description(),
        )
    }

    /// Bitwise union.
    pub fn or(&self, other: &Self) -> Self {
        self.combine('|', other, self.flags | other.flags)
    }

    /// Bitwise intersection.
    pub fn and(&self, other: &Self) -> Self {
        self.combine('&', other, self.flags & other.flags)
    }

    /// Bitwise symmetric difference.
    pub fn xor(&self, other: &Self) -> Self {
        self.combine('^', other, self.flags ^ other.flags)
    }

    /// Bitwise complement over all 64 bits.
    pub fn not(&self) -> Self {
        Self::from_bits(!self.flags, format!("~{}", self.name()), self.description())
    }

    /// Returns true if every bit of `flag` is set in `self`.
    pub fn has_flag(&self, flag: &Self) -> bool {
        self.flags & flag.flags == flag.flags
    }

    pub fn is_empty(&self) -> bool { self.flags == 0 }

    /// Returns the underlying enumerator.
    pub fn as_enumerator(&self) -> &Enumerator { &self.base }

    pub fn serialization_format(&self) -> SerializationFormat {
        self.base.serialization_format()
    }

    pub fn set_serialization_format(&mut self, format: SerializationFormat) {
        self.base.set_serialization_format(format);
    }

    pub fn to_json(&self) -> serde_json::Value { self.base.to_json() }

    pub fn encode(&self) -> Vec<u8> { self.base.encode() }

    /// Decodes into this composite using its serialization format.
    ///
    /// The mask is re-derived from the decoded value: a non-negative
    /// integer is taken as the mask itself, anything else clears it.
    pub fn decode(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        let mut base = self.base.clone();
        base.decode(data)?;
        let flags = base.value().as_u64().unwrap_or(0);
        let mut rebuilt = Self::from_bits(flags, base.name(), base.description())
            .with_aliases(base.aliases().iter().cloned());
        rebuilt.set_serialization_format(base.serialization_format());
        *self = rebuilt;
        Ok(())
    }
}

impl Enumeration for CompositeEnumerator {
    fn name(&self) -> &str { self.base.name() }
    fn value(&self) -> &EnumValue { self.base.value() }
    fn description(&self) -> &str { self.base.description() }
    fn aliases(&self) -> &[String] { self.base.aliases() }
}

impl fmt::Display for CompositeEnumerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for CompositeEnumerator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.base.serialize(serializer)
    }
}

impl BitOr for &CompositeEnumerator {
    type Output = CompositeEnumerator;

    fn bitor(self, rhs: Self) -> CompositeEnumerator { self.or(rhs) }
}

impl BitAnd for &CompositeEnumerator {
    type Output = CompositeEnumerator;

    fn bitand(self, rhs: Self) -> CompositeEnumerator { self.and(rhs) }
}

impl BitXor for &CompositeEnumerator {
    type Output = CompositeEnumerator;

    fn bitxor(self, rhs: Self) -> CompositeEnumerator { self.xor(rhs) }
}

impl Not for &CompositeEnumerator {
    type Output = CompositeEnumerator;

    fn not(self) -> CompositeEnumerator { CompositeEnumerator::not(self) }
}

/// Flag algebra over possibly absent composites.
///
/// A binary operation with an absent operand on either side returns the
/// left operand unchanged, so `None` absorbs from the right and is
/// propagated from the left.
pub trait NullableComposite {
    fn union(self, other: Self) -> Option<CompositeEnumerator>;
    fn intersection(self, other: Self) -> Option<CompositeEnumerator>;
    fn symmetric_difference(self, other: Self) -> Option<CompositeEnumerator>;
    fn complement(self) -> Option<CompositeEnumerator>;
    /// False when either side is absent.
    fn has_flag(self, flag: Self) -> bool;
    /// True when absent.
    fn is_empty(self) -> bool;
}

impl NullableComposite for Option<&CompositeEnumerator> {
    fn union(self, other: Self) -> Option<CompositeEnumerator> {
        match (self, other) {
            (Some(lhs), Some(rhs)) => Some(lhs.or(rhs)),
            (lhs, _) => lhs.cloned(),
        }
    }

    fn intersection(self, other: Self) -> Option<CompositeEnumerator> {
        match (self, other) {
            (Some(lhs), Some(rhs)) => Some(lhs.and(rhs)),
            (lhs, _) => lhs.cloned(),
        }
    }

    fn symmetric_difference(self, other: Self) -> Option<CompositeEnumerator> {
        match (self, other) {
            (Some(lhs), Some(rhs)) => Some(lhs.xor(rhs)),
            (lhs, _) => lhs.cloned(),
        }
    }

    fn complement(self) -> Option<CompositeEnumerator> {
        self.map(CompositeEnumerator::not)
    }

    fn has_flag(self, flag: Self) -> bool {
        matches!((self, flag), (Some(lhs), Some(rhs)) if lhs.has_flag(rhs))
    }

    fn is_empty(self) -> bool { self.is_none_or(CompositeEnumerator::is_empty) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> (CompositeEnumerator, CompositeEnumerator, CompositeEnumerator) {
        (
            CompositeEnumerator::new(0, "A", "first"),
            CompositeEnumerator::new(1, "B", "second"),
            CompositeEnumerator::new(2, "C", "third"),
        )
    }

    #[test]
    fn test_conversion_rule() {
        assert_eq!(CompositeEnumerator::new(3, "P", "").flags(), 8);
        assert_eq!(CompositeEnumerator::new(3u64, "M", "").flags(), 3);
        assert_eq!(CompositeEnumerator::new("x", "S", "").flags(), 0);
        assert_eq!(CompositeEnumerator::new(1.0, "F", "").flags(), 0);
        assert_eq!(CompositeEnumerator::new(64, "O", "").flags(), 0);
        assert_eq!(CompositeEnumerator::new(-1, "N", "").flags(), 0);
        assert_eq!(CompositeEnumerator::from_bit(63, "H", "").flags(), 1 << 63);
        assert_eq!(CompositeEnumerator::from_bit(64, "X", "").flags(), 0);
    }

    #[test]
    fn test_algebra() {
        let (a, b, _) = flags();
        assert_eq!(a.or(&b).value(), &EnumValue::UInt(3));
        assert_eq!(a.or(&b).and(&a).flags(), 1);
        assert_eq!(a.or(&b).xor(&a).flags(), 2);
        assert_eq!(a.not().flags(), !1u64);
        assert_eq!((&(&a | &b) & &a).flags(), 1);
        assert_eq!((&(&a | &b) ^ &a).flags(), 2);
        assert_eq!((!&a).flags(), !1u64);
    }

    #[test]
    fn test_operations_are_pure() {
        let (a, b, _) = flags();
        let a = a.with_alias("alpha");
        let combined = a.or(&b);
        assert_eq!(a.flags(), 1);
        assert_eq!(b.flags(), 2);
        assert_eq!(combined.name(), "A|B");
        assert_eq!(combined.description(), "first");
        assert!(combined.aliases().is_empty());
        assert_eq!(a.and(&b).name(), "A&B");
        assert_eq!(a.xor(&b).name(), "A^B");
        assert_eq!(a.not().name(), "~A");
    }

    #[test]
    fn test_has_flag_is_subset() {
        let (a, b, c) = flags();
        let ab = a.or(&b);
        assert!(ab.has_flag(&a));
        assert!(ab.has_flag(&b));
        assert!(!ab.has_flag(&c));
        assert!(!a.has_flag(&ab));
        assert!(a.has_flag(&CompositeEnumerator::from_bits(0, "NONE", "")));
    }

    #[test]
    fn test_is_empty() {
        let (a, _, _) = flags();
        assert!(!a.is_empty());
        assert!(a.and(&a.not()).is_empty());
    }

    #[test]
    fn test_nullable_operands() {
        let (a, b, _) = flags();
        let none: Option<&CompositeEnumerator> = None;

        assert_eq!(Some(&a).union(Some(&b)).unwrap().flags(), 3);
        assert_eq!(Some(&a).union(none), Some(a.clone()));
        assert_eq!(Some(&a).intersection(none), Some(a.clone()));
        assert_eq!(Some(&a).symmetric_difference(none), Some(a.clone()));
        assert_eq!(none.union(Some(&a)), None);
        assert_eq!(none.complement(), None);
        assert_eq!(Some(&a).complement().unwrap().flags(), !1u64);

        assert!(!none.has_flag(Some(&a)));
        assert!(!Some(&a).has_flag(none));
        assert!(Some(&a).has_flag(Some(&a)));
        assert!(none.is_empty());
        assert!(!Some(&a).is_empty());
    }

    #[test]
    fn test_encode_and_decode() {
        let (a, b, _) = flags();
        let mut ab = a.or(&b);
        assert_eq!(ab.encode(), br#""A|B""#);

        ab.set_serialization_format(SerializationFormat::Value);
        assert_eq!(ab.encode(), b"3");

        ab.set_serialization_format(SerializationFormat::Full);
        let mut decoded = CompositeEnumerator::from_bits(0, "", "");
        decoded.set_serialization_format(SerializationFormat::Full);
        decoded.decode(&ab.encode()).unwrap();
        assert_eq!(decoded.flags(), 3);
        assert_eq!(decoded.name(), "A|B");
        assert_eq!(decoded.value(), &EnumValue::UInt(3));
    }
}
