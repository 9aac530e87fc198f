//! Integration tests for registries, serialization formats and flag algebra.

use enumerators::{
    CompositeEnumerator, DecodeError, EnumValue, Enumeration, Enumerator, NullableComposite,
    Registry, RegistryError, SerializationFormat, decode_enumerator, enumerator,
};

enumerator!(1, ACTIVE, "ACTIVE", "Currently active", "ALPHA");
enumerator!(2, PAUSED, "PAUSED", "Temporarily stopped");

#[test]
fn test_registered_enumerator_found_by_name_and_value() {
    let pairs = [
        (EnumValue::Int(7), "SEVEN"),
        (EnumValue::from("text"), "TEXT"),
        (EnumValue::Float(0.25), "QUARTER"),
        (EnumValue::Bool(false), "NO"),
        (EnumValue::from(serde_json::json!(["a", "b"])), "LIST"),
    ];
    let mut registry = Registry::default();
    for (value, name) in &pairs {
        registry.register(Enumerator::new(value.clone(), *name, ""));
    }
    for (value, name) in &pairs {
        let by_name = registry.get_by_name(name).unwrap();
        let by_value = registry.get_by_value(value).unwrap();
        assert_eq!(by_name, by_value);
        assert_eq!(by_name.name(), *name);
    }
}

#[test]
fn test_conflicts_rejected() {
    let mut registry = Registry::new([active(), paused()]);
    assert!(matches!(
        registry.try_register(Enumerator::new(9, "ACTIVE", "")),
        Err(RegistryError::DuplicateName(_))
    ));
    assert!(matches!(
        registry.try_register(Enumerator::new(2, "OTHER", "")),
        Err(RegistryError::DuplicateValue(EnumValue::Int(2)))
    ));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_alias_lookup_ignores_case() {
    let registry = Registry::new([active(), paused()]);
    for alias in ["alpha", "Alpha", "ALPHA"] {
        assert!(active().has_alias(alias));
        assert_eq!(registry.get_by_name(alias).unwrap().name(), ACTIVE_NAME);
    }
}

#[test]
fn test_format_switch_keeps_registry_intact() {
    let mut registry = Registry::default();
    registry.register(active().with_format(SerializationFormat::Full));

    let mut found = registry.get_by_name("ACTIVE").unwrap().clone();
    found.set_serialization_format(SerializationFormat::Value);
    assert_eq!(found.encode(), b"1");
    assert_eq!(registry.get_by_value(found.value()).unwrap().name(), "ACTIVE");
}

#[test]
fn test_full_record_round_trip() {
    let original = Enumerator::new(EnumValue::from(serde_json::json!({"level": 3})), "NESTED", "has structure")
        .with_aliases(["n", "", "n"])
        .with_format(SerializationFormat::Full);

    let mut decoded = Enumerator::new(0, "PLACEHOLDER", "replaced")
        .with_alias("gone")
        .with_format(SerializationFormat::Full);
    decode_enumerator(Some(&mut decoded), &original.encode()).unwrap();

    assert_eq!(decoded.name(), original.name());
    assert_eq!(decoded.value(), original.value());
    assert_eq!(decoded.description(), original.description());
    assert_eq!(decoded.aliases(), original.aliases());
}

#[test]
fn test_decode_into_nothing() {
    for data in [&br#""ACTIVE""#[..], &b"{ broken"[..]] {
        assert!(matches!(decode_enumerator(None, data), Err(DecodeError::NullTarget)));
    }
}

#[test]
fn test_flag_algebra() {
    let a = CompositeEnumerator::from_bit(0, "A", "");
    let b = CompositeEnumerator::from_bit(1, "B", "");
    let c = CompositeEnumerator::from_bit(2, "C", "");

    let ab = a.or(&b);
    assert_eq!(ab.value(), &EnumValue::UInt(3));
    assert_eq!(ab.and(&a).value(), &EnumValue::UInt(1));
    assert_eq!(ab.xor(&a).value(), &EnumValue::UInt(2));
    assert_eq!(a.not().value(), &EnumValue::UInt(!1));
    assert!(ab.has_flag(&a));
    assert!(ab.has_flag(&b));
    assert!(!ab.has_flag(&c));

    let none: Option<&CompositeEnumerator> = None;
    assert!(none.is_empty());
    assert_eq!(Some(&ab).union(none).unwrap().name(), "A|B");
}

#[test]
fn test_flags_registry() {
    let registry = Registry::new([
        CompositeEnumerator::new(0, "READ", "").with_alias("r"),
        CompositeEnumerator::new(1, "WRITE", "").with_alias("w"),
        CompositeEnumerator::new(2, "EXECUTE", "").with_alias("x"),
    ]);
    let granted = CompositeEnumerator::from_bits(0b101, "GRANTED", "");

    let mut held: Vec<_> = registry
        .filter(|flag| granted.has_flag(flag))
        .into_iter()
        .map(|flag| flag.name().to_string())
        .collect();
    held.sort();
    assert_eq!(held, ["EXECUTE", "READ"]);
    assert_eq!(registry.get_by_name("W").unwrap().flags(), 2);
}
