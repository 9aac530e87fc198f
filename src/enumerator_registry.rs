use std::collections::HashMap;

use crate::{EnumValue, Enumeration};

/// Errors returned by [`Registry::try_register`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// An enumerator with the same (case-folded) name is already registered.
    #[error("duplicate enumerator name: {0}")]
    DuplicateName(String),
    /// An enumerator with an equal value is already registered.
    #[error("duplicate enumerator value: {0}")]
    DuplicateValue(EnumValue),
}

/// A collection of enumerators indexed by name and by value.
///
/// The registry maps between:
/// - Canonical names (and aliases) and their enumerators
/// - Values and their enumerators
///
/// Names are matched case-insensitively: the name index is keyed by the
/// upper-cased canonical name while enumerators keep their names as
/// given. `ACTIVE` and `active` therefore conflict on registration, and
/// either spelling finds the same entry.
///
/// Every entry is present in both indices. Iteration order is unspecified.
///
/// # Examples
///
/// ```
/// use enumerators::{EnumValue, Enumeration, Enumerator, Registry};
///
/// let mut registry = Registry::default();
/// registry
///     .register(Enumerator::new(1, "ACTIVE", "Active").with_alias("on"))
///     .register(Enumerator::new(0, "INACTIVE", "Inactive"));
///
/// assert_eq!(registry.get_by_name("active").unwrap().value(), &EnumValue::Int(1));
/// assert_eq!(registry.get_by_name("ON").unwrap().name(), "ACTIVE");
/// assert_eq!(registry.get_by_value(&EnumValue::Int(0)).unwrap().name(), "INACTIVE");
/// ```
#[derive(Clone, Debug)]
pub struct Registry<T> {
    by_name: HashMap<String, T>,
    by_value: HashMap<EnumValue, T>,
}

fn fold(name: &str) -> String { name.to_uppercase() }

impl<T: Enumeration + Clone> Registry<T> {
    /// Creates a registry holding the given enumerators.
    ///
    /// # Panics
    ///
    /// Panics if two of the enumerators share a name or a value.
    pub fn new<I>(enumerators: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut registry = Self { by_name: HashMap::new(), by_value: HashMap::new() };
        for enumerator in enumerators {
            registry.register(enumerator);
        }
        registry
    }

    /// Adds an enumerator, returning the registry for chaining.
    ///
    /// Conflicting definitions are a programming error; use
    /// [`try_register`](Self::try_register) when the input is not under the
    /// caller's control.
    ///
    /// # Panics
    ///
    /// Panics if the name or the value is already registered.
    pub fn register(&mut self, enumerator: T) -> &mut Self {
        if let Err(error) = self.try_register(enumerator) {
            panic!("{}", error);
        }
        self
    }

    /// Adds an enumerator unless its name or value is already registered.
    ///
    /// Both indices are updated together or not at all.
    pub fn try_register(&mut self, enumerator: T) -> Result<&mut Self, RegistryError> {
        let key = fold(enumerator.name());
        if self.by_name.contains_key(&key) {
            return Err(RegistryError::DuplicateName(enumerator.name().to_string()));
        }
        if self.by_value.contains_key(enumerator.value()) {
            return Err(RegistryError::DuplicateValue(enumerator.value().clone()));
        }
        self.by_value.insert(enumerator.value().clone(), enumerator.clone());
        self.by_name.insert(key, enumerator);
        Ok(self)
    }

    /// Looks up an enumerator by canonical name, falling back to aliases.
    ///
    /// Both comparisons ignore case.
    pub fn get_by_name(&self, name: &str) -> Option<&T> {
        self.by_name
            .get(&fold(name))
            .or_else(|| self.by_name.values().find(|e| e.has_alias(name)))
    }

    /// Looks up an enumerator by value equality.
    pub fn get_by_value(&self, value: &EnumValue) -> Option<&T> {
        self.by_value.get(value)
    }

    /// Returns true if an enumerator with the same name is registered.
    ///
    /// Only the name is compared.
    pub fn contains(&self, enumerator: &T) -> bool {
        self.contains_name(enumerator.name())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(&fold(name))
    }

    pub fn contains_value(&self, value: &EnumValue) -> bool {
        self.by_value.contains_key(value)
    }

    /// Removes the enumerator registered under `name` from both indices.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let removed = self.by_name.remove(&fold(name))?;
        self.by_value.remove(removed.value());
        Some(removed)
    }

    /// Removes the enumerator registered under `value` from both indices.
    pub fn remove_by_value(&mut self, value: &EnumValue) -> Option<T> {
        let removed = self.by_value.remove(value)?;
        self.by_name.remove(&fold(removed.name()));
        Some(removed)
    }

    /// Returns all registered enumerators.
    pub fn values(&self) -> Vec<T> { self.by_name.values().cloned().collect() }

    pub fn iter(&self) -> impl Iterator<Item = &T> { self.by_name.values() }

    /// Returns the canonical names as registered.
    pub fn names(&self) -> Vec<String> {
        self.by_name.values().map(|e| e.name().to_string()).collect()
    }

    /// Returns a snapshot mapping each canonical name to its value.
    pub fn as_map(&self) -> HashMap<String, EnumValue> {
        self.by_name
            .values()
            .map(|e| (e.name().to_string(), e.value().clone()))
            .collect()
    }

    /// Returns the enumerators satisfying `predicate`.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.by_name.values().filter(|&e| predicate(e)).cloned().collect()
    }

    pub fn len(&self) -> usize { self.by_name.len() }

    pub fn is_empty(&self) -> bool { self.by_name.is_empty() }
}

/// Default implementation creates an empty registry.
impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { by_name: HashMap::new(), by_value: HashMap::new() }
    }
}

/// # Panics
///
/// Panics on conflicting enumerators, like [`Registry::register`].
impl<T: Enumeration + Clone> FromIterator<T> for Registry<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self { Self::new(iter) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompositeEnumerator, Enumerator};

    fn statuses() -> Registry<Enumerator> {
        Registry::new([
            Enumerator::new(1, "ACTIVE", "Active").with_aliases(["on", "enabled"]),
            Enumerator::new(0, "INACTIVE", "Inactive").with_alias("off"),
            Enumerator::new(2, "PENDING", "Waiting"),
        ])
    }

    #[test]
    fn test_lookup_by_name_and_value() {
        let registry = statuses();
        let active = registry.get_by_name("ACTIVE").unwrap();
        assert_eq!(active.value(), &EnumValue::Int(1));
        assert_eq!(registry.get_by_value(&EnumValue::Int(1)), Some(active));
        assert!(registry.get_by_name("missing").is_none());
        assert!(registry.get_by_value(&EnumValue::Int(9)).is_none());
        assert!(registry.get_by_value(&EnumValue::UInt(1)).is_none());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = statuses();
        assert_eq!(registry.get_by_name("pending").unwrap().name(), "PENDING");
        assert_eq!(registry.get_by_name("Enabled").unwrap().name(), "ACTIVE");
        assert_eq!(registry.get_by_name("OFF").unwrap().name(), "INACTIVE");

        let lower: Registry<Enumerator> =
            Registry::new([Enumerator::new("x", "lower", "")]);
        assert_eq!(lower.get_by_name("lower").unwrap().name(), "lower");
        assert_eq!(lower.names(), vec!["lower".to_string()]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = statuses();
        let err = registry
            .try_register(Enumerator::new(7, "active", ""))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("active".into()));
        assert_eq!(registry.len(), 3);
        assert!(registry.get_by_value(&EnumValue::Int(7)).is_none());
    }

    #[test]
    fn test_duplicate_value_rejected() {
        let mut registry = statuses();
        let err = registry
            .try_register(Enumerator::new(2, "OTHER", ""))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateValue(EnumValue::Int(2)));
        assert!(!registry.contains_name("OTHER"));
    }

    #[test]
    #[should_panic(expected = "duplicate enumerator name: ACTIVE")]
    fn test_register_panics_on_conflict() {
        statuses().register(Enumerator::new(5, "ACTIVE", ""));
    }

    #[test]
    fn test_chained_registration() {
        let mut registry = Registry::default();
        registry
            .register(Enumerator::new("r", "RED", ""))
            .register(Enumerator::new("g", "GREEN", ""))
            .register(Enumerator::new("b", "BLUE", ""));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_contains_keys_on_name() {
        let registry = statuses();
        assert!(registry.contains(&Enumerator::new(99, "ACTIVE", "different")));
        assert!(!registry.contains(&Enumerator::new(1, "UNKNOWN", "")));
    }

    #[test]
    fn test_views() {
        let registry = statuses();
        let mut names = registry.names();
        names.sort();
        assert_eq!(names, ["ACTIVE", "INACTIVE", "PENDING"]);

        let map = registry.as_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map["PENDING"], EnumValue::Int(2));

        let positive = registry.filter(|e| e.value().as_i64().is_some_and(|v| v > 0));
        assert_eq!(positive.len(), 2);
        assert_eq!(registry.values().len(), 3);
        assert_eq!(registry.iter().count(), 3);
    }

    #[test]
    fn test_remove_keeps_indices_in_step() {
        let mut registry = statuses();
        let removed = registry.remove("active").unwrap();
        assert_eq!(removed.name(), "ACTIVE");
        assert!(registry.get_by_value(&EnumValue::Int(1)).is_none());
        assert!(registry.get_by_name("on").is_none());

        let removed = registry.remove_by_value(&EnumValue::Int(0)).unwrap();
        assert_eq!(removed.name(), "INACTIVE");
        assert!(!registry.contains_name("INACTIVE"));
        assert_eq!(registry.len(), 1);

        registry.register(Enumerator::new(1, "ACTIVE", ""));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_registry() {
        let registry: Registry<Enumerator> = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.values().is_empty());
        assert!(registry.names().is_empty());
        assert!(registry.as_map().is_empty());
        assert!(registry.get_by_name("").is_none());
    }

    #[test]
    fn test_composite_registry() {
        let registry: Registry<CompositeEnumerator> = [
            CompositeEnumerator::new(0, "READ", ""),
            CompositeEnumerator::new(1, "WRITE", ""),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            registry.get_by_value(&EnumValue::UInt(2)).unwrap().name(),
            "WRITE"
        );
    }
}
