//! Enumerators: named, valued, described and aliased constants.
//!
//! This crate provides:
//! - [`Enumerator`], a constant with a name, a value, a description and
//!   aliases, serializable as its name, its value or a full record
//! - [`CompositeEnumerator`], an enumerator over a 64-bit flag mask with
//!   union, intersection, difference and complement
//! - [`Registry`], a collection enforcing unique names and values, with
//!   lookup by name, alias and value
//! - [`DynamicLoader`], which fills a registry from JSON definitions under a
//!   configurable validation and duplicate policy, and exports it back
//!
//! # Basic Usage
//!
//! ```rust
//! use enumerators::{EnumValue, Enumeration, Enumerator, Registry};
//!
//! let mut registry = Registry::default();
//! registry
//!     .register(Enumerator::new(1, "ACTIVE", "Currently active").with_alias("on"))
//!     .register(Enumerator::new(0, "INACTIVE", "Not active"));
//!
//! assert_eq!(registry.get_by_name("on").unwrap().name(), "ACTIVE");
//! assert_eq!(registry.get_by_value(&EnumValue::Int(0)).unwrap().name(), "INACTIVE");
//! ```
//!
//! # Value Model
//!
//! Values are [`EnumValue`]s: integers, floats, text, booleans, structured
//! JSON or null. Equality and hashing are defined for every variant, so any
//! value can key a registry.
//!
//! # Name Matching
//!
//! A registry compares canonical names case-insensitively by upper-casing
//! them; aliases are compared case-insensitively as well. Names are kept as
//! given for display and export.
//!
//! # Loading Definitions
//!
//! ```rust
//! use enumerators::{DynamicLoader, EnumValue, ValidationOptions};
//!
//! let mut loader = DynamicLoader::new(ValidationOptions::default());
//! loader.load_from_str(r#"[{"name": "ONE", "value": 1.0, "description": "One"}]"#).unwrap();
//!
//! // Integral floats are stored as integers.
//! assert!(loader.registry().get_by_value(&EnumValue::Int(1)).is_some());
//! ```
//!
//! # Directory Loading Feature
//!
//! When the `directory-loading` feature is enabled (default), a
//! [`DirectoryConfig`] lists directories to load tolerantly with
//! [`DynamicLoader::load_from_config`]. The default directory is
//! `~/.enumerators/`.
//!
//! To disable at compile time:
//!
//! ```toml
//! [dependencies]
//! enumerators = { version = "0.1", default-features = false }
//! ```

mod enum_value;
pub use enum_value::{EnumValue, ValueKind};

mod enumerator;
pub use enumerator::{
    DecodeError, Enumeration, Enumerator, SerializationFormat, decode_enumerator,
    encode_enumerator,
};

mod composite_enumerator;
pub use composite_enumerator::{CompositeEnumerator, NullableComposite};

mod enumerator_registry;
pub use enumerator_registry::{Registry, RegistryError};

mod dynamic_loader;
pub use dynamic_loader::{
    DuplicateHandling, DynamicLoader, EnumDefinition, ExportError, LoadError,
    ValidationOptions,
};

#[cfg(feature = "directory-loading")]
mod directory_loader;

#[cfg(feature = "directory-loading")]
pub use directory_loader::{DirectoryConfig, LoadReport};

mod macros;

#[doc(hidden)]
pub use paste;
