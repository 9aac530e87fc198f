//! Bulk loading of enumerators from external definitions.
//!
//! A [`DynamicLoader`] populates a [`Registry`] from JSON text, files,
//! directories or in-memory collections of [`EnumDefinition`]s, applying
//! the policy in its [`ValidationOptions`], and exports the registry back to
//! JSON.
//!
//! # JSON Format
//!
//! A source is an array of definition records:
//!
//! ```json
//! [
//!   {"name": "LOW", "value": 1, "description": "Low priority", "aliases": ["minor"]},
//!   {"name": "HIGH", "value": 3, "description": "High priority"}
//! ]
//! ```
//!
//! Every field is optional when reading. Numbers written with a fractional
//! part of zero (`1.0`) are stored as integers.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::{EnumValue, Enumeration, Enumerator, Registry, RegistryError, ValueKind};

/// The interchange record for one enumerator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: EnumValue,
    #[serde(default)]
    pub description: String,
    /// Omitted from the output when empty.
    #[serde(
        default,
        deserialize_with = "nullable_aliases",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub aliases: Vec<String>,
}

fn nullable_aliases<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>, value: impl Into<EnumValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }
}

/// What to do when a definition's name or value is already registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateHandling {
    /// Abort the load with [`LoadError::Duplicate`].
    #[default]
    Error,
    /// Keep the entry registered first and continue.
    Skip,
    /// Replace every conflicting entry with the new one.
    Override,
}

/// The validation and conflict policy of a [`DynamicLoader`].
///
/// All fields default to the strictest setting. The options can be read
/// from JSON, where missing fields take their defaults:
///
/// ```
/// use enumerators::{DuplicateHandling, ValidationOptions, ValueKind};
///
/// let options: ValidationOptions = serde_json::from_str(
///     r#"{"duplicate_handling": "skip", "expected_value_type": "integer"}"#,
/// ).unwrap();
/// assert_eq!(options.duplicate_handling, DuplicateHandling::Skip);
/// assert_eq!(options.expected_value_type, Some(ValueKind::Integer));
/// assert!(!options.allow_empty_names);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    pub duplicate_handling: DuplicateHandling,
    /// When set, every non-null value must be of this kind.
    pub expected_value_type: Option<ValueKind>,
    pub allow_empty_names: bool,
    pub allow_empty_values: bool,
}

impl ValidationOptions {
    pub fn with_duplicate_handling(mut self, handling: DuplicateHandling) -> Self {
        self.duplicate_handling = handling;
        self
    }

    pub fn with_expected_value_type(mut self, kind: ValueKind) -> Self {
        self.expected_value_type = Some(kind);
        self
    }

    pub fn with_allow_empty_names(mut self, allow: bool) -> Self {
        self.allow_empty_names = allow;
        self
    }

    pub fn with_allow_empty_values(mut self, allow: bool) -> Self {
        self.allow_empty_values = allow;
        self
    }
}

/// Errors that can occur when loading definitions.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("enum name cannot be empty")]
    EmptyName,
    #[error("enum value cannot be null: {name}")]
    EmptyValue { name: String },
    #[error("enum value type {actual} of {name} is not assignable to expected type {expected}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("duplicate enum found: name={name}, value={value}")]
    Duplicate { name: String, value: EnumValue },
    /// The registry rejected a definition after conflict resolution.
    #[error(transparent)]
    Conflict(#[from] RegistryError),
    #[error("failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("no matching files found in directory: {}", .0.display())]
    NoMatchingFiles(PathBuf),
    /// A failure while loading a particular file.
    #[error("failed to load file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: Box<LoadError>,
    },
}

impl LoadError {
    fn in_file(self, path: &Path) -> Self {
        LoadError::File {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }

    /// Returns the error beneath any file context.
    pub fn root(&self) -> &LoadError {
        match self {
            LoadError::File { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Errors that can occur when exporting a registry.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Populates a [`Registry`] from external definitions.
///
/// Each definition is validated, checked for conflicts against what is
/// already registered, normalized and registered, in that order. Loads are
/// not transactional: when a call fails, definitions merged earlier in the
/// same call stay registered.
///
/// # Examples
///
/// ```
/// use enumerators::{DuplicateHandling, DynamicLoader, EnumValue, Enumeration, ValidationOptions};
///
/// let mut loader = DynamicLoader::new(
///     ValidationOptions::default().with_duplicate_handling(DuplicateHandling::Skip),
/// );
/// let count = loader
///     .load_from_str(r#"[{"name": "X", "value": 1}, {"name": "X", "value": 2}]"#)
///     .unwrap();
///
/// assert_eq!(count, 1);
/// assert_eq!(loader.registry().get_by_name("X").unwrap().value(), &EnumValue::Int(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DynamicLoader {
    registry: Registry<Enumerator>,
    options: ValidationOptions,
}

impl DynamicLoader {
    /// Creates a loader with an empty registry.
    pub fn new(options: ValidationOptions) -> Self {
        Self { registry: Registry::default(), options }
    }

    /// Creates a loader that merges into an existing registry.
    pub fn with_registry(registry: Registry<Enumerator>, options: ValidationOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &ValidationOptions { &self.options }

    pub fn registry(&self) -> &Registry<Enumerator> { &self.registry }

    pub fn into_registry(self) -> Registry<Enumerator> { self.registry }

    /// Loads definitions in order.
    ///
    /// Returns the number of definitions registered by this call.
    pub fn load_from_slice(&mut self, definitions: &[EnumDefinition]) -> Result<usize, LoadError> {
        self.load_all(definitions.iter().cloned())
    }

    /// Loads definitions from a keyed mapping.
    ///
    /// The keys are ignored. Iteration order is unspecified, so which
    /// definition wins a conflict inside one mapping is unspecified too.
    pub fn load_from_map(
        &mut self,
        definitions: &HashMap<String, EnumDefinition>,
    ) -> Result<usize, LoadError> {
        self.load_all(definitions.values().cloned())
    }

    /// Loads a JSON array of definitions.
    pub fn load_from_str(&mut self, source: &str) -> Result<usize, LoadError> {
        let definitions: Vec<EnumDefinition> = serde_json::from_str(source)?;
        self.load_all(definitions)
    }

    /// Loads a JSON array of definitions from a reader.
    pub fn load_from_reader<R: Read>(&mut self, reader: R) -> Result<usize, LoadError> {
        let definitions: Vec<EnumDefinition> = serde_json::from_reader(reader)?;
        self.load_all(definitions)
    }

    /// Loads a JSON file of definitions.
    ///
    /// Errors are reported with the file's path.
    pub fn load_from_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let result = fs::File::open(path)
            .map_err(LoadError::from)
            .and_then(|file| self.load_from_reader(BufReader::new(file)));
        match result {
            Ok(count) => {
                debug!(path = %path.display(), count, "loaded enum definitions");
                Ok(count)
            }
            Err(error) => Err(error.in_file(path)),
        }
    }

    /// Loads every `*.json` file directly inside `path`.
    ///
    /// Files are processed in directory-listing order. The first failing
    /// file aborts the load; files before it stay merged.
    pub fn load_from_directory(&mut self, path: &Path) -> Result<usize, LoadError> {
        if !path.is_dir() {
            return Err(LoadError::DirectoryNotFound(path.to_path_buf()));
        }
        let files = json_files_in(path)?;
        if files.is_empty() {
            return Err(LoadError::NoMatchingFiles(path.to_path_buf()));
        }
        let mut count = 0;
        for file in files {
            count += self.load_from_file(&file)?;
        }
        Ok(count)
    }

    /// Writes the registry as a pretty-printed JSON array of definitions,
    /// sorted by name. An empty registry is written as `[]`.
    pub fn export_to_writer<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(writer, &self.definitions())?;
        Ok(())
    }

    pub fn export_to_string(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&self.definitions())?)
    }

    pub fn export_to_file(&self, path: &Path) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(fs::File::create(path)?);
        self.export_to_writer(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), count = self.registry.len(), "exported enum definitions");
        Ok(())
    }

    fn definitions(&self) -> Vec<EnumDefinition> {
        let mut definitions: Vec<_> =
            self.registry.iter().map(Enumerator::to_definition).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub(crate) fn load_all<I>(&mut self, definitions: I) -> Result<usize, LoadError>
    where
        I: IntoIterator<Item = EnumDefinition>,
    {
        let mut count = 0;
        for definition in definitions {
            if self.merge(definition)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Validates and registers one definition. Returns false if it was
    /// skipped.
    fn merge(&mut self, definition: EnumDefinition) -> Result<bool, LoadError> {
        let skip = self.options.duplicate_handling == DuplicateHandling::Skip;

        if let Err(error) = self.validate(&definition) {
            if skip {
                warn!(name = %definition.name, %error, "skipping invalid enum definition");
                return Ok(false);
            }
            return Err(error);
        }

        let definition = EnumDefinition {
            value: definition.value.normalized(),
            ..definition
        };

        let name_taken = self.registry.contains_name(&definition.name);
        let value_taken = self.registry.contains_value(&definition.value);
        if name_taken || value_taken {
            match self.options.duplicate_handling {
                DuplicateHandling::Error => {
                    return Err(LoadError::Duplicate {
                        name: definition.name,
                        value: definition.value,
                    });
                }
                DuplicateHandling::Skip => {
                    debug!(name = %definition.name, value = %definition.value, "skipping duplicate enum definition");
                    return Ok(false);
                }
                DuplicateHandling::Override => {
                    let replaced_name = self.registry.remove(&definition.name);
                    let replaced_value = self.registry.remove_by_value(&definition.value);
                    for replaced in replaced_name.iter().chain(replaced_value.iter()) {
                        debug!(
                            old = %replaced.name(),
                            new = %definition.name,
                            "overriding enum definition"
                        );
                    }
                }
            }
        }

        self.registry.try_register(Enumerator::from(definition))?;
        Ok(true)
    }

    fn validate(&self, definition: &EnumDefinition) -> Result<(), LoadError> {
        if !self.options.allow_empty_names && definition.name.is_empty() {
            return Err(LoadError::EmptyName);
        }
        if !self.options.allow_empty_values && definition.value.is_null() {
            return Err(LoadError::EmptyValue { name: definition.name.clone() });
        }
        if let Some(expected) = self.options.expected_value_type
            && !definition.value.is_null()
            && !definition.value.is_assignable_to(expected)
        {
            return Err(LoadError::TypeMismatch {
                name: definition.name.clone(),
                expected,
                actual: definition.value.kind(),
            });
        }
        Ok(())
    }
}

/// Lists the `*.json` files directly inside `path`, in listing order.
pub(crate) fn json_files_in(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let file_path = entry?.path();
        if file_path.is_file()
            && file_path.extension().is_some_and(|ext| ext == "json")
        {
            files.push(file_path);
        }
    }
    Ok(files)
}
