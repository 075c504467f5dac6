//! Schema registry: validated schemas indexed by key and device identifier.
//!
//! A registry is built once (bundled schemas, a schema directory, or schemas
//! registered by hand) and then only read, so it can be shared freely across
//! threads. Registration is all-or-nothing: a schema that fails validation
//! or collides with an existing key or identifier leaves the registry as it
//! was.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

mod builtin;
mod error;

pub use error::RegistryError;

use crate::schema::{DeviceIdentifier, SchemaModel};

static INSTALLED: OnceLock<SchemaRegistry> = OnceLock::new();

/// Schemas by key, with a secondary index by identifier.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, SchemaModel>,
    by_identifier: BTreeMap<DeviceIdentifier, String>,
}

/// Outcome of [`SchemaRegistry::load_dir`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Keys registered, in file order.
    pub loaded: Vec<String>,
    pub failures: Vec<LoadFailure>,
}

/// A schema file that could not be registered.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: RegistryError,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the schemas bundled with the crate.
    ///
    /// # Examples
    /// ```
    /// use sysex_core::SchemaRegistry;
    ///
    /// let registry = SchemaRegistry::with_builtin()?;
    /// let virus = registry.lookup("access_virus_c")?;
    /// assert_eq!(virus.name(), "Access Virus C");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for (_, text) in builtin::BUILTIN {
            registry.register_json(text)?;
        }
        Ok(registry)
    }

    /// Add a validated schema.
    ///
    /// # Errors
    /// `DuplicateKey` / `DuplicateIdentifier` when another schema already
    /// claims the key or identifier.
    pub fn register(&mut self, schema: SchemaModel) -> Result<(), RegistryError> {
        if self.schemas.contains_key(schema.key()) {
            return Err(RegistryError::DuplicateKey {
                key: schema.key().to_string(),
            });
        }
        if let Some(existing) = self.by_identifier.get(schema.identifier()) {
            return Err(RegistryError::DuplicateIdentifier {
                identifier: schema.identifier().clone(),
                existing: existing.clone(),
            });
        }
        tracing::debug!(key = schema.key(), device = schema.name(), "schema registered");
        self.by_identifier
            .insert(schema.identifier().clone(), schema.key().to_string());
        self.schemas.insert(schema.key().to_string(), schema);
        Ok(())
    }

    /// Parse, validate and register one JSON schema; returns its key.
    pub fn register_json(&mut self, text: &str) -> Result<String, RegistryError> {
        let schema = SchemaModel::from_json(text).map_err(|source| RegistryError::Validation {
            name: schema_name_hint(text),
            source,
        })?;
        let key = schema.key().to_string();
        self.register(schema)?;
        Ok(key)
    }

    /// Register every `*.json` file of `dir`, in file name order.
    ///
    /// A file that fails is reported in [`LoadReport::failures`] and does not
    /// affect the others.
    ///
    /// # Errors
    /// `Io` only when the directory itself cannot be listed.
    pub fn load_dir(&mut self, dir: &Path) -> Result<LoadReport, RegistryError> {
        let io_error = |source| RegistryError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut report = LoadReport::default();
        for path in paths {
            let result = fs::read_to_string(&path)
                .map_err(|source| RegistryError::Io {
                    path: path.clone(),
                    source,
                })
                .and_then(|text| self.register_json(&text));
            match result {
                Ok(key) => report.loaded.push(key),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "schema file skipped");
                    report.failures.push(LoadFailure { path, error });
                }
            }
        }
        Ok(report)
    }

    /// Schema registered under `key`.
    pub fn lookup(&self, key: &str) -> Result<&SchemaModel, RegistryError> {
        self.schemas.get(key).ok_or_else(|| RegistryError::NotFound {
            key: key.to_string(),
        })
    }

    /// Schema whose identifier equals `identifier` exactly.
    pub fn lookup_identifier(
        &self,
        identifier: &DeviceIdentifier,
    ) -> Result<&SchemaModel, RegistryError> {
        self.by_identifier
            .get(identifier)
            .and_then(|key| self.schemas.get(key))
            .ok_or_else(|| RegistryError::NotFound {
                key: identifier.to_string(),
            })
    }

    /// Schema whose identifier is the longest prefix of `body`.
    ///
    /// # Examples
    /// ```
    /// use sysex_core::SchemaRegistry;
    ///
    /// let registry = SchemaRegistry::with_builtin()?;
    /// let body = [0x00, 0x20, 0x33, 0x01, 0x00, 0x10];
    /// assert_eq!(registry.identify(&body).map(|s| s.key()), Some("access_virus_c"));
    /// assert!(registry.identify(&[0x41, 0x10]).is_none());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn identify(&self, body: &[u8]) -> Option<&SchemaModel> {
        self.schemas
            .values()
            .filter(|schema| schema.identifier().is_prefix_of(body))
            .max_by_key(|schema| schema.identifier().len())
    }

    /// Registered keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Registered schemas in key order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaModel> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Make `registry` the process-wide registry. Only the first call succeeds.
///
/// # Errors
/// `AlreadyInstalled` on every later call; the installed registry is kept.
pub fn install(registry: SchemaRegistry) -> Result<&'static SchemaRegistry, RegistryError> {
    let mut registry = Some(registry);
    let installed = INSTALLED.get_or_init(|| registry.take().unwrap_or_default());
    match registry {
        None => Ok(installed),
        Some(_) => Err(RegistryError::AlreadyInstalled),
    }
}

/// The process-wide registry, if [`install`] has run.
pub fn installed() -> Option<&'static SchemaRegistry> {
    INSTALLED.get()
}

/// Device name for error messages, read leniently from a schema that may not
/// parse.
fn schema_name_hint(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|value| value.get("name")?.as_str().map(str::to_string))
        .unwrap_or_else(|| "<unnamed>".to_string())
}

#[cfg(test)]
mod tests {
    use super::{RegistryError, SchemaRegistry};
    use crate::schema::{DeviceIdentifier, ParameterSource, SchemaSource};

    fn schema(name: &str, identifier: &[u8]) -> crate::schema::SchemaModel {
        SchemaSource::new(name, identifier, 8)
            .parameter("level", ParameterSource::at(4))
            .build()
            .unwrap()
    }

    #[test]
    fn lookup_by_key_and_identifier() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("Alpha", &[0x7D, 0x01])).unwrap();
        assert_eq!(registry.lookup("alpha").unwrap().name(), "Alpha");
        let by_id = registry
            .lookup_identifier(&DeviceIdentifier::new([0x7D, 0x01]))
            .unwrap();
        assert_eq!(by_id.key(), "alpha");
        assert!(matches!(
            registry.lookup("beta"),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn duplicates_leave_registry_unchanged() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("Alpha", &[0x7D, 0x01])).unwrap();
        assert!(matches!(
            registry.register(schema("Alpha", &[0x7D, 0x02])),
            Err(RegistryError::DuplicateKey { .. })
        ));
        assert!(matches!(
            registry.register(schema("Beta", &[0x7D, 0x01])),
            Err(RegistryError::DuplicateIdentifier { ref existing, .. }) if existing == "alpha"
        ));
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup_identifier(&DeviceIdentifier::new([0x7D, 0x02])).is_err());
    }

    #[test]
    fn identify_prefers_longest_identifier() {
        let mut registry = SchemaRegistry::new();
        registry.register(schema("Family", &[0x7D])).unwrap();
        registry.register(schema("Model", &[0x7D, 0x05])).unwrap();
        assert_eq!(registry.identify(&[0x7D, 0x05, 0]).unwrap().key(), "model");
        assert_eq!(registry.identify(&[0x7D, 0x06, 0]).unwrap().key(), "family");
        assert!(registry.identify(&[0x41]).is_none());
    }

    #[test]
    fn invalid_json_names_the_schema() {
        let mut registry = SchemaRegistry::new();
        let err = registry
            .register_json(r#"{"name": "Broken", "identifier": [], "total_length": 4, "parameters": {}}"#)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Validation { ref name, .. } if name == "Broken"));
        assert!(registry.is_empty());
    }

    #[test]
    fn builtin_registry_lists_keys() {
        let registry = SchemaRegistry::with_builtin().unwrap();
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["access_virus_c"]);
        assert_eq!(registry.iter().count(), 1);
    }
}
