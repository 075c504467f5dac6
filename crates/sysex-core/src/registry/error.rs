use std::path::PathBuf;

use thiserror::Error;

use crate::schema::{DeviceIdentifier, SchemaError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no schema registered for '{key}'")]
    NotFound { key: String },
    #[error("schema '{name}' is invalid: {source}")]
    Validation {
        name: String,
        #[source]
        source: SchemaError,
    },
    #[error("schema key '{key}' is already registered")]
    DuplicateKey { key: String },
    #[error("identifier {identifier} is already registered by '{existing}'")]
    DuplicateIdentifier {
        identifier: DeviceIdentifier,
        existing: String,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("a schema registry is already installed")]
    AlreadyInstalled,
}
