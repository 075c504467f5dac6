//! Schema model: the declarative layout of one device's dump format.
//!
//! - `source`: serde records as read from JSON schema files
//! - `validate`: checks a source record and builds the model
//! - `model`: validated, read-only types consumed by the codec
//! - `error`: validation errors
//!
//! A [`SchemaModel`] only exists in validated form: every descriptor has a
//! well-formed bit field inside the body, no two fields share a bit, and no
//! field touches the identifier, preset-name or checksum bytes.

pub mod error;
pub mod model;
pub mod source;
mod validate;

pub use error::SchemaError;
pub use model::{
    DeviceIdentifier, Encoding, NameField, ParameterDescriptor, RangePolicy, SchemaModel,
};
pub use source::{ParameterSource, SchemaSource};
pub use validate::MAX_BODY_LENGTH;
