use thiserror::Error;

use crate::schema::DeviceIdentifier;

use super::bits::BitFieldError;

/// Errors returned by decoding and encoding.
///
/// # Examples
/// ```
/// use sysex_core::CodecError;
///
/// let err = CodecError::TruncatedMessage { needed: 254, actual: 12 };
/// assert_eq!(err.kind(), "truncated_message");
/// assert!(err.to_string().contains("need 254"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("message truncated: need {needed} body bytes, got {actual}")]
    TruncatedMessage { needed: usize, actual: usize },
    #[error("schema mismatch: expected identifier {expected}, found {found}")]
    SchemaMismatch {
        expected: DeviceIdentifier,
        found: DeviceIdentifier,
    },
    #[error("parameter '{parameter}': value {value} outside range [{min}, {max}]")]
    OutOfRange {
        parameter: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("unknown parameter '{name}'")]
    UnknownParameter { name: String },
    #[error("parameter '{parameter}': {source}")]
    Field {
        parameter: String,
        #[source]
        source: BitFieldError,
    },
    #[error("encoded body byte {position} equals the end marker {marker:#04x}")]
    MarkerInBody { position: usize, marker: u8 },
    /// A bank entry failed; `index` is 0-based, the message counts from 1.
    #[error("preset {}: {source}", .index + 1)]
    BankPreset {
        index: usize,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Stable snake_case identifier for reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CodecError::TruncatedMessage { .. } => "truncated_message",
            CodecError::SchemaMismatch { .. } => "schema_mismatch",
            CodecError::OutOfRange { .. } => "out_of_range",
            CodecError::UnknownParameter { .. } => "unknown_parameter",
            CodecError::Field { .. } => "field",
            CodecError::MarkerInBody { .. } => "marker_in_body",
            CodecError::BankPreset { source, .. } => source.kind(),
        }
    }
}
