use thiserror::Error;

use crate::codec::bits::BitFieldError;

/// Errors returned when a schema source fails validation.
///
/// # Examples
/// ```
/// use sysex_core::SchemaError;
///
/// let err = SchemaError::Overlap {
///     first: "osc_shape".to_string(),
///     second: "osc_sync".to_string(),
///     byte: 12,
/// };
/// assert!(err.to_string().contains("overlaps"));
/// ```
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("device name is empty")]
    EmptyName,
    #[error("device identifier is empty")]
    EmptyIdentifier,
    #[error("start and end markers are both {marker:#04x}")]
    SameMarkers { marker: u8 },
    #[error("device identifier contains marker byte {marker:#04x}")]
    MarkerInIdentifier { marker: u8 },
    #[error("total length {total_length} exceeds the {max}-byte limit")]
    BodyTooLong { total_length: usize, max: usize },
    #[error("preset name field has zero length")]
    EmptyNameField,
    #[error("parameter name is empty")]
    EmptyParameterName,
    #[error("{field} ends at byte {end}, past the {total_length}-byte body")]
    FieldOutOfBounds {
        field: String,
        end: usize,
        total_length: usize,
    },
    #[error("parameter '{parameter}': {source}")]
    InvalidBitField {
        parameter: String,
        #[source]
        source: BitFieldError,
    },
    #[error("parameter '{parameter}': range [{min}, {max}] has min > max")]
    InvalidRange {
        parameter: String,
        min: u32,
        max: u32,
    },
    #[error("parameter '{parameter}': range min {min} exceeds field capacity {capacity}")]
    RangeExceedsField {
        parameter: String,
        min: u32,
        capacity: u32,
    },
    #[error("parameter '{parameter}': controller number {value} is not a 7-bit value")]
    InvalidController { parameter: String, value: u8 },
    #[error("'{second}' overlaps '{first}' at body byte {byte}")]
    Overlap {
        first: String,
        second: String,
        byte: usize,
    },
}
