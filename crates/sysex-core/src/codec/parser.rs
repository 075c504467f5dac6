use std::collections::BTreeMap;

use crate::framing::FramedMessage;
use crate::schema::{ParameterDescriptor, RangePolicy, SchemaModel};
use crate::{DecodedParameter, DecodedPreset};

use super::checksum::checksum;
use super::error::CodecError;
use super::reader::MessageReader;

/// Decode one framed message against `schema`.
///
/// # Errors
/// - `SchemaMismatch` when the body does not start with the schema identifier
/// - `TruncatedMessage` when the body is shorter than the schema's length
/// - `OutOfRange` when a rejecting parameter reads outside its range
pub fn decode(schema: &SchemaModel, message: &FramedMessage<'_>) -> Result<DecodedPreset, CodecError> {
    let reader = MessageReader::new(message.body());
    reader.require_header(schema)?;

    let mut parameters = BTreeMap::new();
    for descriptor in schema.parameters() {
        let raw = reader.read_field(descriptor)?;
        if !descriptor.contains(raw) && descriptor.policy() == RangePolicy::Reject {
            return Err(out_of_range(descriptor, raw));
        }
        parameters.insert(
            descriptor.name().to_string(),
            DecodedParameter {
                raw,
                normalized: descriptor.normalize(raw),
                category: descriptor.category().to_string(),
                controller: descriptor.controller(),
                description: descriptor.description().to_string(),
            },
        );
    }

    let body = &reader.body()[..schema.total_length()];
    let checksum_valid = match schema.checksum_offset() {
        Some(offset) => Some(reader.read_u8(offset)? == checksum(body, offset)),
        None => None,
    };

    Ok(DecodedPreset {
        name: schema
            .preset_name_field()
            .and_then(|field| reader.read_name(field)),
        device: schema.name().to_string(),
        schema_key: schema.key().to_string(),
        schema_version: schema.version().to_string(),
        identifier: schema.identifier().clone(),
        offset: message.offset(),
        length: message.len(),
        checksum_valid,
        parameters,
    })
}

fn out_of_range(descriptor: &ParameterDescriptor, raw: u32) -> CodecError {
    let (min, max) = descriptor.range();
    CodecError::OutOfRange {
        parameter: descriptor.name().to_string(),
        value: f64::from(raw),
        min: f64::from(min),
        max: f64::from(max),
    }
}
