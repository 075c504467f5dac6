use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::framing::FramedMessage;
use crate::schema::{NameField, ParameterDescriptor, RangePolicy, SchemaModel};

use super::checksum::checksum;
use super::error::CodecError;
use super::reader::MessageReader;

/// A value requested for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeValue {
    /// Raw field value, checked against the parameter's range.
    Raw(u32),
    /// Value in [0, 1], rescaled onto the parameter's range.
    Normalized(f64),
}

/// Build a complete message (markers included) from parameter values.
///
/// The body starts zeroed with the schema identifier in place; parameters not
/// named in `values` stay zero. The preset name is written when the schema
/// has a name field, and the checksum, if any, is computed last.
///
/// # Errors
/// `UnknownParameter` or `OutOfRange` for the first offending value, and
/// `MarkerInBody` when a written byte equals the end marker (the message
/// could not be framed again). Nothing is returned in those cases.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use sysex_core::{EncodeValue, ParameterSource, SchemaSource, encode};
///
/// let schema = SchemaSource::new("Mini", [0x7D], 4)
///     .parameter("level", ParameterSource::at(2))
///     .build()
///     .unwrap();
/// let values = BTreeMap::from([("level".to_string(), EncodeValue::Raw(100))]);
/// let bytes = encode(&schema, &values, None).unwrap();
/// assert_eq!(bytes, vec![0xF0, 0x7D, 0x00, 100, 0x00, 0xF7]);
/// ```
pub fn encode(
    schema: &SchemaModel,
    values: &BTreeMap<String, EncodeValue>,
    preset_name: Option<&str>,
) -> Result<Vec<u8>, CodecError> {
    let resolved = resolve(schema, values)?;
    let mut body = vec![0u8; schema.total_length()];
    let identifier = schema.identifier().as_bytes();
    body[..identifier.len()].copy_from_slice(identifier);
    write_body(schema, body, &resolved, preset_name)
}

/// Apply parameter values on top of an existing message.
///
/// Bytes not covered by the named parameters are kept as they are, including
/// bytes past the schema's length.
///
/// # Errors
/// Header errors as in [`decode`](super::decode), then the same value errors
/// as [`encode`].
pub fn patch(
    schema: &SchemaModel,
    message: &FramedMessage<'_>,
    values: &BTreeMap<String, EncodeValue>,
    preset_name: Option<&str>,
) -> Result<Vec<u8>, CodecError> {
    let reader = MessageReader::new(message.body());
    reader.require_header(schema)?;
    let resolved = resolve(schema, values)?;
    write_body(schema, reader.body().to_vec(), &resolved, preset_name)
}

fn resolve<'s>(
    schema: &'s SchemaModel,
    values: &BTreeMap<String, EncodeValue>,
) -> Result<Vec<(&'s ParameterDescriptor, u32)>, CodecError> {
    if let Some(name) = values.keys().find(|name| schema.parameter(name).is_none()) {
        return Err(CodecError::UnknownParameter { name: name.clone() });
    }
    values
        .iter()
        .filter_map(|(name, value)| schema.parameter(name).map(|d| (d, *value)))
        .map(|(descriptor, value)| Ok((descriptor, to_raw(descriptor, value)?)))
        .collect()
}

fn to_raw(descriptor: &ParameterDescriptor, value: EncodeValue) -> Result<u32, CodecError> {
    let (min, max) = descriptor.range();
    let clamp = descriptor.policy() == RangePolicy::Clamp;
    match value {
        EncodeValue::Raw(raw) if descriptor.contains(raw) => Ok(raw),
        EncodeValue::Raw(raw) if clamp => Ok(raw.clamp(min, max)),
        EncodeValue::Raw(raw) => Err(CodecError::OutOfRange {
            parameter: descriptor.name().to_string(),
            value: f64::from(raw),
            min: f64::from(min),
            max: f64::from(max),
        }),
        EncodeValue::Normalized(n) if (0.0..=1.0).contains(&n) => Ok(descriptor.denormalize(n)),
        EncodeValue::Normalized(n) if clamp && !n.is_nan() => Ok(descriptor.denormalize(n)),
        EncodeValue::Normalized(n) => Err(CodecError::OutOfRange {
            parameter: descriptor.name().to_string(),
            value: n,
            min: 0.0,
            max: 1.0,
        }),
    }
}

fn write_body(
    schema: &SchemaModel,
    mut body: Vec<u8>,
    resolved: &[(&ParameterDescriptor, u32)],
    preset_name: Option<&str>,
) -> Result<Vec<u8>, CodecError> {
    for (descriptor, raw) in resolved {
        let offset = descriptor.byte_offset();
        descriptor
            .field()
            .write(&mut body[offset..], *raw)
            .map_err(|source| CodecError::Field {
                parameter: descriptor.name().to_string(),
                source,
            })?;
    }
    if let (Some(field), Some(name)) = (schema.preset_name_field(), preset_name) {
        write_name(&mut body, field, name);
    }
    if let Some(offset) = schema.checksum_offset() {
        body[offset] = checksum(&body[..schema.total_length()], offset);
    }

    let markers = schema.markers();
    if let Some(position) = body.iter().position(|b| *b == markers.end) {
        tracing::debug!(device = schema.name(), position, "end marker inside encoded body");
        return Err(CodecError::MarkerInBody {
            position,
            marker: markers.end,
        });
    }
    let mut message = Vec::with_capacity(body.len() + 2);
    message.push(markers.start);
    message.extend_from_slice(&body);
    message.push(markers.end);
    Ok(message)
}

/// ASCII only; other characters become `?`. Truncated or NUL padded to the
/// field length.
fn write_name(body: &mut [u8], field: NameField, name: &str) {
    let padded = name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
        .chain(std::iter::repeat(0))
        .take(field.length);
    for (slot, byte) in body[field.range()].iter_mut().zip(padded) {
        *slot = byte;
    }
}
