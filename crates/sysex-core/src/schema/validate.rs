use std::collections::BTreeMap;

use crate::codec::bits::BitField;
use crate::framing::Markers;

use super::error::SchemaError;
use super::model::{DeviceIdentifier, ParameterDescriptor, SchemaModel};
use super::source::{ParameterSource, SchemaSource};

impl SchemaSource {
    /// Validate the record and build a [`SchemaModel`].
    ///
    /// # Errors
    /// Returns the first [`SchemaError`] found; nothing is partially built.
    pub fn build(self) -> Result<SchemaModel, SchemaError> {
        build_schema(self)
    }
}

impl SchemaModel {
    /// Parse and validate a JSON schema record.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        SchemaSource::from_json(text)?.build()
    }
}

/// Largest accepted `total_length`. Encoding allocates a body of this size.
pub const MAX_BODY_LENGTH: usize = 1 << 20;

fn build_schema(source: SchemaSource) -> Result<SchemaModel, SchemaError> {
    let SchemaSource {
        key,
        name,
        version,
        identifier,
        start_marker,
        end_marker,
        preset_name,
        checksum_offset,
        total_length,
        parameters: sources,
    } = source;

    if name.trim().is_empty() {
        return Err(SchemaError::EmptyName);
    }
    if identifier.is_empty() {
        return Err(SchemaError::EmptyIdentifier);
    }
    if start_marker == end_marker {
        return Err(SchemaError::SameMarkers {
            marker: start_marker,
        });
    }
    if let Some(marker) = [start_marker, end_marker]
        .into_iter()
        .find(|marker| identifier.contains(marker))
    {
        return Err(SchemaError::MarkerInIdentifier { marker });
    }

    if total_length > MAX_BODY_LENGTH {
        return Err(SchemaError::BodyTooLong {
            total_length,
            max: MAX_BODY_LENGTH,
        });
    }

    let mut layout = Occupancy::new(total_length);
    layout.claim_bytes("identifier", 0, identifier.len())?;
    if let Some(field) = preset_name {
        if field.length == 0 {
            return Err(SchemaError::EmptyNameField);
        }
        layout.claim_bytes("preset name", field.offset, field.length)?;
    }
    if let Some(offset) = checksum_offset {
        layout.claim_bytes("checksum", offset, 1)?;
    }

    let mut parameters = BTreeMap::new();
    for (parameter_name, parameter) in sources {
        let descriptor = build_parameter(parameter_name, parameter)?;
        layout.claim_field(&descriptor)?;
        parameters.insert(descriptor.name.clone(), descriptor);
    }

    let key = key
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| slug(&name));

    Ok(SchemaModel {
        key,
        name,
        version,
        identifier: DeviceIdentifier::new(identifier),
        markers: Markers::new(start_marker, end_marker),
        preset_name,
        checksum_offset,
        total_length,
        parameters,
    })
}

fn build_parameter(name: String, source: ParameterSource) -> Result<ParameterDescriptor, SchemaError> {
    if name.trim().is_empty() {
        return Err(SchemaError::EmptyParameterName);
    }
    let field = BitField::new(source.bit_mask, source.bit_shift, source.data_type).map_err(
        |err| SchemaError::InvalidBitField {
            parameter: name.clone(),
            source: err,
        },
    )?;

    let [min, max] = source.value_range;
    if min > max {
        return Err(SchemaError::InvalidRange {
            parameter: name,
            min,
            max,
        });
    }
    let capacity = field.capacity();
    if min > capacity {
        return Err(SchemaError::RangeExceedsField {
            parameter: name,
            min,
            capacity,
        });
    }
    if let Some(value) = source.cc_number.filter(|cc| *cc > 0x7F) {
        return Err(SchemaError::InvalidController {
            parameter: name,
            value,
        });
    }
    if max > capacity {
        tracing::debug!(
            parameter = %name,
            declared_max = max,
            capacity,
            "range narrowed to bit field capacity"
        );
    }

    Ok(ParameterDescriptor {
        name,
        byte_offset: source.byte_offset,
        field,
        min,
        max: max.min(capacity),
        declared_max: max,
        category: source.category,
        controller: source.cc_number,
        description: source.description,
        policy: source.range_policy,
    })
}

/// Bit ownership of the claimed body bytes, used to reject overlapping
/// fields. Only claimed bytes have an entry.
struct Occupancy {
    total_length: usize,
    owners: BTreeMap<usize, Vec<(String, u8)>>,
}

impl Occupancy {
    fn new(total_length: usize) -> Self {
        Self {
            total_length,
            owners: BTreeMap::new(),
        }
    }

    fn claim_bytes(&mut self, owner: &str, offset: usize, len: usize) -> Result<(), SchemaError> {
        self.claim(owner, offset, len, |_| 0xFF)
    }

    fn claim_field(&mut self, descriptor: &ParameterDescriptor) -> Result<(), SchemaError> {
        let masks = descriptor.field.byte_masks();
        self.claim(&descriptor.name, descriptor.byte_offset, masks.len(), |i| masks[i])
    }

    /// Claim `len` bytes from `offset`; `mask_at(i)` gives the bits of byte
    /// `offset + i`. Bounds are checked before any byte is visited.
    fn claim(
        &mut self,
        owner: &str,
        offset: usize,
        len: usize,
        mask_at: impl Fn(usize) -> u8,
    ) -> Result<(), SchemaError> {
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= self.total_length)
            .ok_or_else(|| SchemaError::FieldOutOfBounds {
                field: owner.to_string(),
                end: offset.saturating_add(len),
                total_length: self.total_length,
            })?;

        for (i, byte) in (offset..end).enumerate() {
            let mask = mask_at(i);
            let clash = self
                .owners
                .get(&byte)
                .and_then(|owners| owners.iter().find(|(_, claimed)| claimed & mask != 0));
            if let Some((first, _)) = clash {
                return Err(SchemaError::Overlap {
                    first: first.clone(),
                    second: owner.to_string(),
                    byte,
                });
            }
        }
        for (i, byte) in (offset..end).enumerate() {
            let mask = mask_at(i);
            if mask != 0 {
                self.owners
                    .entry(byte)
                    .or_default()
                    .push((owner.to_string(), mask));
            }
        }
        Ok(())
    }
}

/// Lowercase key from a display name: `"Access Virus C"` -> `access_virus_c`.
fn slug(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
