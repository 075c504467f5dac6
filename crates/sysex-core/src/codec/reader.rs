use crate::schema::{DeviceIdentifier, NameField, ParameterDescriptor, SchemaModel};

use super::error::CodecError;

/// Bounds-checked access to a message body.
pub struct MessageReader<'a> {
    body: &'a [u8],
}

impl<'a> MessageReader<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    pub fn require_len(&self, needed: usize) -> Result<(), CodecError> {
        if self.body.len() < needed {
            return Err(CodecError::TruncatedMessage {
                needed,
                actual: self.body.len(),
            });
        }
        Ok(())
    }

    /// Check the identifier and length expected by `schema`.
    ///
    /// The identifier is compared over the bytes the body actually has, so a
    /// short message from another device reports a mismatch rather than a
    /// truncation.
    pub fn require_header(&self, schema: &SchemaModel) -> Result<(), CodecError> {
        let expected = schema.identifier();
        let available = expected.len().min(self.body.len());
        if self.body[..available] != expected.as_bytes()[..available] {
            return Err(CodecError::SchemaMismatch {
                expected: expected.clone(),
                found: DeviceIdentifier::new(&self.body[..available]),
            });
        }
        self.require_len(schema.total_length())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, CodecError> {
        self.body
            .get(offset)
            .copied()
            .ok_or(CodecError::TruncatedMessage {
                needed: offset + 1,
                actual: self.body.len(),
            })
    }

    pub fn read_field(&self, descriptor: &ParameterDescriptor) -> Result<u32, CodecError> {
        let offset = descriptor.byte_offset();
        let bytes = self.body.get(offset..).unwrap_or_default();
        descriptor
            .field()
            .read(bytes)
            .map_err(|_| CodecError::TruncatedMessage {
                needed: offset + descriptor.encoding().width(),
                actual: self.body.len(),
            })
    }

    /// ASCII name with NULs and surrounding whitespace trimmed; `None` when
    /// empty or not ASCII.
    pub fn read_name(&self, field: NameField) -> Option<String> {
        let end = field.range().end.min(self.body.len());
        let bytes = self.body.get(field.offset..end)?;
        if !bytes.is_ascii() {
            return None;
        }
        let name = String::from_utf8_lossy(bytes);
        let name = name.trim_end_matches('\0').trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}
