use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::bits::BitField;
use crate::framing::Markers;

/// Byte sequence identifying a manufacturer/device/model combination.
///
/// Two identifiers are equal iff their bytes match exactly. The identifier
/// occupies the first bytes of every message body of its device.
///
/// # Examples
/// ```
/// use sysex_core::DeviceIdentifier;
///
/// let id = DeviceIdentifier::new([0x00, 0x20, 0x33]);
/// assert_eq!(id.to_string(), "00 20 33");
/// assert!(id.is_prefix_of(&[0x00, 0x20, 0x33, 0x01]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceIdentifier(Vec<u8>);

impl DeviceIdentifier {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `body` starts with this identifier.
    pub fn is_prefix_of(&self, body: &[u8]) -> bool {
        body.starts_with(&self.0)
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::hex_text::spaced_hex(&self.0))
    }
}

/// Primitive encoding of a parameter's containing word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// One byte.
    #[default]
    Uint8,
    /// Two bytes, most significant first.
    Uint16,
    /// Two 7-bit data bytes, most significant first (14-bit word).
    Uint14,
}

impl Encoding {
    /// Number of message bytes the word spans.
    pub fn width(self) -> usize {
        match self {
            Encoding::Uint8 => 1,
            Encoding::Uint16 | Encoding::Uint14 => 2,
        }
    }

    /// Number of usable bits in the word.
    pub fn word_bits(self) -> u32 {
        match self {
            Encoding::Uint8 => 8,
            Encoding::Uint16 => 16,
            Encoding::Uint14 => 14,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Encoding::Uint8 => "uint8",
            Encoding::Uint16 => "uint16",
            Encoding::Uint14 => "uint14",
        }
    }

    /// Read the word at the start of `bytes`, or `None` if too short.
    pub fn read_word(self, bytes: &[u8]) -> Option<u32> {
        match self {
            Encoding::Uint8 => bytes.first().map(|b| u32::from(*b)),
            Encoding::Uint16 => match bytes {
                [hi, lo, ..] => Some(u32::from(*hi) << 8 | u32::from(*lo)),
                _ => None,
            },
            Encoding::Uint14 => match bytes {
                [hi, lo, ..] => Some(u32::from(hi & 0x7F) << 7 | u32::from(lo & 0x7F)),
                _ => None,
            },
        }
    }

    /// Store `word` at the start of `bytes`. Returns `false` if too short.
    ///
    /// For `Uint14` the high bit of each byte is left untouched.
    pub fn write_word(self, bytes: &mut [u8], word: u32) -> bool {
        match self {
            Encoding::Uint8 => match bytes.first_mut() {
                Some(b) => {
                    *b = word as u8;
                    true
                }
                None => false,
            },
            Encoding::Uint16 => match bytes {
                [hi, lo, ..] => {
                    *hi = (word >> 8) as u8;
                    *lo = word as u8;
                    true
                }
                _ => false,
            },
            Encoding::Uint14 => match bytes {
                [hi, lo, ..] => {
                    *hi = (*hi & 0x80) | ((word >> 7) as u8 & 0x7F);
                    *lo = (*lo & 0x80) | (word as u8 & 0x7F);
                    true
                }
                _ => false,
            },
        }
    }
}

/// What to do with a value outside a parameter's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Fail with `OutOfRange`.
    #[default]
    Reject,
    /// Clamp into the range.
    Clamp,
}

/// Location of the human-readable preset name inside the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameField {
    pub offset: usize,
    pub length: usize,
}

impl NameField {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// One named, bit-addressed value within a schema.
///
/// Built only through schema validation, so every descriptor in a
/// [`SchemaModel`] has a well-formed bit field and a non-empty range.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub(crate) name: String,
    pub(crate) byte_offset: usize,
    pub(crate) field: BitField,
    pub(crate) min: u32,
    pub(crate) max: u32,
    pub(crate) declared_max: u32,
    pub(crate) category: String,
    pub(crate) controller: Option<u8>,
    pub(crate) description: String,
    pub(crate) policy: RangePolicy,
}

impl ParameterDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn field(&self) -> &BitField {
        &self.field
    }

    pub fn encoding(&self) -> Encoding {
        self.field.encoding()
    }

    /// Effective inclusive range: the declared range narrowed to what the
    /// bit field can hold.
    pub fn range(&self) -> (u32, u32) {
        (self.min, self.max)
    }

    /// Upper bound as written in the schema source.
    pub fn declared_max(&self) -> u32 {
        self.declared_max
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn controller(&self) -> Option<u8> {
        self.controller
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    pub fn contains(&self, raw: u32) -> bool {
        (self.min..=self.max).contains(&raw)
    }

    /// Linear rescale of `raw` into [0, 1]; values outside the range are
    /// clamped first. A single-value range normalizes to 0.0.
    pub fn normalize(&self, raw: u32) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        let clamped = raw.clamp(self.min, self.max);
        f64::from(clamped - self.min) / f64::from(self.max - self.min)
    }

    /// Inverse of [`normalize`](Self::normalize) for `normalized` in [0, 1].
    pub fn denormalize(&self, normalized: f64) -> u32 {
        let span = f64::from(self.max - self.min);
        let raw = (normalized.clamp(0.0, 1.0) * span).round() as u32 + self.min;
        raw.min(self.max)
    }
}

/// Declarative layout of one device's dump format.
///
/// Offsets are relative to the message body, i.e. the bytes between the
/// start and end markers; the identifier occupies the first body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaModel {
    pub(crate) key: String,
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) identifier: DeviceIdentifier,
    pub(crate) markers: Markers,
    pub(crate) preset_name: Option<NameField>,
    pub(crate) checksum_offset: Option<usize>,
    pub(crate) total_length: usize,
    pub(crate) parameters: BTreeMap<String, ParameterDescriptor>,
}

impl SchemaModel {
    /// Registry key (e.g. `access_virus_c`).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn identifier(&self) -> &DeviceIdentifier {
        &self.identifier
    }

    pub fn markers(&self) -> Markers {
        self.markers
    }

    pub fn preset_name_field(&self) -> Option<NameField> {
        self.preset_name
    }

    pub fn checksum_offset(&self) -> Option<usize> {
        self.checksum_offset
    }

    /// Expected body length (markers excluded).
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.get(name)
    }

    /// Parameters in name order.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.values()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceIdentifier, Encoding};

    #[test]
    fn identifier_equality_is_bytewise() {
        assert_eq!(DeviceIdentifier::new([1, 2]), DeviceIdentifier::new(vec![1, 2]));
        assert_ne!(DeviceIdentifier::new([1, 2]), DeviceIdentifier::new([1, 2, 0]));
    }

    #[test]
    fn uint16_words_are_msb_first() {
        assert_eq!(Encoding::Uint16.read_word(&[0x12, 0x34]), Some(0x1234));
        let mut bytes = [0u8; 2];
        assert!(Encoding::Uint16.write_word(&mut bytes, 0xABCD));
        assert_eq!(bytes, [0xAB, 0xCD]);
    }

    #[test]
    fn uint14_words_pack_seven_bits_per_byte() {
        assert_eq!(Encoding::Uint14.read_word(&[0x01, 0x7F]), Some(0xFF));
        let mut bytes = [0x80, 0x00];
        assert!(Encoding::Uint14.write_word(&mut bytes, 0x3FFF));
        assert_eq!(bytes, [0xFF, 0x7F]);
    }

    #[test]
    fn short_slices_are_rejected() {
        assert_eq!(Encoding::Uint16.read_word(&[0x01]), None);
        assert!(!Encoding::Uint8.write_word(&mut [], 1));
    }
}
