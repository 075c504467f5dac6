//! Bit-field access on message bytes.
//!
//! A [`BitField`] addresses a value inside a word of one or two bytes. Writes
//! are read-modify-write: bits outside the field's mask are preserved, which
//! is what lets several parameters share a byte.

use thiserror::Error;

use crate::schema::Encoding;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitFieldError {
    #[error("bit mask is zero")]
    EmptyMask,
    #[error("bit shift {shift} exceeds the {bits}-bit word")]
    ShiftTooWide { shift: u32, bits: u32 },
    #[error("bit mask {mask:#x} does not fit the {bits}-bit word")]
    MaskTooWide { mask: u32, bits: u32 },
    #[error("bit mask {mask:#x} selects bits below shift {shift}")]
    MaskBelowShift { mask: u32, shift: u32 },
    #[error("value {value} does not fit the field (capacity {capacity})")]
    ValueTooWide { value: u32, capacity: u32 },
    #[error("need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}

/// Mask + shift over a word of a given encoding.
///
/// The mask is held in word position. A declared mask that selects nothing
/// once shifted (`mask >> shift == 0`) is taken as a field-level mask and
/// moved into position, so `(0xF0, 4)` and `(0x0F, 4)` both address the high
/// nibble.
///
/// # Examples
/// ```
/// use sysex_core::{BitField, Encoding};
///
/// let high = BitField::new(0x0F, 4, Encoding::Uint8).unwrap();
/// let mut byte = [0b0000_0011];
/// high.write(&mut byte, 0xF).unwrap();
/// assert_eq!(byte, [0b1111_0011]);
/// assert_eq!(high.read(&byte).unwrap(), 0xF);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    mask: u32,
    shift: u32,
    encoding: Encoding,
}

impl BitField {
    pub fn new(mask: u32, shift: u32, encoding: Encoding) -> Result<Self, BitFieldError> {
        let bits = encoding.word_bits();
        if mask == 0 {
            return Err(BitFieldError::EmptyMask);
        }
        if shift >= bits {
            return Err(BitFieldError::ShiftTooWide { shift, bits });
        }
        let positioned = if mask >> shift == 0 {
            mask.checked_shl(shift).filter(|m| m >> shift == mask)
        } else {
            Some(mask)
        };
        let positioned = match positioned {
            Some(m) if m >> bits == 0 => m,
            _ => return Err(BitFieldError::MaskTooWide { mask, bits }),
        };
        if positioned & ((1 << shift) - 1) != 0 {
            return Err(BitFieldError::MaskBelowShift { mask, shift });
        }
        Ok(Self {
            mask: positioned,
            shift,
            encoding,
        })
    }

    /// Whole-byte field (`0xFF`, no shift).
    pub fn byte() -> Self {
        Self {
            mask: 0xFF,
            shift: 0,
            encoding: Encoding::Uint8,
        }
    }

    /// Mask in word position.
    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Largest value the field can hold.
    pub fn capacity(&self) -> u32 {
        self.mask >> self.shift
    }

    /// Extract the field from the word at the start of `bytes`.
    pub fn read(&self, bytes: &[u8]) -> Result<u32, BitFieldError> {
        let word = self.encoding.read_word(bytes).ok_or(BitFieldError::TooShort {
            needed: self.encoding.width(),
            actual: bytes.len(),
        })?;
        Ok((word & self.mask) >> self.shift)
    }

    /// Store `value` into the word at the start of `bytes`, keeping every bit
    /// outside the mask.
    pub fn write(&self, bytes: &mut [u8], value: u32) -> Result<(), BitFieldError> {
        let capacity = self.capacity();
        if value > capacity {
            return Err(BitFieldError::ValueTooWide { value, capacity });
        }
        let too_short = BitFieldError::TooShort {
            needed: self.encoding.width(),
            actual: bytes.len(),
        };
        let word = self.encoding.read_word(bytes).ok_or(too_short.clone())?;
        let updated = (word & !self.mask) | ((value << self.shift) & self.mask);
        if !self.encoding.write_word(bytes, updated) {
            return Err(too_short);
        }
        Ok(())
    }

    /// Per-byte masks of the bits this field occupies, in message order.
    pub fn byte_masks(&self) -> Vec<u8> {
        match self.encoding {
            Encoding::Uint8 => vec![self.mask as u8],
            Encoding::Uint16 => vec![(self.mask >> 8) as u8, self.mask as u8],
            Encoding::Uint14 => vec![(self.mask >> 7) as u8 & 0x7F, self.mask as u8 & 0x7F],
        }
    }
}
