//! Parameter codec: schema-driven decoding and encoding of message bodies.
//!
//! Layers follow the same split as the framer:
//! - `bits`: bit-field extraction and read-modify-write insertion
//! - `reader`: bounds-checked access to a message body
//! - `parser`: body -> [`DecodedPreset`](crate::DecodedPreset)
//! - `writer`: parameter values -> message bytes
//! - `bank`: several presets -> one concatenated dump
//! - `error`: explicit, per-message errors
//!
//! Every call is stateless; schemas are only read.

mod bank;
pub mod bits;
mod checksum;
pub mod error;
pub mod parser;
pub mod reader;
pub mod writer;

pub use bank::{BankPreset, encode_bank};
pub use checksum::checksum;
pub use error::CodecError;
pub use parser::decode;
pub use writer::{EncodeValue, encode, patch};

use crate::framing::frame;
use crate::schema::SchemaModel;
use crate::{DecodedPreset, MessageFailure};

/// Result of decoding every message in a byte stream.
#[derive(Debug, Clone, Default)]
pub struct StreamDecode {
    /// Successfully decoded presets in stream order.
    pub presets: Vec<DecodedPreset>,
    /// One entry per framed message that failed to decode.
    pub errors: Vec<MessageFailure>,
    /// Number of framed messages seen.
    pub messages: usize,
    /// Start markers dropped for lack of an end marker.
    pub truncated: usize,
}

/// Frame `data` with the schema's markers and decode every message.
///
/// Per-message failures are collected, never propagated.
///
/// # Examples
/// ```
/// use sysex_core::{ParameterSource, SchemaSource, decode_stream};
///
/// let schema = SchemaSource::new("Mini", [0x7D], 2)
///     .parameter("level", ParameterSource::at(1))
///     .build()
///     .unwrap();
/// let data = [0xF0, 0x7D, 0x10, 0xF7, 0xF0, 0x7E, 0x10, 0xF7, 0xF0];
/// let stream = decode_stream(&schema, &data);
/// assert_eq!(stream.messages, 2);
/// assert_eq!(stream.presets.len(), 1);
/// assert_eq!(stream.errors[0].kind, "schema_mismatch");
/// assert_eq!(stream.truncated, 1);
/// ```
pub fn decode_stream(schema: &SchemaModel, data: &[u8]) -> StreamDecode {
    let mut frames = frame(data, schema.markers());
    let mut stream = StreamDecode::default();
    for message in frames.by_ref() {
        stream.messages += 1;
        match decode(schema, &message) {
            Ok(preset) => stream.presets.push(preset),
            Err(err) => {
                tracing::debug!(offset = message.offset(), error = %err, "message skipped");
                stream.errors.push(MessageFailure::new(message.offset(), &err));
            }
        }
    }
    stream.truncated = frames.truncated();
    stream
}
