//! SysEx core library: schema-driven decoding and encoding of vendor
//! System-Exclusive dumps.
//!
//! Byte streams are split into messages by the framer, each message is
//! decoded against a declarative schema (bit-addressed parameters with
//! ranges, categories and controller numbers) and results are aggregated
//! into serializable reports. When no schema fits, the analyzer describes the
//! stream structurally. Parsing is byte-oriented and side-effect free; file
//! access is isolated in `source`.
//!
//! Invariants:
//! - Framing and decoding are deterministic; report order follows input order.
//! - A schema only exists in validated form (no overlapping fields).
//! - Encoding never disturbs bits outside the fields it writes.
//!
//! # Examples
//! ```
//! use sysex_core::{ParameterSource, SchemaSource, decode_stream};
//!
//! let schema = SchemaSource::new("Mini", [0x7D, 0x01], 4)
//!     .parameter("cutoff", ParameterSource::at(2).category("filter"))
//!     .parameter("resonance", ParameterSource::at(3).category("filter"))
//!     .build()?;
//!
//! let stream = decode_stream(&schema, &[0xF0, 0x7D, 0x01, 64, 127, 0xF7]);
//! let preset = &stream.presets[0];
//! assert_eq!(preset.parameters["cutoff"].raw, 64);
//! assert_eq!(preset.parameters["resonance"].normalized, 1.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod analysis;
mod batch;
pub mod codec;
mod features;
pub mod framing;
mod hex_text;
mod registry;
pub mod schema;
mod source;

pub use analysis::{analyze_unknown, analyze_unknown_with, manufacturer_name};
pub use batch::{BatchOptions, run_batch};
pub use codec::bits::{BitField, BitFieldError};
pub use codec::{
    BankPreset, CodecError, EncodeValue, StreamDecode, decode, decode_stream, encode, encode_bank,
    patch,
};
pub use features::{FeatureMatrix, MISSING_FEATURE, default_parameter_order, to_feature_vector};
pub use framing::{FramedMessage, Frames, Markers, frame};
pub use hex_text::spaced_hex;
pub use registry::{LoadFailure, LoadReport, RegistryError, SchemaRegistry, install, installed};
pub use schema::{
    DeviceIdentifier, Encoding, MAX_BODY_LENGTH, NameField, ParameterDescriptor, ParameterSource,
    RangePolicy, SchemaError, SchemaModel, SchemaSource,
};
pub use source::{FileSource, InputSource, MemorySource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the caller does not supply one.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Versioned envelope around any report body.
///
/// The body's fields are flattened next to the envelope fields.
///
/// # Examples
/// ```
/// use sysex_core::{AnalysisReport, make_report};
///
/// let report = make_report(AnalysisReport::default());
/// let json = serde_json::to_value(&report).unwrap();
/// assert_eq!(json["report_version"], sysex_core::REPORT_VERSION);
/// assert_eq!(json["source_len"], 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report<T> {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    /// Report payload.
    #[serde(flatten)]
    pub body: T,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "sysex").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input metadata embedded in reports.
///
/// # Examples
/// ```
/// use sysex_core::InputInfo;
///
/// let input = InputInfo {
///     path: "virus_bank_a.syx".to_string(),
///     bytes: 32_768,
/// };
/// assert_eq!(input.bytes, 32_768);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path or identifier as provided by the caller.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// One decoded parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedParameter {
    /// Value as read from the bit field.
    pub raw: u32,
    /// Raw value rescaled from the parameter's range to [0, 1].
    pub normalized: f64,
    /// Grouping label from the schema.
    pub category: String,
    /// MIDI controller number, when the schema maps one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<u8>,
    /// Free-text note from the schema.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Decoded parameter set for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedPreset {
    /// Preset name, when the schema has a name field and it holds ASCII text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Device name of the schema used.
    pub device: String,
    /// Registry key of the schema used.
    pub schema_key: String,
    /// Version of the schema used.
    pub schema_version: String,
    /// Device identifier the message carried.
    pub identifier: DeviceIdentifier,
    /// Offset of the start marker in the source stream.
    pub offset: usize,
    /// Message length, markers included.
    pub length: usize,
    /// Checksum verdict, only when the schema declares a checksum byte.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_valid: Option<bool>,
    /// Parameters by name.
    pub parameters: BTreeMap<String, DecodedParameter>,
}

/// A framed message that could not be decoded.
///
/// # Examples
/// ```
/// use sysex_core::{CodecError, MessageFailure};
///
/// let err = CodecError::TruncatedMessage { needed: 254, actual: 10 };
/// let failure = MessageFailure::new(42, &err);
/// assert_eq!(failure.kind, "truncated_message");
/// assert_eq!(failure.offset, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFailure {
    /// Offset of the message's start marker.
    pub offset: usize,
    /// Stable error tag (see [`CodecError::kind`]).
    pub kind: String,
    /// Human-readable error message.
    pub message: String,
}

impl MessageFailure {
    pub fn new(offset: usize, err: &CodecError) -> Self {
        Self {
            offset,
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Decoding result for a single input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeReport {
    pub input: InputInfo,
    /// Registry key of the schema used.
    pub device: String,
    /// Framed messages seen.
    pub messages: usize,
    /// Start markers dropped for lack of an end marker.
    pub truncated_messages: usize,
    pub presets: Vec<DecodedPreset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<MessageFailure>,
}

impl DecodeReport {
    pub fn new(input: InputInfo, schema: &SchemaModel, stream: StreamDecode) -> Self {
        Self {
            input,
            device: schema.key().to_string(),
            messages: stream.messages,
            truncated_messages: stream.truncated,
            presets: stream.presets,
            errors: stream.errors,
        }
    }
}

/// Structural description of a stream decoded without a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Length of the analyzed stream in bytes.
    pub source_len: usize,
    /// Messages in stream order.
    pub messages: Vec<MessageSummary>,
    /// Start markers dropped for lack of an end marker (0 or 1).
    pub truncated_tail: usize,
    /// Candidate manufacturers, most frequent first.
    pub manufacturers: Vec<ManufacturerTally>,
}

/// One message found by the analyzer.
///
/// # Examples
/// ```
/// use sysex_core::analyze_unknown;
///
/// let report = analyze_unknown(&[0xF0, 0x41, 0x10, 0x42, 0x12, 0xF7]);
/// let message = &report.messages[0];
/// assert_eq!(message.index, 1);
/// assert_eq!(message.hex_preview, "f0 41 10 42 12 f7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    /// 1-based sequence number.
    pub index: usize,
    /// Offset of the start marker.
    pub start_offset: usize,
    /// Length, markers included.
    pub length: usize,
    /// First body bytes, when the message is long enough to carry them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_candidate: Option<DeviceIdentifier>,
    /// Leading bytes as spaced hex, `...` appended when cut.
    pub hex_preview: String,
}

/// Messages attributed to one manufacturer ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerTally {
    /// Manufacturer ID bytes (1 byte, or 3 bytes starting with `0x00`).
    pub id: DeviceIdentifier,
    /// Registered manufacturer name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub messages: usize,
}

/// Overall outcome of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every input processed and every message decoded.
    Success,
    /// Some inputs or messages failed.
    Partial,
    /// No input could be processed.
    Failed,
}

/// Outcome of a single batch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Processed,
    Failed,
}

/// Result for one batch input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Source identifier (usually a path).
    pub source: String,
    pub status: EntryStatus,
    /// Framed messages seen.
    pub messages: usize,
    /// Start markers dropped for lack of an end marker.
    pub truncated_messages: usize,
    pub presets: Vec<DecodedPreset>,
    /// Per-message decode failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<MessageFailure>,
    /// Why the input could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_error: Option<String>,
}

/// Aggregate over a batch run, entries in input order.
///
/// Accounting holds for every report, including limited runs:
/// `processed_count + failed_count == entries.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub processed_count: usize,
    pub failed_count: usize,
    pub total_presets: usize,
    /// Decoded parameter values across all presets.
    pub total_parameters: usize,
    /// Framed messages that failed to decode.
    pub skipped_messages: usize,
    /// Truncated tails across all inputs.
    pub framing_warnings: usize,
    pub status: BatchStatus,
}

/// Wrap a report body with base fields filled in.
///
/// # Examples
/// ```
/// use sysex_core::{AnalysisReport, make_report};
///
/// let report = make_report(AnalysisReport::default());
/// assert_eq!(report.report_version, sysex_core::REPORT_VERSION);
/// assert_eq!(report.generated_at, sysex_core::DEFAULT_GENERATED_AT);
/// ```
pub fn make_report<T>(body: T) -> Report<T> {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "sysex".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn preset_omits_optional_fields_when_none() {
        let preset = DecodedPreset {
            name: None,
            device: "Test".to_string(),
            schema_key: "test".to_string(),
            schema_version: "1.0".to_string(),
            identifier: DeviceIdentifier::new([0x7D]),
            offset: 0,
            length: 4,
            checksum_valid: None,
            parameters: BTreeMap::from([(
                "level".to_string(),
                DecodedParameter {
                    raw: 1,
                    normalized: 1.0 / 127.0,
                    category: "amp".to_string(),
                    controller: None,
                    description: String::new(),
                },
            )]),
        };

        let value = serde_json::to_value(&preset).expect("preset json");
        assert!(value.get("name").is_none());
        assert!(value.get("checksum_valid").is_none());
        assert_eq!(value["identifier"], serde_json::json!([0x7D]));
        assert!(value["parameters"]["level"].get("controller").is_none());
        assert!(value["parameters"]["level"].get("description").is_none());
    }

    #[test]
    fn envelope_flattens_body() {
        let report = make_report(BatchReport {
            entries: Vec::new(),
            processed_count: 0,
            failed_count: 0,
            total_presets: 0,
            total_parameters: 0,
            skipped_messages: 0,
            framing_warnings: 0,
            status: BatchStatus::Failed,
        });
        let value = serde_json::to_value(&report).expect("report json");
        assert_eq!(value["tool"]["name"], "sysex");
        assert_eq!(value["status"], "failed");
        assert!(value.get("body").is_none());
    }
}
