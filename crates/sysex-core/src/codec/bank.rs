//! Multi-preset dumps: one message per preset, concatenated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::SchemaModel;

use super::error::CodecError;
use super::writer::{EncodeValue, encode};

/// Values for one preset of a bank.
///
/// A parameter named in both maps takes its normalized value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BankPreset {
    /// Preset name; `Preset_<n>` (1-based) when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub raw: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub normalized: BTreeMap<String, f64>,
}

impl BankPreset {
    fn values(&self) -> BTreeMap<String, EncodeValue> {
        let raw = self
            .raw
            .iter()
            .map(|(name, raw)| (name.clone(), EncodeValue::Raw(*raw)));
        let normalized = self
            .normalized
            .iter()
            .map(|(name, n)| (name.clone(), EncodeValue::Normalized(*n)));
        raw.chain(normalized).collect()
    }
}

/// Encode every preset and concatenate the messages in order.
///
/// # Errors
/// The first failing preset's error, wrapped in `BankPreset` with its
/// 0-based index.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use sysex_core::{BankPreset, ParameterSource, SchemaSource, decode_stream, encode_bank};
///
/// let schema = SchemaSource::new("Mini", [0x7D], 6)
///     .preset_name(2, 4)
///     .parameter("level", ParameterSource::at(1))
///     .build()
///     .unwrap();
/// let bank = [
///     BankPreset { raw: BTreeMap::from([("level".to_string(), 10)]), ..Default::default() },
///     BankPreset { name: Some("Pad".to_string()), ..Default::default() },
/// ];
/// let bytes = encode_bank(&schema, &bank).unwrap();
/// let stream = decode_stream(&schema, &bytes);
/// assert_eq!(stream.presets.len(), 2);
/// assert_eq!(stream.presets[0].name.as_deref(), Some("Pres"));
/// assert_eq!(stream.presets[1].name.as_deref(), Some("Pad"));
/// ```
pub fn encode_bank(schema: &SchemaModel, presets: &[BankPreset]) -> Result<Vec<u8>, CodecError> {
    let mut bank = Vec::with_capacity(presets.len() * (schema.total_length() + 2));
    for (index, preset) in presets.iter().enumerate() {
        let name = preset
            .name
            .clone()
            .unwrap_or_else(|| format!("Preset_{}", index + 1));
        let message = encode(schema, &preset.values(), Some(&name)).map_err(|source| {
            CodecError::BankPreset {
                index,
                source: Box::new(source),
            }
        })?;
        bank.extend_from_slice(&message);
    }
    tracing::debug!(device = schema.name(), presets = presets.len(), bytes = bank.len(), "bank encoded");
    Ok(bank)
}
