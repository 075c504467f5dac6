//! Declarative schema records as they appear in JSON schema files.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::framing::layout;

use super::model::{Encoding, NameField, RangePolicy};

/// One device record.
///
/// # Examples
/// ```
/// use sysex_core::{ParameterSource, SchemaSource};
///
/// let source = SchemaSource::new("Test Synth", [0x7D, 0x01], 16)
///     .parameter("cutoff", ParameterSource::at(4).category("filter"));
/// let schema = source.build().unwrap();
/// assert_eq!(schema.key(), "test_synth");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSource {
    /// Registry key; derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub identifier: Vec<u8>,
    #[serde(default = "default_start_marker")]
    pub start_marker: u8,
    #[serde(default = "default_end_marker")]
    pub end_marker: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_name: Option<NameField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_offset: Option<usize>,
    pub total_length: usize,
    #[serde(deserialize_with = "unique_parameters")]
    pub parameters: BTreeMap<String, ParameterSource>,
}

/// One parameter record. Defaults follow the common 7-bit layout: full byte,
/// no shift, range `[0, 127]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSource {
    pub byte_offset: usize,
    #[serde(default = "default_mask")]
    pub bit_mask: u32,
    #[serde(default)]
    pub bit_shift: u32,
    #[serde(default = "default_range")]
    pub value_range: [u32; 2],
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_number: Option<u8>,
    #[serde(default)]
    pub data_type: Encoding,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub range_policy: RangePolicy,
}

impl SchemaSource {
    pub fn new(name: impl Into<String>, identifier: impl Into<Vec<u8>>, total_length: usize) -> Self {
        Self {
            key: None,
            name: name.into(),
            version: default_version(),
            identifier: identifier.into(),
            start_marker: layout::SYSEX_START,
            end_marker: layout::SYSEX_END,
            preset_name: None,
            checksum_offset: None,
            total_length,
            parameters: BTreeMap::new(),
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn preset_name(mut self, offset: usize, length: usize) -> Self {
        self.preset_name = Some(NameField { offset, length });
        self
    }

    pub fn checksum(mut self, offset: usize) -> Self {
        self.checksum_offset = Some(offset);
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, parameter: ParameterSource) -> Self {
        self.parameters.insert(name.into(), parameter);
        self
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Starting point for a new device file: a valid skeleton with a preset
    /// name, a checksum and one example parameter to copy.
    ///
    /// # Examples
    /// ```
    /// use sysex_core::SchemaSource;
    ///
    /// let template = SchemaSource::template("My Synth");
    /// let schema = template.clone().build().unwrap();
    /// assert_eq!(schema.key(), "my_synth");
    /// assert!(serde_json::to_string(&template).unwrap().contains("example_parameter"));
    /// ```
    pub fn template(name: impl Into<String>) -> Self {
        Self::new(name, TEMPLATE_IDENTIFIER, TEMPLATE_LENGTH)
            .preset_name(100, 16)
            .checksum(200)
            .parameter(
                "example_parameter",
                ParameterSource::at(10)
                    .category("oscillator")
                    .controller(74)
                    .description("Example parameter description"),
            )
    }
}

/// Manufacturer bytes left at zero for the user to fill in.
const TEMPLATE_IDENTIFIER: [u8; 5] = [0x00, 0x00, 0x00, 0x01, 0x00];
const TEMPLATE_LENGTH: usize = 256;

impl ParameterSource {
    pub fn at(byte_offset: usize) -> Self {
        Self {
            byte_offset,
            bit_mask: default_mask(),
            bit_shift: 0,
            value_range: default_range(),
            category: default_category(),
            cc_number: None,
            data_type: Encoding::default(),
            description: String::new(),
            range_policy: RangePolicy::default(),
        }
    }

    pub fn mask(mut self, mask: u32) -> Self {
        self.bit_mask = mask;
        self
    }

    pub fn shift(mut self, shift: u32) -> Self {
        self.bit_shift = shift;
        self
    }

    pub fn range(mut self, min: u32, max: u32) -> Self {
        self.value_range = [min, max];
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn controller(mut self, cc: u8) -> Self {
        self.cc_number = Some(cc);
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.data_type = encoding;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_start_marker() -> u8 {
    layout::SYSEX_START
}

fn default_end_marker() -> u8 {
    layout::SYSEX_END
}

fn default_mask() -> u32 {
    0xFF
}

fn default_range() -> [u32; 2] {
    [0, 127]
}

fn default_category() -> String {
    "unknown".to_string()
}

// A plain map deserializer keeps the last of two equal keys; reject instead.
fn unique_parameters<'de, D>(deserializer: D) -> Result<BTreeMap<String, ParameterSource>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueParameters;

    impl<'de> Visitor<'de> for UniqueParameters {
        type Value = BTreeMap<String, ParameterSource>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of parameter name to parameter definition")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut parameters = BTreeMap::new();
            while let Some((name, parameter)) = map.next_entry::<String, ParameterSource>()? {
                if parameters.contains_key(&name) {
                    return Err(de::Error::custom(format!("duplicate parameter '{name}'")));
                }
                parameters.insert(name, parameter);
            }
            Ok(parameters)
        }
    }

    deserializer.deserialize_map(UniqueParameters)
}

#[cfg(test)]
mod tests {
    use super::SchemaSource;
    use crate::schema::{Encoding, RangePolicy, SchemaModel};

    #[test]
    fn defaults_fill_missing_fields() {
        let source = SchemaSource::from_json(
            r#"{
                "name": "Mini",
                "identifier": [125],
                "total_length": 8,
                "parameters": { "level": { "byte_offset": 3 } }
            }"#,
        )
        .unwrap();
        assert_eq!(source.version, "1.0");
        assert_eq!(source.start_marker, 0xF0);
        assert_eq!(source.end_marker, 0xF7);
        let level = &source.parameters["level"];
        assert_eq!(level.bit_mask, 0xFF);
        assert_eq!(level.value_range, [0, 127]);
        assert_eq!(level.category, "unknown");
        assert_eq!(level.data_type, Encoding::Uint8);
        assert_eq!(level.range_policy, RangePolicy::Reject);
    }

    #[test]
    fn duplicate_parameter_names_are_rejected() {
        let err = SchemaSource::from_json(
            r#"{
                "name": "Mini",
                "identifier": [125],
                "total_length": 8,
                "parameters": {
                    "level": { "byte_offset": 3 },
                    "level": { "byte_offset": 4 }
                }
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate parameter 'level'"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SchemaSource::from_json(
            r#"{
                "name": "Mini",
                "identifier": [125],
                "total_length": 8,
                "parameters": { "level": { "byte_offset": 3, "bit_maks": 15 } }
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bit_maks"));
    }

    #[test]
    fn encodings_and_policies_parse_from_tags() {
        let source = SchemaSource::from_json(
            r#"{
                "name": "Mini",
                "identifier": [125],
                "total_length": 8,
                "parameters": {
                    "tune": {
                        "byte_offset": 2,
                        "data_type": "uint14",
                        "bit_mask": 16383,
                        "value_range": [0, 16383],
                        "range_policy": "clamp"
                    }
                }
            }"#,
        )
        .unwrap();
        let tune = &source.parameters["tune"];
        assert_eq!(tune.data_type, Encoding::Uint14);
        assert_eq!(tune.range_policy, RangePolicy::Clamp);
    }

    #[test]
    fn template_survives_a_json_round_trip() {
        let text = serde_json::to_string_pretty(&SchemaSource::template("Studio Box")).unwrap();
        let schema = SchemaModel::from_json(&text).unwrap();
        assert_eq!(schema.key(), "studio_box");
        assert_eq!(schema.total_length(), 256);
        assert_eq!(schema.checksum_offset(), Some(200));
        let example = schema.parameter("example_parameter").unwrap();
        assert_eq!(example.byte_offset(), 10);
        assert_eq!(example.controller(), Some(74));
        assert_eq!(example.category(), "oscillator");
        assert!(!text.contains("\"key\""));
    }
}
