//! Fixed-order numeric vectors from decoded presets.
//!
//! Vector positions are defined by an explicit parameter order, never by map
//! iteration order, so vectors from different presets line up column by
//! column. Missing values are [`MISSING_FEATURE`].

use serde::Serialize;

use crate::DecodedPreset;
use crate::schema::SchemaModel;

/// Sentinel for a parameter absent from the preset or excluded by the
/// category filter. Test with `f64::is_nan`.
pub const MISSING_FEATURE: f64 = f64::NAN;

fn selected(category: &str, category_filter: &[&str]) -> bool {
    category_filter.is_empty() || category_filter.contains(&category)
}

/// Normalized values of `preset` in `parameter_order`.
///
/// An empty `category_filter` selects every category. The result always has
/// `parameter_order.len()` elements.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use sysex_core::{EncodeValue, ParameterSource, SchemaSource, decode_stream, encode};
/// use sysex_core::to_feature_vector;
///
/// let schema = SchemaSource::new("Mini", [0x7D], 3)
///     .parameter("cutoff", ParameterSource::at(1).category("filter"))
///     .parameter("attack", ParameterSource::at(2).category("envelope"))
///     .build()?;
/// let values = BTreeMap::from([("cutoff".to_string(), EncodeValue::Raw(127))]);
/// let bytes = encode(&schema, &values, None)?;
/// let preset = &decode_stream(&schema, &bytes).presets[0];
///
/// let vector = to_feature_vector(preset, &["filter"], &["cutoff", "attack", "lfo_rate"]);
/// assert_eq!(vector[0], 1.0);
/// assert!(vector[1].is_nan());
/// assert!(vector[2].is_nan());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn to_feature_vector<S: AsRef<str>>(
    preset: &DecodedPreset,
    category_filter: &[&str],
    parameter_order: &[S],
) -> Vec<f64> {
    parameter_order
        .iter()
        .map(|name| {
            preset
                .parameters
                .get(name.as_ref())
                .filter(|parameter| selected(&parameter.category, category_filter))
                .map_or(MISSING_FEATURE, |parameter| parameter.normalized)
        })
        .collect()
}

/// Parameter names of `schema` in message layout order (byte offset, then
/// bit position, then name), restricted to `category_filter`.
pub fn default_parameter_order(schema: &SchemaModel, category_filter: &[&str]) -> Vec<String> {
    let mut parameters: Vec<_> = schema
        .parameters()
        .filter(|parameter| selected(parameter.category(), category_filter))
        .collect();
    parameters.sort_by(|a, b| {
        a.byte_offset()
            .cmp(&b.byte_offset())
            .then_with(|| a.field().shift().cmp(&b.field().shift()))
            .then_with(|| a.name().cmp(b.name()))
    });
    parameters
        .into_iter()
        .map(|parameter| parameter.name().to_string())
        .collect()
}

/// One row per preset, one column per parameter.
///
/// Export only. Missing values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    /// Preset names (`None` when the preset had no name).
    pub presets: Vec<Option<String>>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn from_presets(
        presets: &[DecodedPreset],
        category_filter: &[&str],
        parameter_order: Vec<String>,
    ) -> Self {
        let rows = presets
            .iter()
            .map(|preset| to_feature_vector(preset, category_filter, &parameter_order))
            .collect();
        Self {
            columns: parameter_order,
            presets: presets.iter().map(|preset| preset.name.clone()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{FeatureMatrix, default_parameter_order, to_feature_vector};
    use crate::codec::{EncodeValue, decode_stream, encode};
    use crate::schema::{ParameterSource, SchemaModel, SchemaSource};

    fn schema() -> SchemaModel {
        SchemaSource::new("Features", [0x7D], 5)
            .preset_name(3, 2)
            .parameter("wave", ParameterSource::at(1).mask(0xF0).shift(4).range(0, 15).category("osc"))
            .parameter("octave", ParameterSource::at(1).mask(0x0F).range(0, 15).category("osc"))
            .parameter("cutoff", ParameterSource::at(2).category("filter"))
            .build()
            .unwrap()
    }

    fn preset(cutoff: u32) -> crate::DecodedPreset {
        let values = BTreeMap::from([
            ("cutoff".to_string(), EncodeValue::Raw(cutoff)),
            ("octave".to_string(), EncodeValue::Raw(15)),
        ]);
        let bytes = encode(&schema(), &values, Some("Hi")).unwrap();
        decode_stream(&schema(), &bytes).presets.remove(0)
    }

    #[test]
    fn vector_length_follows_order() {
        let vector = to_feature_vector(&preset(0), &[], &["cutoff", "unknown", "octave"]);
        assert_eq!(vector.len(), 3);
        assert_eq!(vector[0], 0.0);
        assert!(vector[1].is_nan());
        assert_eq!(vector[2], 1.0);
        assert!(to_feature_vector::<&str>(&preset(0), &[], &[]).is_empty());
    }

    #[test]
    fn default_order_follows_layout() {
        let order = default_parameter_order(&schema(), &[]);
        assert_eq!(order, vec!["octave", "wave", "cutoff"]);
        assert_eq!(default_parameter_order(&schema(), &["filter"]), vec!["cutoff"]);
    }

    #[test]
    fn matrix_serializes_missing_as_null() {
        let presets = [preset(127), preset(0)];
        let matrix = FeatureMatrix::from_presets(&presets, &["filter"], vec![
            "cutoff".to_string(),
            "wave".to_string(),
        ]);
        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.presets[0].as_deref(), Some("Hi"));
        let value = serde_json::to_value(&matrix).unwrap();
        assert_eq!(value["rows"][0], serde_json::json!([1.0, null]));
    }
}
