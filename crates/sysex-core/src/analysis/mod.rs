//! Schema-free structural analysis of unknown dumps.
//!
//! Uses the same framing as the codec, so the analyzer and a schema decode
//! always agree on where messages are. Never fails: malformed input yields
//! an empty or partial message list.

use std::collections::BTreeMap;

use crate::framing::{FramedMessage, Markers, frame};
use crate::hex_text::spaced_hex;
use crate::schema::DeviceIdentifier;
use crate::{AnalysisReport, ManufacturerTally, MessageSummary};

mod manufacturer;

pub use manufacturer::manufacturer_name;

const PREVIEW_BYTES: usize = 16;
const CANDIDATE_BYTES: usize = 3;

/// Describe every SysEx message in `bytes`.
///
/// # Examples
/// ```
/// use sysex_core::analyze_unknown;
///
/// let data = [0x00, 0xF0, 0x43, 0x10, 0x4C, 0x00, 0xF7, 0xF0, 0x41];
/// let report = analyze_unknown(&data);
/// assert_eq!(report.source_len, 9);
/// assert_eq!(report.messages.len(), 1);
/// assert_eq!(report.messages[0].start_offset, 1);
/// assert_eq!(report.truncated_tail, 1);
/// assert_eq!(report.manufacturers[0].name.as_deref(), Some("Yamaha"));
/// ```
pub fn analyze_unknown(bytes: &[u8]) -> AnalysisReport {
    analyze_unknown_with(bytes, Markers::SYSEX)
}

/// Like [`analyze_unknown`] with custom delimiters.
pub fn analyze_unknown_with(bytes: &[u8], markers: Markers) -> AnalysisReport {
    let mut frames = frame(bytes, markers);
    let mut tally: BTreeMap<&[u8], usize> = BTreeMap::new();
    let mut messages = Vec::new();

    for (index, message) in frames.by_ref().enumerate() {
        if let Some(id) = manufacturer::manufacturer_id(message.body()) {
            *tally.entry(id).or_default() += 1;
        }
        messages.push(summarize(index + 1, &message));
    }

    let mut manufacturers: Vec<ManufacturerTally> = tally
        .into_iter()
        .map(|(id, messages)| ManufacturerTally {
            id: DeviceIdentifier::new(id),
            name: manufacturer_name(id).map(str::to_string),
            messages,
        })
        .collect();
    manufacturers.sort_by(|a, b| b.messages.cmp(&a.messages).then_with(|| a.id.cmp(&b.id)));

    AnalysisReport {
        source_len: bytes.len(),
        messages,
        truncated_tail: frames.truncated(),
        manufacturers,
    }
}

fn summarize(index: usize, message: &FramedMessage<'_>) -> MessageSummary {
    let bytes = message.bytes();
    let mut hex_preview = spaced_hex(&bytes[..bytes.len().min(PREVIEW_BYTES)]);
    if bytes.len() > PREVIEW_BYTES {
        hex_preview.push_str("...");
    }
    MessageSummary {
        index,
        start_offset: message.offset(),
        length: message.len(),
        identifier_candidate: message.body().get(..CANDIDATE_BYTES).map(DeviceIdentifier::new),
        hex_preview,
    }
}

#[cfg(test)]
mod tests {
    use super::{analyze_unknown, analyze_unknown_with};
    use crate::framing::Markers;
    use crate::schema::DeviceIdentifier;

    #[test]
    fn two_messages_and_truncated_tail() {
        let mut data = vec![0u8; 40];
        data[2] = 0xF0;
        data[10] = 0xF7;
        data[15] = 0xF0;
        data[25] = 0xF7;
        data[30] = 0xF0;
        let report = analyze_unknown(&data);
        assert_eq!(report.source_len, 40);
        assert_eq!(report.messages.len(), 2);
        assert_eq!(report.messages[0].index, 1);
        assert_eq!(report.messages[0].start_offset, 2);
        assert_eq!(report.messages[0].length, 9);
        assert_eq!(report.messages[1].index, 2);
        assert_eq!(report.messages[1].start_offset, 15);
        assert_eq!(report.messages[1].length, 11);
        assert_eq!(report.truncated_tail, 1);
    }

    #[test]
    fn long_messages_get_a_cut_preview() {
        let mut data = vec![0xF0, 0x00, 0x20, 0x33];
        data.extend(std::iter::repeat_n(0x01, 20));
        data.push(0xF7);
        let report = analyze_unknown(&data);
        let message = &report.messages[0];
        assert_eq!(
            message.hex_preview,
            "f0 00 20 33 01 01 01 01 01 01 01 01 01 01 01 01..."
        );
        assert_eq!(
            message.identifier_candidate,
            Some(DeviceIdentifier::new([0x00, 0x20, 0x33]))
        );
        assert_eq!(report.manufacturers[0].name.as_deref(), Some("Access Music"));
    }

    #[test]
    fn short_messages_have_no_candidate() {
        let report = analyze_unknown(&[0xF0, 0x41, 0x10, 0xF7]);
        assert_eq!(report.messages[0].identifier_candidate, None);
        assert_eq!(report.messages[0].hex_preview, "f0 41 10 f7");
    }

    #[test]
    fn manufacturers_are_ranked_by_count() {
        let data = [
            0xF0, 0x41, 0x10, 0x42, 0xF7, //
            0xF0, 0x43, 0x10, 0x4C, 0xF7, //
            0xF0, 0x43, 0x10, 0x4C, 0xF7, //
            0xF0, 0xF7,
        ];
        let report = analyze_unknown(&data);
        assert_eq!(report.messages.len(), 4);
        let names: Vec<_> = report
            .manufacturers
            .iter()
            .map(|tally| (tally.name.as_deref(), tally.messages))
            .collect();
        assert_eq!(names, vec![(Some("Yamaha"), 2), (Some("Roland"), 1)]);
    }

    #[test]
    fn garbage_yields_empty_report() {
        let report = analyze_unknown(&[0x12, 0xF7, 0x34]);
        assert!(report.messages.is_empty());
        assert!(report.manufacturers.is_empty());
        assert_eq!(report.truncated_tail, 0);
        assert!(analyze_unknown(&[]).messages.is_empty());
    }

    #[test]
    fn custom_markers() {
        let report = analyze_unknown_with(&[0x02, 0x41, 0x42, 0x43, 0x03], Markers::new(0x02, 0x03));
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].length, 5);
    }
}
