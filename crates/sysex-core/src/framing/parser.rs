use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use super::layout;

/// Single-byte start/end delimiters of a message format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    pub start: u8,
    pub end: u8,
}

impl Markers {
    /// MIDI System Exclusive: `0xF0` ... `0xF7`.
    pub const SYSEX: Markers = Markers::new(layout::SYSEX_START, layout::SYSEX_END);

    pub const fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::SYSEX
    }
}

/// One delimited message, borrowed from the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramedMessage<'a> {
    offset: usize,
    bytes: &'a [u8],
}

impl<'a> FramedMessage<'a> {
    /// Wrap bytes that already include both markers.
    pub fn new(offset: usize, bytes: &'a [u8]) -> Self {
        Self { offset, bytes }
    }

    /// Offset of the start marker in the source stream.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whole message, markers included.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes between the markers.
    pub fn body(&self) -> &'a [u8] {
        match self.bytes.len() {
            0..=2 => &[],
            len => &self.bytes[1..len - 1],
        }
    }
}

/// Lazy iterator over the messages of a stream; see [`frame`].
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    data: &'a [u8],
    markers: Markers,
    pos: usize,
    truncated: usize,
    done: bool,
}

impl<'a> Frames<'a> {
    /// Number of start markers dropped because no end marker followed.
    ///
    /// Only meaningful once the iterator is exhausted; at most 1.
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    fn seek(&self, from: usize, marker: u8) -> Option<usize> {
        self.data
            .get(from..)?
            .iter()
            .position(|b| *b == marker)
            .map(|i| from + i)
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = FramedMessage<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(start) = self.seek(self.pos, self.markers.start) else {
            self.done = true;
            return None;
        };
        let Some(end) = self.seek(start + 1, self.markers.end) else {
            tracing::debug!(offset = start, "start marker without end marker, tail dropped");
            self.truncated += 1;
            self.done = true;
            return None;
        };
        self.pos = end + 1;
        Some(FramedMessage::new(start, &self.data[start..=end]))
    }
}

impl FusedIterator for Frames<'_> {}

/// Scan `data` for messages delimited by `markers`.
///
/// Matching is greedy and left to right: a start marker pairs with the first
/// end marker after it and scanning resumes right after that end marker, so
/// messages never overlap. The same input always yields the same messages.
///
/// # Examples
/// ```
/// use sysex_core::{Markers, frame};
///
/// let data = [0x00, 0xF0, 0x41, 0xF7, 0x13, 0xF0, 0x42];
/// let mut frames = frame(&data, Markers::SYSEX);
/// let offsets: Vec<usize> = frames.by_ref().map(|m| m.offset()).collect();
/// assert_eq!(offsets, vec![1]);
/// assert_eq!(frames.truncated(), 1);
/// ```
pub fn frame(data: &[u8], markers: Markers) -> Frames<'_> {
    Frames {
        data,
        markers,
        pos: 0,
        truncated: 0,
        done: false,
    }
}

#[cfg(test)]
mod tests {
    use super::{FramedMessage, Markers, frame};

    fn spans(data: &[u8]) -> (Vec<(usize, usize)>, usize) {
        let mut frames = frame(data, Markers::SYSEX);
        let spans = frames.by_ref().map(|m| (m.offset(), m.len())).collect();
        (spans, frames.truncated())
    }

    #[test]
    fn two_messages_and_truncated_tail() {
        let mut data = vec![0u8; 40];
        data[2] = 0xF0;
        data[10] = 0xF7;
        data[15] = 0xF0;
        data[25] = 0xF7;
        data[30] = 0xF0;
        let (spans, truncated) = spans(&data);
        assert_eq!(spans, vec![(2, 9), (15, 11)]);
        assert_eq!(truncated, 1);
    }

    #[test]
    fn framing_is_deterministic() {
        let data = [0xF0, 1, 0xF7, 9, 9, 0xF0, 2, 3, 0xF7, 0xF0];
        assert_eq!(spans(&data), spans(&data));
    }

    #[test]
    fn inner_start_marker_belongs_to_open_message() {
        let data = [0xF0, 1, 0xF0, 2, 0xF7];
        let (spans, truncated) = spans(&data);
        assert_eq!(spans, vec![(0, 5)]);
        assert_eq!(truncated, 0);
    }

    #[test]
    fn end_marker_without_start_is_noise() {
        let data = [0xF7, 0x10, 0xF0, 0xF7, 0xF7];
        let (spans, truncated) = spans(&data);
        assert_eq!(spans, vec![(2, 2)]);
        assert_eq!(truncated, 0);
    }

    #[test]
    fn empty_stream_yields_nothing() {
        let (spans, truncated) = spans(&[]);
        assert!(spans.is_empty());
        assert_eq!(truncated, 0);
    }

    #[test]
    fn custom_markers_are_honoured() {
        let data = [0x02, b'h', b'i', 0x03];
        let frames: Vec<_> = frame(&data, Markers::new(0x02, 0x03)).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].body(), b"hi");
    }

    #[test]
    fn iterator_adapters_work_on_frames() {
        let data = [0xF0, 1, 0xF7, 0xF0, 2, 0xF7, 0xF0, 3, 0xF7];
        let second = frame(&data, Markers::SYSEX).find(|m| m.body() == [2]);
        assert_eq!(second.map(|m| m.offset()), Some(3));
        assert_eq!(frame(&data, Markers::SYSEX).count(), 3);
    }

    #[test]
    fn body_strips_markers() {
        let message = FramedMessage::new(0, &[0xF0, 0x41, 0x10, 0xF7]);
        assert_eq!(message.body(), &[0x41, 0x10]);
        assert!(FramedMessage::new(0, &[0xF0, 0xF7]).body().is_empty());
    }
}
