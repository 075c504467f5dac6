//! Message framing over raw byte streams.
//!
//! The framer knows nothing about schemas: it pairs each start marker with
//! the nearest following end marker and yields the bytes in between
//! (markers included). Noise between messages is skipped. A start marker
//! with no end marker before the end of the stream is dropped and counted as
//! a truncated tail.

pub mod layout;
pub mod parser;

pub use parser::{Frames, FramedMessage, Markers, frame};
