//! MIDI manufacturer IDs.
//!
//! IDs are one byte, or three bytes when the first is `0x00`.

const ONE_BYTE: &[(u8, &str)] = &[
    (0x01, "Sequential Circuits"),
    (0x04, "Moog"),
    (0x06, "Lexicon"),
    (0x07, "Kurzweil"),
    (0x0F, "Ensoniq"),
    (0x10, "Oberheim"),
    (0x18, "E-mu"),
    (0x33, "Clavia"),
    (0x3E, "Waldorf"),
    (0x40, "Kawai"),
    (0x41, "Roland"),
    (0x42, "Korg"),
    (0x43, "Yamaha"),
    (0x44, "Casio"),
    (0x47, "Akai"),
    (0x7D, "Non-commercial"),
    (0x7E, "Universal Non-Real Time"),
    (0x7F, "Universal Real Time"),
];

const THREE_BYTE: &[([u8; 3], &str)] = &[
    ([0x00, 0x00, 0x0E], "Alesis"),
    ([0x00, 0x20, 0x29], "Novation"),
    ([0x00, 0x20, 0x32], "Behringer"),
    ([0x00, 0x20, 0x33], "Access Music"),
    ([0x00, 0x20, 0x3C], "Elektron"),
    ([0x00, 0x20, 0x6B], "Arturia"),
    ([0x00, 0x21, 0x09], "Native Instruments"),
];

/// The manufacturer ID at the start of a message body, if the body is long
/// enough to hold one.
pub(crate) fn manufacturer_id(body: &[u8]) -> Option<&[u8]> {
    match body {
        [0x00, ..] => body.get(..3),
        [_, ..] => body.get(..1),
        [] => None,
    }
}

/// Name of a manufacturer ID, if it is in the table.
///
/// # Examples
/// ```
/// use sysex_core::manufacturer_name;
///
/// assert_eq!(manufacturer_name(&[0x41]), Some("Roland"));
/// assert_eq!(manufacturer_name(&[0x00, 0x20, 0x33]), Some("Access Music"));
/// assert_eq!(manufacturer_name(&[0x00, 0x7F, 0x7F]), None);
/// ```
pub fn manufacturer_name(id: &[u8]) -> Option<&'static str> {
    match id {
        [byte] => ONE_BYTE
            .iter()
            .find(|(candidate, _)| candidate == byte)
            .map(|(_, name)| *name),
        [0x00, _, _] => THREE_BYTE
            .iter()
            .find(|(candidate, _)| candidate.as_slice() == id)
            .map(|(_, name)| *name),
        _ => None,
    }
}
