//! Hex text helpers shared by reports and text inputs.

/// Lowercase hex, one space between bytes (`"f0 00 20"`).
///
/// # Examples
/// ```
/// assert_eq!(sysex_core::spaced_hex(&[0xF0, 0x0A, 0xF7]), "f0 0a f7");
/// ```
pub fn spaced_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse hex text, ignoring ASCII whitespace. `None` on odd length or a
/// non-hex digit.
pub(crate) fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let packed: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(packed).ok()
}
