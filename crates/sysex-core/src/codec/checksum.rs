/// Roland-style checksum: the 7-bit value that brings the sum of every body
/// byte except the checksum itself to a multiple of 128.
///
/// # Examples
/// ```
/// use sysex_core::codec::checksum;
///
/// let body = [0x41, 0x10, 0x00, 0x00];
/// let sum = checksum(&body, 3);
/// assert_eq!((0x41 + 0x10 + u32::from(sum)) % 128, 0);
/// ```
pub fn checksum(body: &[u8], checksum_offset: usize) -> u8 {
    let sum: u32 = body
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != checksum_offset)
        .map(|(_, b)| u32::from(*b))
        .sum();
    ((128 - sum % 128) % 128) as u8
}

#[cfg(test)]
mod tests {
    use super::checksum;

    #[test]
    fn zero_sum_gives_zero() {
        assert_eq!(checksum(&[0, 0, 0], 1), 0);
    }

    #[test]
    fn checksum_byte_is_excluded() {
        assert_eq!(checksum(&[0x10, 0x7F, 0x20], 1), checksum(&[0x10, 0x00, 0x20], 1));
        assert_eq!(checksum(&[0x10, 0x00, 0x20], 1), 128 - 0x30);
    }
}
