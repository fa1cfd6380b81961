//! Hexadecimal helpers shared by the escaper and unescaper.

/// Uppercase hex digits, indexed by nibble value.
pub const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Returns `true` for `0-9`, `a-f` and `A-F`.
///
/// # Examples
///
/// ```
/// use query_transcode::hex::is_hex;
///
/// assert!(is_hex(b'7'));
/// assert!(is_hex(b'c'));
/// assert!(is_hex(b'F'));
/// assert!(!is_hex(b'g'));
/// ```
pub fn is_hex(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F')
}

/// Converts a hex digit to its 4-bit value.
///
/// Callers check [`is_hex`] first; any other byte maps to `0`.
pub fn unhex(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

/// Converts the low nibble of `n` to an uppercase hex digit.
///
/// # Examples
///
/// ```
/// use query_transcode::hex::hex_digit;
///
/// assert_eq!(hex_digit(0x0), b'0');
/// assert_eq!(hex_digit(0xB), b'B');
/// ```
pub fn hex_digit(n: u8) -> u8 {
    UPPER_HEX[(n & 0x0F) as usize]
}
